use async_trait::async_trait;
use blueprint_test_core::scenario::{
    Assertions, CliRunOptions, CloudCli, DynError, RunContext, Verification,
};
use blueprint_test_gcloud::run;
use serde_json::Value;
use tracing::{debug, info};

use super::PROJECT_ID_OUTPUT;

const STUB_UPLOAD: &str = "teste-upload";
const STUB_ARCHIVE: &str = "teste-archive";

/// Bucket names the simple example creates for `project_id`:
/// `<project_id>-upload` and `<project_id>-archive`.
#[must_use]
pub fn bucket_names(project_id: &str) -> [String; 2] {
    [
        format!("{project_id}-upload"),
        format!("{project_id}-archive"),
    ]
}

/// How [`BucketsExist`] resolves a bucket name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BucketLookup {
    /// Answers with fixed, non-empty bucket names without calling the cloud.
    #[default]
    Stubbed,
    /// `gcloud storage buckets describe <name>`.
    Live,
}

impl BucketLookup {
    /// Looks up the upload and archive buckets, in that order.
    pub async fn lookup(
        self,
        ctx: &RunContext,
        upload: &str,
        archive: &str,
    ) -> Result<(Value, Value), DynError> {
        debug!(lookup = ?self, upload, archive, "looking up buckets");
        match self {
            Self::Stubbed => Ok((
                Value::String(STUB_UPLOAD.to_owned()),
                Value::String(STUB_ARCHIVE.to_owned()),
            )),
            Self::Live => {
                let cli = ctx.require_cloud()?;
                let upload = describe_bucket(cli, upload).await?;
                let archive = describe_bucket(cli, archive).await?;
                Ok((upload, archive))
            }
        }
    }
}

async fn describe_bucket(cli: &dyn CloudCli, name: &str) -> Result<Value, DynError> {
    run(
        cli,
        &format!("storage buckets describe {name}"),
        &CliRunOptions::default(),
    )
    .await
}

/// Checks that the upload and archive buckets derived from the setup
/// project exist.
#[derive(Clone, Debug)]
pub struct BucketsExist {
    lookup: BucketLookup,
    project_output: String,
}

impl Default for BucketsExist {
    fn default() -> Self {
        Self::new(BucketLookup::default())
    }
}

impl BucketsExist {
    #[must_use]
    pub fn new(lookup: BucketLookup) -> Self {
        Self {
            lookup,
            project_output: PROJECT_ID_OUTPUT.to_owned(),
        }
    }

    /// Read the project from a differently named setup output.
    #[must_use]
    pub fn with_project_output(mut self, name: impl Into<String>) -> Self {
        self.project_output = name.into();
        self
    }

    #[must_use]
    pub const fn lookup(&self) -> BucketLookup {
        self.lookup
    }
}

#[async_trait]
impl Verification for BucketsExist {
    fn name(&self) -> &str {
        "buckets_exist"
    }

    async fn verify(&mut self, ctx: &RunContext, assert: &mut Assertions) -> Result<(), DynError> {
        let project_id = ctx.setup_string_output(&self.project_output)?;
        let [upload, archive] = bucket_names(&project_id);

        let (upload_bucket, archive_bucket) = self.lookup.lookup(ctx, &upload, &archive).await?;

        assert.not_empty(&upload, &upload_bucket);
        assert.not_empty(&archive, &archive_bucket);
        info!(%project_id, %upload, %archive, "bucket checks recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::verifications::test_support::{FakeCloud, context};

    #[test]
    fn names_derive_from_project() {
        assert_eq!(bucket_names("teste"), ["teste-upload", "teste-archive"]);
    }

    #[tokio::test]
    async fn stubbed_lookup_passes_without_cloud() {
        let ctx = context(None);
        let mut assert = Assertions::new("buckets_exist");

        BucketsExist::default()
            .verify(&ctx, &mut assert)
            .await
            .unwrap();

        assert!(assert.passed());
        assert_eq!(assert.checked(), 2);
    }

    #[tokio::test]
    async fn stubbed_lookup_ignores_its_input() {
        let ctx = context(None);

        let (upload, archive) = BucketLookup::Stubbed
            .lookup(&ctx, "", "other-archive")
            .await
            .unwrap();

        assert_eq!(upload, json!("teste-upload"));
        assert_eq!(archive, json!("teste-archive"));
    }

    #[tokio::test]
    async fn live_lookup_describes_derived_names() {
        let cloud = Arc::new(
            FakeCloud::default()
                .respond(
                    "storage buckets describe teste-upload",
                    json!({"name": "teste-upload"}),
                )
                .respond("storage buckets describe teste-archive", json!({})),
        );
        let ctx = context(Some(Arc::clone(&cloud)));
        let mut assert = Assertions::new("buckets_exist");

        BucketsExist::new(BucketLookup::Live)
            .verify(&ctx, &mut assert)
            .await
            .unwrap();

        let calls: Vec<String> = cloud.calls().iter().map(|call| call.join(" ")).collect();
        assert_eq!(
            calls,
            [
                "storage buckets describe teste-upload --format json",
                "storage buckets describe teste-archive --format json",
            ]
        );
        assert_eq!(assert.failures().len(), 1);
        assert!(
            assert.failures()[0]
                .to_string()
                .contains("teste-archive should not be empty")
        );
    }

    #[tokio::test]
    async fn live_lookup_requires_a_cloud_cli() {
        let ctx = context(None);
        let mut assert = Assertions::new("buckets_exist");

        let err = BucketsExist::new(BucketLookup::Live)
            .verify(&ctx, &mut assert)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "cloud CLI is not configured for this run");
    }

    #[tokio::test]
    async fn missing_project_output_aborts() {
        let ctx = context(None);
        let mut assert = Assertions::new("buckets_exist");

        let err = BucketsExist::default()
            .with_project_output("project")
            .verify(&ctx, &mut assert)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("setup output 'project' not found"));
        assert_eq!(assert.checked(), 0);
    }
}
