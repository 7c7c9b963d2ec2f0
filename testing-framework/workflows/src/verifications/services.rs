use async_trait::async_trait;
use blueprint_test_core::scenario::{Assertions, CliRunOptions, DynError, RunContext, Verification};
use blueprint_test_gcloud::{first_match_result, get_path, run};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::PROJECT_ID_OUTPUT;

/// APIs the simple example expects on its project.
pub const DEFAULT_SERVICES: [&str; 6] = [
    "cloudbuild",
    "bigquery",
    "cloudfunctions",
    "compute",
    "storage",
    "eventarc",
];

const ENABLED: &str = "ENABLED";

#[derive(Debug, Error)]
enum ServicesError {
    #[error("services list returned {kind} instead of an array")]
    NotAList { kind: &'static str },
}

/// Checks that each listed `<service>.googleapis.com` API is enabled on the
/// setup project. Queries the service list once.
#[derive(Clone, Debug)]
pub struct ServicesEnabled {
    services: Vec<String>,
    project_output: String,
}

impl Default for ServicesEnabled {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICES)
    }
}

impl ServicesEnabled {
    #[must_use]
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            services: services.into_iter().map(Into::into).collect(),
            project_output: PROJECT_ID_OUTPUT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_project_output(mut self, name: impl Into<String>) -> Self {
        self.project_output = name.into();
        self
    }

    #[must_use]
    pub fn services(&self) -> &[String] {
        &self.services
    }

    fn check(&self, entries: &[Value], assert: &mut Assertions) {
        for service in &self.services {
            let api = format!("{service}.googleapis.com");
            let message = format!("{service} service should be enabled");

            match first_match_result(entries, "config.name", &api) {
                Some(entry) => {
                    let state = get_path(entry, "state")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    assert.equal(ENABLED, state, message);
                }
                None => assert.fail(format!("{message}: {api} not found in services list")),
            }
        }
    }
}

#[async_trait]
impl Verification for ServicesEnabled {
    fn name(&self) -> &str {
        "services_enabled"
    }

    async fn verify(&mut self, ctx: &RunContext, assert: &mut Assertions) -> Result<(), DynError> {
        let project_id = ctx.setup_string_output(&self.project_output)?;
        let cli = ctx.require_cloud()?;

        let options = CliRunOptions::for_project(&project_id);
        let listed = run(cli, "services list", &options).await?;
        let entries: &[Value] = match &listed {
            Value::Array(entries) => entries.as_slice(),
            Value::Null => &[],
            other => {
                return Err(ServicesError::NotAList {
                    kind: json_kind(other),
                }
                .into());
            }
        };

        info!(
            %project_id,
            listed = entries.len(),
            checked = self.services.len(),
            "checking enabled services"
        );
        self.check(entries, assert);
        Ok(())
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
