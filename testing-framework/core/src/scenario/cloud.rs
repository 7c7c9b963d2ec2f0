use async_trait::async_trait;
use serde_json::Value;

use super::DynError;

const DEFAULT_COMMON_ARGS: [&str; 2] = ["--format", "json"];

/// Arguments appended to every cloud CLI invocation.
///
/// The default asks for JSON output; [`CliRunOptions::with_common_args`]
/// replaces the defaults entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliRunOptions {
    common_args: Vec<String>,
}

impl Default for CliRunOptions {
    fn default() -> Self {
        Self::with_common_args(DEFAULT_COMMON_ARGS)
    }
}

impl CliRunOptions {
    #[must_use]
    pub fn with_common_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            common_args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `--project <id> --format json`.
    #[must_use]
    pub fn for_project(project_id: &str) -> Self {
        Self::with_common_args(["--project", project_id, "--format", "json"])
    }

    #[must_use]
    pub fn common_args(&self) -> &[String] {
        &self.common_args
    }
}

/// Command-line cloud client available to verifications.
#[async_trait]
pub trait CloudCli: Send + Sync {
    /// Run the client with `args` followed by the common arguments and return
    /// its parsed JSON output.
    async fn run(&self, args: &[String], options: &CliRunOptions) -> Result<Value, DynError>;
}
