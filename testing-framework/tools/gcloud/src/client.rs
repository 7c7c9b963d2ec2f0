use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use blueprint_test_config::{constants, timeouts};
use blueprint_test_core::{
    adjust_timeout,
    scenario::{CliRunOptions, CloudCli, DynError},
};
use serde_json::Value;
use tokio::{process::Command, time::timeout};
use tracing::{debug, info, warn};

use crate::errors::GcloudError;

/// `gcloud` invoked as a child process.
#[derive(Clone, Debug)]
pub struct Gcloud {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::new(constants::gcloud_binary())
    }
}

impl Gcloud {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout: timeouts::gcloud_timeout(),
        }
    }

    /// Arguments placed before every command, for wrappers such as
    /// `sh ./gcloud-shim`.
    #[must_use]
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_command(&self, args: &[String], options: &CliRunOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .args(options.common_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run gcloud and parse its standard output as JSON. Empty output parses
    /// as `null`.
    pub async fn run_json(
        &self,
        args: &[String],
        options: &CliRunOptions,
    ) -> Result<Value, GcloudError> {
        if args.is_empty() {
            return Err(GcloudError::EmptyCommand);
        }

        let description = format!("gcloud {}", args.join(" "));
        let mut cmd = self.build_command(args, options);
        let limit = adjust_timeout(self.timeout);
        debug!(
            command = %description,
            common_args = ?options.common_args(),
            "prepared gcloud command"
        );

        let output = match timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(GcloudError::Spawn {
                    command: description,
                    source,
                });
            }
            Err(_) => {
                warn!(command = %description, timeout = ?limit, "gcloud command timed out");
                return Err(GcloudError::Timeout {
                    command: description,
                    timeout: limit,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(command = %description, status = ?output.status.code(), "gcloud command failed");
            return Err(GcloudError::Failed {
                command: description,
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        info!(command = %description, "gcloud command completed");
        if stdout.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&stdout).map_err(|source| GcloudError::InvalidJson {
            command: description,
            source,
        })
    }
}

#[async_trait]
impl CloudCli for Gcloud {
    async fn run(&self, args: &[String], options: &CliRunOptions) -> Result<Value, DynError> {
        self.run_json(args, options).await.map_err(Into::into)
    }
}

/// Split a command line such as `"services list"` on whitespace.
#[must_use]
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_owned).collect()
}

/// Run a whitespace-separated command through any [`CloudCli`].
pub async fn run(
    cli: &dyn CloudCli,
    command: &str,
    options: &CliRunOptions,
) -> Result<Value, DynError> {
    let args = split_command(command);
    if args.is_empty() {
        return Err(GcloudError::EmptyCommand.into());
    }
    cli.run(&args, options).await
}
