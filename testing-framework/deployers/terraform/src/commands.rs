use std::{
    io,
    path::Path,
    process::{Output, Stdio},
    time::Duration,
};

use blueprint_test_config::{constants, timeouts};
use blueprint_test_core::adjust_timeout;
use thiserror::Error;
use tokio::{process::Command, time::timeout};
use tracing::{debug, info, warn};

const VERSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned from terraform invocations.
#[derive(Debug, Error)]
pub enum TerraformCommandError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} exited with status {status:?}\nstderr:\n{stderr}")]
    Failed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Result of `terraform plan -detailed-exitcode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    NoChanges,
    Changes,
}

/// How terraform is invoked: program, optional wrapper arguments, and
/// per-subcommand timeouts.
#[derive(Clone, Debug)]
pub struct TerraformCli {
    program: String,
    leading_args: Vec<String>,
    init_timeout: Duration,
    apply_timeout: Duration,
    destroy_timeout: Duration,
    output_timeout: Duration,
}

impl Default for TerraformCli {
    fn default() -> Self {
        Self::new(constants::terraform_binary())
    }
}

impl TerraformCli {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            init_timeout: timeouts::tf_init_timeout(),
            apply_timeout: timeouts::tf_apply_timeout(),
            destroy_timeout: timeouts::tf_destroy_timeout(),
            output_timeout: timeouts::tf_output_timeout(),
        }
    }

    /// Arguments placed before every subcommand, for wrappers such as
    /// `sh ./terraform-shim`.
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
    pub fn with_apply_timeout(mut self, timeout: Duration) -> Self {
        self.apply_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_destroy_timeout(mut self, timeout: Duration) -> Self {
        self.destroy_timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Checks that `terraform version` succeeds.
    pub async fn ensure_available(&self) -> Result<(), TerraformCommandError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args).arg("version");
        run_terraform_command(cmd, adjust_timeout(VERSION_TIMEOUT), "terraform version")
            .await
            .map(|_| debug!(program = %self.program, "terraform version succeeded"))
    }

    pub async fn init(
        &self,
        dir: &Path,
        env: &[(String, String)],
    ) -> Result<(), TerraformCommandError> {
        let cmd = self.command(dir, &["init", "-input=false", "-no-color"], env);
        run_terraform_command(cmd, adjust_timeout(self.init_timeout), "terraform init")
            .await
            .map(drop)
    }

    pub async fn apply(
        &self,
        dir: &Path,
        env: &[(String, String)],
    ) -> Result<(), TerraformCommandError> {
        let cmd = self.command(
            dir,
            &["apply", "-input=false", "-auto-approve", "-no-color"],
            env,
        );
        run_terraform_command(cmd, adjust_timeout(self.apply_timeout), "terraform apply")
            .await
            .map(drop)
    }

    pub async fn plan(
        &self,
        dir: &Path,
        env: &[(String, String)],
    ) -> Result<PlanOutcome, TerraformCommandError> {
        let cmd = self.command(
            dir,
            &["plan", "-input=false", "-detailed-exitcode", "-no-color"],
            env,
        );
        match run_terraform_command(cmd, adjust_timeout(self.apply_timeout), "terraform plan")
            .await
        {
            Ok(_) => Ok(PlanOutcome::NoChanges),
            Err(TerraformCommandError::Failed {
                status: Some(2), ..
            }) => Ok(PlanOutcome::Changes),
            Err(err) => Err(err),
        }
    }

    /// Raw `terraform output -json` document.
    pub async fn output_json(&self, dir: &Path) -> Result<String, TerraformCommandError> {
        let cmd = self.command(dir, &["output", "-json", "-no-color"], &[]);
        let output = run_terraform_command(
            cmd,
            adjust_timeout(self.output_timeout),
            "terraform output",
        )
        .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub async fn destroy(
        &self,
        dir: &Path,
        env: &[(String, String)],
    ) -> Result<(), TerraformCommandError> {
        let cmd = self.command(
            dir,
            &["destroy", "-input=false", "-auto-approve", "-no-color"],
            env,
        );
        run_terraform_command(
            cmd,
            adjust_timeout(self.destroy_timeout),
            "terraform destroy",
        )
        .await
        .map(drop)
    }

    fn command(&self, dir: &Path, args: &[&str], env: &[(String, String)]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .current_dir(dir)
            .env("TF_IN_AUTOMATION", "1")
            .envs(env.iter().map(|(name, value)| (tf_var(name), value)));
        debug!(
            dir = %dir.display(),
            args = ?args,
            vars = env.len(),
            "prepared terraform command"
        );
        cmd
    }
}

fn tf_var(name: &str) -> String {
    format!("{}{name}", constants::TF_VAR_PREFIX)
}

/// Run a prepared terraform command with a timeout, capturing its output.
pub async fn run_terraform_command(
    mut cmd: Command,
    limit: Duration,
    description: &str,
) -> Result<Output, TerraformCommandError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(command = description, "running terraform command");
    let output = match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(TerraformCommandError::Spawn {
                command: description.to_owned(),
                source,
            });
        }
        Err(_) => {
            warn!(command = description, timeout = ?limit, "terraform command timed out");
            return Err(TerraformCommandError::Timeout {
                command: description.to_owned(),
                timeout: limit,
            });
        }
    };

    if output.status.success() {
        Ok(output)
    } else {
        Err(TerraformCommandError::Failed {
            command: description.to_owned(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, ffi::OsStr};

    use super::*;

    #[test]
    fn command_exports_tf_vars_and_runs_in_blueprint_dir() {
        let cli = TerraformCli::new("terraform");
        let env = vec![("project_id".to_owned(), "teste".to_owned())];
        let cmd = cli.command(Path::new("/repo/examples/simple_example"), &["apply"], &env);
        let std = cmd.as_std();

        assert_eq!(std.get_program(), "terraform");
        assert_eq!(
            std.get_current_dir(),
            Some(Path::new("/repo/examples/simple_example"))
        );
        let envs: HashMap<&OsStr, Option<&OsStr>> = std.get_envs().collect();
        assert_eq!(
            envs[OsStr::new("TF_VAR_project_id")],
            Some(OsStr::new("teste"))
        );
        assert_eq!(envs[OsStr::new("TF_IN_AUTOMATION")], Some(OsStr::new("1")));
    }

    #[test]
    fn leading_args_precede_subcommand() {
        let cli = TerraformCli::new("sh").with_leading_args(["./terraform-shim"]);
        let cmd = cli.command(Path::new("/tmp"), &["output", "-json"], &[]);

        let args: Vec<&OsStr> = cmd.as_std().get_args().collect();
        assert_eq!(args, ["./terraform-shim", "output", "-json"]);
    }
}
