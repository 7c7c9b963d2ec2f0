use std::{io, path::PathBuf, thread};

use blueprint_test_core::scenario::{CleanupGuard, DynError};
use tracing::{debug, info, warn};

use crate::commands::{TerraformCli, TerraformCommandError};

/// Destroys an applied blueprint unless preservation is requested.
pub struct RunnerCleanup {
    cli: TerraformCli,
    dir: PathBuf,
    vars: Vec<(String, String)>,
    preserve: bool,
}

impl RunnerCleanup {
    /// Build a cleanup guard; `preserve` skips `terraform destroy`.
    #[must_use]
    pub fn new(
        cli: TerraformCli,
        dir: PathBuf,
        vars: Vec<(String, String)>,
        preserve: bool,
    ) -> Self {
        debug_assert!(
            !dir.as_os_str().is_empty(),
            "terraform cleanup requires a blueprint directory"
        );
        Self {
            cli,
            dir,
            vars,
            preserve,
        }
    }

    #[must_use]
    pub const fn preserve(&self) -> bool {
        self.preserve
    }
}

impl CleanupGuard for RunnerCleanup {
    fn cleanup(self: Box<Self>) -> Result<(), DynError> {
        debug!(
            dir = %self.dir.display(),
            preserve = self.preserve,
            "terraform cleanup started"
        );

        if self.preserve {
            info!(
                dir = %self.dir.display(),
                "preserve flag set; skipping terraform destroy"
            );
            return Ok(());
        }

        let Self { cli, dir, vars, .. } = *self;
        match run_destroy_blocking(cli, dir.clone(), vars) {
            Ok(()) => {
                info!(dir = %dir.display(), "blueprint destroyed");
                Ok(())
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "terraform destroy failed");
                Err(err.into())
            }
        }
    }
}

/// Runs `terraform destroy` on its own thread and runtime so the guard can be
/// released from `Drop` inside or outside a tokio context.
fn run_destroy_blocking(
    cli: TerraformCli,
    dir: PathBuf,
    vars: Vec<(String, String)>,
) -> Result<(), TerraformCommandError> {
    let handle = thread::Builder::new()
        .name("terraform-destroy".into())
        .spawn(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|source| TerraformCommandError::Spawn {
                    command: "terraform destroy".into(),
                    source,
                })?
                .block_on(cli.destroy(&dir, &vars))
        })
        .map_err(|source| TerraformCommandError::Spawn {
            command: "terraform destroy".into(),
            source,
        })?;

    handle.join().map_err(|_| TerraformCommandError::Spawn {
        command: "terraform destroy".into(),
        source: io::Error::other("join failure running terraform destroy"),
    })?
}
