use std::path::PathBuf;

use blueprint_test_core::{OutputError, scenario::LifecycleError};
use thiserror::Error;

use crate::commands::TerraformCommandError;

/// Top-level Terraform deployer errors.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform binary '{program}' is not available: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: TerraformCommandError,
    },
    #[error("blueprint source directory {} does not exist", path.display())]
    MissingSource { path: PathBuf },
    #[error("setup directory {} does not exist", path.display())]
    MissingSetup { path: PathBuf },
    #[error(transparent)]
    Command(#[from] TerraformCommandError),
    #[error(transparent)]
    Outputs(#[from] OutputError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("blueprint '{blueprint}' is not idempotent: plan after apply reports changes")]
    NotIdempotent { blueprint: String },
}
