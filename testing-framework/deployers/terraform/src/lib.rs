pub mod commands;
mod deployer;
mod errors;
mod lifecycle;

pub use commands::{PlanOutcome, TerraformCli, TerraformCommandError};
pub use deployer::TerraformDeployer;
pub use errors::TerraformError;
pub use lifecycle::cleanup::RunnerCleanup;
