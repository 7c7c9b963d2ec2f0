mod context;
mod deployer;
mod runner;

pub use context::{CleanupGuard, RunContext, RunReport};
pub use deployer::{Deployer, ScenarioError};
pub use runner::Runner;
