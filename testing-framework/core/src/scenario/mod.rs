//! Blueprint test definition and the machinery that drives it.

mod assertions;
mod cloud;
mod definition;
mod lifecycle;
pub mod runtime;
mod verification;

pub use assertions::{AssertionFailure, Assertions, Emptiness};
pub use cloud::{CliRunOptions, CloudCli};
pub use definition::{BlueprintTest, BlueprintTestBuilder, Builder, ScenarioBuildError};
pub use lifecycle::{Lifecycle, LifecycleError, Stage, StageSelection};
pub use runtime::{CleanupGuard, Deployer, RunContext, RunReport, Runner, ScenarioError};
pub use verification::{Verification, VerifyFn};

/// Boxed error used by verifications and external collaborators.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
