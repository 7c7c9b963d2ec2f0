use async_trait::async_trait;
use thiserror::Error;

use crate::scenario::{BlueprintTest, DynError, LifecycleError, Runner};

/// Error returned when a blueprint run fails.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("deployment failed: {0}")]
    Deploy(#[source] DynError),
    #[error("verification '{name}' aborted: {source}")]
    Verification {
        name: String,
        #[source]
        source: DynError,
    },
    #[error("{count} assertion(s) failed:\n{summary}")]
    Assertions { count: usize, summary: String },
    #[error("teardown failed: {0}")]
    Teardown(#[source] DynError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Provisions a blueprint and hands back a [`Runner`] owning its teardown.
#[async_trait]
pub trait Deployer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn deploy(&self, test: &BlueprintTest) -> Result<Runner, Self::Error>;
}
