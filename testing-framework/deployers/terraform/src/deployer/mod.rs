mod orchestrator;
mod setup;

use std::sync::Arc;

use async_trait::async_trait;
use blueprint_test_core::scenario::{BlueprintTest, CloudCli, Deployer, Runner};
use blueprint_test_gcloud::Gcloud;

use self::orchestrator::DeploymentOrchestrator;
use crate::{commands::TerraformCli, errors::TerraformError};

/// Applies a blueprint with the `terraform` CLI and hands the result to the
/// blueprint runner.
#[derive(Clone)]
pub struct TerraformDeployer {
    cli: TerraformCli,
    preserve: bool,
    idempotency_check: bool,
    cloud: Option<Arc<dyn CloudCli>>,
}

impl Default for TerraformDeployer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerraformDeployer {
    /// Terraform and gcloud from the environment, preservation from
    /// `BLUEPRINT_TEST_PRESERVE`, no idempotency check.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cli: TerraformCli::default(),
            preserve: blueprint_test_env::blueprint_test_preserve(),
            idempotency_check: false,
            cloud: Some(Arc::new(Gcloud::default())),
        }
    }

    #[must_use]
    pub fn with_cli(mut self, cli: TerraformCli) -> Self {
        self.cli = cli;
        self
    }

    /// Keep infrastructure after the run instead of destroying it.
    #[must_use]
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    /// Fail deployment when `terraform plan` reports changes right after
    /// apply.
    #[must_use]
    pub fn with_idempotency_check(mut self, enabled: bool) -> Self {
        self.idempotency_check = enabled;
        self
    }

    #[must_use]
    pub fn with_cloud(mut self, cloud: Arc<dyn CloudCli>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    #[must_use]
    pub fn without_cloud(mut self) -> Self {
        self.cloud = None;
        self
    }

    #[must_use]
    pub const fn cli(&self) -> &TerraformCli {
        &self.cli
    }

    #[must_use]
    pub const fn preserve(&self) -> bool {
        self.preserve
    }
}

#[async_trait]
impl Deployer for TerraformDeployer {
    type Error = TerraformError;

    async fn deploy(&self, test: &BlueprintTest) -> Result<Runner, Self::Error> {
        DeploymentOrchestrator::new(self).deploy(test).await
    }
}
