use std::path::Path;

use blueprint_test_core::{
    Blueprint, Outputs,
    scenario::{BlueprintTest, Lifecycle, RunContext, Runner, Stage},
};
use tracing::{info, warn};

use super::{
    TerraformDeployer,
    setup::{DeploymentContext, DeploymentSetup},
};
use crate::{commands::PlanOutcome, errors::TerraformError, lifecycle::cleanup::RunnerCleanup};

pub struct DeploymentOrchestrator<'a> {
    deployer: &'a TerraformDeployer,
}

impl<'a> DeploymentOrchestrator<'a> {
    pub const fn new(deployer: &'a TerraformDeployer) -> Self {
        Self { deployer }
    }

    pub async fn deploy(&self, test: &BlueprintTest) -> Result<Runner, TerraformError> {
        let cli = &self.deployer.cli;
        let setup = DeploymentSetup::new(test.blueprint());
        setup.validate_environment(cli).await?;

        let DeploymentContext {
            blueprint,
            setup_outputs,
            vars,
        } = setup.prepare(cli).await?;
        let dir = blueprint.source_dir().to_path_buf();
        let mut lifecycle = Lifecycle::new(test.stages());

        if lifecycle.enter(Stage::Init)? {
            cli.init(&dir, &vars).await?;
        }

        if lifecycle.enter(Stage::Apply)? {
            if let Err(err) = self.apply_and_check(&blueprint, &dir, &vars).await {
                self.release_after_failure(test, &dir, &vars).await;
                return Err(err);
            }
        }

        let outputs = if test.stages().includes(Stage::Verify) {
            match self.read_outputs(&dir).await {
                Ok(outputs) => outputs,
                Err(err) => {
                    self.release_after_failure(test, &dir, &vars).await;
                    return Err(err);
                }
            }
        } else {
            Outputs::empty("blueprint")
        };

        let cleanup_guard = RunnerCleanup::new(cli.clone(), dir, vars, self.deployer.preserve);

        info!(
            blueprint = blueprint.name(),
            outputs = outputs.len(),
            setup_outputs = setup_outputs.len(),
            preserve = self.deployer.preserve,
            "terraform deployment ready; handing control to blueprint runner"
        );

        let cloud = self.deployer.cloud.clone();
        let context = RunContext::new(blueprint, setup_outputs, outputs, cloud);
        Ok(Runner::new(context, lifecycle, Some(Box::new(cleanup_guard))))
    }

    async fn apply_and_check(
        &self,
        blueprint: &Blueprint,
        dir: &Path,
        vars: &[(String, String)],
    ) -> Result<(), TerraformError> {
        let cli = &self.deployer.cli;
        cli.apply(dir, vars).await?;

        if self.deployer.idempotency_check && cli.plan(dir, vars).await? == PlanOutcome::Changes {
            warn!(blueprint = blueprint.name(), "plan after apply reports changes");
            return Err(TerraformError::NotIdempotent {
                blueprint: blueprint.name().to_owned(),
            });
        }

        Ok(())
    }

    async fn read_outputs(&self, dir: &Path) -> Result<Outputs, TerraformError> {
        let raw = self.deployer.cli.output_json(dir).await?;
        Ok(Outputs::from_terraform_json("blueprint", &raw)?)
    }

    /// Releases whatever a failed deployment left behind, unless the run is
    /// not allowed to tear down.
    async fn release_after_failure(
        &self,
        test: &BlueprintTest,
        dir: &Path,
        vars: &[(String, String)],
    ) {
        if self.deployer.preserve || !test.stages().includes(Stage::Teardown) {
            info!(dir = %dir.display(), "deployment failed; leaving infrastructure in place");
            return;
        }

        warn!(dir = %dir.display(), "deployment failed; destroying infrastructure");
        if let Err(err) = self.deployer.cli.destroy(dir, vars).await {
            warn!(error = %err, "destroy after failed deployment also failed");
        }
    }
}
