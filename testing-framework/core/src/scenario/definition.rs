use thiserror::Error;
use tracing::info;

use super::{
    Assertions, Deployer, DynError, LifecycleError, RunContext, RunReport, ScenarioError,
    StageSelection, Verification, VerifyFn,
};
use crate::Blueprint;

#[derive(Debug, Error)]
pub enum ScenarioBuildError {
    #[error("blueprint name must not be empty")]
    EmptyName,
    #[error("verification '{name}' registered more than once")]
    DuplicateVerification { name: String },
    #[error("invalid RUN_STAGE: {0}")]
    Stage(#[from] LifecycleError),
}

/// A blueprint together with the verifications to run once it is applied.
pub struct BlueprintTest {
    blueprint: Blueprint,
    verifications: Vec<Box<dyn Verification>>,
    stages: StageSelection,
}

impl BlueprintTest {
    #[must_use]
    pub fn builder(blueprint: Blueprint) -> Builder {
        Builder::new(blueprint)
    }

    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    #[must_use]
    pub fn verifications(&self) -> &[Box<dyn Verification>] {
        &self.verifications
    }

    #[must_use]
    pub fn verifications_mut(&mut self) -> &mut [Box<dyn Verification>] {
        &mut self.verifications
    }

    #[must_use]
    pub const fn stages(&self) -> StageSelection {
        self.stages
    }

    /// Drive the whole lifecycle: deploy (init + apply), verify, teardown.
    pub async fn test<D>(&mut self, deployer: &D) -> Result<RunReport, ScenarioError>
    where
        D: Deployer,
    {
        info!(
            blueprint = self.blueprint.name(),
            source = %self.blueprint.source_dir().display(),
            verifications = self.verifications.len(),
            stages = ?self.stages,
            "starting blueprint test"
        );

        let runner = deployer
            .deploy(self)
            .await
            .map_err(|err| ScenarioError::Deploy(Box::new(err)))?;

        runner.run(self).await
    }
}

/// Builder used by callers to describe a blueprint test.
pub struct Builder {
    blueprint: Blueprint,
    verifications: Vec<Box<dyn Verification>>,
    stages: Option<StageSelection>,
}

pub type BlueprintTestBuilder = Builder;

impl Builder {
    #[must_use]
    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            blueprint,
            verifications: Vec::new(),
            stages: None,
        }
    }

    /// Register a closure evaluated after apply.
    #[must_use]
    pub fn define_verify<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&RunContext, &mut Assertions) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.with_verification(VerifyFn::new(name, f))
    }

    #[must_use]
    pub fn with_verification<V>(mut self, verification: V) -> Self
    where
        V: Verification + 'static,
    {
        self.verifications.push(Box::new(verification));
        self
    }

    /// Pin the stages to run instead of reading `RUN_STAGE`.
    #[must_use]
    pub fn with_stage_selection(mut self, stages: StageSelection) -> Self {
        self.stages = Some(stages);
        self
    }

    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn build(self) -> Result<BlueprintTest, ScenarioBuildError> {
        let Self {
            blueprint,
            verifications,
            stages,
        } = self;

        if blueprint.name().trim().is_empty() {
            return Err(ScenarioBuildError::EmptyName);
        }

        let mut seen = std::collections::HashSet::new();
        for verification in &verifications {
            if !seen.insert(verification.name().to_owned()) {
                return Err(ScenarioBuildError::DuplicateVerification {
                    name: verification.name().to_owned(),
                });
            }
        }

        let stages = match stages {
            Some(stages) => stages,
            None => StageSelection::from_env()?,
        };

        Ok(BlueprintTest {
            blueprint,
            verifications,
            stages,
        })
    }
}
