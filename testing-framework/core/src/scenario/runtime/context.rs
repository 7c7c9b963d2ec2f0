use std::sync::Arc;

use crate::{
    Blueprint,
    outputs::{OutputError, Outputs},
    scenario::{CloudCli, DynError, Stage},
};

/// Everything a verification can observe about an applied blueprint.
///
/// Built once by the deployer and read-only afterwards.
pub struct RunContext {
    blueprint: Blueprint,
    setup_outputs: Outputs,
    outputs: Outputs,
    cloud: Option<Arc<dyn CloudCli>>,
}

impl RunContext {
    #[must_use]
    pub fn new(
        blueprint: Blueprint,
        setup_outputs: Outputs,
        outputs: Outputs,
        cloud: Option<Arc<dyn CloudCli>>,
    ) -> Self {
        Self {
            blueprint,
            setup_outputs,
            outputs,
            cloud,
        }
    }

    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    #[must_use]
    pub const fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    #[must_use]
    pub const fn setup_outputs(&self) -> &Outputs {
        &self.setup_outputs
    }

    /// String output of the blueprint under test.
    pub fn string_output(&self, name: &str) -> Result<String, OutputError> {
        self.outputs.string(name)
    }

    /// String output of the setup module.
    pub fn setup_string_output(&self, name: &str) -> Result<String, OutputError> {
        self.setup_outputs.string(name)
    }

    #[must_use]
    pub fn cloud(&self) -> Option<&Arc<dyn CloudCli>> {
        self.cloud.as_ref()
    }

    pub fn require_cloud(&self) -> Result<&dyn CloudCli, DynError> {
        self.cloud
            .as_deref()
            .ok_or_else(|| "cloud CLI is not configured for this run".into())
    }
}

/// Releases whatever a deployer provisioned. Called at most once per run.
pub trait CleanupGuard: Send {
    fn cleanup(self: Box<Self>) -> Result<(), DynError>;
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub blueprint: String,
    pub verifications: Vec<String>,
    pub assertions_checked: usize,
    pub stages: Vec<Stage>,
    pub torn_down: bool,
}
