use std::{fmt, str::FromStr};

use blueprint_test_env as bt_env;
use thiserror::Error;
use tracing::{debug, info};

/// Lifecycle stage of a blueprint run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Init,
    Apply,
    Verify,
    Teardown,
}

impl Stage {
    pub const ALL: [Self; 4] = [Self::Init, Self::Apply, Self::Verify, Self::Teardown];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Apply => "apply",
            Self::Verify => "verify",
            Self::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = LifecycleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| LifecycleError::UnknownStage {
                value: value.to_owned(),
            })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("unknown stage '{value}' (expected one of init, apply, verify, teardown)")]
    UnknownStage { value: String },
    #[error("cannot enter stage {requested} after {current}")]
    OutOfOrder { current: Stage, requested: Stage },
}

/// Which stages a run executes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageSelection {
    #[default]
    All,
    Only(Stage),
}

impl StageSelection {
    /// Read `RUN_STAGE`; unset selects every stage.
    pub fn from_env() -> Result<Self, LifecycleError> {
        Self::parse(bt_env::run_stage().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Result<Self, LifecycleError> {
        match value {
            None => Ok(Self::All),
            Some(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("all") => {
                Ok(Self::All)
            }
            Some(raw) => raw.parse().map(Self::Only),
        }
    }

    #[must_use]
    pub fn includes(self, stage: Stage) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == stage,
        }
    }
}

/// One-way walk through `init → apply → verify → teardown`.
#[derive(Debug)]
pub struct Lifecycle {
    selection: StageSelection,
    current: Option<Stage>,
    executed: Vec<Stage>,
}

impl Lifecycle {
    #[must_use]
    pub const fn new(selection: StageSelection) -> Self {
        Self {
            selection,
            current: None,
            executed: Vec::new(),
        }
    }

    /// Move to `stage`. Returns whether the stage should execute under the
    /// current selection. Stages can only be entered in order, once.
    pub fn enter(&mut self, stage: Stage) -> Result<bool, LifecycleError> {
        if let Some(current) = self.current {
            if stage <= current {
                return Err(LifecycleError::OutOfOrder {
                    current,
                    requested: stage,
                });
            }
        }

        self.current = Some(stage);
        if self.selection.includes(stage) {
            info!(%stage, "entering stage");
            self.executed.push(stage);
            Ok(true)
        } else {
            debug!(%stage, selection = ?self.selection, "stage not selected; skipping");
            Ok(false)
        }
    }

    #[must_use]
    pub const fn selection(&self) -> StageSelection {
        self.selection
    }

    #[must_use]
    pub const fn current(&self) -> Option<Stage> {
        self.current
    }

    #[must_use]
    pub fn executed(&self) -> &[Stage] {
        &self.executed
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current == Some(Stage::Teardown)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn stages_advance_in_order() {
        let mut lifecycle = Lifecycle::new(StageSelection::All);

        for stage in Stage::ALL {
            assert_eq!(lifecycle.enter(stage), Ok(true));
        }

        assert!(lifecycle.is_finished());
        assert_eq!(lifecycle.executed(), &Stage::ALL);
    }

    #[test]
    fn stages_cannot_repeat_or_go_back() {
        let mut lifecycle = Lifecycle::new(StageSelection::All);
        lifecycle.enter(Stage::Verify).unwrap();

        assert_eq!(
            lifecycle.enter(Stage::Verify),
            Err(LifecycleError::OutOfOrder {
                current: Stage::Verify,
                requested: Stage::Verify,
            })
        );
        assert!(lifecycle.enter(Stage::Apply).is_err());
        assert!(lifecycle.enter(Stage::Teardown).is_ok());
    }

    #[test]
    fn selection_skips_unselected_stages() {
        let mut lifecycle = Lifecycle::new(StageSelection::Only(Stage::Verify));

        assert_eq!(lifecycle.enter(Stage::Init), Ok(false));
        assert_eq!(lifecycle.enter(Stage::Apply), Ok(false));
        assert_eq!(lifecycle.enter(Stage::Verify), Ok(true));
        assert_eq!(lifecycle.enter(Stage::Teardown), Ok(false));
        assert_eq!(lifecycle.executed(), &[Stage::Verify]);
    }

    #[test]
    fn parses_stage_names() {
        assert_eq!(StageSelection::parse(None), Ok(StageSelection::All));
        assert_eq!(StageSelection::parse(Some("all")), Ok(StageSelection::All));
        assert_eq!(
            StageSelection::parse(Some(" Teardown ")),
            Ok(StageSelection::Only(Stage::Teardown))
        );
        assert!(matches!(
            StageSelection::parse(Some("plan")),
            Err(LifecycleError::UnknownStage { .. })
        ));
    }

    #[test]
    #[serial]
    fn selection_reads_run_stage() {
        // SAFETY: serialised with every other env-mutating test.
        unsafe {
            std::env::set_var("RUN_STAGE", "apply");
        }
        assert_eq!(
            StageSelection::from_env(),
            Ok(StageSelection::Only(Stage::Apply))
        );
        unsafe {
            std::env::remove_var("RUN_STAGE");
        }
        assert_eq!(StageSelection::from_env(), Ok(StageSelection::All));
    }
}
