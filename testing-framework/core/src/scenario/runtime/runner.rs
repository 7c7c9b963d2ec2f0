use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt as _;
use tracing::{info, warn};

use super::{
    context::{CleanupGuard, RunContext, RunReport},
    deployer::ScenarioError,
};
use crate::scenario::{
    AssertionFailure, Assertions, BlueprintTest, DynError, Lifecycle, Stage, Verification,
};

/// Represents an applied blueprint ready for verification.
///
/// The runner owns the cleanup guard: teardown happens exactly once, either
/// at the end of [`Runner::run`] or when the runner is dropped.
pub struct Runner {
    context: Arc<RunContext>,
    lifecycle: Lifecycle,
    cleanup_guard: Option<Box<dyn CleanupGuard>>,
}

#[derive(Default)]
struct VerifyOutcome {
    names: Vec<String>,
    checked: usize,
    failures: Vec<AssertionFailure>,
    aborted: Option<(String, DynError)>,
}

impl Runner {
    /// Construct a runner from the run context, the lifecycle as left by the
    /// deployer, and an optional cleanup guard.
    #[must_use]
    pub fn new(
        context: RunContext,
        lifecycle: Lifecycle,
        cleanup_guard: Option<Box<dyn CleanupGuard>>,
    ) -> Self {
        Self {
            context: Arc::new(context),
            lifecycle,
            cleanup_guard,
        }
    }

    /// Access the underlying run context.
    #[must_use]
    pub fn context(&self) -> Arc<RunContext> {
        Arc::clone(&self.context)
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Runs every verification, then tears the blueprint down. Teardown
    /// happens whatever the verifications report; their failures are returned
    /// afterwards.
    pub async fn run(mut self, test: &mut BlueprintTest) -> Result<RunReport, ScenarioError> {
        let context = self.context();

        let outcome = if self.lifecycle.enter(Stage::Verify)? {
            Self::run_verifications(test.verifications_mut(), context.as_ref()).await
        } else {
            VerifyOutcome::default()
        };

        let teardown = self.teardown();

        if let Some((name, source)) = outcome.aborted {
            if let Err(err) = teardown {
                warn!(error = %err, "teardown failed after aborted verification");
            }
            return Err(ScenarioError::Verification { name, source });
        }

        if !outcome.failures.is_empty() {
            if let Err(err) = teardown {
                warn!(error = %err, "teardown failed after assertion failures");
            }
            let summary = outcome
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ScenarioError::Assertions {
                count: outcome.failures.len(),
                summary,
            });
        }

        let torn_down = teardown?;

        info!(
            blueprint = context.blueprint().name(),
            verifications = outcome.names.len(),
            assertions = outcome.checked,
            torn_down,
            "blueprint run completed"
        );

        Ok(RunReport {
            blueprint: context.blueprint().name().to_owned(),
            verifications: outcome.names,
            assertions_checked: outcome.checked,
            stages: self.lifecycle.executed().to_vec(),
            torn_down,
        })
    }

    /// Evaluates verifications in registration order. Assertion failures are
    /// aggregated; an error or panic stops the remaining verifications.
    async fn run_verifications(
        verifications: &mut [Box<dyn Verification>],
        context: &RunContext,
    ) -> VerifyOutcome {
        let mut outcome = VerifyOutcome::default();

        for verification in verifications {
            let name = verification.name().to_owned();
            let mut assert = Assertions::new(name.clone());
            info!(verification = %name, "running verification");

            let result = AssertUnwindSafe(verification.verify(context, &mut assert))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let message = panic_message(panic);
                    Err(format!("verification panicked: {message}").into())
                });

            outcome.checked += assert.checked();
            outcome.failures.extend(assert.into_failures());
            outcome.names.push(name.clone());

            if let Err(source) = result {
                warn!(verification = %name, error = %source, "verification aborted");
                outcome.aborted = Some((name, source));
                break;
            }
        }

        outcome
    }

    fn teardown(&mut self) -> Result<bool, ScenarioError> {
        if !self.lifecycle.enter(Stage::Teardown)? {
            if self.cleanup_guard.take().is_some() {
                info!("teardown stage not selected; leaving infrastructure in place");
            }
            return Ok(false);
        }

        self.cleanup().map_err(ScenarioError::Teardown)
    }

    fn cleanup(&mut self) -> Result<bool, DynError> {
        match self.cleanup_guard.take() {
            Some(guard) => guard.cleanup().map(|()| true),
            None => Ok(false),
        }
    }
}

/// Attempts to turn a panic payload into a readable string for diagnostics.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic.downcast::<String>().map_or_else(
        |panic| {
            panic.downcast::<&'static str>().map_or_else(
                |_| "unknown panic".to_owned(),
                |message| (*message).to_owned(),
            )
        },
        |message| *message,
    )
}

impl Drop for Runner {
    fn drop(&mut self) {
        if let Err(err) = self.cleanup() {
            warn!(error = %err, "teardown on drop failed");
        }
    }
}
