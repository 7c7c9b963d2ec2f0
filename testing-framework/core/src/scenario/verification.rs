use async_trait::async_trait;

use super::{Assertions, DynError, runtime::RunContext};

/// A check evaluated after the blueprint has been applied.
///
/// Returning an error aborts the verification (for example a missing output
/// or a failed CLI call). Failed assertions are recorded on `assert` and do
/// not abort it.
#[async_trait]
pub trait Verification: Send + Sync {
    fn name(&self) -> &str;

    async fn verify(&mut self, ctx: &RunContext, assert: &mut Assertions) -> Result<(), DynError>;
}

/// Adapts a synchronous closure into a [`Verification`].
pub struct VerifyFn<F> {
    name: String,
    f: F,
}

impl<F> VerifyFn<F>
where
    F: FnMut(&RunContext, &mut Assertions) -> Result<(), DynError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> Verification for VerifyFn<F>
where
    F: FnMut(&RunContext, &mut Assertions) -> Result<(), DynError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn verify(&mut self, ctx: &RunContext, assert: &mut Assertions) -> Result<(), DynError> {
        (self.f)(ctx, assert)
    }
}
