use std::fmt::{self, Debug};

use serde_json::Value;
use tracing::{debug, warn};

/// Values that can be checked by [`Assertions::not_empty`].
pub trait Emptiness {
    fn is_empty_value(&self) -> bool;
}

impl Emptiness for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Emptiness> Emptiness for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().is_none_or(Emptiness::is_empty_value)
    }
}

impl Emptiness for Value {
    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(value) => !value,
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::String(value) => value.is_empty(),
            Value::Array(values) => values.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }
}

/// A single failed check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionFailure {
    pub scope: String,
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)
    }
}

/// Records check outcomes for one verification.
///
/// Failed checks do not stop the verification; they are collected and fail
/// the run once teardown has completed.
#[derive(Debug, Default)]
pub struct Assertions {
    scope: String,
    checked: usize,
    failures: Vec<AssertionFailure>,
}

impl Assertions {
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            checked: 0,
            failures: Vec::new(),
        }
    }

    /// Passes when `value` holds something.
    pub fn not_empty<T>(&mut self, label: &str, value: &T) -> bool
    where
        T: Emptiness + Debug + ?Sized,
    {
        let ok = !value.is_empty_value();
        self.record(ok, || format!("{label} should not be empty, got {value:?}"))
    }

    pub fn equal<T>(&mut self, expected: &T, actual: &T, message: impl Into<String>) -> bool
    where
        T: PartialEq + Debug + ?Sized,
    {
        let ok = expected == actual;
        let message = message.into();
        self.record(ok, || {
            format!("{message}: expected {expected:?}, got {actual:?}")
        })
    }

    pub fn is_true(&mut self, condition: bool, message: impl Into<String>) -> bool {
        let message = message.into();
        self.record(condition, || message)
    }

    /// Record an unconditional failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.record(false, || message);
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub const fn checked(&self) -> usize {
        self.checked
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    #[must_use]
    pub fn into_failures(self) -> Vec<AssertionFailure> {
        self.failures
    }

    fn record(&mut self, ok: bool, message: impl FnOnce() -> String) -> bool {
        self.checked += 1;
        if ok {
            debug!(scope = %self.scope, check = self.checked, "assertion passed");
            return true;
        }

        let failure = AssertionFailure {
            scope: self.scope.clone(),
            message: message(),
        };
        warn!(scope = %failure.scope, message = %failure.message, "assertion failed");
        self.failures.push(failure);
        false
    }
}
