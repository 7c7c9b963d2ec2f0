use std::{env, path::PathBuf};

#[must_use]
pub fn slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true")
}

/// Raw value of `RUN_STAGE`, used to limit a run to a single lifecycle stage.
#[must_use]
pub fn run_stage() -> Option<String> {
    env::var("RUN_STAGE")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// `BLUEPRINT_TEST_PRESERVE` set to `1`, `true` or `yes` keeps infrastructure
/// after the run.
#[must_use]
pub fn blueprint_test_preserve() -> bool {
    env::var("BLUEPRINT_TEST_PRESERVE").is_ok_and(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[must_use]
pub fn terraform_binary() -> Option<String> {
    env::var("TERRAFORM_BINARY")
        .ok()
        .filter(|value| !value.is_empty())
}

#[must_use]
pub fn gcloud_binary() -> Option<String> {
    env::var("GCLOUD_BINARY")
        .ok()
        .filter(|value| !value.is_empty())
}

/// Directory holding the blueprint repository (the one containing
/// `examples/` and `test/setup`).
#[must_use]
pub fn blueprint_root() -> Option<PathBuf> {
    env::var("BLUEPRINT_ROOT").ok().map(PathBuf::from)
}

#[must_use]
pub fn tf_init_timeout_secs() -> Option<u64> {
    env::var("TF_INIT_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}

#[must_use]
pub fn tf_apply_timeout_secs() -> Option<u64> {
    env::var("TF_APPLY_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}

#[must_use]
pub fn tf_destroy_timeout_secs() -> Option<u64> {
    env::var("TF_DESTROY_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}

#[must_use]
pub fn gcloud_timeout_secs() -> Option<u64> {
    env::var("GCLOUD_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}
