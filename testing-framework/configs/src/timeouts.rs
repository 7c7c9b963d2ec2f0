use std::time::Duration;

use blueprint_test_env as bt_env;

pub const TF_INIT_TIMEOUT_SECS: u64 = 5 * 60;
pub const TF_APPLY_TIMEOUT_SECS: u64 = 30 * 60;
pub const TF_DESTROY_TIMEOUT_SECS: u64 = 30 * 60;
pub const TF_OUTPUT_TIMEOUT_SECS: u64 = 60;
pub const GCLOUD_TIMEOUT_SECS: u64 = 2 * 60;

fn env_duration(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.unwrap_or(default))
}

pub fn tf_init_timeout() -> Duration {
    env_duration(bt_env::tf_init_timeout_secs(), TF_INIT_TIMEOUT_SECS)
}

pub fn tf_apply_timeout() -> Duration {
    env_duration(bt_env::tf_apply_timeout_secs(), TF_APPLY_TIMEOUT_SECS)
}

pub fn tf_destroy_timeout() -> Duration {
    env_duration(bt_env::tf_destroy_timeout_secs(), TF_DESTROY_TIMEOUT_SECS)
}

pub fn tf_output_timeout() -> Duration {
    Duration::from_secs(TF_OUTPUT_TIMEOUT_SECS)
}

pub fn gcloud_timeout() -> Duration {
    env_duration(bt_env::gcloud_timeout_secs(), GCLOUD_TIMEOUT_SECS)
}
