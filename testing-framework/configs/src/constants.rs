use blueprint_test_env as bt_env;

/// Binary invoked when `TERRAFORM_BINARY` is unset.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Binary invoked when `GCLOUD_BINARY` is unset.
pub const DEFAULT_GCLOUD_BINARY: &str = "gcloud";

/// Setup module location relative to the blueprint root.
pub const DEFAULT_SETUP_DIR_REL: &str = "test/setup";

/// Example blueprints live under this directory of the blueprint root.
pub const DEFAULT_EXAMPLES_DIR_REL: &str = "examples";

/// Prefix Terraform uses to read input variables from the environment.
pub const TF_VAR_PREFIX: &str = "TF_VAR_";

/// Resolve the terraform binary from `TERRAFORM_BINARY`, falling back to the
/// default.
pub fn terraform_binary() -> String {
    bt_env::terraform_binary().unwrap_or_else(|| DEFAULT_TERRAFORM_BINARY.to_owned())
}

/// Resolve the gcloud binary from `GCLOUD_BINARY`, falling back to the
/// default.
pub fn gcloud_binary() -> String {
    bt_env::gcloud_binary().unwrap_or_else(|| DEFAULT_GCLOUD_BINARY.to_owned())
}
