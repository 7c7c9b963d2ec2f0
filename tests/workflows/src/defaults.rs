use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, fmt};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

/// Blueprint repository holding `examples/` and `test/setup`: `BLUEPRINT_ROOT`
/// when set, otherwise the workspace root.
#[must_use]
pub fn blueprint_root() -> PathBuf {
    blueprint_test_env::blueprint_root().unwrap_or_else(workspace_root)
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(
            || PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            Path::to_path_buf,
        )
}
