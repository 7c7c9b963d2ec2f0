use std::process;

use anyhow::{Context as _, Result};
use blueprint_test_runner_terraform::TerraformDeployer;
use tests_workflows::{BucketLookup, defaults, plans};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    defaults::init_tracing();

    let root = defaults::blueprint_root();
    info!(root = %root.display(), "starting simple_example blueprint run");

    if let Err(err) = run_simple_example(&root).await {
        warn!("simple_example blueprint run failed: {err:#}");
        process::exit(1);
    }
}

async fn run_simple_example(root: &std::path::Path) -> Result<()> {
    let mut test = plans::simple_example(root, BucketLookup::default())
        .build()
        .context("building simple_example test")?;

    let deployer = TerraformDeployer::new();
    let report = test
        .test(&deployer)
        .await
        .context("running simple_example blueprint")?;

    info!(
        verifications = report.verifications.len(),
        assertions = report.assertions_checked,
        stages = ?report.stages,
        torn_down = report.torn_down,
        "simple_example blueprint passed"
    );
    Ok(())
}
