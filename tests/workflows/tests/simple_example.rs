use std::{fs, path::Path};

use blueprint_test_core::scenario::{ScenarioError, Stage, StageSelection};
use blueprint_test_runner_terraform::{TerraformCli, TerraformDeployer};
use serial_test::serial;
use tempfile::TempDir;
use tests_workflows::{BucketLookup, defaults, plans};

#[tokio::test]
#[ignore = "requires terraform, gcloud and cloud credentials"]
async fn simple_example() {
    defaults::init_tracing();

    let mut test = plans::simple_example(&defaults::blueprint_root(), BucketLookup::default())
        .build()
        .expect("simple_example test definition");

    let report = test
        .test(&TerraformDeployer::new())
        .await
        .expect("simple_example blueprint");

    assert_eq!(report.verifications, ["project", "buckets_exist"]);
}

const SHIM: &str = r#"set -eu
cmd="$1"
[ "$cmd" = "version" ] && exit 0
echo "$(basename "$PWD") $cmd" >> "__LOG__"
if [ "$cmd" = "output" ]; then
  if [ -f outputs.json ]; then cat outputs.json; else echo '{}'; fi
fi
"#;

fn blueprint_repo(project_id: &str) -> TempDir {
    let root = TempDir::new().unwrap();
    let setup = root.path().join("test/setup");
    fs::create_dir_all(&setup).unwrap();
    let example = root.path().join("examples/simple_example");
    fs::create_dir_all(&example).unwrap();
    fs::write(
        setup.join("outputs.json"),
        format!(r#"{{"project_id": {{"sensitive": false, "type": "string", "value": "{project_id}"}}}}"#),
    )
    .unwrap();
    fs::write(
        root.path().join("terraform-shim"),
        SHIM.replace("__LOG__", &log_path(root.path())),
    )
    .unwrap();
    root
}

fn log_path(root: &Path) -> String {
    root.join("calls.log").display().to_string()
}

fn shim_deployer(root: &Path) -> TerraformDeployer {
    let shim = root.join("terraform-shim").display().to_string();
    TerraformDeployer::new()
        .with_cli(TerraformCli::new("sh").with_leading_args([shim]))
        .with_preserve(false)
        .without_cloud()
}

fn calls(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn stubbed_simple_example_passes_and_tears_down() {
    let repo = blueprint_repo("teste");
    let mut test = plans::simple_example(repo.path(), BucketLookup::Stubbed)
        .with_stage_selection(StageSelection::All)
        .build()
        .unwrap();

    let report = test.test(&shim_deployer(repo.path())).await.unwrap();

    assert_eq!(report.verifications, ["project", "buckets_exist"]);
    assert_eq!(report.assertions_checked, 3);
    assert!(report.torn_down);
    assert_eq!(
        calls(repo.path()),
        [
            "setup output",
            "simple_example init",
            "simple_example apply",
            "simple_example output",
            "simple_example destroy",
        ]
    );
}

#[tokio::test]
async fn empty_project_id_fails_after_teardown() {
    let repo = blueprint_repo("");
    let mut test = plans::simple_example(repo.path(), BucketLookup::Stubbed)
        .with_stage_selection(StageSelection::All)
        .build()
        .unwrap();

    let err = test.test(&shim_deployer(repo.path())).await.unwrap_err();

    match err {
        ScenarioError::Assertions { count, summary } => {
            assert_eq!(count, 1);
            assert!(summary.contains("project: project_id should not be empty"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        calls(repo.path()).last().map(String::as_str),
        Some("simple_example destroy")
    );
}

#[tokio::test]
#[serial]
async fn run_stage_verify_reuses_existing_state() {
    let repo = blueprint_repo("teste");
    // SAFETY: serialised with every other test that reads RUN_STAGE.
    unsafe { std::env::set_var("RUN_STAGE", "verify") };
    let built = plans::simple_example(repo.path(), BucketLookup::Stubbed).build();
    // SAFETY: as above.
    unsafe { std::env::remove_var("RUN_STAGE") };
    let mut test = built.unwrap();

    let report = test.test(&shim_deployer(repo.path())).await.unwrap();

    assert_eq!(report.stages, [Stage::Verify]);
    assert!(!report.torn_down);
    assert_eq!(
        calls(repo.path()),
        ["setup output", "simple_example output"]
    );
}
