use std::path::{Path, PathBuf};

use blueprint_test_core::{Blueprint, Outputs};
use tracing::info;

use crate::{commands::TerraformCli, errors::TerraformError};

pub struct DeploymentSetup {
    blueprint: Blueprint,
}

/// Everything the orchestrator needs once the environment is validated.
pub struct DeploymentContext {
    pub blueprint: Blueprint,
    pub setup_outputs: Outputs,
    pub vars: Vec<(String, String)>,
}

impl DeploymentSetup {
    pub fn new(blueprint: &Blueprint) -> Self {
        Self {
            blueprint: blueprint.clone(),
        }
    }

    pub async fn validate_environment(&self, cli: &TerraformCli) -> Result<(), TerraformError> {
        ensure_dir(self.blueprint.source_dir())
            .map_err(|path| TerraformError::MissingSource { path })?;
        if let Some(setup) = self.blueprint.setup_dir() {
            ensure_dir(setup).map_err(|path| TerraformError::MissingSetup { path })?;
        }

        cli.ensure_available()
            .await
            .map_err(|source| TerraformError::Unavailable {
                program: cli.program().to_owned(),
                source,
            })?;

        info!(
            blueprint = self.blueprint.name(),
            source = %self.blueprint.source_dir().display(),
            setup = ?self.blueprint.setup_dir(),
            "starting terraform deployment"
        );

        Ok(())
    }

    /// Reads the setup module's outputs and derives the blueprint's input
    /// variables from them.
    pub async fn prepare(self, cli: &TerraformCli) -> Result<DeploymentContext, TerraformError> {
        let setup_outputs = match self.blueprint.setup_dir() {
            Some(dir) => {
                let raw = cli.output_json(dir).await?;
                Outputs::from_terraform_json("setup", &raw)?
            }
            None => Outputs::empty("setup"),
        };

        let vars = input_vars(&setup_outputs, &self.blueprint);

        info!(
            setup_outputs = setup_outputs.len(),
            vars = vars.len(),
            "terraform inputs prepared"
        );

        Ok(DeploymentContext {
            blueprint: self.blueprint,
            setup_outputs,
            vars,
        })
    }
}

/// Setup outputs first, then explicit blueprint variables, which replace any
/// setup output of the same name.
pub fn input_vars(setup_outputs: &Outputs, blueprint: &Blueprint) -> Vec<(String, String)> {
    let mut vars: Vec<(String, String)> = setup_outputs
        .as_input_vars()
        .into_iter()
        .filter(|(name, _)| !blueprint.vars().contains_key(name))
        .collect();
    vars.extend(
        blueprint
            .vars()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    vars
}

fn ensure_dir(path: &Path) -> Result<(), PathBuf> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blueprint_vars_override_setup_outputs() {
        let setup = Outputs::from_values(
            "setup",
            [
                ("project_id", json!("teste")),
                ("region", json!("us-east1")),
            ],
        );
        let blueprint = Blueprint::new("simple_example", "/tmp/simple_example")
            .with_var("region", "europe-west1");

        let vars = input_vars(&setup, &blueprint);

        assert_eq!(
            vars,
            vec![
                ("project_id".to_owned(), "teste".to_owned()),
                ("region".to_owned(), "europe-west1".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_source_dir_is_reported_before_terraform_runs() {
        let blueprint = Blueprint::new("absent", "/nonexistent/examples/absent");
        let setup = DeploymentSetup::new(&blueprint);

        let err = setup
            .validate_environment(&TerraformCli::new("/nonexistent/bin/terraform"))
            .await
            .unwrap_err();

        assert!(matches!(err, TerraformError::MissingSource { .. }));
    }
}
