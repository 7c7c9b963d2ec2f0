use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use blueprint_test_config::constants::{DEFAULT_EXAMPLES_DIR_REL, DEFAULT_SETUP_DIR_REL};

/// A Terraform configuration under test.
///
/// The source directory is always explicit; nothing is derived from the
/// current working directory.
#[derive(Clone, Debug)]
pub struct Blueprint {
    name: String,
    source_dir: PathBuf,
    setup_dir: Option<PathBuf>,
    vars: BTreeMap<String, String>,
}

impl Blueprint {
    #[must_use]
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            setup_dir: None,
            vars: BTreeMap::new(),
        }
    }

    /// Resolve `examples/<name>` under a blueprint repository root, wired to
    /// the repository's `test/setup` module.
    #[must_use]
    pub fn example(root: &Path, name: &str) -> Self {
        Self::new(name, root.join(DEFAULT_EXAMPLES_DIR_REL).join(name))
            .with_setup_dir(root.join(DEFAULT_SETUP_DIR_REL))
    }

    /// Directory of an already applied setup module whose outputs feed this
    /// blueprint.
    #[must_use]
    pub fn with_setup_dir(mut self, setup_dir: impl Into<PathBuf>) -> Self {
        self.setup_dir = Some(setup_dir.into());
        self
    }

    /// Input variable passed to the blueprint; overrides a setup output of the
    /// same name.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    #[must_use]
    pub fn setup_dir(&self) -> Option<&Path> {
        self.setup_dir.as_deref()
    }

    #[must_use]
    pub const fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}
