use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blueprint_test_core::{
    Blueprint, Outputs,
    scenario::{CliRunOptions, CloudCli, DynError, RunContext},
};
use serde_json::{Value, json};

/// Cloud CLI double: records every invocation and answers from a fixed
/// table keyed by the command words.
#[derive(Default)]
pub struct FakeCloud {
    responses: Vec<(String, Value)>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeCloud {
    pub fn respond(mut self, command: &str, value: Value) -> Self {
        self.responses.push((command.to_owned(), value));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudCli for FakeCloud {
    async fn run(&self, args: &[String], options: &CliRunOptions) -> Result<Value, DynError> {
        let mut call = args.to_vec();
        call.extend(options.common_args().iter().cloned());
        self.calls.lock().unwrap().push(call);

        let command = args.join(" ");
        self.responses
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| format!("no canned response for '{command}'").into())
    }
}

pub fn context(cloud: Option<Arc<FakeCloud>>) -> RunContext {
    RunContext::new(
        Blueprint::new("simple_example", "/tmp/examples/simple_example"),
        Outputs::from_values("setup", [("project_id", json!("teste"))]),
        Outputs::empty("blueprint"),
        cloud.map(|cloud| cloud as Arc<dyn CloudCli>),
    )
}
