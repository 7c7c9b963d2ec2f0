use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading blueprint outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{origin} output '{name}' not found (available: {available})")]
    Missing {
        origin: &'static str,
        name: String,
        available: String,
    },
    #[error("{origin} output '{name}' is not a string (found {kind})")]
    NotAString {
        origin: &'static str,
        name: String,
        kind: &'static str,
    },
    #[error("failed to parse {origin} outputs: {source}")]
    Parse {
        origin: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    value: Value,
    #[serde(default)]
    sensitive: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct OutputValue {
    value: Value,
    sensitive: bool,
}

/// Named values published by an applied Terraform configuration.
///
/// Lookups never default: asking for an absent name is an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    origin: &'static str,
    values: BTreeMap<String, OutputValue>,
}

impl Outputs {
    #[must_use]
    pub fn empty(origin: &'static str) -> Self {
        Self {
            origin,
            values: BTreeMap::new(),
        }
    }

    /// Parse the document printed by `terraform output -json`.
    pub fn from_terraform_json(origin: &'static str, raw: &str) -> Result<Self, OutputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty(origin));
        }

        let parsed: BTreeMap<String, RawOutput> = serde_json::from_str(trimmed)
            .map_err(|source| OutputError::Parse { origin, source })?;

        let values = parsed
            .into_iter()
            .map(|(name, raw)| {
                (
                    name,
                    OutputValue {
                        value: raw.value,
                        sensitive: raw.sensitive,
                    },
                )
            })
            .collect();

        Ok(Self { origin, values })
    }

    #[must_use]
    pub fn from_values<I, K>(origin: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(name, value)| {
                (
                    name.into(),
                    OutputValue {
                        value,
                        sensitive: false,
                    },
                )
            })
            .collect();
        Self { origin, values }
    }

    #[must_use]
    pub const fn origin(&self) -> &'static str {
        self.origin
    }

    pub fn get(&self, name: &str) -> Result<&Value, OutputError> {
        self.values
            .get(name)
            .map(|output| &output.value)
            .ok_or_else(|| OutputError::Missing {
                origin: self.origin,
                name: name.to_owned(),
                available: self.available(),
            })
    }

    pub fn string(&self, name: &str) -> Result<String, OutputError> {
        match self.get(name)? {
            Value::String(value) => Ok(value.clone()),
            other => Err(OutputError::NotAString {
                origin: self.origin,
                name: name.to_owned(),
                kind: json_kind(other),
            }),
        }
    }

    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|output| output.sensitive)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render every output as a Terraform input value: strings verbatim,
    /// anything else as its JSON encoding.
    #[must_use]
    pub fn as_input_vars(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(name, output)| {
                let rendered = match &output.value {
                    Value::String(value) => value.clone(),
                    other => other.to_string(),
                };
                (name.clone(), rendered)
            })
            .collect()
    }

    fn available(&self) -> String {
        if self.values.is_empty() {
            return "none".to_owned();
        }
        self.values.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
