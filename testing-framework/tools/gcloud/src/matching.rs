//! Dotted-path lookups over gcloud JSON output.

use serde_json::Value;

/// Resolve `path` (for example `config.name` or `items.0.id`) inside
/// `value`. Numeric segments index into arrays.
#[must_use]
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
}

/// First element of `values` whose string at `path` equals `expected`.
#[must_use]
pub fn first_match_result<'a>(
    values: &'a [Value],
    path: &str,
    expected: &str,
) -> Option<&'a Value> {
    values
        .iter()
        .find(|item| get_path(item, path).and_then(Value::as_str) == Some(expected))
}
