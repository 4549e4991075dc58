use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Free-text JSON staged for a list in the pending settings.
///
/// Edits to the text never touch structured state; only a successful
/// [`JsonDraft::parse`] followed by an apply does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDraft {
    text: String,
}

impl JsonDraft {
    pub fn render<T: Serialize>(items: &[T]) -> anyhow::Result<Self> {
        let text = serde_json::to_string_pretty(items).context("serialize draft")?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The top level must be a JSON array of `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> anyhow::Result<Vec<T>> {
        let value: Value = serde_json::from_str(&self.text).context("invalid JSON")?;
        if !value.is_array() {
            anyhow::bail!("expected a JSON array at the top level");
        }
        serde_json::from_value(value).context("JSON array has an unexpected shape")
    }
}

/// Replaces `find` inside every string value of `value`, leaving object keys
/// and non-string values alone. Returns the number of replaced occurrences.
pub fn replace_in_strings(value: &mut Value, find: &str, replace: &str) -> usize {
    match value {
        Value::String(s) => {
            let count = s.matches(find).count();
            if count > 0 {
                *s = s.replace(find, replace);
            }
            count
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| replace_in_strings(item, find, replace))
            .sum(),
        Value::Object(map) => map
            .values_mut()
            .map(|item| replace_in_strings(item, find, replace))
            .sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}
