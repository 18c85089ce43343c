use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::row::RawRow;

/// Top-level proxy response: flat daily rows plus an opaque `insights` tree.
///
/// Every field is optional. A `data` field that is not an array becomes an
/// empty row list and non-object entries are dropped, so a malformed payload
/// still deserializes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GdeltResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub granularity: Option<String>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub data: Vec<RawRow>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub insights: Option<Value>,
}

impl GdeltResponse {
    /// Whether the proxy flagged this payload as an error.
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// The upstream's error text, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<RawRow>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(RawRow::from(map)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
