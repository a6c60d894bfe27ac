//! Small input normalizers shared by the request handlers.

use serde::Deserialize;

/// A list that arrives either as a JSON array or as one comma separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    List(Vec<String>),
    Csv(String),
}

impl ListInput {
    /// Trimmed, non-empty entries.
    pub fn into_list(self) -> Vec<String> {
        match self {
            ListInput::List(items) => clean_list(items),
            ListInput::Csv(raw) => split_csv(&raw),
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Trims every entry and drops the empty ones, keeping order.
pub fn clean_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Splits a comma separated list, then cleans it like [`clean_list`].
pub fn split_csv(raw: &str) -> Vec<String> {
    clean_list(raw.split(','))
}
