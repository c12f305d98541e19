use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Separator for the `category` column.
pub const CATEGORY_SEPARATOR: char = ',';

/// An unpublished entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A published entry with its category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Distinct labels in the order they were given.
    pub category: Vec<String>,
    pub published_at: DateTime<Utc>,
}

/// Number of published entries under one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub num: usize,
}

/// Drop blanks and repeats, keeping first-seen order.
pub fn normalize_categories<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

pub fn join_categories(category: &[String]) -> String {
    category.join(&CATEGORY_SEPARATOR.to_string())
}

pub fn split_categories(column: &str) -> Vec<String> {
    normalize_categories(column.split(CATEGORY_SEPARATOR))
}

/// `published_at` is stored as Unix epoch milliseconds.
pub fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

pub fn decode_timestamp(column: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = column.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_categories_dedups_in_order() {
        let got = normalize_categories(["rust", " ", "notes", "rust", "notes "]);
        assert_eq!(got, vec!["rust".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_split_categories_ignores_empty_segments() {
        assert_eq!(split_categories("a,,b,"), vec!["a", "b"]);
        assert!(split_categories("").is_empty());
    }

    #[test]
    fn test_timestamp_column() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(encode_timestamp(&at), "1700000000123");
        assert_eq!(decode_timestamp("1700000000123"), Some(at));
        assert_eq!(decode_timestamp("yesterday"), None);
    }
}
