//! Domain models that mirror the persisted JSON records and get passed
//! throughout the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.

use serde::{Deserialize, Deserializer, Serialize};

/// A single book on the shelf. The struct doubles as the persisted shape: the
/// store holds a JSON array of exactly these records, with `isComplete` kept
/// in its original camel-case spelling so data written by earlier versions of
/// the app keeps loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique id, immutable once created. Seeded from the creation timestamp
    /// in epoch milliseconds; the shelf advances it past collisions so two
    /// books never share an id.
    pub id: i64,
    /// Title displayed in lists and matched by search.
    pub title: String,
    /// Author field, display only.
    pub author: String,
    /// Publication year. Stored as text because the form feeds free input,
    /// but older data may carry a JSON number, so decoding accepts both.
    #[serde(deserialize_with = "year_from_string_or_number")]
    pub year: String,
    /// Whether the user has finished reading the book. Drives which pane the
    /// book is rendered in.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl Book {
    /// `Title (Year)` headline for the book cards, without the parentheses
    /// when no year is recorded.
    pub fn display_title(&self) -> String {
        if self.year.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.year.trim())
        }
    }
}

/// Field updates gathered by the edit flow. A `None` field, or one whose
/// value is empty after trimming, retains whatever the book already stores.
/// Keeping this as a plain value object decouples asking the user from the
/// mutation itself, so edits are testable without a terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
}

impl BookEdit {
    /// Write the effective fields into `book`. Values are stored as supplied;
    /// trimming is only used to decide whether a field counts as provided.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = effective(&self.title) {
            book.title = title.to_string();
        }
        if let Some(author) = effective(&self.author) {
            book.author = author.to_string();
        }
        if let Some(year) = effective(&self.year) {
            book.year = year.to_string();
        }
    }
}

/// Treat `None` and whitespace-only values alike as "not provided".
fn effective(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

/// Accept a year persisted either as a JSON string or as a bare number.
fn year_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearRepr {
        Text(String),
        Number(i64),
    }

    Ok(match YearRepr::deserialize(deserializer)? {
        YearRepr::Text(text) => text,
        YearRepr::Number(number) => number.to_string(),
    })
}
