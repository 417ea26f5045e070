use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, BookEdit};

/// Form state for adding or editing a book.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) finished: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
    show_status: bool,
}

/// Fields available within the book form. The status checkbox only exists on
/// the add form; completion of an existing book changes through the toggle
/// action instead.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Finished,
}

impl BookForm {
    /// Empty form for adding a new book, including the finished checkbox.
    pub(crate) fn new_book() -> Self {
        Self {
            show_status: true,
            ..Self::default()
        }
    }

    /// Populate the form from an existing book when entering edit mode. Blank
    /// submissions keep the current value, so every field starts prefilled.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.clone(),
            finished: book.is_complete,
            active: BookField::Title,
            error: None,
            show_status: false,
        }
    }

    /// Whether this form carries the finished checkbox.
    pub(crate) fn has_status_field(&self) -> bool {
        self.show_status
    }

    /// Cycle focus across the form fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match (self.active, self.show_status) {
            (BookField::Title, _) => BookField::Author,
            (BookField::Author, _) => BookField::Year,
            (BookField::Year, true) => BookField::Finished,
            (BookField::Year, false) | (BookField::Finished, _) => BookField::Title,
        };
    }

    /// Append a character to the active field. The year field only accepts
    /// digits; the checkbox takes no text at all. Returns whether anything
    /// was appended.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Title if !ch.is_control() => self.title.push(ch),
            BookField::Author if !ch.is_control() => self.author.push(ch),
            BookField::Year if ch.is_ascii_digit() => self.year.push(ch),
            _ => return false,
        }
        true
    }

    /// Drop the last character of the active field.
    pub(crate) fn backspace(&mut self) {
        let value = match self.active {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Finished => return,
        };
        value.pop();
    }

    /// Flip the finished checkbox when it is focused.
    pub(crate) fn toggle_finished(&mut self) {
        if self.show_status && self.active == BookField::Finished {
            self.finished = !self.finished;
        }
    }

    /// Validate the inputs for a new book and return the values ready to
    /// store.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        Ok((
            required(&self.title, "Book title is required.")?,
            required(&self.author, "Book author is required.")?,
            required(&self.year, "Publication year is required.")?,
        ))
    }

    /// Bundle the current field values into an edit request. Blank fields
    /// turn into retained values downstream.
    pub(crate) fn edit_request(&self) -> BookEdit {
        BookEdit {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            year: Some(self.year.clone()),
        }
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let label = Span::raw(format!("{field_name}: "));
        let is_active = self.active == field;

        let value = match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Finished => {
                let checkbox = if self.finished { "[x]" } else { "[ ]" };
                let style = if is_active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                return Line::from(vec![label, Span::styled(checkbox, style)]);
            }
        };

        let placeholder = if self.show_status {
            "<required>"
        } else {
            "<keep current>"
        };
        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };
        let style = match (is_active, value.is_empty()) {
            (true, _) => Style::default().fg(Color::Yellow),
            (false, true) => Style::default().fg(Color::DarkGray),
            (false, false) => Style::default(),
        };

        Line::from(vec![label, Span::styled(display, style)])
    }

    /// Character count of the requested field, for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        let value = match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Finished => return 0,
        };
        value.chars().count()
    }
}

/// Trimmed copy of `value`, or the given message when nothing is left.
fn required(value: &str, message: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!(message));
    }
    Ok(value.to_string())
}

/// State for confirming permanent book deletion.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
}

impl ConfirmDelete {
    /// Build the confirmation state from the book being considered.
    pub(crate) fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
        }
    }
}
