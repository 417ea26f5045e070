//! The in-memory book collection and its synchronization with the store.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;

use crate::models::{Book, BookEdit};
use crate::storage;

/// Owns the book collection and the connection it persists through. Every
/// mutating operation writes the full collection back to the store before
/// returning; the in-memory change is kept even when that write fails.
pub struct Bookshelf {
    conn: Option<Connection>,
    books: Vec<Book>,
}

impl Bookshelf {
    /// Create an empty shelf backed by an open store connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            books: Vec::new(),
        }
    }

    /// Create an empty shelf with no backing store. All operations behave
    /// normally but nothing survives the session.
    pub fn detached() -> Self {
        Self {
            conn: None,
            books: Vec::new(),
        }
    }

    /// Whether a backing store is attached.
    pub fn has_storage(&self) -> bool {
        self.conn.is_some()
    }

    /// All books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// The book with `id`, if present.
    pub fn get(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Append a new book under a fresh id and write the collection through.
    /// Field values are stored exactly as given.
    pub fn add(
        &mut self,
        title: &str,
        author: &str,
        year: &str,
        is_complete: bool,
    ) -> Result<Book> {
        let book = Book {
            id: self.next_id(),
            title: title.to_string(),
            author: author.to_string(),
            year: year.to_string(),
            is_complete,
        };
        self.books.push(book.clone());
        self.persist()?;
        Ok(book)
    }

    /// Flip the completion flag of the book with `id`. Returns the new flag,
    /// or `None` when no book matches.
    pub fn toggle_complete(&mut self, id: i64) -> Result<Option<bool>> {
        let Some(book) = self.books.iter_mut().find(|book| book.id == id) else {
            return Ok(None);
        };
        book.is_complete = !book.is_complete;
        let flag = book.is_complete;
        self.persist()?;
        Ok(Some(flag))
    }

    /// Remove the book with `id`. Returns whether a book was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        if self.books.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Apply an edit request to the book with `id`. Fields the request leaves
    /// unset or blank keep their current value. Returns the updated book, or
    /// `None` when no book matches.
    pub fn edit(&mut self, id: i64, edit: &BookEdit) -> Result<Option<Book>> {
        let Some(book) = self.books.iter_mut().find(|book| book.id == id) else {
            return Ok(None);
        };
        edit.apply_to(book);
        let updated = book.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Books whose title contains `query`, compared case-insensitively. An
    /// empty query matches every book.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Serialize the whole collection under the fixed key. A detached shelf
    /// skips the write and reports success.
    pub fn persist(&self) -> Result<()> {
        let Some(conn) = &self.conn else {
            return Ok(());
        };
        let payload = serde_json::to_string(&self.books).context("failed to serialize books")?;
        storage::write_value(conn, storage::SHELF_KEY, &payload)
            .context("failed to write books to store")?;
        Ok(())
    }

    /// Replace the collection with whatever the store holds under the fixed
    /// key. A missing key or malformed data leaves the collection untouched.
    pub fn load(&mut self) -> Result<()> {
        let Some(conn) = &self.conn else {
            return Ok(());
        };
        let Some(payload) = storage::read_value(conn, storage::SHELF_KEY)
            .context("failed to read books from store")?
        else {
            return Ok(());
        };
        match serde_json::from_str::<Vec<Book>>(&payload) {
            Ok(books) => {
                info!("loaded {} books from store", books.len());
                self.books = books;
            }
            Err(err) => warn!("ignoring malformed stored collection: {err}"),
        }
        Ok(())
    }

    /// Millisecond timestamp, advanced past any id already taken so that two
    /// additions within the same clock tick still get distinct ids.
    fn next_id(&self) -> i64 {
        let mut id = now_millis();
        while self.books.iter().any(|book| book.id == id) {
            id += 1;
        }
        id
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
