//! Binary entry point that glues the SQLite-backed shelf to the TUI. The
//! bootstrap order matters: file logging first so storage setup is captured,
//! then the store connection, then the initial load, and finally the Ratatui
//! event loop until the user exits.

use log::warn;

use bookshelf_manager::{logging, run_app, storage, App, Bookshelf};

/// Initialize logging and persistence, load the saved collection, and launch
/// the Ratatui event loop.
///
/// A missing or unwritable data directory does not abort startup: the shelf
/// falls back to a detached in-memory collection and the UI reports that
/// nothing will be saved. Errors past that point bubble up to the terminal
/// through the returned `Result`.
fn main() -> anyhow::Result<()> {
    let _logger = storage::data_dir()
        .ok()
        .and_then(|dir| logging::init(&dir.join("logs")).ok());

    let mut shelf = match storage::open_default() {
        Ok(conn) => Bookshelf::new(conn),
        Err(err) => {
            warn!("storage unavailable, books will not be saved: {err}");
            Bookshelf::detached()
        }
    };
    shelf.load()?;

    let mut app = App::new(shelf);
    run_app(&mut app)
}
