//! Library surface of the bookshelf manager.
//!
//! Everything the binary does goes through these modules, which also lets the
//! integration tests drive the shelf and the store without a terminal.

pub mod logging;
pub mod models;
pub mod shelf;
pub mod storage;
pub mod ui;

/// Domain types shared by every layer.
pub use models::{Book, BookEdit};

/// The book collection plus its persistence entry points.
pub use shelf::Bookshelf;

/// Terminal front-end: the state container and the event loop around it.
pub use ui::{run_app, App};
