use bookshelf_manager::storage::{open_at, open_in_memory, read_value, write_value, SHELF_KEY};
use bookshelf_manager::{Book, Bookshelf};

#[test]
fn write_then_read_returns_the_stored_value() {
    let conn = open_in_memory().unwrap();

    write_value(&conn, SHELF_KEY, "[]").unwrap();

    assert_eq!(read_value(&conn, SHELF_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn read_of_missing_key_returns_none() {
    let conn = open_in_memory().unwrap();

    assert_eq!(read_value(&conn, SHELF_KEY).unwrap(), None);
}

#[test]
fn write_overwrites_the_previous_value() {
    let conn = open_in_memory().unwrap();

    write_value(&conn, SHELF_KEY, "first").unwrap();
    write_value(&conn, SHELF_KEY, "second").unwrap();

    assert_eq!(
        read_value(&conn, SHELF_KEY).unwrap().as_deref(),
        Some("second")
    );
}

#[test]
fn opening_the_same_store_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.sqlite");

    let conn_first = open_at(&path).unwrap();
    write_value(&conn_first, SHELF_KEY, "kept").unwrap();
    drop(conn_first);

    let conn_second = open_at(&path).unwrap();
    assert_eq!(
        read_value(&conn_second, SHELF_KEY).unwrap().as_deref(),
        Some("kept")
    );
}

#[test]
fn collection_round_trips_through_a_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.sqlite");

    let mut shelf = Bookshelf::new(open_at(&path).unwrap());
    shelf.add("War and Peace", "Leo Tolstoy", "1869", false).unwrap();
    shelf.add("The Hobbit", "J.R.R. Tolkien", "1937", true).unwrap();
    let stored: Vec<Book> = shelf.books().to_vec();
    drop(shelf);

    let mut reloaded = Bookshelf::new(open_at(&path).unwrap());
    reloaded.load().unwrap();

    assert_eq!(reloaded.books(), stored);
}

#[test]
fn stored_payload_keeps_the_camel_case_completion_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.sqlite");

    let mut shelf = Bookshelf::new(open_at(&path).unwrap());
    shelf.add("Dune", "Frank Herbert", "1965", true).unwrap();
    drop(shelf);

    let conn = open_at(&path).unwrap();
    let payload = read_value(&conn, SHELF_KEY).unwrap().unwrap();

    assert!(payload.contains("\"isComplete\":true"), "payload: {payload}");
    assert!(!payload.contains("is_complete"), "payload: {payload}");
}

#[test]
fn load_accepts_years_stored_as_numbers() {
    let conn = open_in_memory().unwrap();
    write_value(
        &conn,
        SHELF_KEY,
        r#"[{"id":1,"title":"Dune","author":"Frank Herbert","year":1965,"isComplete":false}]"#,
    )
    .unwrap();

    let mut shelf = Bookshelf::new(conn);
    shelf.load().unwrap();

    assert_eq!(shelf.books().len(), 1);
    assert_eq!(shelf.books()[0].year, "1965");
}

#[test]
fn load_ignores_malformed_stored_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.sqlite");

    let mut shelf = Bookshelf::new(open_at(&path).unwrap());
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    let second_conn = open_at(&path).unwrap();
    write_value(&second_conn, SHELF_KEY, "not json at all").unwrap();

    shelf.load().unwrap();

    assert_eq!(shelf.books(), [book]);
}

#[test]
fn load_ignores_stored_data_that_is_not_an_array() {
    let conn = open_in_memory().unwrap();
    write_value(&conn, SHELF_KEY, r#"{"id":1}"#).unwrap();

    let mut shelf = Bookshelf::new(conn);
    shelf.load().unwrap();

    assert!(shelf.is_empty());
}

#[test]
fn load_with_no_stored_data_keeps_an_empty_shelf() {
    let mut shelf = Bookshelf::new(open_in_memory().unwrap());

    shelf.load().unwrap();

    assert!(shelf.is_empty());
}

#[test]
fn load_replaces_the_collection_instead_of_appending() {
    let conn = open_in_memory().unwrap();
    write_value(
        &conn,
        SHELF_KEY,
        r#"[{"id":1,"title":"Dune","author":"Frank Herbert","year":"1965","isComplete":false}]"#,
    )
    .unwrap();

    let mut shelf = Bookshelf::new(conn);
    shelf.load().unwrap();
    shelf.load().unwrap();

    assert_eq!(shelf.books().len(), 1);
}
