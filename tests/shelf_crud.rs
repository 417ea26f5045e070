use bookshelf_manager::storage::open_in_memory;
use bookshelf_manager::{Book, BookEdit, Bookshelf};

#[test]
fn add_appends_and_stores_submitted_values() {
    let mut shelf = fresh_shelf();

    let book = shelf
        .add("War and Peace", "Leo Tolstoy", "1869", false)
        .unwrap();

    assert_eq!(shelf.len(), 1);
    assert_eq!(book.title, "War and Peace");
    assert_eq!(book.author, "Leo Tolstoy");
    assert_eq!(book.year, "1869");
    assert!(!book.is_complete);
    assert_eq!(shelf.books()[0], book);

    let finished = shelf.add("The Hobbit", "J.R.R. Tolkien", "1937", true).unwrap();
    assert_eq!(shelf.len(), 2);
    assert!(finished.is_complete);
}

#[test]
fn add_assigns_distinct_ids_even_within_one_clock_tick() {
    let mut shelf = fresh_shelf();

    let first = shelf.add("a", "a", "1", false).unwrap();
    let second = shelf.add("b", "b", "2", false).unwrap();
    let third = shelf.add("c", "c", "3", false).unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_ne!(first.id, third.id);
}

#[test]
fn toggle_complete_flips_exactly_once_and_back() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    assert_eq!(shelf.toggle_complete(book.id).unwrap(), Some(true));
    assert!(shelf.books()[0].is_complete);

    assert_eq!(shelf.toggle_complete(book.id).unwrap(), Some(false));
    assert_eq!(shelf.books()[0], book);
}

#[test]
fn toggle_complete_of_unknown_id_is_a_no_op() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    assert_eq!(shelf.toggle_complete(book.id + 1).unwrap(), None);
    assert_eq!(shelf.books(), [book]);
}

#[test]
fn delete_removes_only_the_matching_book() {
    let mut shelf = fresh_shelf();
    let doomed = shelf.add("War and Peace", "Leo Tolstoy", "1869", false).unwrap();
    let kept = shelf.add("The Hobbit", "J.R.R. Tolkien", "1937", true).unwrap();

    assert!(shelf.delete(doomed.id).unwrap());

    assert_eq!(shelf.books(), [kept]);
}

#[test]
fn delete_of_unknown_id_leaves_the_collection_unchanged() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    assert!(!shelf.delete(book.id + 1).unwrap());
    assert_eq!(shelf.books(), [book]);
}

#[test]
fn search_matches_case_insensitive_title_substrings() {
    let mut shelf = fresh_shelf();
    shelf.add("War and Peace", "Leo Tolstoy", "1869", false).unwrap();
    shelf.add("The Hobbit", "J.R.R. Tolkien", "1937", true).unwrap();

    assert_eq!(titles(&shelf.search("war")), ["War and Peace"]);
    assert_eq!(titles(&shelf.search("WAR")), ["War and Peace"]);
    assert_eq!(titles(&shelf.search("hob")), ["The Hobbit"]);
    assert!(shelf.search("dickens").is_empty());
}

#[test]
fn search_with_empty_query_returns_every_book_and_mutates_nothing() {
    let mut shelf = fresh_shelf();
    shelf.add("War and Peace", "Leo Tolstoy", "1869", false).unwrap();
    shelf.add("The Hobbit", "J.R.R. Tolkien", "1937", true).unwrap();
    let before: Vec<Book> = shelf.books().to_vec();

    assert_eq!(shelf.search("").len(), 2);
    shelf.search("war");

    assert_eq!(shelf.books(), before);
}

#[test]
fn edit_with_blank_fields_retains_current_values() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    let edit = BookEdit {
        title: Some("   ".to_string()),
        author: Some("Jane Doe".to_string()),
        year: None,
    };
    let updated = shelf.edit(book.id, &edit).unwrap().unwrap();

    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.author, "Jane Doe");
    assert_eq!(updated.year, "1965");
    assert_eq!(shelf.get(book.id), Some(&updated));
}

#[test]
fn edit_keeps_supplied_values_verbatim() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    let edit = BookEdit {
        title: Some("  Dune Messiah  ".to_string()),
        author: None,
        year: Some("1969".to_string()),
    };
    let updated = shelf.edit(book.id, &edit).unwrap().unwrap();

    assert_eq!(updated.title, "  Dune Messiah  ");
    assert_eq!(updated.year, "1969");
}

#[test]
fn edit_of_unknown_id_returns_none() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();

    let edit = BookEdit {
        title: Some("Changed".to_string()),
        ..BookEdit::default()
    };

    assert_eq!(shelf.edit(book.id + 1, &edit).unwrap(), None);
    assert_eq!(shelf.books(), [book]);
}

#[test]
fn edit_does_not_change_the_id_or_completion_flag() {
    let mut shelf = fresh_shelf();
    let book = shelf.add("Dune", "Frank Herbert", "1965", true).unwrap();

    let edit = BookEdit {
        title: Some("Dune Messiah".to_string()),
        author: Some("F. Herbert".to_string()),
        year: Some("1969".to_string()),
    };
    let updated = shelf.edit(book.id, &edit).unwrap().unwrap();

    assert_eq!(updated.id, book.id);
    assert!(updated.is_complete);
}

#[test]
fn display_title_appends_the_year_only_when_present() {
    let mut shelf = fresh_shelf();
    let dated = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();
    let undated = shelf.add("Leaves of Grass", "Walt Whitman", "", false).unwrap();

    assert_eq!(dated.display_title(), "Dune (1965)");
    assert_eq!(undated.display_title(), "Leaves of Grass");
}

#[test]
fn detached_shelf_supports_every_operation_in_memory() {
    let mut shelf = Bookshelf::detached();
    assert!(!shelf.has_storage());

    let book = shelf.add("Dune", "Frank Herbert", "1965", false).unwrap();
    assert_eq!(shelf.toggle_complete(book.id).unwrap(), Some(true));
    assert_eq!(titles(&shelf.search("dune")), ["Dune"]);
    assert!(shelf.delete(book.id).unwrap());
    assert!(shelf.books().is_empty());
}

fn fresh_shelf() -> Bookshelf {
    Bookshelf::new(open_in_memory().unwrap())
}

fn titles<'a>(books: &[&'a Book]) -> Vec<&'a str> {
    books.iter().map(|book| book.title.as_str()).collect()
}
