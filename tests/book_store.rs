use bookstore_inventory::{Book, BookField, BookStore, StoreConfig, StoreError, StoreResult, SEED_BOOKS};
use rusqlite::Connection;
use std::time::Duration;
use tempfile::NamedTempFile;

// Helper function to create a seeded in-memory store for testing
fn create_test_store() -> StoreResult<BookStore> {
    let store = BookStore::open_in_memory()?;
    store.seed_defaults()?;
    Ok(store)
}

// Helper function to create a temporary file-backed store
fn create_temp_store() -> StoreResult<(BookStore, NamedTempFile)> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = BookStore::open(StoreConfig::new(temp_file.path()))?;
    store.seed_defaults()?;
    Ok((store, temp_file))
}

fn dickens() -> Book {
    Book::new(3001, "A Tale of Two Cities", "Charles Dickens", 30)
}

#[test]
fn test_seed_defaults() {
    test_seed_defaults_impl().unwrap();
}

fn test_seed_defaults_impl() -> StoreResult<()> {
    let store = create_test_store()?;
    let ids = store.list_ids()?;
    assert_eq!(ids.len(), 5);
    for (id, title, author, qty) in SEED_BOOKS {
        assert!(ids.contains(&id));
        assert_eq!(store.find(id)?, Book::new(id, title, author, qty));
    }
    Ok(())
}

#[test]
fn seeding_twice_is_idempotent() {
    let store = create_test_store().unwrap();
    store.update_field(3004, &BookField::Quantity(1)).unwrap();

    store.seed_defaults().unwrap();

    assert_eq!(store.list_ids().unwrap().len(), 5);
    // Existing rows are skipped, not overwritten.
    assert_eq!(store.find(3004).unwrap().quantity, 1);
}

#[test]
fn test_insert_then_find() {
    test_insert_then_find_impl().unwrap();
}

fn test_insert_then_find_impl() -> StoreResult<()> {
    let store = create_test_store()?;
    let dune = Book::new(9001, "Dune", "Frank Herbert", 5);

    store.insert(&dune)?;

    assert_eq!(store.find(9001)?, dune);
    assert!(store.list_ids()?.contains(&9001));
    Ok(())
}

#[test]
fn insert_preserves_text_verbatim() {
    let store = BookStore::open_in_memory().unwrap();
    let odd = Book::new(1, "  O'Brien; DROP TABLE ebookstore --", "", 0);

    store.insert(&odd).unwrap();

    assert_eq!(store.find(1).unwrap(), odd);
}

#[test]
fn duplicate_insert_is_rejected() {
    let store = create_test_store().unwrap();

    let err = store
        .insert(&Book::new(3001, "Imposter", "Nobody", 1))
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateKey(3001)));
    assert_eq!(store.find(3001).unwrap(), dickens());
    assert_eq!(store.list_ids().unwrap().len(), 5);
}

#[test]
fn find_missing_is_not_found() {
    let store = create_test_store().unwrap();
    assert!(matches!(store.find(42), Err(StoreError::NotFound(42))));
}

#[test]
fn test_update_single_field() {
    test_update_single_field_impl().unwrap();
}

fn test_update_single_field_impl() -> StoreResult<()> {
    let store = create_test_store()?;

    store.update_field(3002, &BookField::Quantity(99))?;
    let book = store.find(3002)?;
    assert_eq!(book.title, "Harry Potter and the Philosopher's Stone");
    assert_eq!(book.author, "J.K. Rowling");
    assert_eq!(book.quantity, 99);

    store.update_field(3002, &BookField::Title("Philosopher's Stone".to_string()))?;
    let book = store.find(3002)?;
    assert_eq!(book.title, "Philosopher's Stone");
    assert_eq!(book.author, "J.K. Rowling");
    assert_eq!(book.quantity, 99);

    store.update_field(3002, &BookField::Author("Rowling".to_string()))?;
    assert_eq!(
        store.find(3002)?,
        Book::new(3002, "Philosopher's Stone", "Rowling", 99)
    );
    Ok(())
}

#[test]
fn update_leaves_other_rows_alone() {
    let store = create_test_store().unwrap();
    store.update_field(3002, &BookField::Quantity(99)).unwrap();
    assert_eq!(store.find(3001).unwrap(), dickens());
}

#[test]
fn missing_ids_leave_the_store_unchanged() {
    let store = create_test_store().unwrap();
    let before: Vec<Book> = SEED_BOOKS
        .iter()
        .map(|(id, ..)| store.find(*id).unwrap())
        .collect();

    assert!(matches!(
        store.update_field(7777, &BookField::Title("x".to_string())),
        Err(StoreError::NotFound(7777))
    ));
    assert!(matches!(store.delete(7777), Err(StoreError::NotFound(7777))));
    assert!(matches!(store.find(7777), Err(StoreError::NotFound(7777))));

    let after: Vec<Book> = SEED_BOOKS
        .iter()
        .map(|(id, ..)| store.find(*id).unwrap())
        .collect();
    assert_eq!(before, after);
    assert_eq!(store.list_ids().unwrap().len(), 5);
}

#[test]
fn delete_twice_reports_not_found() {
    let store = create_test_store().unwrap();

    store.delete(3005).unwrap();
    assert!(!store.list_ids().unwrap().contains(&3005));

    assert!(matches!(store.delete(3005), Err(StoreError::NotFound(3005))));
    assert_eq!(store.list_ids().unwrap().len(), 4);
}

#[test]
fn test_changes_survive_reopen() {
    test_changes_survive_reopen_impl().unwrap();
}

fn test_changes_survive_reopen_impl() -> StoreResult<()> {
    let (store, temp_file) = create_temp_store()?;
    store.insert(&Book::new(9001, "Dune", "Frank Herbert", 5))?;
    store.update_field(3003, &BookField::Quantity(0))?;
    store.delete(3005)?;
    store.close()?;

    let reopened = BookStore::open(StoreConfig::new(temp_file.path()))?;
    reopened.seed_defaults()?;
    let ids = reopened.list_ids()?;
    assert!(ids.contains(&9001));
    // Seeding restores a deleted demonstration row.
    assert!(ids.contains(&3005));
    assert_eq!(ids.len(), 6);
    assert_eq!(reopened.find(3003)?.quantity, 0);
    Ok(())
}

#[test]
fn open_fails_for_unreachable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("ebookstore");

    let err = BookStore::open(StoreConfig::new(path)).unwrap_err();

    assert!(matches!(err, StoreError::Init(_)));
}

#[test]
fn test_locked_database_is_a_write_failure() {
    test_locked_database_is_a_write_failure_impl().unwrap();
}

fn test_locked_database_is_a_write_failure_impl() -> StoreResult<()> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = BookStore::open(
        StoreConfig::new(temp_file.path()).with_busy_timeout(Duration::ZERO),
    )?;
    store.seed_defaults()?;

    // A second connection holding the write lock blocks our insert.
    let blocker = Connection::open(temp_file.path()).unwrap();
    blocker.execute_batch("BEGIN IMMEDIATE").unwrap();

    let err = store
        .insert(&Book::new(9001, "Dune", "Frank Herbert", 5))
        .unwrap_err();
    assert!(matches!(err, StoreError::Write(_)));
    assert!(matches!(store.find(9001), Err(StoreError::NotFound(9001))));

    blocker.execute_batch("ROLLBACK").unwrap();
    assert!(!store.list_ids()?.contains(&9001));
    assert_eq!(store.find(3001)?, dickens());
    Ok(())
}
