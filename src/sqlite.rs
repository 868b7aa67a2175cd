use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, ToSql};

use crate::book::{Book, BookField, SEED_BOOKS};
use crate::error::{StoreError, StoreResult};

/// Default database file and table name, kept for compatibility with existing stores.
pub const DEFAULT_DB_PATH: &str = "ebookstore";
pub const BOOK_TABLE: &str = "ebookstore";
/// How long a statement waits on a lock held by another connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// The book table: `id`, `title`, `author`, `qty`.
    pub fn books() -> Self {
        Self {
            name: BOOK_TABLE.to_string(),
            columns: vec![
                ColumnDefinition::new("id", DataType::Integer)
                    .with_constraint(ColumnConstraint::PrimaryKey)
                    .with_constraint(ColumnConstraint::NotNull),
                ColumnDefinition::new("title", DataType::Text),
                ColumnDefinition::new("author", DataType::Text),
                ColumnDefinition::new("qty", DataType::Integer),
            ],
        }
    }

    /// Idempotent creation statement.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            columns.join(", ")
        )
    }
}

/// Book store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Definition of the book table
    pub table: TableDefinition,
    /// Lock wait before a statement fails with a write error
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            table: TableDefinition::books(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

/// Owns the single connection to the book table.
///
/// Every mutating call runs as its own autocommitted statement, so a
/// successful return means the change is on disk.
#[derive(Debug)]
pub struct BookStore {
    conn: Connection,
    table: TableDefinition,
}

impl BookStore {
    /// Open (creating if absent) the database at `config.db_path` and ensure the table.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        info!("opening book store at {}", config.db_path.display());
        let conn = Connection::open(&config.db_path).map_err(StoreError::Init)?;
        conn.busy_timeout(config.busy_timeout).map_err(StoreError::Init)?;
        Self::with_connection(conn, config.table)
    }

    /// In-memory store with the default table, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Init)?;
        Self::with_connection(conn, TableDefinition::books())
    }

    fn with_connection(conn: Connection, table: TableDefinition) -> StoreResult<Self> {
        let store = Self { conn, table };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the book table exists. Safe to call repeatedly.
    pub fn initialize(&self) -> StoreResult<()> {
        let sql = self.table.create_sql();
        debug!("{sql}");
        self.conn.execute(&sql, []).map_err(StoreError::Init)?;
        Ok(())
    }

    /// Insert the demonstration rows, skipping ids that are already taken.
    pub fn seed_defaults(&self) -> StoreResult<()> {
        let sql = format!(
            "INSERT OR IGNORE INTO {} (id, title, author, qty) VALUES (?1, ?2, ?3, ?4)",
            self.table.name
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut inserted = 0;
        for (id, title, author, qty) in SEED_BOOKS {
            inserted += stmt.execute(params![id, title, author, qty])?;
        }
        info!("seeded {inserted} default book(s)");
        Ok(())
    }

    /// Every id currently stored.
    pub fn list_ids(&self) -> StoreResult<HashSet<i64>> {
        let sql = format!("SELECT id FROM {}", self.table.name);
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<HashSet<i64>, _>>()?;
        Ok(ids)
    }

    /// Existence goes through [`BookStore::list_ids`] so every check sees the same id set.
    pub fn contains(&self, id: i64) -> StoreResult<bool> {
        Ok(self.list_ids()?.contains(&id))
    }

    /// Persist a new book. Fails with [`StoreError::DuplicateKey`] if the id is taken.
    pub fn insert(&self, book: &Book) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO {} (id, title, author, qty) VALUES (?1, ?2, ?3, ?4)",
            self.table.name
        );
        debug!("{sql} [id={}]", book.id);
        match self
            .conn
            .execute(&sql, params![book.id, book.title, book.author, book.quantity])
        {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                warn!("insert rejected, id {} already exists", book.id);
                Err(StoreError::DuplicateKey(book.id))
            }
            Err(e) => Err(StoreError::Write(e)),
        }
    }

    pub fn find(&self, id: i64) -> StoreResult<Book> {
        let sql = format!(
            "SELECT id, title, author, qty FROM {} WHERE id = ?1",
            self.table.name
        );
        self.conn
            .query_row(&sql, [id], |row| {
                Ok(Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    author: row.get(2)?,
                    quantity: row.get(3)?,
                })
            })
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    /// Overwrite one column of an existing book.
    pub fn update_field(&self, id: i64, field: &BookField) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE id = ?2",
            self.table.name,
            field.column()
        );
        let value: &dyn ToSql = match field {
            BookField::Title(title) => title,
            BookField::Author(author) => author,
            BookField::Quantity(qty) => qty,
        };
        debug!("{sql} [id={id}]");
        let changed = self.conn.execute(&sql, params![value, id])?;
        if changed == 0 {
            warn!("update skipped, id {id} not found");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Remove a book. Deleting an absent id reports [`StoreError::NotFound`] and changes nothing.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table.name);
        debug!("{sql} [id={id}]");
        let changed = self.conn.execute(&sql, [id])?;
        if changed == 0 {
            warn!("delete skipped, id {id} not found");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> StoreResult<()> {
        info!("closing book store");
        self.conn.close().map_err(|(_, e)| StoreError::Write(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sql_matches_legacy_schema() {
        assert_eq!(
            TableDefinition::books().create_sql(),
            "CREATE TABLE IF NOT EXISTS ebookstore (id INTEGER PRIMARY KEY NOT NULL, \
             title TEXT, author TEXT, qty INTEGER)"
        );
    }

    #[test]
    fn default_config_points_at_ebookstore() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, PathBuf::from("ebookstore"));
        assert_eq!(config.table.name, "ebookstore");
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = BookStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert!(store.list_ids().unwrap().is_empty());
    }
}
