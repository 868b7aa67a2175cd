use std::fmt;

/// A single inventory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub quantity: i64,
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>, quantity: i64) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            quantity,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| ID: {} | Title: {} | Author: {} | Quantity: {} |",
            self.id, self.title, self.author, self.quantity
        )
    }
}

/// A field that can be changed on its own by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookField {
    Title(String),
    Author(String),
    Quantity(i64),
}

impl BookField {
    /// Column the value is written to.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Author(_) => "author",
            Self::Quantity(_) => "qty",
        }
    }
}

/// Demonstration rows inserted at startup when their ids are free.
pub const SEED_BOOKS: [(i64, &str, &str, i64); 5] = [
    (3001, "A Tale of Two Cities", "Charles Dickens", 30),
    (3002, "Harry Potter and the Philosopher's Stone", "J.K. Rowling", 40),
    (3003, "The Lion, the Witch and the Wardrobe", "C.S. Lewis", 25),
    (3004, "The Lord of the Rings", "J.R.R. Tolkien", 37),
    (3005, "Alice in Wonderland", "Lewis Carroll", 12),
];
