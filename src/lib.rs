//! SQLite-backed bookstore inventory with an interactive menu front end.
//!
//! # Intention
//!
//! - Keep every book record in a single SQLite table keyed by a caller-chosen id.
//! - Drive add/update/delete/search through numeric console menus.
//!
//! # Architectural Boundaries
//!
//! - Only `sqlite` talks to the database.
//! - `controller` owns all console I/O and never holds a [`Book`] past one action.
//! - `menu` is pure state; it neither reads input nor touches the store.

pub mod book;
pub mod controller;
pub mod error;
pub mod menu;
pub mod sqlite;

pub use book::{Book, BookField, SEED_BOOKS};
pub use controller::Controller;
pub use error::{InputError, StoreError, StoreResult};
pub use menu::{MenuEvent, MenuState, Requirement};
pub use sqlite::{BookStore, StoreConfig};
