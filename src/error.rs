//! Failure kinds for the record store and for operator input.
//!
//! Store errors other than [`StoreError::Init`] are reported to the operator
//! and the menu loop carries on. Input errors always re-prompt the same step.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A book with ID {0} already exists")]
    DuplicateKey(i64),
    #[error("No book with ID {0}")]
    NotFound(i64),
    #[error("could not open or initialize the book store: {0}")]
    Init(#[source] rusqlite::Error),
    #[error("Storage write failed: {0}")]
    Write(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input. Please enter a number.")]
    NotANumber(String),
    #[error("Invalid selection. Please try again.")]
    OutOfRange(i64),
    #[error("Invalid input. Quantity cannot be negative.")]
    Negative(i64),
    #[error("Invalid input. ID number must be positive.")]
    NonPositive(i64),
}
