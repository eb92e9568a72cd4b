//! Error types for the loyalty record stores
//!
//! This module defines all error types that can occur while reading, rewriting,
//! or reasoning about the customer, product, reward, and transaction stores.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File Errors**: store or count file missing, unreadable, or unwritable
//! - **Lookup Errors**: an id is absent from its store
//! - **Resource Errors**: inventory or reward balance too low
//! - **Record Errors**: a stored block does not decode
//! - **Arithmetic Errors**: overflow while adjusting a numeric field

use super::kind::EntityKind;
use thiserror::Error;

/// Main error type for the record stores
///
/// Every repository and ledger operation reports its outcome through this enum.
/// None of the variants abort the process on their own; the CLI renders them
/// and returns to the menu.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A store or count file could not be opened
    ///
    /// Reads of count files never produce this (they default to 1), and listing
    /// a missing store yields no records instead.
    #[error("File unavailable: {path} ({message})")]
    FileUnavailable {
        /// The path that could not be opened
        path: String,
        /// Underlying cause
        message: String,
    },

    /// I/O error while writing a store or count file
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The id is not present in its store
    ///
    /// No mutation was performed.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Store that was searched
        kind: EntityKind,
        /// Full id that was searched for
        id: String,
    },

    /// Inventory or reward balance is too low for the request
    ///
    /// The record that was checked is unchanged. Earlier steps of a purchase
    /// stay committed.
    #[error("Insufficient {resource} for {kind} {id}: available {available}, requested {requested}")]
    InsufficientResource {
        /// Store holding the record
        kind: EntityKind,
        /// Id of the record
        id: String,
        /// Human name of the field, e.g. "inventory"
        resource: String,
        /// Current value of the field
        available: i64,
        /// Amount that was requested
        requested: i64,
    },

    /// A stored block could not be decoded
    #[error("Malformed record in {path}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedRecord {
        /// Store file containing the block
        path: String,
        /// One-based line number, when known
        line: Option<usize>,
        /// What failed to parse
        message: String,
    },

    /// Adjusting a numeric field would overflow
    #[error("Arithmetic overflow in {operation} for {id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Id of the record being adjusted
        id: String,
    },

    /// Every id of the kind's fixed width is already taken
    #[error("No free {kind} ids left")]
    IdSpaceExhausted {
        /// Namespace that is full
        kind: EntityKind,
    },
}

// Conversion from io::Error to StoreError
impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl StoreError {
    /// Create a FileUnavailable error
    pub fn file_unavailable(path: &std::path::Path, message: impl ToString) -> Self {
        StoreError::FileUnavailable {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create an InsufficientResource error
    pub fn insufficient(
        kind: EntityKind,
        id: &str,
        resource: &str,
        available: i64,
        requested: i64,
    ) -> Self {
        StoreError::InsufficientResource {
            kind,
            id: id.to_string(),
            resource: resource.to_string(),
            available,
            requested,
        }
    }

    /// Create a MalformedRecord error
    pub fn malformed(path: &std::path::Path, line: Option<usize>, message: impl ToString) -> Self {
        StoreError::MalformedRecord {
            path: path.display().to_string(),
            line,
            message: message.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: &str) -> Self {
        StoreError::ArithmeticOverflow {
            operation: operation.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the error only reports an absent id
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case::file_unavailable(
        StoreError::FileUnavailable { path: "customers.txt".to_string(), message: "No such file".to_string() },
        "File unavailable: customers.txt (No such file)"
    )]
    #[case::io_error(
        StoreError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::not_found(
        StoreError::NotFound { kind: EntityKind::Customer, id: "CustID1234567890".to_string() },
        "customer CustID1234567890 not found"
    )]
    #[case::insufficient(
        StoreError::InsufficientResource {
            kind: EntityKind::Product,
            id: "Prod12345".to_string(),
            resource: "inventory".to_string(),
            available: 2,
            requested: 5,
        },
        "Insufficient inventory for product Prod12345: available 2, requested 5"
    )]
    #[case::malformed_with_line(
        StoreError::MalformedRecord { path: "products.txt".to_string(), line: Some(7), message: "bad price".to_string() },
        "Malformed record in products.txt at line 7: bad price"
    )]
    #[case::malformed_without_line(
        StoreError::MalformedRecord { path: "products.txt".to_string(), line: None, message: "bad price".to_string() },
        "Malformed record in products.txt: bad price"
    )]
    #[case::overflow(
        StoreError::ArithmeticOverflow { operation: "credit".to_string(), id: "CustID1".to_string() },
        "Arithmetic overflow in credit for CustID1"
    )]
    #[case::exhausted(
        StoreError::IdSpaceExhausted { kind: EntityKind::Reward },
        "No free reward ids left"
    )]
    fn test_error_display(#[case] error: StoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::not_found(
        StoreError::not_found(EntityKind::Product, "Prod1"),
        StoreError::NotFound { kind: EntityKind::Product, id: "Prod1".to_string() }
    )]
    #[case::insufficient(
        StoreError::insufficient(EntityKind::Customer, "CustID1", "reward points", 5, 10),
        StoreError::InsufficientResource {
            kind: EntityKind::Customer,
            id: "CustID1".to_string(),
            resource: "reward points".to_string(),
            available: 5,
            requested: 10,
        }
    )]
    #[case::malformed(
        StoreError::malformed(Path::new("a.txt"), Some(2), "oops"),
        StoreError::MalformedRecord { path: "a.txt".to_string(), line: Some(2), message: "oops".to_string() }
    )]
    fn test_helper_functions(#[case] result: StoreError, #[case] expected: StoreError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: StoreError = io_error.into();
        assert!(matches!(error, StoreError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
