//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `kind`: Entity kinds and their on-disk vocabulary
//! - `customer`, `product`, `reward`, `transaction`: Record types and drafts
//! - `error`: Error types for the record stores

pub mod customer;
pub mod error;
pub mod kind;
pub mod product;
pub mod reward;
pub mod transaction;

pub use customer::{Customer, NewCustomer};
pub use error::StoreError;
pub use kind::EntityKind;
pub use product::{NewProduct, Product};
pub use reward::{NewReward, Reward};
pub use transaction::{NewTransaction, Transaction};
