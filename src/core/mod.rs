//! Core business logic module
//!
//! This module contains the record store components:
//! - `traits` - The `Record` contract every stored kind implements
//! - `id_allocator` - Unique id issuing per entity kind
//! - `repository` - Append, lookup, delete and field updates over one store
//! - `ledger` - Purchase and redemption flows across the stores

pub mod id_allocator;
pub mod ledger;
pub mod repository;
pub mod traits;

pub use id_allocator::IdAllocator;
pub use ledger::{
    calculate_reward_points, CommittedItem, Ledger, LineItem, PurchaseReceipt, RejectedItem,
    Redemption,
};
pub use repository::{Adjustment, Repository, Stored};
pub use traits::Record;
