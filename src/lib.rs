//! Loyalty Records Library
//! # Overview
//!
//! This library keeps customers, products, rewards and transactions in flat
//! text stores and runs a loyalty-points ledger over them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Record types, entity kinds and the error taxonomy
//! - [`io`] - On-disk format:
//!   - [`io::line_store`] - Whole-file line reads and rewrites, count files
//!   - [`io::record_codec`] - Block encoding and decoding
//!   - [`io::csv_format`] - CSV listings
//! - [`core`] - Business logic components:
//!   - [`core::id_allocator`] - Unique id issuing per kind
//!   - [`core::repository`] - Append, find, delete and field updates over one store
//!   - [`core::ledger`] - Purchase and redemption flows
//! - [`config`] - Data directory and prompt settings
//! - [`cli`] - Argument parsing, subcommands and the interactive menu
//!
//! # Store Format
//!
//! Every store is a sequence of blocks. A block is a `<Kind> <ordinal>` header
//! followed by a fixed number of tab-indented `Label: value` lines. Records are
//! located by scanning for their `ID: <id>` line. Each store has a count file
//! holding the ordinal the next appended block will show.
//!
//! | Kind        | Store               | Count file              | Id format               |
//! |-------------|---------------------|-------------------------|-------------------------|
//! | Customer    | `customers.txt`     | `customer_count.txt`    | `CustID` + 10 digits    |
//! | Product     | `products.txt`      | `product_count.txt`     | `Prod` + 5 digits       |
//! | Reward      | `rewardsList.txt`   | `reward_count.txt`      | `Prod` + 5 digits       |
//! | Transaction | `transactions.txt`  | `transaction_count.txt` | `Transaction` + 7 digits|
//!
//! # Loyalty Rules
//!
//! - **Purchase**: each line item deducts inventory on its own; rejected items
//!   do not undo earlier ones. Every whole $5 spent earns 10 points and the
//!   remainder earns its proportional share, truncated.
//! - **Redemption**: spends a reward's point value for one unit of its
//!   inventory, or changes nothing if the balance is too low.
//!
//! # Limits
//!
//! - One process at a time: there is no file locking, and concurrent writers
//!   corrupt the stores.
//! - Mutations rewrite whole files in place with no temp file, and store and
//!   count writes are separate, so a crash can truncate a store or leave its
//!   count out of step.
//! - Lookups are linear scans; there is no index.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod types;

pub use config::StoreConfig;
pub use core::{
    calculate_reward_points, Adjustment, IdAllocator, Ledger, LineItem, PurchaseReceipt, Record,
    Redemption, Repository, Stored,
};
pub use types::{
    Customer, EntityKind, NewCustomer, NewProduct, NewReward, NewTransaction, Product, Reward,
    StoreError, Transaction,
};
