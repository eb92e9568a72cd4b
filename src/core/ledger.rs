//! Loyalty ledger
//!
//! This module provides the `Ledger` that composes the four repositories into
//! the purchase and redemption flows, and owns the id allocator they share.
//!
//! The ledger enforces business rules such as:
//! - A purchase needs an existing customer; each line item needs an existing
//!   product with enough inventory
//! - Rejected line items do not undo earlier ones (no transaction-level rollback)
//! - A redemption is all-or-nothing with respect to the customer's balance

use crate::config::StoreConfig;
use crate::core::id_allocator::IdAllocator;
use crate::core::repository::{Adjustment, Repository, Stored};
use crate::core::traits::Record;
use crate::types::{
    Customer, EntityKind, NewCustomer, NewProduct, NewReward, NewTransaction, Product, Reward,
    StoreError, Transaction,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Dollars per reward chunk
const CHUNK_AMOUNT: i64 = 5;

/// Points earned per whole chunk
const POINTS_PER_CHUNK: i64 = 10;

/// Reward points earned for spending `total`
///
/// Every whole $5 earns 10 points; the remainder earns its proportional share
/// of 10, truncated toward zero. Totals at or below zero earn nothing, and
/// totals whose points do not fit in an `i64` saturate at `i64::MAX`.
pub fn calculate_reward_points(total: Decimal) -> i64 {
    if total <= Decimal::ZERO {
        return 0;
    }
    let chunk = Decimal::from(CHUNK_AMOUNT);
    let per_chunk = Decimal::from(POINTS_PER_CHUNK);

    let chunks = (total / chunk).floor();
    let remainder = total % chunk;
    let partial = (remainder / chunk * per_chunk).trunc();

    chunks
        .checked_mul(per_chunk)
        .and_then(|whole| whole.checked_add(partial))
        .and_then(|points| points.to_i64())
        .unwrap_or(i64::MAX)
}

/// One requested product and how many units of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: u32,
}

/// A line item whose inventory was deducted
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub remaining_inventory: i64,
}

/// A line item that was skipped, and why
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    pub item: LineItem,
    pub reason: StoreError,
}

/// Outcome of a purchase
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub transaction: Stored<Transaction>,
    pub committed: Vec<CommittedItem>,
    pub rejected: Vec<RejectedItem>,
    /// Customer balance after the points were credited
    pub balance: i64,
}

/// Outcome of a redemption
#[derive(Debug, Clone, PartialEq)]
pub struct Redemption {
    pub customer_id: String,
    pub reward: Reward,
    pub points_spent: i64,
    pub balance: i64,
    pub remaining_inventory: i64,
}

/// Customers, products, rewards and transactions behind one id allocator
pub struct Ledger {
    customers: Repository<Customer>,
    products: Repository<Product>,
    rewards: Repository<Reward>,
    transactions: Repository<Transaction>,
    ids: IdAllocator,
}

impl Ledger {
    /// Open every store under `config` and seed the allocator from their ids
    ///
    /// # Errors
    ///
    /// Returns an error if an existing store cannot be read.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::with_allocator(config, IdAllocator::new())
    }

    /// Open every store with a caller-supplied allocator
    ///
    /// The allocator is still seeded from the stores on disk.
    pub fn with_allocator(config: &StoreConfig, mut ids: IdAllocator) -> Result<Self, StoreError> {
        let customers = Repository::open(config);
        let products = Repository::open(config);
        let rewards = Repository::open(config);
        let transactions = Repository::open(config);

        ids.seed(EntityKind::Customer, customers.ids()?);
        ids.seed(EntityKind::Product, products.ids()?);
        ids.seed(EntityKind::Reward, rewards.ids()?);
        ids.seed(EntityKind::Transaction, transactions.ids()?);

        for kind in EntityKind::ALL {
            debug!(%kind, taken = ids.taken(kind), "id allocator seeded");
        }

        Ok(Ledger {
            customers,
            products,
            rewards,
            transactions,
            ids,
        })
    }

    pub fn customers(&self) -> &Repository<Customer> {
        &self.customers
    }

    pub fn products(&self) -> &Repository<Product> {
        &self.products
    }

    pub fn rewards(&self) -> &Repository<Reward> {
        &self.rewards
    }

    pub fn transactions(&self) -> &Repository<Transaction> {
        &self.transactions
    }

    pub fn register_customer(&mut self, draft: NewCustomer) -> Result<Stored<Customer>, StoreError> {
        self.customers.append(&mut self.ids, draft)
    }

    pub fn remove_customer(&mut self, id: &str) -> Result<Customer, StoreError> {
        self.customers.delete(id)
    }

    pub fn customer(&self, id: &str) -> Result<Customer, StoreError> {
        self.customers.find_by_id(id)
    }

    pub fn add_product(&mut self, draft: NewProduct) -> Result<Stored<Product>, StoreError> {
        self.products.append(&mut self.ids, draft)
    }

    pub fn remove_product(&mut self, id: &str) -> Result<Product, StoreError> {
        self.products.delete(id)
    }

    pub fn product(&self, id: &str) -> Result<Product, StoreError> {
        self.products.find_by_id(id)
    }

    pub fn add_reward(&mut self, draft: NewReward) -> Result<Stored<Reward>, StoreError> {
        self.rewards.append(&mut self.ids, draft)
    }

    pub fn remove_reward(&mut self, id: &str) -> Result<Reward, StoreError> {
        self.rewards.delete(id)
    }

    pub fn reward(&self, id: &str) -> Result<Reward, StoreError> {
        self.rewards.find_by_id(id)
    }

    pub fn transaction(&self, id: &str) -> Result<Transaction, StoreError> {
        self.transactions.find_by_id(id)
    }

    /// Record a purchase of `items` by `customer_id`
    ///
    /// Each line item is checked and deducted on its own. A missing product,
    /// short inventory, or a cost that would overflow the running total rejects
    /// that item only; items already deducted stay deducted. A transaction is appended for the committed items (possibly
    /// none) and its reward points are credited to the customer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The customer does not exist (nothing is changed)
    /// - A store cannot be read or written
    pub fn purchase(
        &mut self,
        customer_id: &str,
        items: &[LineItem],
    ) -> Result<PurchaseReceipt, StoreError> {
        if !self.customers.contains(customer_id)? {
            return Err(StoreError::not_found(EntityKind::Customer, customer_id));
        }

        let mut committed = Vec::new();
        let mut rejected = Vec::new();
        let mut total = Decimal::ZERO;

        for item in items {
            match self.deduct_line_item(item, total) {
                Ok((done, running_total)) => {
                    total = running_total;
                    committed.push(done);
                }
                Err(reason) if Self::is_item_rejection(&reason) => {
                    warn!(
                        product = %item.product_id,
                        quantity = item.quantity,
                        %reason,
                        "line item rejected"
                    );
                    rejected.push(RejectedItem {
                        item: item.clone(),
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let reward_points = calculate_reward_points(total);
        let transaction = self.transactions.append(
            &mut self.ids,
            NewTransaction {
                customer_id: customer_id.to_string(),
                product_ids: committed.iter().map(|c| c.product_id.clone()).collect(),
                total_amount: total,
                reward_points,
            },
        )?;

        let balance = self.customers.update_field(
            customer_id,
            Customer::REWARD_POINTS_FIELD,
            Adjustment::Credit(reward_points),
        )?;

        info!(
            customer = customer_id,
            transaction = %transaction.record.id,
            %total,
            reward_points,
            balance,
            "purchase recorded"
        );

        Ok(PurchaseReceipt {
            transaction,
            committed,
            rejected,
            balance,
        })
    }

    /// Spend `customer_id`'s points on one unit of `reward_id`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The customer or reward does not exist
    /// - The balance is below the reward's point value (nothing is changed)
    /// - The reward is out of stock (nothing is changed)
    pub fn redeem(&mut self, customer_id: &str, reward_id: &str) -> Result<Redemption, StoreError> {
        let customer = self.customers.find_by_id(customer_id)?;
        let reward = self.rewards.find_by_id(reward_id)?;
        let cost = i64::from(reward.point_value);

        if customer.reward_points < cost {
            return Err(StoreError::insufficient(
                EntityKind::Customer,
                customer_id,
                "reward points",
                customer.reward_points,
                cost,
            ));
        }

        let remaining_inventory =
            self.rewards
                .update_field(reward_id, Reward::INVENTORY_FIELD, Adjustment::Debit(1))?;
        let balance = self.customers.update_field(
            customer_id,
            Customer::REWARD_POINTS_FIELD,
            Adjustment::Debit(cost),
        )?;

        info!(
            customer = customer_id,
            reward = reward_id,
            points = cost,
            balance,
            "reward redeemed"
        );

        Ok(Redemption {
            customer_id: customer_id.to_string(),
            reward,
            points_spent: cost,
            balance,
            remaining_inventory,
        })
    }

    /// Price `item` against `total`, then deduct its inventory
    ///
    /// The new running total is computed before any write, so an item whose
    /// cost overflows is rejected with the store untouched.
    fn deduct_line_item(
        &self,
        item: &LineItem,
        total: Decimal,
    ) -> Result<(CommittedItem, Decimal), StoreError> {
        let product = self.products.find_by_id(&item.product_id)?;
        let running_total = product
            .price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| StoreError::arithmetic_overflow("purchase total", &item.product_id))?;

        let remaining_inventory = self.products.update_field(
            &item.product_id,
            Product::INVENTORY_FIELD,
            Adjustment::Debit(i64::from(item.quantity)),
        )?;

        let committed = CommittedItem {
            product_id: product.id().to_string(),
            quantity: item.quantity,
            unit_price: product.price,
            remaining_inventory,
        };
        Ok((committed, running_total))
    }

    fn is_item_rejection(error: &StoreError) -> bool {
        matches!(
            error,
            StoreError::NotFound { .. }
                | StoreError::InsufficientResource { .. }
                | StoreError::ArithmeticOverflow { .. }
        )
    }
}
