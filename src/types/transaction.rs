//! Transaction records
//!
//! A transaction is the append-only receipt of one purchase: who bought, which
//! products were committed, the total, and the points it earned.

use rust_decimal::Decimal;

/// Transaction record as stored in `transactions.txt`
///
/// Transactions are never updated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Full id, `Transaction` followed by 7 digits
    pub id: String,

    /// Full id of the purchasing customer
    ///
    /// Checked for existence when the purchase starts, not when the record is
    /// written.
    pub customer_id: String,

    /// Ids of the committed line items, in purchase order
    pub product_ids: Vec<String>,

    /// Sum of `price * quantity` over committed line items
    pub total_amount: Decimal,

    /// Points credited to the customer for this purchase
    pub reward_points: i64,
}

impl Transaction {
    pub fn from_draft(id: String, draft: NewTransaction) -> Self {
        Transaction {
            id,
            customer_id: draft.customer_id,
            product_ids: draft.product_ids,
            total_amount: draft.total_amount.round_dp(2),
            reward_points: draft.reward_points,
        }
    }
}

/// Transaction contents, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub total_amount: Decimal,
    pub reward_points: i64,
}
