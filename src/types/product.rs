//! Product records
//!
//! Products are the purchasable catalogue. Their inventory count is decremented
//! in place by purchases.

use rust_decimal::Decimal;

/// Product record as stored in `products.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Full id, `Prod` followed by 5 digits
    pub id: String,

    /// Display name (letters and underscores)
    pub name: String,

    /// Unit price, encoded with exactly two decimal places
    pub price: Decimal,

    /// Units in stock
    pub inventory: u32,
}

impl Product {
    /// Position of the `Inventory Count` line among the block's fields
    pub const INVENTORY_FIELD: usize = 3;

    /// Build a product from validated catalogue details
    pub fn from_draft(id: String, draft: NewProduct) -> Self {
        Product {
            id,
            name: draft.name,
            price: draft.price.round_dp(2),
            inventory: draft.inventory,
        }
    }
}

/// Validated catalogue details, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub inventory: u32,
}
