//! Reward catalogue records
//!
//! Rewards are products that can be redeemed for points instead of bought.
//! They live in their own store (`rewardsList.txt`) with their own stock.

/// Reward record as stored in `rewardsList.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    /// Full id, `Prod` followed by 5 digits
    pub id: String,

    /// Display name (letters and underscores)
    pub name: String,

    /// Points debited from the customer on redemption
    pub point_value: u32,

    /// Units left to redeem
    pub inventory: u32,
}

impl Reward {
    /// Position of the `Point Value` line among the block's fields
    pub const POINT_VALUE_FIELD: usize = 2;

    /// Position of the `Inventory Count` line among the block's fields
    pub const INVENTORY_FIELD: usize = 3;

    pub fn from_draft(id: String, draft: NewReward) -> Self {
        Reward {
            id,
            name: draft.name,
            point_value: draft.point_value,
            inventory: draft.inventory,
        }
    }
}

/// Validated reward details, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub name: String,
    pub point_value: u32,
    pub inventory: u32,
}
