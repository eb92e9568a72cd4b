//! Customer records
//!
//! A customer carries identity details supplied at registration plus a reward
//! points balance that purchases credit and redemptions debit.

/// Customer record as stored in `customers.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full id, `CustID` followed by 10 digits
    pub id: String,

    /// Login name, `U_` followed by 8 letters/digits
    pub username: String,

    /// Capitalized first name
    pub first_name: String,

    /// Capitalized last name
    pub last_name: String,

    /// Age in years (0-100)
    pub age: u8,

    /// Payment card in `XXXX-XXXX-XXXX` form
    pub credit_card: String,

    /// Current reward points balance
    ///
    /// Mutated in place by purchases (credit) and redemptions (debit).
    pub reward_points: i64,
}

impl Customer {
    /// Position of the `Total Reward Points` line among the block's fields
    pub const REWARD_POINTS_FIELD: usize = 6;

    /// Build a fresh customer from validated registration details
    ///
    /// Names are capitalized (first letter upper, rest lower) and the balance
    /// starts at zero.
    pub fn from_draft(id: String, draft: NewCustomer) -> Self {
        Customer {
            id,
            username: draft.username,
            first_name: capitalize(&draft.first_name),
            last_name: capitalize(&draft.last_name),
            age: draft.age,
            credit_card: draft.credit_card,
            reward_points: 0,
        }
    }
}

/// Validated registration details, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub credit_card: String,
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
