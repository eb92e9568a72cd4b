//! Field validators for operator input
//!
//! Each validator takes the raw text an operator typed and returns either the
//! typed value the ledger expects or a `ValidationError` that explains what is
//! wrong. Uniqueness of usernames and card numbers is checked against the
//! customers already stored.

use crate::core::repository::Stored;
use crate::types::Customer;
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

const USERNAME_PREFIX: &str = "U_";
const USERNAME_LENGTH: usize = 10;
const PERSON_NAME_MAX: usize = 12;
const MAX_AGE: u8 = 100;

/// Letter and digit counts accepted after the username prefix
const USERNAME_MIXES: [(usize, usize); 4] = [(5, 3), (6, 2), (7, 1), (8, 0)];

/// Rejected operator input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid username: {reason}")]
    Username { reason: &'static str },

    #[error("Username {username} already exists")]
    UsernameTaken { username: String },

    #[error("Invalid name: use 1 to 12 letters")]
    PersonName,

    #[error("Invalid age: enter a whole number from 0 to 100")]
    Age,

    #[error("Invalid credit card: {reason}")]
    CreditCard { reason: &'static str },

    #[error("Credit card {card} already exists")]
    CreditCardTaken { card: String },

    #[error("Invalid name: use letters and underscores only")]
    ItemName,

    #[error("Invalid price: {reason}")]
    Price { reason: &'static str },

    #[error("Invalid {what}: enter a positive whole number")]
    Count { what: &'static str },

    #[error("Invalid {what}: enter a whole number")]
    WholeNumber { what: &'static str },
}

/// Usernames and card numbers already held by stored customers
#[derive(Debug, Default, Clone)]
pub struct ExistingCustomers {
    usernames: HashSet<String>,
    cards: HashSet<String>,
}

impl ExistingCustomers {
    pub fn from_stored(customers: &[Stored<Customer>]) -> Self {
        ExistingCustomers {
            usernames: customers.iter().map(|s| s.record.username.clone()).collect(),
            cards: customers.iter().map(|s| s.record.credit_card.clone()).collect(),
        }
    }
}

/// `U_` followed by eight letters and digits, with 5 to 8 of them letters
pub fn username(input: &str, existing: &ExistingCustomers) -> Result<String, ValidationError> {
    let input = input.trim();
    if existing.usernames.contains(input) {
        return Err(ValidationError::UsernameTaken {
            username: input.to_string(),
        });
    }

    let rest = match input.strip_prefix(USERNAME_PREFIX) {
        Some(rest) if input.len() == USERNAME_LENGTH => rest,
        _ => {
            return Err(ValidationError::Username {
                reason: "must start with 'U_' and be exactly 10 characters long",
            })
        }
    };

    if !rest.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::Username {
            reason: "only letters and digits may follow 'U_'",
        });
    }

    let letters = rest.chars().filter(char::is_ascii_alphabetic).count();
    let digits = rest.len() - letters;
    if !USERNAME_MIXES.contains(&(letters, digits)) {
        return Err(ValidationError::Username {
            reason: "use 5 to 8 letters and fill the rest with digits",
        });
    }

    Ok(input.to_string())
}

/// First or last name: 1 to 12 ASCII letters
pub fn person_name(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.is_empty()
        || input.len() > PERSON_NAME_MAX
        || !input.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(ValidationError::PersonName);
    }
    Ok(input.to_string())
}

pub fn age(input: &str) -> Result<u8, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Age);
    }
    match input.parse::<u8>() {
        Ok(age) if age <= MAX_AGE => Ok(age),
        _ => Err(ValidationError::Age),
    }
}

/// Card number in `XXXX-XXXX-XXXX` form, not starting with 0
pub fn credit_card(input: &str, existing: &ExistingCustomers) -> Result<String, ValidationError> {
    let input = input.trim();
    if existing.cards.contains(input) {
        return Err(ValidationError::CreditCardTaken {
            card: input.to_string(),
        });
    }

    let groups: Vec<&str> = input.split('-').collect();
    let well_formed = groups.len() == 3
        && groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(ValidationError::CreditCard {
            reason: "use the format XXXX-XXXX-XXXX with digits only",
        });
    }
    if input.starts_with('0') {
        return Err(ValidationError::CreditCard {
            reason: "card number cannot start with 0",
        });
    }

    Ok(input.to_string())
}

/// Product or reward name: letters and underscores, not empty
pub fn item_name(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return Err(ValidationError::ItemName);
    }
    Ok(input.to_string())
}

/// Positive amount with at most two decimal places
pub fn price(input: &str) -> Result<Decimal, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(ValidationError::Price {
            reason: "must be a number",
        });
    }

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    if fraction.contains('.') {
        return Err(ValidationError::Price {
            reason: "use at most one decimal point",
        });
    }
    if fraction.len() > 2 {
        return Err(ValidationError::Price {
            reason: "use at most two decimal places",
        });
    }
    if whole.is_empty() && fraction.is_empty() {
        return Err(ValidationError::Price {
            reason: "must be a number",
        });
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let cents: i64 = format!("{}{:0<2}", whole, fraction)
        .parse()
        .map_err(|_| ValidationError::Price {
            reason: "too large",
        })?;
    if cents == 0 {
        return Err(ValidationError::Price {
            reason: "must be greater than zero",
        });
    }

    Ok(Decimal::new(cents, 2))
}

/// Positive whole number; `what` names the field in the error
pub fn positive_count(input: &str, what: &'static str) -> Result<u32, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Count { what });
    }
    match input.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ValidationError::Count { what }),
    }
}

/// Whole number, zero included
pub fn whole_number(input: &str, what: &'static str) -> Result<u32, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::WholeNumber { what });
    }
    input
        .parse::<u32>()
        .map_err(|_| ValidationError::WholeNumber { what })
}
