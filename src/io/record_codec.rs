//! Block encoding and decoding
//!
//! A block is one header line followed by a fixed number of tab-indented
//! `Label: value` field lines:
//!
//! ```text
//! Customer 3
//! 	ID: CustID1234567890
//! 	User name: U_abcde123
//! 	First Name: Jane
//! 	Last Name: Doe
//! 	Age: 42
//! 	Credit Card: 1234-5678-9012
//! 	Total Reward Points: 20
//! ```
//!
//! Encoding must reproduce labels exactly: lookups compare the trimmed sentinel
//! line byte for byte. Decoding trims each line, splits at the first `:`,
//! checks the label, and trims the value.
//!
//! All functions are pure (no I/O) for easy testing.

use crate::core::traits::Record;
use crate::io::line_store::trim;
use crate::types::{Customer, EntityKind, Product, Reward, Transaction};
use crate::types::{NewCustomer, NewProduct, NewReward, NewTransaction};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Indentation written before every field line
pub const FIELD_INDENT: &str = "\t";

/// Failure to decode part of a block
///
/// `offset` is relative to the first line handed to the decoder, so callers
/// can translate it into a file line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub offset: usize,
    pub message: String,
}

impl DecodeError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        DecodeError {
            offset,
            message: message.into(),
        }
    }
}

/// A decoded block together with its header ordinal
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub ordinal: u64,
    pub record: R,
    /// Lines taken from the input, header included
    pub consumed: usize,
}

/// Header line for a block of kind `R`
pub fn header<R: Record>(ordinal: u64) -> String {
    format!("{} {}", R::KIND.header_word(), ordinal)
}

/// One encoded field line
pub fn encode_field(label: &str, value: &str) -> String {
    format!("{}{}: {}", FIELD_INDENT, label, value)
}

/// Encode a record as its header plus one line per field
pub fn encode<R: Record>(record: &R, ordinal: u64) -> Vec<String> {
    let mut lines = Vec::with_capacity(R::LABELS.len() + 1);
    lines.push(header::<R>(ordinal));
    for (label, value) in R::LABELS.iter().zip(record.field_values()) {
        lines.push(encode_field(label, &value));
    }
    lines
}

/// Split a field line into its trimmed label and value
///
/// Returns `None` when the line has no `:`.
pub fn split_field(line: &str) -> Option<(&str, &str)> {
    let (label, value) = trim(line).split_once(':')?;
    Some((trim(label), trim(value)))
}

/// Decode exactly `R::LABELS.len()` field lines, starting at the sentinel
pub fn decode_fields<R: Record>(lines: &[String]) -> Result<R, DecodeError> {
    let expected = R::LABELS.len();
    if lines.len() < expected {
        return Err(DecodeError::new(
            lines.len(),
            format!(
                "{} block has {} field lines, expected {}",
                R::KIND,
                lines.len(),
                expected
            ),
        ));
    }

    let mut values = Vec::with_capacity(expected);
    for (offset, (line, label)) in lines.iter().zip(R::LABELS).enumerate() {
        let (found, value) = split_field(line)
            .ok_or_else(|| DecodeError::new(offset, format!("expected '{}:' field", label)))?;
        if found != *label {
            return Err(DecodeError::new(
                offset,
                format!("expected '{}' field, found '{}'", label, found),
            ));
        }
        values.push(value);
    }

    R::from_field_values(&values).map_err(|message| DecodeError::new(0, message))
}

/// Decode a whole block, starting at its header line
pub fn decode_block<R: Record>(lines: &[String]) -> Result<Decoded<R>, DecodeError> {
    let first = lines
        .first()
        .ok_or_else(|| DecodeError::new(0, "expected block header, found end of file"))?;
    let ordinal = R::KIND.parse_header(first).ok_or_else(|| {
        DecodeError::new(
            0,
            format!("expected '{} <n>' header, found '{}'", R::KIND.header_word(), trim(first)),
        )
    })?;

    let record = decode_fields::<R>(&lines[1..]).map_err(|e| DecodeError {
        offset: e.offset + 1,
        message: e.message,
    })?;

    Ok(Decoded {
        ordinal,
        record,
        consumed: R::LABELS.len() + 1,
    })
}

/// Format an amount with a `$` prefix and exactly two decimals
pub fn encode_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn parse_money(label: &str, value: &str) -> Result<Decimal, String> {
    let digits = value.strip_prefix('$').unwrap_or(value);
    Decimal::from_str(trim(digits)).map_err(|_| format!("invalid {} '{}'", label, value))
}

fn parse_number<T: FromStr>(label: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {} '{}'", label, value))
}

fn encode_product_list(ids: &[String]) -> String {
    ids.iter()
        .enumerate()
        .map(|(i, id)| format!("Product {} {}", i + 1, id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_product_list(value: &str) -> Result<Vec<String>, String> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|token| {
            let parts: Vec<&str> = token.split_whitespace().collect();
            match parts.as_slice() {
                ["Product", n, id] if n.parse::<u64>().is_ok() => Ok(id.to_string()),
                _ => Err(format!("invalid product entry '{}'", trim(token))),
            }
        })
        .collect()
}

impl Record for Customer {
    const KIND: EntityKind = EntityKind::Customer;
    const LABELS: &'static [&'static str] = &[
        "ID",
        "User name",
        "First Name",
        "Last Name",
        "Age",
        "Credit Card",
        "Total Reward Points",
    ];
    type Draft = NewCustomer;

    fn from_draft(id: String, draft: NewCustomer) -> Self {
        Customer::from_draft(id, draft)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.age.to_string(),
            self.credit_card.clone(),
            self.reward_points.to_string(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Result<Self, String> {
        Ok(Customer {
            id: values[0].to_string(),
            username: values[1].to_string(),
            first_name: values[2].to_string(),
            last_name: values[3].to_string(),
            age: parse_number("age", values[4])?,
            credit_card: values[5].to_string(),
            reward_points: parse_number("reward points", values[6])?,
        })
    }
}

impl Record for Product {
    const KIND: EntityKind = EntityKind::Product;
    const LABELS: &'static [&'static str] = &["ID", "Name", "Price", "Inventory Count"];
    type Draft = NewProduct;

    fn from_draft(id: String, draft: NewProduct) -> Self {
        Product::from_draft(id, draft)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            encode_money(self.price),
            self.inventory.to_string(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Result<Self, String> {
        Ok(Product {
            id: values[0].to_string(),
            name: values[1].to_string(),
            price: parse_money("price", values[2])?,
            inventory: parse_number("inventory count", values[3])?,
        })
    }
}

impl Record for Reward {
    const KIND: EntityKind = EntityKind::Reward;
    const LABELS: &'static [&'static str] = &["ID", "Name", "Point Value", "Inventory Count"];
    type Draft = NewReward;

    fn from_draft(id: String, draft: NewReward) -> Self {
        Reward::from_draft(id, draft)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.point_value.to_string(),
            self.inventory.to_string(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Result<Self, String> {
        Ok(Reward {
            id: values[0].to_string(),
            name: values[1].to_string(),
            point_value: parse_number("point value", values[2])?,
            inventory: parse_number("inventory count", values[3])?,
        })
    }
}

impl Record for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;
    const LABELS: &'static [&'static str] = &[
        "Transaction ID",
        "User ID",
        "Products",
        "Total Amount",
        "Total Reward Points",
    ];
    type Draft = NewTransaction;

    fn from_draft(id: String, draft: NewTransaction) -> Self {
        Transaction::from_draft(id, draft)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_id.clone(),
            encode_product_list(&self.product_ids),
            encode_money(self.total_amount),
            self.reward_points.to_string(),
        ]
    }

    fn from_field_values(values: &[&str]) -> Result<Self, String> {
        Ok(Transaction {
            id: values[0].to_string(),
            customer_id: values[1].to_string(),
            product_ids: parse_product_list(values[2])?,
            total_amount: parse_money("total amount", values[3])?,
            reward_points: parse_number("reward points", values[4])?,
        })
    }
}
