//! CSV output for listed records
//!
//! This module centralizes the CSV export of store listings, providing:
//! - One flat row structure per record kind
//! - Conversion from stored records to rows
//! - Serialization of a listing to any writer
//!
//! Amounts keep the `$x.xx` text used in the stores so both renderings agree.

use crate::core::repository::Stored;
use crate::io::record_codec::encode_money;
use crate::types::{Customer, Product, Reward, StoreError, Transaction};
use serde::Serialize;
use std::io::Write;

/// Conversion from a stored record to its CSV row
pub trait CsvRow: Sized {
    type Row: Serialize;

    fn to_row(stored: &Stored<Self>) -> Self::Row;
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CustomerRow {
    pub ordinal: u64,
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub credit_card: String,
    pub reward_points: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProductRow {
    pub ordinal: u64,
    pub id: String,
    pub name: String,
    pub price: String,
    pub inventory: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RewardRow {
    pub ordinal: u64,
    pub id: String,
    pub name: String,
    pub point_value: u32,
    pub inventory: u32,
}

/// Product ids are joined with `;` so the column stays a single field
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TransactionRow {
    pub ordinal: u64,
    pub id: String,
    pub customer_id: String,
    pub products: String,
    pub total_amount: String,
    pub reward_points: i64,
}

impl CsvRow for Customer {
    type Row = CustomerRow;

    fn to_row(stored: &Stored<Self>) -> CustomerRow {
        let c = &stored.record;
        CustomerRow {
            ordinal: stored.ordinal,
            id: c.id.clone(),
            username: c.username.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            age: c.age,
            credit_card: c.credit_card.clone(),
            reward_points: c.reward_points,
        }
    }
}

impl CsvRow for Product {
    type Row = ProductRow;

    fn to_row(stored: &Stored<Self>) -> ProductRow {
        let p = &stored.record;
        ProductRow {
            ordinal: stored.ordinal,
            id: p.id.clone(),
            name: p.name.clone(),
            price: encode_money(p.price),
            inventory: p.inventory,
        }
    }
}

impl CsvRow for Reward {
    type Row = RewardRow;

    fn to_row(stored: &Stored<Self>) -> RewardRow {
        let r = &stored.record;
        RewardRow {
            ordinal: stored.ordinal,
            id: r.id.clone(),
            name: r.name.clone(),
            point_value: r.point_value,
            inventory: r.inventory,
        }
    }
}

impl CsvRow for Transaction {
    type Row = TransactionRow;

    fn to_row(stored: &Stored<Self>) -> TransactionRow {
        let t = &stored.record;
        TransactionRow {
            ordinal: stored.ordinal,
            id: t.id.clone(),
            customer_id: t.customer_id.clone(),
            products: t.product_ids.join(";"),
            total_amount: encode_money(t.total_amount),
            reward_points: t.reward_points,
        }
    }
}

/// Write a listing as CSV with a header row
///
/// Rows keep the store's order. An empty listing writes nothing, since the
/// header comes from the first serialized row.
///
/// # Errors
///
/// Returns `IoError` if serialization or the underlying write fails.
pub fn write_csv<R: CsvRow>(records: &[Stored<R>], output: &mut dyn Write) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_writer(output);

    for stored in records {
        writer
            .serialize(R::to_row(stored))
            .map_err(|e| StoreError::IoError {
                message: format!("Failed to write CSV record: {}", e),
            })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn product(ordinal: u64, id: &str, price: Decimal, inventory: u32) -> Stored<Product> {
        Stored {
            ordinal,
            record: Product {
                id: id.to_string(),
                name: "Widget".to_string(),
                price,
                inventory,
            },
        }
    }

    #[rstest]
    #[case::empty(vec![], "")]
    #[case::single(
        vec![product(1, "Prod12345", Decimal::new(250, 2), 4)],
        "ordinal,id,name,price,inventory\n1,Prod12345,Widget,$2.50,4\n"
    )]
    #[case::keeps_store_order(
        vec![
            product(3, "Prod33333", Decimal::new(1, 0), 0),
            product(1, "Prod11111", Decimal::new(199, 2), 9),
        ],
        "ordinal,id,name,price,inventory\n3,Prod33333,Widget,$1.00,0\n1,Prod11111,Widget,$1.99,9\n"
    )]
    fn test_write_products_csv(#[case] records: Vec<Stored<Product>>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_csv(&records, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_transactions_csv() {
        let records = vec![Stored {
            ordinal: 2,
            record: Transaction {
                id: "Transaction1234567".to_string(),
                customer_id: "CustID1234567890".to_string(),
                product_ids: vec!["Prod11111".to_string(), "Prod22222".to_string()],
                total_amount: Decimal::new(10, 0),
                reward_points: 20,
            },
        }];

        let mut output = Vec::new();
        write_csv(&records, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "ordinal,id,customer_id,products,total_amount,reward_points\n\
             2,Transaction1234567,CustID1234567890,Prod11111;Prod22222,$10.00,20\n"
        );
    }

    #[test]
    fn test_write_customers_csv() {
        let records = vec![Stored {
            ordinal: 1,
            record: Customer {
                id: "CustID1234567890".to_string(),
                username: "U_abcde123".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                age: 42,
                credit_card: "1234-5678-9012".to_string(),
                reward_points: 5,
            },
        }];

        let mut output = Vec::new();
        write_csv(&records, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "ordinal,id,username,first_name,last_name,age,credit_card,reward_points\n\
             1,CustID1234567890,U_abcde123,Jane,Doe,42,1234-5678-9012,5\n"
        );
    }
}
