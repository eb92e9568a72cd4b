//! Text rendering of records and ledger outcomes
//!
//! Single records and text listings are printed in the same block format the
//! stores use, so what the operator sees is what is on disk.

use crate::cli::args::OutputFormat;
use crate::core::{PurchaseReceipt, Record, Redemption, Stored};
use crate::io::csv_format::{write_csv, CsvRow};
use crate::io::record_codec::{self, encode_money};
use crate::types::StoreError;
use std::io::Write;

/// Print a record's field lines without a header
pub fn render_record<R: Record>(record: &R, out: &mut dyn Write) -> Result<(), StoreError> {
    for (label, value) in R::LABELS.iter().zip(record.field_values()) {
        writeln!(out, "{}", record_codec::encode_field(label, &value))?;
    }
    Ok(())
}

/// Print a listing as stored blocks or as CSV
pub fn render_list<R: Record + CsvRow>(
    records: &[Stored<R>],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), StoreError> {
    match format {
        OutputFormat::Csv => write_csv(records, out),
        OutputFormat::Text if records.is_empty() => {
            writeln!(out, "No {} records", R::KIND)?;
            Ok(())
        }
        OutputFormat::Text => {
            for stored in records {
                for line in record_codec::encode(&stored.record, stored.ordinal) {
                    writeln!(out, "{}", line)?;
                }
            }
            Ok(())
        }
    }
}

pub fn render_receipt(receipt: &PurchaseReceipt, out: &mut dyn Write) -> Result<(), StoreError> {
    for item in &receipt.committed {
        writeln!(
            out,
            "Added {} of {} at {} each ({} left)",
            item.quantity,
            item.product_id,
            encode_money(item.unit_price),
            item.remaining_inventory
        )?;
    }
    for rejected in &receipt.rejected {
        writeln!(
            out,
            "Skipped {} x{}: {}",
            rejected.item.product_id, rejected.item.quantity, rejected.reason
        )?;
    }

    let tx = &receipt.transaction.record;
    writeln!(
        out,
        "{} recorded: total {}, {} reward points earned",
        tx.id,
        encode_money(tx.total_amount),
        tx.reward_points
    )?;
    writeln!(out, "Reward balance: {}", receipt.balance)?;
    Ok(())
}

pub fn render_redemption(redemption: &Redemption, out: &mut dyn Write) -> Result<(), StoreError> {
    writeln!(
        out,
        "Redeemed {} ({}) for {} points",
        redemption.reward.id, redemption.reward.name, redemption.points_spent
    )?;
    writeln!(out, "Reward balance: {}", redemption.balance)?;
    writeln!(out, "{} left in stock", redemption.remaining_inventory)?;
    Ok(())
}
