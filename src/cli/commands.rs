//! One-shot subcommands
//!
//! Each subcommand validates its arguments with the same validators the shell
//! uses, performs one ledger operation, and prints the outcome.

use crate::cli::args::{
    Command, CustomerCommand, ProductCommand, RewardCommand, TransactionCommand,
};
use crate::cli::render::{render_list, render_receipt, render_record, render_redemption};
use crate::cli::validate::{self, ExistingCustomers};
use crate::cli::CliError;
use crate::core::Ledger;
use crate::types::{EntityKind, NewCustomer, NewProduct, NewReward};
use std::io::Write;

/// Run a non-interactive command against `ledger`
///
/// # Errors
///
/// Returns an error if an argument fails validation or the ledger operation
/// fails. `Command::Shell` is handled by the caller and does nothing here.
pub fn run(command: Command, ledger: &mut Ledger, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Customer(cmd) => customer(cmd, ledger, out),
        Command::Product(cmd) => product(cmd, ledger, out),
        Command::Reward(cmd) => reward(cmd, ledger, out),
        Command::Transaction(cmd) => transaction(cmd, ledger, out),
        Command::Purchase { customer, items } => {
            let customer = EntityKind::Customer.qualify_id(&customer);
            let receipt = ledger.purchase(&customer, &items)?;
            render_receipt(&receipt, out)?;
            Ok(())
        }
        Command::Redeem { customer, reward } => {
            let customer = EntityKind::Customer.qualify_id(&customer);
            let reward = EntityKind::Reward.qualify_id(&reward);
            let redemption = ledger.redeem(&customer, &reward)?;
            render_redemption(&redemption, out)?;
            Ok(())
        }
        Command::Shell => Ok(()),
    }
}

fn customer(cmd: CustomerCommand, ledger: &mut Ledger, out: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        CustomerCommand::Add {
            username,
            first_name,
            last_name,
            age,
            card,
        } => {
            let existing = ExistingCustomers::from_stored(&ledger.customers().list()?);
            let draft = NewCustomer {
                username: validate::username(&username, &existing)?,
                first_name: validate::person_name(&first_name)?,
                last_name: validate::person_name(&last_name)?,
                age: validate::age(&age)?,
                credit_card: validate::credit_card(&card, &existing)?,
            };
            let stored = ledger.register_customer(draft)?;
            writeln!(out, "Customer registered: {}", stored.record.id)?;
            render_record(&stored.record, out)?;
        }
        CustomerCommand::Remove { id } => {
            let removed = ledger.remove_customer(&EntityKind::Customer.qualify_id(&id))?;
            writeln!(out, "Removed customer {}", removed.id)?;
        }
        CustomerCommand::Show { id } => {
            let found = ledger.customer(&EntityKind::Customer.qualify_id(&id))?;
            render_record(&found, out)?;
        }
        CustomerCommand::List { format } => {
            render_list(&ledger.customers().list()?, format, out)?;
        }
    }
    Ok(())
}

fn product(cmd: ProductCommand, ledger: &mut Ledger, out: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        ProductCommand::Add {
            name,
            price,
            inventory,
        } => {
            let draft = NewProduct {
                name: validate::item_name(&name)?,
                price: validate::price(&price)?,
                inventory: validate::positive_count(&inventory, "inventory count")?,
            };
            let stored = ledger.add_product(draft)?;
            writeln!(out, "Product added: {}", stored.record.id)?;
            render_record(&stored.record, out)?;
        }
        ProductCommand::Remove { id } => {
            let removed = ledger.remove_product(&EntityKind::Product.qualify_id(&id))?;
            writeln!(out, "Removed product {}", removed.id)?;
        }
        ProductCommand::Show { id } => {
            let found = ledger.product(&EntityKind::Product.qualify_id(&id))?;
            render_record(&found, out)?;
        }
        ProductCommand::List { format } => {
            render_list(&ledger.products().list()?, format, out)?;
        }
    }
    Ok(())
}

fn reward(cmd: RewardCommand, ledger: &mut Ledger, out: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        RewardCommand::Add {
            name,
            points,
            inventory,
        } => {
            let draft = NewReward {
                name: validate::item_name(&name)?,
                point_value: validate::positive_count(&points, "point value")?,
                inventory: validate::positive_count(&inventory, "inventory count")?,
            };
            let stored = ledger.add_reward(draft)?;
            writeln!(out, "Reward added: {}", stored.record.id)?;
            render_record(&stored.record, out)?;
        }
        RewardCommand::Remove { id } => {
            let removed = ledger.remove_reward(&EntityKind::Reward.qualify_id(&id))?;
            writeln!(out, "Removed reward {}", removed.id)?;
        }
        RewardCommand::Show { id } => {
            let found = ledger.reward(&EntityKind::Reward.qualify_id(&id))?;
            render_record(&found, out)?;
        }
        RewardCommand::List { format } => {
            render_list(&ledger.rewards().list()?, format, out)?;
        }
    }
    Ok(())
}

fn transaction(
    cmd: TransactionCommand,
    ledger: &mut Ledger,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match cmd {
        TransactionCommand::Show { id } => {
            let found = ledger.transaction(&EntityKind::Transaction.qualify_id(&id))?;
            render_record(&found, out)?;
        }
        TransactionCommand::List { format } => {
            render_list(&ledger.transactions().list()?, format, out)?;
        }
    }
    Ok(())
}
