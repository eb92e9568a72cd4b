//! Interactive menu
//!
//! The menu loops until the operator picks Exit or input ends. A failed
//! operation is reported on the error writer and the menu is shown again;
//! nothing short of an I/O failure ends the loop early.

use crate::cli::args::OutputFormat;
use crate::cli::prompt::{PromptError, Prompter};
use crate::cli::render::{render_list, render_receipt, render_record, render_redemption};
use crate::cli::validate::{self, ExistingCustomers};
use crate::cli::CliError;
use crate::core::{Ledger, LineItem};
use crate::types::{EntityKind, NewCustomer, NewProduct, NewReward, StoreError};
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "\n1. Register Customer\n\
                    2. Remove Customer\n\
                    3. Add Product\n\
                    4. Remove Product\n\
                    5. Add Transaction/Shopping\n\
                    6. View customer using customer ID\n\
                    7. Redeem Rewards\n\
                    8. Add Reward\n\
                    9. Remove Reward\n\
                    10. Exit\n\
                    Type a number 1 through 10: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    RegisterCustomer,
    RemoveCustomer,
    AddProduct,
    RemoveProduct,
    Shopping,
    ViewCustomer,
    RedeemRewards,
    AddReward,
    RemoveReward,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "1" => MenuChoice::RegisterCustomer,
            "2" => MenuChoice::RemoveCustomer,
            "3" => MenuChoice::AddProduct,
            "4" => MenuChoice::RemoveProduct,
            "5" => MenuChoice::Shopping,
            "6" => MenuChoice::ViewCustomer,
            "7" => MenuChoice::RedeemRewards,
            "8" => MenuChoice::AddReward,
            "9" => MenuChoice::RemoveReward,
            "10" => MenuChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// Menu loop over a ledger
pub struct Shell<'a, R, W, E> {
    ledger: &'a mut Ledger,
    prompter: Prompter<R, W>,
    errors: E,
}

impl<'a, R: BufRead, W: Write, E: Write> Shell<'a, R, W, E> {
    pub fn new(ledger: &'a mut Ledger, prompter: Prompter<R, W>, errors: E) -> Self {
        Shell {
            ledger,
            prompter,
            errors,
        }
    }

    /// Show the menu and run choices until Exit or end of input
    pub fn run(&mut self) -> Result<(), CliError> {
        loop {
            let answer = match self.prompter.ask(MENU) {
                Ok(answer) => answer,
                Err(PromptError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            let Some(choice) = MenuChoice::parse(&answer) else {
                writeln!(self.prompter.output(), "Invalid choice. Try again.")?;
                continue;
            };
            if choice == MenuChoice::Exit {
                writeln!(self.prompter.output(), "Exiting...")?;
                return Ok(());
            }

            debug!(?choice, "menu choice");
            match self.dispatch(choice) {
                Ok(()) => {}
                Err(CliError::Prompt(PromptError::Closed)) => return Ok(()),
                Err(CliError::Io(e)) => return Err(CliError::Io(e)),
                Err(e) => writeln!(self.errors, "Error: {}", e)?,
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<(), CliError> {
        match choice {
            MenuChoice::RegisterCustomer => self.register_customer(),
            MenuChoice::RemoveCustomer => self.remove(EntityKind::Customer, |ledger, id| {
                ledger.remove_customer(id).map(|c| c.id)
            }),
            MenuChoice::AddProduct => self.add_product(),
            MenuChoice::RemoveProduct => self.remove(EntityKind::Product, |ledger, id| {
                ledger.remove_product(id).map(|p| p.id)
            }),
            MenuChoice::Shopping => self.shopping(),
            MenuChoice::ViewCustomer => self.view_customer(),
            MenuChoice::RedeemRewards => self.redeem(),
            MenuChoice::AddReward => self.add_reward(),
            MenuChoice::RemoveReward => self.remove(EntityKind::Reward, |ledger, id| {
                ledger.remove_reward(id).map(|r| r.id)
            }),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn register_customer(&mut self) -> Result<(), CliError> {
        let existing = ExistingCustomers::from_stored(&self.ledger.customers().list()?);
        let p = &mut self.prompter;

        let draft = NewCustomer {
            username: p.ask_valid(
                "Enter a username (U_ followed by 8 letters and digits): ",
                |a| validate::username(a, &existing),
            )?,
            first_name: p.ask_valid("Enter the first name: ", validate::person_name)?,
            last_name: p.ask_valid("Enter the last name: ", validate::person_name)?,
            age: p.ask_valid("Enter the age: ", validate::age)?,
            credit_card: p.ask_valid("Enter the credit card (XXXX-XXXX-XXXX): ", |a| {
                validate::credit_card(a, &existing)
            })?,
        };

        let stored = self.ledger.register_customer(draft)?;
        let out = self.prompter.output();
        writeln!(out, "Customer registered: {}", stored.record.id)?;
        render_record(&stored.record, out)?;
        Ok(())
    }

    fn add_product(&mut self) -> Result<(), CliError> {
        let p = &mut self.prompter;
        let draft = NewProduct {
            name: p.ask_valid("Enter the product name: ", validate::item_name)?,
            price: p.ask_valid("Enter the product price: ", validate::price)?,
            inventory: p.ask_valid("Enter the inventory count: ", |a| {
                validate::positive_count(a, "inventory count")
            })?,
        };

        let stored = self.ledger.add_product(draft)?;
        let out = self.prompter.output();
        writeln!(out, "Product added: {}", stored.record.id)?;
        render_record(&stored.record, out)?;
        Ok(())
    }

    fn add_reward(&mut self) -> Result<(), CliError> {
        let p = &mut self.prompter;
        let draft = NewReward {
            name: p.ask_valid("Enter the reward name: ", validate::item_name)?,
            point_value: p.ask_valid("Enter the point value: ", |a| {
                validate::positive_count(a, "point value")
            })?,
            inventory: p.ask_valid("Enter the inventory count: ", |a| {
                validate::positive_count(a, "inventory count")
            })?,
        };

        let stored = self.ledger.add_reward(draft)?;
        let out = self.prompter.output();
        writeln!(out, "Reward added: {}", stored.record.id)?;
        render_record(&stored.record, out)?;
        Ok(())
    }

    fn remove<F>(&mut self, kind: EntityKind, delete: F) -> Result<(), CliError>
    where
        F: FnOnce(&mut Ledger, &str) -> Result<String, StoreError>,
    {
        let question = format!("Enter the {} ID to remove: ", kind);
        let id = self.ask_id(kind, &question)?;

        let removed = delete(&mut *self.ledger, &id)?;
        writeln!(self.prompter.output(), "Removed {} {}", kind, removed)?;
        Ok(())
    }

    fn view_customer(&mut self) -> Result<(), CliError> {
        let id = self.ask_id(EntityKind::Customer, "Enter the customer ID: ")?;
        let customer = self.ledger.customer(&id)?;
        render_record(&customer, self.prompter.output())?;
        Ok(())
    }

    fn shopping(&mut self) -> Result<(), CliError> {
        let customer = self.ask_id(EntityKind::Customer, "Enter the customer ID: ")?;
        self.ledger.customer(&customer)?;
        writeln!(self.prompter.output(), "Welcome back customer: {}", customer)?;

        let count = self.prompter.ask_valid(
            "Enter the number of different products you wish to buy: ",
            |a| validate::whole_number(a, "number of products"),
        )?;

        let mut items = Vec::new();
        for n in 1..=count {
            let product_id =
                self.ask_id(EntityKind::Product, &format!("Enter product ID #{}: ", n))?;
            let quantity = self.prompter.ask_valid(
                &format!("Enter the quantity of {}: ", product_id),
                |a| validate::positive_count(a, "quantity"),
            )?;
            items.push(LineItem {
                product_id,
                quantity,
            });
        }

        let receipt = self.ledger.purchase(&customer, &items)?;
        render_receipt(&receipt, self.prompter.output())?;
        Ok(())
    }

    fn redeem(&mut self) -> Result<(), CliError> {
        let customer_id = self.ask_id(EntityKind::Customer, "Enter the customer ID: ")?;
        let customer = self.ledger.customer(&customer_id)?;

        let rewards = self.ledger.rewards().list()?;
        let out = self.prompter.output();
        writeln!(out, "You have {} points available", customer.reward_points)?;
        writeln!(out, "Rewards that can be redeemed:")?;
        render_list(&rewards, OutputFormat::Text, out)?;

        let reward_id = self.ask_id(EntityKind::Reward, "Enter the reward ID to redeem: ")?;
        let redemption = self.ledger.redeem(&customer_id, &reward_id)?;
        render_redemption(&redemption, self.prompter.output())?;
        Ok(())
    }

    fn ask_id(&mut self, kind: EntityKind, question: &str) -> Result<String, CliError> {
        Ok(kind.qualify_id(&self.prompter.ask(question)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::core::IdAllocator;
    use rstest::rstest;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_shell(ledger: &mut Ledger, script: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut errors = Vec::new();
        {
            let prompter = Prompter::new(Cursor::new(script.to_string()), &mut out, 3);
            let mut shell = Shell::new(ledger, prompter, &mut errors);
            shell.run().unwrap();
        }
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(errors).unwrap(),
        )
    }

    fn setup() -> (TempDir, Ledger) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig::default().with_data_dir(dir.path());
        let ledger = Ledger::with_allocator(&config, IdAllocator::with_seed(5)).unwrap();
        (dir, ledger)
    }

    #[rstest]
    #[case::one("1", Some(MenuChoice::RegisterCustomer))]
    #[case::padded(" 7 ", Some(MenuChoice::RedeemRewards))]
    #[case::exit("10", Some(MenuChoice::Exit))]
    #[case::zero("0", None)]
    #[case::word("exit", None)]
    fn test_menu_choice_parse(#[case] input: &str, #[case] expected: Option<MenuChoice>) {
        assert_eq!(MenuChoice::parse(input), expected);
    }

    #[test]
    fn test_exit_and_invalid_choice() {
        let (_dir, mut ledger) = setup();

        let (out, errors) = run_shell(&mut ledger, "42\n10\n");

        assert!(out.contains("Invalid choice. Try again."));
        assert!(out.ends_with("Exiting...\n"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_register_customer_retries_invalid_fields() {
        let (_dir, mut ledger) = setup();

        let (out, _) = run_shell(
            &mut ledger,
            "1\nbad\nU_abcde123\njane\ndoe\n200\n42\n1234-5678-9012\n10\n",
        );

        assert!(out.contains("Invalid username"));
        assert!(out.contains("Invalid age"));
        let customers = ledger.customers().list().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].record.first_name, "Jane");
        assert_eq!(customers[0].record.age, 42);
    }

    #[test]
    fn test_error_returns_to_menu() {
        let (_dir, mut ledger) = setup();
        ledger
            .register_customer(NewCustomer {
                username: "U_abcde123".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                age: 30,
                credit_card: "1234-5678-9012".to_string(),
            })
            .unwrap();

        let (out, errors) = run_shell(&mut ledger, "6\n1234567890\n10\n");

        assert_eq!(errors, "Error: customer CustID1234567890 not found\n");
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_too_many_invalid_answers_returns_to_menu() {
        let (_dir, mut ledger) = setup();

        let (out, errors) = run_shell(&mut ledger, "3\n1\n2\n3\n10\n");

        assert!(errors.contains("Giving up after 3 invalid answers"));
        assert!(out.ends_with("Exiting...\n"));
        assert!(ledger.products().list().unwrap().is_empty());
    }

    #[test]
    fn test_shopping_and_redeem() {
        let (_dir, mut ledger) = setup();
        let customer = ledger
            .register_customer(NewCustomer {
                username: "U_abcde123".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                age: 30,
                credit_card: "1234-5678-9012".to_string(),
            })
            .unwrap()
            .record
            .id;
        let product = ledger
            .add_product(NewProduct {
                name: "Widget".to_string(),
                price: rust_decimal::Decimal::new(5, 0),
                inventory: 10,
            })
            .unwrap()
            .record
            .id;
        let reward = ledger
            .add_reward(NewReward {
                name: "Mug".to_string(),
                point_value: 15,
                inventory: 3,
            })
            .unwrap()
            .record
            .id;
        let digits = customer.trim_start_matches("CustID");
        let script = format!(
            "5\n{cust}\n1\n{prod}\n2\n7\n{cust}\n{reward}\n10\n",
            cust = digits,
            prod = product,
            reward = reward
        );

        let (out, errors) = run_shell(&mut ledger, &script);

        assert!(errors.is_empty(), "{}", errors);
        assert!(out.contains("20 reward points earned"));
        assert!(out.contains("You have 20 points available"));
        assert!(out.contains("Reward balance: 5"));
        assert_eq!(ledger.customer(&customer).unwrap().reward_points, 5);
        assert_eq!(ledger.product(&product).unwrap().inventory, 8);
        assert_eq!(ledger.reward(&reward).unwrap().inventory, 2);
    }

    #[test]
    fn test_end_of_input_ends_quietly() {
        let (_dir, mut ledger) = setup();

        let (_, errors) = run_shell(&mut ledger, "1\nU_abcde123\n");

        assert!(errors.is_empty());
        assert!(ledger.customers().list().unwrap().is_empty());
    }
}
