use crate::config::StoreConfig;
use crate::core::LineItem;
use crate::types::EntityKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Manage loyalty customers, products, rewards and transactions
#[derive(Parser, Debug)]
#[command(name = "loyalty-records")]
#[command(about = "Manage loyalty customers, products, rewards and transactions", long_about = None)]
pub struct CliArgs {
    /// Directory holding the store and count files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        global = true,
        help = "Directory holding the store files (default: $LOYALTY_DATA_DIR or current directory)"
    )]
    pub data_dir: Option<PathBuf>,

    /// Invalid answers tolerated per shell prompt
    #[arg(
        long = "prompt-attempts",
        value_name = "COUNT",
        global = true,
        help = "Invalid answers tolerated per shell prompt, 0 for unbounded (default: 3)"
    )]
    pub prompt_attempts: Option<u32>,

    /// Log store mutations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run; the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register, remove, show or list customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Add, remove, show or list products
    #[command(subcommand)]
    Product(ProductCommand),

    /// Add, remove, show or list rewards
    #[command(subcommand)]
    Reward(RewardCommand),

    /// Show or list transactions
    #[command(subcommand)]
    Transaction(TransactionCommand),

    /// Buy products and earn reward points
    Purchase {
        /// Customer id, with or without the CustID prefix
        customer: String,

        /// Product and quantity, e.g. Prod12345:2 or 12345:2
        #[arg(
            long = "item",
            value_name = "PRODUCT:QTY",
            required = true,
            value_parser = parse_line_item
        )]
        items: Vec<LineItem>,
    },

    /// Spend reward points on one unit of a reward
    Redeem {
        /// Customer id, with or without the CustID prefix
        customer: String,

        /// Reward id, with or without the Prod prefix
        reward: String,
    },

    /// Interactive menu
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Register a new customer with zero reward points
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        age: String,
        #[arg(long, value_name = "XXXX-XXXX-XXXX")]
        card: String,
    },
    Remove {
        id: String,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        inventory: String,
    },
    Remove {
        id: String,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum RewardCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        points: String,
        #[arg(long)]
        inventory: String,
    },
    Remove {
        id: String,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    Show {
        id: String,
    },
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// How listings are printed
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Blocks exactly as stored
    Text,
    Csv,
}

/// Parse `PRODUCT:QTY` into a line item with a fully qualified product id
pub fn parse_line_item(input: &str) -> Result<LineItem, String> {
    let (product, quantity) = input
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT:QTY, got '{}'", input))?;

    let product = product.trim();
    if product.is_empty() {
        return Err(format!("missing product id in '{}'", input));
    }
    let quantity = match quantity.trim().parse::<u32>() {
        Ok(q) if q > 0 => q,
        _ => return Err(format!("quantity must be a positive whole number in '{}'", input)),
    };

    Ok(LineItem {
        product_id: EntityKind::Product.qualify_id(product),
        quantity,
    })
}

impl CliArgs {
    /// Build the store configuration
    ///
    /// Flags take priority over environment variables, which take priority
    /// over defaults.
    pub fn to_store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::from_env();
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(attempts) = self.prompt_attempts {
            config.prompt_attempts = attempts;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_no_subcommand_means_shell() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        assert!(parsed.command.is_none());
        assert!(!parsed.verbose);
    }

    #[rstest]
    #[case::before_command(&["program", "--data-dir", "/tmp/x", "shell"])]
    #[case::after_command(&["program", "shell", "--data-dir", "/tmp/x"])]
    fn test_global_data_dir(#[case] args: &[&str]) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.to_store_config().data_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_prompt_attempts_flag() {
        let parsed = CliArgs::try_parse_from(["program", "--prompt-attempts", "0"]).unwrap();
        assert_eq!(parsed.to_store_config().prompt_attempts, 0);
    }

    #[test]
    fn test_purchase_items() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "purchase",
            "1234567890",
            "--item",
            "Prod11111:2",
            "--item",
            "22222:1",
        ])
        .unwrap();

        match parsed.command {
            Some(Command::Purchase { customer, items }) => {
                assert_eq!(customer, "1234567890");
                assert_eq!(
                    items,
                    vec![
                        LineItem {
                            product_id: "Prod11111".to_string(),
                            quantity: 2
                        },
                        LineItem {
                            product_id: "Prod22222".to_string(),
                            quantity: 1
                        },
                    ]
                );
            }
            other => panic!("Expected purchase, got {:?}", other),
        }
    }

    #[rstest]
    #[case::list_csv(&["program", "product", "list", "--format", "csv"], OutputFormat::Csv)]
    #[case::list_default(&["program", "product", "list"], OutputFormat::Text)]
    fn test_list_format(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match parsed.command {
            Some(Command::Product(ProductCommand::List { format })) => assert_eq!(format, expected),
            other => panic!("Expected product list, got {:?}", other),
        }
    }

    #[rstest]
    #[case::no_colon("Prod11111")]
    #[case::zero_quantity("Prod11111:0")]
    #[case::negative_quantity("Prod11111:-1")]
    #[case::missing_product(":3")]
    fn test_parse_line_item_errors(#[case] input: &str) {
        assert!(parse_line_item(input).is_err());
    }

    #[rstest]
    #[case::purchase_without_items(&["program", "purchase", "1234567890"])]
    #[case::redeem_missing_reward(&["program", "redeem", "1234567890"])]
    #[case::invalid_format(&["program", "customer", "list", "--format", "json"])]
    #[case::unknown_command(&["program", "refund"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
