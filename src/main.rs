//! Loyalty Records CLI
//!
//! Command-line interface for the customer, product, reward and transaction
//! stores.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                   # interactive menu
//! cargo run -- customer add --username U_abcde123 --first-name jane \
//!     --last-name doe --age 42 --card 1234-5678-9012
//! cargo run -- product add --name Widget --price 2.50 --inventory 10
//! cargo run -- purchase 1234567890 --item 12345:2
//! cargo run -- redeem 1234567890 54321
//! cargo run -- --data-dir ./stores product list --format csv
//! ```
//!
//! Stores live in the current directory unless `--data-dir` or
//! `LOYALTY_DATA_DIR` says otherwise. Logs go to stderr; set `RUST_LOG` or pass
//! `--verbose` to see store mutations.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown id, invalid field, unreadable store, etc.)

use loyalty_records::cli;
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();
    cli::init_logging(args.verbose);

    if let Err(e) = cli::execute(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
