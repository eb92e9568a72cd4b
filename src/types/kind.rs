//! Entity kinds and their fixed on-disk vocabulary
//!
//! Every store holds records of exactly one kind. The kind decides the header
//! word that opens a block, the id prefix and digit width, the label of the
//! sentinel line, and the default file names.

use std::fmt;

/// The four record stores managed by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Customer,
    Product,
    Reward,
    Transaction,
}

impl EntityKind {
    /// All kinds, in the order stores are opened and seeded
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Customer,
        EntityKind::Product,
        EntityKind::Reward,
        EntityKind::Transaction,
    ];

    /// Word that opens a block header line, e.g. `Customer 3`
    pub fn header_word(self) -> &'static str {
        match self {
            EntityKind::Customer => "Customer",
            EntityKind::Product => "Product",
            EntityKind::Reward => "Reward",
            EntityKind::Transaction => "Transaction",
        }
    }

    /// Prefix prepended to the random digit string of a new id
    ///
    /// Rewards share the product prefix: the catalogue lists redeemable
    /// products, only in a separate store and namespace.
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Customer => "CustID",
            EntityKind::Product | EntityKind::Reward => "Prod",
            EntityKind::Transaction => "Transaction",
        }
    }

    /// Number of digits following the id prefix
    pub fn id_digits(self) -> u32 {
        match self {
            EntityKind::Customer => 10,
            EntityKind::Product | EntityKind::Reward => 5,
            EntityKind::Transaction => 7,
        }
    }

    /// Label of the sentinel line (always the first field of a block)
    pub fn id_label(self) -> &'static str {
        match self {
            EntityKind::Transaction => "Transaction ID",
            _ => "ID",
        }
    }

    /// The exact, trimmed sentinel line for `id`
    pub fn sentinel(self, id: &str) -> String {
        format!("{}: {}", self.id_label(), id)
    }

    /// Default store file name inside the data directory
    pub fn store_file(self) -> &'static str {
        match self {
            EntityKind::Customer => "customers.txt",
            EntityKind::Product => "products.txt",
            EntityKind::Reward => "rewardsList.txt",
            EntityKind::Transaction => "transactions.txt",
        }
    }

    /// Default count file name inside the data directory
    pub fn count_file(self) -> &'static str {
        match self {
            EntityKind::Customer => "customer_count.txt",
            EntityKind::Product => "product_count.txt",
            EntityKind::Reward => "reward_count.txt",
            EntityKind::Transaction => "transaction_count.txt",
        }
    }

    /// Accept either a full id or only its digits
    ///
    /// `"1234567890"` becomes `"CustID1234567890"` for customers; an input that
    /// already carries the prefix is returned trimmed but otherwise unchanged.
    pub fn qualify_id(self, input: &str) -> String {
        let input = input.trim();
        if input.starts_with(self.id_prefix()) {
            input.to_string()
        } else {
            format!("{}{}", self.id_prefix(), input)
        }
    }

    /// Header words accepted when reading a block of this kind
    ///
    /// Reward stores written before rewards had their own header word open
    /// each block with `Product <n>`; those still read as rewards. New blocks
    /// are always written with [`EntityKind::header_word`].
    pub fn accepted_header_words(self) -> &'static [&'static str] {
        match self {
            EntityKind::Customer => &["Customer"],
            EntityKind::Product => &["Product"],
            EntityKind::Reward => &["Reward", "Product"],
            EntityKind::Transaction => &["Transaction"],
        }
    }

    /// Parse a header line of this kind, returning its ordinal
    pub fn parse_header(self, line: &str) -> Option<u64> {
        let line = line.trim();
        self.accepted_header_words().iter().find_map(|word| {
            let ordinal = line.strip_prefix(word)?.strip_prefix(' ')?;
            ordinal.trim().parse().ok()
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_word().to_lowercase())
    }
}
