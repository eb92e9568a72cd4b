//! Line-store repository for one record kind
//!
//! This module provides the `Repository` that appends, finds, lists, deletes,
//! and adjusts records in a single store file, keeping its companion count file
//! in step.
//!
//! # Locating a Block
//!
//! Records are found by linear scan for the exact trimmed sentinel line
//! (`ID: <id>`, or `Transaction ID: <id>` for transactions). Every block of a
//! kind has a fixed number of field lines, so once the sentinel is found the
//! block is exactly that many lines long, plus the kind's header line directly
//! above it. Blank lines and neighbouring headers play no part in finding the
//! end of a block.
//!
//! # Mutation
//!
//! Deletes and field updates read the whole file, change one block, and write
//! the whole file back. When the id is absent nothing is written, so the store
//! stays byte-identical. The store write and the count write are separate; the
//! pair is not atomic and concurrent writers are not supported.

use crate::config::{StoreConfig, StorePaths};
use crate::core::id_allocator::IdAllocator;
use crate::core::traits::Record;
use crate::io::line_store::{
    append_lines, decrement_count, read_count, read_lines, trim, write_count, write_lines,
};
use crate::io::record_codec::{self, DecodeError};
use crate::types::StoreError;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A record together with the ordinal shown in its header
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<R> {
    pub ordinal: u64,
    pub record: R,
}

/// Change applied to an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Add to the current value
    Credit(i64),
    /// Subtract from the current value; the result may not go below zero
    Debit(i64),
}

impl Adjustment {
    fn operation(self) -> &'static str {
        match self {
            Adjustment::Credit(_) => "credit",
            Adjustment::Debit(_) => "debit",
        }
    }
}

/// Position of one block inside a store's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockSpan {
    /// First line of the block (the header, when one precedes the sentinel)
    start: usize,
    /// Line holding the sentinel
    sentinel: usize,
    /// One past the last field line
    end: usize,
}

/// Store of records of kind `R`
pub struct Repository<R: Record> {
    store_path: PathBuf,
    count_path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> Repository<R> {
    /// Create a repository over explicit store and count files
    pub fn new(paths: StorePaths) -> Self {
        Repository {
            store_path: paths.store,
            count_path: paths.count,
            _record: PhantomData,
        }
    }

    /// Create a repository over the configured files for `R`'s kind
    pub fn open(config: &StoreConfig) -> Self {
        Self::new(config.paths(R::KIND))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn count_path(&self) -> &Path {
        &self.count_path
    }

    /// Ordinal the next appended block will carry
    pub fn next_ordinal(&self) -> u64 {
        read_count(&self.count_path)
    }

    /// Append a new record built from `draft`
    ///
    /// Reads the count (default 1), allocates an id, appends the encoded block
    /// with that count as its ordinal, then writes count + 1.
    ///
    /// # Errors
    ///
    /// Returns an error if no id is free or either file cannot be written.
    pub fn append(
        &self,
        ids: &mut IdAllocator,
        draft: R::Draft,
    ) -> Result<Stored<R>, StoreError> {
        let ordinal = self.next_ordinal();
        let id = ids.allocate(R::KIND)?;
        let record = R::from_draft(id, draft);

        append_lines(&self.store_path, &record_codec::encode(&record, ordinal))?;
        write_count(&self.count_path, ordinal + 1)?;

        info!(kind = %R::KIND, id = record.id(), ordinal, "record appended");
        Ok(Stored { ordinal, record })
    }

    /// Find the record whose sentinel line matches `id`
    ///
    /// # Errors
    ///
    /// - `FileUnavailable` if the store cannot be opened
    /// - `NotFound` if no block carries the id
    /// - `MalformedRecord` if the matching block does not decode
    pub fn find_by_id(&self, id: &str) -> Result<R, StoreError> {
        let lines = read_lines(&self.store_path)?;
        let span = self
            .locate(&lines, id)?
            .ok_or_else(|| StoreError::not_found(R::KIND, id))?;
        self.decode_at(&lines, span)
    }

    /// Whether a block with `id` exists
    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let lines = read_lines(&self.store_path)?;
        Ok(self.locate(&lines, id)?.is_some())
    }

    /// Remove the block carrying `id` and decrement the count file
    ///
    /// Returns the removed record. When the id is absent the store is not
    /// touched and `NotFound` is returned.
    pub fn delete(&self, id: &str) -> Result<R, StoreError> {
        let mut lines = read_lines(&self.store_path)?;
        let span = self
            .locate(&lines, id)?
            .ok_or_else(|| StoreError::not_found(R::KIND, id))?;
        let removed = self.decode_at(&lines, span)?;

        lines.drain(span.start..span.end);
        write_lines(&self.store_path, &lines)?;

        match decrement_count(&self.count_path)? {
            Some(count) => debug!(kind = %R::KIND, count, "count decremented"),
            None => warn!(
                path = %self.count_path.display(),
                "count file missing, nothing to decrement"
            ),
        }

        info!(kind = %R::KIND, id, "record deleted");
        Ok(removed)
    }

    /// Apply `adjustment` to the integer field at `field` of the block carrying `id`
    ///
    /// `field` indexes `R::LABELS`. Only that line is re-encoded; every other
    /// line is written back verbatim. Returns the new value.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no block carries the id (store untouched)
    /// - `InsufficientResource` if a debit would take the value below zero (store untouched)
    /// - `MalformedRecord` if the field is not an integer
    /// - `ArithmeticOverflow` if a credit overflows
    pub fn update_field(
        &self,
        id: &str,
        field: usize,
        adjustment: Adjustment,
    ) -> Result<i64, StoreError> {
        let label = *R::LABELS.get(field).ok_or_else(|| {
            StoreError::malformed(
                &self.store_path,
                None,
                format!("{} records have no field {}", R::KIND, field),
            )
        })?;

        let mut lines = read_lines(&self.store_path)?;
        let span = self
            .locate(&lines, id)?
            .ok_or_else(|| StoreError::not_found(R::KIND, id))?;
        let index = span.sentinel + field;

        let current = match record_codec::split_field(&lines[index]) {
            Some((found, value)) if found == label => value.parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            StoreError::malformed(
                &self.store_path,
                Some(index + 1),
                format!("expected integer '{}' field", label),
            )
        })?;

        let updated = match adjustment {
            Adjustment::Credit(delta) => current
                .checked_add(delta)
                .ok_or_else(|| StoreError::arithmetic_overflow(adjustment.operation(), id))?,
            Adjustment::Debit(delta) => match current.checked_sub(delta) {
                Some(value) if value >= 0 => value,
                _ => {
                    return Err(StoreError::insufficient(
                        R::KIND,
                        id,
                        &label.to_lowercase(),
                        current,
                        delta,
                    ))
                }
            },
        };

        lines[index] = record_codec::encode_field(label, &updated.to_string());
        write_lines(&self.store_path, &lines)?;

        info!(
            kind = %R::KIND,
            id,
            field = label,
            operation = adjustment.operation(),
            from = current,
            to = updated,
            "field updated"
        );
        Ok(updated)
    }

    /// Decode every block in the store, in file order
    ///
    /// A store that does not exist yet lists as empty. Blank lines between
    /// blocks are skipped; other stray lines are skipped with a warning.
    pub fn list(&self) -> Result<Vec<Stored<R>>, StoreError> {
        if !self.store_path.exists() {
            return Ok(Vec::new());
        }
        let lines = read_lines(&self.store_path)?;

        let mut records = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            if trim(&lines[i]).is_empty() {
                i += 1;
                continue;
            }
            if R::KIND.parse_header(&lines[i]).is_none() {
                warn!(
                    path = %self.store_path.display(),
                    line = i + 1,
                    "skipping line outside any {} block",
                    R::KIND
                );
                i += 1;
                continue;
            }

            let decoded = record_codec::decode_block::<R>(&lines[i..])
                .map_err(|e| self.malformed(i, e))?;
            records.push(Stored {
                ordinal: decoded.ordinal,
                record: decoded.record,
            });
            i += decoded.consumed;
        }
        Ok(records)
    }

    /// Every id recorded on a sentinel line, in file order
    ///
    /// A store that does not exist yet has no ids.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        if !self.store_path.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}: ", R::KIND.id_label());
        Ok(read_lines(&self.store_path)?
            .iter()
            .filter_map(|line| trim(line).strip_prefix(&prefix).map(|id| trim(id).to_string()))
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Scan for the sentinel of `id`
    ///
    /// Searching stops at the first match; ids are unique within a store.
    fn locate(&self, lines: &[String], id: &str) -> Result<Option<BlockSpan>, StoreError> {
        let sentinel = R::KIND.sentinel(id);
        let Some(position) = lines.iter().position(|line| trim(line) == sentinel) else {
            return Ok(None);
        };

        let end = position + R::LABELS.len();
        if end > lines.len() {
            return Err(StoreError::malformed(
                &self.store_path,
                Some(position + 1),
                format!(
                    "{} block for {} ends after {} of {} field lines",
                    R::KIND,
                    id,
                    lines.len() - position,
                    R::LABELS.len()
                ),
            ));
        }

        let start = match position.checked_sub(1) {
            Some(above) if R::KIND.parse_header(&lines[above]).is_some() => above,
            _ => position,
        };

        Ok(Some(BlockSpan {
            start,
            sentinel: position,
            end,
        }))
    }

    fn decode_at(&self, lines: &[String], span: BlockSpan) -> Result<R, StoreError> {
        record_codec::decode_fields::<R>(&lines[span.sentinel..span.end])
            .map_err(|e| self.malformed(span.sentinel, e))
    }

    fn malformed(&self, base: usize, error: DecodeError) -> StoreError {
        StoreError::malformed(
            &self.store_path,
            Some(base + error.offset + 1),
            error.message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, EntityKind, NewCustomer, NewProduct, Product, Reward};
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, StoreConfig, IdAllocator) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig::default().with_data_dir(dir.path());
        (dir, config, IdAllocator::with_seed(42))
    }

    fn new_customer(username: &str) -> NewCustomer {
        NewCustomer {
            username: username.to_string(),
            first_name: "jane".to_string(),
            last_name: "doe".to_string(),
            age: 30,
            credit_card: "1234-5678-9012".to_string(),
        }
    }

    fn new_product(name: &str, inventory: u32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Decimal::new(250, 2),
            inventory,
        }
    }

    #[test]
    fn test_append_assigns_ordinals_and_bumps_count() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);

        let first = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let second = repo.append(&mut ids, new_customer("U_bbbbb222")).unwrap();

        assert_eq!(first.ordinal, 1);
        assert_eq!(second.ordinal, 2);
        assert_eq!(fs::read_to_string(repo.count_path()).unwrap(), "3");
        assert_ne!(first.record.id, second.record.id);
        assert_eq!(first.record.first_name, "Jane");
    }

    #[test]
    fn test_append_writes_exact_block() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);

        let stored = repo.append(&mut ids, new_product("Widget", 4)).unwrap();

        let expected = format!(
            "Product 1\n\tID: {}\n\tName: Widget\n\tPrice: $2.50\n\tInventory Count: 4\n",
            stored.record.id
        );
        assert_eq!(fs::read_to_string(repo.store_path()).unwrap(), expected);
    }

    #[test]
    fn test_append_continues_from_existing_count() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        fs::write(repo.count_path(), "7").unwrap();

        let stored = repo.append(&mut ids, new_product("Widget", 1)).unwrap();

        assert_eq!(stored.ordinal, 7);
        assert_eq!(repo.next_ordinal(), 8);
    }

    #[test]
    fn test_find_by_id() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let target = repo.append(&mut ids, new_customer("U_bbbbb222")).unwrap();
        repo.append(&mut ids, new_customer("U_ccccc333")).unwrap();

        let found = repo.find_by_id(&target.record.id).unwrap();

        assert_eq!(found, target.record);
    }

    #[test]
    fn test_find_by_id_requires_exact_sentinel() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        let stored = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();

        // A prefix of a real id must not match
        let prefix = &stored.record.id[..stored.record.id.len() - 1];
        assert!(repo.find_by_id(prefix).unwrap_err().is_not_found());
    }

    #[test]
    fn test_contains() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        let stored = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();

        assert!(repo.contains(&stored.record.id).unwrap());
        assert!(!repo.contains("CustID0000000000").unwrap());
        assert!(!repo.contains(&stored.record.id[6..]).unwrap());
    }

    #[test]
    fn test_find_by_id_missing_store() {
        let (_dir, config, _ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);

        assert!(matches!(
            repo.find_by_id("CustID1234567890"),
            Err(StoreError::FileUnavailable { .. })
        ));
    }

    #[test]
    fn test_delete_removes_only_target_block() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let a = repo.append(&mut ids, new_product("Apple", 1)).unwrap();
        let b = repo.append(&mut ids, new_product("Banana", 2)).unwrap();
        let c = repo.append(&mut ids, new_product("Cherry", 3)).unwrap();

        let removed = repo.delete(&b.record.id).unwrap();

        assert_eq!(removed, b.record);
        let listed = repo.list().unwrap();
        assert_eq!(listed, vec![a, c]);
        assert_eq!(fs::read_to_string(repo.count_path()).unwrap(), "3");
    }

    #[test]
    fn test_delete_not_found_leaves_files_identical() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        repo.append(&mut ids, new_product("Apple", 1)).unwrap();
        let store_before = fs::read(repo.store_path()).unwrap();
        let count_before = fs::read(repo.count_path()).unwrap();

        let result = repo.delete("Prod00000");

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(fs::read(repo.store_path()).unwrap(), store_before);
        assert_eq!(fs::read(repo.count_path()).unwrap(), count_before);
    }

    #[test]
    fn test_delete_then_append_keeps_neighbours() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        let a = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let b = repo.append(&mut ids, new_customer("U_bbbbb222")).unwrap();

        repo.delete(&a.record.id).unwrap();
        assert_eq!(repo.next_ordinal(), 2);
        let c = repo.append(&mut ids, new_customer("U_ccccc333")).unwrap();

        assert_eq!(c.ordinal, 2);
        assert_eq!(repo.next_ordinal(), 3);
        let listed: Vec<Customer> = repo.list().unwrap().into_iter().map(|s| s.record).collect();
        assert_eq!(listed, vec![b.record, c.record]);
    }

    #[test]
    fn test_delete_ignores_blank_lines_and_foreign_headers() {
        let (_dir, config, _ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let content = "Product 1\n\tID: Prod11111\n\tName: Apple\n\tPrice: $1.00\n\tInventory Count: 1\n\
                       \n\
                       Product 2\n\tID: Prod22222\n\tName: Customer_Favourite\n\tPrice: $2.00\n\tInventory Count: 2\n\
                       Product 3\n\tID: Prod33333\n\tName: Cherry\n\tPrice: $3.00\n\tInventory Count: 3\n";
        fs::write(repo.store_path(), content).unwrap();
        fs::write(repo.count_path(), "4").unwrap();

        repo.delete("Prod22222").unwrap();

        assert_eq!(
            fs::read_to_string(repo.store_path()).unwrap(),
            "Product 1\n\tID: Prod11111\n\tName: Apple\n\tPrice: $1.00\n\tInventory Count: 1\n\
             \n\
             Product 3\n\tID: Prod33333\n\tName: Cherry\n\tPrice: $3.00\n\tInventory Count: 3\n"
        );
    }

    #[test]
    fn test_delete_with_missing_count_file() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let a = repo.append(&mut ids, new_product("Apple", 1)).unwrap();
        fs::remove_file(repo.count_path()).unwrap();

        assert!(repo.delete(&a.record.id).is_ok());
        assert!(!repo.count_path().exists());
    }

    #[test]
    fn test_delete_truncated_block_is_malformed() {
        let (_dir, config, _ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        fs::write(repo.store_path(), "Product 1\n\tID: Prod11111\n\tName: Apple\n").unwrap();

        let result = repo.delete("Prod11111");

        assert!(matches!(result, Err(StoreError::MalformedRecord { line: Some(2), .. })));
        assert_eq!(
            fs::read_to_string(repo.store_path()).unwrap(),
            "Product 1\n\tID: Prod11111\n\tName: Apple\n"
        );
    }

    #[test]
    fn test_update_field_credit_and_debit() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        let stored = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let id = &stored.record.id;

        assert_eq!(
            repo.update_field(id, Customer::REWARD_POINTS_FIELD, Adjustment::Credit(20)).unwrap(),
            20
        );
        assert_eq!(
            repo.update_field(id, Customer::REWARD_POINTS_FIELD, Adjustment::Debit(15)).unwrap(),
            5
        );
        assert_eq!(repo.find_by_id(id).unwrap().reward_points, 5);
    }

    #[test]
    fn test_update_field_rewrites_single_line() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let a = repo.append(&mut ids, new_product("Apple", 10)).unwrap();
        let b = repo.append(&mut ids, new_product("Banana", 10)).unwrap();
        let before = fs::read_to_string(repo.store_path()).unwrap();

        repo.update_field(&b.record.id, Product::INVENTORY_FIELD, Adjustment::Debit(3))
            .unwrap();

        let after = fs::read_to_string(repo.store_path()).unwrap();
        let changed: Vec<(&str, &str)> = before
            .lines()
            .zip(after.lines())
            .filter(|(x, y)| x != y)
            .collect();
        assert_eq!(changed, vec![("\tInventory Count: 10", "\tInventory Count: 7")]);
        assert_eq!(repo.find_by_id(&a.record.id).unwrap().inventory, 10);
    }

    #[test]
    fn test_update_field_not_found_leaves_store_identical() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let before = fs::read(repo.store_path()).unwrap();

        let result = repo.update_field(
            "CustID0000000000",
            Customer::REWARD_POINTS_FIELD,
            Adjustment::Credit(10),
        );

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(fs::read(repo.store_path()).unwrap(), before);
    }

    #[test]
    fn test_update_field_debit_below_zero_is_rejected() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let stored = repo.append(&mut ids, new_product("Apple", 2)).unwrap();
        let before = fs::read(repo.store_path()).unwrap();

        let result = repo.update_field(&stored.record.id, Product::INVENTORY_FIELD, Adjustment::Debit(3));

        assert_eq!(
            result,
            Err(StoreError::insufficient(
                EntityKind::Product,
                &stored.record.id,
                "inventory count",
                2,
                3
            ))
        );
        assert_eq!(fs::read(repo.store_path()).unwrap(), before);
    }

    #[test]
    fn test_update_non_numeric_field_is_malformed() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);
        let stored = repo.append(&mut ids, new_product("Apple", 2)).unwrap();

        let result = repo.update_field(&stored.record.id, 1, Adjustment::Credit(1));

        assert!(matches!(result, Err(StoreError::MalformedRecord { line: Some(3), .. })));
    }

    #[test]
    fn test_list_missing_store_is_empty() {
        let (_dir, config, _ids) = setup();
        let repo: Repository<Product> = Repository::open(&config);

        assert!(repo.list().unwrap().is_empty());
        assert!(repo.ids().unwrap().is_empty());
    }

    #[test]
    fn test_reward_store_with_product_headers() {
        let (_dir, config, _ids) = setup();
        let repo: Repository<Reward> = Repository::open(&config);
        fs::write(
            repo.store_path(),
            "Product 1\n\tID: Prod11111\n\tName: Mug\n\tPoint Value: 15\n\tInventory Count: 2\n\
             Product 2\n\tID: Prod22222\n\tName: Pen\n\tPoint Value: 5\n\tInventory Count: 9\n",
        )
        .unwrap();
        fs::write(repo.count_path(), "3").unwrap();

        let listed = repo.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].ordinal, 2);
        assert_eq!(listed[1].record.name, "Pen");

        repo.delete("Prod11111").unwrap();
        assert_eq!(
            fs::read_to_string(repo.store_path()).unwrap(),
            "Product 2\n\tID: Prod22222\n\tName: Pen\n\tPoint Value: 5\n\tInventory Count: 9\n"
        );
    }

    #[test]
    fn test_ids_reads_sentinels() {
        let (_dir, config, mut ids) = setup();
        let repo: Repository<Customer> = Repository::open(&config);
        let a = repo.append(&mut ids, new_customer("U_aaaaa111")).unwrap();
        let b = repo.append(&mut ids, new_customer("U_bbbbb222")).unwrap();

        assert_eq!(repo.ids().unwrap(), vec![a.record.id, b.record.id]);
    }
}
