//! Id allocation per entity kind
//!
//! Each kind owns a namespace of `prefix + fixed-width digits` ids. The
//! allocator remembers every id it has issued or been seeded with, and draws
//! random candidates until one is unused.
//!
//! The allocator is plain owned state: [`crate::core::Ledger`] builds one at
//! startup, seeds it from the sentinel lines already on disk, and lends it to
//! [`crate::core::Repository::append`]. Ids persisted by earlier runs are
//! therefore never reissued.

use crate::types::{EntityKind, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Issues unique ids per entity kind
pub struct IdAllocator {
    /// Ids known to be taken, per namespace
    taken: HashMap<EntityKind, HashSet<String>>,
    rng: StdRng,
}

impl IdAllocator {
    /// Create an empty allocator backed by an entropy-seeded generator
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create an empty allocator with a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        IdAllocator {
            taken: HashMap::new(),
            rng,
        }
    }

    /// Mark existing ids as taken
    ///
    /// Ids that `allocate` could never issue for `kind` (wrong prefix, wrong
    /// width, leading zero) are skipped, so they cannot count toward the
    /// namespace's capacity.
    pub fn seed<I>(&mut self, kind: EntityKind, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let taken = self.taken.entry(kind).or_default();
        for id in ids {
            if Self::in_namespace(kind, &id) {
                taken.insert(id);
            } else {
                warn!(%kind, id = %id, "ignoring id outside the namespace");
            }
        }
    }

    /// Whether `id` is one `allocate` could issue for `kind`
    pub fn in_namespace(kind: EntityKind, id: &str) -> bool {
        id.strip_prefix(kind.id_prefix()).is_some_and(|digits| {
            digits.len() == kind.id_digits() as usize
                && !digits.starts_with('0')
                && digits.bytes().all(|b| b.is_ascii_digit())
        })
    }

    /// Whether `id` is already taken in `kind`'s namespace
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.taken.get(&kind).is_some_and(|ids| ids.contains(id))
    }

    /// Number of ids taken in `kind`'s namespace
    pub fn taken(&self, kind: EntityKind) -> usize {
        self.taken.get(&kind).map_or(0, HashSet::len)
    }

    /// Number of distinct ids `kind`'s digit width allows
    pub fn capacity(kind: EntityKind) -> u64 {
        9 * 10u64.pow(kind.id_digits() - 1)
    }

    /// Issue a fresh id for `kind`
    ///
    /// Draws `prefix + digits` candidates (no leading zero) until one is not
    /// yet taken, records it, and returns it.
    ///
    /// # Errors
    ///
    /// Returns `IdSpaceExhausted` when every id of the kind's width is taken.
    pub fn allocate(&mut self, kind: EntityKind) -> Result<String, StoreError> {
        let low = 10u64.pow(kind.id_digits() - 1);
        let high = low * 10;
        let taken = self.taken.entry(kind).or_default();

        if taken.len() as u64 >= Self::capacity(kind) {
            return Err(StoreError::IdSpaceExhausted { kind });
        }

        loop {
            let candidate = format!("{}{}", kind.id_prefix(), self.rng.gen_range(low..high));
            if taken.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
