//! Core trait shared by every record kind
//!
//! A record kind is described by a fixed, ordered list of field labels. The
//! codec and repository are generic over this trait, so customers, products,
//! rewards, and transactions all go through the same encode, scan, and rewrite
//! logic.

use crate::types::EntityKind;

/// A record that can live in a line store
///
/// Implementations live next to the codec in [`crate::io::record_codec`].
pub trait Record: Sized {
    /// Store this record belongs to
    const KIND: EntityKind;

    /// Field labels in block order
    ///
    /// The first label is always the sentinel (id) label, and the length is
    /// the number of field lines following a block header.
    const LABELS: &'static [&'static str];

    /// Validated contents supplied by the caller before an id exists
    type Draft;

    /// Combine a freshly allocated id with caller-supplied contents
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// Full id of this record
    fn id(&self) -> &str;

    /// Field values as text, one per label and in the same order
    fn field_values(&self) -> Vec<String>;

    /// Rebuild a record from trimmed field values, one per label
    ///
    /// Returns a description of the first value that fails to parse.
    fn from_field_values(values: &[&str]) -> Result<Self, String>;
}
