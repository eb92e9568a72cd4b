//! I/O module
//!
//! Handles the on-disk text format and listing output.
//!
//! # Components
//!
//! - `line_store` - Whole-file line reads and rewrites, count files
//! - `record_codec` - Block encoding and decoding per record kind
//! - `csv_format` - CSV rendering of store listings

pub mod csv_format;
pub mod line_store;
pub mod record_codec;

pub use csv_format::{write_csv, CsvRow};
pub use record_codec::{decode_block, encode, DecodeError, Decoded};
