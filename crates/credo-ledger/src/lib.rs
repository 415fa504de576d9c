//! Append-only, hash-linked event ledger for Credo.
//!
//! The ledger knows nothing about what its entries mean. It provides:
//! - [`LedgerEntry`] records sealed with a BLAKE3 link hash
//! - the [`EntryPayload`] trait that payload unions implement
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - [`InMemoryLedger`] for tests and embedding
//! - [`FileLedger`], a JSON-lines store that refuses to open a tampered file
//! - field filters, stream validation, and aggregate reports

pub mod entry;
pub mod error;
pub mod file;
pub mod filter;
pub mod memory;
pub mod report;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use entry::{EntryPayload, LedgerEntry};
pub use error::{LedgerError, LedgerResult};
pub use file::{FileLedger, LedgerConfig, SyncMode};
pub use filter::EntryFilter;
pub use memory::InMemoryLedger;
pub use report::LedgerReport;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{StreamValidator, ValidationReport, Violation, ViolationKind};
