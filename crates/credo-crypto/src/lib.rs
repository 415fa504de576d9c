//! Cryptographic primitives for Credo.
//!
//! Context-keyed BLAKE3 hashing and verification of hash-linked chains.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use hasher::{EntryHasher, HasherError};
