//! Foundation types for Credo.
//!
//! Every other Credo crate depends on `credo-types`.
//!
//! # Key Types
//!
//! - [`Digest`]: 32-byte BLAKE3 digest, hex-encoded on the wire
//! - [`BeliefId`]: UUID v7 belief identifier

pub mod digest;
pub mod error;
pub mod id;

pub use digest::Digest;
pub use error::TypeError;
pub use id::BeliefId;
