//! Domain model for Credo beliefs.
//!
//! A belief is a claim that can be shown false. This crate holds the rules
//! that make it so and knows nothing about persistence:
//! - [`NewBelief::validate`] rejects empty statements, out-of-range
//!   confidence, and vague falsification criteria
//! - [`Belief`] lifecycle: `active` to one of three terminal states
//! - [`Evidence`] requires a description and a cited source
//! - [`is_retroactive`] flags decisions made too close to creation

pub mod belief;
pub mod confidence;
pub mod error;
pub mod evidence;
pub mod falsification;
pub mod status;
pub mod tier;

pub use belief::{check_threshold, is_retroactive, Belief, NewBelief};
pub use confidence::Confidence;
pub use error::{DomainError, DomainResult};
pub use evidence::Evidence;
pub use falsification::{check_falsification, FalsificationPolicy, DEFAULT_VAGUE_PATTERNS};
pub use status::BeliefStatus;
pub use tier::Tier;
