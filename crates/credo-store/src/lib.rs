//! Belief store for Credo.
//!
//! [`BeliefStore`] is the only component that writes belief events to the
//! ledger. It validates each command against the belief's replayed state
//! before appending, and rebuilds beliefs on read through
//! [`BeliefProjection`].

pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod projection;
pub mod store;

pub use config::{ActorPattern, StoreConfig, DEFAULT_PRIVILEGED_PATTERN};
pub use error::{ReplayFault, StoreError, StoreResult};
pub use events::LedgerEvent;
pub use filter::BeliefFilter;
pub use projection::BeliefProjection;
pub use store::BeliefStore;
