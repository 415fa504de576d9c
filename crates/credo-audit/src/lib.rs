//! Audit scans for Credo.
//!
//! [`Auditor`] reads the full entry stream of a
//! [`BeliefStore`](credo_store::BeliefStore) and reports privileged-actor
//! actions, shadow decisions, and an aggregate health report. Audits never
//! write.

pub mod auditor;
pub mod error;
pub mod report;

pub use auditor::Auditor;
pub use error::{AuditError, AuditResult};
pub use report::{AuditReport, FounderAction, ShadowDecision};
