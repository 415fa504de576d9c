use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use credo_domain::BeliefStatus;
use credo_ledger::{EntryPayload, LedgerEntry, LedgerReader, LedgerWriter};
use credo_store::{BeliefFilter, BeliefStore, LedgerEvent};
use credo_types::BeliefId;

use crate::error::{AuditError, AuditResult};
use crate::report::{AuditReport, FounderAction, ShadowDecision};

/// Read-only scans over a store's ledger.
///
/// Findings come straight from the entry stream. Nothing can be excluded
/// or acknowledged away.
pub struct Auditor<'a, L> {
    store: &'a BeliefStore<L>,
}

impl<'a, L> Auditor<'a, L>
where
    L: LedgerReader<LedgerEvent> + LedgerWriter<LedgerEvent>,
{
    pub fn new(store: &'a BeliefStore<L>) -> Self {
        Self { store }
    }

    /// Every entry whose actor matches the store's privileged pattern, in
    /// sequence order.
    pub fn audit_founder_actions(&self) -> AuditResult<Vec<FounderAction>> {
        let pattern = self.store.privileged_actors();
        let actions: Vec<FounderAction> = self
            .store
            .entries()?
            .iter()
            .filter_map(|entry| {
                let actor = entry.payload().actor()?;
                pattern.is_match(actor).then(|| founder_action(entry, actor))
            })
            .collect();

        info!(
            pattern = pattern.as_str(),
            count = actions.len(),
            "founder actions audited"
        );
        Ok(actions)
    }

    /// Decisions recorded as retroactive, in sequence order.
    pub fn detect_shadow_decisions(&self) -> AuditResult<Vec<ShadowDecision>> {
        let mut created: HashMap<BeliefId, DateTime<Utc>> = HashMap::new();
        let mut findings = Vec::new();

        for entry in self.store.entries()? {
            match entry.payload() {
                LedgerEvent::BeliefCreated { belief_id, .. } => {
                    created.insert(*belief_id, entry.timestamp());
                }
                LedgerEvent::DecisionMade {
                    belief_id,
                    decision_at,
                    is_retroactive: true,
                    threshold_secs,
                } => {
                    let created_at = created.get(belief_id).copied().ok_or(
                        AuditError::OrphanDecision {
                            seq: entry.sequence(),
                            belief_id: *belief_id,
                        },
                    )?;
                    findings.push(ShadowDecision {
                        seq: entry.sequence(),
                        belief_id: *belief_id,
                        created_at,
                        decision_at: *decision_at,
                        threshold_secs: *threshold_secs,
                    });
                }
                _ => {}
            }
        }

        if !findings.is_empty() {
            warn!(count = findings.len(), "shadow decisions detected");
        }
        Ok(findings)
    }

    pub fn full_audit_report(&self) -> AuditResult<AuditReport> {
        let validation = self.store.validate_ledger()?;
        let ledger = self.store.ledger_report()?;
        let beliefs = self.store.list_beliefs(&BeliefFilter::all())?;

        let mut beliefs_by_status: BTreeMap<BeliefStatus, usize> =
            BeliefStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for belief in &beliefs {
            *beliefs_by_status.entry(belief.status).or_default() += 1;
        }

        let report = AuditReport {
            generated_at: Utc::now(),
            integrity_valid: validation.is_valid(),
            violation_count: validation.violations.len(),
            ledger,
            total_beliefs: beliefs.len(),
            beliefs_by_status,
            founder_actions: self.audit_founder_actions()?.len(),
            shadow_decisions: self.detect_shadow_decisions()?.len(),
        };

        if !report.integrity_valid {
            warn!(violations = report.violation_count, "ledger integrity check failed");
        }
        info!(
            entries = report.ledger.total_entries,
            beliefs = report.total_beliefs,
            founder_actions = report.founder_actions,
            shadow_decisions = report.shadow_decisions,
            "audit report generated"
        );
        Ok(report)
    }
}

fn founder_action(entry: &LedgerEntry<LedgerEvent>, actor: &str) -> FounderAction {
    FounderAction {
        seq: entry.sequence(),
        timestamp: entry.timestamp(),
        entry_type: entry.entry_type().to_string(),
        belief_id: entry.payload().belief_id(),
        actor: actor.to_string(),
        hash: entry.hash(),
    }
}
