//! Belief state derived by folding ledger events.
//!
//! Nothing here holds state between calls: every read starts from the
//! ledger and applies events in sequence order.

use std::collections::HashMap;

use credo_domain::{Belief, Evidence, NewBelief};
use credo_ledger::LedgerEntry;
use credo_types::BeliefId;

use crate::error::{ReplayFault, StoreError, StoreResult};
use crate::events::LedgerEvent;

/// Deterministic replay of belief events.
pub struct BeliefProjection;

impl BeliefProjection {
    /// Fold every event about `id` in `entries`. `None` if the belief was
    /// never created.
    pub fn replay(id: BeliefId, entries: &[LedgerEntry<LedgerEvent>]) -> StoreResult<Option<Belief>> {
        let mut state = None;
        for entry in entries.iter().filter(|e| e.payload().belief_id() == id) {
            Self::apply(&mut state, entry)?;
        }
        Ok(state)
    }

    /// Fold every belief in one pass, in creation order.
    pub fn replay_all(entries: &[LedgerEntry<LedgerEvent>]) -> StoreResult<Vec<Belief>> {
        let mut slots: Vec<Option<Belief>> = Vec::new();
        let mut index: HashMap<BeliefId, usize> = HashMap::new();

        for entry in entries {
            let id = entry.payload().belief_id();
            let slot = match index.get(&id) {
                Some(&i) => i,
                None => {
                    index.insert(id, slots.len());
                    slots.push(None);
                    slots.len() - 1
                }
            };
            Self::apply(&mut slots[slot], entry)?;
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Apply one entry to the state of the belief it concerns.
    pub fn apply(state: &mut Option<Belief>, entry: &LedgerEntry<LedgerEvent>) -> StoreResult<()> {
        Self::apply_event(state, entry).map_err(|source| StoreError::Replay {
            seq: entry.sequence(),
            source,
        })
    }

    fn apply_event(
        state: &mut Option<Belief>,
        entry: &LedgerEntry<LedgerEvent>,
    ) -> Result<(), ReplayFault> {
        let at = entry.timestamp();
        match entry.payload() {
            LedgerEvent::BeliefCreated {
                belief_id,
                statement,
                falsification,
                tier,
                confidence,
                created_by,
            } => {
                if state.is_some() {
                    return Err(ReplayFault::DuplicateCreation);
                }
                let draft = NewBelief {
                    statement: statement.clone(),
                    falsification: falsification.clone(),
                    tier: *tier,
                    confidence: confidence.value(),
                    created_by: created_by.clone(),
                };
                *state = Some(Belief::created(*belief_id, draft, at)?);
            }
            LedgerEvent::EvidenceAdded {
                description,
                source,
                supports,
                ..
            } => {
                let evidence = Evidence::new(description.as_str(), source.as_str(), *supports, at)?;
                existing(state)?.add_evidence(evidence);
            }
            LedgerEvent::DecisionMade { decision_at, .. } => {
                existing(state)?.mark_decision(*decision_at)?;
            }
            LedgerEvent::BeliefFalsified { reason, actor, .. } => {
                existing(state)?.falsify(reason, actor, at)?;
            }
            LedgerEvent::BeliefDeprecated { reason, actor, .. } => {
                existing(state)?.deprecate(reason, actor, at)?;
            }
            LedgerEvent::BeliefSuperseded {
                replacement_id,
                actor,
                ..
            } => {
                existing(state)?.supersede(*replacement_id, actor, at)?;
            }
        }
        Ok(())
    }
}

fn existing(state: &mut Option<Belief>) -> Result<&mut Belief, ReplayFault> {
    state.as_mut().ok_or(ReplayFault::BeforeCreation)
}

#[cfg(test)]
mod tests {
    use credo_domain::{BeliefStatus, Confidence, DomainError, Tier};
    use credo_ledger::{InMemoryLedger, LedgerReader, LedgerWriter};

    use super::*;

    fn created(id: BeliefId, by: &str) -> LedgerEvent {
        LedgerEvent::BeliefCreated {
            belief_id: id,
            statement: "Annual plans reduce churn".into(),
            falsification: "annual-plan churn above 8% in 2 quarters".into(),
            tier: Tier::Hypothesis,
            confidence: Confidence::new(0.6).unwrap(),
            created_by: by.into(),
        }
    }

    fn evidence(id: BeliefId, supports: bool) -> LedgerEvent {
        LedgerEvent::EvidenceAdded {
            belief_id: id,
            description: "cohort comparison".into(),
            source: "billing export".into(),
            supports,
        }
    }

    fn falsified(id: BeliefId) -> LedgerEvent {
        LedgerEvent::BeliefFalsified {
            belief_id: id,
            reason: "churn 9.5% in Q2 and Q3".into(),
            actor: "bob".into(),
        }
    }

    fn ledger_of(events: Vec<LedgerEvent>) -> InMemoryLedger<LedgerEvent> {
        let ledger = InMemoryLedger::new();
        for event in events {
            ledger.append(event).unwrap();
        }
        ledger
    }

    #[test]
    fn unknown_belief_replays_to_none() {
        let ledger = ledger_of(vec![created(BeliefId::new(), "alice")]);
        let entries = ledger.entries().unwrap();
        assert_eq!(BeliefProjection::replay(BeliefId::new(), &entries).unwrap(), None);
    }

    #[test]
    fn replay_uses_only_the_beliefs_own_events() {
        let a = BeliefId::new();
        let b = BeliefId::new();
        let ledger = ledger_of(vec![
            created(a, "alice"),
            created(b, "bob"),
            evidence(a, true),
            falsified(b),
            evidence(a, false),
        ]);
        let entries = ledger.entries().unwrap();

        let belief_a = BeliefProjection::replay(a, &entries).unwrap().unwrap();
        assert_eq!(belief_a.evidence.len(), 2);
        assert_eq!(belief_a.status, BeliefStatus::Active);
        assert_eq!(belief_a.created_at, entries[0].timestamp());
        assert_eq!(belief_a.evidence[1].added_at, entries[4].timestamp());

        let belief_b = BeliefProjection::replay(b, &entries).unwrap().unwrap();
        assert_eq!(belief_b.status, BeliefStatus::Falsified);
        assert_eq!(belief_b.closed_at, Some(entries[3].timestamp()));
    }

    #[test]
    fn replay_all_matches_individual_replays() {
        let a = BeliefId::new();
        let b = BeliefId::new();
        let ledger = ledger_of(vec![
            created(a, "alice"),
            evidence(a, true),
            created(b, "bob"),
            falsified(a),
        ]);
        let entries = ledger.entries().unwrap();

        let all = BeliefProjection::replay_all(&entries).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a);
        assert_eq!(all[1].id, b);
        for belief in &all {
            assert_eq!(
                Some(belief),
                BeliefProjection::replay(belief.id, &entries).unwrap().as_ref()
            );
        }
    }

    #[test]
    fn transition_after_terminal_fails_at_its_seq() {
        let id = BeliefId::new();
        let ledger = ledger_of(vec![
            created(id, "alice"),
            falsified(id),
            LedgerEvent::BeliefDeprecated {
                belief_id: id,
                reason: "stale".into(),
                actor: "bob".into(),
            },
        ]);
        let entries = ledger.entries().unwrap();

        match BeliefProjection::replay(id, &entries) {
            Err(StoreError::Replay { seq, source }) => {
                assert_eq!(seq, 2);
                assert_eq!(
                    source,
                    ReplayFault::Domain(DomainError::IllegalTransition {
                        from: BeliefStatus::Falsified,
                        to: BeliefStatus::Deprecated,
                    })
                );
            }
            other => panic!("expected replay error, got {other:?}"),
        }
    }

    #[test]
    fn event_before_creation_fails() {
        let id = BeliefId::new();
        let ledger = ledger_of(vec![evidence(id, true), created(id, "alice")]);
        let entries = ledger.entries().unwrap();
        assert!(matches!(
            BeliefProjection::replay(id, &entries),
            Err(StoreError::Replay {
                seq: 0,
                source: ReplayFault::BeforeCreation
            })
        ));
    }

    #[test]
    fn duplicate_creation_fails() {
        let id = BeliefId::new();
        let ledger = ledger_of(vec![created(id, "alice"), created(id, "alice")]);
        let entries = ledger.entries().unwrap();
        assert!(matches!(
            BeliefProjection::replay_all(&entries),
            Err(StoreError::Replay {
                seq: 1,
                source: ReplayFault::DuplicateCreation
            })
        ));
    }

    #[test]
    fn replay_is_idempotent() {
        let id = BeliefId::new();
        let ledger = ledger_of(vec![created(id, "alice"), evidence(id, true)]);
        let entries = ledger.entries().unwrap();
        assert_eq!(
            BeliefProjection::replay(id, &entries).unwrap(),
            BeliefProjection::replay(id, &entries).unwrap()
        );
    }
}
