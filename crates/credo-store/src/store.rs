use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use credo_domain::{
    check_threshold, is_retroactive, Belief, BeliefStatus, Evidence, NewBelief,
};
use credo_ledger::{
    FileLedger, InMemoryLedger, LedgerConfig, LedgerEntry, LedgerError, LedgerReader,
    LedgerReport, LedgerWriter, ValidationReport,
};
use credo_types::BeliefId;

use crate::config::{ActorPattern, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::events::LedgerEvent;
use crate::filter::BeliefFilter;
use crate::projection::BeliefProjection;

/// The only writer of belief events.
///
/// Every write replays the target belief, checks the command against it,
/// and appends, all under one write guard. Reads replay from the ledger
/// each time; nothing is cached.
pub struct BeliefStore<L> {
    ledger: L,
    config: StoreConfig,
    privileged: ActorPattern,
    write_lock: Mutex<()>,
}

impl<L> BeliefStore<L>
where
    L: LedgerReader<LedgerEvent> + LedgerWriter<LedgerEvent>,
{
    pub fn new(ledger: L, config: StoreConfig) -> StoreResult<Self> {
        let privileged = ActorPattern::new(&config.privileged_actor_pattern)?;
        Ok(Self {
            ledger,
            config,
            privileged,
            write_lock: Mutex::new(()),
        })
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn privileged_actors(&self) -> &ActorPattern {
        &self.privileged
    }

    // --- Writes ---

    pub fn create_belief(&self, draft: NewBelief) -> StoreResult<BeliefId> {
        let confidence = draft.validate()?;
        let _guard = self.lock_writes()?;

        let belief_id = BeliefId::new();
        let entry = self.ledger.append(LedgerEvent::BeliefCreated {
            belief_id,
            statement: draft.statement,
            falsification: draft.falsification,
            tier: draft.tier,
            confidence,
            created_by: draft.created_by,
        })?;

        debug!(belief = %belief_id, seq = entry.sequence(), "belief created");
        Ok(belief_id)
    }

    /// Attach evidence. Allowed in any status.
    pub fn add_evidence(
        &self,
        belief_id: BeliefId,
        description: &str,
        source: &str,
        supports: bool,
    ) -> StoreResult<LedgerEntry<LedgerEvent>> {
        Evidence::check_fields(description, source)?;
        let _guard = self.lock_writes()?;
        self.require(belief_id)?;

        let entry = self.ledger.append(LedgerEvent::EvidenceAdded {
            belief_id,
            description: description.to_string(),
            source: source.to_string(),
            supports,
        })?;

        debug!(belief = %belief_id, seq = entry.sequence(), supports, "evidence added");
        Ok(entry)
    }

    /// Record a decision, flagging it retroactive when it came less than
    /// `threshold` after the belief was created.
    pub fn mark_decision(
        &self,
        belief_id: BeliefId,
        decision_at: DateTime<Utc>,
        threshold: Duration,
    ) -> StoreResult<LedgerEntry<LedgerEvent>> {
        check_threshold(threshold)?;
        let _guard = self.lock_writes()?;
        let belief = self.require(belief_id)?;
        belief.check_decision(decision_at)?;

        let retroactive = is_retroactive(belief.created_at, decision_at, threshold);
        let entry = self.ledger.append(LedgerEvent::DecisionMade {
            belief_id,
            decision_at,
            is_retroactive: retroactive,
            threshold_secs: threshold.num_seconds(),
        })?;

        debug!(
            belief = %belief_id,
            seq = entry.sequence(),
            retroactive,
            "decision recorded"
        );
        Ok(entry)
    }

    pub fn falsify_belief(
        &self,
        belief_id: BeliefId,
        reason: &str,
        actor: &str,
    ) -> StoreResult<LedgerEntry<LedgerEvent>> {
        let _guard = self.lock_writes()?;
        self.require(belief_id)?.falsify(reason, actor, Utc::now())?;
        self.append_transition(LedgerEvent::BeliefFalsified {
            belief_id,
            reason: reason.to_string(),
            actor: actor.to_string(),
        })
    }

    pub fn deprecate_belief(
        &self,
        belief_id: BeliefId,
        reason: &str,
        actor: &str,
    ) -> StoreResult<LedgerEntry<LedgerEvent>> {
        let _guard = self.lock_writes()?;
        self.require(belief_id)?.deprecate(reason, actor, Utc::now())?;
        self.append_transition(LedgerEvent::BeliefDeprecated {
            belief_id,
            reason: reason.to_string(),
            actor: actor.to_string(),
        })
    }

    /// Close `belief_id` in favour of `replacement_id`, which must already
    /// exist.
    pub fn supersede_belief(
        &self,
        belief_id: BeliefId,
        replacement_id: BeliefId,
        actor: &str,
    ) -> StoreResult<LedgerEntry<LedgerEvent>> {
        let _guard = self.lock_writes()?;
        let mut belief = self.require(belief_id)?;
        belief.supersede(replacement_id, actor, Utc::now())?;
        self.require(replacement_id)?;
        self.append_transition(LedgerEvent::BeliefSuperseded {
            belief_id,
            replacement_id,
            actor: actor.to_string(),
        })
    }

    // --- Reads ---

    pub fn get_belief(&self, belief_id: BeliefId) -> StoreResult<Option<Belief>> {
        self.ledger
            .read_with(|entries| BeliefProjection::replay(belief_id, entries))?
    }

    /// Beliefs in creation order.
    pub fn list_beliefs(&self, filter: &BeliefFilter) -> StoreResult<Vec<Belief>> {
        let beliefs = self.ledger.read_with(BeliefProjection::replay_all)??;
        Ok(beliefs.into_iter().filter(|b| filter.matches(b)).collect())
    }

    pub fn count_by_status(&self, status: BeliefStatus) -> StoreResult<usize> {
        Ok(self
            .list_beliefs(&BeliefFilter::all().with_status(status))?
            .len())
    }

    pub fn verify_integrity(&self) -> StoreResult<bool> {
        Ok(self.ledger.verify_integrity()?)
    }

    pub fn validate_ledger(&self) -> StoreResult<ValidationReport> {
        Ok(self.ledger.validate()?)
    }

    pub fn ledger_report(&self) -> StoreResult<LedgerReport> {
        Ok(self.ledger.audit_report()?)
    }

    pub fn entries(&self) -> StoreResult<Vec<LedgerEntry<LedgerEvent>>> {
        Ok(self.ledger.entries()?)
    }

    pub fn len(&self) -> StoreResult<u64> {
        Ok(self.ledger.len()?)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.ledger.is_empty()?)
    }

    fn lock_writes(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Ledger(LedgerError::LockPoisoned))
    }

    fn require(&self, belief_id: BeliefId) -> StoreResult<Belief> {
        self.get_belief(belief_id)?
            .ok_or(StoreError::BeliefNotFound(belief_id))
    }

    fn append_transition(&self, event: LedgerEvent) -> StoreResult<LedgerEntry<LedgerEvent>> {
        let belief_id = event.belief_id();
        let entry = self.ledger.append(event)?;
        debug!(
            belief = %belief_id,
            seq = entry.sequence(),
            entry_type = entry.entry_type(),
            "belief closed"
        );
        Ok(entry)
    }
}

impl BeliefStore<InMemoryLedger<LedgerEvent>> {
    /// A store over a fresh in-memory ledger with default configuration.
    pub fn in_memory() -> Self {
        Self {
            ledger: InMemoryLedger::new(),
            config: StoreConfig::default(),
            privileged: ActorPattern::default(),
            write_lock: Mutex::new(()),
        }
    }
}

impl BeliefStore<FileLedger<LedgerEvent>> {
    /// Open the ledger file at `path`, verifying its full chain first.
    pub fn open(
        path: impl AsRef<Path>,
        ledger_config: LedgerConfig,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let ledger = FileLedger::open(path, ledger_config)?;
        Self::new(ledger, config)
    }
}
