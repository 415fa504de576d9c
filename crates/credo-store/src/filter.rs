use credo_domain::{Belief, BeliefStatus};

/// Field filter for [`BeliefStore::list_beliefs`](crate::BeliefStore::list_beliefs).
/// Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeliefFilter {
    pub status: Option<BeliefStatus>,
    pub created_by: Option<String>,
}

impl BeliefFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: BeliefStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_creator(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn matches(&self, belief: &Belief) -> bool {
        self.status.map_or(true, |status| belief.status == status)
            && self
                .created_by
                .as_deref()
                .map_or(true, |creator| belief.created_by == creator)
    }
}
