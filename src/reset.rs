/// LoanGrid Reset Coordinator
///
/// Watches the changeset and restarts pagination whenever an observed value
/// has changed since the last time it looked. Each pending change is
/// consumed exactly once; a look with nothing new is a no-op.

use crate::changeset::{Changeset, QueryChange};
use crate::pagination::Paginator;

#[derive(Debug, Clone, Default)]
pub struct ResetCoordinator {
    last_seen_generation: u64,
    resets: u64,
}

impl ResetCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains pending changes and resets the paginator if there were any.
    ///
    /// Returns the drained changes; an empty vector means no reset happened.
    /// The caller is expected to start the first load of the new window.
    pub fn observe(&mut self, changes: &mut Changeset, paginator: &mut Paginator) -> Vec<QueryChange> {
        if changes.generation() == self.last_seen_generation {
            return Vec::new();
        }

        let drained = changes.drain();
        self.last_seen_generation = changes.generation();
        self.resets += 1;
        paginator.reset();

        for change in &drained {
            log::debug!("{} changed, restarting pagination", change.describe());
        }

        drained
    }

    /// Number of resets performed
    pub fn resets(&self) -> u64 {
        self.resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    #[test]
    fn test_no_change_no_reset() {
        let mut coordinator = ResetCoordinator::new();
        let mut changes = Changeset::new();
        let mut paginator = Paginator::default();

        assert!(coordinator.observe(&mut changes, &mut paginator).is_empty());
        assert_eq!(coordinator.resets(), 0);
        assert_eq!(paginator.generation(), 0);
    }

    #[test]
    fn test_change_resets_once() {
        let mut coordinator = ResetCoordinator::new();
        let mut changes = Changeset::new();
        let mut paginator = Paginator::new(NonZeroUsize::new(1).unwrap());

        let ticket = paginator.begin_load().unwrap();
        paginator.complete_load(ticket, &[0, 1]);
        assert_eq!(paginator.len(), 1);

        changes.push(QueryChange::SearchText {
            old: String::new(),
            new: "bob".to_string(),
        });

        let drained = coordinator.observe(&mut changes, &mut paginator);
        assert_eq!(drained.len(), 1);
        assert!(paginator.is_empty());
        assert!(paginator.has_more());

        // Nothing new on the second look
        assert!(coordinator.observe(&mut changes, &mut paginator).is_empty());
        assert_eq!(coordinator.resets(), 1);
        assert_eq!(paginator.generation(), 1);
    }

    #[test]
    fn test_reset_invalidates_in_flight_ticket() {
        let mut coordinator = ResetCoordinator::new();
        let mut changes = Changeset::new();
        let mut paginator = Paginator::default();

        let ticket = paginator.begin_load().unwrap();
        changes.push(QueryChange::Reset);
        coordinator.observe(&mut changes, &mut paginator);

        assert_eq!(
            paginator.complete_load(ticket, &[0, 1, 2]),
            crate::pagination::LoadOutcome::Stale
        );
        assert!(paginator.is_empty());
    }
}
