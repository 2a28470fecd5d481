/// Changeset - Observed State Changes for LoanGrid
///
/// Every mutation of an observed value (search text, status, amount bounds,
/// date bounds, sort, page size) is recorded here as a `QueryChange`. The
/// reset coordinator drains the changeset and restarts pagination once per
/// recorded change.
///
/// Two counters are kept:
///
/// - `generation` advances on every recorded change
/// - `view_generation` advances only on changes that alter the derived view,
///   so the query view can skip rebuilding after a page-size change

use crate::filter::StatusFilter;
use crate::sort::SortState;
use std::num::NonZeroUsize;

/// A single change to an observed value, with its old and new values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    SearchText { old: String, new: String },
    Status { old: StatusFilter, new: StatusFilter },
    MinAmount { old: Option<u64>, new: Option<u64> },
    MaxAmount { old: Option<u64>, new: Option<u64> },
    StartDate { old: Option<String>, new: Option<String> },
    EndDate { old: Option<String>, new: Option<String> },
    Sort { old: SortState, new: SortState },
    PageSize { old: NonZeroUsize, new: NonZeroUsize },
    /// An explicit reset request with no value change
    Reset,
}

impl QueryChange {
    /// Returns true if this change alters which records the view holds or
    /// their order
    pub fn affects_view(&self) -> bool {
        !matches!(self, QueryChange::PageSize { .. } | QueryChange::Reset)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            QueryChange::SearchText { .. } => "search text",
            QueryChange::Status { .. } => "status",
            QueryChange::MinAmount { .. } => "minimum amount",
            QueryChange::MaxAmount { .. } => "maximum amount",
            QueryChange::StartDate { .. } => "start date",
            QueryChange::EndDate { .. } => "end date",
            QueryChange::Sort { .. } => "sort",
            QueryChange::PageSize { .. } => "page size",
            QueryChange::Reset => "explicit reset",
        }
    }
}

/// Pending changes not yet handled by the reset coordinator
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    changes: Vec<QueryChange>,
    generation: u64,
    view_generation: u64,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change and advance the generation counters
    pub fn push(&mut self, change: QueryChange) {
        self.generation += 1;
        if change.affects_view() {
            self.view_generation += 1;
        }
        self.changes.push(change);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view_generation(&self) -> u64 {
        self.view_generation
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Drain changes, returning ownership and clearing the buffer.
    /// Generations are left untouched.
    pub fn drain(&mut self) -> Vec<QueryChange> {
        std::mem::take(&mut self.changes)
    }
}
