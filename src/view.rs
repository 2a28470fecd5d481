/// LoanGrid Query View
///
/// The query view is the derived, ordered sequence of records that satisfy
/// the current filter criteria, ordered by the current sort key if one is
/// set and by store order otherwise.
///
/// Like the other views in this crate it keeps a mapping from view positions
/// to store indices rather than copies of the records. The mapping is rebuilt
/// from scratch whenever the criteria or sort change; `sync` skips the
/// rebuild when the caller's generation matches the one last built for.

use crate::filter::FilterCriteria;
use crate::record::Loan;
use crate::sort::SortState;
use crate::store::RecordStore;
use std::rc::Rc;

/// Filters then sorts the store, returning store indices in view order.
///
/// The sort is stable: records with equal keys keep their store order in
/// both directions.
///
/// ```
/// use loangrid::{derive_view, FilterCriteria, Loan, LoanField, LoanStatus, RecordStore, SortKey, SortState};
///
/// let store = RecordStore::new("loans", vec![
///     Loan::new(1, "Alice", 1000, LoanStatus::Pending, "2023-01-01"),
///     Loan::new(2, "Bob", 2000, LoanStatus::Approved, "2023-02-01"),
///     Loan::new(3, "Charlie", 1500, LoanStatus::Rejected, "2023-03-01"),
/// ]).unwrap();
///
/// let sort = SortState::by(SortKey::descending(LoanField::Amount));
/// let order = derive_view(&store, &FilterCriteria::new(), &sort);
/// assert_eq!(order, vec![1, 2, 0]);
/// ```
pub fn derive_view(store: &RecordStore, criteria: &FilterCriteria, sort: &SortState) -> Vec<usize> {
    let predicate = criteria.prepare();
    let records = store.records();

    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, loan)| predicate.matches(loan))
        .map(|(i, _)| i)
        .collect();

    if let Some(key) = sort.key() {
        indices.sort_by(|&a, &b| key.compare(&records[a], &records[b]));
    }

    indices
}

#[derive(Debug)]
pub struct QueryView {
    store: Rc<RecordStore>,
    /// view_to_store[view_pos] = store index
    view_to_store: Vec<usize>,
    /// Generation the mapping was last built for
    last_synced_generation: Option<u64>,
}

impl QueryView {
    /// Creates an unsynced view. It is empty until the first `sync`.
    pub fn new(store: Rc<RecordStore>) -> Self {
        QueryView {
            store,
            view_to_store: Vec::new(),
            last_synced_generation: None,
        }
    }

    /// Rebuilds the mapping unless it was already built for `generation`.
    /// Returns true if a rebuild happened.
    pub fn sync(&mut self, generation: u64, criteria: &FilterCriteria, sort: &SortState) -> bool {
        if self.last_synced_generation == Some(generation) {
            return false;
        }
        self.view_to_store = derive_view(&self.store, criteria, sort);
        self.last_synced_generation = Some(generation);
        log::trace!(
            "query view rebuilt for generation {}: {} of {} records",
            generation,
            self.view_to_store.len(),
            self.store.len()
        );
        true
    }

    pub fn len(&self) -> usize {
        self.view_to_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_store.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.view_to_store
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loan> + '_ {
        self.view_to_store.iter().filter_map(move |&i| self.store.get(i))
    }

    pub fn to_vec(&self) -> Vec<Loan> {
        self.iter().cloned().collect()
    }
}
