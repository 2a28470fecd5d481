/// LoanGrid - Filterable, Sortable, Incrementally-Loaded Record Views
///
/// A query and pagination engine over a large in-memory set of loan records.
/// A full dataset plus user-controlled predicates (search text, status,
/// amount range, date range) and a sort key are turned into a deterministic
/// derived view, which is revealed to the consumer in fixed-size batches as
/// it scrolls. Changing any predicate, the sort, or the page size restarts
/// the reveal from an empty window.

pub mod error;
pub mod record;
pub mod store;
pub mod filter;
pub mod sort;
pub mod view;
pub mod changeset;
pub mod pagination;
pub mod reset;
pub mod config;
pub mod grid;

pub use error::GridError;
pub use record::{FieldValue, Loan, LoanField, LoanStatus};
pub use store::RecordStore;
pub use filter::{FilterCriteria, Predicate, StatusFilter};
pub use sort::{compare_values, AriaSort, SortKey, SortOrder, SortState};
pub use view::{derive_view, QueryView};
pub use changeset::{Changeset, QueryChange};
pub use pagination::{LoadOutcome, LoadPhase, LoadTicket, Paginator, DEFAULT_PAGE_SIZE};
pub use reset::ResetCoordinator;
pub use config::GridConfig;
pub use grid::{GridEvent, GridSnapshot, LoanGrid, WeakLoanGrid};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::rc::Rc;

    const DATASET: &str = r#"[
        {"id": 1, "borrowerName": "Name 00001", "amount": 48210, "status": "Pending",  "closeDate": "2025-01-01"},
        {"id": 2, "borrowerName": "Name 00002", "amount": 7310,  "status": "Approved", "closeDate": "2025-01-02"},
        {"id": 3, "borrowerName": "Name 00003", "amount": 91544, "status": "Rejected", "closeDate": "2025-01-03"},
        {"id": 4, "borrowerName": "Name 00004", "amount": 7310,  "status": "Pending",  "closeDate": "2025-01-04"},
        {"id": 5, "borrowerName": "Name 00005", "amount": 65002, "status": "Approved", "closeDate": "2025-01-05"},
        {"id": 6, "borrowerName": "Name 00006", "amount": 1000,  "status": "Rejected", "closeDate": "2025-01-06"},
        {"id": 7, "borrowerName": "Name 00007", "amount": 33333, "status": "Pending",  "closeDate": "2025-01-07"}
    ]"#;

    #[test]
    fn test_complete_workflow_without_runtime() {
        // Drive the components by hand, the way LoanGrid wires them
        let store = Rc::new(RecordStore::from_json("loans", DATASET).unwrap());
        let mut criteria = FilterCriteria::new();
        let mut sort = SortState::default();
        let mut changes = Changeset::new();
        let mut coordinator = ResetCoordinator::new();
        let mut view = QueryView::new(Rc::clone(&store));
        let mut paginator = Paginator::new(NonZeroUsize::new(2).unwrap());

        view.sync(changes.view_generation(), &criteria, &sort);
        let ticket = paginator.begin_load().unwrap();
        paginator.complete_load(ticket, view.indices());
        assert_eq!(paginator.loaded(), &[0, 1]);

        // A load is in flight when the user starts filtering
        let in_flight = paginator.begin_load().unwrap();

        let old = criteria.max_amount.replace(50_000);
        changes.push(QueryChange::MaxAmount { old, new: criteria.max_amount });
        let old = sort;
        sort.toggle(LoanField::Amount);
        changes.push(QueryChange::Sort { old, new: sort });

        assert_eq!(coordinator.observe(&mut changes, &mut paginator).len(), 2);
        assert!(paginator.is_empty());

        let fresh = paginator.begin_load().unwrap();
        view.sync(changes.view_generation(), &criteria, &sort);
        assert_eq!(paginator.complete_load(in_flight, view.indices()), LoadOutcome::Stale);
        paginator.complete_load(fresh, view.indices());

        let amounts: Vec<u64> = paginator.loaded().iter().map(|&i| store.records()[i].amount).collect();
        // Equal amounts 7310 keep store order: id 2 before id 4
        assert_eq!(amounts, vec![1000, 7310]);
        assert_eq!(store.records()[paginator.loaded()[1]].id, 2);

        while let Some(ticket) = paginator.begin_load() {
            paginator.complete_load(ticket, view.indices());
        }
        let ids: Vec<u64> = paginator.loaded().iter().map(|&i| store.records()[i].id).collect();
        assert_eq!(ids, vec![6, 2, 4, 7, 1]);
        assert!(!paginator.has_more());
    }

    #[test]
    fn test_complete_workflow_with_grid() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        tokio::task::LocalSet::new().block_on(&runtime, async {
            let store = RecordStore::from_json("loans", DATASET).unwrap();
            let config = GridConfig::from_json(r#"{"pageSize": 3, "fetchLatencyMs": 500}"#).unwrap();
            let grid = LoanGrid::new(store, &config);

            grid.set_start_date(Some("2025-01-02"));
            grid.set_end_date(Some("2025-01-06"));
            grid.toggle_sort(LoanField::Status);
            grid.settle().await;

            // approved (2, 5), pending (4), rejected (3, 6)
            assert_eq!(grid.loaded_ids(), vec![2, 5, 4]);
            assert!(grid.has_more());
            assert_eq!(grid.aria_sort(LoanField::Status), AriaSort::Ascending);

            grid.load_more();
            grid.settle().await;
            assert_eq!(grid.loaded_ids(), vec![2, 5, 4, 3, 6]);
            assert!(!grid.has_more());

            grid.set_status(LoanStatus::Pending);
            grid.settle().await;
            assert_eq!(grid.loaded_ids(), vec![4]);
            assert_eq!(grid.criteria().status, StatusFilter::Only(LoanStatus::Pending));
        });
    }
}
