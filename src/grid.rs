/// LoanGrid Session
///
/// `LoanGrid` is the single state object of a browsing session. It owns the
/// filter criteria, the sort state, the query view and the paginator, and is
/// handed by reference (it is a cheap `Rc` clone) to whatever renders it.
///
/// All mutators are synchronous. Each one that changes an observed value is
/// recorded in the changeset; the reset coordinator then empties the loaded
/// window and claims the first page of the new window, so `is_loading` turns
/// true as soon as the mutator returns.
///
/// Fetching is the only part that waits. A fetch runs as a local tokio task
/// that sleeps for the configured fetch latency and then appends the next
/// batch of the view *as it is when the batch resolves*. A reset aborts the
/// superseded task. Every batch also carries the window generation it was
/// issued for, and a batch from an older generation is never appended.
///
/// # Runtime
///
/// The grid is single-threaded. Mutators never touch the runtime: the first
/// page claimed by a reset is handed to a task by the next `load_more` or
/// `settle`. Those two spawn with `tokio::task::spawn_local` and therefore
/// must run inside a `tokio::task::LocalSet`.
///
/// # Examples
///
/// ```
/// use loangrid::{GridConfig, LoanGrid, Loan, LoanStatus, RecordStore};
/// use std::time::Duration;
///
/// let store = RecordStore::new("loans", vec![
///     Loan::new(1, "Alice", 1000, LoanStatus::Pending, "2023-01-01"),
///     Loan::new(2, "Bob", 2000, LoanStatus::Approved, "2023-02-01"),
/// ]).unwrap();
///
/// let config = GridConfig::default().with_fetch_latency(Duration::from_millis(1));
/// let grid = LoanGrid::new(store, &config);
///
/// grid.set_status(LoanStatus::Approved);
/// assert!(grid.is_loading());
///
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
/// let local = tokio::task::LocalSet::new();
///
/// local.block_on(&runtime, async {
///     grid.settle().await;
///
///     assert_eq!(grid.loaded_ids(), vec![2]);
///     assert!(!grid.has_more());
/// });
/// ```

use crate::changeset::{Changeset, QueryChange};
use crate::config::GridConfig;
use crate::filter::{FilterCriteria, StatusFilter};
use crate::pagination::{LoadOutcome, LoadPhase, LoadTicket, Paginator};
use crate::record::{Loan, LoanField};
use crate::reset::ResetCoordinator;
use crate::sort::{AriaSort, SortState};
use crate::store::RecordStore;
use crate::view::QueryView;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Notifications delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// The loaded window was emptied; `generation` is the new window generation
    WindowReset { generation: u64 },
    /// A batch was claimed for the window of `generation`
    LoadStarted { generation: u64 },
    BatchAppended { count: usize, has_more: bool },
}

type Listener = Box<dyn Fn(&GridEvent)>;

struct GridState {
    criteria: FilterCriteria,
    sort: SortState,
    changes: Changeset,
    coordinator: ResetCoordinator,
    view: QueryView,
    paginator: Paginator,
    /// Claimed by a reset, not yet handed to a fetch task
    pending: Option<LoadTicket>,
    /// The running fetch and the window generation it was issued for
    in_flight: Option<(u64, JoinHandle<()>)>,
}

impl GridState {
    /// Brings the query view up to date with the current criteria and sort
    fn sync_view(&mut self) {
        let generation = self.changes.view_generation();
        self.view.sync(generation, &self.criteria, &self.sort);
    }
}

struct GridInner {
    store: Rc<RecordStore>,
    state: RefCell<GridState>,
    listeners: RefCell<Vec<Listener>>,
    /// Signalled after every reset and every resolved fetch
    changed: Notify,
    fetch_latency: Duration,
}

/// Returns the old value if `new` differs from the slot's current value
fn replace_if_changed<T: PartialEq>(slot: &mut T, new: T) -> Option<T> {
    if *slot == new {
        None
    } else {
        Some(std::mem::replace(slot, new))
    }
}

fn normalize_date(date: Option<&str>) -> Option<String> {
    date.filter(|d| !d.is_empty()).map(str::to_string)
}

#[derive(Clone)]
pub struct LoanGrid {
    inner: Rc<GridInner>,
}

/// A non-owning handle to a `LoanGrid`, for listeners and other callbacks
/// that must not keep the session alive
#[derive(Clone)]
pub struct WeakLoanGrid {
    inner: Weak<GridInner>,
}

impl WeakLoanGrid {
    pub fn upgrade(&self) -> Option<LoanGrid> {
        self.inner.upgrade().map(|inner| LoanGrid { inner })
    }
}

impl fmt::Debug for WeakLoanGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakLoanGrid")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl LoanGrid {
    /// Creates a session over `store`. The window starts empty and idle;
    /// nothing is loaded until the first `load_more` or reset.
    pub fn new(store: impl Into<Rc<RecordStore>>, config: &GridConfig) -> Self {
        let store = store.into();
        let state = GridState {
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            changes: Changeset::new(),
            coordinator: ResetCoordinator::new(),
            view: QueryView::new(Rc::clone(&store)),
            paginator: Paginator::new(config.page_size),
            pending: None,
            in_flight: None,
        };

        LoanGrid {
            inner: Rc::new(GridInner {
                store,
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
                changed: Notify::new(),
                fetch_latency: config.fetch_latency(),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakLoanGrid {
        WeakLoanGrid {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ---- mutators ----

    pub fn set_search_text(&self, text: impl Into<String>) {
        let new = text.into();
        self.update(move |st| {
            replace_if_changed(&mut st.criteria.search_text, new.clone())
                .map(|old| QueryChange::SearchText { old, new })
        });
    }

    pub fn set_status(&self, status: impl Into<StatusFilter>) {
        let new = status.into();
        self.update(|st| {
            replace_if_changed(&mut st.criteria.status, new).map(|old| QueryChange::Status { old, new })
        });
    }

    pub fn set_min_amount(&self, amount: Option<u64>) {
        self.update(|st| {
            replace_if_changed(&mut st.criteria.min_amount, amount)
                .map(|old| QueryChange::MinAmount { old, new: amount })
        });
    }

    pub fn set_max_amount(&self, amount: Option<u64>) {
        self.update(|st| {
            replace_if_changed(&mut st.criteria.max_amount, amount)
                .map(|old| QueryChange::MaxAmount { old, new: amount })
        });
    }

    /// Sets the inclusive lower date bound. An empty string clears it.
    pub fn set_start_date(&self, date: Option<&str>) {
        let new = normalize_date(date);
        self.update(move |st| {
            replace_if_changed(&mut st.criteria.start_date, new.clone())
                .map(|old| QueryChange::StartDate { old, new })
        });
    }

    /// Sets the inclusive upper date bound. An empty string clears it.
    pub fn set_end_date(&self, date: Option<&str>) {
        let new = normalize_date(date);
        self.update(move |st| {
            replace_if_changed(&mut st.criteria.end_date, new.clone())
                .map(|old| QueryChange::EndDate { old, new })
        });
    }

    /// Advances the sort cycle for a column header click
    pub fn toggle_sort(&self, column: LoanField) {
        self.update(|st| {
            let old = st.sort;
            st.sort.toggle(column);
            Some(QueryChange::Sort { old, new: st.sort })
        });
    }

    pub fn update_page_size(&self, page_size: NonZeroUsize) {
        self.update(|st| {
            let old = st.paginator.page_size();
            if old == page_size {
                return None;
            }
            st.paginator.set_page_size(page_size);
            Some(QueryChange::PageSize { old, new: page_size })
        });
    }

    /// Empties the window and loads the first page again
    pub fn reset_and_load(&self) {
        self.update(|_| Some(QueryChange::Reset));
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut GridState) -> Option<QueryChange>,
    {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            match f(&mut *st) {
                Some(change) => {
                    st.changes.push(change);
                    true
                }
                None => false,
            }
        };

        if changed {
            self.coordinate();
        }
    }

    /// Runs the reset coordinator and, if it reset the window, cancels the
    /// superseded fetch and claims the first page of the new window
    fn coordinate(&self) {
        let (generation, claimed, superseded) = {
            let mut guard = self.inner.state.borrow_mut();
            let st = &mut *guard;
            if st.coordinator.observe(&mut st.changes, &mut st.paginator).is_empty() {
                return;
            }
            st.pending = st.paginator.begin_load();
            (st.paginator.generation(), st.pending.is_some(), st.in_flight.take())
        };

        if let Some((_, handle)) = superseded {
            handle.abort();
        }

        self.emit(&GridEvent::WindowReset { generation });
        if claimed {
            self.emit(&GridEvent::LoadStarted { generation });
        }
        self.inner.changed.notify_waiters();
    }

    // ---- loading ----

    /// Starts fetching the next batch.
    ///
    /// Returns false without doing anything if a fetch is already running or
    /// the window is exhausted. A first page claimed by a reset is started
    /// here.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub fn load_more(&self) -> bool {
        let (ticket, claimed) = {
            let mut st = self.inner.state.borrow_mut();
            match st.pending.take() {
                Some(ticket) => (ticket, false),
                None => match st.paginator.begin_load() {
                    Some(ticket) => (ticket, true),
                    None => return false,
                },
            }
        };

        self.spawn_fetch(ticket);
        if claimed {
            self.emit(&GridEvent::LoadStarted {
                generation: ticket.generation(),
            });
        }
        true
    }

    fn launch_pending(&self) {
        let pending = self.inner.state.borrow_mut().pending.take();
        if let Some(ticket) = pending {
            self.spawn_fetch(ticket);
        }
    }

    fn spawn_fetch(&self, ticket: LoadTicket) {
        let session = self.downgrade();
        let latency = self.inner.fetch_latency;
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(latency).await;
            if let Some(grid) = session.upgrade() {
                grid.finish_load(ticket);
            }
        });
        self.inner.state.borrow_mut().in_flight = Some((ticket.generation(), handle));
    }

    fn finish_load(&self, ticket: LoadTicket) {
        let outcome = {
            let mut guard = self.inner.state.borrow_mut();
            guard.sync_view();

            let st = &mut *guard;
            let outcome = st.paginator.complete_load(ticket, st.view.indices());
            if matches!(st.in_flight, Some((generation, _)) if generation == ticket.generation()) {
                st.in_flight = None;
            }
            outcome
        };

        if let LoadOutcome::Appended { count, has_more } = outcome {
            self.emit(&GridEvent::BatchAppended { count, has_more });
        }
        self.inner.changed.notify_waiters();
    }

    /// Waits until no fetch is running or claimed, including fetches started
    /// by resets and listeners while waiting. Any number of callers may wait
    /// at once; waiting never prevents a reset from cancelling a fetch.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub async fn settle(&self) {
        loop {
            let changed = self.inner.changed.notified();
            self.launch_pending();
            if !self.is_loading() {
                break;
            }
            changed.await;
        }
    }

    // ---- observers ----

    /// Registers a listener for grid events.
    ///
    /// Listeners may read or mutate the grid but must not call `subscribe`.
    /// A listener that needs the grid should capture a `WeakLoanGrid` from
    /// `downgrade`; a captured `LoanGrid` keeps the session alive forever.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&GridEvent) + 'static,
    {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    fn emit(&self, event: &GridEvent) {
        for listener in self.inner.listeners.borrow().iter() {
            listener(event);
        }
    }

    // ---- read access ----

    pub fn store(&self) -> &Rc<RecordStore> {
        &self.inner.store
    }

    /// Records in the loaded window, in view order
    pub fn loaded(&self) -> Vec<Loan> {
        let st = self.inner.state.borrow();
        st.paginator
            .loaded()
            .iter()
            .filter_map(|&i| self.inner.store.get(i))
            .cloned()
            .collect()
    }

    pub fn loaded_ids(&self) -> Vec<u64> {
        let st = self.inner.state.borrow();
        st.paginator
            .loaded()
            .iter()
            .filter_map(|&i| self.inner.store.get(i))
            .map(|loan| loan.id)
            .collect()
    }

    pub fn loaded_len(&self) -> usize {
        self.inner.state.borrow().paginator.len()
    }

    /// The full derived view under the current criteria and sort
    pub fn derived_view(&self) -> Vec<Loan> {
        let mut st = self.inner.state.borrow_mut();
        st.sync_view();
        st.view.to_vec()
    }

    pub fn derived_len(&self) -> usize {
        let mut st = self.inner.state.borrow_mut();
        st.sync_view();
        st.view.len()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().paginator.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.inner.state.borrow().paginator.has_more()
    }

    pub fn phase(&self) -> LoadPhase {
        self.inner.state.borrow().paginator.phase()
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.inner.state.borrow().paginator.page_size()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.inner.state.borrow().criteria.clone()
    }

    pub fn sort_state(&self) -> SortState {
        self.inner.state.borrow().sort
    }

    pub fn aria_sort(&self, column: LoanField) -> AriaSort {
        self.inner.state.borrow().sort.aria_sort(column)
    }

    /// Number of window resets performed so far
    pub fn resets(&self) -> u64 {
        self.inner.state.borrow().coordinator.resets()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let (derived_len, criteria, sort, page_size, phase) = {
            let mut st = self.inner.state.borrow_mut();
            st.sync_view();
            (
                st.view.len(),
                st.criteria.clone(),
                st.sort,
                st.paginator.page_size(),
                st.paginator.phase(),
            )
        };

        GridSnapshot {
            store: self.inner.store.name().to_string(),
            total_records: self.inner.store.len(),
            derived_len,
            criteria,
            sort,
            page_size,
            phase,
            is_loading: phase == LoadPhase::Loading,
            has_more: phase != LoadPhase::Exhausted,
            loaded: self.loaded(),
        }
    }
}

impl fmt::Debug for LoanGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.inner.state.borrow();
        f.debug_struct("LoanGrid")
            .field("store", &self.inner.store)
            .field("criteria", &st.criteria)
            .field("sort", &st.sort)
            .field("phase", &st.paginator.phase())
            .field("loaded", &st.paginator.len())
            .finish()
    }
}

/// Serializable state for a rendering layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub store: String,
    pub total_records: usize,
    pub derived_len: usize,
    pub criteria: FilterCriteria,
    pub sort: SortState,
    pub page_size: NonZeroUsize,
    pub phase: LoadPhase,
    pub is_loading: bool,
    pub has_more: bool,
    pub loaded: Vec<Loan>,
}
