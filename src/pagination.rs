/// LoanGrid Pagination Controller
///
/// The paginator owns the loaded window: the prefix of the derived view that
/// has been revealed so far. It grows the window one batch at a time through
/// a two-step protocol:
///
/// 1. `begin_load` moves `Idle -> Loading` and hands out a `LoadTicket`
///    tagged with the current window generation. It refuses (returns `None`)
///    while `Loading` or `Exhausted`.
/// 2. `complete_load` resolves the ticket against the view as it is *at
///    resolution time*, appends the next batch and moves to `Idle` or
///    `Exhausted`. A ticket from before the last `reset` is discarded
///    without touching the window.
///
/// The waiting in between belongs to the caller; see `LoanGrid::load_more`.

use serde::Serialize;
use std::num::NonZeroUsize;

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    /// Not loading; more records may exist
    Idle,
    /// A batch fetch is in flight
    Loading,
    /// The window covers the whole view
    Exhausted,
}

/// Permission to resolve one batch, tied to the window generation it was
/// issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of resolving a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `count` records were appended (possibly zero)
    Appended { count: usize, has_more: bool },
    /// The ticket predates a reset; nothing changed
    Stale,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: NonZeroUsize,
    /// Store indices of the loaded records, in view order
    loaded: Vec<usize>,
    phase: LoadPhase,
    generation: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Paginator {
            page_size,
            loaded: Vec::new(),
            phase: LoadPhase::Idle,
            generation: 0,
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Changes the batch size. Does not reset; callers pair this with `reset`.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn has_more(&self) -> bool {
        self.phase != LoadPhase::Exhausted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store indices of the loaded window
    pub fn loaded(&self) -> &[usize] {
        &self.loaded
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.phase != LoadPhase::Idle {
            log::trace!("load ignored while {:?}", self.phase);
            return None;
        }
        self.phase = LoadPhase::Loading;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Appends the next batch of `view` to the window.
    ///
    /// `view` must be the current derived view (store indices in view order).
    pub fn complete_load(&mut self, ticket: LoadTicket, view: &[usize]) -> LoadOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale batch for generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        let next_index = self.loaded.len();
        let end = view.len().min(next_index.saturating_add(self.page_size.get()));
        let batch = view.get(next_index..end).unwrap_or(&[]);
        self.loaded.extend_from_slice(batch);

        let has_more = self.loaded.len() < view.len();
        self.phase = if has_more {
            LoadPhase::Idle
        } else {
            LoadPhase::Exhausted
        };

        log::trace!(
            "appended {} records ({} of {} loaded)",
            batch.len(),
            self.loaded.len(),
            view.len()
        );

        LoadOutcome::Appended {
            count: batch.len(),
            has_more,
        }
    }

    /// Empties the window and invalidates outstanding tickets
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loaded.clear();
        self.phase = LoadPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn load(p: &mut Paginator, view: &[usize]) -> LoadOutcome {
        let ticket = p.begin_load().expect("paginator should be idle");
        p.complete_load(ticket, view)
    }

    #[test]
    fn test_initial_state() {
        let p = Paginator::default();
        assert_eq!(p.phase(), LoadPhase::Idle);
        assert_eq!(p.page_size().get(), DEFAULT_PAGE_SIZE);
        assert!(p.has_more());
        assert!(!p.is_loading());
        assert!(p.is_empty());
    }

    #[test]
    fn test_loads_in_batches_until_exhausted() {
        let view: Vec<usize> = (0..7).collect();
        let mut p = Paginator::new(page(3));

        assert_eq!(load(&mut p, &view), LoadOutcome::Appended { count: 3, has_more: true });
        assert_eq!(p.loaded(), &[0, 1, 2]);
        assert_eq!(load(&mut p, &view), LoadOutcome::Appended { count: 3, has_more: true });
        assert_eq!(load(&mut p, &view), LoadOutcome::Appended { count: 1, has_more: false });

        assert_eq!(p.phase(), LoadPhase::Exhausted);
        assert_eq!(p.loaded(), view.as_slice());

        // No further loads once exhausted
        assert!(p.begin_load().is_none());
        assert_eq!(p.len(), 7);
    }

    #[test]
    fn test_window_is_prefix_of_view() {
        let view = vec![9, 4, 7, 1, 3];
        let mut p = Paginator::new(page(2));
        while p.has_more() {
            load(&mut p, &view);
            assert_eq!(p.loaded(), &view[..p.len()]);
        }
    }

    #[test]
    fn test_begin_is_guarded_while_loading() {
        let mut p = Paginator::new(page(2));
        let ticket = p.begin_load().unwrap();
        assert!(p.is_loading());
        assert!(p.begin_load().is_none());

        p.complete_load(ticket, &[0, 1, 2]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.phase(), LoadPhase::Idle);
    }

    #[test]
    fn test_empty_view_exhausts_after_first_load() {
        let mut p = Paginator::new(page(25));
        assert!(p.has_more());
        assert_eq!(load(&mut p, &[]), LoadOutcome::Appended { count: 0, has_more: false });
        assert!(!p.has_more());
    }

    #[test]
    fn test_view_shrunk_to_window_length() {
        let mut p = Paginator::new(page(2));
        load(&mut p, &[0, 1, 2, 3]);

        // The view now holds exactly the loaded records
        assert_eq!(load(&mut p, &[0, 1]), LoadOutcome::Appended { count: 0, has_more: false });
        assert_eq!(p.loaded(), &[0, 1]);
    }

    #[test]
    fn test_reset_rejects_stale_ticket() {
        let mut p = Paginator::new(page(2));
        let stale = p.begin_load().unwrap();

        p.reset();
        assert_eq!(p.phase(), LoadPhase::Idle);

        let fresh = p.begin_load().unwrap();
        assert_eq!(p.complete_load(stale, &[5, 6, 7]), LoadOutcome::Stale);
        assert!(p.is_empty());
        assert!(p.is_loading());

        assert_eq!(p.complete_load(fresh, &[8]), LoadOutcome::Appended { count: 1, has_more: false });
        assert_eq!(p.loaded(), &[8]);
    }

    #[test]
    fn test_reset_after_exhaustion() {
        let mut p = Paginator::new(page(10));
        load(&mut p, &[0, 1]);
        assert_eq!(p.phase(), LoadPhase::Exhausted);

        p.reset();
        assert!(p.has_more());
        assert!(p.is_empty());
        assert!(p.begin_load().is_some());
    }
}
