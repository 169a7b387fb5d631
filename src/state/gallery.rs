//! The pagination engine
//!
//! `Gallery` owns the accumulated records, the page cursor and the loading
//! flag. It never performs I/O itself: operations return an [`Effect`] that
//! the shell turns into an async task, and fetch results come back in through
//! [`Gallery::fetch_completed`].

use iced::{Rectangle, Size};
use tracing::{debug, error, info};

use super::config::{DispatchPolicy, GalleryConfig};
use super::data::ImageRecord;
use super::observer::{SentinelObserver, SentinelTarget};
use crate::error::GalleryError;

/// One page of the listing to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page cursor
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

/// Side effect requested by a state transition
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch(PageRequest),
}

/// Where the engine is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

#[derive(Debug)]
pub struct Gallery {
    images: Vec<ImageRecord>,
    page: u32,
    loading: bool,
    page_size: u32,
    dispatch: DispatchPolicy,
    observer: SentinelObserver,
    lifecycle: Lifecycle,
    last_error: Option<GalleryError>,
}

impl Gallery {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            images: Vec::new(),
            page: 1,
            loading: false,
            page_size: config.page_size.max(1),
            dispatch: config.dispatch,
            observer: SentinelObserver::new(config.threshold),
            lifecycle: Lifecycle::Created,
            last_error: None,
        }
    }

    /// Mount the gallery: the cursor becomes 1, which requests the first page
    pub fn mount(&mut self) -> Effect {
        if self.lifecycle != Lifecycle::Created {
            return Effect::None;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.request_current_page()
    }

    /// Tear the gallery down, releasing the sentinel observer.
    ///
    /// In-flight fetches are not cancelled; their results are dropped when
    /// they arrive.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.lifecycle = Lifecycle::Unmounted;
        let released = self.observer.unobserve();
        info!(
            target_key = released.as_ref().map(|t| t.key.as_str()),
            images = self.images.len(),
            "Gallery unmounted"
        );
    }

    /// Apply the outcome of the fetch for `page`.
    ///
    /// Success appends the records in arrival order; failure is logged. Either
    /// way the loading flag is cleared and the cursor is left alone.
    pub fn fetch_completed(
        &mut self,
        page: u32,
        result: Result<Vec<ImageRecord>, GalleryError>,
    ) {
        if self.lifecycle != Lifecycle::Mounted {
            debug!(page, "Dropping fetch result for unmounted gallery");
            return;
        }

        match result {
            Ok(records) => {
                debug!(
                    page,
                    received = records.len(),
                    total = self.images.len() + records.len(),
                    "Page loaded"
                );
                self.images.extend(records);
                self.last_error = None;
            }
            Err(e) => {
                error!(page, error = %e, "Failed to load page");
                self.last_error = Some(e);
            }
        }
        self.loading = false;
    }

    /// The sentinel rendered under `key` came fully into view: advance the
    /// cursor and fetch.
    ///
    /// Keys other than the most recently bound sentinel are stale and
    /// ignored. That binding survives the loading suspension, so under
    /// [`DispatchPolicy::Unguarded`] a repeated intersection of the same cell
    /// dispatches the next page while the previous fetch is still in flight.
    pub fn sentinel_intersected(&mut self, key: &str) -> Effect {
        if self.lifecycle != Lifecycle::Mounted {
            return Effect::None;
        }
        if !self.observer.is_bound(key) {
            debug!(key, "Ignoring intersection of unbound cell");
            return Effect::None;
        }
        if self.loading && self.dispatch == DispatchPolicy::GateOnLoading {
            debug!(page = self.page, "Ignoring intersection while loading");
            return Effect::None;
        }

        self.page += 1;
        self.request_current_page()
    }

    /// Feed a visibility report for the cell rendered under `key`.
    ///
    /// `target_size` is the full size of the sentinel cell, `visible` the part
    /// of it inside the viewport.
    pub fn report_visibility(
        &mut self,
        key: &str,
        visible: Option<Rectangle>,
        target_size: Size,
    ) -> Effect {
        if self.lifecycle != Lifecycle::Mounted {
            return Effect::None;
        }
        if self.observer.report(key, visible, target_size) {
            debug!(key, "Sentinel intersected");
            self.sentinel_intersected(key)
        } else {
            Effect::None
        }
    }

    /// Point the observer at the current last record.
    ///
    /// Called once per update cycle. While loading or empty the observer
    /// watches nothing. Returns the target when it changed, so the caller can
    /// ask for its initial visibility.
    pub fn bind_sentinel(&mut self) -> Option<SentinelTarget> {
        if self.lifecycle != Lifecycle::Mounted {
            return None;
        }

        let last = self.images.len().checked_sub(1);
        match last {
            Some(ordinal) if !self.loading => {
                let target = SentinelTarget {
                    key: self.images[ordinal].key(ordinal),
                    ordinal,
                };
                if self.observer.observe(target.clone()) {
                    Some(target)
                } else {
                    None
                }
            }
            _ => {
                self.observer.suspend();
                None
            }
        }
    }

    fn request_current_page(&mut self) -> Effect {
        self.loading = true;
        self.observer.suspend();
        let request = PageRequest {
            page: self.page,
            limit: self.page_size,
        };
        info!(page = request.page, limit = request.limit, "Requesting page");
        Effect::Fetch(request)
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    /// The cell currently carrying the observation binding
    pub fn sentinel(&self) -> Option<&SentinelTarget> {
        self.observer.target()
    }

    /// Error from the most recent failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&GalleryError> {
        self.last_error.as_ref()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    const CELL: Size = Size::new(100.0, 200.0);

    fn record(id: &str) -> ImageRecord {
        ImageRecord::new(id, format!("https://example.com/{id}"))
    }

    fn ids(gallery: &Gallery) -> Vec<&str> {
        gallery.images().iter().map(|r| r.id.as_str()).collect()
    }

    /// Bind the sentinel and report it intersected
    fn intersect_last(gallery: &mut Gallery) -> Effect {
        gallery.bind_sentinel();
        let key = gallery.sentinel().map(|t| t.key.clone()).unwrap();
        gallery.sentinel_intersected(&key)
    }

    fn fully_visible() -> Option<Rectangle> {
        Some(Rectangle::new(Point::ORIGIN, CELL))
    }

    /// Mount and complete page 1 with `[a, b]`, then bind the sentinel
    fn scenario_a() -> Gallery {
        let mut gallery = Gallery::new(&GalleryConfig::default());
        assert_eq!(
            gallery.mount(),
            Effect::Fetch(PageRequest { page: 1, limit: 2 })
        );
        gallery.fetch_completed(1, Ok(vec![record("a"), record("b")]));
        gallery.bind_sentinel();
        gallery
    }

    #[test]
    fn test_initial_state() {
        let gallery = Gallery::new(&GalleryConfig::default());
        assert!(gallery.images().is_empty());
        assert_eq!(gallery.page(), 1);
        assert_eq!(gallery.phase(), Phase::Idle);
        assert!(gallery.sentinel().is_none());
    }

    #[test]
    fn test_mount_is_loading_once() {
        let mut gallery = Gallery::new(&GalleryConfig::default());
        let _ = gallery.mount();
        assert!(gallery.is_loading());
        assert_eq!(gallery.mount(), Effect::None);
    }

    #[test]
    fn test_page_size_comes_from_config() {
        let config = GalleryConfig {
            page_size: 30,
            ..GalleryConfig::default()
        };
        let mut gallery = Gallery::new(&config);
        assert_eq!(
            gallery.mount(),
            Effect::Fetch(PageRequest { page: 1, limit: 30 })
        );
    }

    #[test]
    fn test_scenario_a_first_page() {
        let gallery = scenario_a();
        assert_eq!(ids(&gallery), ["a", "b"]);
        assert_eq!(gallery.page(), 1);
        assert!(!gallery.is_loading());
    }

    #[test]
    fn test_scenario_b_scroll_loads_next_page() {
        let mut gallery = scenario_a();

        let effect = gallery.report_visibility("b-1", fully_visible(), CELL);
        assert_eq!(effect, Effect::Fetch(PageRequest { page: 2, limit: 2 }));
        assert_eq!(gallery.page(), 2);
        assert!(gallery.is_loading());

        gallery.fetch_completed(2, Ok(vec![record("c"), record("d")]));
        assert_eq!(ids(&gallery), ["a", "b", "c", "d"]);
        assert!(!gallery.is_loading());
    }

    #[test]
    fn test_scenario_c_empty_page_freezes_pagination() {
        let mut gallery = scenario_a();
        let _ = gallery.report_visibility("b-1", fully_visible(), CELL);

        gallery.fetch_completed(2, Ok(vec![]));
        assert_eq!(ids(&gallery), ["a", "b"]);
        assert_eq!(gallery.page(), 2);

        // The same cell is rebound but it was already in view
        gallery.bind_sentinel();
        assert_eq!(gallery.sentinel().map(|t| t.key.as_str()), Some("b-1"));
        assert_eq!(
            gallery.report_visibility("b-1", fully_visible(), CELL),
            Effect::None
        );
        assert_eq!(gallery.page(), 2);
    }

    #[test]
    fn test_scenario_d_failed_first_page() {
        let mut gallery = Gallery::new(&GalleryConfig::default());
        let _ = gallery.mount();

        gallery.fetch_completed(1, Err(GalleryError::Fetch("connection refused".into())));
        assert!(gallery.images().is_empty());
        assert!(!gallery.is_loading());
        assert_eq!(gallery.page(), 1);
        assert!(matches!(gallery.last_error(), Some(GalleryError::Fetch(_))));

        // Nothing to observe, so nothing retries
        assert_eq!(gallery.bind_sentinel(), None);
        assert!(gallery.sentinel().is_none());
    }

    #[test]
    fn test_failure_after_success_keeps_items_and_cursor() {
        let mut gallery = scenario_a();
        let _ = gallery.report_visibility("b-1", fully_visible(), CELL);

        gallery.fetch_completed(2, Err(GalleryError::Decode("expected array".into())));
        assert_eq!(ids(&gallery), ["a", "b"]);
        assert_eq!(gallery.page(), 2);
        assert!(!gallery.is_loading());
    }

    #[test]
    fn test_append_only_across_pages() {
        let mut gallery = scenario_a();
        let pages = [vec![record("c")], vec![], vec![record("d"), record("a"), record("e")]];
        let mut expected = 2;

        for page in pages {
            let _ = intersect_last(&mut gallery);
            expected += page.len();
            gallery.fetch_completed(gallery.page(), Ok(page));
            assert_eq!(gallery.images().len(), expected);
        }
        // Duplicate ids across pages are kept
        assert_eq!(ids(&gallery), ["a", "b", "c", "d", "a", "e"]);
    }

    #[test]
    fn test_partial_visibility_does_not_advance() {
        let mut gallery = scenario_a();
        let half = Some(Rectangle::new(Point::ORIGIN, Size::new(100.0, 120.0)));

        assert_eq!(gallery.report_visibility("b-1", half, CELL), Effect::None);
        assert_eq!(gallery.page(), 1);
    }

    #[test]
    fn test_non_sentinel_reports_do_not_advance() {
        let mut gallery = scenario_a();
        assert_eq!(
            gallery.report_visibility("a-0", fully_visible(), CELL),
            Effect::None
        );
        assert_eq!(gallery.page(), 1);
    }

    #[test]
    fn test_sentinel_is_last_item_when_idle() {
        let mut gallery = scenario_a();
        assert_eq!(
            gallery.sentinel(),
            Some(&SentinelTarget { key: "b-1".into(), ordinal: 1 })
        );

        let _ = gallery.report_visibility("b-1", fully_visible(), CELL);
        assert!(gallery.sentinel().is_none());
        assert_eq!(gallery.bind_sentinel(), None);

        gallery.fetch_completed(2, Ok(vec![record("c"), record("d")]));
        let target = gallery.bind_sentinel().unwrap();
        assert_eq!(target.ordinal, 3);
        assert_eq!(target.key, "d-3");

        // Rebinding again without changes is a no-op
        assert_eq!(gallery.bind_sentinel(), None);
        assert_eq!(gallery.sentinel(), Some(&target));
    }

    #[test]
    fn test_unguarded_dispatch_allows_overlapping_fetches() {
        let mut gallery = scenario_a();

        assert_eq!(
            gallery.sentinel_intersected("b-1"),
            Effect::Fetch(PageRequest { page: 2, limit: 2 })
        );
        // The observer is suspended, but `b-1` is still the bound cell
        assert!(gallery.sentinel().is_none());
        assert_eq!(
            gallery.sentinel_intersected("b-1"),
            Effect::Fetch(PageRequest { page: 3, limit: 2 })
        );

        // The first completion clears the flag although page 3 is in flight
        gallery.fetch_completed(2, Ok(vec![record("c"), record("d")]));
        assert!(!gallery.is_loading());
        gallery.fetch_completed(3, Ok(vec![record("e"), record("f")]));
        assert_eq!(ids(&gallery), ["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_unbound_keys_do_not_advance() {
        let mut gallery = Gallery::new(&GalleryConfig::default());
        let _ = gallery.mount();

        // Nothing has been bound yet
        assert_eq!(gallery.sentinel_intersected("a-0"), Effect::None);

        gallery.fetch_completed(1, Ok(vec![record("a"), record("b")]));
        gallery.bind_sentinel();

        // Not the last cell
        assert_eq!(gallery.sentinel_intersected("a-0"), Effect::None);
        assert_eq!(gallery.sentinel_intersected("zzz"), Effect::None);
        assert_eq!(gallery.page(), 1);

        // Once page 2 is bound, the old sentinel is stale
        let _ = gallery.sentinel_intersected("b-1");
        gallery.fetch_completed(2, Ok(vec![record("c"), record("d")]));
        gallery.bind_sentinel();
        assert_eq!(gallery.sentinel_intersected("b-1"), Effect::None);
        assert_eq!(gallery.page(), 2);
        assert_eq!(
            gallery.sentinel_intersected("d-3"),
            Effect::Fetch(PageRequest { page: 3, limit: 2 })
        );
    }

    #[test]
    fn test_gated_dispatch_ignores_intersections_while_loading() {
        let config = GalleryConfig {
            dispatch: DispatchPolicy::GateOnLoading,
            ..GalleryConfig::default()
        };
        let mut gallery = Gallery::new(&config);
        let _ = gallery.mount();
        gallery.fetch_completed(1, Ok(vec![record("a"), record("b")]));
        gallery.bind_sentinel();

        assert!(matches!(gallery.sentinel_intersected("b-1"), Effect::Fetch(_)));
        assert_eq!(gallery.sentinel_intersected("b-1"), Effect::None);
        assert_eq!(gallery.page(), 2);
    }

    #[test]
    fn test_cursor_only_moves_forward_by_one() {
        let mut gallery = scenario_a();
        let mut last = gallery.page();

        for _ in 0..5 {
            let _ = intersect_last(&mut gallery);
            assert_eq!(gallery.page(), last + 1);
            last = gallery.page();
            gallery.fetch_completed(last, Err(GalleryError::Fetch("offline".into())));
            assert_eq!(gallery.page(), last);
        }
    }

    #[test]
    fn test_unmount_releases_observer_and_stops_paging() {
        let mut gallery = scenario_a();
        gallery.unmount();

        assert!(gallery.observer.is_released());
        assert!(gallery.sentinel().is_none());
        assert_eq!(gallery.sentinel_intersected("b-1"), Effect::None);
        assert_eq!(
            gallery.report_visibility("b-1", fully_visible(), CELL),
            Effect::None
        );
        assert_eq!(gallery.bind_sentinel(), None);
        assert_eq!(gallery.page(), 1);
    }

    #[test]
    fn test_results_after_unmount_are_dropped() {
        let mut gallery = Gallery::new(&GalleryConfig::default());
        let _ = gallery.mount();
        gallery.unmount();

        gallery.fetch_completed(1, Ok(vec![record("a")]));
        assert!(gallery.images().is_empty());
    }
}
