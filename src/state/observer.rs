//! Sentinel observation
//!
//! Stands in for the browser's intersection observer. One observer watches
//! at most one target, the last rendered cell, and turns visibility reports
//! for that target into "sentinel intersected" notifications. Like the
//! browser primitive it only reports the transition into the intersecting
//! state, never repeatedly while the target stays in view.

use iced::{Rectangle, Size};

/// Layout rounding slack when comparing a ratio against the threshold
const RATIO_EPSILON: f32 = 1e-3;

/// The cell currently instrumented as the sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelTarget {
    /// Render key of the record (`"{id}-{ordinal}"`)
    pub key: String,
    /// Zero-based position of the record in the gallery
    pub ordinal: usize,
}

/// Fraction of `target` covered by the `visible` region.
///
/// `visible` is the part of the target left after clipping by the viewport
/// root; `None` means the target is entirely outside it.
pub fn intersection_ratio(visible: Option<Rectangle>, target: Size) -> f32 {
    let target_area = target.width * target.height;
    if target_area <= 0.0 {
        return 0.0;
    }

    match visible {
        Some(rect) => {
            let width = rect.width.clamp(0.0, target.width);
            let height = rect.height.clamp(0.0, target.height);
            width * height / target_area
        }
        None => 0.0,
    }
}

#[derive(Debug)]
pub struct SentinelObserver {
    threshold: f32,
    /// Target being watched right now
    target: Option<SentinelTarget>,
    /// Key of the most recently watched target, kept across suspensions so
    /// rebinding to the same cell does not replay its intersection
    last_key: Option<String>,
    intersecting: bool,
    released: bool,
}

impl SentinelObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            target: None,
            last_key: None,
            intersecting: false,
            released: false,
        }
    }

    /// Watch `target` instead of whatever was watched before.
    ///
    /// Idempotent: returns `true` only when the watched target actually
    /// changed, which is when the caller should ask for a fresh visibility
    /// report.
    pub fn observe(&mut self, target: SentinelTarget) -> bool {
        if self.is_released() {
            return false;
        }
        if self.target.as_ref() == Some(&target) {
            return false;
        }

        if self.last_key.as_deref() != Some(target.key.as_str()) {
            self.intersecting = false;
            self.last_key = Some(target.key.clone());
        }
        self.target = Some(target);
        true
    }

    /// Stop watching for now (the gallery is loading or has nothing to show)
    pub fn suspend(&mut self) {
        self.target = None;
    }

    /// Release the observer for good, returning the target it was watching
    pub fn unobserve(&mut self) -> Option<SentinelTarget> {
        self.released = true;
        self.last_key = None;
        self.intersecting = false;
        self.target.take()
    }

    pub fn target(&self) -> Option<&SentinelTarget> {
        self.target.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Whether `key` is the most recently bound sentinel.
    ///
    /// The binding outlives a suspension: a cell that was watched before a
    /// fetch started still counts until another cell is bound or the
    /// observer is released.
    pub fn is_bound(&self, key: &str) -> bool {
        !self.released && self.last_key.as_deref() == Some(key)
    }

    /// Feed a visibility report for the target with render key `key`.
    ///
    /// Returns `true` when the watched target has just become intersecting.
    /// Reports for anything other than the current target are stale and
    /// ignored.
    pub fn report(&mut self, key: &str, visible: Option<Rectangle>, target_size: Size) -> bool {
        let watching = self.target.as_ref().is_some_and(|t| t.key == key);
        if !watching {
            return false;
        }

        let now = intersection_ratio(visible, target_size) + RATIO_EPSILON >= self.threshold;
        let entered = now && !self.intersecting;
        self.intersecting = now;
        entered
    }
}
