#![forbid(unsafe_code)]

//! Scroll state and the imperative scroll handle.
//!
//! The offset lives in a shared cell behind [`ScrollHandle`], a cheap clonable
//! handle that a host can create before the list exists and keep across
//! renders. Requests made through the handle are recorded as pending and are
//! committed by the [`ScrollController`] at the start of the next layout pass,
//! where they are clamped to `[0, max_offset]`.
//!
//! ```
//! use vlist::{ScrollController, ScrollHandle};
//!
//! let handle = ScrollHandle::new();
//! let mut controller = ScrollController::with_handle(handle.clone());
//!
//! handle.scroll_to(1000.0);
//! assert_eq!(handle.offset(), 0.0); // not yet observed
//!
//! controller.settle(700.0);
//! assert_eq!(handle.offset(), 700.0); // clamped to the max offset
//! ```
//!
//! Everything here is single-threaded; the handle is `!Send`.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ScrollCell {
    /// Offset observed by the last layout pass.
    offset: Cell<f64>,
    /// Offset requested since the last layout pass.
    pending: Cell<Option<f64>>,
}

/// Stable handle for driving a list's scroll position.
#[derive(Debug, Clone, Default)]
pub struct ScrollHandle {
    shared: Rc<ScrollCell>,
}

impl ScrollHandle {
    /// Create a detached handle at offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a scroll to `offset`.
    ///
    /// Observed by the next layout pass. Calling it twice with the same
    /// offset has the same effect as calling it once. Non-finite offsets are
    /// ignored.
    pub fn scroll_to(&self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.shared.pending.set(Some(offset));
    }

    /// Request a scroll relative to the most recent request (or the current
    /// offset when nothing is pending).
    pub fn scroll_by(&self, delta: f64) {
        let base = self.target();
        self.scroll_to(base + delta);
    }

    /// Offset observed by the last layout pass.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.shared.offset.get()
    }

    /// Offset requested but not yet observed.
    #[must_use]
    pub fn pending(&self) -> Option<f64> {
        self.shared.pending.get()
    }

    /// Pending offset if any, else the observed one.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.pending().unwrap_or_else(|| self.offset())
    }

    /// Whether both handles drive the same scroll state.
    #[must_use]
    pub fn same_state(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

/// Owns the committed scroll offset for one list.
///
/// Plays the role of the scroll container: it is the only place where the
/// offset is clamped.
#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    handle: ScrollHandle,
}

impl ScrollController {
    /// Controller with a fresh handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller driven by an existing handle.
    #[must_use]
    pub fn with_handle(handle: ScrollHandle) -> Self {
        Self { handle }
    }

    /// A clone of the handle.
    #[must_use]
    pub fn handle(&self) -> ScrollHandle {
        self.handle.clone()
    }

    /// Committed offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.handle.offset()
    }

    /// Commit any pending request and clamp to `[0, max_offset]`.
    ///
    /// Also re-clamps an already committed offset when the content shrank.
    /// Returns `true` if the committed offset changed.
    pub fn settle(&mut self, max_offset: f64) -> bool {
        let shared = &self.handle.shared;
        let previous = shared.offset.get();
        let requested = shared.pending.take().unwrap_or(previous);
        let next = clamp_offset(requested, max_offset);
        shared.offset.set(next);
        next != previous
    }
}

fn clamp_offset(offset: f64, max_offset: f64) -> f64 {
    let max = if max_offset.is_finite() {
        max_offset.max(0.0)
    } else {
        0.0
    };
    offset.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_pending_until_settled() {
        let mut controller = ScrollController::new();
        let handle = controller.handle();
        handle.scroll_to(120.0);
        assert_eq!(handle.pending(), Some(120.0));
        assert_eq!(controller.offset(), 0.0);

        assert!(controller.settle(1_000.0));
        assert_eq!(controller.offset(), 120.0);
        assert_eq!(handle.pending(), None);
    }

    #[test]
    fn settle_clamps_both_ends() {
        let mut controller = ScrollController::new();
        let handle = controller.handle();
        handle.scroll_to(-50.0);
        controller.settle(100.0);
        assert_eq!(controller.offset(), 0.0);

        handle.scroll_to(500.0);
        controller.settle(100.0);
        assert_eq!(controller.offset(), 100.0);
    }

    #[test]
    fn settle_reclamps_when_content_shrinks() {
        let mut controller = ScrollController::new();
        controller.handle().scroll_to(400.0);
        controller.settle(1_000.0);
        assert!(controller.settle(250.0));
        assert_eq!(controller.offset(), 250.0);
        assert!(!controller.settle(250.0));
    }

    #[test]
    fn scroll_to_twice_is_idempotent() {
        let mut once = ScrollController::new();
        once.handle().scroll_to(300.0);
        once.settle(1_000.0);

        let mut twice = ScrollController::new();
        twice.handle().scroll_to(300.0);
        twice.handle().scroll_to(300.0);
        twice.settle(1_000.0);

        assert_eq!(once.offset(), twice.offset());
    }

    #[test]
    fn scroll_by_stacks_on_pending() {
        let mut controller = ScrollController::new();
        let handle = controller.handle();
        handle.scroll_to(100.0);
        handle.scroll_by(25.0);
        controller.settle(1_000.0);
        assert_eq!(controller.offset(), 125.0);

        handle.scroll_by(-200.0);
        controller.settle(1_000.0);
        assert_eq!(controller.offset(), 0.0);
    }

    #[test]
    fn non_finite_requests_are_ignored() {
        let handle = ScrollHandle::new();
        handle.scroll_to(f64::NAN);
        handle.scroll_to(f64::INFINITY);
        assert_eq!(handle.pending(), None);
    }

    #[test]
    fn handle_created_before_controller() {
        let handle = ScrollHandle::new();
        handle.scroll_to(42.0);
        let mut controller = ScrollController::with_handle(handle.clone());
        controller.settle(100.0);
        assert_eq!(handle.offset(), 42.0);
        assert!(handle.same_state(&controller.handle()));
        assert!(!handle.same_state(&ScrollHandle::new()));
    }
}
