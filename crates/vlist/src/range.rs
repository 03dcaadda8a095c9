#![forbid(unsafe_code)]

//! Range calculation: which indices intersect the viewport.
//!
//! [`compute_range`] maps a scroll offset and viewport extent to the
//! inclusive visible index range, then widens it by the overscan count on
//! each side. Fixed layouts are answered with arithmetic; variable and
//! dynamic layouts search the prefix sums held by the [`SizeCache`].
//!
//! # Guarantees
//!
//! For `item_count > 0`:
//!
//! ```text
//! 0 <= overscan_start <= start <= end <= overscan_end <= item_count - 1
//! ```
//!
//! When the offset reaches the max scroll offset (the viewport bottom meets
//! the content extent), `end` is the last index. For `item_count == 0` the result is [`VisibleRange::EMPTY`].

use std::ops::Range;

use crate::extent::max_scroll_offset;
use crate::size_cache::SizeCache;
use crate::strategy::LayoutStrategy;

/// Visible and over-scanned index ranges for one layout pass.
///
/// Stored half-open; the `*_index` accessors report inclusive bounds. Only
/// [`compute_range`] builds non-empty ranges, so the ordering always holds:
///
/// ```compile_fail
/// let _ = vlist::VisibleRange::new(5, 4, 0, 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleRange {
    visible: Range<usize>,
    overscan: Range<usize>,
}

impl VisibleRange {
    /// The range of an empty dataset.
    pub const EMPTY: Self = Self {
        visible: 0..0,
        overscan: 0..0,
    };

    /// Build from inclusive bounds.
    ///
    /// # Panics
    /// Panics if the bounds are not ordered
    /// `overscan_start <= start <= end <= overscan_end`.
    #[must_use]
    pub(crate) fn new(
        start: usize,
        end: usize,
        overscan_start: usize,
        overscan_end: usize,
    ) -> Self {
        assert!(
            overscan_start <= start && start <= end && end <= overscan_end,
            "unordered range: {overscan_start} <= {start} <= {end} <= {overscan_end}"
        );
        Self {
            visible: start..end + 1,
            overscan: overscan_start..overscan_end + 1,
        }
    }

    /// Whether no item is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// First visible index.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.visible.start
    }

    /// Last visible index (inclusive).
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.visible.end.saturating_sub(1)
    }

    /// First index to render.
    #[must_use]
    pub fn overscan_start_index(&self) -> usize {
        self.overscan.start
    }

    /// Last index to render (inclusive).
    #[must_use]
    pub fn overscan_end_index(&self) -> usize {
        self.overscan.end.saturating_sub(1)
    }

    /// Visible indices, half-open.
    #[must_use]
    pub fn visible(&self) -> Range<usize> {
        self.visible.clone()
    }

    /// Indices to instantiate, half-open.
    #[must_use]
    pub fn render_range(&self) -> Range<usize> {
        self.overscan.clone()
    }

    /// Number of items to instantiate.
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.overscan.len()
    }

    /// Whether `index` is strictly visible.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }
}

/// Compute the visible and over-scanned ranges.
///
/// `sizes` must have been synced with `strategy` and `item_count`
/// ([`SizeCache::sync`]); it is not consulted for fixed layouts. Negative or
/// non-finite offsets and extents are treated as zero.
#[must_use]
pub fn compute_range(
    scroll_offset: f64,
    viewport_extent: f64,
    strategy: &LayoutStrategy,
    sizes: &SizeCache,
    item_count: usize,
    overscan: usize,
) -> VisibleRange {
    if item_count == 0 {
        return VisibleRange::EMPTY;
    }
    let scroll = non_negative(scroll_offset);
    let viewport = non_negative(viewport_extent);

    let (start, end, last) = match strategy {
        LayoutStrategy::Fixed { item_height } => {
            let last = item_count - 1;
            let (start, end) = fixed_bounds(scroll, viewport, *item_height, item_count);
            (start, end, last)
        }
        LayoutStrategy::Variable { .. } => {
            let n = synced_count(sizes, item_count);
            if n == 0 {
                return VisibleRange::EMPTY;
            }
            let (start, end) = prefix_bounds(scroll, viewport, sizes, n);
            (start, end, n - 1)
        }
        LayoutStrategy::Dynamic { .. } => {
            let n = synced_count(sizes, item_count);
            if n == 0 {
                return VisibleRange::EMPTY;
            }
            let (start, end) = prefix_bounds(scroll, viewport, sizes, n);
            (start, end, n - 1)
        }
    };

    VisibleRange::new(
        start,
        end,
        start.saturating_sub(overscan),
        end.saturating_add(overscan).min(last),
    )
}

/// `start = floor(scroll / h)`, `end = start + ceil(viewport / h) - 1`.
fn fixed_bounds(scroll: f64, viewport: f64, item_height: f64, item_count: usize) -> (usize, usize) {
    let last = item_count - 1;
    // Float-to-int `as` saturates, so huge offsets land on `last`.
    let start = ((scroll / item_height).floor() as usize).min(last);
    let per_viewport = (viewport / item_height).ceil() as usize;
    let total = item_count as f64 * item_height;
    let end = if scroll >= max_scroll_offset(total, viewport) {
        last
    } else {
        start
            .saturating_add(per_viewport)
            .saturating_sub(1)
            .clamp(start, last)
    };
    (start, end)
}

/// Search the prefix sums: `start` is the item containing the scroll offset,
/// `end` is the last item whose top lies above the viewport bottom.
fn prefix_bounds(scroll: f64, viewport: f64, sizes: &SizeCache, n: usize) -> (usize, usize) {
    let last = n - 1;
    let start = sizes.index_at_offset(scroll).min(last);
    let end = if scroll >= max_scroll_offset(sizes.total(), viewport) {
        last
    } else {
        sizes
            .last_index_before(scroll + viewport)
            .clamp(start, last)
    };
    (start, end)
}

/// Guard against a cache that lags the dataset; indexing past it would read
/// entries that do not exist.
fn synced_count(sizes: &SizeCache, item_count: usize) -> usize {
    debug_assert_eq!(
        sizes.len(),
        item_count,
        "size cache not synced with dataset"
    );
    sizes.len().min(item_count)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
