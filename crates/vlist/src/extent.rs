#![forbid(unsafe_code)]

//! Content extent: the total scrollable size implied by all items.

use crate::size_cache::SizeCache;
use crate::strategy::LayoutStrategy;

/// Total content extent for `item_count` items.
///
/// - Fixed: `item_count * item_height`, exactly.
/// - Variable: the sum of all item heights, maintained incrementally by the
///   size cache.
/// - Dynamic: measured heights plus the estimate for unmeasured items. The
///   result never drops below the sum of measured heights, so the scrollbar
///   cannot shrink under content that has already been laid out.
///
/// `sizes` must have been synced with `strategy` and `item_count`.
#[must_use]
pub fn total_extent(strategy: &LayoutStrategy, sizes: &SizeCache, item_count: usize) -> f64 {
    match strategy {
        LayoutStrategy::Fixed { item_height } => item_count as f64 * item_height,
        LayoutStrategy::Variable { .. } => sizes.total(),
        LayoutStrategy::Dynamic { .. } => sizes.total().max(sizes.measured_extent()),
    }
}

/// Largest valid scroll offset: `max(0, content - viewport)`.
#[must_use]
pub fn max_scroll_offset(content_extent: f64, viewport_extent: f64) -> f64 {
    (content_extent - viewport_extent).max(0.0)
}
