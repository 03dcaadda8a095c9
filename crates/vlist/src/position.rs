#![forbid(unsafe_code)]

//! Positioning: absolute placement of a rendered item inside the content.

use crate::size_cache::SizeCache;
use crate::strategy::LayoutStrategy;

/// Where a rendered item sits within the content area.
///
/// Hosts place the item absolutely at `top`, spanning the full content width,
/// with the given `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPosition {
    /// Offset of the item's top edge from the start of the content.
    pub top: f64,
    /// Height of the item.
    pub height: f64,
    /// `false` when `height` is the dynamic placeholder estimate.
    pub measured: bool,
}

impl ItemPosition {
    /// Offset of the item's bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Position of the item at `index`, or `None` if `index` is outside the
/// dataset (or outside a size cache that has not caught up with it).
///
/// `sizes` must have been synced with `strategy` and `item_count`.
#[must_use]
pub fn position_of(
    index: usize,
    strategy: &LayoutStrategy,
    sizes: &SizeCache,
    item_count: usize,
) -> Option<ItemPosition> {
    if index >= item_count {
        return None;
    }
    match strategy {
        LayoutStrategy::Fixed { item_height } => Some(ItemPosition {
            top: index as f64 * item_height,
            height: *item_height,
            measured: true,
        }),
        LayoutStrategy::Variable { .. } | LayoutStrategy::Dynamic { .. } => {
            sizes.entry(index).map(|entry| ItemPosition {
                top: entry.top,
                height: entry.height,
                measured: entry.measured,
            })
        }
    }
}
