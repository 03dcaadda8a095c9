#![forbid(unsafe_code)]

//! The list component: scroll state, size cache, and the layout pass.
//!
//! A [`VirtualList`] is one mounted list. It owns the scroll controller and
//! the size cache; the dataset is borrowed for each pass.
//!
//! # Pass
//!
//! [`VirtualList::render`] (or [`VirtualList::layout`] for hosts that only
//! need indices) runs one synchronous pass:
//!
//! 1. sync the size cache with the strategy and item count;
//! 2. recompute the content extent;
//! 3. commit any pending scroll request, clamped to the new max offset;
//! 4. compute the visible and over-scanned range;
//! 5. call `render_item` for every index in the over-scanned range.
//!
//! Under [`LayoutStrategy::Dynamic`] the host measures the rendered items and
//! reports heights with [`VirtualList::measure`]; the next pass uses them.
//!
//! # Dataset identity
//!
//! `render` remembers which slice it was given (address and length). A
//! different slice is a new dataset and drops every cached size, so
//! measurements never carry over to unrelated items. Hosts that grow or
//! shrink the same dataset use [`VirtualList::render_appended`] to keep the
//! cached prefix. `layout` only sees a count and treats a change as
//! append/truncate. Contents replaced in place need
//! [`VirtualList::invalidate_sizes`].

use bitflags::bitflags;

use crate::config::{VirtualListConfig, validate_container_height};
use crate::error::Result;
use crate::extent::{max_scroll_offset, total_extent};
use crate::position::{ItemPosition, position_of};
use crate::range::{VisibleRange, compute_range};
use crate::scroll::{ScrollController, ScrollHandle};
use crate::size_cache::{SizeCache, SyncOutcome};
use crate::strategy::LayoutStrategy;

bitflags! {
    /// Inputs changed since the last pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        /// Item count changed or the dataset was swapped.
        const DATASET = 1 << 0;
        /// Layout strategy replaced.
        const STRATEGY = 1 << 1;
        /// Container height or overscan changed.
        const VIEWPORT = 1 << 2;
        /// Scroll offset changed.
        const SCROLL = 1 << 3;
        /// Dynamic measurements arrived.
        const SIZES = 1 << 4;
    }
}

/// Where an item should land when scrolling to it by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Item top at the viewport top.
    #[default]
    Start,
    /// Item centered in the viewport.
    Center,
    /// Item bottom at the viewport bottom.
    End,
    /// Scroll as little as possible to make the item fully visible.
    Nearest,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedList<R> {
    /// Rendered nodes, in index order, one per over-scanned index.
    pub nodes: Vec<R>,
    /// Range used for this pass.
    pub range: VisibleRange,
    /// Height of the content area the nodes are positioned in.
    pub content_extent: f64,
    /// Scroll offset the range was computed for.
    pub scroll_offset: f64,
}

/// A virtualized list instance.
#[derive(Debug)]
pub struct VirtualList {
    config: VirtualListConfig,
    sizes: SizeCache,
    scroll: ScrollController,
    /// Item count of the last pass.
    item_count: usize,
    /// Range of the last pass.
    range: VisibleRange,
    /// Content extent of the last pass.
    content_extent: f64,
    /// Address and length of the slice given to the last `render`.
    dataset: Option<(usize, usize)>,
    dirty: Dirty,
}

impl VirtualList {
    /// Mount a list with a fresh scroll handle.
    pub fn new(config: VirtualListConfig) -> Result<Self> {
        Self::with_scroll_handle(config, ScrollHandle::new())
    }

    /// Mount a list driven by a handle the host created earlier.
    pub fn with_scroll_handle(config: VirtualListConfig, handle: ScrollHandle) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sizes: SizeCache::new(),
            scroll: ScrollController::with_handle(handle),
            item_count: 0,
            range: VisibleRange::EMPTY,
            content_extent: 0.0,
            dataset: None,
            dirty: Dirty::all(),
        })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &VirtualListConfig {
        &self.config
    }

    /// Current layout strategy.
    #[must_use]
    pub fn strategy(&self) -> &LayoutStrategy {
        &self.config.strategy
    }

    /// Handle for programmatic scrolling.
    #[must_use]
    pub fn handle(&self) -> ScrollHandle {
        self.scroll.handle()
    }

    /// Replace the layout strategy.
    ///
    /// A different strategy drops the whole size cache on the next pass; the
    /// scroll offset is kept and re-clamped.
    pub fn set_strategy(&mut self, strategy: LayoutStrategy) -> Result<()> {
        strategy.validate()?;
        if strategy != self.config.strategy {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                from = self.config.strategy.kind().as_str(),
                to = strategy.kind().as_str(),
                "layout strategy replaced"
            );
            self.config.strategy = strategy;
            self.dirty |= Dirty::STRATEGY;
        }
        Ok(())
    }

    /// Resize the container.
    pub fn set_container_height(&mut self, height: f64) -> Result<()> {
        validate_container_height(height)?;
        if height != self.config.container_height {
            self.config.container_height = height;
            self.dirty |= Dirty::VIEWPORT;
        }
        Ok(())
    }

    /// Change the overscan count.
    pub fn set_overscan(&mut self, overscan: usize) {
        if overscan != self.config.overscan {
            self.config.overscan = overscan;
            self.dirty |= Dirty::VIEWPORT;
        }
    }

    /// Drop every cached size.
    ///
    /// Call when the dataset is replaced by a different one, even if the
    /// length is unchanged.
    pub fn invalidate_sizes(&mut self) {
        self.sizes.invalidate_all();
        self.dirty |= Dirty::DATASET;
    }

    /// Report the measured height of a rendered dynamic item.
    ///
    /// Returns `true` if the layout changed. Ignored for indices outside the
    /// dataset of the last pass and for non-dynamic strategies.
    pub fn measure(&mut self, index: usize, height: f64) -> bool {
        self.sync_sizes();
        let changed = self.sizes.measure(index, height);
        if changed {
            self.dirty |= Dirty::SIZES;
        }
        changed
    }

    /// Inputs changed since the last pass, including a pending scroll request.
    #[must_use]
    pub fn dirty(&self) -> Dirty {
        let mut dirty = self.dirty;
        if self.scroll.handle().pending().is_some() {
            dirty |= Dirty::SCROLL;
        }
        dirty
    }

    /// Whether the next pass would differ from the last one.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        !self.dirty().is_empty()
    }

    /// Run a layout pass for `item_count` items without rendering.
    ///
    /// A count change keeps the sizes of the surviving prefix.
    pub fn layout(&mut self, item_count: usize) -> VisibleRange {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "VirtualList",
            strategy = self.config.strategy.kind().as_str(),
            items = item_count,
            h = self.config.container_height
        )
        .entered();

        if item_count != self.item_count {
            self.dirty |= Dirty::DATASET;
        }
        self.item_count = item_count;
        if self.sync_sizes() == SyncOutcome::Rebuilt {
            self.dirty |= Dirty::SIZES;
        }

        self.content_extent = total_extent(&self.config.strategy, &self.sizes, item_count);
        let max_offset = max_scroll_offset(self.content_extent, self.config.container_height);
        if self.scroll.settle(max_offset) {
            self.dirty |= Dirty::SCROLL;
        }

        self.range = compute_range(
            self.scroll.offset(),
            self.config.container_height,
            &self.config.strategy,
            &self.sizes,
            item_count,
            self.config.overscan,
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dirty = ?self.dirty,
            offset = self.scroll.offset(),
            extent = self.content_extent,
            start = self.range.start_index(),
            end = self.range.end_index(),
            overscan_start = self.range.overscan_start_index(),
            overscan_end = self.range.overscan_end_index(),
            "layout pass"
        );

        self.dirty = Dirty::empty();
        self.range.clone()
    }

    /// Run a layout pass over `items` and render the over-scanned range.
    ///
    /// `render_item` receives the item, its index, and its absolute position
    /// within the content area. If `items` is not the slice of the previous
    /// render, every cached size is dropped first.
    pub fn render<T, R>(
        &mut self,
        items: &[T],
        render_item: impl FnMut(&T, usize, ItemPosition) -> R,
    ) -> RenderedList<R> {
        let key = dataset_key(items);
        if self.dataset.is_some_and(|previous| previous != key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(items = items.len(), "dataset swapped");
            self.invalidate_sizes();
        }
        self.dataset = Some(key);
        self.render_pass(items, render_item)
    }

    /// Like [`render`](Self::render), but `items` continues the previous
    /// dataset: the first `min(old, new)` items are the same, so their cached
    /// sizes are kept.
    pub fn render_appended<T, R>(
        &mut self,
        items: &[T],
        render_item: impl FnMut(&T, usize, ItemPosition) -> R,
    ) -> RenderedList<R> {
        self.dataset = Some(dataset_key(items));
        self.render_pass(items, render_item)
    }

    fn render_pass<T, R>(
        &mut self,
        items: &[T],
        mut render_item: impl FnMut(&T, usize, ItemPosition) -> R,
    ) -> RenderedList<R> {
        let range = self.layout(items.len());
        let mut nodes = Vec::with_capacity(range.render_len());
        for index in range.render_range() {
            let (Some(item), Some(position)) = (items.get(index), self.position_of(index)) else {
                continue;
            };
            nodes.push(render_item(item, index, position));
        }
        RenderedList {
            nodes,
            range,
            content_extent: self.content_extent,
            scroll_offset: self.scroll.offset(),
        }
    }

    fn sync_sizes(&mut self) -> SyncOutcome {
        self.sizes.sync(&self.config.strategy, self.item_count)
    }

    /// Position of `index` under the last pass's dataset.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<ItemPosition> {
        position_of(index, &self.config.strategy, &self.sizes, self.item_count)
    }

    /// Range of the last pass.
    #[must_use]
    pub fn visible_range(&self) -> &VisibleRange {
        &self.range
    }

    /// Content extent of the last pass.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Item count of the last pass.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Committed scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// Largest scroll offset for the last pass's content.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        max_scroll_offset(self.content_extent, self.config.container_height)
    }

    /// The size cache, for inspection.
    #[must_use]
    pub fn size_cache(&self) -> &SizeCache {
        &self.sizes
    }

    /// A scroll event from the container (user gesture).
    pub fn on_scroll(&mut self, offset: f64) {
        self.scroll.handle().scroll_to(offset);
    }

    /// Request a scroll to `offset`; observed by the next pass.
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll.handle().scroll_to(offset);
    }

    /// Request a scroll by `delta` (positive = down).
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll.handle().scroll_by(delta);
    }

    /// Request a scroll that brings `index` to the viewport top.
    ///
    /// Returns `false` if `index` is outside the dataset of the last pass.
    pub fn scroll_to_index(&mut self, index: usize) -> bool {
        self.scroll_to_index_aligned(index, ScrollAlign::Start)
    }

    /// Request a scroll that brings `index` into view with `align`.
    pub fn scroll_to_index_aligned(&mut self, index: usize, align: ScrollAlign) -> bool {
        self.sync_sizes();
        let Some(position) = self.position_of(index) else {
            return false;
        };
        let viewport = self.config.container_height;
        let current = self.scroll.handle().target();
        let offset = match align {
            ScrollAlign::Start => position.top,
            ScrollAlign::Center => position.top - (viewport - position.height) / 2.0,
            ScrollAlign::End => position.bottom() - viewport,
            ScrollAlign::Nearest => {
                if position.top < current {
                    position.top
                } else if position.bottom() > current + viewport {
                    position.bottom() - viewport
                } else {
                    current
                }
            }
        };
        self.scroll.handle().scroll_to(offset);
        true
    }

    /// Request a scroll to the top.
    pub fn scroll_to_top(&mut self) {
        self.scroll_to(0.0);
    }

    /// Request a scroll to the bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.sync_sizes();
        let extent = total_extent(&self.config.strategy, &self.sizes, self.item_count);
        self.scroll_to(max_scroll_offset(extent, self.config.container_height));
    }

    /// Scroll up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_by(-self.config.container_height);
    }

    /// Scroll down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_by(self.config.container_height);
    }

    /// Whether the last pass was scrolled to the end of the content.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.scroll.offset() >= self.max_scroll_offset()
    }
}

fn dataset_key<T>(items: &[T]) -> (usize, usize) {
    (items.as_ptr().addr(), items.len())
}
