#![forbid(unsafe_code)]

//! Size cache for variable and dynamic layouts.
//!
//! [`SizeCache`] answers `{height, top}` for every index of the current
//! dataset. Heights live in a [`FenwickTree`], so a top offset is a prefix
//! query and the reverse lookup (offset to index) is a tree descent.
//!
//! # Invalidation
//!
//! The cache remembers the strategy and item count it was built for.
//! [`SizeCache::sync`] compares them with the current ones:
//!
//! - strategy changed (or [`SizeCache::invalidate_all`] was called): every
//!   entry is dropped and the generation is bumped;
//! - same strategy, more items: only the new suffix is computed;
//! - same strategy, fewer items: the suffix is dropped.
//!
//! Under [`LayoutStrategy::Fixed`] the cache holds nothing; fixed layouts are
//! answered arithmetically.

use crate::fenwick::FenwickTree;
use crate::strategy::LayoutStrategy;

/// Cached layout of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeEntry {
    /// Height of the item.
    pub height: f64,
    /// Offset of the item's top edge from the start of the content.
    pub top: f64,
    /// `false` while a dynamic item still uses the estimated height.
    pub measured: bool,
}

/// What [`SizeCache::sync`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Cache already matched the strategy and item count.
    Unchanged,
    /// Item count changed; only the affected suffix was touched.
    Resized {
        /// Item count before the sync.
        from: usize,
        /// Item count after the sync.
        to: usize,
    },
    /// Everything was dropped and recomputed.
    Rebuilt,
}

/// Statistics about the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeCacheStats {
    /// Number of indices covered.
    pub entries: usize,
    /// Number of dynamic items with a reported measurement.
    pub measured: usize,
    /// Bumped on every wholesale invalidation.
    pub generation: u64,
    /// Number of full rebuilds since creation.
    pub rebuilds: u64,
}

/// Per-index heights and prefix offsets for one list instance.
#[derive(Debug, Clone, Default)]
pub struct SizeCache {
    heights: FenwickTree,
    /// Measurement flags, parallel to `heights` under `Dynamic`.
    measured: Vec<bool>,
    measured_count: usize,
    /// Sum of reported measurements.
    measured_extent: f64,
    /// Item count of the last sync.
    item_count: usize,
    /// Strategy the cache was built for; `None` until the first sync or after
    /// an invalidation.
    built_for: Option<LayoutStrategy>,
    generation: u64,
    rebuilds: u64,
}

impl SizeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cache in line with `strategy` and `item_count`.
    pub fn sync(&mut self, strategy: &LayoutStrategy, item_count: usize) -> SyncOutcome {
        let same_strategy = self.built_for.as_ref() == Some(strategy);
        if !same_strategy {
            self.rebuild(strategy, item_count);
            return SyncOutcome::Rebuilt;
        }

        let from = self.item_count;
        if from == item_count {
            return SyncOutcome::Unchanged;
        }
        self.item_count = item_count;

        match strategy {
            LayoutStrategy::Fixed { .. } => {}
            LayoutStrategy::Variable { item_height } => {
                self.heights.resize(item_count);
                for index in from..item_count {
                    self.heights.set(index, checked_height(index, item_height(index)));
                }
            }
            LayoutStrategy::Dynamic {
                estimated_item_height,
            } => {
                if item_count < from {
                    for index in item_count..from {
                        if self.measured[index] {
                            self.measured_count -= 1;
                            self.measured_extent -= self.heights.get(index);
                        }
                    }
                }
                self.heights.resize(item_count);
                self.measured.resize(item_count, false);
                for index in from..item_count {
                    self.heights.set(index, *estimated_item_height);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(from, to = item_count, "size cache resized");

        SyncOutcome::Resized {
            from,
            to: item_count,
        }
    }

    fn rebuild(&mut self, strategy: &LayoutStrategy, item_count: usize) {
        self.clear_entries();
        self.generation = self.generation.wrapping_add(1);
        self.rebuilds += 1;

        match strategy {
            LayoutStrategy::Fixed { .. } => {}
            LayoutStrategy::Variable { item_height } => {
                let values: Vec<f64> = (0..item_count)
                    .map(|index| checked_height(index, item_height(index)))
                    .collect();
                self.heights = FenwickTree::from_values(&values);
            }
            LayoutStrategy::Dynamic {
                estimated_item_height,
            } => {
                self.heights = FenwickTree::from_values(&vec![*estimated_item_height; item_count]);
                self.measured = vec![false; item_count];
            }
        }
        self.item_count = item_count;
        self.built_for = Some(strategy.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            strategy = strategy.kind().as_str(),
            items = item_count,
            generation = self.generation,
            "size cache rebuilt"
        );
    }

    fn clear_entries(&mut self) {
        self.heights = FenwickTree::new(0);
        self.measured.clear();
        self.measured_count = 0;
        self.measured_extent = 0.0;
        self.item_count = 0;
    }

    /// Drop every entry. The next [`sync`](Self::sync) rebuilds from scratch.
    ///
    /// Call this when the dataset is swapped for another one of the same
    /// length; a length change alone is handled by `sync`.
    pub fn invalidate_all(&mut self) {
        self.clear_entries();
        self.built_for = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Record the measured height of a dynamic item.
    ///
    /// Returns `true` if the stored height changed. Measurements for indices
    /// outside the current dataset, or under a non-dynamic strategy, are
    /// ignored.
    pub fn measure(&mut self, index: usize, height: f64) -> bool {
        if !matches!(self.built_for, Some(LayoutStrategy::Dynamic { .. })) || index >= self.len()
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, height, "measurement ignored");
            return false;
        }
        let height = checked_height(index, height);
        let previous = self.heights.get(index);
        if self.measured[index] {
            self.measured_extent -= previous;
        } else {
            self.measured[index] = true;
            self.measured_count += 1;
        }
        self.measured_extent += height;
        self.heights.set(index, height);
        previous != height
    }

    /// Whether the dynamic item at `index` has been measured.
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Number of indices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the cache covers no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// `{height, top}` for `index`, or `None` outside the cached range.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<SizeEntry> {
        if index >= self.len() {
            return None;
        }
        Some(SizeEntry {
            height: self.heights.get(index),
            top: self.heights.offset_of(index),
            measured: match self.built_for {
                Some(LayoutStrategy::Dynamic { .. }) => self.measured[index],
                _ => true,
            },
        })
    }

    /// Sum of all cached heights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.heights.total()
    }

    /// Sum of reported measurements only.
    #[must_use]
    pub fn measured_extent(&self) -> f64 {
        self.measured_extent
    }

    /// Number of items that end at or before `offset`: the index of the item
    /// containing `offset`.
    #[must_use]
    pub fn index_at_offset(&self, offset: f64) -> usize {
        self.heights.count_at_or_below(offset)
    }

    /// Number of items that end strictly before `offset`: the index of the
    /// last item whose top lies before `offset`.
    #[must_use]
    pub fn last_index_before(&self, offset: f64) -> usize {
        self.heights.count_below(offset)
    }

    /// Current generation; bumped on every wholesale invalidation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> SizeCacheStats {
        SizeCacheStats {
            entries: self.len(),
            measured: self.measured_count,
            generation: self.generation,
            rebuilds: self.rebuilds,
        }
    }
}

/// Clamp a reported height to a usable value, logging when it had to.
fn checked_height(index: usize, height: f64) -> f64 {
    if height.is_finite() && height >= 0.0 {
        return height;
    }
    #[cfg(feature = "tracing")]
    tracing::warn!(index, height, "invalid item height clamped to 0");
    #[cfg(not(feature = "tracing"))]
    let _ = index;
    0.0
}
