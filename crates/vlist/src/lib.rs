#![forbid(unsafe_code)]

//! Virtualization engine for long scrollable lists.
//!
//! Given a dataset length, a viewport height and a scroll offset, decide which
//! items must exist and where they sit. Only those items are instantiated;
//! a content area sized to the whole list keeps the scrollbar honest.
//!
//! Three [`LayoutStrategy`] variants cover how heights are known:
//! fixed, per-index, or measured after render.
//!
//! ```
//! use vlist::{LayoutStrategy, VirtualList, VirtualListConfig};
//!
//! let config = VirtualListConfig::new(300.0).with_strategy(LayoutStrategy::fixed(50.0)?);
//! let mut list = VirtualList::new(config)?;
//! list.handle().scroll_to(1000.0);
//!
//! let items: Vec<u32> = (0..1000).collect();
//! let out = list.render(&items, |item, _, pos| format!("{item} @ {}", pos.top));
//! assert_eq!(out.range.start_index(), 20);
//! assert_eq!(out.nodes.first().map(String::as_str), Some("15 @ 750"));
//! # Ok::<(), vlist::Error>(())
//! ```
//!
//! # Features
//!
//! - `tracing`: emit spans for layout passes and debug events for cache
//!   invalidation.

pub mod config;
pub mod error;
pub mod extent;
pub mod fenwick;
pub mod position;
pub mod range;
pub mod scroll;
pub mod size_cache;
pub mod strategy;
pub mod virtual_list;

pub use config::{DEFAULT_OVERSCAN, VirtualListConfig};
pub use error::{Error, Result};
pub use extent::{max_scroll_offset, total_extent};
pub use fenwick::FenwickTree;
pub use position::{ItemPosition, position_of};
pub use range::{VisibleRange, compute_range};
pub use scroll::{ScrollController, ScrollHandle};
pub use size_cache::{SizeCache, SizeCacheStats, SizeEntry, SyncOutcome};
pub use strategy::{DEFAULT_ESTIMATED_ITEM_HEIGHT, HeightFn, LayoutStrategy, StrategyKind};
pub use virtual_list::{Dirty, RenderedList, ScrollAlign, VirtualList};
