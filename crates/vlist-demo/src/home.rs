#![forbid(unsafe_code)]

//! The home page: three lists over one dataset and a scroll-to action.
//!
//! The action is wired to the fixed list through a [`ScrollHandle`] created
//! before that list is mounted. Frames are plain text.

use std::fmt;

use vlist::{
    ItemPosition, LayoutStrategy, ScrollHandle, StrategyKind, VirtualList, VirtualListConfig,
    VisibleRange,
};

use crate::cli::Opts;

/// Render/measure rounds per frame for dynamic lists.
const MAX_MEASURE_PASSES: usize = 3;

/// Height a dynamic row turns out to have once laid out.
fn measured_row_height(data: u32) -> f64 {
    30.0 + f64::from(data % 4) * 15.0
}

fn variable_row_height(index: usize) -> f64 {
    50.0 + (index % 3) as f64 * 25.0
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub label: String,
    pub position: ItemPosition,
    pub visible: bool,
}

/// Text snapshot of one list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFrame {
    pub title: String,
    pub range: VisibleRange,
    pub scroll_offset: f64,
    pub max_offset: f64,
    pub content_extent: f64,
    pub rows: Vec<Row>,
}

impl fmt::Display for ListFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if self.range.is_empty() {
            return writeln!(f, "(empty)");
        }
        writeln!(
            f,
            "offset {:.0}/{:.0}  extent {:.0}  visible {}..={}  rendered {}..={}",
            self.scroll_offset,
            self.max_offset,
            self.content_extent,
            self.range.start_index(),
            self.range.end_index(),
            self.range.overscan_start_index(),
            self.range.overscan_end_index(),
        )?;
        for row in &self.rows {
            let marker = if row.visible { '>' } else { ' ' };
            let estimate = if row.position.measured { "" } else { " ~" };
            writeln!(
                f,
                "{marker} {:>8.0} {:>4.0}  {}{estimate}",
                row.position.top, row.position.height, row.label
            )?;
        }
        Ok(())
    }
}

struct DemoList {
    title: String,
    list: VirtualList,
    measured: bool,
}

impl DemoList {
    fn frame(&mut self, items: &[u32]) -> ListFrame {
        let mut out = self.render(items);
        if self.measured {
            for _ in 1..MAX_MEASURE_PASSES {
                for row in &out.rows {
                    if let Some(&data) = items.get(row.index) {
                        self.list.measure(row.index, measured_row_height(data));
                    }
                }
                if !self.list.needs_layout() {
                    break;
                }
                out = self.render(items);
            }
        }
        out
    }

    fn render(&mut self, items: &[u32]) -> ListFrame {
        let rendered = self.list.render(items, |data, index, position| Row {
            index,
            label: format!("{data}-{index}"),
            position,
            visible: false,
        });
        let mut rows = rendered.nodes;
        for row in &mut rows {
            row.visible = rendered.range.is_visible(row.index);
        }
        ListFrame {
            title: self.title.clone(),
            range: rendered.range,
            scroll_offset: rendered.scroll_offset,
            max_offset: self.list.max_scroll_offset(),
            content_extent: rendered.content_extent,
            rows,
        }
    }
}

/// Page state across frames.
pub struct HomePage {
    items: Vec<u32>,
    lists: Vec<DemoList>,
    action: ScrollHandle,
}

impl HomePage {
    /// Mount the lists selected by `opts`.
    pub fn new(opts: &Opts) -> vlist::Result<Self> {
        let items: Vec<u32> = (0..opts.items)
            .map(|i| u32::try_from(i).unwrap_or(u32::MAX))
            .collect();
        let action = ScrollHandle::new();
        let base = VirtualListConfig::new(opts.container_height).with_overscan(opts.overscan);

        let mut lists = Vec::new();
        for kind in [
            StrategyKind::Fixed,
            StrategyKind::Variable,
            StrategyKind::Dynamic,
        ] {
            if opts.only.is_some_and(|only| only != kind) {
                continue;
            }
            let (title, strategy) = match kind {
                StrategyKind::Fixed => ("fixed, 50 per row", LayoutStrategy::fixed(50.0)?),
                StrategyKind::Variable => (
                    "variable, 50/75/100",
                    LayoutStrategy::variable(variable_row_height),
                ),
                StrategyKind::Dynamic => ("dynamic, measured", LayoutStrategy::dynamic()),
            };
            let config = base.clone().with_strategy(strategy);
            let list = if kind == StrategyKind::Fixed {
                VirtualList::with_scroll_handle(config, action.clone())?
            } else {
                VirtualList::new(config)?
            };
            lists.push(DemoList {
                title: title.to_string(),
                list,
                measured: kind == StrategyKind::Dynamic,
            });
        }

        tracing::info!(lists = lists.len(), items = items.len(), "home page mounted");
        Ok(Self {
            items,
            lists,
            action,
        })
    }

    /// Handle behind the scroll-to action.
    #[must_use]
    pub fn action_handle(&self) -> ScrollHandle {
        self.action.clone()
    }

    /// Press the scroll-to action.
    pub fn scroll_to(&self, offset: f64) {
        tracing::info!(offset, "scroll-to action");
        self.action.scroll_to(offset);
    }

    /// Run a pass on every list and snapshot them.
    pub fn frame(&mut self) -> Vec<ListFrame> {
        let items = &self.items;
        self.lists.iter_mut().map(|list| list.frame(items)).collect()
    }
}
