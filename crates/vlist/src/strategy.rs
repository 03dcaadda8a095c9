#![forbid(unsafe_code)]

//! Layout strategies: how item heights are known.
//!
//! The set is closed. Every consumer (range calculation, content extent,
//! positioning) matches on [`LayoutStrategy`] exhaustively, so adding a
//! variant is a compile error at each site rather than a silent fallback.
//!
//! | Strategy | Heights known | Range lookup | Extent |
//! |----------|---------------|--------------|--------|
//! | `Fixed` | uniform | O(1) arithmetic | `n * h` |
//! | `Variable` | per index, up front | O(log n) prefix search | sum of heights |
//! | `Dynamic` | after measurement | O(log n) prefix search | measured + estimated |

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Placeholder height for unmeasured items under [`LayoutStrategy::Dynamic`].
pub const DEFAULT_ESTIMATED_ITEM_HEIGHT: f64 = 50.0;

/// Per-index height function for [`LayoutStrategy::Variable`].
///
/// Must be pure: the size cache calls it once per index and keeps the result
/// until the strategy or the dataset changes.
pub type HeightFn = Rc<dyn Fn(usize) -> f64>;

/// How the heights of list items are determined.
#[derive(Clone)]
pub enum LayoutStrategy {
    /// Every item has the same height.
    Fixed {
        /// Height of one item.
        item_height: f64,
    },
    /// Heights vary but are known per index.
    Variable {
        /// Height of the item at an index.
        item_height: HeightFn,
    },
    /// Heights are unknown until the host measures rendered items.
    Dynamic {
        /// Height assumed for items that have not been measured yet.
        estimated_item_height: f64,
    },
}

impl LayoutStrategy {
    /// Uniform item height.
    pub fn fixed(item_height: f64) -> Result<Self> {
        let strategy = Self::Fixed { item_height };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Per-index item height.
    pub fn variable(item_height: impl Fn(usize) -> f64 + 'static) -> Self {
        Self::Variable {
            item_height: Rc::new(item_height),
        }
    }

    /// Measured item height, estimated with [`DEFAULT_ESTIMATED_ITEM_HEIGHT`].
    #[must_use]
    pub fn dynamic() -> Self {
        Self::Dynamic {
            estimated_item_height: DEFAULT_ESTIMATED_ITEM_HEIGHT,
        }
    }

    /// Measured item height with a custom placeholder estimate.
    pub fn dynamic_with_estimate(estimated_item_height: f64) -> Result<Self> {
        let strategy = Self::Dynamic {
            estimated_item_height,
        };
        strategy.validate()?;
        Ok(strategy)
    }

    /// The variant tag.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Fixed { .. } => StrategyKind::Fixed,
            Self::Variable { .. } => StrategyKind::Variable,
            Self::Dynamic { .. } => StrategyKind::Dynamic,
        }
    }

    /// Reject heights the engine cannot lay out.
    ///
    /// Variants are public, so a strategy built by hand is checked again when
    /// it is handed to a list.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed { item_height } => {
                if item_height.is_finite() && *item_height > 0.0 {
                    Ok(())
                } else {
                    Err(Error::InvalidItemHeight(*item_height))
                }
            }
            Self::Variable { .. } => Ok(()),
            Self::Dynamic {
                estimated_item_height,
            } => {
                if estimated_item_height.is_finite() && *estimated_item_height > 0.0 {
                    Ok(())
                } else {
                    Err(Error::InvalidEstimatedHeight(*estimated_item_height))
                }
            }
        }
    }
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::dynamic()
    }
}

impl fmt::Debug for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { item_height } => f
                .debug_struct("Fixed")
                .field("item_height", item_height)
                .finish(),
            Self::Variable { item_height } => f
                .debug_struct("Variable")
                .field("item_height", &Rc::as_ptr(item_height).cast::<()>())
                .finish(),
            Self::Dynamic {
                estimated_item_height,
            } => f
                .debug_struct("Dynamic")
                .field("estimated_item_height", estimated_item_height)
                .finish(),
        }
    }
}

/// Two `Variable` strategies are equal only if they share the same height
/// function allocation. Cloning a strategy keeps it equal to the original.
impl PartialEq for LayoutStrategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed { item_height: a }, Self::Fixed { item_height: b }) => a == b,
            (Self::Variable { item_height: a }, Self::Variable { item_height: b }) => {
                Rc::ptr_eq(a, b)
            }
            (
                Self::Dynamic {
                    estimated_item_height: a,
                },
                Self::Dynamic {
                    estimated_item_height: b,
                },
            ) => a == b,
            _ => false,
        }
    }
}

/// Tag of a [`LayoutStrategy`], parseable from host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// See [`LayoutStrategy::Fixed`].
    Fixed,
    /// See [`LayoutStrategy::Variable`].
    Variable,
    /// See [`LayoutStrategy::Dynamic`].
    Dynamic,
}

impl StrategyKind {
    /// Lowercase tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}
