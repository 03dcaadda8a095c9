#![forbid(unsafe_code)]

//! List configuration.

use crate::error::{Error, Result};
use crate::strategy::LayoutStrategy;

/// Items rendered beyond each edge of the viewport unless configured otherwise.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Construction-time configuration for a [`VirtualList`](crate::VirtualList).
///
/// ```
/// use vlist::{LayoutStrategy, VirtualListConfig};
///
/// let config = VirtualListConfig::new(300.0)
///     .with_overscan(3)
///     .with_strategy(LayoutStrategy::fixed(50.0)?);
/// assert!(config.validate().is_ok());
/// # Ok::<(), vlist::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualListConfig {
    /// Height of the scroll container (the viewport extent).
    pub container_height: f64,
    /// Extra items rendered above and below the visible range.
    pub overscan: usize,
    /// How item heights are known.
    pub strategy: LayoutStrategy,
}

impl Default for VirtualListConfig {
    fn default() -> Self {
        Self {
            container_height: 0.0,
            overscan: DEFAULT_OVERSCAN,
            strategy: LayoutStrategy::default(),
        }
    }
}

impl VirtualListConfig {
    /// Configuration for a container of the given height, with default
    /// overscan and a dynamic strategy.
    #[must_use]
    pub fn new(container_height: f64) -> Self {
        Self {
            container_height,
            ..Self::default()
        }
    }

    /// Set the container height.
    #[must_use]
    pub fn with_container_height(mut self, container_height: f64) -> Self {
        self.container_height = container_height;
        self
    }

    /// Set the overscan count.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the layout strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        validate_container_height(self.container_height)?;
        self.strategy.validate()
    }
}

pub(crate) fn validate_container_height(height: f64) -> Result<()> {
    if height.is_finite() && height >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidContainerHeight(height))
    }
}
