#![forbid(unsafe_code)]

//! Fenwick tree (Binary Indexed Tree) over item extents.
//!
//! Backs the prefix-sum side of the size cache: entry `i` holds the height of
//! item `i`, so `offset_of(i)` is the top of item `i` and `total()` is the
//! content extent.
//!
//! # Layout
//!
//! The tree is stored 1-indexed in a contiguous `Vec<f64>` of length `n + 1`
//! (index 0 unused). A parallel `values` vector keeps the raw per-item extents
//! so point reads are exact and `set` never has to reconstruct the old value
//! from two prefix queries.
//!
//! # Operations
//!
//! | Operation | Time | Allocations |
//! |-----------|------|-------------|
//! | `from_values(v)` | O(n) | 2 Vec |
//! | `set(i, value)` | O(log n) | 0 |
//! | `get(i)` | O(1) | 0 |
//! | `prefix(i)` | O(log n) | 0 |
//! | `offset_of(i)` | O(log n) | 0 |
//! | `count_at_or_below(target)` | O(log n) | 0 |
//! | `count_below(target)` | O(log n) | 0 |
//! | `rebuild(values)` | O(n) | 0 |
//! | `resize(n)` | O(n) | amortised |
//!
//! # Invariants
//!
//! 1. `tree[i]` stores the sum of values in the range determined by `lowbit(i)`.
//! 2. `prefix(n - 1) == total()`.
//! 3. Every stored value is finite and non-negative, so prefix sums are
//!    monotonically non-decreasing and the descent searches are valid.

/// Prefix-sum tree over non-negative `f64` extents.
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    /// 1-indexed tree storage. `tree[0]` is unused.
    tree: Vec<f64>,
    /// Raw values, 0-indexed.
    values: Vec<f64>,
}

impl FenwickTree {
    /// Create a tree of `n` zero extents.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            tree: vec![0.0; n + 1],
            values: vec![0.0; n],
        }
    }

    /// Create a tree from an initial array of extents in O(n).
    ///
    /// Negative and non-finite inputs are stored as zero.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut ft = Self::new(values.len());
        ft.rebuild(values);
        ft
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tree is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Extent stored at position `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Set the extent at position `i`. O(log n).
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn set(&mut self, i: usize, value: f64) {
        let n = self.len();
        assert!(i < n, "index {i} out of bounds (n={n})");
        let value = sanitize(value);
        let delta = value - self.values[i];
        if delta == 0.0 {
            return;
        }
        self.values[i] = value;
        let mut idx = i + 1;
        while idx <= n {
            self.tree[idx] += delta;
            idx += lowbit(idx);
        }
    }

    /// Sum of extents `[0..=i]`. O(log n).
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn prefix(&self, i: usize) -> f64 {
        let n = self.len();
        assert!(i < n, "index {i} out of bounds (n={n})");
        let mut sum = 0.0;
        let mut idx = i + 1;
        while idx > 0 {
            sum += self.tree[idx];
            idx -= lowbit(idx);
        }
        sum
    }

    /// Start offset of item `i`, i.e. the sum of extents `[0..i)`.
    ///
    /// `offset_of(len())` equals `total()`.
    ///
    /// # Panics
    /// Panics if `i > len()`.
    #[must_use]
    pub fn offset_of(&self, i: usize) -> f64 {
        if i == 0 {
            0.0
        } else {
            self.prefix(i - 1)
        }
    }

    /// Total of all extents. O(log n).
    #[must_use]
    pub fn total(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            n => self.prefix(n - 1),
        }
    }

    /// Number of items whose end offset is `<= target`.
    ///
    /// Equivalently, the index of the first item that ends after `target`.
    #[must_use]
    pub fn count_at_or_below(&self, target: f64) -> usize {
        self.descend(|node, remaining| node <= remaining, target)
    }

    /// Number of items whose end offset is `< target`.
    #[must_use]
    pub fn count_below(&self, target: f64) -> usize {
        self.descend(|node, remaining| node < remaining, target)
    }

    fn descend(&self, take: impl Fn(f64, f64) -> bool, target: f64) -> usize {
        let n = self.len();
        let mut pos = 0usize;
        let mut remaining = target;
        let mut bit_mask = most_significant_bit(n);
        while bit_mask > 0 {
            let next = pos + bit_mask;
            if next <= n && take(self.tree[next], remaining) {
                remaining -= self.tree[next];
                pos = next;
            }
            bit_mask >>= 1;
        }
        // The descent subtracts node sums while `prefix` adds them; with
        // fractional extents the two can round apart by an ulp. The result
        // must agree with `prefix`.
        while pos < n && take(self.prefix(pos), target) {
            pos += 1;
        }
        while pos > 0 && !take(self.prefix(pos - 1), target) {
            pos -= 1;
        }
        pos
    }

    /// Rebuild the tree from a fresh array of extents in O(n).
    ///
    /// # Panics
    /// Panics if `values.len() != len()`.
    pub fn rebuild(&mut self, values: &[f64]) {
        let n = self.len();
        assert_eq!(values.len(), n, "rebuild size mismatch");
        self.tree.fill(0.0);
        for (i, &v) in values.iter().enumerate() {
            let v = sanitize(v);
            self.values[i] = v;
            self.tree[i + 1] = v;
        }
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                self.tree[parent] += self.tree[i];
            }
        }
    }

    /// Resize the tree. Existing extents are kept; new slots start at zero.
    pub fn resize(&mut self, new_n: usize) {
        if new_n == self.len() {
            return;
        }
        let mut values = std::mem::take(&mut self.values);
        values.resize(new_n, 0.0);
        self.values = vec![0.0; new_n];
        self.tree = vec![0.0; new_n + 1];
        self.rebuild(&values);
    }
}

/// Clamp an extent into the tree's domain.
#[inline]
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Lowest set bit of `x`. E.g., `lowbit(6) = 2`, `lowbit(4) = 4`.
#[inline]
fn lowbit(x: usize) -> usize {
    x & x.wrapping_neg()
}

/// Most significant bit that fits within `n`.
#[inline]
fn most_significant_bit(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    1 << (usize::BITS - 1 - n.leading_zeros())
}
