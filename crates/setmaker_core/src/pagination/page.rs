//! Page envelope and page-size normalization.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a listing, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of items in this page.
    pub count: u32,
    /// Opaque cursor for the next page; empty when the listing is exhausted.
    pub cursor: String,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.cursor.is_empty()
    }
}

/// Page-size bounds applied to caller requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl PageLimits {
    /// Builds limits, clamping `default_size` into `1..=max_size`.
    pub fn new(default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }

    /// `0` selects the default; anything above the maximum is clamped.
    pub fn normalize(&self, requested: u32) -> u32 {
        match requested {
            0 => self.default_size,
            value if value > self.max_size => self.max_size,
            value => value,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn normalize_applies_default_and_maximum() {
        let limits = PageLimits::default();
        assert_eq!(limits.normalize(0), DEFAULT_PAGE_SIZE);
        assert_eq!(limits.normalize(2), 2);
        assert_eq!(limits.normalize(MAX_PAGE_SIZE + 1), MAX_PAGE_SIZE);
    }

    #[test]
    fn new_keeps_default_within_maximum() {
        let limits = PageLimits::new(50, 10);
        assert_eq!(limits.default_size, 10);
        assert_eq!(PageLimits::new(0, 0).max_size, 1);
    }
}
