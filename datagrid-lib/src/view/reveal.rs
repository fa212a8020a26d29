//! Scroll proximity detection for incremental reveal.

/// Scroll metrics of the grid body, in rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// First visible content row.
    pub offset: usize,
    /// Number of rows the viewport can show.
    pub viewport: usize,
    /// Number of content rows currently realized.
    pub content: usize,
}

impl ScrollMetrics {
    pub fn new(offset: usize, viewport: usize, content: usize) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Largest valid offset for the current content.
    pub fn max_offset(&self) -> usize {
        self.content.saturating_sub(self.viewport)
    }

    /// Distance in rows between the bottom of the viewport and the end of
    /// the content.
    pub fn remaining(&self) -> usize {
        self.content
            .saturating_sub(self.offset.saturating_add(self.viewport))
    }

    /// Returns `true` when the viewport bottom is within `threshold` rows of
    /// the end of the content.
    ///
    /// Content that fits entirely in the viewport counts as scrolled to the
    /// end.
    pub fn is_near_end(&self, threshold: usize) -> bool {
        self.remaining() <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_bottom_is_near_end() {
        let metrics = ScrollMetrics::new(10, 10, 20);
        assert_eq!(metrics.remaining(), 0);
        assert!(metrics.is_near_end(0));
    }

    #[test]
    fn test_tolerance_catches_near_misses() {
        let metrics = ScrollMetrics::new(9, 10, 20);
        assert!(!metrics.is_near_end(0));
        assert!(metrics.is_near_end(1));
    }

    #[test]
    fn test_top_of_long_content_not_near_end() {
        let metrics = ScrollMetrics::new(0, 10, 100);
        assert_eq!(metrics.remaining(), 90);
        assert!(!metrics.is_near_end(1));
    }

    #[test]
    fn test_short_content_is_near_end() {
        let metrics = ScrollMetrics::new(0, 10, 4);
        assert!(metrics.is_near_end(0));
        assert_eq!(metrics.max_offset(), 0);
    }
}
