//! Virtual scroll window for board columns.
//!
//! A column is a scrollable list of fixed-height cards. Rather than building
//! every card, the renderer asks [`compute_window`] for the contiguous index
//! range that intersects the viewport, padded by `overscan` cards on each
//! side. The window is a pair of indices into the column; the column itself
//! is never copied.
//!
//! Small columns (`item_count <= threshold`) bypass virtualization and are
//! rendered in full, which keeps drag-and-drop stable on short lists.

use std::ops::Range;

use crate::model::VirtualizationConfig;

/// Inputs to [`compute_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    /// Distance scrolled from the top of the column.
    pub scroll_offset: f64,
    /// Visible height of the column.
    pub viewport_size: f64,
    pub item_count: usize,
    /// Estimated height of one card.
    pub item_size: f64,
    /// Extra cards rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Columns with at most this many cards are not virtualized.
    pub threshold: usize,
}

/// Index range to render and the total scrollable extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualWindow {
    pub first_index: usize,
    /// Inclusive. Meaningless when the window is empty.
    pub last_index: usize,
    pub total_extent: f64,
    /// True when the whole column is rendered.
    pub bypassed: bool,
    len: usize,
}

impl VirtualWindow {
    /// The window of an empty column.
    pub const EMPTY: VirtualWindow = VirtualWindow {
        first_index: 0,
        last_index: 0,
        total_extent: 0.0,
        bypassed: true,
        len: 0,
    };

    fn span(first: usize, last: usize, total_extent: f64, bypassed: bool) -> Self {
        VirtualWindow {
            first_index: first,
            last_index: last,
            total_extent,
            bypassed,
            len: last - first + 1,
        }
    }

    /// Number of cards to render.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices to render, as a half-open range.
    pub fn indices(&self) -> Range<usize> {
        self.first_index..self.first_index + self.len
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Compute the render window for one column.
///
/// `first = max(0, floor(scroll / size) - overscan)` and
/// `last = min(count - 1, ceil((scroll + viewport) / size) + overscan)`.
/// Pure: the same parameters always produce the same window.
pub fn compute_window(params: WindowParams) -> VirtualWindow {
    let count = params.item_count;
    if count == 0 {
        return VirtualWindow::EMPTY;
    }

    let size_ok = params.item_size.is_finite() && params.item_size > 0.0;
    let total_extent = if size_ok {
        count as f64 * params.item_size
    } else {
        0.0
    };

    if count <= params.threshold || !size_ok {
        return VirtualWindow::span(0, count - 1, total_extent, true);
    }

    let scroll = finite_non_negative(params.scroll_offset);
    let viewport = finite_non_negative(params.viewport_size);
    let size = params.item_size;

    // `as usize` saturates, so huge offsets clamp instead of wrapping
    let first_visible = (scroll / size).floor() as usize;
    let last_visible = ((scroll + viewport) / size).ceil() as usize;

    let last = last_visible.saturating_add(params.overscan).min(count - 1);
    let first = first_visible.saturating_sub(params.overscan).min(last);

    tracing::trace!(
        scroll,
        viewport,
        count,
        first,
        last,
        "computed virtual window"
    );
    VirtualWindow::span(first, last, total_extent, false)
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Window settings shared by every column of a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    pub threshold: usize,
    pub overscan: usize,
    pub item_size: f64,
}

impl WindowConfig {
    pub fn from_config(config: &VirtualizationConfig) -> Self {
        WindowConfig {
            threshold: config.threshold,
            overscan: config.overscan,
            item_size: config.card_height as f64,
        }
    }

    pub fn window(&self, scroll_offset: f64, viewport_size: f64, item_count: usize) -> VirtualWindow {
        compute_window(WindowParams {
            scroll_offset,
            viewport_size,
            item_count,
            item_size: self.item_size,
            overscan: self.overscan,
            threshold: self.threshold,
        })
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, viewport_size: f64, item_count: usize) -> f64 {
        (item_count as f64 * self.item_size - viewport_size).max(0.0)
    }

    pub fn clamp_scroll(&self, scroll_offset: f64, viewport_size: f64, item_count: usize) -> f64 {
        finite_non_negative(scroll_offset).min(self.max_scroll(viewport_size, item_count))
    }

    /// The scroll offset closest to `scroll_offset` that shows all of card `index`.
    pub fn scroll_to_reveal(&self, index: usize, scroll_offset: f64, viewport_size: f64) -> f64 {
        let top = index as f64 * self.item_size;
        let bottom = top + self.item_size;
        if top < scroll_offset {
            top
        } else if bottom > scroll_offset + viewport_size {
            (bottom - viewport_size).max(0.0)
        } else {
            scroll_offset
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig::from_config(&VirtualizationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;

    fn params(scroll: f64, viewport: f64, count: usize) -> WindowParams {
        WindowParams {
            scroll_offset: scroll,
            viewport_size: viewport,
            item_count: count,
            item_size: 10.0,
            overscan: 2,
            threshold: 10,
        }
    }

    #[test]
    fn empty_column() {
        let w = compute_window(params(0.0, 50.0, 0));
        assert!(w.is_empty());
        assert_eq!(w.indices(), 0..0);
        assert_eq!(w.total_extent, 0.0);
    }

    #[test]
    fn small_columns_render_everything() {
        for count in 1..=10 {
            let w = compute_window(params(40.0, 20.0, count));
            assert!(w.bypassed);
            assert_eq!((w.first_index, w.last_index), (0, count - 1));
            assert_eq!(w.len(), count);
        }
    }

    #[test]
    fn window_at_top() {
        let w = compute_window(params(0.0, 50.0, 100));
        assert_debug_snapshot!(w, @r"
        VirtualWindow {
            first_index: 0,
            last_index: 7,
            total_extent: 1000.0,
            bypassed: false,
            len: 8,
        }
        ");
    }

    #[test]
    fn window_clamped_at_bottom() {
        let w = compute_window(params(950.0, 50.0, 100));
        assert_eq!((w.first_index, w.last_index), (93, 99));
    }

    #[test]
    fn scrolled_past_the_end_still_renders_the_tail() {
        let w = compute_window(params(5000.0, 50.0, 20));
        assert_eq!(w.last_index, 19);
        assert!(w.first_index <= w.last_index);
        assert!(!w.is_empty());
    }

    #[test]
    fn negative_scroll_clamps_to_top() {
        assert_eq!(
            compute_window(params(-30.0, 50.0, 100)),
            compute_window(params(0.0, 50.0, 100))
        );
    }

    #[test]
    fn invalid_item_size_bypasses() {
        let mut p = params(0.0, 50.0, 40);
        p.item_size = 0.0;
        let w = compute_window(p);
        assert!(w.bypassed);
        assert_eq!(w.indices(), 0..40);
        p.item_size = f64::NAN;
        assert_eq!(compute_window(p).indices(), 0..40);
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let p = params(123.0, 47.0, 500);
        assert_eq!(compute_window(p), compute_window(p));
    }

    #[test]
    fn covers_viewport_plus_overscan() {
        let size = 10.0;
        let overscan = 2;
        let count = 37;
        let viewport = 45.0;
        let mut scroll = 0.0;
        while scroll <= count as f64 * size {
            let w = compute_window(params(scroll, viewport, count));
            let visible: Vec<usize> = (0..count)
                .filter(|&i| {
                    let top = i as f64 * size;
                    top < scroll + viewport && top + size > scroll
                })
                .collect();
            for &i in &visible {
                assert!(w.contains(i), "scroll {}: index {} not rendered", scroll, i);
            }
            if let (Some(&lo), Some(&hi)) = (visible.first(), visible.last()) {
                assert!(w.first_index <= lo.saturating_sub(overscan));
                assert!(w.last_index >= (hi + overscan).min(count - 1));
            }
            scroll += 3.5;
        }
    }

    #[test]
    fn fifty_cards_midpoint_window_is_bounded() {
        let config = WindowConfig {
            threshold: 10,
            overscan: 3,
            item_size: 3.0,
        };
        let viewport = 15.0; // five cards
        let mid = 25.0 * config.item_size;
        let w = config.window(mid, viewport, 50);
        assert!(w.contains(25) && w.contains(29));
        assert!(!w.bypassed);
        // visible cards, overscan on both sides, and the partially visible edge card
        assert!(w.len() <= 5 + 2 * 3 + 1, "window too large: {:?}", w);
        assert!(w.len() >= 5 + 2 * 3);
        assert_eq!(w.total_extent, 150.0);
    }

    #[test]
    fn scroll_helpers() {
        let config = WindowConfig {
            threshold: 10,
            overscan: 0,
            item_size: 3.0,
        };
        assert_eq!(config.max_scroll(12.0, 20), 48.0);
        assert_eq!(config.max_scroll(100.0, 20), 0.0);
        assert_eq!(config.clamp_scroll(99.0, 12.0, 20), 48.0);
        assert_eq!(config.clamp_scroll(-4.0, 12.0, 20), 0.0);
        // already visible
        assert_eq!(config.scroll_to_reveal(2, 0.0, 12.0), 0.0);
        // below the viewport: bottom-align
        assert_eq!(config.scroll_to_reveal(5, 0.0, 12.0), 6.0);
        // above the viewport: top-align
        assert_eq!(config.scroll_to_reveal(1, 9.0, 12.0), 3.0);
    }
}
