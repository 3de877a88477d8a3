use crate::core::VisibleRange;

/// Half-open run of axis indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub start: usize,
    pub end: usize,
}

impl IndexWindow {
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn indices(self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Indices feeding the value domain: the visible columns plus one neighbor on
/// each side, so partially scrolled-in columns already count.
#[must_use]
pub fn domain_window(range: VisibleRange, len: usize) -> Option<IndexWindow> {
    if len == 0 || !range.left.is_finite() || !range.right.is_finite() {
        return None;
    }
    let start = (range.left.floor() - 1.0).max(0.0) as usize;
    let end = ((range.right.ceil() + 1.0).max(0.0) as usize).min(len);
    let window = IndexWindow { start, end };
    (!window.is_empty()).then_some(window)
}

/// Indices to project: the visible columns widened by `margin` on each side
/// so lines keep running into the padding while panning.
#[must_use]
pub fn projection_window(range: VisibleRange, len: usize, margin: usize) -> Option<IndexWindow> {
    if len == 0 || !range.left.is_finite() || !range.right.is_finite() {
        return None;
    }
    let start = (range.left.floor().max(0.0) as usize).saturating_sub(margin);
    let last = (range.right.ceil().max(0.0) as usize).saturating_add(margin);
    let end = last.saturating_add(1).min(len);
    let window = IndexWindow { start, end };
    (!window.is_empty()).then_some(window)
}

#[cfg(test)]
mod tests {
    use super::{IndexWindow, domain_window, projection_window};
    use crate::core::VisibleRange;

    #[test]
    fn domain_window_adds_one_neighbor_per_side() {
        let window = domain_window(VisibleRange::new(10.4, 20.2), 100).expect("window");
        assert_eq!(window, IndexWindow { start: 9, end: 22 });
    }

    #[test]
    fn domain_window_clamps_to_axis() {
        let window = domain_window(VisibleRange::new(0.0, 99.0), 100).expect("window");
        assert_eq!(window, IndexWindow { start: 0, end: 100 });
    }

    #[test]
    fn projection_window_widens_by_margin() {
        let window = projection_window(VisibleRange::new(10.0, 20.0), 100, 3).expect("window");
        assert_eq!(window, IndexWindow { start: 7, end: 24 });
        let clamped = projection_window(VisibleRange::new(1.0, 98.5), 100, 3).expect("window");
        assert_eq!(clamped, IndexWindow { start: 0, end: 100 });
    }

    #[test]
    fn non_finite_ranges_have_no_window() {
        assert!(domain_window(VisibleRange::new(f64::NAN, 3.0), 10).is_none());
        assert!(projection_window(VisibleRange::new(0.0, 3.0), 0, 1).is_none());
    }
}
