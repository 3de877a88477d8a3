use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Navigator window in axis-index units, as owned by the viewport controller.
///
/// `right` is exclusive: a window over the whole axis is `[0, N]`. Consumers
/// never see this form; they get a [`VisibleRange`] via
/// [`ViewportBounds::to_visible_range`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub left: f64,
    pub right: f64,
}

impl ViewportBounds {
    #[must_use]
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    /// Checks `0 <= left <= right <= size` and the zoom floor.
    pub fn validate(self, size: usize, min_visible_items: f64) -> ChartResult<()> {
        let invalid = || ChartError::InvalidBounds {
            left: self.left,
            right: self.right,
            size,
        };
        if !self.left.is_finite() || !self.right.is_finite() {
            return Err(invalid());
        }
        if self.left < 0.0 || self.right > size as f64 || self.left > self.right {
            return Err(invalid());
        }
        if self.width() < min_visible_items {
            return Err(invalid());
        }
        Ok(())
    }

    /// The one place the exclusive endpoint becomes an inclusive last index.
    #[must_use]
    pub fn to_visible_range(self) -> VisibleRange {
        VisibleRange {
            left: self.left,
            right: self.right - 1.0,
        }
    }
}

/// Published window; `right` is the last visible index (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub left: f64,
    pub right: f64,
}

impl VisibleRange {
    #[must_use]
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Index distance between the first and last visible column.
    #[must_use]
    pub fn span(self) -> f64 {
        self.right - self.left
    }

    /// Number of visible columns, counting both ends.
    #[must_use]
    pub fn item_count(self) -> f64 {
        self.span() + 1.0
    }

    #[must_use]
    pub fn first_index(self) -> usize {
        self.left.max(0.0).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportBounds;

    #[test]
    fn publish_conversion_subtracts_one_from_right() {
        let range = ViewportBounds::new(10.0, 40.0).to_visible_range();
        assert_eq!(range.left, 10.0);
        assert_eq!(range.right, 39.0);
        assert_eq!(range.item_count(), 30.0);
    }

    #[test]
    fn validation_enforces_order_size_and_floor() {
        assert!(ViewportBounds::new(0.0, 182.5).validate(365, 6.0).is_ok());
        assert!(ViewportBounds::new(-1.0, 10.0).validate(365, 6.0).is_err());
        assert!(ViewportBounds::new(0.0, 366.0).validate(365, 6.0).is_err());
        assert!(ViewportBounds::new(10.0, 14.0).validate(365, 6.0).is_err());
        assert!(ViewportBounds::new(f64::NAN, 14.0).validate(365, 6.0).is_err());
    }
}
