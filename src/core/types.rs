use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Device-pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn contains_x(self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Drawing area of the main plot.
///
/// Points are laid out between `padding_horizontal` and
/// `viewport.width - padding_horizontal`; values map between the baseline
/// (`viewport.height - bottom_padding`, domain minimum) and `top_padding`
/// (domain maximum). Date labels live in the bottom padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub viewport: Viewport,
    pub padding_horizontal: f64,
    pub top_padding: f64,
    #[serde(default)]
    pub bottom_padding: f64,
}

impl PlotLayout {
    #[must_use]
    pub fn new(viewport: Viewport, padding_horizontal: f64, top_padding: f64) -> Self {
        Self {
            viewport,
            padding_horizontal,
            top_padding,
            bottom_padding: 0.0,
        }
    }

    #[must_use]
    pub fn with_bottom_padding(mut self, bottom_padding: f64) -> Self {
        self.bottom_padding = bottom_padding;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.padding_horizontal.is_finite() || self.padding_horizontal < 0.0 {
            return Err(ChartError::InvalidConfig(
                "plot horizontal padding must be finite and >= 0".to_owned(),
            ));
        }
        if self.drawable_width() <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "plot horizontal padding {} leaves no drawable width in a {} px viewport",
                self.padding_horizontal, self.viewport.width
            )));
        }
        if !self.top_padding.is_finite()
            || !self.bottom_padding.is_finite()
            || self.top_padding < 0.0
            || self.bottom_padding < 0.0
        {
            return Err(ChartError::InvalidConfig(
                "plot vertical paddings must be finite and >= 0".to_owned(),
            ));
        }
        if self.drawable_height() <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "plot vertical paddings leave no drawable height in a {} px viewport",
                self.viewport.height
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn drawable_width(self) -> f64 {
        self.viewport.width - 2.0 * self.padding_horizontal
    }

    #[must_use]
    pub fn drawable_height(self) -> f64 {
        self.viewport.height - self.top_padding - self.bottom_padding
    }

    #[must_use]
    pub fn left_edge(self) -> f64 {
        self.padding_horizontal
    }

    #[must_use]
    pub fn right_edge(self) -> f64 {
        self.viewport.width - self.padding_horizontal
    }

    /// Pixel row of the domain minimum.
    #[must_use]
    pub fn baseline(self) -> f64 {
        self.viewport.height - self.bottom_padding
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotLayout, Viewport};

    #[test]
    fn layout_rejects_padding_that_consumes_the_width() {
        let layout = PlotLayout::new(Viewport::new(40.0, 300.0), 20.0, 10.0);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn layout_edges_follow_padding() {
        let layout = PlotLayout::new(Viewport::new(400.0, 300.0), 16.0, 24.0).with_bottom_padding(20.0);
        layout.validate().expect("valid layout");
        assert_eq!(layout.left_edge(), 16.0);
        assert_eq!(layout.right_edge(), 384.0);
        assert_eq!(layout.drawable_width(), 368.0);
        assert_eq!(layout.drawable_height(), 256.0);
        assert_eq!(layout.baseline(), 280.0);
    }
}
