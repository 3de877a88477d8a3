mod navigator;
mod scroll_intent;

pub use navigator::{NavigationUpdate, NavigatorOverlay, ViewportController};
pub use scroll_intent::{ScrollIntent, ScrollIntentConfig, ScrollIntentFilter};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Gesture state of the navigator window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationState {
    Idle,
    MovingLeftBound,
    MovingRightBound,
    MovingSelection,
}

impl NavigationState {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

fn default_width_px() -> f64 {
    360.0
}

fn default_height_px() -> f64 {
    40.0
}

fn default_padding_horizontal_px() -> f64 {
    16.0
}

fn default_handle_width_px() -> f64 {
    10.0
}

fn default_frame_bar_px() -> f64 {
    1.5
}

fn default_px_per_inch() -> f64 {
    160.0
}

fn default_selection_drag_threshold_in() -> f64 {
    0.2
}

fn default_handle_slop_in() -> f64 {
    0.05
}

fn default_min_visible_items() -> usize {
    6
}

/// Geometry and gesture thresholds of the navigator strip.
///
/// Gesture thresholds are physical lengths in inches, converted through
/// `px_per_inch`, so they feel the same across pixel densities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default = "default_width_px")]
    pub width_px: f64,
    #[serde(default = "default_height_px")]
    pub height_px: f64,
    #[serde(default = "default_padding_horizontal_px")]
    pub padding_horizontal_px: f64,
    #[serde(default = "default_handle_width_px")]
    pub handle_width_px: f64,
    /// Thickness of the top/bottom bars framing the window.
    #[serde(default = "default_frame_bar_px")]
    pub frame_bar_px: f64,
    #[serde(default = "default_px_per_inch")]
    pub px_per_inch: f64,
    /// Handles closer than this always start a whole-window drag.
    #[serde(default = "default_selection_drag_threshold_in")]
    pub selection_drag_threshold_in: f64,
    /// Near-misses within this distance of a handle still grab it.
    #[serde(default = "default_handle_slop_in")]
    pub handle_slop_in: f64,
    #[serde(default = "default_min_visible_items")]
    pub min_visible_items: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            width_px: default_width_px(),
            height_px: default_height_px(),
            padding_horizontal_px: default_padding_horizontal_px(),
            handle_width_px: default_handle_width_px(),
            frame_bar_px: default_frame_bar_px(),
            px_per_inch: default_px_per_inch(),
            selection_drag_threshold_in: default_selection_drag_threshold_in(),
            handle_slop_in: default_handle_slop_in(),
            min_visible_items: default_min_visible_items(),
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub fn with_width(mut self, width_px: f64) -> Self {
        self.width_px = width_px;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        let positive = [
            ("width_px", self.width_px),
            ("height_px", self.height_px),
            ("handle_width_px", self.handle_width_px),
            ("px_per_inch", self.px_per_inch),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "navigator `{name}` must be finite and > 0"
                )));
            }
        }
        let non_negative = [
            ("padding_horizontal_px", self.padding_horizontal_px),
            ("frame_bar_px", self.frame_bar_px),
            ("selection_drag_threshold_in", self.selection_drag_threshold_in),
            ("handle_slop_in", self.handle_slop_in),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "navigator `{name}` must be finite and >= 0"
                )));
            }
        }
        if self.drawable_width() <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "navigator padding {} leaves no drawable width in {} px",
                self.padding_horizontal_px, self.width_px
            )));
        }
        if self.min_visible_items == 0 {
            return Err(ChartError::InvalidConfig(
                "navigator `min_visible_items` must be >= 1".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn drawable_width(self) -> f64 {
        self.width_px - 2.0 * self.padding_horizontal_px
    }

    #[must_use]
    pub fn inches(self, px: f64) -> f64 {
        px / self.px_per_inch
    }
}
