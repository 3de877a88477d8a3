use serde::{Deserialize, Serialize};

use crate::core::{PlotLayout, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{NavigatorConfig, ScrollIntentConfig};
use crate::plot::PlotStyle;

use super::{HorizontalAxisConfig, RangeAnimationConfig};

fn default_navigator() -> NavigatorConfig {
    NavigatorConfig::default()
}

fn default_scroll_intent() -> ScrollIntentConfig {
    ScrollIntentConfig::default()
}

fn default_range_animation() -> RangeAnimationConfig {
    RangeAnimationConfig::default()
}

fn default_horizontal_axis() -> HorizontalAxisConfig {
    HorizontalAxisConfig::default()
}

fn default_style() -> PlotStyle {
    PlotStyle::default()
}

fn default_visibility_fade_ms() -> u64 {
    200
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist a chart setup; every field except the
/// plot layout has a default, so partial documents load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub plot: PlotLayout,
    #[serde(default = "default_navigator")]
    pub navigator: NavigatorConfig,
    #[serde(default = "default_scroll_intent")]
    pub scroll_intent: ScrollIntentConfig,
    #[serde(default = "default_range_animation")]
    pub range_animation: RangeAnimationConfig,
    #[serde(default = "default_horizontal_axis")]
    pub horizontal_axis: HorizontalAxisConfig,
    #[serde(default = "default_style")]
    pub style: PlotStyle,
    /// Duration of the enter/exit fade after a visibility toggle.
    #[serde(default = "default_visibility_fade_ms")]
    pub visibility_fade_ms: u64,
}

impl ChartEngineConfig {
    /// Plot of `viewport` size with the navigator spanning the same width.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let navigator = default_navigator();
        Self {
            plot: PlotLayout::new(viewport, navigator.padding_horizontal_px, 24.0)
                .with_bottom_padding(24.0),
            navigator: navigator.with_width(viewport.width),
            scroll_intent: default_scroll_intent(),
            range_animation: default_range_animation(),
            horizontal_axis: default_horizontal_axis(),
            style: default_style(),
            visibility_fade_ms: default_visibility_fade_ms(),
        }
    }

    #[must_use]
    pub fn with_plot_padding(mut self, padding_horizontal: f64, top_padding: f64) -> Self {
        self.plot.padding_horizontal = padding_horizontal;
        self.plot.top_padding = top_padding;
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: NavigatorConfig) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn with_min_visible_items(mut self, min_visible_items: usize) -> Self {
        self.navigator.min_visible_items = min_visible_items;
        self
    }

    #[must_use]
    pub fn with_scroll_intent(mut self, scroll_intent: ScrollIntentConfig) -> Self {
        self.scroll_intent = scroll_intent;
        self
    }

    #[must_use]
    pub fn with_range_animation(mut self, range_animation: RangeAnimationConfig) -> Self {
        self.range_animation = range_animation;
        self
    }

    #[must_use]
    pub fn with_horizontal_axis(mut self, horizontal_axis: HorizontalAxisConfig) -> Self {
        self.horizontal_axis = horizontal_axis;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_visibility_fade_ms(mut self, visibility_fade_ms: u64) -> Self {
        self.visibility_fade_ms = visibility_fade_ms;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.plot.validate()?;
        self.navigator.validate()?;
        self.scroll_intent.validate()?;
        self.range_animation.validate()?;
        self.horizontal_axis.validate()?;
        self.style.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))
    }
}
