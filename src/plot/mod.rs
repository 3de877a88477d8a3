//! Variant-specific aggregation and projection of series into device space.
//!
//! Renderers are stateless: animated state (value domains, visibility fades)
//! is owned by the engine and passed in through [`PlotContext`]. Each
//! projection returns a [`PlotGeometry`] holding the device coordinates of
//! every projected point, which the selection engine reads back.

mod dual_scaled;
mod line;
mod overview;
mod percentage;
mod stacked;

pub use dual_scaled::DualScaledPlot;
pub use line::LinePlot;
pub use overview::project_overview;
pub use percentage::PercentagePlot;
pub use stacked::StackedPlot;

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::api::RangeDomain;
use crate::core::{
    ChartDataset, ChartVariant, LinearScale, PlotLayout, Series, SeriesId, Transition,
    TransitionStep, VisibleRange, normalize_range,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::NavigationState;
use crate::render::{Color, RenderFrame};

/// Per-track `(min, max)` targets; `None` when the track has nothing visible.
pub type TrackDomains = SmallVec<[Option<(i64, i64)>; 2]>;

fn default_line_width_px() -> f64 {
    2.0
}

fn default_grid_line_width_px() -> f64 {
    1.0
}

fn default_selection_line_width_px() -> f64 {
    1.0
}

fn default_marker_radius_px() -> f64 {
    4.0
}

fn default_dimmed_bar_opacity() -> f64 {
    0.5
}

fn default_font_size_px() -> f64 {
    12.0
}

fn default_label_color() -> Color {
    Color::rgb(0.59, 0.63, 0.66)
}

fn default_grid_color() -> Color {
    Color::rgba(0.0, 0.0, 0.0, 0.1)
}

fn default_selection_line_color() -> Color {
    Color::rgba(0.0, 0.0, 0.0, 0.2)
}

fn default_background_color() -> Color {
    Color::rgb(1.0, 1.0, 1.0)
}

fn default_navigator_shade_color() -> Color {
    Color::rgba(0.89, 0.93, 0.96, 0.6)
}

fn default_navigator_handle_color() -> Color {
    Color::rgba(0.75, 0.82, 0.88, 1.0)
}

/// Stroke widths and colors shared by the plot and navigator surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    #[serde(default = "default_line_width_px")]
    pub line_width_px: f64,
    #[serde(default = "default_grid_line_width_px")]
    pub grid_line_width_px: f64,
    #[serde(default = "default_selection_line_width_px")]
    pub selection_line_width_px: f64,
    #[serde(default = "default_marker_radius_px")]
    pub marker_radius_px: f64,
    /// Opacity of bars outside the selected column.
    #[serde(default = "default_dimmed_bar_opacity")]
    pub dimmed_bar_opacity: f64,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_label_color")]
    pub label_color: Color,
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_selection_line_color")]
    pub selection_line_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_navigator_shade_color")]
    pub navigator_shade_color: Color,
    #[serde(default = "default_navigator_handle_color")]
    pub navigator_handle_color: Color,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            line_width_px: default_line_width_px(),
            grid_line_width_px: default_grid_line_width_px(),
            selection_line_width_px: default_selection_line_width_px(),
            marker_radius_px: default_marker_radius_px(),
            dimmed_bar_opacity: default_dimmed_bar_opacity(),
            font_size_px: default_font_size_px(),
            label_color: default_label_color(),
            grid_color: default_grid_color(),
            selection_line_color: default_selection_line_color(),
            background_color: default_background_color(),
            navigator_shade_color: default_navigator_shade_color(),
            navigator_handle_color: default_navigator_handle_color(),
        }
    }
}

impl PlotStyle {
    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("line_width_px", self.line_width_px),
            ("grid_line_width_px", self.grid_line_width_px),
            ("selection_line_width_px", self.selection_line_width_px),
            ("marker_radius_px", self.marker_radius_px),
            ("font_size_px", self.font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.dimmed_bar_opacity) {
            return Err(ChartError::InvalidConfig(
                "style `dimmed_bar_opacity` must be in [0, 1]".to_owned(),
            ));
        }
        for color in [
            self.label_color,
            self.grid_color,
            self.selection_line_color,
            self.background_color,
            self.navigator_shade_color,
            self.navigator_handle_color,
        ] {
            color.validate().map_err(|err| ChartError::InvalidConfig(err.to_string()))?;
        }
        Ok(())
    }
}

/// Opacity of the series whose visibility is being toggled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSample {
    pub series: SeriesId,
    /// 0 = invisible, 1 = fully drawn. Also weights the series in sums.
    pub opacity: f64,
}

/// Enter/exit fade of one series after a visibility toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFade {
    series: SeriesId,
    appearing: bool,
    transition: Transition<f64>,
}

impl SeriesFade {
    #[must_use]
    pub fn new(series: SeriesId, appearing: bool, duration: Duration) -> Self {
        Self {
            series,
            appearing,
            transition: Transition::new(0.0, 1.0, duration),
        }
    }

    #[must_use]
    pub fn series(&self) -> SeriesId {
        self.series
    }

    #[must_use]
    pub fn is_appearing(&self) -> bool {
        self.appearing
    }

    #[must_use]
    pub fn sample(&self) -> FadeSample {
        let fraction = self.transition.value();
        FadeSample {
            series: self.series,
            opacity: if self.appearing { fraction } else { 1.0 - fraction },
        }
    }

    /// Returns `true` once the fade has finished.
    pub fn advance(&mut self, delta: Duration) -> bool {
        matches!(
            self.transition.advance(delta),
            Some(TransitionStep::Completed(_)) | None
        )
    }
}

/// Device-space position of one data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

/// Projected coordinates of one series, indexed by axis position.
///
/// Points outside the projection window are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTrack {
    pub series: SeriesId,
    pub opacity: f64,
    points: Vec<Option<DevicePoint>>,
}

impl SeriesTrack {
    #[must_use]
    pub fn new(series: SeriesId, opacity: f64, len: usize) -> Self {
        Self {
            series,
            opacity,
            points: vec![None; len],
        }
    }

    pub fn set(&mut self, index: usize, point: DevicePoint) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = Some(point);
        }
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<DevicePoint> {
        self.points.get(index).copied().flatten()
    }

    #[must_use]
    pub fn x_at(&self, index: usize) -> Option<f64> {
        self.point(index).map(|point| point.x)
    }

    #[must_use]
    pub fn y_at(&self, index: usize) -> Option<f64> {
        self.point(index).map(|point| point.y)
    }

    #[must_use]
    pub fn projected_count(&self) -> usize {
        self.points.iter().filter(|point| point.is_some()).count()
    }
}

/// Everything one projection produced, keyed by series.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry {
    pub layout: PlotLayout,
    pub visible: VisibleRange,
    tracks: IndexMap<SeriesId, SeriesTrack>,
}

impl PlotGeometry {
    #[must_use]
    pub fn empty(layout: PlotLayout, visible: VisibleRange) -> Self {
        Self {
            layout,
            visible,
            tracks: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, track: SeriesTrack) {
        self.tracks.insert(track.series, track);
    }

    #[must_use]
    pub fn track(&self, series: SeriesId) -> Option<&SeriesTrack> {
        self.tracks.get(&series)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &SeriesTrack> {
        self.tracks.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Opacity a series is drawn with under `fade`, `None` when hidden and not
/// fading.
#[must_use]
pub fn drawn_opacity(series: &Series, fade: Option<FadeSample>) -> Option<f64> {
    match fade {
        Some(sample) if sample.series == series.id() => Some(sample.opacity),
        _ => series.is_visible().then_some(1.0),
    }
}

/// Inputs of one projection pass.
#[derive(Debug, Clone, Copy)]
pub struct PlotContext<'a> {
    pub dataset: &'a ChartDataset,
    pub visible: VisibleRange,
    pub layout: PlotLayout,
    /// Interpolated domain per track, aligned with [`PlotRenderer::target_domains`].
    pub domains: &'a [Option<RangeDomain>],
    pub fade: Option<FadeSample>,
    pub state: NavigationState,
    pub selected_index: Option<usize>,
    pub style: &'a PlotStyle,
}

impl PlotContext<'_> {
    /// Drawing opacity of a series, `None` when it is not drawn at all.
    #[must_use]
    pub fn opacity_of(&self, series: &Series) -> Option<f64> {
        drawn_opacity(series, self.fade)
    }

    /// Series drawn this frame, in dataset order, with their opacity.
    pub fn drawn_series(&self) -> impl Iterator<Item = (&Series, f64)> {
        self.dataset
            .series()
            .iter()
            .filter_map(move |series| self.opacity_of(series).map(|opacity| (series, opacity)))
    }

    #[must_use]
    pub fn domain(&self, track: usize) -> Option<RangeDomain> {
        self.domains.get(track).copied().flatten()
    }
}

/// Variant-specific aggregation and projection.
pub trait PlotRenderer: Send + Sync {
    fn variant(&self) -> ChartVariant;

    /// Value domain each track should animate toward for `visible`.
    fn target_domains(&self, dataset: &ChartDataset, visible: VisibleRange) -> TrackDomains;

    /// Emits draw primitives into `frame` and returns the projected points.
    fn project(&self, ctx: &PlotContext<'_>, frame: &mut RenderFrame) -> ChartResult<PlotGeometry>;

    /// Track whose labels are shown on the primary side.
    fn primary_track(&self, dataset: &ChartDataset) -> Option<usize> {
        dataset.series().first_visible().map(|_| 0)
    }
}

/// Renderer matching a dataset variant.
#[must_use]
pub fn renderer_for(variant: ChartVariant) -> Box<dyn PlotRenderer> {
    match variant {
        ChartVariant::Line => Box::new(LinePlot),
        ChartVariant::DualScaledLine => Box::new(DualScaledPlot),
        ChartVariant::Stacked => Box::new(StackedPlot::stacked()),
        ChartVariant::Bar => Box::new(StackedPlot::bar()),
        ChartVariant::PercentageStacked => Box::new(PercentagePlot),
    }
}

/// Horizontal mapping for point-based variants: first visible index on the
/// left edge, last visible index on the right edge.
pub(crate) fn point_x_scale(layout: PlotLayout, visible: VisibleRange) -> Option<LinearScale> {
    LinearScale::new(visible.left, visible.right, layout.left_edge(), layout.right_edge()).ok()
}

/// Vertical mapping of a value domain onto the plot height.
pub(crate) fn value_y_scale(layout: PlotLayout, domain: RangeDomain) -> Option<LinearScale> {
    let (min, max) = normalize_range(domain.min, domain.max, 1.0).ok()?;
    LinearScale::new(min, max, layout.baseline(), layout.top_padding).ok()
}

/// `(min, max)` of `series` over the domain window of `visible`.
pub(crate) fn window_extent<'a>(
    series: impl Iterator<Item = &'a Series>,
    visible: VisibleRange,
    len: usize,
) -> Option<(i64, i64)> {
    let window = crate::core::domain_window(visible, len)?;
    series
        .flat_map(|series| series.values()[window.start..window.end].iter().copied())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}
