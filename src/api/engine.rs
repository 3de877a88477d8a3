use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{
    ChartDataset, ChartVariant, PlotLayout, SeriesId, Viewport, ViewportBounds, VisibleRange,
};
use crate::error::ChartResult;
use crate::extensions::{ChartEvent, ChartListener};
use crate::interaction::{
    NavigationState, NavigationUpdate, ScrollIntent, ScrollIntentFilter, ViewportController,
};
use crate::plot::{PlotRenderer, SeriesFade, renderer_for};
use crate::render::Renderer;

use super::{
    ChartEngineConfig, HorizontalAxisEngine, RangeEngine, RangeState, SelectionChange,
    SelectionEngine, SelectionSnapshot, TickPlacement,
};

/// Interactive chart orchestrator.
///
/// Routes navigator and plot input to the viewport controller and selection
/// engine, keeps one range engine per value scale in sync with the visible
/// window, and assembles plot and navigator frames for the renderer.
///
/// Within one input, work runs in a fixed order: range targets, axis labels,
/// selection, then registered listeners (state change before bounds change).
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) dataset: ChartDataset,
    pub(super) plot: Box<dyn PlotRenderer>,
    pub(super) navigator: ViewportController,
    pub(super) navigator_intent: ScrollIntentFilter,
    pub(super) plot_intent: ScrollIntentFilter,
    pub(super) ranges: SmallVec<[RangeEngine; 2]>,
    pub(super) active_tracks: SmallVec<[bool; 2]>,
    pub(super) label_track: Option<usize>,
    pub(super) fade: Option<SeriesFade>,
    pub(super) selection: SelectionEngine,
    pub(super) horizontal_axis: HorizontalAxisEngine,
    pub(super) listeners: Vec<Box<dyn ChartListener>>,
    pub(super) scroll_offset: f64,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, dataset: ChartDataset, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let variant = dataset.variant();
        let navigator = ViewportController::new(config.navigator, dataset.len())?;
        let ranges = (0..variant.track_count())
            .map(|_| RangeEngine::new(config.range_animation, variant.starts_from_zero()))
            .collect::<ChartResult<SmallVec<[RangeEngine; 2]>>>()?;
        let placement = if variant.is_line() {
            TickPlacement::Points
        } else {
            TickPlacement::Columns
        };

        let mut engine = Self {
            renderer,
            config,
            plot: renderer_for(variant),
            navigator,
            navigator_intent: ScrollIntentFilter::new(config.scroll_intent)?,
            plot_intent: ScrollIntentFilter::new(config.scroll_intent)?,
            active_tracks: SmallVec::from_elem(false, ranges.len()),
            label_track: None,
            ranges,
            fade: None,
            selection: SelectionEngine::new(),
            horizontal_axis: HorizontalAxisEngine::new(config.horizontal_axis, placement)?,
            listeners: Vec::new(),
            scroll_offset: 0.0,
            dataset,
        };
        engine.refresh_targets(false);
        engine.refresh_horizontal_axis();
        debug!(
            variant = ?variant,
            items = engine.dataset.len(),
            series = engine.dataset.series().len(),
            "chart engine initialized"
        );
        Ok(engine)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &ChartDataset {
        &self.dataset
    }

    #[must_use]
    pub fn variant(&self) -> ChartVariant {
        self.dataset.variant()
    }

    #[must_use]
    pub fn viewport_controller(&self) -> &ViewportController {
        &self.navigator
    }

    #[must_use]
    pub fn bounds(&self) -> ViewportBounds {
        self.navigator.bounds()
    }

    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        self.navigator.visible_range()
    }

    #[must_use]
    pub fn navigation_state(&self) -> NavigationState {
        self.navigator.state()
    }

    /// Range engine of a value track (`0` unless the chart is dual-scaled).
    #[must_use]
    pub fn range_engine(&self, track: usize) -> Option<&RangeEngine> {
        self.ranges.get(track)
    }

    #[must_use]
    pub fn current_range(&self, track: usize) -> Option<RangeState> {
        self.ranges.get(track).and_then(RangeEngine::current)
    }

    #[must_use]
    pub fn horizontal_axis(&self) -> &HorizontalAxisEngine {
        &self.horizontal_axis
    }

    #[must_use]
    pub fn selection_snapshot(&self) -> Option<&SelectionSnapshot> {
        self.selection.snapshot()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    #[must_use]
    pub fn has_visible_series(&self) -> bool {
        self.dataset.series().first_visible().is_some()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Records the host's scroll position so it is carried in the view state.
    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        self.scroll_offset = scroll_offset;
    }

    /// Resizes the plot; the navigator keeps its configured width unless
    /// `navigator_width_px` is given.
    pub fn resize(&mut self, plot: Viewport, navigator_width_px: Option<f64>) -> ChartResult<()> {
        let layout = PlotLayout { viewport: plot, ..self.config.plot };
        layout.validate()?;
        if let Some(width) = navigator_width_px {
            self.navigator.set_width(width)?;
            self.config.navigator = self.navigator.config();
        }
        self.config.plot = layout;
        self.refresh_horizontal_axis();
        Ok(())
    }

    // Navigator input.

    pub fn navigator_pointer_down(&mut self, x: f64, y: f64) -> NavigationUpdate {
        self.navigator_intent.begin(x, y);
        let update = self.navigator.on_pointer_down(x);
        self.dispatch_navigation(update);
        update
    }

    /// Moves are held back until the gesture is claimed as horizontal; a
    /// gesture released to page scrolling ends the navigator drag.
    pub fn navigator_pointer_move(&mut self, x: f64, y: f64) -> NavigationUpdate {
        let update = match self.navigator_intent.observe(x, y) {
            ScrollIntent::Undecided => NavigationUpdate::default(),
            ScrollIntent::Released => self.navigator.on_pointer_up(),
            ScrollIntent::Claimed => self.navigator.on_pointer_move(x),
        };
        self.dispatch_navigation(update);
        update
    }

    pub fn navigator_pointer_up(&mut self) -> NavigationUpdate {
        self.navigator_intent.end();
        let update = self.navigator.on_pointer_up();
        self.dispatch_navigation(update);
        update
    }

    pub fn set_bounds(&mut self, bounds: ViewportBounds) -> ChartResult<NavigationUpdate> {
        let update = self.navigator.set_bounds(bounds)?;
        self.dispatch_navigation(update);
        Ok(update)
    }

    // Plot input.

    pub fn plot_pointer_down(&mut self, x: f64, y: f64) -> SelectionChange {
        self.plot_intent.begin(x, y);
        let change = self.selection.select_at_x(x, &self.dataset);
        self.dispatch_selection(change);
        change
    }

    /// The selection follows the pointer until the gesture is released to
    /// page scrolling.
    pub fn plot_pointer_move(&mut self, x: f64, y: f64) -> SelectionChange {
        if self.plot_intent.observe(x, y) == ScrollIntent::Released {
            return SelectionChange::Unchanged;
        }
        let change = self.selection.select_at_x(x, &self.dataset);
        self.dispatch_selection(change);
        change
    }

    pub fn plot_pointer_up(&mut self) {
        self.plot_intent.end();
    }

    pub fn select_index(&mut self, index: usize) -> SelectionChange {
        let change = self.selection.select_at_index(index, &self.dataset);
        self.dispatch_selection(change);
        change
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        let change = self.selection.clear();
        self.dispatch_selection(change);
        change
    }

    // Visibility.

    /// Toggles a series and starts its enter/exit fade, replacing any fade
    /// still running.
    pub fn set_series_visible(&mut self, series: SeriesId, visible: bool) -> ChartResult<bool> {
        if !self.dataset.set_series_visible(series, visible)? {
            return Ok(false);
        }
        if let Some(previous) = self.fade.take() {
            trace!(series = %previous.series(), "visibility fade replaced");
        }
        self.fade = Some(SeriesFade::new(
            series,
            visible,
            Duration::from_millis(self.config.visibility_fade_ms),
        ));
        debug!(series = %series, visible, "series visibility changed");

        self.refresh_targets(true);
        let selection_change = match self.selection.selected_index() {
            Some(index) if self.has_visible_series() => {
                self.selection.defer(index);
                SelectionChange::Unchanged
            }
            _ => self.selection.clear(),
        };
        self.emit_event(ChartEvent::SeriesVisibilityChanged { series, visible });
        self.dispatch_selection(selection_change);
        Ok(true)
    }

    // Animation clock.

    /// Advances every running animation. Returns whether any is still running.
    pub fn advance(&mut self, delta: Duration) -> bool {
        for range in &mut self.ranges {
            range.advance(delta);
        }
        if let Some(fade) = self.fade.as_mut() {
            if fade.advance(delta) {
                self.fade = None;
            }
        }
        self.horizontal_axis.advance(delta);
        self.is_animating()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.ranges.iter().any(RangeEngine::is_animating)
            || self.fade.is_some()
            || self.horizontal_axis.is_animating()
    }

    /// Track showing its labels on the primary side, if any series is shown.
    #[must_use]
    pub fn primary_track(&self) -> Option<usize> {
        self.plot.primary_track(&self.dataset)
    }

    pub(super) fn dispatch_navigation(&mut self, update: NavigationUpdate) {
        if update.is_empty() {
            return;
        }
        let mut selection_change = SelectionChange::Unchanged;
        if let Some(state) = update.state {
            if !state.is_idle() {
                selection_change = self.selection.clear();
            }
        }
        if update.bounds.is_some() {
            self.refresh_targets(true);
            self.refresh_horizontal_axis();
            if self.selection.clear() == SelectionChange::Cleared {
                selection_change = SelectionChange::Cleared;
            }
        }

        if let Some(state) = update.state {
            self.emit_event(ChartEvent::NavigationStateChanged { state });
        }
        if let Some(range) = update.bounds {
            self.emit_event(ChartEvent::BoundsChanged { range });
        }
        self.dispatch_selection(selection_change);
    }

    /// Feeds each track's target domain for the current window into its
    /// range engine. On dual-scaled charts a track returning from hidden, or
    /// any track when the primary label side switches series, snaps.
    pub(super) fn refresh_targets(&mut self, animate: bool) {
        let visible = self.navigator.visible_range();
        let targets = self.plot.target_domains(&self.dataset, visible);
        let dual = self.dataset.variant() == ChartVariant::DualScaledLine;

        let primary = self.plot.primary_track(&self.dataset);
        let primary_switched =
            dual && primary.is_some() && self.label_track.is_some() && primary != self.label_track;
        if primary.is_some() {
            if primary_switched {
                debug!(from = ?self.label_track, to = ?primary, "primary label track switched");
            }
            self.label_track = primary;
        }

        for (track, target) in targets.into_iter().enumerate() {
            let Some(range) = self.ranges.get_mut(track) else {
                continue;
            };
            let was_active = self.active_tracks.get(track).copied().unwrap_or(false);
            if let Some(active) = self.active_tracks.get_mut(track) {
                *active = target.is_some();
            }
            let Some((min, max)) = target else {
                continue;
            };
            let reentering = dual && !was_active;
            let outcome =
                range.update_target_with(min, max, animate && !reentering && !primary_switched);
            trace!(track, min, max, outcome = ?outcome, "range target updated");
        }
    }

    pub(super) fn refresh_horizontal_axis(&mut self) {
        let visible = self.navigator.visible_range();
        self.horizontal_axis.update(visible, self.config.plot);
    }
}
