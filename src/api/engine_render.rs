use smallvec::SmallVec;
use tracing::trace;

use crate::core::{ChartVariant, PixelRect};
use crate::error::ChartResult;
use crate::extensions::ChartEvent;
use crate::plot::{PlotContext, SeriesFade, project_overview};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame, RenderSurface, Renderer,
    TextHAlign, TextPrimitive,
};

use super::{ChartEngine, LabelSide, RangeDomain, RangeEngine, VerticalAxisLabels, VerticalLabel};

/// Vertical labels sit this far above their grid line.
const LABEL_LIFT_PX: f64 = 4.0;
/// Rough glyph advance used to size label backgrounds.
const GLYPH_WIDTH_EM: f64 = 0.6;

impl<R: Renderer> ChartEngine<R> {
    /// Projects the visible window and hands the plot and navigator frames to
    /// the renderer, plot first.
    pub fn render(&mut self) -> ChartResult<()> {
        let plot_frame = self.build_plot_frame()?;
        self.renderer.render(&plot_frame)?;
        let navigator_frame = self.build_navigator_frame()?;
        self.renderer.render(&navigator_frame)?;
        trace!(
            plot_primitives = plot_frame.primitive_count(),
            navigator_primitives = navigator_frame.primitive_count(),
            "frames rendered"
        );
        self.emit_event(ChartEvent::Rendered);
        Ok(())
    }

    pub(super) fn build_plot_frame(&mut self) -> ChartResult<RenderFrame> {
        let layout = self.config.plot;
        let style = self.config.style;
        let mut frame = RenderFrame::new(RenderSurface::Plot, layout.viewport);

        if !self.has_visible_series() && self.fade.is_none() {
            let change = self.selection.clear();
            self.dispatch_selection(change);
            self.push_date_labels(&mut frame);
            return Ok(frame);
        }

        self.push_value_labels(&mut frame);

        let domains: SmallVec<[Option<RangeDomain>; 2]> =
            self.ranges.iter().map(RangeEngine::domain).collect();
        let geometry = {
            let ctx = PlotContext {
                dataset: &self.dataset,
                visible: self.navigator.visible_range(),
                layout,
                domains: &domains,
                fade: self.fade.as_ref().map(SeriesFade::sample),
                state: self.navigator.state(),
                selected_index: self.selection.selected_index(),
                style: &style,
            };
            self.plot.project(&ctx, &mut frame)?
        };
        for (range, domain) in self.ranges.iter_mut().zip(&domains) {
            if domain.is_some() {
                range.mark_drawn();
            }
        }
        trace!(tracks = geometry.tracks().count(), "plot projected");

        let change = self.selection.on_geometry_updated(geometry, &self.dataset);
        self.dispatch_selection(change);
        if self.dataset.variant().is_line() {
            self.push_selection_overlay(&mut frame);
        }
        self.push_date_labels(&mut frame);
        Ok(frame)
    }

    pub(super) fn build_navigator_frame(&self) -> ChartResult<RenderFrame> {
        let style = self.config.style;
        let mut frame = project_overview(
            &self.dataset,
            self.navigator.config(),
            self.fade.as_ref().map(SeriesFade::sample),
            &style,
        )?;
        let overlay = self.navigator.overlay();
        for shade in [overlay.left_shade, overlay.right_shade] {
            frame.rects.push(rect_of(shade, style.navigator_shade_color));
        }
        for part in [
            overlay.left_handle,
            overlay.right_handle,
            overlay.top_bar,
            overlay.bottom_bar,
        ] {
            frame.rects.push(rect_of(part, style.navigator_handle_color));
        }
        Ok(frame)
    }

    fn push_value_labels(&self, frame: &mut RenderFrame) {
        let layout = self.config.plot;
        let Some(primary) = self.primary_track() else {
            return;
        };
        let Some(primary_range) = self.ranges.get(primary) else {
            return;
        };

        if self.dataset.variant() == ChartVariant::DualScaledLine {
            let primary_labels = VerticalAxisLabels::build(primary_range, layout, LabelSide::Left);
            self.push_grid(&primary_labels, frame);
            self.push_label_texts(&primary_labels, self.track_color(primary), frame);

            let secondary = 1 - primary.min(1);
            let secondary_shown = self
                .dataset
                .series()
                .iter()
                .nth(secondary)
                .is_some_and(|series| series.is_visible());
            if let (true, Some(secondary_range)) = (secondary_shown, self.ranges.get(secondary)) {
                let labels = VerticalAxisLabels::build_forced(
                    secondary_range,
                    primary_range,
                    layout,
                    LabelSide::Right,
                );
                self.push_label_texts(&labels, self.track_color(secondary), frame);
            }
            return;
        }

        let labels = VerticalAxisLabels::build(primary_range, layout, LabelSide::Left);
        self.push_grid(&labels, frame);
        self.push_label_texts(&labels, self.config.style.label_color, frame);
    }

    fn track_color(&self, track: usize) -> Color {
        self.dataset
            .series()
            .iter()
            .nth(track)
            .map_or(self.config.style.label_color, |series| series.color())
    }

    fn push_grid(&self, labels: &[VerticalLabel], frame: &mut RenderFrame) {
        let layout = self.config.plot;
        let style = self.config.style;
        for label in labels.iter().filter(|label| label.alpha > 0.0) {
            frame.lines.push(LinePrimitive::new(
                layout.left_edge(),
                label.y,
                layout.right_edge(),
                label.y,
                style.grid_line_width_px,
                style.grid_color.with_opacity(label.alpha),
            ));
        }
    }

    /// Column variants draw labels over bars, so each gets a background.
    fn push_label_texts(&self, labels: &[VerticalLabel], color: Color, frame: &mut RenderFrame) {
        let layout = self.config.plot;
        let style = self.config.style;
        let backgrounds = !self.dataset.variant().is_line();

        for label in labels.iter().filter(|label| label.alpha > 0.0) {
            let (x, h_align) = match label.side {
                LabelSide::Left => (layout.left_edge(), TextHAlign::Left),
                LabelSide::Right => (layout.right_edge(), TextHAlign::Right),
            };
            let y = label.y - LABEL_LIFT_PX;
            if backgrounds {
                let width = label.text.chars().count() as f64 * style.font_size_px * GLYPH_WIDTH_EM;
                let left = match h_align {
                    TextHAlign::Right => x - width,
                    _ => x,
                };
                frame.rects.push(RectPrimitive::new(
                    left,
                    y - style.font_size_px,
                    width,
                    style.font_size_px,
                    style.background_color.with_opacity(label.background_alpha),
                ));
            }
            frame.texts.push(TextPrimitive::new(
                label.text.clone(),
                x,
                y,
                style.font_size_px,
                color.with_opacity(label.alpha),
                h_align,
            ));
        }
    }

    fn push_selection_overlay(&self, frame: &mut RenderFrame) {
        let Some(snapshot) = self.selection.snapshot() else {
            return;
        };
        let layout = self.config.plot;
        let style = self.config.style;
        frame.lines.push(LinePrimitive::new(
            snapshot.x,
            layout.top_padding,
            snapshot.x,
            layout.baseline(),
            style.selection_line_width_px,
            style.selection_line_color,
        ));
        for (id, y) in &snapshot.coords_y {
            let Some(series) = self.dataset.series().get(*id) else {
                continue;
            };
            frame.circles.push(CirclePrimitive::new(
                snapshot.x,
                *y,
                style.marker_radius_px,
                style.background_color,
                series.color(),
                style.line_width_px,
            ));
        }
    }

    fn push_date_labels(&self, frame: &mut RenderFrame) {
        let layout = self.config.plot;
        let style = self.config.style;
        let y = layout.baseline() + style.font_size_px;
        for tick in self.horizontal_axis.ticks(self.dataset.axis()) {
            frame.texts.push(TextPrimitive::new(
                tick.label,
                tick.x,
                y,
                style.font_size_px,
                style.label_color.with_opacity(tick.alpha),
                TextHAlign::Center,
            ));
        }
    }
}

fn rect_of(rect: PixelRect, fill: Color) -> RectPrimitive {
    RectPrimitive::new(
        rect.left,
        rect.top,
        rect.width().max(0.0),
        rect.height().max(0.0),
        fill,
    )
}
