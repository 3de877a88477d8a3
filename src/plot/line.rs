use smallvec::smallvec;
use tracing::trace;

use crate::core::{
    ChartDataset, ChartVariant, IndexWindow, LinearScale, Series, VisibleRange, projection_window,
};
use crate::error::ChartResult;
use crate::plot::{
    DevicePoint, PlotContext, PlotGeometry, PlotRenderer, SeriesTrack, TrackDomains,
    point_x_scale, value_y_scale, window_extent,
};
use crate::render::{LinePrimitive, RenderFrame};

/// Lines sharing one vertical scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePlot;

impl PlotRenderer for LinePlot {
    fn variant(&self) -> ChartVariant {
        ChartVariant::Line
    }

    fn target_domains(&self, dataset: &ChartDataset, visible: VisibleRange) -> TrackDomains {
        smallvec![window_extent(dataset.series().visible(), visible, dataset.len())]
    }

    fn project(&self, ctx: &PlotContext<'_>, frame: &mut RenderFrame) -> ChartResult<PlotGeometry> {
        ctx.layout.validate()?;
        let mut geometry = PlotGeometry::empty(ctx.layout, ctx.visible);
        let Some(domain) = ctx.domain(0) else {
            return Ok(geometry);
        };
        let (Some(x_scale), Some(y_scale)) = (
            point_x_scale(ctx.layout, ctx.visible),
            value_y_scale(ctx.layout, domain),
        ) else {
            return Ok(geometry);
        };
        let Some(window) = line_window(ctx, x_scale) else {
            return Ok(geometry);
        };

        for (series, opacity) in ctx.drawn_series() {
            let track = project_line(ctx, series, opacity, window, x_scale, y_scale, frame);
            geometry.insert(track);
        }
        trace!(points = window.len(), series = frame.lines.len(), "line projection");
        Ok(geometry)
    }
}

/// Visible indices plus enough neighbors to fill the horizontal padding.
pub(crate) fn line_window(ctx: &PlotContext<'_>, x_scale: LinearScale) -> Option<IndexWindow> {
    let per_item = x_scale.pixels_per_unit();
    if !per_item.is_finite() || per_item <= 0.0 {
        return None;
    }
    let margin = (ctx.layout.padding_horizontal / per_item).ceil() as usize + 1;
    projection_window(ctx.visible, ctx.dataset.len(), margin)
}

/// Projects one series as a polyline and records its points.
pub(crate) fn project_line(
    ctx: &PlotContext<'_>,
    series: &Series,
    opacity: f64,
    window: IndexWindow,
    x_scale: LinearScale,
    y_scale: LinearScale,
    frame: &mut RenderFrame,
) -> SeriesTrack {
    let mut track = SeriesTrack::new(series.id(), opacity, ctx.dataset.len());
    let color = series.color().with_opacity(opacity);
    let mut previous: Option<DevicePoint> = None;

    for index in window.indices() {
        let Some(value) = series.value(index) else {
            break;
        };
        let point = DevicePoint {
            x: x_scale.map(index as f64),
            y: y_scale.map(value as f64),
        };
        track.set(index, point);
        match previous {
            Some(from) if opacity > 0.0 => frame.lines.push(LinePrimitive::new(
                from.x,
                from.y,
                point.x,
                point.y,
                ctx.style.line_width_px,
                color,
            )),
            _ => {}
        }
        previous = Some(point);
    }
    track
}
