use tracing::trace;

use crate::core::{ChartDataset, ChartVariant, SeriesId, VisibleRange};
use crate::error::ChartResult;
use crate::plot::line::{line_window, project_line};
use crate::plot::{
    PlotContext, PlotGeometry, PlotRenderer, TrackDomains, point_x_scale, value_y_scale,
    window_extent,
};
use crate::render::RenderFrame;

/// Two lines, each on its own vertical scale. Track `i` belongs to series `i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualScaledPlot;

impl PlotRenderer for DualScaledPlot {
    fn variant(&self) -> ChartVariant {
        ChartVariant::DualScaledLine
    }

    fn target_domains(&self, dataset: &ChartDataset, visible: VisibleRange) -> TrackDomains {
        dataset
            .series()
            .iter()
            .map(|series| {
                if series.is_visible() {
                    window_extent(std::iter::once(series), visible, dataset.len())
                } else {
                    None
                }
            })
            .collect()
    }

    fn project(&self, ctx: &PlotContext<'_>, frame: &mut RenderFrame) -> ChartResult<PlotGeometry> {
        ctx.layout.validate()?;
        let mut geometry = PlotGeometry::empty(ctx.layout, ctx.visible);
        let Some(x_scale) = point_x_scale(ctx.layout, ctx.visible) else {
            return Ok(geometry);
        };
        let Some(window) = line_window(ctx, x_scale) else {
            return Ok(geometry);
        };

        for (series, opacity) in ctx.drawn_series() {
            let SeriesId(track) = series.id();
            let Some(y_scale) = ctx.domain(track).and_then(|domain| value_y_scale(ctx.layout, domain))
            else {
                continue;
            };
            geometry.insert(project_line(ctx, series, opacity, window, x_scale, y_scale, frame));
        }
        trace!(points = window.len(), "dual-scaled projection");
        Ok(geometry)
    }

    /// The first series while it is visible, otherwise the second.
    fn primary_track(&self, dataset: &ChartDataset) -> Option<usize> {
        dataset.series().first_visible().map(|series| series.id().0)
    }
}
