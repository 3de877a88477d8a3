use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::core::{ChartDataset, ChartVariant, IndexWindow, PlotLayout, SeriesId, VisibleRange};
use crate::core::{domain_window, projection_window};
use crate::error::ChartResult;
use crate::plot::{DevicePoint, PlotContext, PlotGeometry, PlotRenderer, SeriesTrack, TrackDomains};
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

/// Bars stacked per index on a `[0, max sum]` scale.
#[derive(Debug, Clone, Copy)]
pub struct StackedPlot {
    variant: ChartVariant,
}

impl StackedPlot {
    #[must_use]
    pub fn stacked() -> Self {
        Self {
            variant: ChartVariant::Stacked,
        }
    }

    #[must_use]
    pub fn bar() -> Self {
        Self {
            variant: ChartVariant::Bar,
        }
    }
}

impl PlotRenderer for StackedPlot {
    fn variant(&self) -> ChartVariant {
        self.variant
    }

    fn target_domains(&self, dataset: &ChartDataset, visible: VisibleRange) -> TrackDomains {
        if dataset.series().first_visible().is_none() {
            return smallvec![None];
        }
        let Some(window) = domain_window(visible, dataset.len()) else {
            return smallvec![None];
        };
        let max_sum = window
            .indices()
            .map(|index| {
                dataset
                    .series()
                    .visible()
                    .filter_map(|series| series.value(index))
                    .sum::<i64>()
            })
            .max()
            .unwrap_or(0);
        smallvec![Some((0, max_sum.max(0)))]
    }

    fn project(&self, ctx: &PlotContext<'_>, frame: &mut RenderFrame) -> ChartResult<PlotGeometry> {
        ctx.layout.validate()?;
        let empty = PlotGeometry::empty(ctx.layout, ctx.visible);
        let Some(domain) = ctx.domain(0) else {
            return Ok(empty);
        };
        if !domain.max.is_finite() || domain.max <= 0.0 {
            return Ok(empty);
        }
        let per_unit = ctx.layout.drawable_height() / domain.max;
        Ok(project_columns(ctx, frame, |_, weighted| {
            weighted.iter().map(|(_, value)| value * per_unit).collect()
        }))
    }
}

/// One drawn series at one index: `(series, weighted value)`.
pub(crate) type ColumnInput = SmallVec<[(SeriesId, f64); 8]>;

/// Stacked segment heights in pixels, aligned with the column input.
pub(crate) type ColumnHeights = SmallVec<[f64; 8]>;

#[derive(Debug, Clone)]
struct Column {
    index: usize,
    segments: SmallVec<[(SeriesId, f64, f64); 8]>,
}

/// Pixel width of one column and the window to project.
pub(crate) fn column_layout(ctx: &PlotContext<'_>) -> Option<(f64, IndexWindow)> {
    let count = ctx.visible.item_count();
    if !count.is_finite() || count <= 0.0 {
        return None;
    }
    let bar_width = ctx.layout.drawable_width() / count;
    let margin = (ctx.layout.padding_horizontal / bar_width).ceil() as usize + 1;
    let window = projection_window(ctx.visible, ctx.dataset.len(), margin)?;
    Some((bar_width, window))
}

/// Left pixel of the column for `index`.
pub(crate) fn column_left(layout: PlotLayout, visible: VisibleRange, bar_width: f64, index: usize) -> f64 {
    layout.left_edge() + (index as f64 - visible.left) * bar_width
}

/// Projects stacked columns; `heights` turns the weighted values of one index
/// into segment heights (bottom series first).
pub(crate) fn project_columns<F>(ctx: &PlotContext<'_>, frame: &mut RenderFrame, heights: F) -> PlotGeometry
where
    F: Fn(usize, &ColumnInput) -> ColumnHeights + Sync,
{
    let mut geometry = PlotGeometry::empty(ctx.layout, ctx.visible);
    let Some((bar_width, window)) = column_layout(ctx) else {
        return geometry;
    };
    let drawn: SmallVec<[(SeriesId, f64); 8]> = ctx
        .drawn_series()
        .map(|(series, opacity)| (series.id(), opacity))
        .collect();
    if drawn.is_empty() {
        return geometry;
    }

    let build = |index: usize| -> Column {
        let input: ColumnInput = drawn
            .iter()
            .filter_map(|(id, weight)| {
                let value = ctx.dataset.series().get(*id)?.value(index)?;
                Some((*id, value as f64 * weight))
            })
            .collect();
        let mut bottom = ctx.layout.baseline();
        let segments = input
            .iter()
            .zip(heights(index, &input))
            .map(|((id, _), height)| {
                let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
                let top = bottom - height;
                let segment = (*id, top, bottom);
                bottom = top;
                segment
            })
            .collect();
        Column { index, segments }
    };

    #[cfg(feature = "parallel-projection")]
    let columns: Vec<Column> = window.indices().into_par_iter().map(build).collect();
    #[cfg(not(feature = "parallel-projection"))]
    let columns: Vec<Column> = window.indices().map(build).collect();

    let percentage = ctx.dataset.variant() == ChartVariant::PercentageStacked;
    let mut tracks: Vec<SeriesTrack> = drawn
        .iter()
        .map(|(id, opacity)| SeriesTrack::new(*id, *opacity, ctx.dataset.len()))
        .collect();

    for column in &columns {
        let left = column_left(ctx.layout, ctx.visible, bar_width, column.index);
        let center = left + bar_width / 2.0;
        let dimmed = !percentage
            && ctx
                .selected_index
                .is_some_and(|selected| selected != column.index);
        let column_opacity = if dimmed { ctx.style.dimmed_bar_opacity } else { 1.0 };

        // Zero-sum columns draw nothing but stay selectable at the baseline.
        for track in &mut tracks {
            track.set(
                column.index,
                DevicePoint {
                    x: center,
                    y: ctx.layout.baseline(),
                },
            );
        }
        for (id, top, bottom) in &column.segments {
            if let Some(track) = tracks.iter_mut().find(|track| track.series == *id) {
                track.set(column.index, DevicePoint { x: center, y: *top });
            }
            let Some(series) = ctx.dataset.series().get(*id) else {
                continue;
            };
            let height = bottom - top;
            if height <= 0.0 {
                continue;
            }
            let fill = series.color().with_opacity(column_opacity);
            frame
                .rects
                .push(RectPrimitive::new(left, *top, bar_width, height, fill));
        }
    }

    if percentage {
        if let Some(selected) = ctx.selected_index.filter(|index| window.contains(*index)) {
            let x = column_left(ctx.layout, ctx.visible, bar_width, selected) + bar_width / 2.0;
            frame.lines.push(LinePrimitive::new(
                x,
                ctx.layout.baseline(),
                x,
                ctx.layout.top_padding,
                ctx.style.selection_line_width_px,
                ctx.style.selection_line_color,
            ));
        }
    }

    for track in tracks {
        geometry.insert(track);
    }
    trace!(columns = columns.len(), rects = frame.rects.len(), "column projection");
    geometry
}
