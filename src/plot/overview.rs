use tracing::trace;

use crate::core::{
    ChartDataset, ChartVariant, LinearScale, Series, SeriesId, Viewport, normalize_range,
};
use crate::error::ChartResult;
use crate::interaction::NavigatorConfig;
use crate::plot::{FadeSample, PlotStyle, drawn_opacity};
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame, RenderSurface};

/// Draws the whole dataset into the navigator strip.
///
/// Line domains come from each series' cached extremes; a fading series is
/// blended into the domain by its opacity so the preview rescales smoothly.
pub fn project_overview(
    dataset: &ChartDataset,
    navigator: NavigatorConfig,
    fade: Option<FadeSample>,
    style: &PlotStyle,
) -> ChartResult<RenderFrame> {
    navigator.validate()?;
    let mut frame = RenderFrame::new(
        RenderSurface::Navigator,
        Viewport::new(navigator.width_px, navigator.height_px),
    );
    let bar = navigator.frame_bar_px.min(navigator.height_px / 2.0);
    let strip = Strip {
        left: navigator.padding_horizontal_px,
        right: navigator.width_px - navigator.padding_horizontal_px,
        bottom: navigator.height_px - bar,
        top: bar,
    };

    match dataset.variant() {
        ChartVariant::Line => {
            if let Some((min, max)) = blended_extent(dataset, fade) {
                for series in dataset.series().iter() {
                    overview_line(dataset, series, fade, (min, max), strip, style, &mut frame);
                }
            }
        }
        ChartVariant::DualScaledLine => {
            for series in dataset.series().iter() {
                let extent = (series.min() as f64, series.max() as f64);
                overview_line(dataset, series, fade, extent, strip, style, &mut frame);
            }
        }
        ChartVariant::Stacked | ChartVariant::Bar => {
            overview_columns(dataset, fade, strip, false, &mut frame);
        }
        ChartVariant::PercentageStacked => {
            overview_columns(dataset, fade, strip, true, &mut frame);
        }
    }

    trace!(
        lines = frame.lines.len(),
        rects = frame.rects.len(),
        "overview projection"
    );
    Ok(frame)
}

#[derive(Debug, Clone, Copy)]
struct Strip {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
}

fn extent_of<'a>(series: impl Iterator<Item = &'a Series>) -> Option<(f64, f64)> {
    series.fold(None, |acc, series| {
        let (min, max) = (series.min() as f64, series.max() as f64);
        Some(match acc {
            None => (min, max),
            Some((lo, hi)) => (f64::min(lo, min), f64::max(hi, max)),
        })
    })
}

/// Domain of the visible series, moved toward the fading series' extremes
/// in proportion to its opacity.
fn blended_extent(dataset: &ChartDataset, fade: Option<FadeSample>) -> Option<(f64, f64)> {
    let fading = fade.map(|sample| sample.series);
    let steady_series = || {
        dataset
            .series()
            .visible()
            .filter(move |series| Some(series.id()) != fading)
    };
    let steady = extent_of(steady_series());
    let Some(sample) = fade else {
        return steady;
    };
    let Some(fading_series) = dataset.series().get(sample.series) else {
        return steady;
    };
    let full = extent_of(steady_series().chain(std::iter::once(fading_series)));

    match (steady, full) {
        (Some((lo, hi)), Some((full_lo, full_hi))) => Some((
            lo + (full_lo - lo) * sample.opacity,
            hi + (full_hi - hi) * sample.opacity,
        )),
        (None, full) => full,
        (steady, None) => steady,
    }
}

fn overview_line(
    dataset: &ChartDataset,
    series: &Series,
    fade: Option<FadeSample>,
    extent: (f64, f64),
    strip: Strip,
    style: &PlotStyle,
    frame: &mut RenderFrame,
) {
    let Some(opacity) = drawn_opacity(series, fade).filter(|opacity| *opacity > 0.0) else {
        return;
    };
    let Ok((min, max)) = normalize_range(extent.0, extent.1, 1.0) else {
        return;
    };
    let last = dataset.len().saturating_sub(1) as f64;
    let (Ok(x_scale), Ok(y_scale)) = (
        LinearScale::new(0.0, last, strip.left, strip.right),
        LinearScale::new(min, max, strip.bottom, strip.top),
    ) else {
        return;
    };
    let color = series.color().with_opacity(opacity);
    let width = (style.line_width_px / 2.0).max(1.0);
    let points: Vec<(f64, f64)> = series
        .values()
        .iter()
        .enumerate()
        .map(|(index, value)| (x_scale.map(index as f64), y_scale.map(*value as f64)))
        .collect();
    frame.lines.extend(
        points
            .windows(2)
            .map(|pair| LinePrimitive::new(pair[0].0, pair[0].1, pair[1].0, pair[1].1, width, color)),
    );
}

fn overview_columns(
    dataset: &ChartDataset,
    fade: Option<FadeSample>,
    strip: Strip,
    normalized: bool,
    frame: &mut RenderFrame,
) {
    let drawn: Vec<(SeriesId, f64)> = dataset
        .series()
        .iter()
        .filter_map(|series| drawn_opacity(series, fade).map(|weight| (series.id(), weight)))
        .collect();
    if drawn.is_empty() {
        return;
    }
    let weighted = |index: usize| -> Vec<(SeriesId, f64)> {
        drawn
            .iter()
            .filter_map(|(id, weight)| {
                let value = dataset.series().get(*id)?.value(index)?;
                Some((*id, value as f64 * weight))
            })
            .collect()
    };
    let height = strip.bottom - strip.top;
    let max_sum = (0..dataset.len())
        .map(|index| weighted(index).iter().map(|(_, value)| value).sum::<f64>())
        .fold(0.0, f64::max);
    if !normalized && max_sum <= 0.0 {
        return;
    }
    let bar_width = (strip.right - strip.left) / dataset.len() as f64;

    for index in 0..dataset.len() {
        let column = weighted(index);
        let sum: f64 = column.iter().map(|(_, value)| value).sum();
        let denominator = if normalized { sum } else { max_sum };
        if denominator <= 0.0 {
            continue;
        }
        let x = strip.left + index as f64 * bar_width;
        let mut bottom = strip.bottom;
        for (id, value) in column {
            let segment = value.max(0.0) / denominator * height;
            if segment <= 0.0 {
                continue;
            }
            let Some(series) = dataset.series().get(id) else {
                continue;
            };
            frame.rects.push(RectPrimitive::new(
                x,
                bottom - segment,
                bar_width,
                segment,
                series.color(),
            ));
            bottom -= segment;
        }
    }
}
