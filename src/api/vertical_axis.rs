use crate::api::{RangeDomain, RangeEngine, RangeState};
use crate::core::{LinearScale, PlotLayout, normalize_range};

/// Label backgrounds never get more opaque than this.
pub const LABEL_BACKGROUND_MAX_ALPHA: f64 = 0.8;

/// Which side of the plot a label track is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLabel {
    pub value: i64,
    pub text: String,
    pub y: f64,
    pub alpha: f64,
    pub background_alpha: f64,
    pub side: LabelSide,
}

/// Builds value labels from a range engine.
#[derive(Debug, Clone, Copy)]
pub struct VerticalAxisLabels;

impl VerticalAxisLabels {
    /// Primary track: crossfades the settled and in-flight label sets while
    /// both slide with the animated domain. The bottom label never fades.
    #[must_use]
    pub fn build(range: &RangeEngine, layout: PlotLayout, side: LabelSide) -> Vec<VerticalLabel> {
        let Some(scale) = range.domain().and_then(|domain| scale_for(layout, domain)) else {
            return Vec::new();
        };
        if let Some(crossfade) = range.label_crossfade() {
            let mut labels = place(crossfade.outgoing, scale, crossfade.outgoing_alpha(), side);
            labels.extend(place(crossfade.incoming, scale, crossfade.incoming_alpha(), side));
            return labels;
        }
        range
            .settled()
            .map(|state| place(state, scale, 1.0, side))
            .unwrap_or_default()
    }

    /// Secondary track of a dual-scaled chart: one static label set, the
    /// in-flight target when animating, positioned on the primary scale's
    /// label rows.
    #[must_use]
    pub fn build_forced(
        secondary: &RangeEngine,
        primary: &RangeEngine,
        layout: PlotLayout,
        side: LabelSide,
    ) -> Vec<VerticalLabel> {
        let Some(state) = secondary.target().or_else(|| secondary.settled()) else {
            return Vec::new();
        };
        let primary_rows: Option<Vec<f64>> = primary
            .target()
            .or_else(|| primary.settled())
            .zip(primary.domain().and_then(|domain| scale_for(layout, domain)))
            .map(|(primary_state, scale)| {
                primary_state
                    .label_values
                    .iter()
                    .map(|value| scale.map(*value as f64))
                    .collect()
            });
        let Some(rows) = primary_rows else {
            return rows_from_own_scale(state, layout, side);
        };
        state
            .label_values
            .iter()
            .zip(&state.labels)
            .zip(rows)
            .map(|((value, text), y)| label(*value, text, y, 1.0, side))
            .collect()
    }
}

fn rows_from_own_scale(state: &RangeState, layout: PlotLayout, side: LabelSide) -> Vec<VerticalLabel> {
    scale_for(layout, state.domain())
        .map(|scale| place(state, scale, 1.0, side))
        .unwrap_or_default()
}

fn scale_for(layout: PlotLayout, domain: RangeDomain) -> Option<LinearScale> {
    let (min, max) = normalize_range(domain.min, domain.max, 1.0).ok()?;
    LinearScale::new(min, max, layout.baseline(), layout.top_padding).ok()
}

fn place(state: &RangeState, scale: LinearScale, alpha: f64, side: LabelSide) -> Vec<VerticalLabel> {
    state
        .label_values
        .iter()
        .zip(&state.labels)
        .enumerate()
        .map(|(position, (value, text))| {
            let alpha = if position == 0 { 1.0 } else { alpha };
            label(*value, text, scale.map(*value as f64), alpha, side)
        })
        .collect()
}

fn label(value: i64, text: &str, y: f64, alpha: f64, side: LabelSide) -> VerticalLabel {
    VerticalLabel {
        value,
        text: text.to_owned(),
        y,
        alpha,
        background_alpha: alpha.min(LABEL_BACKGROUND_MAX_ALPHA),
        side,
    }
}
