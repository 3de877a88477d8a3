use smallvec::smallvec;

use crate::core::{ChartDataset, ChartVariant, VisibleRange};
use crate::error::ChartResult;
use crate::plot::stacked::{ColumnHeights, ColumnInput, project_columns};
use crate::plot::{PlotContext, PlotGeometry, PlotRenderer, TrackDomains};
use crate::render::RenderFrame;

/// Columns normalized so the drawn series always fill the full height.
///
/// The series fading in or out takes part in each column sum with its
/// opacity as weight, so the other segments resize smoothly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentagePlot;

impl PlotRenderer for PercentagePlot {
    fn variant(&self) -> ChartVariant {
        ChartVariant::PercentageStacked
    }

    fn target_domains(&self, dataset: &ChartDataset, _visible: VisibleRange) -> TrackDomains {
        let domain = dataset.series().first_visible().map(|_| (0, 100));
        smallvec![domain]
    }

    fn project(&self, ctx: &PlotContext<'_>, frame: &mut RenderFrame) -> ChartResult<PlotGeometry> {
        ctx.layout.validate()?;
        if ctx.domain(0).is_none() && ctx.fade.is_none() {
            return Ok(PlotGeometry::empty(ctx.layout, ctx.visible));
        }
        let height = ctx.layout.drawable_height();
        Ok(project_columns(ctx, frame, |_, weighted| {
            column_shares(weighted)
                .into_iter()
                .map(|share| share * height)
                .collect()
        }))
    }
}

/// Share of each weighted value in its column; empty when the sum is zero.
pub(crate) fn column_shares(weighted: &ColumnInput) -> ColumnHeights {
    let sum: f64 = weighted.iter().map(|(_, value)| value).sum();
    if !sum.is_finite() || sum <= 0.0 {
        return ColumnHeights::new();
    }
    weighted.iter().map(|(_, value)| value / sum).collect()
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::column_shares;
    use crate::core::SeriesId;
    use crate::plot::stacked::ColumnInput;

    #[test]
    fn shares_fill_the_column() {
        let input: ColumnInput = smallvec![
            (SeriesId(0), 30.0),
            (SeriesId(1), 20.0),
            (SeriesId(2), 50.0)
        ];
        let shares = column_shares(&input);
        assert_eq!(shares.as_slice(), &[0.3, 0.2, 0.5]);
    }

    #[test]
    fn zero_sum_draws_nothing() {
        let input: ColumnInput = smallvec![(SeriesId(0), 0.0), (SeriesId(1), 0.0)];
        assert!(column_shares(&input).is_empty());
    }
}
