use serde::{Deserialize, Serialize};

use crate::core::{Axis, Series, SeriesId, SeriesTable};
use crate::error::{ChartError, ChartResult};

/// Chart kinds with their own aggregation and projection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartVariant {
    Line,
    DualScaledLine,
    Stacked,
    Bar,
    PercentageStacked,
}

impl ChartVariant {
    /// Whether the value domain is pinned to zero at the bottom.
    #[must_use]
    pub fn starts_from_zero(self) -> bool {
        !matches!(self, Self::Line | Self::DualScaledLine)
    }

    #[must_use]
    pub fn is_line(self) -> bool {
        matches!(self, Self::Line | Self::DualScaledLine)
    }

    /// Number of independent value scales.
    #[must_use]
    pub fn track_count(self) -> usize {
        match self {
            Self::DualScaledLine => 2,
            _ => 1,
        }
    }
}

/// Immutable chart payload produced by the ingestion layer.
///
/// Only series visibility changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    title: String,
    axis: Axis,
    series: SeriesTable,
    variant: ChartVariant,
    details_key: Option<String>,
}

impl ChartDataset {
    pub fn new(
        title: impl Into<String>,
        axis: Axis,
        series: Vec<Series>,
        variant: ChartVariant,
    ) -> ChartResult<Self> {
        if axis.len() < 2 {
            return Err(ChartError::InvalidData(format!(
                "axis must carry at least two points, got {}",
                axis.len()
            )));
        }
        if series.is_empty() {
            return Err(ChartError::InvalidData(
                "dataset must carry at least one series".to_owned(),
            ));
        }
        for entry in &series {
            if entry.len() != axis.len() {
                return Err(ChartError::LengthMismatch {
                    series: entry.title().to_owned(),
                    expected: axis.len(),
                    actual: entry.len(),
                });
            }
        }
        if variant == ChartVariant::DualScaledLine && series.len() != 2 {
            return Err(ChartError::InvalidData(format!(
                "dual-scaled chart needs exactly two series, got {}",
                series.len()
            )));
        }
        if variant == ChartVariant::PercentageStacked
            && series.iter().flat_map(Series::values).any(|value| *value < 0)
        {
            return Err(ChartError::InvalidData(
                "percentage chart values must be non-negative".to_owned(),
            ));
        }

        Ok(Self {
            title: title.into(),
            axis,
            series: SeriesTable::new(series),
            variant,
            details_key: None,
        })
    }

    /// Key used by hosts to look up drill-down data for a selected point.
    #[must_use]
    pub fn with_details_key(mut self, details_key: impl Into<String>) -> Self {
        self.details_key = Some(details_key.into());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    #[must_use]
    pub fn series(&self) -> &SeriesTable {
        &self.series
    }

    #[must_use]
    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    #[must_use]
    pub fn details_key(&self) -> Option<&str> {
        self.details_key.as_deref()
    }

    /// Number of axis points (`N`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    pub fn set_series_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<bool> {
        self.series.set_visible(id, visible)
    }

    /// Applies a full visibility list, e.g. from persisted state.
    pub fn apply_visibility(&mut self, visibility: &[bool]) -> ChartResult<()> {
        if visibility.len() != self.series.len() {
            return Err(ChartError::VisibilityMismatch {
                expected: self.series.len(),
                actual: visibility.len(),
            });
        }
        for (position, visible) in visibility.iter().enumerate() {
            self.series.set_visible(SeriesId(position), *visible)?;
        }
        Ok(())
    }
}
