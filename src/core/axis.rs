use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One column of the horizontal axis.
///
/// Labels are pre-formatted by the ingestion layer. Two points are equal when
/// they share an index, regardless of labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisPoint {
    pub index: usize,
    pub full_label: String,
    pub short_label: String,
    pub tooltip_label: String,
    pub timestamp: DateTime<Utc>,
}

impl AxisPoint {
    #[must_use]
    pub fn new(
        index: usize,
        full_label: impl Into<String>,
        short_label: impl Into<String>,
        tooltip_label: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            full_label: full_label.into(),
            short_label: short_label.into(),
            tooltip_label: tooltip_label.into(),
            timestamp,
        }
    }

    /// Builds a point with the default day-resolution label formats.
    #[must_use]
    pub fn from_timestamp(index: usize, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            index,
            timestamp.format("%d %B %Y").to_string(),
            timestamp.format("%b %d").to_string(),
            timestamp.format("%a, %d %b %Y").to_string(),
            timestamp,
        )
    }
}

impl PartialEq for AxisPoint {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for AxisPoint {}

/// Ordered, fixed-length sequence of axis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    points: Vec<AxisPoint>,
}

impl Axis {
    /// Each point's `index` must equal its position.
    pub fn new(points: Vec<AxisPoint>) -> ChartResult<Self> {
        if let Some((position, point)) = points
            .iter()
            .enumerate()
            .find(|(position, point)| point.index != *position)
        {
            return Err(ChartError::InvalidData(format!(
                "axis point at position {position} carries index {}",
                point.index
            )));
        }
        Ok(Self { points })
    }

    pub fn from_timestamps(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> ChartResult<Self> {
        let points = timestamps
            .into_iter()
            .enumerate()
            .map(|(index, timestamp)| AxisPoint::from_timestamp(index, timestamp))
            .collect();
        Self::new(points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AxisPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn points(&self) -> &[AxisPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Axis, AxisPoint};

    #[test]
    fn equality_ignores_labels() {
        let at = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).single().expect("date");
        let a = AxisPoint::new(3, "a", "a", "a", at);
        let b = AxisPoint::new(3, "b", "b", "b", at);
        assert_eq!(a, b);
    }

    #[test]
    fn axis_rejects_out_of_order_indices() {
        let at = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).single().expect("date");
        let points = vec![AxisPoint::from_timestamp(0, at), AxisPoint::from_timestamp(2, at)];
        assert!(Axis::new(points).is_err());
    }

    #[test]
    fn timestamp_labels_use_day_formats() {
        let at = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).single().expect("date");
        let point = AxisPoint::from_timestamp(0, at);
        assert_eq!(point.short_label, "Mar 01");
        assert_eq!(point.full_label, "01 March 2019");
        assert_eq!(point.tooltip_label, "Fri, 01 Mar 2019");
    }
}
