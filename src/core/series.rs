use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Stable handle of a series inside its dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub usize);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One plotted column of integer values.
///
/// `min`/`max` are computed once from `values`; values never change after
/// construction, only the visibility flag does.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: SeriesId,
    title: String,
    color: Color,
    original_color: Color,
    values: Vec<i64>,
    visible: bool,
    min: i64,
    max: i64,
}

impl Series {
    #[must_use]
    pub fn new(title: impl Into<String>, color: Color, values: Vec<i64>) -> Self {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        Self {
            id: SeriesId(0),
            title: title.into(),
            color,
            original_color: color,
            values,
            visible: true,
            min,
            max,
        }
    }

    /// Keeps the color declared by the data source when `color` was themed.
    #[must_use]
    pub fn with_original_color(mut self, original_color: Color) -> Self {
        self.original_color = original_color;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn original_color(&self) -> Color {
        self.original_color
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Arena of series addressed by [`SeriesId`]; ids are arena positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesTable {
    entries: Vec<Series>,
}

impl SeriesTable {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        let entries = series
            .into_iter()
            .enumerate()
            .map(|(position, mut series)| {
                series.id = SeriesId(position);
                series
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: SeriesId) -> Option<&Series> {
        self.entries.get(id.0)
    }

    pub fn require(&self, id: SeriesId) -> ChartResult<&Series> {
        self.get(id).ok_or(ChartError::UnknownSeries(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.entries.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Series> {
        self.entries.iter().filter(|series| series.visible)
    }

    #[must_use]
    pub fn first_visible(&self) -> Option<&Series> {
        self.visible().next()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    #[must_use]
    pub fn visibility(&self) -> Vec<bool> {
        self.entries.iter().map(Series::is_visible).collect()
    }

    /// Returns whether the flag actually changed.
    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<bool> {
        let series = self
            .entries
            .get_mut(id.0)
            .ok_or(ChartError::UnknownSeries(id))?;
        let changed = series.visible != visible;
        series.visible = visible;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::{Series, SeriesId, SeriesTable};
    use crate::render::Color;

    #[test]
    fn min_and_max_are_cached_at_construction() {
        let series = Series::new("a", Color::rgb(1.0, 0.0, 0.0), vec![4, -2, 9, 3]);
        assert_eq!(series.min(), -2);
        assert_eq!(series.max(), 9);
    }

    #[test]
    fn table_assigns_positional_ids_and_tracks_visibility() {
        let color = Color::rgb(0.0, 0.0, 1.0);
        let mut table = SeriesTable::new(vec![
            Series::new("a", color, vec![1]),
            Series::new("b", color, vec![2]).hidden(),
        ]);
        assert_eq!(table.get(SeriesId(1)).map(Series::title), Some("b"));
        assert_eq!(table.visible_count(), 1);
        assert!(table.set_visible(SeriesId(1), true).expect("known id"));
        assert!(!table.set_visible(SeriesId(1), true).expect("known id"));
        assert!(table.set_visible(SeriesId(7), true).is_err());
        assert_eq!(table.visibility(), vec![true, true]);
    }
}
