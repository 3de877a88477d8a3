use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ChartDataset, ChartVariant, SeriesId};
use crate::plot::PlotGeometry;

/// Values of every visible series at the selected index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub index: usize,
    /// Device x of the selected column.
    pub x: f64,
    pub title: String,
    pub values: IndexMap<SeriesId, i64>,
    pub coords_y: IndexMap<SeriesId, f64>,
    /// Filled for percentage charts only.
    pub percentages: IndexMap<SeriesId, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Selected(usize),
    /// Hide the selection UI.
    Cleared,
    /// Queued until the first projection provides coordinates.
    Deferred(usize),
}

/// Resolves pointer positions to data indices against the last projection.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    geometry: Option<PlotGeometry>,
    snapshot: Option<SelectionSnapshot>,
    pending_index: Option<usize>,
    rebuilds: u64,
}

impl SelectionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.index)
            .or(self.pending_index)
    }

    #[must_use]
    pub fn pending_index(&self) -> Option<usize> {
        self.pending_index
    }

    /// Number of snapshots assembled so far.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&PlotGeometry> {
        self.geometry.as_ref()
    }

    pub fn select_at_x(&mut self, x: f64, dataset: &ChartDataset) -> SelectionChange {
        if !x.is_finite() {
            warn!(x, "selection ignored: non-finite pointer coordinate");
            return SelectionChange::Unchanged;
        }
        let Some(geometry) = self.geometry.as_ref() else {
            return SelectionChange::Unchanged;
        };
        let Some(first) = dataset.series().first_visible() else {
            return self.clear();
        };
        let Some(track) = geometry.track(first.id()) else {
            return self.clear();
        };

        let left = geometry.visible.first_index();
        let (Some(origin), Some(next)) = (track.x_at(left), track.x_at(left + 1)) else {
            return self.clear();
        };
        let step = next - origin;
        if !step.is_finite() || step <= 0.0 {
            return self.clear();
        }

        let resolved = ((x - origin) / step).round() + left as f64;
        if resolved < 0.0 || resolved >= dataset.len() as f64 {
            return self.clear();
        }
        let mut index = resolved as usize;
        let width = geometry.layout.viewport.width;
        match track.x_at(index) {
            Some(px) if px < 0.0 => index += 1,
            Some(px) if px > width => index = index.saturating_sub(1),
            Some(_) => {}
            None => return self.clear(),
        }
        let Some(px) = track.x_at(index) else {
            return self.clear();
        };

        if self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.index == index && snapshot.x == px)
        {
            trace!(index, "selection unchanged");
            return SelectionChange::Unchanged;
        }
        self.build(index, px, dataset)
    }

    /// Selects by index, deferring until coordinates exist.
    pub fn select_at_index(&mut self, index: usize, dataset: &ChartDataset) -> SelectionChange {
        if index >= dataset.len() {
            warn!(index, size = dataset.len(), "selection index out of range");
            return self.clear();
        }
        let px = self.geometry.as_ref().and_then(|geometry| {
            let first = dataset.series().first_visible()?;
            geometry.track(first.id())?.x_at(index)
        });
        match px {
            Some(px) => {
                if self
                    .snapshot
                    .as_ref()
                    .is_some_and(|snapshot| snapshot.index == index && snapshot.x == px)
                {
                    return SelectionChange::Unchanged;
                }
                self.build(index, px, dataset)
            }
            None => {
                debug!(index, "selection deferred until projected");
                self.snapshot = None;
                self.pending_index = Some(index);
                SelectionChange::Deferred(index)
            }
        }
    }

    /// Drops the snapshot and re-resolves `index` on the next projection.
    pub fn defer(&mut self, index: usize) {
        self.snapshot = None;
        self.pending_index = Some(index);
    }

    pub fn clear(&mut self) -> SelectionChange {
        let had_selection = self.snapshot.take().is_some() | self.pending_index.take().is_some();
        if had_selection {
            debug!("selection cleared");
            SelectionChange::Cleared
        } else {
            SelectionChange::Unchanged
        }
    }

    /// Takes the newest projection. Resolves a deferred index and refreshes
    /// the coordinates of the current snapshot.
    pub fn on_geometry_updated(&mut self, geometry: PlotGeometry, dataset: &ChartDataset) -> SelectionChange {
        self.geometry = Some(geometry);
        if let Some(index) = self.pending_index.take() {
            return match self.select_at_index(index, dataset) {
                SelectionChange::Deferred(_) => SelectionChange::Unchanged,
                change => change,
            };
        }
        self.refresh_coordinates(dataset);
        SelectionChange::Unchanged
    }

    fn refresh_coordinates(&mut self, dataset: &ChartDataset) {
        let (Some(snapshot), Some(geometry)) = (self.snapshot.as_mut(), self.geometry.as_ref()) else {
            return;
        };
        let index = snapshot.index;
        if let Some(x) = dataset
            .series()
            .first_visible()
            .and_then(|first| geometry.track(first.id()))
            .and_then(|track| track.x_at(index))
        {
            snapshot.x = x;
        }
        for (id, y) in snapshot.coords_y.iter_mut() {
            if let Some(fresh) = geometry.track(*id).and_then(|track| track.y_at(index)) {
                *y = fresh;
            }
        }
    }

    fn build(&mut self, index: usize, x: f64, dataset: &ChartDataset) -> SelectionChange {
        let mut values = IndexMap::new();
        let mut coords_y = IndexMap::new();
        for series in dataset.series().visible() {
            let Some(value) = series.value(index) else {
                continue;
            };
            values.insert(series.id(), value);
            if let Some(y) = self
                .geometry
                .as_ref()
                .and_then(|geometry| geometry.track(series.id()))
                .and_then(|track| track.y_at(index))
            {
                coords_y.insert(series.id(), y);
            }
        }
        if values.is_empty() {
            return self.clear();
        }

        let percentages = if dataset.variant() == ChartVariant::PercentageStacked {
            percentages_of(&values)
        } else {
            IndexMap::new()
        };
        let title = dataset
            .axis()
            .get(index)
            .map(|point| point.tooltip_label.clone())
            .unwrap_or_default();

        self.rebuilds += 1;
        self.pending_index = None;
        debug!(index, x, series = values.len(), "selection rebuilt");
        self.snapshot = Some(SelectionSnapshot {
            index,
            x,
            title,
            values,
            coords_y,
            percentages,
        });
        SelectionChange::Selected(index)
    }
}

/// Rounded shares in percent. Half-up rounding per series, then the largest
/// remainders absorb any drift beyond one point so the total stays within
/// `99..=101`.
#[must_use]
pub fn percentages_of(values: &IndexMap<SeriesId, i64>) -> IndexMap<SeriesId, i64> {
    let sum: i64 = values.values().sum();
    if sum <= 0 {
        return IndexMap::new();
    }
    let exact: Vec<(SeriesId, f64)> = values
        .iter()
        .map(|(id, value)| (*id, *value as f64 * 100.0 / sum as f64))
        .collect();
    let mut rounded: IndexMap<SeriesId, i64> = exact
        .iter()
        .map(|(id, share)| (*id, (share + 0.5).floor() as i64))
        .collect();

    let total: i64 = rounded.values().sum();
    let drift = total - 100;
    if drift.abs() > 1 {
        let mut order: Vec<(SeriesId, f64)> = exact
            .iter()
            .map(|(id, share)| (*id, share - share.floor()))
            .collect();
        order.sort_by_key(|(_, remainder)| std::cmp::Reverse(OrderedFloat(*remainder)));
        let mut floored: IndexMap<SeriesId, i64> = exact
            .iter()
            .map(|(id, share)| (*id, share.floor() as i64))
            .collect();
        let missing = 100 - floored.values().sum::<i64>();
        for (id, _) in order.iter().take(missing.max(0) as usize) {
            if let Some(share) = floored.get_mut(id) {
                *share += 1;
            }
        }
        rounded = floored;
    }
    rounded
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::percentages_of;
    use crate::core::SeriesId;

    #[test]
    fn exact_shares_are_kept() {
        let values: IndexMap<SeriesId, i64> =
            [(SeriesId(0), 30), (SeriesId(1), 20), (SeriesId(2), 50)].into_iter().collect();
        let shares = percentages_of(&values);
        assert_eq!(shares.values().copied().collect::<Vec<_>>(), vec![30, 20, 50]);
    }

    #[test]
    fn many_halves_are_corrected_to_one_hundred() {
        let values: IndexMap<SeriesId, i64> = (0..8).map(|i| (SeriesId(i), 1)).collect();
        let shares = percentages_of(&values);
        let total: i64 = shares.values().sum();
        assert!((99..=101).contains(&total), "total={total}");
    }

    #[test]
    fn zero_sum_has_no_shares() {
        let values: IndexMap<SeriesId, i64> = [(SeriesId(0), 0)].into_iter().collect();
        assert!(percentages_of(&values).is_empty());
    }
}
