use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{SeriesId, ViewportBounds};
use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartEvent;
use crate::render::Renderer;

use super::{ChartEngine, SelectionChange};

pub const VIEW_STATE_JSON_SCHEMA_V1: u32 = 1;

/// Flat persisted state of one chart: window, visibility, selection and the
/// host's scroll position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewState {
    /// Exclusive-right bounds as stored by the navigator.
    pub bounds: ViewportBounds,
    pub visibility: Vec<bool>,
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default)]
    pub scroll_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewStateJsonContractV1 {
    pub schema_version: u32,
    pub state: ChartViewState,
}

impl ChartViewState {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartViewStateJsonContractV1 {
            schema_version: VIEW_STATE_JSON_SCHEMA_V1,
            state: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize view state contract v1: {e}"))
        })
    }

    /// Accepts both the bare state and the versioned contract.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(state) = serde_json::from_str::<ChartViewState>(input) {
            return Ok(state);
        }
        let payload: ChartViewStateJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse view state json payload: {e}"))
        })?;
        if payload.schema_version != VIEW_STATE_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported view state schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.state)
    }
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn view_state(&self) -> ChartViewState {
        ChartViewState {
            bounds: self.navigator.bounds(),
            visibility: self.dataset.series().visibility(),
            selected_index: self.selection.selected_index(),
            scroll_offset: self.scroll_offset,
        }
    }

    /// Re-applies persisted state without animating.
    ///
    /// Every precondition is checked before anything changes. The selection
    /// resolves on the next render.
    pub fn restore_view_state(&mut self, state: &ChartViewState) -> ChartResult<()> {
        let series_count = self.dataset.series().len();
        if state.visibility.len() != series_count {
            return Err(ChartError::VisibilityMismatch {
                expected: series_count,
                actual: state.visibility.len(),
            });
        }
        state
            .bounds
            .validate(self.dataset.len(), self.navigator.min_visible())?;
        if !state.scroll_offset.is_finite() {
            return Err(ChartError::InvalidData(
                "view state scroll offset must be finite".to_owned(),
            ));
        }

        let previous_visibility = self.dataset.series().visibility();
        self.dataset.apply_visibility(&state.visibility)?;
        self.fade = None;
        let update = self.navigator.set_bounds(state.bounds)?;
        self.refresh_targets(false);
        self.refresh_horizontal_axis();
        self.scroll_offset = state.scroll_offset;

        let selection_change = match state.selected_index {
            Some(index) if index < self.dataset.len() && self.has_visible_series() => {
                // The deferred index is announced when it resolves on render.
                let shown = self.selection.snapshot().is_some();
                self.selection.defer(index);
                if shown {
                    SelectionChange::Cleared
                } else {
                    SelectionChange::Unchanged
                }
            }
            Some(index) => {
                warn!(index, size = self.dataset.len(), "stale selection dropped on restore");
                self.selection.clear()
            }
            None => self.selection.clear(),
        };
        debug!(
            left = state.bounds.left,
            right = state.bounds.right,
            selected = ?state.selected_index,
            "view state restored"
        );

        if let Some(range) = update.bounds {
            self.emit_event(ChartEvent::BoundsChanged { range });
        }
        for (position, (before, after)) in previous_visibility
            .iter()
            .zip(&state.visibility)
            .enumerate()
        {
            if before != after {
                self.emit_event(ChartEvent::SeriesVisibilityChanged {
                    series: SeriesId(position),
                    visible: *after,
                });
            }
        }
        self.dispatch_selection(selection_change);
        Ok(())
    }
}
