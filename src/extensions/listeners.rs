use serde::{Deserialize, Serialize};

use crate::core::{SeriesId, VisibleRange};
use crate::interaction::NavigationState;

/// Read-only engine state passed along with every event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListenerContext {
    pub visible_range: VisibleRange,
    pub navigation_state: NavigationState,
    pub selected_index: Option<usize>,
    pub visible_series: usize,
    pub item_count: usize,
}

/// Notifications delivered to hosts.
///
/// When one input produces both, `NavigationStateChanged` is delivered before
/// `BoundsChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    NavigationStateChanged { state: NavigationState },
    BoundsChanged { range: VisibleRange },
    SelectionChanged { index: Option<usize> },
    SeriesVisibilityChanged { series: SeriesId, visible: bool },
    Rendered,
}

/// Observer of chart notifications, e.g. legend text or a tooltip overlay.
///
/// Listeners observe events and read context; they cannot reach engine
/// internals.
pub trait ChartListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent, context: ListenerContext);
}
