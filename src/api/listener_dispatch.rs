use tracing::trace;

use crate::extensions::{ChartEvent, ListenerContext};
use crate::render::Renderer;

use super::{ChartEngine, SelectionChange};

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn listener_context(&self) -> ListenerContext {
        ListenerContext {
            visible_range: self.navigator.visible_range(),
            navigation_state: self.navigator.state(),
            selected_index: self.selection.selected_index(),
            visible_series: self.dataset.series().visible_count(),
            item_count: self.dataset.len(),
        }
    }

    pub(super) fn emit_event(&mut self, event: ChartEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let context = self.listener_context();
        trace!(?event, listeners = self.listeners.len(), "dispatching chart event");
        for listener in &mut self.listeners {
            listener.on_event(event, context);
        }
    }

    /// Deferred selections are announced once they resolve.
    pub(super) fn dispatch_selection(&mut self, change: SelectionChange) {
        match change {
            SelectionChange::Selected(index) => {
                self.emit_event(ChartEvent::SelectionChanged { index: Some(index) });
            }
            SelectionChange::Cleared => {
                self.emit_event(ChartEvent::SelectionChanged { index: None });
            }
            SelectionChange::Unchanged | SelectionChange::Deferred(_) => {}
        }
    }
}
