use tracing::{debug, trace, warn};

use crate::core::{PixelRect, ViewportBounds, VisibleRange};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{NavigationState, NavigatorConfig};

/// Notifications produced by one controller input, in delivery order:
/// `state` first, then `bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigationUpdate {
    pub state: Option<NavigationState>,
    pub bounds: Option<VisibleRange>,
}

impl NavigationUpdate {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.state.is_none() && self.bounds.is_none()
    }

    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            state: later.state.or(self.state),
            bounds: later.bounds.or(self.bounds),
        }
    }
}

/// Navigator overlay rectangles in navigator pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorOverlay {
    /// Dimmed area left of the window.
    pub left_shade: PixelRect,
    /// Dimmed area right of the window.
    pub right_shade: PixelRect,
    pub left_handle: PixelRect,
    pub right_handle: PixelRect,
    pub top_bar: PixelRect,
    pub bottom_bar: PixelRect,
}

/// Gesture state machine owning the navigator window.
///
/// Bounds are stored with an exclusive right edge; every value handed out
/// through [`NavigationUpdate`] or [`ViewportController::visible_range`] is
/// already converted to the inclusive form.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    config: NavigatorConfig,
    item_count: usize,
    bounds: ViewportBounds,
    state: NavigationState,
    selection_anchor_px: f64,
    last_pointer_x: Option<f64>,
}

impl ViewportController {
    /// Starts on the first half of the axis (widened to the zoom floor).
    pub fn new(config: NavigatorConfig, item_count: usize) -> ChartResult<Self> {
        config.validate()?;
        if item_count < 2 {
            return Err(ChartError::InvalidData(format!(
                "navigator needs at least two axis points, got {item_count}"
            )));
        }
        let mut controller = Self {
            config,
            item_count,
            bounds: ViewportBounds::new(0.0, 0.0),
            state: NavigationState::Idle,
            selection_anchor_px: 0.0,
            last_pointer_x: None,
        };
        let size = item_count as f64;
        let right = (size / 2.0).max(controller.min_visible()).min(size);
        controller.bounds = ViewportBounds::new(0.0, right);
        Ok(controller)
    }

    #[must_use]
    pub fn config(&self) -> NavigatorConfig {
        self.config
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[must_use]
    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Raw window, exclusive right edge. Round-trips through `set_bounds`.
    #[must_use]
    pub fn bounds(&self) -> ViewportBounds {
        self.bounds
    }

    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        self.bounds.to_visible_range()
    }

    /// Zoom floor in items, never wider than the axis.
    #[must_use]
    pub fn min_visible(&self) -> f64 {
        self.config.min_visible_items.min(self.item_count) as f64
    }

    /// Navigator width of one axis item.
    #[must_use]
    pub fn element_width(&self) -> f64 {
        self.config.drawable_width() / self.item_count as f64
    }

    /// Navigator pixel of an index-space position.
    #[must_use]
    pub fn position_px(&self, index: f64) -> f64 {
        self.config.padding_horizontal_px + index * self.element_width()
    }

    /// Resizes the strip; bounds stay in index space.
    pub fn set_width(&mut self, width_px: f64) -> ChartResult<()> {
        let config = self.config.with_width(width_px);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: ViewportBounds) -> ChartResult<NavigationUpdate> {
        bounds.validate(self.item_count, self.min_visible())?;
        Ok(NavigationUpdate {
            state: None,
            bounds: self.apply_bounds(bounds),
        })
    }

    /// Classifies the gesture by where it lands; bounds only move on
    /// subsequent pointer moves.
    pub fn on_pointer_down(&mut self, x: f64) -> NavigationUpdate {
        let Some(x) = self.clamp_pointer(x) else {
            return NavigationUpdate::default();
        };
        self.last_pointer_x = Some(x);

        let next = self.classify(x);
        if next == NavigationState::MovingSelection {
            self.selection_anchor_px = x - self.bounds.left * self.element_width();
        }
        NavigationUpdate {
            state: self.set_state(next),
            bounds: None,
        }
    }

    pub fn on_pointer_move(&mut self, x: f64) -> NavigationUpdate {
        let Some(x) = self.clamp_pointer(x) else {
            return NavigationUpdate::default();
        };
        if self.last_pointer_x == Some(x) {
            trace!(x, "navigator move ignored: same position");
            return NavigationUpdate::default();
        }
        self.last_pointer_x = Some(x);

        let bounds = match self.state {
            NavigationState::Idle => return NavigationUpdate::default(),
            NavigationState::MovingLeftBound => self.left_bound_at(x),
            NavigationState::MovingRightBound => self.right_bound_at(x),
            NavigationState::MovingSelection => self.window_at(x),
        };
        NavigationUpdate {
            state: None,
            bounds: self.apply_bounds(bounds),
        }
    }

    pub fn on_pointer_up(&mut self) -> NavigationUpdate {
        self.last_pointer_x = None;
        NavigationUpdate {
            state: self.set_state(NavigationState::Idle),
            bounds: None,
        }
    }

    #[must_use]
    pub fn overlay(&self) -> NavigatorOverlay {
        let handle = self.config.handle_width_px;
        let height = self.config.height_px;
        let bar = self.config.frame_bar_px.min(height / 2.0);
        let left_px = self.position_px(self.bounds.left);
        let right_px = self.position_px(self.bounds.right);
        let start = self.config.padding_horizontal_px;
        let end = self.config.width_px - self.config.padding_horizontal_px;

        NavigatorOverlay {
            left_shade: PixelRect::new(start, 0.0, left_px.max(start), height),
            right_shade: PixelRect::new(right_px.min(end), 0.0, end, height),
            left_handle: PixelRect::new(left_px, 0.0, left_px + handle, height),
            right_handle: PixelRect::new(right_px - handle, 0.0, right_px, height),
            top_bar: PixelRect::new(left_px + handle, 0.0, right_px - handle, bar),
            bottom_bar: PixelRect::new(left_px + handle, height - bar, right_px - handle, height),
        }
    }

    fn clamp_pointer(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            warn!(x, "navigator pointer ignored: non-finite coordinate");
            return None;
        }
        let start = self.config.padding_horizontal_px;
        let end = self.config.width_px - self.config.padding_horizontal_px;
        Some(x.clamp(start, end))
    }

    fn classify(&self, x: f64) -> NavigationState {
        let handle = self.config.handle_width_px;
        let size = self.item_count as f64;
        let left_px = self.position_px(self.bounds.left);
        let right_px = self.position_px(self.bounds.right);

        if left_px >= x && self.bounds.left <= 0.0 {
            return NavigationState::MovingLeftBound;
        }
        if right_px <= x && self.bounds.right >= size {
            return NavigationState::MovingRightBound;
        }
        if x <= left_px + handle {
            return NavigationState::MovingLeftBound;
        }
        if x >= right_px - handle {
            return NavigationState::MovingRightBound;
        }
        if self.config.inches(right_px - left_px) <= self.config.selection_drag_threshold_in {
            return NavigationState::MovingSelection;
        }
        if self.config.inches(x - left_px) <= self.config.handle_slop_in {
            return NavigationState::MovingLeftBound;
        }
        if self.config.inches(right_px - x) <= self.config.handle_slop_in {
            return NavigationState::MovingRightBound;
        }
        NavigationState::MovingSelection
    }

    fn left_bound_at(&self, x: f64) -> ViewportBounds {
        let handle = self.config.handle_width_px;
        let right_px = self.position_px(self.bounds.right);
        let x = x.min(right_px - 3.0 * handle);
        let left = ((x - self.config.padding_horizontal_px - handle / 2.0) / self.element_width())
            .max(0.0)
            .min(self.bounds.right);
        self.with_floor(left, self.bounds.right, Anchor::Left)
    }

    fn right_bound_at(&self, x: f64) -> ViewportBounds {
        let handle = self.config.handle_width_px;
        let left_px = self.position_px(self.bounds.left);
        let x = x.max(left_px + 3.0 * handle);
        let right = ((x - self.config.padding_horizontal_px + handle / 2.0) / self.element_width())
            .min(self.item_count as f64)
            .max(self.bounds.left);
        self.with_floor(self.bounds.left, right, Anchor::Right)
    }

    fn window_at(&self, x: f64) -> ViewportBounds {
        let size = self.item_count as f64;
        let width = self.bounds.width();
        let mut left = ((x - self.selection_anchor_px) / self.element_width()).max(0.0);
        let mut right = left + width;
        if right > size {
            right = size;
            left = (size - width).max(0.0);
        }
        ViewportBounds::new(left, right)
    }

    /// Enforces the zoom floor by pushing the bound that is not being dragged.
    fn with_floor(&self, left: f64, right: f64, anchor: Anchor) -> ViewportBounds {
        let floor = self.min_visible();
        if right - left >= floor {
            return ViewportBounds::new(left, right);
        }
        let size = self.item_count as f64;
        match anchor {
            Anchor::Left => {
                let right = (left + floor).min(size);
                ViewportBounds::new((right - floor).max(0.0), right)
            }
            Anchor::Right => {
                let left = (right - floor).max(0.0);
                ViewportBounds::new(left, (left + floor).min(size))
            }
        }
    }

    fn apply_bounds(&mut self, bounds: ViewportBounds) -> Option<VisibleRange> {
        if bounds == self.bounds {
            return None;
        }
        self.bounds = bounds;
        let published = bounds.to_visible_range();
        debug!(
            left = published.left,
            right = published.right,
            state = ?self.state,
            "navigator bounds changed"
        );
        Some(published)
    }

    fn set_state(&mut self, state: NavigationState) -> Option<NavigationState> {
        if self.state == state {
            return None;
        }
        debug!(from = ?self.state, to = ?state, "navigator state changed");
        self.state = state;
        Some(state)
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::ViewportController;
    use crate::core::ViewportBounds;
    use crate::interaction::{NavigationState, NavigatorConfig};

    fn controller(item_count: usize) -> ViewportController {
        ViewportController::new(NavigatorConfig::default(), item_count).expect("controller")
    }

    #[test]
    fn starts_idle_on_first_half() {
        let controller = controller(365);
        assert_eq!(controller.state(), NavigationState::Idle);
        assert_eq!(controller.bounds(), ViewportBounds::new(0.0, 182.5));
        assert_eq!(controller.visible_range().right, 181.5);
    }

    #[test]
    fn short_axis_starts_at_the_floor() {
        let controller = controller(8);
        assert_eq!(controller.bounds(), ViewportBounds::new(0.0, 6.0));
    }

    #[test]
    fn pointer_up_returns_to_idle_once() {
        let mut controller = controller(365);
        let down = controller.on_pointer_down(100.0);
        assert!(down.state.is_some());
        assert_eq!(controller.on_pointer_up().state, Some(NavigationState::Idle));
        assert!(controller.on_pointer_up().is_empty());
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut controller = controller(365);
        assert!(controller.on_pointer_down(f64::NAN).is_empty());
        assert_eq!(controller.state(), NavigationState::Idle);
    }

    #[test]
    fn overlay_handles_sit_on_window_edges() {
        let controller = controller(365);
        let overlay = controller.overlay();
        let left_px = controller.position_px(0.0);
        assert_eq!(overlay.left_handle.left, left_px);
        assert_eq!(overlay.left_shade.width(), 0.0);
        assert!(overlay.right_handle.right > overlay.left_handle.right);
        assert_eq!(overlay.right_shade.right, 360.0 - 16.0);
    }
}
