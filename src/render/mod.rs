mod frame;
mod null_renderer;
mod primitives;

pub use frame::{RenderFrame, RenderSurface};
pub use null_renderer::{FrameStats, NullRenderer};
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` per surface, so drawing
/// code never touches navigation, range or selection state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
