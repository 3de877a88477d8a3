use crate::error::ChartResult;
use crate::render::{RenderFrame, RenderSurface, Renderer};

/// Counts of one validated frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub rects: usize,
    pub lines: usize,
    pub circles: usize,
    pub texts: usize,
}

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests catch non-finite geometry, and
/// keeps the last frame per surface for inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_plot: Option<RenderFrame>,
    pub last_navigator: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn plot_stats(&self) -> FrameStats {
        self.last_plot.as_ref().map(stats).unwrap_or_default()
    }

    #[must_use]
    pub fn navigator_stats(&self) -> FrameStats {
        self.last_navigator.as_ref().map(stats).unwrap_or_default()
    }
}

fn stats(frame: &RenderFrame) -> FrameStats {
    FrameStats {
        rects: frame.rects.len(),
        lines: frame.lines.len(),
        circles: frame.circles.len(),
        texts: frame.texts.len(),
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        match frame.surface {
            RenderSurface::Plot => self.last_plot = Some(frame.clone()),
            RenderSurface::Navigator => self.last_navigator = Some(frame.clone()),
        }
        Ok(())
    }
}
