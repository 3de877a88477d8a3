use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Axis, PlotLayout, Transition, TransitionStep, VisibleRange, projection_window};
use crate::error::{ChartError, ChartResult};

fn default_min_visible_labels() -> usize {
    6
}

fn default_fade_duration_ms() -> u64 {
    300
}

fn default_scale_threshold() -> f64 {
    0.8
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalAxisConfig {
    /// Labels that must fit across the plot before the step doubles.
    #[serde(default = "default_min_visible_labels")]
    pub min_visible_labels: usize,
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: u64,
    /// Half-step labels show while the step scale stays at or above this.
    #[serde(default = "default_scale_threshold")]
    pub scale_threshold: f64,
}

impl Default for HorizontalAxisConfig {
    fn default() -> Self {
        Self {
            min_visible_labels: default_min_visible_labels(),
            fade_duration_ms: default_fade_duration_ms(),
            scale_threshold: default_scale_threshold(),
        }
    }
}

impl HorizontalAxisConfig {
    pub fn validate(self) -> ChartResult<()> {
        if self.min_visible_labels == 0 {
            return Err(ChartError::InvalidConfig(
                "horizontal axis `min_visible_labels` must be >= 1".to_owned(),
            ));
        }
        if !self.scale_threshold.is_finite() || !(0.0..=1.0).contains(&self.scale_threshold) {
            return Err(ChartError::InvalidConfig(
                "horizontal axis `scale_threshold` must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// How axis indices map to x: onto points (line charts) or column centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPlacement {
    Points,
    Columns,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalTick {
    pub index: usize,
    pub x: f64,
    pub alpha: f64,
    pub label: String,
}

/// Picks which date labels to show: every `step`-th index at full opacity,
/// half-step indices crossfading in and out as the window zooms.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalAxisEngine {
    config: HorizontalAxisConfig,
    visible: Option<VisibleRange>,
    layout: Option<PlotLayout>,
    placement: TickPlacement,
    step: usize,
    scale: f64,
    half_step_alpha: f64,
    fade: Option<Transition<f64>>,
}

impl HorizontalAxisEngine {
    pub fn new(config: HorizontalAxisConfig, placement: TickPlacement) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            visible: None,
            layout: None,
            placement,
            step: 0,
            scale: 1.0,
            half_step_alpha: 1.0,
            fade: None,
        })
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn half_step_alpha(&self) -> f64 {
        self.half_step_alpha
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.fade.is_some()
    }

    pub fn update(&mut self, visible: VisibleRange, layout: PlotLayout) {
        self.visible = Some(visible);
        self.layout = Some(layout);

        let step_fraction = visible.item_count() / self.config.min_visible_labels as f64;
        if !step_fraction.is_finite() {
            return;
        }
        let step = (step_fraction.ceil().max(1.0) as usize).next_power_of_two();
        let scale = if step == 1 {
            1.0
        } else {
            (step as f64 - step_fraction) / (step as f64 / 2.0)
        };
        let threshold = self.config.scale_threshold;
        let show_half = scale >= threshold;

        if step != self.step {
            self.fade = None;
            self.half_step_alpha = if show_half { 1.0 } else { 0.0 };
            trace!(step, scale, "horizontal step changed");
        } else if (self.scale >= threshold) != show_half {
            let target = if show_half { 1.0 } else { 0.0 };
            let from = self
                .fade
                .take()
                .map_or(self.half_step_alpha, Transition::cancel);
            self.fade = Some(Transition::new(
                from,
                target,
                Duration::from_millis(self.config.fade_duration_ms),
            ));
        }
        self.step = step;
        self.scale = scale;
    }

    /// Drives the half-step fade to an absolute fraction.
    pub fn tick(&mut self, elapsed_fraction: f64) {
        let step = self.fade.as_mut().and_then(|fade| fade.set_fraction(elapsed_fraction));
        self.apply(step);
    }

    pub fn advance(&mut self, delta: Duration) {
        let step = self.fade.as_mut().and_then(|fade| fade.advance(delta));
        self.apply(step);
    }

    fn apply(&mut self, step: Option<TransitionStep<f64>>) {
        match step {
            Some(TransitionStep::Running { value, .. }) => self.half_step_alpha = value,
            Some(TransitionStep::Completed(value)) => {
                self.half_step_alpha = value;
                self.fade = None;
            }
            None => {}
        }
    }

    /// Labels to draw for the last `update`, including a one-label margin on
    /// each side.
    #[must_use]
    pub fn ticks(&self, axis: &Axis) -> Vec<HorizontalTick> {
        let (Some(visible), Some(layout)) = (self.visible, self.layout) else {
            return Vec::new();
        };
        if self.step == 0 {
            return Vec::new();
        }
        let Some(window) = projection_window(visible, axis.len(), self.step) else {
            return Vec::new();
        };
        let (origin, per_item) = match self.placement {
            TickPlacement::Points => {
                let span = visible.span();
                if span <= 0.0 {
                    return Vec::new();
                }
                (layout.left_edge(), layout.drawable_width() / span)
            }
            TickPlacement::Columns => {
                let per_item = layout.drawable_width() / visible.item_count();
                (layout.left_edge() + per_item / 2.0, per_item)
            }
        };
        let half = self.step / 2;

        window
            .indices()
            .filter_map(|index| {
                let alpha = if index % self.step == 0 {
                    1.0
                } else if half > 0 && index % half == 0 {
                    self.half_step_alpha
                } else {
                    return None;
                };
                if alpha <= 0.0 {
                    return None;
                }
                let point = axis.get(index)?;
                Some(HorizontalTick {
                    index,
                    x: origin + (index as f64 - visible.left) * per_item,
                    alpha,
                    label: point.short_label.clone(),
                })
            })
            .collect()
    }
}
