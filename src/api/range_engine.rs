use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Lerp, Transition, TransitionStep, abbreviate_value, label_values};
use crate::error::{ChartError, ChartResult};

fn default_duration_ms() -> u64 {
    200
}

fn default_snap_threshold() -> f64 {
    0.1
}

fn default_retraction_threshold() -> f64 {
    0.8
}

fn default_label_count() -> usize {
    6
}

/// Interruption policy and timing of value-range animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeAnimationConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Relative max changes below this snap instead of animating.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    /// Ratio between the new and the in-flight target above which a
    /// same-direction update is queued instead of restarting.
    #[serde(default = "default_retraction_threshold")]
    pub retraction_threshold: f64,
    /// Number of vertical labels generated per range.
    #[serde(default = "default_label_count")]
    pub label_count: usize,
}

impl Default for RangeAnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            snap_threshold: default_snap_threshold(),
            retraction_threshold: default_retraction_threshold(),
            label_count: default_label_count(),
        }
    }
}

impl RangeAnimationConfig {
    pub fn validate(self) -> ChartResult<()> {
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(ChartError::InvalidConfig(
                "range `snap_threshold` must be finite and >= 0".to_owned(),
            ));
        }
        if !self.retraction_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.retraction_threshold)
        {
            return Err(ChartError::InvalidConfig(
                "range `retraction_threshold` must be in [0, 1]".to_owned(),
            ));
        }
        if self.label_count == 0 {
            return Err(ChartError::InvalidConfig(
                "range `label_count` must be >= 1".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// A value domain with its derived label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeState {
    pub min: i64,
    pub max: i64,
    pub label_values: Vec<i64>,
    pub labels: Vec<String>,
}

impl RangeState {
    #[must_use]
    pub fn new(min: i64, max: i64, label_count: usize) -> Self {
        let label_values: Vec<i64> = label_values(min, max, label_count).into_vec();
        let labels = label_values.iter().copied().map(abbreviate_value).collect();
        Self {
            min,
            max,
            label_values,
            labels,
        }
    }

    #[must_use]
    pub fn domain(&self) -> RangeDomain {
        RangeDomain {
            min: self.min as f64,
            max: self.max as f64,
        }
    }
}

/// Interpolated `(min, max)` actually used for projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeDomain {
    pub min: f64,
    pub max: f64,
}

impl RangeDomain {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Lerp for RangeDomain {
    fn lerp(self, to: Self, fraction: f64) -> Self {
        Self {
            min: self.min.lerp(to.min, fraction),
            max: self.max.lerp(to.max, fraction),
        }
    }
}

/// What [`RangeEngine::update_target`] decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeUpdate {
    Snapped,
    /// Same as the current or in-flight target.
    Ignored,
    Started,
    /// Applied when the in-flight animation completes.
    Queued,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeTick {
    Idle,
    Running { fraction: f64 },
    Completed,
}

/// Two label sets fading across the same fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelCrossfade<'a> {
    pub outgoing: &'a RangeState,
    pub incoming: &'a RangeState,
    pub fraction: f64,
}

impl LabelCrossfade<'_> {
    #[must_use]
    pub fn outgoing_alpha(&self) -> f64 {
        1.0 - self.fraction
    }

    #[must_use]
    pub fn incoming_alpha(&self) -> f64 {
        self.fraction
    }
}

/// Animated value domain of one vertical scale.
///
/// Holds the settled state (`current` labels), the in-flight target (`next`)
/// and at most one pending target queued while an animation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEngine {
    config: RangeAnimationConfig,
    starts_from_zero: bool,
    settled: Option<RangeState>,
    next: Option<RangeState>,
    animated: RangeDomain,
    transition: Option<Transition<RangeDomain>>,
    pending: Option<(i64, i64)>,
    has_drawn: bool,
}

impl RangeEngine {
    pub fn new(config: RangeAnimationConfig, starts_from_zero: bool) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            starts_from_zero,
            settled: None,
            next: None,
            animated: RangeDomain::new(0.0, 0.0),
            transition: None,
            pending: None,
            has_drawn: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> RangeAnimationConfig {
        self.config
    }

    pub fn update_target(&mut self, min: i64, max: i64) -> RangeUpdate {
        self.update_target_with(min, max, true)
    }

    /// `animate == false` forces a snap, cancelling any in-flight animation.
    pub fn update_target_with(&mut self, min: i64, max: i64, animate: bool) -> RangeUpdate {
        let min = if self.starts_from_zero { 0 } else { min };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };

        if self.settled.is_none() || !self.has_drawn || !animate {
            self.snap(min, max);
            return RangeUpdate::Snapped;
        }

        let target = RangeDomain::new(min as f64, max as f64);
        if self.next.as_ref().is_some_and(|next| next.domain() == target)
            || (self.transition.is_none() && self.animated == target)
        {
            // The newest request wins over anything queued earlier.
            self.pending = None;
            return RangeUpdate::Ignored;
        }

        let current_max = self.animated.max;
        let new_max = max as f64;
        let denominator = current_max.min(new_max);
        let fraction = if denominator > 0.0 {
            (new_max - current_max).abs() / denominator
        } else {
            f64::INFINITY
        };

        if fraction < self.config.snap_threshold {
            if self.transition.is_some() {
                self.queue(min, max);
                return RangeUpdate::Queued;
            }
            self.snap(min, max);
            return RangeUpdate::Snapped;
        }

        let in_flight_max = self
            .transition
            .as_ref()
            .and(self.next.as_ref())
            .map(|next| next.max as f64);
        if in_flight_max.is_some_and(|in_flight| self.continues_in_flight(in_flight, new_max)) {
            self.queue(min, max);
            return RangeUpdate::Queued;
        }

        self.pending = None;
        self.start(min, max);
        RangeUpdate::Started
    }

    /// Drives the in-flight animation to an absolute elapsed fraction.
    pub fn tick(&mut self, elapsed_fraction: f64) -> RangeTick {
        let Some(transition) = self.transition.as_mut() else {
            return RangeTick::Idle;
        };
        let step = transition.set_fraction(elapsed_fraction);
        self.apply_step(step)
    }

    pub fn advance(&mut self, delta: Duration) -> RangeTick {
        let Some(transition) = self.transition.as_mut() else {
            return RangeTick::Idle;
        };
        let step = transition.advance(delta);
        self.apply_step(step)
    }

    /// Stops the animation at its current value. Does not promote the
    /// in-flight target or flush the pending one.
    pub fn cancel(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.animated = transition.cancel();
            self.next = None;
            debug!(
                min = self.animated.min,
                max = self.animated.max,
                "range animation cancelled"
            );
        }
    }

    /// Marks that a frame using this range was drawn; until then every update
    /// snaps.
    pub fn mark_drawn(&mut self) {
        self.has_drawn = true;
    }

    #[must_use]
    pub fn has_drawn(&self) -> bool {
        self.has_drawn
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    #[must_use]
    pub fn pending_target(&self) -> Option<(i64, i64)> {
        self.pending
    }

    #[must_use]
    pub fn settled(&self) -> Option<&RangeState> {
        self.settled.as_ref()
    }

    /// In-flight target, if animating.
    #[must_use]
    pub fn target(&self) -> Option<&RangeState> {
        self.next.as_ref()
    }

    /// Interpolated domain, `None` before the first target.
    #[must_use]
    pub fn domain(&self) -> Option<RangeDomain> {
        self.settled.as_ref().map(|_| self.animated)
    }

    /// What is drawn right now: the interpolated bounds rounded to integers
    /// with the settled label set.
    #[must_use]
    pub fn current(&self) -> Option<RangeState> {
        let settled = self.settled.as_ref()?;
        Some(RangeState {
            min: self.animated.min.round() as i64,
            max: self.animated.max.round() as i64,
            label_values: settled.label_values.clone(),
            labels: settled.labels.clone(),
        })
    }

    #[must_use]
    pub fn label_crossfade(&self) -> Option<LabelCrossfade<'_>> {
        let transition = self.transition.as_ref()?;
        Some(LabelCrossfade {
            outgoing: self.settled.as_ref()?,
            incoming: self.next.as_ref()?,
            fraction: transition.fraction(),
        })
    }

    fn continues_in_flight(&self, in_flight_max: f64, new_max: f64) -> bool {
        let current = self.animated.max;
        let heading = (in_flight_max - current).signum();
        let requested = (new_max - current).signum();
        if heading == 0.0 || heading != requested {
            return false;
        }
        let (low, high) = if in_flight_max <= new_max {
            (in_flight_max, new_max)
        } else {
            (new_max, in_flight_max)
        };
        high > 0.0 && low / high > self.config.retraction_threshold
    }

    fn snap(&mut self, min: i64, max: i64) {
        self.transition = None;
        self.next = None;
        self.pending = None;
        let state = RangeState::new(min, max, self.config.label_count);
        self.animated = state.domain();
        trace!(min, max, "range snapped");
        self.settled = Some(state);
    }

    fn queue(&mut self, min: i64, max: i64) {
        trace!(min, max, "range target queued");
        self.pending = Some((min, max));
    }

    fn start(&mut self, min: i64, max: i64) {
        if let Some(previous) = self.transition.take() {
            self.animated = previous.cancel();
        }
        let next = RangeState::new(min, max, self.config.label_count);
        debug!(
            from_min = self.animated.min,
            from_max = self.animated.max,
            to_min = min,
            to_max = max,
            "range animation started"
        );
        self.transition = Some(Transition::new(
            self.animated,
            next.domain(),
            self.config.duration(),
        ));
        self.next = Some(next);
    }

    fn apply_step(&mut self, step: Option<TransitionStep<RangeDomain>>) -> RangeTick {
        match step {
            None => RangeTick::Idle,
            Some(TransitionStep::Running { value, fraction }) => {
                self.animated = value;
                RangeTick::Running { fraction }
            }
            Some(TransitionStep::Completed(value)) => {
                self.animated = value;
                self.complete();
                RangeTick::Completed
            }
        }
    }

    fn complete(&mut self) {
        self.transition = None;
        if let Some(next) = self.next.take() {
            self.settled = Some(next);
        }
        trace!(
            min = self.animated.min,
            max = self.animated.max,
            "range animation completed"
        );
        if let Some((min, max)) = self.pending.take() {
            self.update_target(min, max);
        }
    }
}
