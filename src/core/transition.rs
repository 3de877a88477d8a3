use std::time::Duration;

/// Values a [`Transition`] can interpolate.
pub trait Lerp: Copy {
    #[must_use]
    fn lerp(self, to: Self, fraction: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, fraction: f64) -> Self {
        if fraction >= 1.0 {
            return to;
        }
        self + (to - self) * fraction
    }
}

/// Outcome of driving a transition forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep<T> {
    Running { value: T, fraction: f64 },
    /// Reported once, on the step that reaches fraction 1.0.
    Completed(T),
}

/// Fixed-duration linear interpolation between two values.
///
/// Completion and cancellation are separate paths: driving the transition to
/// fraction 1.0 yields [`TransitionStep::Completed`] exactly once, while
/// [`Transition::cancel`] consumes it and returns the last interpolated value
/// without completing.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T: Lerp> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    fraction: f64,
    completed: bool,
}

impl<T: Lerp> Transition<T> {
    #[must_use]
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            fraction: 0.0,
            completed: false,
        }
    }

    #[must_use]
    pub fn from(&self) -> T {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> T {
        self.to
    }

    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    #[must_use]
    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.fraction)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Jumps to an absolute elapsed fraction; values outside `[0, 1]` clamp.
    /// Fractions below the current one are ignored so values never retreat.
    pub fn set_fraction(&mut self, fraction: f64) -> Option<TransitionStep<T>> {
        if self.completed {
            return None;
        }
        let fraction = if fraction.is_nan() {
            self.fraction
        } else {
            fraction.clamp(0.0, 1.0).max(self.fraction)
        };
        self.fraction = fraction;
        self.elapsed = self.duration.mul_f64(fraction);
        Some(self.step())
    }

    /// Advances by wall-clock time. A zero duration completes immediately.
    pub fn advance(&mut self, delta: Duration) -> Option<TransitionStep<T>> {
        if self.completed {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        self.fraction = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        Some(self.step())
    }

    /// Stops the transition where it is and returns that value.
    #[must_use]
    pub fn cancel(self) -> T {
        self.value()
    }

    fn step(&mut self) -> TransitionStep<T> {
        if self.fraction >= 1.0 {
            self.completed = true;
            TransitionStep::Completed(self.to)
        } else {
            TransitionStep::Running {
                value: self.value(),
                fraction: self.fraction,
            }
        }
    }
}
