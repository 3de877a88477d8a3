use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

fn default_deadzone_px() -> f64 {
    10.0
}

fn default_vertical_bias() -> f64 {
    1.0
}

/// Tuning for telling a horizontal chart drag from a vertical page scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollIntentConfig {
    /// Travel (either axis) below which no decision is made.
    #[serde(default = "default_deadzone_px")]
    pub deadzone_px: f64,
    /// Vertical travel must exceed horizontal travel times this factor for the
    /// gesture to be released to the page.
    #[serde(default = "default_vertical_bias")]
    pub vertical_bias: f64,
}

impl Default for ScrollIntentConfig {
    fn default() -> Self {
        Self {
            deadzone_px: default_deadzone_px(),
            vertical_bias: default_vertical_bias(),
        }
    }
}

impl ScrollIntentConfig {
    pub fn validate(self) -> ChartResult<()> {
        if !self.deadzone_px.is_finite() || self.deadzone_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "scroll intent `deadzone_px` must be finite and >= 0".to_owned(),
            ));
        }
        if !self.vertical_bias.is_finite() || self.vertical_bias <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "scroll intent `vertical_bias` must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Decision for the current gesture. `Claimed` and `Released` are final
/// until [`ScrollIntentFilter::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollIntent {
    Undecided,
    /// The chart owns the gesture.
    Claimed,
    /// The gesture belongs to the surrounding scroll container.
    Released,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollIntentFilter {
    config: ScrollIntentConfig,
    origin: Option<(f64, f64)>,
    intent: ScrollIntent,
}

impl ScrollIntentFilter {
    pub fn new(config: ScrollIntentConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            origin: None,
            intent: ScrollIntent::Undecided,
        })
    }

    #[must_use]
    pub fn intent(&self) -> ScrollIntent {
        self.intent
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.intent = ScrollIntent::Undecided;
    }

    pub fn observe(&mut self, x: f64, y: f64) -> ScrollIntent {
        if self.intent != ScrollIntent::Undecided {
            return self.intent;
        }
        let Some((origin_x, origin_y)) = self.origin else {
            return self.intent;
        };
        if !x.is_finite() || !y.is_finite() {
            return self.intent;
        }

        let dx = (x - origin_x).abs();
        let dy = (y - origin_y).abs();
        if dx <= self.config.deadzone_px && dy <= self.config.deadzone_px {
            return self.intent;
        }

        self.intent = if dy > dx * self.config.vertical_bias {
            ScrollIntent::Released
        } else {
            ScrollIntent::Claimed
        };
        debug!(dx, dy, intent = ?self.intent, "scroll intent decided");
        self.intent
    }

    pub fn end(&mut self) {
        self.origin = None;
        self.intent = ScrollIntent::Undecided;
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollIntent, ScrollIntentConfig, ScrollIntentFilter};

    fn filter() -> ScrollIntentFilter {
        ScrollIntentFilter::new(ScrollIntentConfig::default()).expect("filter")
    }

    #[test]
    fn stays_undecided_inside_deadzone() {
        let mut filter = filter();
        filter.begin(100.0, 100.0);
        assert_eq!(filter.observe(105.0, 96.0), ScrollIntent::Undecided);
    }

    #[test]
    fn horizontal_travel_claims_and_sticks() {
        let mut filter = filter();
        filter.begin(100.0, 100.0);
        assert_eq!(filter.observe(130.0, 104.0), ScrollIntent::Claimed);
        assert_eq!(filter.observe(130.0, 200.0), ScrollIntent::Claimed);
    }

    #[test]
    fn vertical_travel_releases() {
        let mut filter = filter();
        filter.begin(100.0, 100.0);
        assert_eq!(filter.observe(104.0, 140.0), ScrollIntent::Released);
        filter.end();
        assert_eq!(filter.intent(), ScrollIntent::Undecided);
    }

    #[test]
    fn bias_favours_the_chart() {
        let config = ScrollIntentConfig {
            deadzone_px: 10.0,
            vertical_bias: 2.0,
        };
        let mut filter = ScrollIntentFilter::new(config).expect("filter");
        filter.begin(0.0, 0.0);
        assert_eq!(filter.observe(15.0, 25.0), ScrollIntent::Claimed);
    }

    #[test]
    fn rejects_negative_deadzone() {
        let config = ScrollIntentConfig {
            deadzone_px: -1.0,
            vertical_bias: 1.0,
        };
        assert!(ScrollIntentFilter::new(config).is_err());
    }
}
