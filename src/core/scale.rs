use crate::error::{ChartError, ChartResult};

/// Affine mapping from a value domain onto a pixel range.
///
/// The pixel range may be inverted (`range_start > range_end`), which is how
/// value axes grow upward on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Pixels per domain unit, signed by the range direction.
    #[must_use]
    pub fn pixels_per_unit(self) -> f64 {
        (self.range_end - self.range_start) / (self.domain_end - self.domain_start)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        self.range_start + (value - self.domain_start) * self.pixels_per_unit()
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        self.domain_start + (pixel - self.range_start) / self.pixels_per_unit()
    }
}

/// Orders a value span and widens a degenerate one around its center.
pub fn normalize_range(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}
