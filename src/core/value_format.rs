use rust_decimal::{Decimal, RoundingStrategy};
use smallvec::SmallVec;

/// Formats a value with a `K`/`M` suffix and one decimal, dropping `.0`.
#[must_use]
pub fn abbreviate_value(value: i64) -> String {
    let magnitude = value.unsigned_abs();
    if magnitude >= 1_000_000 {
        scaled_label(value, 1_000_000, "M")
    } else if magnitude >= 1_000 {
        scaled_label(value, 1_000, "K")
    } else {
        value.to_string()
    }
}

fn scaled_label(value: i64, divisor: i64, suffix: &str) -> String {
    let scaled = (Decimal::from(value) / Decimal::from(divisor))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{scaled}{suffix}")
}

/// Evenly spaced label values starting at `min`.
///
/// The step is `round((max - min) / count)`, so the last label may fall
/// slightly short of `max`.
#[must_use]
pub fn label_values(min: i64, max: i64, count: usize) -> SmallVec<[i64; 8]> {
    if count == 0 {
        return SmallVec::new();
    }
    let step = ((max - min) as f64 / count as f64).round() as i64;
    (0..count as i64).map(|i| min + i * step).collect()
}
