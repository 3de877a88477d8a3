use thiserror::Error;

use crate::core::SeriesId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("series `{series}` has {actual} values but the axis has {expected} points")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("visibility list has {actual} entries but the chart has {expected} series")]
    VisibilityMismatch { expected: usize, actual: usize },

    #[error("unknown series id {0}")]
    UnknownSeries(SeriesId),

    #[error("invalid viewport bounds: left={left}, right={right}, axis size={size}")]
    InvalidBounds { left: f64, right: f64, size: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
