//! navchart: interactive time-series charts with a draggable navigator.
//!
//! The crate owns the chart behavior (navigator gestures, animated value
//! ranges, point selection, variant-specific projection) and hands
//! backend-agnostic frames to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod plot;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig, ChartViewState};
pub use error::{ChartError, ChartResult};
