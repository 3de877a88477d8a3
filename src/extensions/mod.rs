//! Host-facing hooks that sit outside the core navigation and range paths.

pub mod listeners;

pub use listeners::{ChartEvent, ChartListener, ListenerContext};
