pub mod axis;
pub mod bounds;
pub mod dataset;
pub mod scale;
pub mod series;
pub mod transition;
pub mod types;
pub mod value_format;
pub mod windowing;

pub use axis::{Axis, AxisPoint};
pub use bounds::{ViewportBounds, VisibleRange};
pub use dataset::{ChartDataset, ChartVariant};
pub use scale::{LinearScale, normalize_range};
pub use series::{Series, SeriesId, SeriesTable};
pub use transition::{Lerp, Transition, TransitionStep};
pub use types::{PixelRect, PlotLayout, Viewport};
pub use value_format::{abbreviate_value, label_values};
pub use windowing::{IndexWindow, domain_window, projection_window};
