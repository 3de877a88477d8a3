//! Engines behind the public chart surface and the [`ChartEngine`] that
//! orchestrates them.

mod engine;
mod engine_config;
mod engine_render;
mod horizontal_axis;
mod listener_dispatch;
mod listener_registry;
mod range_engine;
mod selection;
mod vertical_axis;
mod view_state;

pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use horizontal_axis::{HorizontalAxisConfig, HorizontalAxisEngine, HorizontalTick, TickPlacement};
pub use range_engine::{
    LabelCrossfade, RangeAnimationConfig, RangeDomain, RangeEngine, RangeState, RangeTick,
    RangeUpdate,
};
pub use selection::{SelectionChange, SelectionEngine, SelectionSnapshot, percentages_of};
pub use vertical_axis::{LABEL_BACKGROUND_MAX_ALPHA, LabelSide, VerticalAxisLabels, VerticalLabel};
pub use view_state::{ChartViewState, ChartViewStateJsonContractV1, VIEW_STATE_JSON_SCHEMA_V1};
