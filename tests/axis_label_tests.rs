use std::time::Duration;

use approx::assert_relative_eq;
use chrono::DateTime;
use navchart::api::{
    HorizontalAxisConfig, HorizontalAxisEngine, LABEL_BACKGROUND_MAX_ALPHA, LabelSide,
    RangeAnimationConfig, RangeEngine, TickPlacement, VerticalAxisLabels,
};
use navchart::core::{Axis, PlotLayout, Viewport, VisibleRange, abbreviate_value};

fn axis(len: usize) -> Axis {
    Axis::from_timestamps(
        (0..len as i64).map(|day| DateTime::from_timestamp(1_546_300_800 + day * 86_400, 0).expect("ts")),
    )
    .expect("axis")
}

/// Baseline at 280, top at 20, drawable width 368.
fn layout() -> PlotLayout {
    PlotLayout::new(Viewport::new(400.0, 300.0), 16.0, 20.0).with_bottom_padding(20.0)
}

fn snapped(min: i64, max: i64) -> RangeEngine {
    let mut range = RangeEngine::new(RangeAnimationConfig::default(), false).expect("range");
    range.update_target(min, max);
    range.mark_drawn();
    range
}

fn axis_engine(placement: TickPlacement) -> HorizontalAxisEngine {
    HorizontalAxisEngine::new(HorizontalAxisConfig::default(), placement).expect("axis engine")
}

#[test]
fn wide_window_doubles_the_label_step() {
    let mut engine = axis_engine(TickPlacement::Points);
    engine.update(VisibleRange::new(0.0, 29.0), layout());
    assert_eq!(engine.step(), 8);
    assert_relative_eq!(engine.scale(), 0.75);
    assert_eq!(engine.half_step_alpha(), 0.0);
    assert!(!engine.is_animating());

    let ticks = engine.ticks(&axis(100));
    let indices: Vec<usize> = ticks.iter().map(|tick| tick.index).collect();
    assert_eq!(indices, vec![0, 8, 16, 24, 32]);
    assert!(ticks.iter().all(|tick| tick.alpha == 1.0));
    assert_relative_eq!(ticks[1].x, 16.0 + 8.0 * 368.0 / 29.0, epsilon = 1e-9);
    assert_eq!(ticks[0].label, "Jan 01");
}

#[test]
fn crossing_the_scale_threshold_fades_half_step_labels_in() {
    let mut engine = axis_engine(TickPlacement::Points);
    engine.update(VisibleRange::new(0.0, 29.0), layout());
    engine.update(VisibleRange::new(0.0, 26.0), layout());
    assert_eq!(engine.step(), 8);
    assert_relative_eq!(engine.scale(), 0.875);
    assert!(engine.is_animating());

    engine.advance(Duration::from_millis(150));
    assert_relative_eq!(engine.half_step_alpha(), 0.5, epsilon = 1e-9);
    let half = engine
        .ticks(&axis(100))
        .into_iter()
        .find(|tick| tick.index == 4)
        .expect("half-step label");
    assert_relative_eq!(half.alpha, 0.5, epsilon = 1e-9);

    engine.advance(Duration::from_millis(150));
    assert_eq!(engine.half_step_alpha(), 1.0);
    assert!(!engine.is_animating());
}

#[test]
fn reversing_mid_fade_starts_from_the_current_alpha() {
    let mut engine = axis_engine(TickPlacement::Points);
    engine.update(VisibleRange::new(0.0, 29.0), layout());
    engine.update(VisibleRange::new(0.0, 26.0), layout());
    engine.tick(0.5);

    engine.update(VisibleRange::new(0.0, 29.0), layout());
    assert!(engine.is_animating());
    assert_relative_eq!(engine.half_step_alpha(), 0.5, epsilon = 1e-9);
    engine.tick(0.5);
    assert_relative_eq!(engine.half_step_alpha(), 0.25, epsilon = 1e-9);
    engine.tick(1.0);
    assert_eq!(engine.half_step_alpha(), 0.0);
}

#[test]
fn narrow_window_labels_every_index() {
    let mut engine = axis_engine(TickPlacement::Points);
    engine.update(VisibleRange::new(0.0, 4.0), layout());
    assert_eq!(engine.step(), 1);
    assert_eq!(engine.ticks(&axis(5)).len(), 5);
}

#[test]
fn column_placement_centers_labels_in_their_column() {
    let mut engine = axis_engine(TickPlacement::Columns);
    engine.update(VisibleRange::new(0.0, 3.0), layout());
    let ticks = engine.ticks(&axis(4));
    assert_relative_eq!(ticks[0].x, 16.0 + 46.0);
    assert_relative_eq!(ticks[1].x, 16.0 + 46.0 + 92.0);
}

#[test]
fn ticks_are_empty_before_the_first_update() {
    let engine = axis_engine(TickPlacement::Points);
    assert!(engine.ticks(&axis(10)).is_empty());
}

#[test]
fn settled_labels_sit_on_their_values() {
    let labels = VerticalAxisLabels::build(&snapped(0, 100), layout(), LabelSide::Left);
    assert_eq!(labels.len(), 6);
    assert_relative_eq!(labels[0].y, 280.0);
    assert_relative_eq!(labels[5].y, 280.0 - 85.0 * 2.6, epsilon = 1e-9);
    assert_eq!(labels[1].text, "17");
    for label in &labels {
        assert_eq!(label.alpha, 1.0);
        assert_eq!(label.background_alpha, LABEL_BACKGROUND_MAX_ALPHA);
        assert_eq!(label.side, LabelSide::Left);
    }
}

#[test]
fn animating_labels_crossfade_and_slide_with_the_domain() {
    let mut range = snapped(0, 100);
    range.update_target(0, 50);
    range.tick(0.5);

    let labels = VerticalAxisLabels::build(&range, layout(), LabelSide::Left);
    assert_eq!(labels.len(), 12);
    let (outgoing, incoming) = labels.split_at(6);

    assert_eq!(outgoing[0].alpha, 1.0);
    assert_eq!(incoming[0].alpha, 1.0);
    assert_relative_eq!(outgoing[1].alpha, 0.5);
    assert_relative_eq!(incoming[1].alpha, 0.5);
    assert_relative_eq!(outgoing[1].background_alpha, 0.5);

    let per_unit = 260.0 / 75.0;
    assert_relative_eq!(outgoing[1].y, 280.0 - 17.0 * per_unit, epsilon = 1e-9);
    assert_eq!(incoming[1].value, 8);
    assert_relative_eq!(incoming[1].y, 280.0 - 8.0 * per_unit, epsilon = 1e-9);
}

#[test]
fn range_without_a_target_has_no_labels() {
    let range = RangeEngine::new(RangeAnimationConfig::default(), false).expect("range");
    assert!(VerticalAxisLabels::build(&range, layout(), LabelSide::Left).is_empty());
}

#[test]
fn secondary_labels_share_the_primary_rows() {
    let primary = snapped(0, 600);
    let secondary = snapped(0, 60);
    let main = VerticalAxisLabels::build(&primary, layout(), LabelSide::Left);
    let forced = VerticalAxisLabels::build_forced(&secondary, &primary, layout(), LabelSide::Right);

    assert_eq!(forced.len(), main.len());
    for (left, right) in main.iter().zip(&forced) {
        assert_relative_eq!(left.y, right.y);
        assert_eq!(right.side, LabelSide::Right);
        assert_eq!(right.alpha, 1.0);
    }
    assert_eq!(forced[1].text, "10");
}

#[test]
fn secondary_labels_jump_to_the_target_set() {
    let primary = snapped(0, 600);
    let mut secondary = snapped(0, 60);
    secondary.update_target(0, 3_000_000);
    let forced = VerticalAxisLabels::build_forced(&secondary, &primary, layout(), LabelSide::Right);
    assert_eq!(forced[1].text, "500K");
    assert_eq!(forced[2].text, "1M");
}

#[test]
fn values_abbreviate_with_one_decimal() {
    assert_eq!(abbreviate_value(950), "950");
    assert_eq!(abbreviate_value(1_050), "1.1K");
    assert_eq!(abbreviate_value(20_000), "20K");
    assert_eq!(abbreviate_value(1_250_000), "1.3M");
    assert_eq!(abbreviate_value(-1_500_000), "-1.5M");
}
