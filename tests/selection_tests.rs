use chrono::DateTime;
use navchart::api::{ChartEngine, ChartEngineConfig, SelectionChange, SelectionEngine};
use navchart::core::{
    Axis, ChartDataset, ChartVariant, PlotLayout, Series, SeriesId, Viewport, ViewportBounds,
    VisibleRange,
};
use navchart::plot::{DevicePoint, PlotGeometry, SeriesTrack};
use navchart::render::{Color, NullRenderer};

fn axis(len: usize) -> Axis {
    Axis::from_timestamps(
        (0..len as i64).map(|day| DateTime::from_timestamp(1_546_300_800 + day * 86_400, 0).expect("ts")),
    )
    .expect("axis")
}

fn dataset(variant: ChartVariant, columns: &[i64], len: usize) -> ChartDataset {
    let palette = [
        Color::rgb(0.3, 0.6, 0.9),
        Color::rgb(0.9, 0.4, 0.3),
        Color::rgb(0.4, 0.8, 0.4),
    ];
    let series = columns
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let values = (0..len as i64).map(|day| value + day % 3).collect();
            Series::new(format!("s{i}"), palette[i % palette.len()], values)
        })
        .collect();
    ChartDataset::new("Selection", axis(len), series, variant).expect("dataset")
}

fn constant_dataset(variant: ChartVariant, columns: &[i64], len: usize) -> ChartDataset {
    let series = columns
        .iter()
        .enumerate()
        .map(|(i, value)| Series::new(format!("s{i}"), Color::rgb(0.5, 0.5, 0.5), vec![*value; len]))
        .collect();
    ChartDataset::new("Shares", axis(len), series, variant).expect("dataset")
}

/// Ten points spaced 45 px apart starting at `origin`.
fn geometry(dataset: &ChartDataset, origin: f64) -> PlotGeometry {
    let layout = PlotLayout::new(Viewport::new(400.0, 300.0), 10.0, 20.0);
    let mut geometry = PlotGeometry::empty(layout, VisibleRange::new(0.0, 9.0));
    let mut track = SeriesTrack::new(SeriesId(0), 1.0, dataset.len());
    for index in 0..dataset.len() {
        track.set(
            index,
            DevicePoint {
                x: origin + 45.0 * index as f64,
                y: 150.0,
            },
        );
    }
    geometry.insert(track);
    geometry
}

#[test]
fn pointer_beyond_the_right_edge_selects_the_previous_point() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();
    assert_eq!(
        selection.on_geometry_updated(geometry(&data, 10.0), &data),
        SelectionChange::Unchanged
    );

    assert_eq!(selection.select_at_x(412.0, &data), SelectionChange::Selected(8));
    let snapshot = selection.snapshot().expect("snapshot");
    assert_eq!(snapshot.index, 8);
    assert_eq!(snapshot.x, 370.0);
    assert_eq!(snapshot.values.get(&SeriesId(0)), Some(&(100 + 8 % 3)));
}

#[test]
fn pointer_before_the_left_edge_selects_the_next_point() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();
    selection.on_geometry_updated(geometry(&data, -20.0), &data);

    assert_eq!(selection.select_at_x(-5.0, &data), SelectionChange::Selected(1));
    assert_eq!(selection.snapshot().expect("snapshot").x, 25.0);
}

#[test]
fn same_index_does_not_rebuild_the_snapshot() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();
    selection.on_geometry_updated(geometry(&data, 10.0), &data);

    assert_eq!(selection.select_at_x(190.0, &data), SelectionChange::Selected(4));
    assert_eq!(selection.select_at_x(195.0, &data), SelectionChange::Unchanged);
    assert_eq!(selection.select_at_x(188.0, &data), SelectionChange::Unchanged);
    assert_eq!(selection.rebuild_count(), 1);

    assert_eq!(selection.select_at_x(240.0, &data), SelectionChange::Selected(5));
    assert_eq!(selection.rebuild_count(), 2);
}

#[test]
fn pointer_outside_the_axis_clears() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();
    selection.on_geometry_updated(geometry(&data, 10.0), &data);
    selection.select_at_x(100.0, &data);

    assert_eq!(selection.select_at_x(-400.0, &data), SelectionChange::Cleared);
    assert!(selection.snapshot().is_none());
    assert_eq!(selection.select_at_x(f64::NAN, &data), SelectionChange::Unchanged);
}

#[test]
fn index_selection_waits_for_the_first_projection() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();

    assert_eq!(selection.select_at_index(3, &data), SelectionChange::Deferred(3));
    assert_eq!(selection.selected_index(), Some(3));
    assert!(selection.snapshot().is_none());

    assert_eq!(
        selection.on_geometry_updated(geometry(&data, 10.0), &data),
        SelectionChange::Selected(3)
    );
    assert_eq!(selection.snapshot().expect("snapshot").x, 145.0);
    assert_eq!(selection.pending_index(), None);
}

#[test]
fn out_of_range_index_is_rejected() {
    let data = dataset(ChartVariant::Line, &[100], 10);
    let mut selection = SelectionEngine::new();
    selection.on_geometry_updated(geometry(&data, 10.0), &data);
    selection.select_at_index(2, &data);

    assert_eq!(selection.select_at_index(10, &data), SelectionChange::Cleared);
    assert_eq!(selection.selected_index(), None);
}

#[test]
fn percentage_selection_reports_rounded_shares() {
    let data = constant_dataset(ChartVariant::PercentageStacked, &[30, 20, 50], 10);
    let config = ChartEngineConfig::new(Viewport::new(400.0, 300.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");

    assert_eq!(engine.select_index(4), SelectionChange::Selected(4));
    let snapshot = engine.selection_snapshot().expect("snapshot");
    let shares: Vec<i64> = snapshot.percentages.values().copied().collect();
    assert_eq!(shares, vec![30, 20, 50]);
    assert_eq!(snapshot.values.len(), 3);
}

#[test]
fn line_selection_has_no_percentages() {
    let data = dataset(ChartVariant::Line, &[40, 70], 30);
    let config = ChartEngineConfig::new(Viewport::new(400.0, 300.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");

    engine.select_index(2);
    let snapshot = engine.selection_snapshot().expect("snapshot");
    assert!(snapshot.percentages.is_empty());
    assert_eq!(snapshot.coords_y.len(), 2);
}

#[test]
fn moving_the_window_clears_the_selection() {
    let data = dataset(ChartVariant::Line, &[40], 365);
    let config = ChartEngineConfig::new(Viewport::new(360.0, 240.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");

    assert!(matches!(engine.plot_pointer_down(180.0, 100.0), SelectionChange::Selected(_)));
    engine.plot_pointer_up();
    engine
        .set_bounds(ViewportBounds::new(10.0, 100.0))
        .expect("valid bounds");
    assert!(engine.selection_snapshot().is_none());
}

#[test]
fn grabbing_the_navigator_clears_the_selection() {
    let data = dataset(ChartVariant::Line, &[40], 365);
    let config = ChartEngineConfig::new(Viewport::new(360.0, 240.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");
    engine.select_index(20);
    assert!(engine.selection_snapshot().is_some());

    engine.navigator_pointer_down(16.0, 10.0);
    assert!(engine.selection_snapshot().is_none());
}

#[test]
fn toggling_another_series_keeps_the_selected_index() {
    let data = dataset(ChartVariant::Line, &[40, 70], 30);
    let config = ChartEngineConfig::new(Viewport::new(400.0, 300.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");
    assert_eq!(engine.select_index(5), SelectionChange::Selected(5));

    engine.set_series_visible(SeriesId(1), false).expect("hide");
    assert!(engine.selection_snapshot().is_none());
    assert_eq!(engine.selection().pending_index(), Some(5));

    engine.render().expect("render");
    let snapshot = engine.selection_snapshot().expect("re-resolved");
    assert_eq!(snapshot.index, 5);
    assert_eq!(snapshot.values.len(), 1);
}

#[test]
fn hiding_every_series_drops_the_selection() {
    let data = dataset(ChartVariant::Line, &[40], 30);
    let config = ChartEngineConfig::new(Viewport::new(400.0, 300.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine.render().expect("render");
    engine.select_index(5);

    engine.set_series_visible(SeriesId(0), false).expect("hide");
    assert_eq!(engine.selection().selected_index(), None);
}

fn percentage_engine(first_column: i64) -> ChartEngine<NullRenderer> {
    let len = 40;
    let series = [(30, Color::rgb(0.3, 0.6, 0.9)), (70, Color::rgb(0.9, 0.4, 0.3))]
        .into_iter()
        .enumerate()
        .map(|(i, (value, color))| {
            let mut values = vec![value; len];
            values[0] = first_column;
            Series::new(format!("s{i}"), color, values)
        })
        .collect();
    let data = ChartDataset::new("Shares", axis(len), series, ChartVariant::PercentageStacked)
        .expect("dataset");
    let config = ChartEngineConfig::new(Viewport::new(400.0, 300.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), data, config).expect("engine");
    engine
        .set_bounds(ViewportBounds::new(0.0, 20.0))
        .expect("valid bounds");
    engine.render().expect("render");
    engine
}

#[test]
fn zero_sum_first_column_keeps_the_plot_selectable() {
    let expected = percentage_engine(1).plot_pointer_down(200.0, 100.0);
    assert!(matches!(expected, SelectionChange::Selected(_)));

    let mut engine = percentage_engine(0);
    assert_eq!(engine.plot_pointer_down(200.0, 100.0), expected);
    let SelectionChange::Selected(index) = expected else {
        unreachable!();
    };
    assert_eq!(engine.selection_snapshot().expect("snapshot").index, index);
}

#[test]
fn zero_sum_column_selects_without_percentages() {
    let mut engine = percentage_engine(0);
    let x = engine
        .selection()
        .geometry()
        .and_then(|geometry| geometry.track(SeriesId(0)))
        .and_then(|track| track.x_at(0))
        .expect("zero-sum column keeps a coordinate");

    assert_eq!(engine.plot_pointer_down(x, 100.0), SelectionChange::Selected(0));
    let snapshot = engine.selection_snapshot().expect("snapshot");
    assert_eq!(snapshot.values.get(&SeriesId(0)), Some(&0));
    assert!(snapshot.percentages.is_empty());
}
