use std::cell::RefCell;
use std::rc::Rc;

use chrono::DateTime;
use navchart::api::{ChartEngine, ChartEngineConfig, ChartViewState};
use navchart::core::{
    Axis, ChartDataset, ChartVariant, Series, SeriesId, Viewport, ViewportBounds, VisibleRange,
};
use navchart::extensions::{ChartEvent, ChartListener, ListenerContext};
use navchart::interaction::NavigationState;
use navchart::render::{Color, NullRenderer};

type EventLog = Rc<RefCell<Vec<(ChartEvent, ListenerContext)>>>;

struct Recorder {
    id: String,
    log: EventLog,
}

impl ChartListener for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: ChartEvent, context: ListenerContext) {
        self.log.borrow_mut().push((event, context));
    }
}

fn recorder(id: &str) -> (Box<dyn ChartListener>, EventLog) {
    let log = EventLog::default();
    let listener = Recorder {
        id: id.to_owned(),
        log: Rc::clone(&log),
    };
    (Box::new(listener), log)
}

fn engine() -> ChartEngine<NullRenderer> {
    let len = 365;
    let axis = Axis::from_timestamps(
        (0..len).map(|day| DateTime::from_timestamp(1_546_300_800 + day * 86_400, 0).expect("ts")),
    )
    .expect("axis");
    let series = vec![
        Series::new("views", Color::rgb(0.3, 0.5, 0.9), (0..len).map(|i| 100 + i % 50).collect()),
        Series::new("likes", Color::rgb(0.9, 0.5, 0.3), (0..len).map(|i| 10 + i % 9).collect()),
    ];
    let dataset = ChartDataset::new("Engagement", axis, series, ChartVariant::Line).expect("dataset");
    let config = ChartEngineConfig::new(Viewport::new(360.0, 240.0));
    ChartEngine::new(NullRenderer::default(), dataset, config).expect("engine")
}

fn events(log: &EventLog) -> Vec<ChartEvent> {
    log.borrow().iter().map(|(event, _)| *event).collect()
}

#[test]
fn registry_rejects_empty_and_duplicate_ids() {
    let mut chart = engine();
    let (first, _) = recorder("legend");
    chart.register_listener(first).expect("register");
    assert!(chart.has_listener("legend"));

    let (duplicate, _) = recorder("legend");
    assert!(chart.register_listener(duplicate).is_err());
    let (unnamed, _) = recorder("");
    assert!(chart.register_listener(unnamed).is_err());
    assert_eq!(chart.listener_count(), 1);

    assert!(chart.unregister_listener("legend"));
    assert!(!chart.unregister_listener("legend"));
    assert_eq!(chart.listener_count(), 0);
}

#[test]
fn drag_reports_state_then_bounds() {
    let mut chart = engine();
    let (listener, log) = recorder("legend");
    chart.register_listener(listener).expect("register");

    chart.navigator_pointer_down(16.0, 20.0);
    chart.navigator_pointer_move(100.0, 22.0);
    chart.navigator_pointer_up();

    let recorded = events(&log);
    assert_eq!(recorded.len(), 3);
    assert_eq!(
        recorded[0],
        ChartEvent::NavigationStateChanged {
            state: NavigationState::MovingLeftBound
        }
    );
    let ChartEvent::BoundsChanged { range } = recorded[1] else {
        panic!("expected bounds change, got {:?}", recorded[1]);
    };
    assert!(range.left > 0.0);
    assert_eq!(
        recorded[2],
        ChartEvent::NavigationStateChanged {
            state: NavigationState::Idle
        }
    );

    let (_, context) = log.borrow()[1];
    assert_eq!(context.visible_range, range);
    assert_eq!(context.navigation_state, NavigationState::MovingLeftBound);
    assert_eq!(context.item_count, 365);
}

#[test]
fn grabbing_the_navigator_clears_selection_after_the_state_event() {
    let mut chart = engine();
    chart.render().expect("render");
    chart.select_index(40);
    let (listener, log) = recorder("tooltip");
    chart.register_listener(listener).expect("register");

    chart.navigator_pointer_down(16.0, 20.0);
    assert_eq!(
        events(&log),
        vec![
            ChartEvent::NavigationStateChanged {
                state: NavigationState::MovingLeftBound
            },
            ChartEvent::SelectionChanged { index: None },
        ]
    );
}

#[test]
fn programmatic_bounds_report_bounds_then_selection() {
    let mut chart = engine();
    chart.render().expect("render");
    chart.select_index(40);
    let (listener, log) = recorder("tooltip");
    chart.register_listener(listener).expect("register");

    chart
        .set_bounds(ViewportBounds::new(20.0, 80.0))
        .expect("valid bounds");
    let recorded = events(&log);
    assert_eq!(recorded.len(), 2);
    assert!(matches!(recorded[0], ChartEvent::BoundsChanged { range } if range.right == 79.0));
    assert_eq!(recorded[1], ChartEvent::SelectionChanged { index: None });
}

#[test]
fn selection_and_visibility_are_announced() {
    let mut chart = engine();
    let (listener, log) = recorder("legend");
    chart.register_listener(listener).expect("register");

    chart.render().expect("render");
    chart.select_index(12);
    chart.set_series_visible(SeriesId(1), false).expect("hide");
    chart.set_series_visible(SeriesId(1), false).expect("no-op");

    assert_eq!(
        events(&log),
        vec![
            ChartEvent::Rendered,
            ChartEvent::SelectionChanged { index: Some(12) },
            ChartEvent::SeriesVisibilityChanged {
                series: SeriesId(1),
                visible: false
            },
        ]
    );
    let (_, context) = log.borrow()[2];
    assert_eq!(context.visible_series, 1);
    assert_eq!(context.selected_index, Some(12));
}

#[test]
fn unregistered_listener_stops_receiving() {
    let mut chart = engine();
    let (listener, log) = recorder("legend");
    chart.register_listener(listener).expect("register");
    chart.render().expect("render");
    assert!(chart.unregister_listener("legend"));
    chart.render().expect("render");
    assert_eq!(events(&log), vec![ChartEvent::Rendered]);
}

#[test]
fn restore_announces_bounds_visibility_then_selection() {
    let mut chart = engine();
    chart.render().expect("render");
    chart.select_index(10);
    let (listener, log) = recorder("tooltip");
    chart.register_listener(listener).expect("register");

    chart
        .restore_view_state(&ChartViewState {
            bounds: ViewportBounds::new(5.0, 100.0),
            visibility: vec![true, false],
            selected_index: None,
            scroll_offset: 0.0,
        })
        .expect("restore");

    assert_eq!(
        events(&log),
        vec![
            ChartEvent::BoundsChanged {
                range: VisibleRange::new(5.0, 99.0)
            },
            ChartEvent::SeriesVisibilityChanged {
                series: SeriesId(1),
                visible: false
            },
            ChartEvent::SelectionChanged { index: None },
        ]
    );
    let (_, context) = log.borrow()[2];
    assert_eq!(context.visible_series, 1);
    assert_eq!(context.selected_index, None);
}

#[test]
fn restored_selection_hides_until_it_resolves() {
    let mut chart = engine();
    chart.render().expect("render");
    chart.select_index(10);
    let (listener, log) = recorder("tooltip");
    chart.register_listener(listener).expect("register");

    let mut saved = chart.view_state();
    saved.selected_index = Some(20);
    chart.restore_view_state(&saved).expect("restore");
    assert_eq!(events(&log), vec![ChartEvent::SelectionChanged { index: None }]);

    chart.render().expect("render");
    assert_eq!(
        events(&log)[1..],
        [
            ChartEvent::SelectionChanged { index: Some(20) },
            ChartEvent::Rendered,
        ]
    );
}
