use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use uuid::Uuid;
use wtf_flowchart_lib::interaction::NoopListener;
use wtf_flowchart_lib::{
    ChartDto, ChartListener, ChartSettings, ChartSurface, DrawCommand, InteractionCoordinator,
    NavDirection, RenderFrame, TooltipAnchor, TroublePoint, Viewport,
};

#[derive(Clone, Default)]
struct Canvas {
    frames: Arc<Mutex<Vec<RenderFrame>>>,
}

impl ChartSurface for Canvas {
    fn viewport(&self) -> Option<Viewport> {
        Some(Viewport {
            width: 600.0,
            height: 300.0,
        })
    }

    fn paint(&mut self, frame: &RenderFrame) {
        self.frames.lock().unwrap().push(frame.clone());
    }
}

#[derive(Clone, Default)]
struct ListView {
    hovered: Arc<Mutex<Option<String>>>,
    nav_clicks: Arc<Mutex<Vec<NavDirection>>>,
}

impl ChartListener for ListView {
    fn on_click_graph_point(&mut self, _view_id: Uuid, _point: &TroublePoint) {}

    fn on_hover_graph_point(&mut self, _view_id: Uuid, point: &TroublePoint) {
        *self.hovered.lock().unwrap() = Some(point.session_id.clone());
    }

    fn on_hover_off_graph_point(&mut self, _view_id: Uuid) {
        *self.hovered.lock().unwrap() = None;
    }

    fn on_click_nav_week(&mut self, _view_id: Uuid, direction: NavDirection) {
        self.nav_clicks.lock().unwrap().push(direction);
    }
}

fn week_json(rows: &[(&str, u64, &str, &str)]) -> ChartDto {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(id, duration, status, retro)| {
            vec![
                " zoe ".to_string(),
                " Zoe Example ".to_string(),
                format!(" {id} "),
                format!(" {duration} "),
                " 1.2.3 ".to_string(),
                " 2026-10-13 09:30:00 ".to_string(),
                format!(" {retro} "),
                format!(" {status} "),
                " flaky deploy ".to_string(),
                " false ".to_string(),
            ]
        })
        .collect();

    let json = serde_json::json!({
        "target": "team-a",
        "targetType": "TEAM",
        "location": "/wtf",
        "chartSeries": {
            "headers": ["username", "fullName", "sessionName", "durationSeconds", "coords",
                        "solvedTime", "retroTime", "status", "description", "markedFlag"],
            "rowsOfPaddedCells": rows,
        },
        "eventSeriesByType": {},
        "featureSetsByType": {},
    });
    ChartDto::from_json(&json.to_string()).unwrap()
}

fn coordinator() -> (InteractionCoordinator, Canvas, ListView) {
    let canvas = Canvas::default();
    let list = ListView::default();
    let coordinator = InteractionCoordinator::new(
        ChartSettings {
            member_id: Some("me".into()),
            ..ChartSettings::default()
        },
        Box::new(list.clone()),
        Box::new(canvas.clone()),
    )
    .with_today(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    (coordinator, canvas, list)
}

#[test]
fn week_navigation_retitles_the_chart() {
    let (mut chart, canvas, list) = coordinator();

    let ticket = chart.request_week(NavDirection::Previous).unwrap();
    assert!(chart.complete_navigation(ticket, &week_json(&[("s1", 900, "OPEN", "")])));
    assert!(chart.frame().unwrap().title.starts_with("Last Week's"));

    let ticket = chart.navigate_to(-3).unwrap();
    assert!(chart.complete_navigation(ticket, &week_json(&[("s9", 100, "OPEN", "")])));

    let frames = canvas.frames.lock().unwrap();
    let title = &frames.last().unwrap().title;
    assert!(title.starts_with("Week of"), "{title}");
    assert_eq!(chart.week_offset(), -3);
    assert_eq!(*list.nav_clicks.lock().unwrap(), vec![NavDirection::Previous]);
}

#[test]
fn hover_places_tooltip_by_height() {
    let (mut chart, _, list) = coordinator();
    chart.load(&week_json(&[
        ("quick", 60, "OPEN", ""),
        ("slow", 4000, "OPEN", ""),
    ]));

    let quick = chart.pointer_enter("quick").unwrap();
    assert!(chart.snapshot().get("quick").unwrap().y_offset > 120.0);
    assert_eq!(quick.anchor, TooltipAnchor::Above);
    assert_eq!(list.hovered.lock().unwrap().as_deref(), Some("quick"));
    chart.pointer_leave();

    let slow = chart.pointer_enter("slow").unwrap();
    assert!(chart.snapshot().get("slow").unwrap().y_offset <= 120.0);
    assert_eq!(slow.anchor, TooltipAnchor::Below);
    assert_eq!(slow.heading, "NEEDS REVIEW");
    chart.pointer_leave();
    assert!(list.hovered.lock().unwrap().is_none());
}

#[test]
fn live_update_redraws_with_new_classification() {
    let (mut chart, canvas, _) = coordinator();
    chart.load(&week_json(&[
        ("s1", 3600, "OPEN", ""),
        ("s2", 300, "OPEN", "2026-10-14 10:00:00"),
    ]));
    assert_eq!(chart.metrics().states.needs_review, 1);
    assert_eq!(chart.metrics().states.retro_in_progress, 1);

    let message = serde_json::json!({
        "messageType": "WTF_STATUS_UPDATE",
        "data": {"learningCircuitDto": {
            "sessionId": "s1",
            "status": "TROUBLESHOOTING",
            "memberMarksForClose": ["me"],
        }},
    });
    assert!(chart.handle_live_message(&message.to_string()));

    let frames = canvas.frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    let marker = frames[1].marker_for("s1").unwrap();
    match marker {
        DrawCommand::Marker { style, .. } => {
            assert_eq!(style.map(|s| s.as_str()), Some("closed"));
        }
        other => panic!("unexpected {other:?}"),
    }
    drop(frames);

    let metrics = chart.metrics();
    assert_eq!(metrics.states.needs_review, 0);
    assert_eq!(metrics.states.closed, 1);
}

#[test]
fn malformed_rows_do_not_blank_the_chart() {
    let mut chart = InteractionCoordinator::new(
        ChartSettings::default(),
        Box::new(NoopListener),
        Box::new(Canvas::default()),
    );
    let mut dto = week_json(&[("good", 100, "OPEN", ""), ("bad", 0, "OPEN", "")]);
    dto.chart_series.rows_of_padded_cells[1][3] = "n/a".into();

    assert!(chart.load(&dto));
    assert_eq!(chart.snapshot().len(), 1);
    assert!(chart.frame().is_some());
    chart.unmount();
}
