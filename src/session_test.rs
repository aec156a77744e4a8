use super::*;
use crate::geometry::{Point, Rect};
use crate::grid::GridMap;
use crate::input::{Modifiers, PointerPhase};
use crate::layout::RowLayout;
use crate::notify::{Message, Severity, SinkEvent};
use crate::store::{Fault, MemoryStore};
use crate::sync::NO_CHANGES_MESSAGE;

// =============================================================
// Helpers
// =============================================================

type TestSession = Session<Vec<SinkEvent>>;

const BLUE: Rgba = Rgba { r: 0, g: 0, b: 255, a: 1.0 };
const GREEN: Rgba = Rgba { r: 0, g: 255, b: 0, a: 0.4 };

fn alice() -> UserId {
    UserId::new("alice")
}

fn red() -> Configuration {
    Configuration::uniform(Rgb::new(255, 0, 0))
}

fn session_with(config: SessionConfig) -> (Arc<MemoryStore>, TestSession) {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(config, store.clone(), Box::new(RowLayout::default()), Vec::new());
    (store, session)
}

fn session() -> (Arc<MemoryStore>, TestSession) {
    session_with(SessionConfig::default())
}

async fn signed_in() -> (Arc<MemoryStore>, TestSession) {
    let (store, mut s) = session();
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    s.drain().await;
    (store, s)
}

fn shown(s: &TestSession) -> Vec<&Notification> {
    s.sink()
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Shown(n) => Some(n),
            SinkEvent::Retracted { .. } => None,
        })
        .collect()
}

fn pointer(phase: PointerPhase, x: f64, y: f64, t: u64) -> UiEvent {
    UiEvent::Pointer(PointerEvent::primary(phase, Point::new(x, y), t))
}

fn click(target: ClickTarget) -> UiEvent {
    UiEvent::Click(ClickEvent { target, modifiers: Modifiers::default() })
}

fn ctrl_click(row: usize, col: usize) -> UiEvent {
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    UiEvent::Click(ClickEvent::on_cell(CellAddr::new(row, col), ctrl))
}

/// Drag across rows 0 and 1 of the default layout and release.
fn drag_top_two_rows(s: &mut TestSession) {
    s.dispatch(pointer(PointerPhase::Down, 0.0, 0.0, 0)).unwrap();
    s.dispatch(pointer(PointerPhase::Move, 400.0, 44.0, 20)).unwrap();
    s.dispatch(pointer(PointerPhase::Up, 400.0, 44.0, 30)).unwrap();
}

// =============================================================
// Load
// =============================================================

#[tokio::test]
async fn sign_in_loads_default_and_syncs_silently() {
    let (store, mut s) = session();
    assert!(!s.controls().editing_visible);

    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    assert_eq!(s.state(), &SyncState::Unsynced);
    assert_eq!(s.pending_effects(), 1);

    s.drain().await;
    assert_eq!(s.state(), &SyncState::Synced { config: red() });
    assert_eq!(s.user(), Some(&alice()));
    assert_eq!(s.pending_effects(), 0);
    assert_eq!(s.buffer().map(ConfigBuffer::staged), Some(&red()));
    assert!(s.sink().is_empty());
    assert_eq!(store.save_count(), 1);

    let controls = s.controls();
    assert!(controls.editing_visible);
    assert!(!controls.apply_enabled);
    assert!(!controls.discard_enabled);
}

#[tokio::test]
async fn configured_default_color_is_used_for_new_users() {
    let config = SessionConfig { default_color: Rgb::new(1, 2, 3), ..SessionConfig::default() };
    let (_store, mut s) = session_with(config);
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    s.drain().await;
    assert_eq!(s.state().authoritative(), Some(&Configuration::uniform(Rgb::new(1, 2, 3))));
}

#[tokio::test]
async fn load_failure_stays_unsynced_with_one_error() {
    let (store, mut s) = session();
    store.fail_loads(Some(Fault::Unavailable));
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    s.drain().await;

    assert_eq!(s.state(), &SyncState::Unsynced);
    assert!(s.buffer().is_none());
    assert!(!s.controls().editing_visible);
    let notes = shown(&s);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Danger);
    assert_eq!(
        notes[0].message,
        Message::Lines(vec!["Error getting stored lights.".into(), "Error: E_UNAVAILABLE".into()])
    );
}

#[tokio::test]
async fn stale_load_from_previous_sign_in_is_discarded() {
    let (store, mut s) = session();
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    s.dispatch(UiEvent::User { id: None }).unwrap();
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    assert_eq!(s.pending_effects(), 2);

    s.drain().await;
    assert!(s.state().is_synced());
    assert_eq!(s.pending_effects(), 0);
    // The first load created the default; the second found it.
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn switching_users_does_not_reload() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::User { id: Some(UserId::new("bob")) }).unwrap();
    assert_eq!(s.pending_effects(), 0);
    assert!(s.state().is_synced());
    assert_eq!(s.user(), Some(&UserId::new("bob")));
}

#[tokio::test]
async fn sign_out_discards_editing_state() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetColor { row: 0, col: 0, color: BLUE }).unwrap();
    s.dispatch(ctrl_click(0, 0)).unwrap();
    s.dispatch(UiEvent::User { id: None }).unwrap();

    assert_eq!(s.state(), &SyncState::Unsynced);
    assert!(s.buffer().is_none());
    assert!(s.selection().is_empty());
    assert_eq!(s.controls(), Controls::default());
}

// =============================================================
// Commit
// =============================================================

#[tokio::test]
async fn apply_flow_commits_once_with_one_success() {
    let (store, mut s) = signed_in().await;

    s.dispatch(UiEvent::SetColor { row: 0, col: 0, color: BLUE }).unwrap();
    assert!(s.controls().apply_enabled);
    let proposed = s.buffer().unwrap().staged().clone();

    s.dispatch(UiEvent::Apply).unwrap();
    assert_eq!(s.state(), &SyncState::PendingSync { current: red(), proposed: proposed.clone() });
    assert!(!s.controls().apply_enabled);
    assert!(s.controls().editing_visible);

    // Rejected while pending: no second write.
    s.dispatch(UiEvent::Apply).unwrap();
    assert_eq!(s.pending_effects(), 1);

    s.drain().await;
    assert_eq!(s.state(), &SyncState::Synced { config: proposed.clone() });
    assert!(!s.buffer().unwrap().is_dirty());
    assert_eq!(store.stored(&alice()), Some(proposed.encode().unwrap()));

    let notes = shown(&s);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].message, Message::from("Lights successfully configured!"));
}

#[tokio::test]
async fn save_failure_keeps_edits_and_reports_code() {
    let (store, mut s) = signed_in().await;
    store.fail_saves(Some(Fault::PermissionDenied));

    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    s.drain().await;

    assert_eq!(s.state(), &SyncState::Synced { config: red() });
    assert!(s.buffer().unwrap().is_dirty());
    assert!(s.controls().apply_enabled);
    assert_eq!(store.stored(&alice()), Some(red().encode().unwrap()));

    let notes = shown(&s);
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].message,
        Message::Lines(vec![
            "Error configuring lights.".into(),
            "Error: E_PERMISSION_DENIED".into()
        ])
    );
}

#[tokio::test]
async fn apply_without_changes_is_informational() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::Apply).unwrap();
    assert_eq!(s.pending_effects(), 0);
    let notes = shown(&s);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Info);
    assert_eq!(notes[0].message, Message::from(NO_CHANGES_MESSAGE));
}

#[tokio::test]
async fn edits_while_pending_survive_commit() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetColor { row: 0, col: 0, color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    s.dispatch(UiEvent::SetColor { row: 0, col: 1, color: BLUE }).unwrap();
    s.drain().await;
    assert!(s.buffer().unwrap().is_dirty());
    assert!(s.controls().apply_enabled);
}

#[tokio::test]
async fn discard_restores_authoritative() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    assert!(s.controls().discard_enabled);
    s.dispatch(UiEvent::Discard).unwrap();
    assert_eq!(s.buffer().map(ConfigBuffer::staged), Some(&red()));
    assert!(!s.controls().discard_enabled);
}

#[tokio::test]
async fn discard_is_ignored_while_pending() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetColor { row: 0, col: 0, color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    s.dispatch(UiEvent::SetColor { row: 0, col: 1, color: BLUE }).unwrap();
    s.dispatch(UiEvent::Discard).unwrap();
    assert_ne!(s.buffer().unwrap().staged(), s.buffer().unwrap().baseline());
}

#[tokio::test]
async fn edits_while_unsynced_are_ignored() {
    let (_store, mut s) = session();
    s.dispatch(UiEvent::SetColor { row: 0, col: 0, color: BLUE }).unwrap();
    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    assert!(s.buffer().is_none());
    assert_eq!(s.pending_effects(), 0);
    assert!(s.sink().is_empty());
}

#[tokio::test]
async fn edit_outside_grid_is_error() {
    let (_store, mut s) = signed_in().await;
    let err = s.dispatch(UiEvent::SetColor { row: 0, col: 3, color: BLUE }).unwrap_err();
    assert_eq!(err, GridError::OutOfRange(CellAddr::new(0, 3)));
    assert!(!s.buffer().unwrap().is_dirty());
}

// =============================================================
// Selection and bulk edits
// =============================================================

#[tokio::test]
async fn drag_selects_overlapped_lights() {
    let (_store, mut s) = signed_in().await;
    drag_top_two_rows(&mut s);
    assert_eq!(s.selection().count(), 10);
    assert!(!s.drag_state().is_dragging());
    assert_eq!(s.bulk_label(), BULK_LABEL_SELECTED);
}

#[tokio::test]
async fn release_click_is_ignored_until_next_turn() {
    let (_store, mut s) = signed_in().await;
    drag_top_two_rows(&mut s);

    // Synthetic click fired by the host on release.
    s.dispatch(click(ClickTarget::Surface)).unwrap();
    assert_eq!(s.selection().count(), 10);

    s.dispatch(UiEvent::Turn).unwrap();
    s.dispatch(click(ClickTarget::Surface)).unwrap();
    assert!(s.selection().is_empty());
    assert_eq!(s.bulk_label(), BULK_LABEL_ALL);
}

#[tokio::test]
async fn plain_press_and_release_leaves_clicks_armed() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(ctrl_click(4, 4)).unwrap();
    s.dispatch(pointer(PointerPhase::Down, 5.0, 5.0, 0)).unwrap();
    s.dispatch(pointer(PointerPhase::Up, 5.0, 5.0, 10)).unwrap();
    s.dispatch(click(ClickTarget::Surface)).unwrap();
    assert!(s.selection().is_empty());
}

#[tokio::test]
async fn modifier_clicks_build_selection_for_bulk_edit() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(ctrl_click(2, 1)).unwrap();
    s.dispatch(ctrl_click(5, 5)).unwrap();
    s.dispatch(UiEvent::SetColor { row: 2, col: 1, color: GREEN }).unwrap();
    assert_eq!(s.bulk_color(), Some(Rgb::new(0, 255, 0)));

    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    let staged = s.buffer().unwrap().staged();
    assert_eq!(staged.get(CellAddr::new(2, 1)), Some(&Rgb::new(0, 0, 255)));
    assert_eq!(staged.get(CellAddr::new(5, 5)), Some(&Rgb::new(0, 0, 255)));
    assert_eq!(staged.iter().filter(|(_, c)| **c == Rgb::new(0, 0, 255)).count(), 2);
}

#[tokio::test]
async fn bulk_edit_without_selection_recolors_everything() {
    let (_store, mut s) = signed_in().await;
    assert_eq!(s.bulk_label(), BULK_LABEL_ALL);
    assert_eq!(s.bulk_color(), Some(Rgb::new(255, 0, 0)));
    s.dispatch(UiEvent::SetBulkColor { color: GREEN }).unwrap();
    assert_eq!(s.buffer().unwrap().staged(), &Configuration::uniform(Rgb::new(0, 255, 0)));
}

#[tokio::test]
async fn unmeasurable_light_fails_drag_update() {
    let store = Arc::new(MemoryStore::new());
    let partial: GridMap<Rect> = GridMap::build(&[3], |addr| {
        #[allow(clippy::cast_precision_loss)]
        let x = addr.col as f64 * 24.0;
        Rect::new(x, 0.0, 20.0, 20.0)
    });
    let sink: Vec<SinkEvent> = Vec::new();
    let mut s = Session::new(SessionConfig::default(), store, Box::new(partial), sink);
    s.dispatch(pointer(PointerPhase::Down, 0.0, 0.0, 0)).unwrap();
    let err = s.dispatch(pointer(PointerPhase::Move, 50.0, 50.0, 20)).unwrap_err();
    assert_eq!(err, GridError::MissingBounds(CellAddr::new(1, 0)));
    assert!(s.selection().is_empty());
}

// =============================================================
// Picker toggle
// =============================================================

#[tokio::test]
async fn picker_opens_on_next_turn_and_closes_on_outside_click() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(ctrl_click(0, 0)).unwrap();

    // Trigger click: the toggle request plus a click inside the picker container.
    s.dispatch(UiEvent::TogglePicker).unwrap();
    s.dispatch(click(ClickTarget::Picker)).unwrap();
    assert!(!s.picker_open());
    s.dispatch(UiEvent::Turn).unwrap();
    assert!(s.picker_open());

    // Picker clicks never reach the selection.
    s.dispatch(click(ClickTarget::Picker)).unwrap();
    assert!(s.picker_open());
    assert_eq!(s.selection().count(), 1);

    s.dispatch(click(ClickTarget::Outside)).unwrap();
    assert!(!s.picker_open());
    assert_eq!(s.selection().count(), 1);
}

#[tokio::test]
async fn escape_closes_picker() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::TogglePicker).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    s.dispatch(UiEvent::Key { key: Key("Escape".into()) }).unwrap();
    assert!(!s.picker_open());
}

fn plain_click(row: usize, col: usize) -> UiEvent {
    click(ClickTarget::Cell { row, col })
}

#[tokio::test]
async fn plain_light_click_opens_its_picker_next_turn() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(plain_click(2, 3)).unwrap();
    assert_eq!(s.light_picker(), None);
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), Some(CellAddr::new(2, 3)));

    // Working inside the open picker keeps it.
    s.dispatch(click(ClickTarget::LightPicker { row: 2, col: 3 })).unwrap();
    s.dispatch(UiEvent::SetColor { row: 2, col: 3, color: BLUE }).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), Some(CellAddr::new(2, 3)));

    // Another light takes over on the next turn.
    s.dispatch(plain_click(2, 4)).unwrap();
    assert_eq!(s.light_picker(), None);
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), Some(CellAddr::new(2, 4)));

    s.dispatch(UiEvent::Key { key: Key("Escape".into()) }).unwrap();
    assert_eq!(s.light_picker(), None);
}

#[tokio::test]
async fn second_plain_click_closes_light_picker() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(plain_click(0, 1)).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    s.dispatch(plain_click(0, 1)).unwrap();
    assert_eq!(s.light_picker(), Some(CellAddr::new(0, 1)));
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), None);
}

#[tokio::test]
async fn modifier_click_and_release_click_leave_light_picker_closed() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(ctrl_click(1, 1)).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), None);

    drag_top_two_rows(&mut s);
    s.dispatch(plain_click(0, 0)).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    assert_eq!(s.light_picker(), None);
    assert_eq!(s.selection().count(), 10);
}

#[tokio::test]
async fn outside_click_and_sign_out_close_light_picker() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(plain_click(4, 4)).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    s.dispatch(click(ClickTarget::Outside)).unwrap();
    assert_eq!(s.light_picker(), None);

    s.dispatch(plain_click(4, 4)).unwrap();
    s.dispatch(UiEvent::Turn).unwrap();
    s.dispatch(UiEvent::User { id: None }).unwrap();
    assert_eq!(s.light_picker(), None);
}

// =============================================================
// Notifications
// =============================================================

#[tokio::test(start_paused = true)]
async fn replaced_notification_keeps_its_own_delay() {
    let (_store, mut s) = session();
    s.notify(NotificationData::info("first").with_id("x"));
    tokio::time::sleep(Duration::from_millis(5000)).await;
    s.pump();
    s.notify(NotificationData::info("second").with_id("x"));

    // The first show's timer fires here and must not retract the second.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    s.pump();
    assert_eq!(s.notifications().len(), 1);
    assert_eq!(s.notifications()[0].message, Message::from("second"));

    tokio::time::sleep(Duration::from_millis(4501)).await;
    s.pump();
    assert!(s.notifications().is_empty());
    assert_eq!(s.sink().last(), Some(&SinkEvent::Retracted { id: "x".into() }));
}

#[tokio::test(start_paused = true)]
async fn success_notification_auto_dismisses() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    s.drain().await;
    let id = s.notifications()[0].id.clone();

    tokio::time::sleep(Duration::from_millis(5999)).await;
    s.pump();
    assert_eq!(s.notifications().len(), 1);

    tokio::time::sleep(Duration::from_millis(2)).await;
    s.pump();
    assert!(s.notifications().is_empty());
    assert_eq!(s.sink().last(), Some(&SinkEvent::Retracted { id }));
}

#[tokio::test(start_paused = true)]
async fn zero_delay_notifications_stay() {
    let config = SessionConfig { notify_delay_ms: 0, ..SessionConfig::default() };
    let (_store, mut s) = session_with(config);
    s.dispatch(UiEvent::User { id: Some(alice()) }).unwrap();
    s.drain().await;
    s.dispatch(UiEvent::Apply).unwrap();

    tokio::time::sleep(Duration::from_secs(60)).await;
    s.pump();
    assert_eq!(s.notifications().len(), 1);
    assert_eq!(s.notifications()[0].delay_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn manual_dismiss_then_expiry_retracts_once() {
    let (_store, mut s) = signed_in().await;
    s.dispatch(UiEvent::Apply).unwrap();
    let id = s.notifications()[0].id.clone();
    s.dispatch(UiEvent::Dismiss { id }).unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    s.pump();
    let retracted = s.sink().iter().filter(|e| matches!(e, SinkEvent::Retracted { .. })).count();
    assert_eq!(retracted, 1);
}

// =============================================================
// Ports and lifecycle
// =============================================================

#[tokio::test]
async fn port_events_are_handled_by_step() {
    let (_store, mut s) = session();
    let port = s.port();
    port.send(UiEvent::User { id: Some(alice()) }).unwrap();
    s.step().await.unwrap();
    assert_eq!(s.pending_effects(), 1);
    s.drain().await;
    assert!(s.state().is_synced());
}

#[tokio::test]
async fn ended_session_closes_ports() {
    let (_store, s) = session();
    let port = s.port();
    assert!(!port.is_closed());
    let sink = s.end();
    assert!(sink.is_empty());
    assert!(port.is_closed());
    assert_eq!(port.send(UiEvent::Turn), Err(SessionClosed));
}

#[tokio::test]
async fn write_in_flight_lands_after_end() {
    let (store, mut s) = signed_in().await;
    s.dispatch(UiEvent::SetBulkColor { color: BLUE }).unwrap();
    s.dispatch(UiEvent::Apply).unwrap();
    assert_eq!(s.pending_effects(), 1);
    assert_eq!(store.save_count(), 1);

    let sink = s.end();
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.save_count(), 2);
    let blue = Configuration::uniform(Rgb::new(0, 0, 255));
    assert_eq!(store.stored(&alice()), Some(blue.encode().unwrap()));
    // The outcome arrives after the session ended; nothing is shown.
    assert!(sink.is_empty());
}

#[tokio::test]
async fn identity_forwarder_drives_loads_and_sign_out() {
    let (_store, mut s) = session();
    let (id_tx, id_rx) = watch::channel(Some(alice()));
    let forwarder = follow_identity(s.port(), id_rx);

    s.step().await.unwrap();
    s.drain().await;
    assert!(s.state().is_synced());

    id_tx.send(None).unwrap();
    s.step().await.unwrap();
    assert_eq!(s.state(), &SyncState::Unsynced);

    drop(id_tx);
    forwarder.await.unwrap();
}

#[test]
fn ui_events_parse_from_json_lines() {
    let e: UiEvent = serde_json::from_str(r#"{"type":"user","id":"alice"}"#).unwrap();
    assert_eq!(e, UiEvent::User { id: Some(alice()) });
    let e: UiEvent = serde_json::from_str(r#"{"type":"user","id":null}"#).unwrap();
    assert_eq!(e, UiEvent::User { id: None });

    let json = r#"{"type":"pointer","phase":"move","position":{"x":1,"y":2},"timestamp_ms":5}"#;
    let e: UiEvent = serde_json::from_str(json).unwrap();
    assert_eq!(e, pointer(PointerPhase::Move, 1.0, 2.0, 5));

    let json = concat!(
        r#"{"type":"click","target":{"kind":"cell","row":1,"col":2},"#,
        r#""modifiers":{"meta":true}}"#
    );
    let e: UiEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        e,
        UiEvent::Click(ClickEvent::on_cell(
            CellAddr::new(1, 2),
            Modifiers { meta: true, ..Default::default() }
        ))
    );

    let json = r#"{"type":"set_bulk_color","color":{"r":1,"g":2,"b":3}}"#;
    let e: UiEvent = serde_json::from_str(json).unwrap();
    assert_eq!(e, UiEvent::SetBulkColor { color: Rgba { r: 1, g: 2, b: 3, a: 1.0 } });

    let e: UiEvent = serde_json::from_str(r#"{"type":"key","key":"Escape"}"#).unwrap();
    assert_eq!(e, UiEvent::Key { key: Key("Escape".into()) });

    for (json, expected) in [
        (r#"{"type":"toggle_picker"}"#, UiEvent::TogglePicker),
        (r#"{"type":"apply"}"#, UiEvent::Apply),
        (r#"{"type":"discard"}"#, UiEvent::Discard),
        (r#"{"type":"turn"}"#, UiEvent::Turn),
    ] {
        assert_eq!(serde_json::from_str::<UiEvent>(json).unwrap(), expected);
    }
}
