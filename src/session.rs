//! Session: the scoped context that owns all editing state for one grid view.
//!
//! ARCHITECTURE
//! ============
//! A [`Session`] owns the sync machine, the staged buffer, the selection, the
//! drag tracker, the picker toggles, and the notifier. External events enter
//! through [`Session::dispatch`] and are handled by one synchronous
//! transition each. Remote I/O and auto-dismiss timers run as tokio tasks that
//! report back through the session queue; [`Session::step`] processes one
//! queued message, [`Session::pump`] everything already queued.
//!
//! ORDERING
//! ========
//! - Clicks are ignored while a drag is active, and stay ignored until the
//!   turn after the drag ended, so the click a host synthesizes on release
//!   does not clear the selection. [`Session::next_turn`] marks turn
//!   boundaries and also applies deferred picker toggles.
//! - A plain click on a light toggles that light's own picker. A click with
//!   ctrl or meta only changes the selection.
//! - Load and save results carry the epoch they were issued in. Results from
//!   an earlier user session are discarded by the sync machine.
//!
//! LIFECYCLE
//! =========
//! [`EventPort`] is the listener handle given to the host. Ending or dropping
//! the session closes its queue and aborts its auto-dismiss timers; later
//! sends through a port fail with [`SessionClosed`]. Load and save tasks are
//! detached: a write already in flight still reaches the store, and its
//! result is dropped with the closed queue.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::buffer::ConfigBuffer;
use crate::config::SessionConfig;
use crate::drag::{DragState, DragTracker};
use crate::grid::{CellAddr, Configuration, GridError, Rgb, Rgba};
use crate::input::{ClickEvent, ClickTarget, Key, PointerEvent};
use crate::layout::CellGeometry;
use crate::notify::{Notification, NotificationData, NotificationSink, Notifier};
use crate::resolve::{Resolution, Signal, track};
use crate::selection::Selection;
use crate::store::{ConfigStore, UserId};
use crate::sync::{Effect, LOAD_MESSAGES, SAVE_MESSAGES, SyncEvent, SyncMachine, SyncState};
use crate::toggle::{LightPickers, OpenToggle};

pub const BULK_LABEL_SELECTED: &str = "Set selected lights";
pub const BULK_LABEL_ALL: &str = "Set all lights";

/// Returned by an [`EventPort`] once its session has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("session closed")]
pub struct SessionClosed;

/// An event from the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The identity provider reported a new current user.
    User { id: Option<UserId> },
    Pointer(PointerEvent),
    Click(ClickEvent),
    Key { key: Key },
    /// Single-light color edit.
    SetColor { row: usize, col: usize, color: Rgba },
    /// Bulk color edit over the selection, or every light when none is selected.
    SetBulkColor { color: Rgba },
    /// The bulk picker trigger was clicked.
    TogglePicker,
    Apply,
    Discard,
    Dismiss { id: String },
    /// A scheduling-loop turn boundary.
    Turn,
}

/// Enabled state of the editing controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub apply_enabled: bool,
    pub discard_enabled: bool,
    /// Whether the grid and editing UI are shown at all.
    pub editing_visible: bool,
}

#[derive(Debug)]
enum SessionMsg {
    Ui(UiEvent),
    Loaded { epoch: u64, config: Option<Configuration>, resolution: Resolution },
    Saved { epoch: u64, resolution: Resolution },
    Expired { id: String, generation: u64 },
}

/// Whether clicks currently reach the selection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickGate {
    Armed,
    ArmNextTurn,
    Disarmed,
}

/// Host-side handle for feeding events into a session from other tasks.
#[derive(Debug, Clone)]
pub struct EventPort {
    tx: mpsc::UnboundedSender<SessionMsg>,
}

impl EventPort {
    /// Queue an event for the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] if the session has ended.
    pub fn send(&self, event: UiEvent) -> Result<(), SessionClosed> {
        self.tx.send(SessionMsg::Ui(event)).map_err(|_| SessionClosed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Forward every identity change from `identity` into the session behind `port`.
///
/// The current value is sent first. The task ends when either side closes.
pub fn follow_identity(
    port: EventPort,
    mut identity: watch::Receiver<Option<UserId>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let user = identity.borrow_and_update().clone();
            if port.send(UiEvent::User { id: user }).is_err() {
                break;
            }
            if identity.changed().await.is_err() {
                break;
            }
        }
        debug!("identity forwarder stopped");
    })
}

pub struct Session<S> {
    store: Arc<dyn ConfigStore>,
    geometry: Box<dyn CellGeometry + Send>,
    sink: S,
    sync: SyncMachine,
    buffer: Option<ConfigBuffer>,
    selection: Selection,
    drag: DragTracker,
    clicks: ClickGate,
    toggle: OpenToggle,
    pickers: LightPickers,
    notifier: Notifier,
    tx: mpsc::UnboundedSender<SessionMsg>,
    rx: mpsc::UnboundedReceiver<SessionMsg>,
    timers: JoinSet<()>,
    in_flight: usize,
}

impl<S: NotificationSink> Session<S> {
    /// Start a session with no user signed in.
    pub fn new(
        config: SessionConfig,
        store: Arc<dyn ConfigStore>,
        geometry: Box<dyn CellGeometry + Send>,
        sink: S,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        info!(
            drag_distance_px = config.drag.min_distance_px,
            notify_delay_ms = config.notify_delay_ms,
            default_color = %config.default_color.to_hex(),
            "session started"
        );
        Self {
            store,
            geometry,
            sink,
            sync: SyncMachine::new(Configuration::uniform(config.default_color)),
            buffer: None,
            selection: Selection::default(),
            drag: DragTracker::new(config.drag),
            clicks: ClickGate::Armed,
            toggle: OpenToggle::default(),
            pickers: LightPickers::default(),
            notifier: Notifier::new(config.notify_delay_ms),
            tx,
            rx,
            timers: JoinSet::new(),
            in_flight: 0,
        }
    }

    /// A new listener handle for this session.
    #[must_use]
    pub fn port(&self) -> EventPort {
        EventPort { tx: self.tx.clone() }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> &SyncState {
        self.sync.state()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        self.sync.user()
    }

    #[must_use]
    pub fn buffer(&self) -> Option<&ConfigBuffer> {
        self.buffer.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    #[must_use]
    pub fn picker_open(&self) -> bool {
        self.toggle.is_open()
    }

    /// The light whose own color picker is open.
    #[must_use]
    pub fn light_picker(&self) -> Option<CellAddr> {
        self.pickers.open_light()
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.notifier.live()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load and save operations whose results have not been processed yet.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn controls(&self) -> Controls {
        let dirty = self.buffer.as_ref().is_some_and(ConfigBuffer::is_dirty);
        let actionable = self.state().is_synced() && dirty;
        Controls {
            apply_enabled: actionable,
            discard_enabled: actionable,
            editing_visible: !matches!(self.state(), SyncState::Unsynced),
        }
    }

    /// Label of the bulk picker trigger.
    #[must_use]
    pub fn bulk_label(&self) -> &'static str {
        if self.selection.any() { BULK_LABEL_SELECTED } else { BULK_LABEL_ALL }
    }

    /// Color the bulk picker opens with.
    #[must_use]
    pub fn bulk_color(&self) -> Option<Rgb> {
        self.buffer.as_ref().map(|b| b.first_selected_value(&self.selection))
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Handle one host event synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingBounds`] when a drag update cannot measure a
    /// light, and [`GridError::OutOfRange`] for an edit outside the grid. The
    /// session state is unchanged by a failed event.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), GridError> {
        match event {
            UiEvent::User { id } => {
                let effects = self.sync.handle(SyncEvent::IdentityChanged(id));
                self.apply(effects);
            }
            UiEvent::Pointer(pointer) => self.on_pointer(&pointer)?,
            UiEvent::Click(click) => self.on_click(&click),
            UiEvent::Key { key } => self.on_key(&key),
            UiEvent::SetColor { row, col, color } => {
                self.on_set_color(CellAddr::new(row, col), color.into())?;
            }
            UiEvent::SetBulkColor { color } => self.on_set_bulk_color(color.into()),
            UiEvent::TogglePicker => self.toggle.request_toggle(),
            UiEvent::Apply => self.on_apply(),
            UiEvent::Discard => self.on_discard(),
            UiEvent::Dismiss { id } => {
                self.notifier.dismiss(&id, &mut self.sink);
            }
            UiEvent::Turn => self.next_turn(),
        }
        Ok(())
    }

    /// Apply work deferred to the next scheduling-loop turn.
    pub fn next_turn(&mut self) {
        if self.clicks == ClickGate::ArmNextTurn {
            self.clicks = ClickGate::Armed;
        }
        if self.toggle.next_turn() {
            debug!(open = self.toggle.is_open(), "picker toggled");
        }
        if self.pickers.next_turn() {
            debug!(light = ?self.pickers.open_light(), "light picker toggled");
        }
    }

    fn on_pointer(&mut self, pointer: &PointerEvent) -> Result<(), GridError> {
        let was_dragging = self.drag.state().is_dragging();
        let Some(state) = self.drag.handle(pointer) else {
            return Ok(());
        };
        if state.is_dragging() {
            self.clicks = ClickGate::Disarmed;
            if let Err(err) = self.selection.apply_drag(&state, &*self.geometry) {
                error!(%err, "drag selection failed");
                return Err(err);
            }
        } else if was_dragging {
            self.clicks = ClickGate::ArmNextTurn;
        }
        Ok(())
    }

    fn on_click(&mut self, click: &ClickEvent) {
        if self.toggle.on_click(click) {
            debug!("picker closed by outside click");
        }
        if self.pickers.on_click(click) {
            debug!("light picker closed by outside click");
        }
        // Only clicks on the grid surface reach the selection engine.
        if !matches!(
            click.target,
            ClickTarget::Cell { .. } | ClickTarget::LightPicker { .. } | ClickTarget::Surface
        ) {
            return;
        }
        if self.clicks != ClickGate::Armed || self.drag.state().is_dragging() {
            debug!(gate = ?self.clicks, "click ignored");
            return;
        }
        if let ClickTarget::Cell { row, col } = click.target {
            if !click.modifiers.multi_select() {
                self.pickers.request_toggle(CellAddr::new(row, col));
            }
        }
        self.selection.apply_click(click);
    }

    fn on_key(&mut self, key: &Key) {
        if self.toggle.on_key(key) {
            debug!("picker closed by escape");
        }
        if self.pickers.on_key(key) {
            debug!("light picker closed by escape");
        }
    }

    fn on_set_color(&mut self, addr: CellAddr, color: Rgb) -> Result<(), GridError> {
        let Some(buffer) = self.buffer.as_mut() else {
            debug!(%addr, "edit ignored while unsynced");
            return Ok(());
        };
        buffer.stage(addr, color)?;
        Ok(())
    }

    fn on_set_bulk_color(&mut self, color: Rgb) {
        let Some(buffer) = self.buffer.as_mut() else {
            debug!("bulk edit ignored while unsynced");
            return;
        };
        let changed = buffer.stage_selection(&self.selection, color);
        debug!(changed, color = %color.to_hex(), "bulk edit staged");
    }

    fn on_apply(&mut self) {
        let Some(proposed) = self.buffer.as_ref().map(|b| b.staged().clone()) else {
            debug!("commit rejected");
            return;
        };
        let effects = self.sync.handle(SyncEvent::CommitRequested(proposed));
        self.apply(effects);
    }

    fn on_discard(&mut self) {
        if !self.state().is_synced() {
            debug!(state = self.state().name(), "discard ignored");
            return;
        }
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.discard();
        }
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load { epoch, user, default } => self.spawn_load(epoch, user, default),
                Effect::Save { epoch, user, config } => self.spawn_save(epoch, user, config),
                Effect::Notify(data) => self.notify(data),
                Effect::Loaded(config) => self.buffer = Some(ConfigBuffer::new(config)),
                Effect::Committed(config) => {
                    if let Some(buffer) = self.buffer.as_mut() {
                        buffer.rebase(&config);
                    }
                }
                Effect::Cleared => {
                    self.buffer = None;
                    self.selection.clear();
                    self.drag.reset();
                    self.pickers.reset();
                }
            }
        }
    }

    fn spawn_load(&mut self, epoch: u64, user: UserId, default: Configuration) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            track(LOAD_MESSAGES, store.load(&user, &default), |signal| match signal {
                Signal::Pending => debug!(%user, epoch, "load pending"),
                Signal::Settled { value, resolution } => {
                    if tx.send(SessionMsg::Loaded { epoch, config: value, resolution }).is_err() {
                        debug!(epoch, "session closed before load settled");
                    }
                }
            })
            .await;
        });
    }

    fn spawn_save(&mut self, epoch: u64, user: UserId, config: Configuration) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            track(SAVE_MESSAGES, store.save(&user, &config), |signal| match signal {
                Signal::Pending => debug!(%user, epoch, "save pending"),
                Signal::Settled { resolution, .. } => {
                    if tx.send(SessionMsg::Saved { epoch, resolution }).is_err() {
                        debug!(epoch, "session closed before save settled");
                    }
                }
            })
            .await;
        });
    }

    fn notify(&mut self, data: NotificationData) {
        let notification = self.notifier.add(data, &mut self.sink);
        if !notification.auto_dismisses() {
            return;
        }
        let Some(generation) = self.notifier.generation(&notification.id) else {
            return;
        };
        let tx = self.tx.clone();
        let delay = Duration::from_millis(notification.delay_ms);
        let id = notification.id;
        self.timers.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(SessionMsg::Expired { id, generation }).is_err() {
                debug!("session closed before notification expired");
            }
        });
    }

    // =========================================================================
    // QUEUE
    // =========================================================================

    /// Wait for the next queued message and handle it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] once the session has ended and its queue is empty.
    pub async fn step(&mut self) -> Result<(), SessionClosed> {
        let msg = self.rx.recv().await.ok_or(SessionClosed)?;
        self.handle_msg(msg);
        Ok(())
    }

    /// Handle everything already queued without waiting. Returns how many
    /// messages were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_msg(msg);
            handled += 1;
        }
        handled
    }

    /// Process messages until no load or save is outstanding.
    pub async fn drain(&mut self) {
        while self.in_flight > 0 {
            if self.step().await.is_err() {
                break;
            }
        }
    }

    fn handle_msg(&mut self, msg: SessionMsg) {
        while self.timers.try_join_next().is_some() {}
        match msg {
            SessionMsg::Ui(event) => {
                if let Err(err) = self.dispatch(event) {
                    debug!(%err, "queued event failed");
                }
            }
            SessionMsg::Loaded { epoch, config, resolution } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let settled = SyncEvent::LoadSettled { epoch, config, resolution };
                let effects = self.sync.handle(settled);
                self.apply(effects);
            }
            SessionMsg::Saved { epoch, resolution } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let effects = self.sync.handle(SyncEvent::SaveSettled { epoch, resolution });
                self.apply(effects);
            }
            SessionMsg::Expired { id, generation } => {
                self.notifier.expire(&id, generation, &mut self.sink);
            }
        }
    }

    /// End the session: close the queue, abort auto-dismiss timers, and hand
    /// back the sink. Loads and saves already in flight run to completion.
    pub fn end(mut self) -> S {
        self.rx.close();
        self.timers.abort_all();
        info!(
            pending = self.in_flight,
            live_notifications = self.notifier.live().len(),
            "session ended, listeners released"
        );
        self.sink
    }
}
