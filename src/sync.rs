//! Sync state machine for the authoritative configuration.
//!
//! DESIGN
//! ======
//! [`SyncMachine::handle`] is a reducer: one event in, one synchronous
//! transition, and a list of [`Effect`]s out. It never performs I/O. The
//! session runs `Load`/`Save` effects and feeds their settlement back as
//! events.
//!
//! ```text
//! Unsynced --load ok-----> Synced(loaded)
//! Unsynced --load failed-> Unsynced
//! Synced   --commit------> PendingSync(current, proposed)
//! PendingSync --save ok--> Synced(proposed)
//! PendingSync --failed---> Synced(current)
//! ```
//!
//! A commit outside `Synced` is rejected with no transition, so at most one
//! write is ever in flight. Loads are edge-triggered on the absent -> present
//! user transition. Each user session gets an epoch; settlements tagged with
//! an older epoch are discarded.
//!
//! A switch straight from one present user to another keeps the loaded
//! configuration and the epoch. Later commits are written under the new id.
//! Hosts that switch accounts should report the absent user in between.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use tracing::debug;

use crate::grid::Configuration;
use crate::notify::NotificationData;
use crate::resolve::{Resolution, ResolveMessages};
use crate::store::UserId;

pub const LOAD_MESSAGES: ResolveMessages =
    ResolveMessages { failure_prefix: "Error getting stored lights.", success: None };

pub const SAVE_MESSAGES: ResolveMessages = ResolveMessages {
    failure_prefix: "Error configuring lights.",
    success: Some("Lights successfully configured!"),
};

pub const NO_CHANGES_MESSAGE: &str = "No changes to apply.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing loaded for the current user.
    Unsynced,
    /// A write of `proposed` is in flight; `current` is still authoritative.
    PendingSync { current: Configuration, proposed: Configuration },
    /// `config` matches the store.
    Synced { config: Configuration },
}

impl SyncState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unsynced => "unsynced",
            Self::PendingSync { .. } => "pending",
            Self::Synced { .. } => "synced",
        }
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }

    /// The authoritative configuration, if one is loaded.
    #[must_use]
    pub fn authoritative(&self) -> Option<&Configuration> {
        match self {
            Self::Unsynced => None,
            Self::PendingSync { current, .. } => Some(current),
            Self::Synced { config } => Some(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    IdentityChanged(Option<UserId>),
    LoadSettled { epoch: u64, config: Option<Configuration>, resolution: Resolution },
    CommitRequested(Configuration),
    SaveSettled { epoch: u64, resolution: Resolution },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load { epoch: u64, user: UserId, default: Configuration },
    Save { epoch: u64, user: UserId, config: Configuration },
    Notify(NotificationData),
    /// The authoritative configuration was replaced by a load.
    Loaded(Configuration),
    /// The authoritative configuration was replaced by a successful write.
    Committed(Configuration),
    /// The user session ended; local editing state must be dropped.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct SyncMachine {
    state: SyncState,
    user: Option<UserId>,
    epoch: u64,
    default: Configuration,
}

impl SyncMachine {
    /// A machine with no user, creating `default` for first-time users.
    #[must_use]
    pub fn new(default: Configuration) -> Self {
        Self { state: SyncState::Unsynced, user: None, epoch: 0, default }
    }

    #[must_use]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn default_config(&self) -> &Configuration {
        &self.default
    }

    pub fn handle(&mut self, event: SyncEvent) -> Vec<Effect> {
        match event {
            SyncEvent::IdentityChanged(user) => self.on_identity(user),
            SyncEvent::LoadSettled { epoch, config, resolution } => {
                self.on_load_settled(epoch, config, resolution)
            }
            SyncEvent::CommitRequested(proposed) => self.on_commit(proposed),
            SyncEvent::SaveSettled { epoch, resolution } => self.on_save_settled(epoch, resolution),
        }
    }

    fn transition(&mut self, next: SyncState) {
        debug!(from = self.state.name(), to = next.name(), epoch = self.epoch, "sync transition");
        self.state = next;
    }

    fn on_identity(&mut self, user: Option<UserId>) -> Vec<Effect> {
        match (self.user.is_some(), user) {
            (false, Some(user)) => {
                self.epoch += 1;
                self.user = Some(user.clone());
                vec![Effect::Load { epoch: self.epoch, user, default: self.default.clone() }]
            }
            (true, Some(user)) => {
                // Present to present: no load.
                if self.user.as_ref() != Some(&user) {
                    debug!(
                        from = self.user.as_ref().map(UserId::as_str),
                        to = user.as_str(),
                        state = self.state.name(),
                        "user switched without reload"
                    );
                }
                self.user = Some(user);
                Vec::new()
            }
            (true, None) => {
                self.epoch += 1;
                self.user = None;
                self.transition(SyncState::Unsynced);
                vec![Effect::Cleared]
            }
            (false, None) => Vec::new(),
        }
    }

    fn is_stale(&self, epoch: u64, what: &'static str) -> bool {
        if epoch == self.epoch {
            return false;
        }
        debug!(what, epoch, current = self.epoch, "stale effect result discarded");
        true
    }

    fn on_load_settled(
        &mut self,
        epoch: u64,
        config: Option<Configuration>,
        resolution: Resolution,
    ) -> Vec<Effect> {
        if self.is_stale(epoch, "load") {
            return Vec::new();
        }
        if self.state != SyncState::Unsynced {
            debug!(state = self.state.name(), "load settled outside unsynced");
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(config) = config {
            self.transition(SyncState::Synced { config: config.clone() });
            effects.push(Effect::Loaded(config));
        }
        effects.extend(resolution.notification().map(Effect::Notify));
        effects
    }

    fn on_commit(&mut self, proposed: Configuration) -> Vec<Effect> {
        let (SyncState::Synced { config }, Some(user)) = (&self.state, &self.user) else {
            debug!(state = self.state.name(), "commit rejected");
            return Vec::new();
        };
        if *config == proposed {
            return vec![Effect::Notify(NotificationData::info(NO_CHANGES_MESSAGE))];
        }
        let user = user.clone();
        let current = config.clone();
        self.transition(SyncState::PendingSync { current, proposed: proposed.clone() });
        vec![Effect::Save { epoch: self.epoch, user, config: proposed }]
    }

    fn on_save_settled(&mut self, epoch: u64, resolution: Resolution) -> Vec<Effect> {
        if self.is_stale(epoch, "save") {
            return Vec::new();
        }
        let SyncState::PendingSync { current, proposed } = &self.state else {
            debug!(state = self.state.name(), "save settled with no write in flight");
            return Vec::new();
        };
        let (current, proposed) = (current.clone(), proposed.clone());

        let mut effects = Vec::new();
        if resolution.is_success() {
            self.transition(SyncState::Synced { config: proposed.clone() });
            effects.push(Effect::Committed(proposed));
        } else {
            self.transition(SyncState::Synced { config: current });
        }
        effects.extend(resolution.notification().map(Effect::Notify));
        effects
    }
}
