//! In-process store holding encoded configurations in a map.
//!
//! Used by the headless driver's default backend and by tests. Failures can be
//! injected per operation to exercise the error paths of the session.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{ConfigStore, StoreError, UserId};
use crate::grid::Configuration;

/// A failure to inject into the next operations of a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Unavailable,
    PermissionDenied,
}

impl Fault {
    fn error(self, user: &UserId) -> StoreError {
        match self {
            Self::Unavailable => StoreError::Unavailable("injected fault".into()),
            Self::PermissionDenied => StoreError::PermissionDenied(user.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    docs: HashMap<UserId, String>,
    load_fault: Option<Fault>,
    save_fault: Option<Fault>,
    saves: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every load fail with `fault` until cleared with `None`.
    pub fn fail_loads(&self, fault: Option<Fault>) {
        self.lock().load_fault = fault;
    }

    /// Make every save fail with `fault` until cleared with `None`.
    pub fn fail_saves(&self, fault: Option<Fault>) {
        self.lock().save_fault = fault;
    }

    /// Seed a raw stored payload for `user`.
    pub fn insert_raw(&self, user: &UserId, payload: impl Into<String>) {
        self.lock().docs.insert(user.clone(), payload.into());
    }

    /// The raw stored payload for `user`.
    #[must_use]
    pub fn stored(&self, user: &UserId) -> Option<String> {
        self.lock().docs.get(user).cloned()
    }

    /// Successful writes so far, including defaults created by `load`.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }
}

#[async_trait::async_trait]
impl ConfigStore for MemoryStore {
    async fn load(
        &self,
        user: &UserId,
        default: &Configuration,
    ) -> Result<Configuration, StoreError> {
        let mut inner = self.lock();
        if let Some(fault) = inner.load_fault {
            return Err(fault.error(user));
        }
        if let Some(payload) = inner.docs.get(user) {
            return Ok(Configuration::decode(payload, &default.shape())?);
        }
        let payload = default.encode()?;
        inner.docs.insert(user.clone(), payload);
        inner.saves += 1;
        debug!(%user, "stored default configuration");
        Ok(default.clone())
    }

    async fn save(&self, user: &UserId, config: &Configuration) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(fault) = inner.save_fault {
            return Err(fault.error(user));
        }
        let payload = config.encode()?;
        inner.docs.insert(user.clone(), payload);
        inner.saves += 1;
        Ok(())
    }
}
