//! Runtime configuration parsed from environment variables.
//!
//! Optional numeric knobs fall back to their defaults when absent or
//! malformed. Choices that change behavior (the store backend, the default
//! light color) are validated and fail startup instead.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{
    DEFAULT_DRAG_DISTANCE_PX, DEFAULT_DRAG_THROTTLE_MS, DEFAULT_LIGHT_COLOR,
    DEFAULT_NOTIFY_DELAY_MS,
};
use crate::drag::DragConfig;
use crate::grid::Rgb;

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown LIGHTBOARD_STORE: {0} (expected 'memory' or 'postgres')")]
    UnknownBackend(String),
    #[error("invalid LIGHTBOARD_DEFAULT_COLOR: {0} (expected #rgb or #rrggbb)")]
    InvalidColor(String),
    #[error("DATABASE_URL must be set when LIGHTBOARD_STORE=postgres")]
    MissingDatabaseUrl,
}

/// Per-session tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub drag: DragConfig,
    /// Auto-dismiss delay applied to notifications that do not set one.
    pub notify_delay_ms: u64,
    /// Color of every light in a first-time user's configuration.
    pub default_color: Rgb,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            drag: DragConfig::default(),
            notify_delay_ms: DEFAULT_NOTIFY_DELAY_MS,
            default_color: DEFAULT_LIGHT_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub store: StoreBackend,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `LIGHTBOARD_DRAG_DISTANCE_PX`: default 3
    /// - `LIGHTBOARD_DRAG_THROTTLE_MS`: default 16
    /// - `LIGHTBOARD_NOTIFY_DELAY_MS`: default 6000, 0 disables auto-dismiss
    /// - `LIGHTBOARD_DEFAULT_COLOR`: default `#ff0000`
    /// - `LIGHTBOARD_STORE`: `memory` (default) or `postgres`
    /// - `DATABASE_URL`: required for `postgres`
    /// - `DB_MAX_CONNECTIONS`: default 5
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown backend, an unparseable color,
    /// or a Postgres backend without `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let drag = DragConfig {
            min_distance_px: parse_or(
                lookup("LIGHTBOARD_DRAG_DISTANCE_PX"),
                DEFAULT_DRAG_DISTANCE_PX,
            ),
            throttle_ms: parse_or(lookup("LIGHTBOARD_DRAG_THROTTLE_MS"), DEFAULT_DRAG_THROTTLE_MS),
        };
        let notify_delay_ms =
            parse_or(lookup("LIGHTBOARD_NOTIFY_DELAY_MS"), DEFAULT_NOTIFY_DELAY_MS);
        let default_color = parse_color(lookup("LIGHTBOARD_DEFAULT_COLOR").as_deref())?;

        let store = match lookup("LIGHTBOARD_STORE").as_deref().map(str::trim).unwrap_or("memory") {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?,
                max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), DEFAULT_DB_MAX_CONNECTIONS),
            },
            other => return Err(ConfigError::UnknownBackend(other.to_owned())),
        };

        Ok(Self { session: SessionConfig { drag, notify_delay_ms, default_color }, store })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn parse_color(raw: Option<&str>) -> Result<Rgb, ConfigError> {
    match raw {
        None => Ok(DEFAULT_LIGHT_COLOR),
        Some(raw) => Rgb::parse_hex(raw).ok_or_else(|| ConfigError::InvalidColor(raw.to_owned())),
    }
}
