//! Editing engine for a grid of colored lights.
//!
//! A signed-in user edits a staged copy of their stored light configuration:
//! single lights through a per-light color, many lights at once through a
//! drag or click selection and a bulk color. Applying the staged copy writes
//! it to the remote store, and every remote operation reports its outcome as
//! a transient notification. The host is responsible only for delivering
//! [`session::UiEvent`]s and rendering what the session exposes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Scoped editing context that wires every other module together |
//! | [`grid`] | Grid topology, colors, and the [`grid::Configuration`] codec |
//! | [`geometry`] | Rectangle normalization and overlap tests |
//! | [`input`] | Pointer, click, and key event types |
//! | [`drag`] | Pointer stream to drag rectangle tracker |
//! | [`layout`] | On-screen light bounds and the headless row layout |
//! | [`selection`] | Drag and click selection engine |
//! | [`buffer`] | Staged configuration edits against the authoritative copy |
//! | [`sync`] | Load and commit state machine |
//! | [`resolve`] | Remote outcome resolution into notifications |
//! | [`notify`] | Notification list and sink contract |
//! | [`toggle`] | Deferred open/close state of the color pickers |
//! | [`store`] | Remote configuration store contract and backends |
//! | [`db`] | Postgres pool setup and migrations |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Shared constants (grid shape, thresholds, delays) |

pub mod buffer;
pub mod config;
pub mod consts;
pub mod db;
pub mod drag;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod layout;
pub mod notify;
pub mod resolve;
pub mod selection;
pub mod session;
pub mod store;
pub mod sync;
pub mod toggle;
