//! # Application Events
//!
//! Notifications published by the coordinator to renderers.

use crate::app::state::AppState;

/// Published to every subscriber of the coordinator
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The state changed; carries the new snapshot
    SnapshotChanged(AppState),
    /// The wallet switched chains and the client was reset to its initial state
    Reloaded,
}
