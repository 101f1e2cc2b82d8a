//! Data models for the Go board settings API.
//!
//! This module contains the wire envelope, the per-domain status types and
//! the credential types submitted back to the device.

// Export submodules
pub mod envelope;
pub mod game;
pub mod online_go;
pub mod password;
pub mod wifi;

/// Result of a credential save the device accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<S> {
    /// The device answered with the new status.
    Applied(S),

    /// The device accepted the change and is restarting to apply it.
    Restarting,
}
