//! Playback transport abstraction
//!
//! The engine never owns audio output. Whatever does (a rodio sink, a
//! browser audio element behind FFI) exposes its clock and status
//! through [`Transport`] and forwards lifecycle notifications as
//! [`TransportEvent`]s.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Playback status as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

/// Lifecycle notifications forwarded from the transport's owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Play,
    Pause,
    Ended,
    Seeked,
}

/// Read side of a playback source
pub trait Transport: Send + Sync {
    /// Current playback position
    fn position(&self) -> Duration;

    /// Current playback status
    fn status(&self) -> PlaybackStatus;
}

/// A transport backed by a manually advanced clock
///
/// Stands in for real audio output in tests and headless runs: the
/// caller moves the position and flips the status, the driver observes.
#[derive(Debug)]
pub struct ManualTransport {
    inner: Mutex<ManualState>,
}

#[derive(Debug)]
struct ManualState {
    position: Duration,
    status: PlaybackStatus,
}

impl ManualTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ManualState {
                position: Duration::ZERO,
                status: PlaybackStatus::Stopped,
            }),
        })
    }

    pub fn set_position(&self, position: Duration) {
        self.inner.lock().position = position;
    }

    /// Convenience setter taking seconds; negative input clamps to zero
    pub fn set_position_secs(&self, secs: f64) {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self.set_position(Duration::from_secs_f64(secs));
    }

    pub fn set_status(&self, status: PlaybackStatus) {
        self.inner.lock().status = status;
    }
}

impl Transport for ManualTransport {
    fn position(&self) -> Duration {
        self.inner.lock().position
    }

    fn status(&self) -> PlaybackStatus {
        self.inner.lock().status
    }
}
