//! Playback-driven synchronization loop
//!
//! Bridges the transport clock to the active-index resolver: while the
//! transport is playing, a tokio task ticks at sub-frame cadence,
//! recomputes the active word/line/cursor with the previous tick's
//! indices as hints, and publishes changes over a watch channel. Seeks
//! and track endings trigger one forced resynchronization outside the
//! loop so paused scrubbing and terminal state stay correct.
//!
//! Must run inside a tokio runtime; event handlers and the tick task
//! serialize on one mutex, so there is a single logical writer of the
//! published state at any time.

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::lines::{self, DisplayLine, GroupingConfig};
use crate::resolve::{resolve_active_index, rightmost_started_index};
use crate::segment::WordSegment;
use crate::state::ActiveState;
use crate::transport::{PlaybackStatus, Transport, TransportEvent};

/// Tick period while the transport is playing
const TICK_PERIOD: Duration = Duration::from_millis(33);

struct DriverInner {
    segments: Arc<Vec<WordSegment>>,
    lines: Arc<Vec<DisplayLine>>,
    /// Last published state, also the hint source for the next resolve
    state: ActiveState,
    /// Whether a tick loop currently owns the schedule
    running: bool,
    /// Bumped on every start/stop so a cancelled loop's late tick
    /// cannot publish
    generation: u64,
}

struct DriverShared {
    transport: Arc<dyn Transport>,
    grouping: GroupingConfig,
    inner: Mutex<DriverInner>,
    state_tx: watch::Sender<ActiveState>,
    scroll_tx: mpsc::UnboundedSender<usize>,
}

impl DriverShared {
    fn resync(&self) {
        let mut inner = self.inner.lock();
        self.resync_locked(&mut inner);
    }

    /// One synchronization pass: read the clock, resolve, publish changes
    fn resync_locked(&self, inner: &mut DriverInner) {
        let time_s = self.transport.position().as_secs_f64();
        let previous = inner.state;
        let next = ActiveState {
            active_word: resolve_active_index(&inner.segments, time_s, previous.active_word),
            active_line: resolve_active_index(&inner.lines, time_s, previous.active_line),
            line_cursor: rightmost_started_index(&inner.lines, time_s),
        };

        if next != previous {
            inner.state = next;
            self.state_tx.send_replace(next);

            if let Some(line) = next.active_line {
                if previous.active_line != Some(line) {
                    // Exactly once per transition into a new active line
                    let _ = self.scroll_tx.send(line);
                }
            }
        }
    }
}

/// Owns the transport side of karaoke synchronization
///
/// Feed it the segment list once transcription completes and forward the
/// transport's lifecycle events; watch [`SyncDriver::subscribe`] for
/// active-state changes and [`SyncDriver::scroll_requests`] for
/// bring-into-view triggers.
pub struct SyncDriver {
    shared: Arc<DriverShared>,
    scroll_rx: Mutex<Option<mpsc::UnboundedReceiver<usize>>>,
}

impl SyncDriver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_grouping(transport, GroupingConfig::default())
    }

    pub fn with_grouping(transport: Arc<dyn Transport>, grouping: GroupingConfig) -> Self {
        let (state_tx, _) = watch::channel(ActiveState::default());
        let (scroll_tx, scroll_rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(DriverShared {
                transport,
                grouping,
                inner: Mutex::new(DriverInner {
                    segments: Arc::new(Vec::new()),
                    lines: Arc::new(Vec::new()),
                    state: ActiveState::default(),
                    running: false,
                    generation: 0,
                }),
                state_tx,
                scroll_tx,
            }),
            scroll_rx: Mutex::new(Some(scroll_rx)),
        }
    }

    /// Watch the published active state
    pub fn subscribe(&self) -> watch::Receiver<ActiveState> {
        self.shared.state_tx.subscribe()
    }

    /// Take the scroll-into-view request stream
    ///
    /// Yields the line index once per transition into a new active line.
    /// Can only be taken once.
    pub fn scroll_requests(&self) -> anyhow::Result<mpsc::UnboundedReceiver<usize>> {
        match self.scroll_rx.lock().take() {
            Some(rx) => Ok(rx),
            None => bail!("scroll request stream already taken"),
        }
    }

    /// Current published state
    pub fn state(&self) -> ActiveState {
        *self.shared.state_tx.borrow()
    }

    pub fn segments(&self) -> Arc<Vec<WordSegment>> {
        self.shared.inner.lock().segments.clone()
    }

    pub fn lines(&self) -> Arc<Vec<DisplayLine>> {
        self.shared.inner.lock().lines.clone()
    }

    /// Replace the segment source (new track loaded)
    ///
    /// Regroups display lines, resets hints and published indices to
    /// none, then runs one immediate resynchronization in case the
    /// transport is already mid-playback for the fresh source.
    pub fn set_segments(&self, segments: Vec<WordSegment>) {
        let lines = lines::group_into_lines(&segments, &self.shared.grouping);
        tracing::info!(words = segments.len(), lines = lines.len(), "segment source changed");

        let mut inner = self.shared.inner.lock();
        inner.segments = Arc::new(segments);
        inner.lines = Arc::new(lines);
        inner.state = ActiveState::default();
        // Publish the reset before the first resolved tick
        self.shared.state_tx.send_replace(ActiveState::default());
        self.shared.resync_locked(&mut inner);
    }

    /// React to a transport lifecycle event
    pub fn handle_event(&self, event: TransportEvent) {
        tracing::debug!(?event, "transport event");
        match event {
            TransportEvent::Play => self.start_loop(),
            TransportEvent::Pause => self.stop_loop(),
            TransportEvent::Ended => {
                // Land exactly on the terminal state instead of leaving
                // stale mid-playback highlighting
                self.stop_loop();
                self.shared.resync();
            }
            TransportEvent::Seeked => self.shared.resync(),
        }
    }

    /// Force one synchronization pass regardless of loop state
    pub fn resync(&self) {
        self.shared.resync();
    }

    /// Start the tick loop; no-op when one is already running
    fn start_loop(&self) {
        let generation = {
            let mut inner = self.shared.inner.lock();
            if inner.running {
                return;
            }
            inner.running = true;
            inner.generation += 1;
            inner.generation
        };
        tracing::debug!(generation, "starting sync loop");

        let shared = self.shared.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let mut inner = shared.inner.lock();
                if inner.generation != generation || !inner.running {
                    // Cancelled while this tick was pending
                    return;
                }
                shared.resync_locked(&mut inner);
                if shared.transport.status() != PlaybackStatus::Playing {
                    tracing::debug!(generation, "transport stopped playing, sync loop exiting");
                    inner.running = false;
                    return;
                }
            }
        });
    }

    fn stop_loop(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.running {
            inner.running = false;
            inner.generation += 1;
            tracing::debug!(generation = inner.generation, "sync loop stopped");
        }
    }
}

impl Drop for SyncDriver {
    fn drop(&mut self) {
        self.stop_loop();
    }
}
