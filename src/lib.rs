//! lyricsync - karaoke synchronization engine
//!
//! Turns timestamped word segments from a transcription job into live
//! word/line highlighting state driven by a playback clock. Three
//! pieces, leaves first:
//!
//! - [`lines::group_into_lines`]: partition word segments into display
//!   lines (pure, runs once per track)
//! - [`resolve`]: hinted incremental active-index search with a
//!   binary-search fallback (pure, called every tick)
//! - [`driver::SyncDriver`]: owns the playback [`transport::Transport`],
//!   runs the tick loop while audio plays, and publishes
//!   [`state::ActiveState`] changes to the presentation layer
//!
//! The surrounding application supplies the segment list and the audio
//! transport; this crate owns no I/O beyond reading the transport clock.

pub mod driver;
pub mod lines;
pub mod resolve;
pub mod segment;
pub mod state;
pub mod transport;

pub use driver::SyncDriver;
pub use lines::{DisplayLine, GroupingConfig, LineWord, group_into_lines};
pub use resolve::{TimeSpan, resolve_active_index, rightmost_started_index};
pub use segment::{WordSegment, parse_timestamps, sanitize_segments};
pub use state::{ActiveState, LineClass, WordClass};
pub use transport::{ManualTransport, PlaybackStatus, Transport, TransportEvent};
