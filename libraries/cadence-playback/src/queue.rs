//! Dual-queue state
//!
//! Two queues live side by side for the whole session:
//!
//! ```text
//! User queue (picked by the listener):     Auto queue (generated):
//!   0  Track A                               0  Track D
//!   1  Track B   <- cursor {User, 1}         1  Track E
//!   2  Track C                               2  Track F
//! ```
//!
//! The cursor names the active queue and the position in it. Running off the
//! end of the user queue continues into the auto queue when unlimited mode is
//! on; running off the end of the auto queue asks for a fresh one.
//!
//! `QueueState` is the only place queues and the cursor are mutated. The
//! transition functions (`compute_next`, `compute_prev`) are pure: they only
//! describe what should happen, and the engine applies the result.

use crate::shuffle::random_index;
use crate::types::{PlaybackMode, QueueCursor, QueueKind, RepeatMode};
use cadence_core::{Track, TrackId};
use rand::Rng;

/// Outcome of asking for the track after the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Repeat-track: play the current track again, cursor unchanged
    Replay,

    /// Move to an in-bounds index of the active queue
    Advance { kind: QueueKind, index: usize },

    /// User queue exhausted in unlimited mode: continue at auto index 0
    SwitchToAuto,

    /// Repeat-queue: start the active queue over
    WrapQueue { index: usize },

    /// Auto queue exhausted in unlimited mode: caller must generate a fresh
    /// auto queue and resume at its index 0
    RegenerateAuto,

    /// Nothing left to play; cursor unchanged
    Stop,
}

/// Outcome of asking for the track before the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrevAction {
    /// Repeat-track: play the current track again, cursor unchanged
    Replay,

    /// Move to an in-bounds index of the active queue
    Retreat { kind: QueueKind, index: usize },

    /// Stepped before the start of the auto queue: back to the last user track
    SwitchToUser { index: usize },

    /// Repeat-queue: jump to the end of the active queue
    WrapQueue { index: usize },

    /// Nothing before the current track; cursor unchanged
    Stop,
}

/// Ordered list of tracks tagged with its kind
///
/// Never holds placeholders: tracks that failed to resolve are filtered out
/// before they get here.
#[derive(Debug, Clone)]
pub struct Queue {
    kind: QueueKind,
    tracks: Vec<Track>,
}

impl Queue {
    /// Create an empty queue
    pub fn new(kind: QueueKind) -> Self {
        Self {
            kind,
            tracks: Vec::new(),
        }
    }

    /// Which queue this is
    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the first track with the given id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }
}

/// Both queues plus the cursor
#[derive(Debug, Clone)]
pub struct QueueState {
    user: Queue,
    auto: Queue,
    cursor: Option<QueueCursor>,
}

impl QueueState {
    /// Create empty queues with no cursor
    pub fn new() -> Self {
        Self {
            user: Queue::new(QueueKind::User),
            auto: Queue::new(QueueKind::Auto),
            cursor: None,
        }
    }

    /// Queue of the given kind
    pub fn queue(&self, kind: QueueKind) -> &Queue {
        match kind {
            QueueKind::User => &self.user,
            QueueKind::Auto => &self.auto,
        }
    }

    fn queue_mut(&mut self, kind: QueueKind) -> &mut Queue {
        match kind {
            QueueKind::User => &mut self.user,
            QueueKind::Auto => &mut self.auto,
        }
    }

    /// Current cursor (None when nothing is loaded from a queue)
    pub fn cursor(&self) -> Option<QueueCursor> {
        self.cursor
    }

    /// Kind of the active queue
    pub fn active_kind(&self) -> Option<QueueKind> {
        self.cursor.map(|c| c.kind)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor
            .and_then(|c| self.queue(c.kind).get(c.index))
    }

    /// Replace the queue of `kind` and make it active
    ///
    /// The cursor lands on the first track matching `focus`, or index 0 when
    /// there is no focus or it is not in the list. Returns the track under
    /// the new cursor; an empty list clears the cursor.
    pub fn adopt_queue(
        &mut self,
        kind: QueueKind,
        tracks: Vec<Track>,
        focus: Option<&TrackId>,
    ) -> Option<&Track> {
        let queue = self.queue_mut(kind);
        queue.tracks = tracks;

        let index = focus
            .and_then(|id| queue.position_of(id))
            .unwrap_or(0);

        self.cursor = if queue.is_empty() {
            None
        } else {
            Some(QueueCursor::new(kind, index))
        };

        self.current()
    }

    /// Replace the queue of `kind` without making it active
    ///
    /// Used to install a freshly generated auto queue behind the playing user
    /// queue. If the cursor was pointing into the replaced queue it follows the
    /// current track into the new list, or detaches when the track is gone.
    pub fn replace_queue(&mut self, kind: QueueKind, tracks: Vec<Track>) {
        let current_id = match self.cursor {
            Some(cursor) if cursor.kind == kind => self.current().map(|t| t.id.clone()),
            _ => None,
        };
        let follows_cursor = self.cursor.is_some_and(|c| c.kind == kind);

        let queue = self.queue_mut(kind);
        queue.tracks = tracks;

        if follows_cursor {
            let index = current_id.and_then(|id| queue.position_of(&id));
            self.cursor = index.map(|index| QueueCursor::new(kind, index));
        }
    }

    /// Append a track to the end of a queue; the cursor does not move
    pub fn push(&mut self, kind: QueueKind, track: Track) {
        self.queue_mut(kind).tracks.push(track);
    }

    /// Point the cursor at `index` of `kind`
    ///
    /// Returns `None` and leaves the cursor untouched when out of bounds.
    pub fn move_to(&mut self, kind: QueueKind, index: usize) -> Option<&Track> {
        if index >= self.queue(kind).len() {
            return None;
        }
        self.cursor = Some(QueueCursor::new(kind, index));
        self.current()
    }

    /// Forget the cursor (nothing loaded)
    pub fn detach(&mut self) {
        self.cursor = None;
    }

    /// Empty both queues and drop the cursor
    pub fn clear(&mut self) {
        self.user.tracks.clear();
        self.auto.tracks.clear();
        self.cursor = None;
    }

    /// Whether the row `index` of queue `kind` is the loaded track
    pub fn is_current(&self, kind: QueueKind, index: usize) -> bool {
        self.cursor == Some(QueueCursor::new(kind, index))
    }

    /// Decide what follows the current track, using the thread RNG for shuffle
    pub fn compute_next(&self, mode: PlaybackMode, unlimited: bool) -> NextAction {
        self.compute_next_with(mode, unlimited, &mut rand::thread_rng())
    }

    /// Decide what follows the current track
    ///
    /// Evaluation order once the candidate index overflows: switch to auto,
    /// wrap on repeat-queue, regenerate auto, stop.
    pub fn compute_next_with<R: Rng + ?Sized>(
        &self,
        mode: PlaybackMode,
        unlimited: bool,
        rng: &mut R,
    ) -> NextAction {
        let Some(cursor) = self.cursor else {
            return NextAction::Stop;
        };
        let len = self.queue(cursor.kind).len();
        if len == 0 {
            return NextAction::Stop;
        }

        if mode.repeat == RepeatMode::Track {
            return NextAction::Replay;
        }

        let candidate = if mode.shuffle {
            match random_index(len, rng) {
                Some(index) => index,
                None => return NextAction::Stop,
            }
        } else {
            cursor.index + 1
        };

        if candidate < len {
            return NextAction::Advance {
                kind: cursor.kind,
                index: candidate,
            };
        }

        if cursor.kind == QueueKind::User && unlimited && !self.auto.is_empty() {
            NextAction::SwitchToAuto
        } else if mode.repeat == RepeatMode::Queue {
            NextAction::WrapQueue { index: 0 }
        } else if cursor.kind == QueueKind::Auto && unlimited {
            NextAction::RegenerateAuto
        } else {
            NextAction::Stop
        }
    }

    /// Decide what precedes the current track, using the thread RNG for shuffle
    pub fn compute_prev(&self, mode: PlaybackMode) -> PrevAction {
        self.compute_prev_with(mode, &mut rand::thread_rng())
    }

    /// Decide what precedes the current track
    pub fn compute_prev_with<R: Rng + ?Sized>(&self, mode: PlaybackMode, rng: &mut R) -> PrevAction {
        let Some(cursor) = self.cursor else {
            return PrevAction::Stop;
        };
        let len = self.queue(cursor.kind).len();
        if len == 0 {
            return PrevAction::Stop;
        }

        if mode.repeat == RepeatMode::Track {
            return PrevAction::Replay;
        }

        if mode.shuffle {
            return match random_index(len, rng) {
                Some(index) => PrevAction::Retreat {
                    kind: cursor.kind,
                    index,
                },
                None => PrevAction::Stop,
            };
        }

        if let Some(index) = cursor.index.checked_sub(1) {
            return PrevAction::Retreat {
                kind: cursor.kind,
                index,
            };
        }

        if cursor.kind == QueueKind::Auto && !self.user.is_empty() {
            PrevAction::SwitchToUser {
                index: self.user.len() - 1,
            }
        } else if mode.repeat == RepeatMode::Queue {
            PrevAction::WrapQueue { index: len - 1 }
        } else {
            PrevAction::Stop
        }
    }

    /// Move the cursor as a `NextAction` describes
    ///
    /// Returns the track to load, or `None` for actions that do not move the
    /// cursor by themselves (`RegenerateAuto`, `Stop`).
    pub fn apply_next(&mut self, action: NextAction) -> Option<&Track> {
        match action {
            NextAction::Replay => self.current(),
            NextAction::Advance { kind, index } => self.move_to(kind, index),
            NextAction::SwitchToAuto => self.move_to(QueueKind::Auto, 0),
            NextAction::WrapQueue { index } => {
                let kind = self.active_kind()?;
                self.move_to(kind, index)
            }
            NextAction::RegenerateAuto | NextAction::Stop => None,
        }
    }

    /// Move the cursor as a `PrevAction` describes
    pub fn apply_prev(&mut self, action: PrevAction) -> Option<&Track> {
        match action {
            PrevAction::Replay => self.current(),
            PrevAction::Retreat { kind, index } => self.move_to(kind, index),
            PrevAction::SwitchToUser { index } => self.move_to(QueueKind::User, index),
            PrevAction::WrapQueue { index } => {
                let kind = self.active_kind()?;
                self.move_to(kind, index)
            }
            PrevAction::Stop => None,
        }
    }
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new()
    }
}
