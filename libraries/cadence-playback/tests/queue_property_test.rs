//! Property-based tests for queue transitions
//!
//! Uses proptest to check the transition laws across random queue shapes.

use cadence_core::{Track, TrackId};
use cadence_playback::{
    NextAction, PlaybackMode, PrevAction, QueueCursor, QueueKind, QueueState, RepeatMode,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

// ===== Helpers =====

fn queue_of(prefix: &str, len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| {
            let id = format!("{}-{}", prefix, i);
            Track::new(TrackId::new(id.clone()), id, "Artist")
        })
        .collect()
}

fn state_at(kind: QueueKind, len: usize, index: usize, other_len: usize) -> QueueState {
    let other = match kind {
        QueueKind::User => QueueKind::Auto,
        QueueKind::Auto => QueueKind::User,
    };
    let mut state = QueueState::new();
    state.replace_queue(other, queue_of("other", other_len));
    state.adopt_queue(kind, queue_of("active", len), None);
    state.move_to(kind, index);
    state
}

fn arbitrary_kind() -> impl Strategy<Value = QueueKind> {
    prop_oneof![Just(QueueKind::User), Just(QueueKind::Auto)]
}

fn arbitrary_repeat() -> impl Strategy<Value = RepeatMode> {
    prop_oneof![
        Just(RepeatMode::Off),
        Just(RepeatMode::Track),
        Just(RepeatMode::Queue)
    ]
}

fn arbitrary_mode() -> impl Strategy<Value = PlaybackMode> {
    (any::<bool>(), arbitrary_repeat()).prop_map(|(shuffle, repeat)| PlaybackMode { shuffle, repeat })
}

// ===== Property Tests =====

proptest! {
    /// Property: next then prev returns to the starting cursor
    #[test]
    fn next_then_prev_round_trips(
        kind in arbitrary_kind(),
        len in 2usize..40,
        other_len in 0usize..10,
        index_seed in any::<usize>(),
        unlimited in any::<bool>(),
    ) {
        let index = index_seed % (len - 1);
        let mut state = state_at(kind, len, index, other_len);

        let next = state.compute_next(PlaybackMode::default(), unlimited);
        prop_assert_eq!(next, NextAction::Advance { kind, index: index + 1 });
        state.apply_next(next);

        let prev = state.compute_prev(PlaybackMode::default());
        prop_assert_eq!(prev, PrevAction::Retreat { kind, index });
        state.apply_prev(prev);
        prop_assert_eq!(state.cursor(), Some(QueueCursor::new(kind, index)));
    }

    /// Property: an empty active queue always stops
    #[test]
    fn empty_active_queue_stops(
        kind in arbitrary_kind(),
        mode in arbitrary_mode(),
        other_len in 0usize..10,
        unlimited in any::<bool>(),
    ) {
        let mut state = QueueState::new();
        let other = match kind {
            QueueKind::User => QueueKind::Auto,
            QueueKind::Auto => QueueKind::User,
        };
        state.replace_queue(other, queue_of("other", other_len));
        state.adopt_queue(kind, Vec::new(), None);

        prop_assert_eq!(state.compute_next(mode, unlimited), NextAction::Stop);
        prop_assert_eq!(state.compute_prev(mode), PrevAction::Stop);
    }

    /// Property: repeat-track replays whatever the position
    #[test]
    fn repeat_track_always_replays(
        kind in arbitrary_kind(),
        len in 1usize..40,
        index_seed in any::<usize>(),
        shuffle in any::<bool>(),
        unlimited in any::<bool>(),
    ) {
        let state = state_at(kind, len, index_seed % len, 3);
        let mode = PlaybackMode { shuffle, repeat: RepeatMode::Track };

        prop_assert_eq!(state.compute_next(mode, unlimited), NextAction::Replay);
        prop_assert_eq!(state.compute_prev(mode), PrevAction::Replay);
    }

    /// Property: transitions never point outside their queue
    #[test]
    fn transitions_stay_in_bounds(
        kind in arbitrary_kind(),
        len in 1usize..40,
        other_len in 0usize..10,
        index_seed in any::<usize>(),
        mode in arbitrary_mode(),
        unlimited in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let state = state_at(kind, len, index_seed % len, other_len);
        let mut rng = StdRng::seed_from_u64(seed);

        match state.compute_next_with(mode, unlimited, &mut rng) {
            NextAction::Advance { kind: k, index } => {
                prop_assert_eq!(k, kind);
                prop_assert!(index < len);
            }
            NextAction::WrapQueue { index } => prop_assert_eq!(index, 0),
            NextAction::SwitchToAuto => {
                prop_assert_eq!(kind, QueueKind::User);
                prop_assert!(other_len > 0);
            }
            NextAction::RegenerateAuto => prop_assert_eq!(kind, QueueKind::Auto),
            NextAction::Replay | NextAction::Stop => {}
        }

        match state.compute_prev_with(mode, &mut rng) {
            PrevAction::Retreat { kind: k, index } => {
                prop_assert_eq!(k, kind);
                prop_assert!(index < len);
            }
            PrevAction::WrapQueue { index } => prop_assert_eq!(index, len - 1),
            PrevAction::SwitchToUser { index } => {
                prop_assert_eq!(kind, QueueKind::Auto);
                prop_assert_eq!(index, other_len - 1);
            }
            PrevAction::Replay | PrevAction::Stop => {}
        }
    }
}

// ===== Fixed Scenarios =====

#[test]
fn user_overflow_switches_to_auto() {
    let state = state_at(QueueKind::User, 3, 2, 2);
    assert_eq!(
        state.compute_next(PlaybackMode::default(), true),
        NextAction::SwitchToAuto
    );
}

#[test]
fn single_auto_track_regenerates() {
    let state = state_at(QueueKind::Auto, 1, 0, 0);
    assert_eq!(
        state.compute_next(PlaybackMode::default(), true),
        NextAction::RegenerateAuto
    );
}

#[test]
fn prev_at_auto_start_returns_to_user_end() {
    let state = state_at(QueueKind::Auto, 4, 0, 3);
    assert_eq!(
        state.compute_prev(PlaybackMode::default()),
        PrevAction::SwitchToUser { index: 2 }
    );
}

#[test]
fn shuffle_covers_every_index() {
    let state = state_at(QueueKind::User, 5, 0, 0);
    let mode = PlaybackMode {
        shuffle: true,
        repeat: RepeatMode::Off,
    };
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = HashSet::new();

    for _ in 0..1000 {
        match state.compute_next_with(mode, false, &mut rng) {
            NextAction::Advance { kind, index } => {
                assert_eq!(kind, QueueKind::User);
                assert!(index < 5, "index {} out of bounds", index);
                seen.insert(index);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    assert_eq!(seen.len(), 5);
}
