//! Property-based tests for the transport state machine
//!
//! Uses proptest to verify invariants across many random inputs.

use daisy_core::{AudioSource, Track};
use daisy_playback::{
    Directive, HandleId, HandleStatus, PlaybackConfig, PlaybackManager, RepeatMode,
    TransportPhase,
};
use proptest::prelude::*;
use std::time::Duration;

// ===== Helpers =====

fn tracks(len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| {
            Track::new(
                i.to_string(),
                format!("Track {i}"),
                "Artist",
                AudioSource::asset(format!("audio/{i}.mp3")),
            )
            .with_alternate("beat", "Beat", AudioSource::asset(format!("beat/{i}.mp3")))
        })
        .collect()
}

fn manager(len: usize, seed: u64) -> PlaybackManager {
    PlaybackManager::with_seed(tracks(len), PlaybackConfig::default(), seed)
}

/// Resolve loads immediately with increasing handle ids
fn settle(manager: &mut PlaybackManager, directives: Vec<Directive>, counter: &mut u64) {
    for directive in directives {
        if let Directive::Load(request) = directive {
            *counter += 1;
            let follow_up = manager.complete_load(request.token, Ok(HandleId(*counter)));
            settle(manager, follow_up, counter);
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Load(usize),
    TogglePlayPause,
    ToggleShuffle,
    ToggleRepeat,
    Poll(u64),
    Seek(u64),
    Enter,
    Select,
    Exit,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        (0usize..20).prop_map(Op::Load),
        Just(Op::TogglePlayPause),
        Just(Op::ToggleShuffle),
        Just(Op::ToggleRepeat),
        (0u64..250_000).prop_map(Op::Poll),
        (0u64..250_000).prop_map(Op::Seek),
        Just(Op::Enter),
        Just(Op::Select),
        Just(Op::Exit),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: next then previous returns to the start with shuffle off
    #[test]
    fn next_then_previous_is_identity(len in 1usize..30, start in 0usize..30) {
        let start = start % len;
        let mut m = manager(len, 0);
        m.set_repeat(RepeatMode::All);
        m.load_track(start).unwrap();

        m.next().unwrap();
        m.previous().unwrap();

        prop_assert_eq!(m.current_index(), Some(start));
    }

    /// Property: repeat one never changes the index on track end
    #[test]
    fn repeat_one_track_end_keeps_index(len in 1usize..30, start in 0usize..30, shuffle: bool) {
        let start = start % len;
        let mut m = manager(len, 1);
        m.set_shuffle(shuffle);
        m.set_repeat(RepeatMode::One);
        m.load_track(start).unwrap();

        for _ in 0..5 {
            m.on_track_end().unwrap();
            prop_assert_eq!(m.current_index(), Some(start));
        }
    }

    /// Property: with repeat off, wrapping past the last index pauses at the end
    #[test]
    fn repeat_off_never_wraps(len in 1usize..20) {
        let mut m = manager(len, 2);
        let mut counter = 0;
        let directives = m.load_track(0).unwrap();
        settle(&mut m, directives, &mut counter);

        for _ in 0..len - 1 {
            let directives = m.next().unwrap();
            settle(&mut m, directives, &mut counter);
        }
        prop_assert_eq!(m.current_index(), Some(len - 1));

        let directives = m.next().unwrap();
        prop_assert!(directives.iter().all(|d| !matches!(d, Directive::Load(_))));
        prop_assert_eq!(m.current_index(), Some(len - 1));
        prop_assert_eq!(m.phase(), TransportPhase::Paused);
    }

    /// Property: shuffle next never picks the current index
    #[test]
    fn shuffle_never_repeats_current(len in 2usize..40, seed: u64) {
        let mut m = manager(len, seed);
        m.set_shuffle(true);

        for start in 0..len {
            m.load_track(start).unwrap();
            m.next().unwrap();
            prop_assert_ne!(m.current_index(), Some(start));
        }
    }

    /// Property: shuffle history never exceeds its bound
    #[test]
    fn history_bounded(history_size in 1usize..20, steps in 1usize..100) {
        let config = PlaybackConfig {
            history_size,
            shuffle: true,
            ..PlaybackConfig::default()
        };
        let mut m = PlaybackManager::with_seed(tracks(5), config, 4);

        for _ in 0..steps {
            m.next().unwrap();
        }
        prop_assert!(m.history().len() <= history_size);
        prop_assert_eq!(m.history().len(), steps.min(history_size));
    }

    /// Property: any command sequence keeps the handle and position invariants
    #[test]
    fn random_sequences_hold_invariants(
        len in 1usize..8,
        ops in prop::collection::vec(arbitrary_op(), 1..60),
        seed: u64,
    ) {
        let mut m = manager(len, seed);
        let mut counter = 0;

        for op in ops {
            let directives = match op {
                Op::Next => m.next().unwrap_or_default(),
                Op::Previous => m.previous().unwrap_or_default(),
                Op::Load(i) => m.load_track(i).unwrap_or_default(),
                Op::TogglePlayPause => m.toggle_play_pause(),
                Op::ToggleShuffle => {
                    m.toggle_shuffle();
                    Vec::new()
                }
                Op::ToggleRepeat => {
                    m.toggle_repeat();
                    Vec::new()
                }
                Op::Poll(ms) => match m.audible_handle() {
                    Some(h) => m.apply_status(h, HandleStatus {
                        position: Duration::from_millis(ms),
                        duration: Duration::from_secs(200),
                        is_playing: true,
                    }),
                    None => Vec::new(),
                },
                Op::Seek(ms) => m.seek(Duration::from_millis(ms)).unwrap_or_default(),
                Op::Enter => m.enter_overlay().unwrap_or_default(),
                Op::Select => m.select_alternate("beat").unwrap_or_default(),
                Op::Exit => m.exit_overlay().unwrap_or_default(),
            };
            settle(&mut m, directives, &mut counter);

            // Exactly one audible handle at a time
            prop_assert!(m.held_handles().len() <= 1);

            if m.is_loading() {
                prop_assert_eq!(m.position(), Duration::ZERO);
                prop_assert_eq!(m.duration(), Duration::ZERO);
            } else if m.duration() > Duration::ZERO {
                prop_assert!(m.position() <= m.duration());
            }

            let index = m.current_index().unwrap();
            prop_assert!(index < len);
        }
    }
}
