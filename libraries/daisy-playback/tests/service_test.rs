//! Player service tests
//!
//! Runs the real service loop against the simulated backend with a paused
//! tokio clock, so poll ticks and load latency are deterministic.

use daisy_core::{AudioSource, Track};
use daisy_playback::{
    PlaybackConfig, PlaybackError, PlaybackEvent, PlaybackManager, PlayerHandle, PlayerService,
    RepeatMode, SimulatedBackend, TransportPhase,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

// ===== Helpers =====

fn daisies() -> Track {
    Track::new(
        "daisies",
        "Daisies",
        "Justin Bieber",
        AudioSource::asset("audio/daisies.mp3"),
    )
    .with_alternate("beat", "Beat", AudioSource::asset("audio/beat.mp3"))
    .with_alternate("bass", "Bass", AudioSource::asset("audio/bass.mp3"))
    .with_alternate("vox", "Vox", AudioSource::asset("audio/vox.mp3"))
}

fn playlist() -> Vec<Track> {
    vec![
        Track::new("1", "Crazy Tings", "Tems", AudioSource::asset("audio/1.mp3")),
        Track::new("2", "The Dress", "Dijon", AudioSource::asset("audio/2.mp3")),
        Track::new("3", "Mutt", "Leon Thomas", AudioSource::asset("audio/3.mp3")),
        daisies(),
    ]
}

fn spawn(backend: &Arc<SimulatedBackend>, config: PlaybackConfig) -> (PlayerHandle, JoinHandle<()>) {
    let manager = PlaybackManager::with_seed(playlist(), config, 11);
    PlayerService::spawn(manager, backend.clone())
}

/// Let spawned loads resolve and the service drain its queue
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ===== Scenarios =====

#[tokio::test(start_paused = true)]
async fn load_and_play_reaches_playing() {
    let backend = Arc::new(SimulatedBackend::new().with_latency(Duration::from_millis(300)));
    let (player, _task) = spawn(&backend, PlaybackConfig::default());

    player.load_track(1).await.unwrap();
    assert!(player.snapshot().await.unwrap().is_loading());

    tokio::time::sleep(Duration::from_millis(300)).await;
    settle().await;
    let snapshot = player.snapshot().await.unwrap();
    assert!(snapshot.is_playing());
    assert_eq!(snapshot.current_index, Some(1));
    assert_eq!(backend.live_handles(), 1);
    assert_eq!(backend.audible_handles(), 1);
}

#[tokio::test(start_paused = true)]
async fn polls_advance_position() {
    let backend = Arc::new(SimulatedBackend::new());
    let (player, _task) = spawn(&backend, PlaybackConfig::default());
    player.load_track(0).await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    settle().await;

    let snapshot = player.snapshot().await.unwrap();
    assert!(snapshot.position >= Duration::from_secs(2));
    assert!(snapshot.position <= Duration::from_millis(3_500));
    assert_eq!(snapshot.duration, Duration::from_secs(180));
}

#[tokio::test(start_paused = true)]
async fn superseded_load_does_not_leak() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.set_latency(&AudioSource::asset("audio/1.mp3"), Duration::from_secs(2));
    let (player, _task) = spawn(&backend, PlaybackConfig::default());

    // Slow load first, fast load second
    player.load_track(0).await.unwrap();
    player.load_track(1).await.unwrap();
    settle().await;
    assert_eq!(player.snapshot().await.unwrap().current_index, Some(1));

    tokio::time::sleep(Duration::from_secs(3)).await;
    settle().await;

    assert_eq!(backend.live_handles(), 1);
    let snapshot = player.snapshot().await.unwrap();
    assert_eq!(snapshot.current_index, Some(1));
    assert!(snapshot.is_playing());
}

#[tokio::test(start_paused = true)]
async fn unreachable_source_emits_error_and_goes_idle() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.mark_unreachable(&AudioSource::asset("audio/2.mp3"));
    let (player, _task) = spawn(&backend, PlaybackConfig::default());
    let mut events = player.subscribe();

    player.load_track(1).await.unwrap();
    settle().await;

    let snapshot = player.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, TransportPhase::Idle);
    assert_eq!(snapshot.current_index, Some(1));

    let mut errors = 0;
    while let Ok(event) = events.try_recv() {
        if event.is_error() {
            errors += 1;
        }
    }
    assert_eq!(errors, 1);
}

#[tokio::test(start_paused = true)]
async fn iso_round_trip_keeps_position_and_one_handle() {
    let backend = Arc::new(SimulatedBackend::new());
    let (player, _task) = spawn(&backend, PlaybackConfig::default());
    player.load_track(3).await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    settle().await;

    player.enter_overlay().await.unwrap();
    let entered = player.snapshot().await.unwrap().overlay.paused_position;
    assert_eq!(entered, Duration::from_millis(5_000));
    assert_eq!(backend.audible_handles(), 0);

    player.select_alternate("beat").await.unwrap();
    settle().await;
    assert_eq!(backend.live_handles(), 1);
    assert_eq!(backend.audible_handles(), 1);
    assert_eq!(player.snapshot().await.unwrap().position, entered);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    settle().await;

    player.select_alternate("vox").await.unwrap();
    settle().await;
    assert_eq!(backend.live_handles(), 1);

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    settle().await;

    player.exit_overlay().await.unwrap();
    settle().await;

    let snapshot = player.snapshot().await.unwrap();
    assert!(!snapshot.overlay.active);
    assert!(snapshot.is_playing());
    assert_eq!(backend.live_handles(), 1);
    assert_eq!(backend.audible_handles(), 1);

    // Entry position plus elapsed playback, within one poll interval
    let expected = entered + Duration::from_millis(3_000);
    assert!(snapshot.position >= entered);
    assert!(snapshot.position + Duration::from_secs(1) >= expected);
    assert!(snapshot.position <= expected);
}

#[tokio::test(start_paused = true)]
async fn enter_overlay_without_track_fails() {
    let backend = Arc::new(SimulatedBackend::new());
    let (player, _task) = spawn(&backend, PlaybackConfig::default());

    assert_eq!(
        player.enter_overlay().await,
        Err(PlaybackError::NoTrackLoaded)
    );
    assert!(!player.snapshot().await.unwrap().overlay.active);
}

#[tokio::test(start_paused = true)]
async fn track_end_advances_to_next() {
    let backend = Arc::new(SimulatedBackend::new().with_default_duration(Duration::from_secs(5)));
    let (player, _task) = spawn(&backend, PlaybackConfig::default());
    let mut events = player.subscribe();

    player.load_track(0).await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;

    let snapshot = player.snapshot().await.unwrap();
    assert_eq!(snapshot.current_index, Some(1));
    assert_eq!(backend.live_handles(), 1);

    let mut changes = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let PlaybackEvent::TrackChanged { index, .. } = event {
            changes.push(index);
        }
    }
    assert_eq!(changes, vec![Some(0), Some(1)]);
}

#[tokio::test(start_paused = true)]
async fn repeat_one_replays_same_track() {
    let backend = Arc::new(SimulatedBackend::new().with_default_duration(Duration::from_secs(4)));
    let config = PlaybackConfig {
        repeat: RepeatMode::One,
        ..PlaybackConfig::default()
    };
    let (player, _task) = spawn(&backend, config);

    player.load_track(2).await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_secs(9)).await;
    settle().await;

    assert_eq!(player.snapshot().await.unwrap().current_index, Some(2));
    assert!(backend.load_log().len() >= 2);
    assert!(backend
        .load_log()
        .iter()
        .all(|s| *s == AudioSource::asset("audio/3.mp3")));
}

#[tokio::test(start_paused = true)]
async fn scrub_commits_one_seek() {
    let backend = Arc::new(SimulatedBackend::new());
    let (player, _task) = spawn(&backend, PlaybackConfig::default());
    player.load_track(0).await.unwrap();
    settle().await;

    player.begin_scrub().await.unwrap();
    player.update_scrub(Duration::from_secs(90)).await.unwrap();

    // Ticks while dragging must not overwrite the dragged position
    tokio::time::sleep(Duration::from_secs(3)).await;
    settle().await;
    let snapshot = player.snapshot().await.unwrap();
    assert!(snapshot.is_scrubbing);
    assert_eq!(snapshot.position, Duration::from_secs(90));

    player.commit_scrub().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    settle().await;

    let snapshot = player.snapshot().await.unwrap();
    assert!(!snapshot.is_scrubbing);
    assert!(snapshot.position >= Duration::from_secs(90));
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_every_handle() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.set_latency(&AudioSource::asset("audio/2.mp3"), Duration::from_secs(5));
    let (player, task) = spawn(&backend, PlaybackConfig::default());

    player.load_track(0).await.unwrap();
    settle().await;
    // Still resolving when shutdown starts
    player.load_track(1).await.unwrap();

    player.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(backend.live_handles(), 0);
    assert_eq!(player.next().await, Err(PlaybackError::ServiceStopped));
}
