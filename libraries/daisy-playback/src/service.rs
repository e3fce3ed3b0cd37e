//! Player service
//!
//! Single tokio task owning the [`PlaybackManager`] and [`PlaybackAdapter`].
//! User commands, poll ticks and load completions are all consumed by one
//! `select!` loop, so transport state has exactly one writer.
//!
//! Loads run on spawned tasks and report back through an internal channel;
//! a completion for a superseded load is released as soon as it arrives.

use crate::{
    adapter::PlaybackAdapter,
    backend::{AudioBackend, HandleId},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    manager::{Directive, LoadRequest, LoadToken, PlaybackManager},
    types::{RepeatMode, TransportSnapshot},
};
use daisy_core::Track;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Transport operations accepted by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    LoadTrack(usize),

    /// Play a track outside the playlist (remote preview)
    PlayOneOff(Track),

    TogglePlayPause,
    Seek(Duration),
    BeginScrub,
    UpdateScrub(Duration),
    CommitScrub,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    SetShuffle(bool),
    SetRepeat(RepeatMode),
    Stop,
    ReplacePlaylist(Vec<Track>),
    EnterOverlay,
    SelectAlternate(String),
    ExitOverlay,
}

enum Command {
    Transport(TransportCommand, oneshot::Sender<Result<()>>),
    Snapshot(oneshot::Sender<TransportSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

struct LoadCompletion {
    token: LoadToken,
    result: Result<HandleId>,
}

/// Cloneable handle for talking to a running [`PlayerService`]
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    /// Send a transport command and wait until the service applied it
    pub async fn execute(&self, command: TransportCommand) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Transport(command, tx))
            .await
            .map_err(|_| PlaybackError::ServiceStopped)?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)?
    }

    pub async fn load_track(&self, index: usize) -> Result<()> {
        self.execute(TransportCommand::LoadTrack(index)).await
    }

    pub async fn play_one_off(&self, track: Track) -> Result<()> {
        self.execute(TransportCommand::PlayOneOff(track)).await
    }

    pub async fn toggle_play_pause(&self) -> Result<()> {
        self.execute(TransportCommand::TogglePlayPause).await
    }

    pub async fn seek(&self, position: Duration) -> Result<()> {
        self.execute(TransportCommand::Seek(position)).await
    }

    pub async fn begin_scrub(&self) -> Result<()> {
        self.execute(TransportCommand::BeginScrub).await
    }

    pub async fn update_scrub(&self, position: Duration) -> Result<()> {
        self.execute(TransportCommand::UpdateScrub(position)).await
    }

    pub async fn commit_scrub(&self) -> Result<()> {
        self.execute(TransportCommand::CommitScrub).await
    }

    pub async fn next(&self) -> Result<()> {
        self.execute(TransportCommand::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.execute(TransportCommand::Previous).await
    }

    pub async fn toggle_shuffle(&self) -> Result<()> {
        self.execute(TransportCommand::ToggleShuffle).await
    }

    pub async fn toggle_repeat(&self) -> Result<()> {
        self.execute(TransportCommand::ToggleRepeat).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.execute(TransportCommand::Stop).await
    }

    pub async fn enter_overlay(&self) -> Result<()> {
        self.execute(TransportCommand::EnterOverlay).await
    }

    pub async fn select_alternate(&self, id: impl Into<String>) -> Result<()> {
        self.execute(TransportCommand::SelectAlternate(id.into()))
            .await
    }

    pub async fn exit_overlay(&self) -> Result<()> {
        self.execute(TransportCommand::ExitOverlay).await
    }

    /// Current transport state
    pub async fn snapshot(&self) -> Result<TransportSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(tx))
            .await
            .map_err(|_| PlaybackError::ServiceStopped)?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Stop the service, releasing every handle
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(tx))
            .await
            .map_err(|_| PlaybackError::ServiceStopped)?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)
    }
}

/// Playback service task
pub struct PlayerService {
    manager: PlaybackManager,
    adapter: PlaybackAdapter,
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::UnboundedSender<LoadCompletion>,
    completions_rx: mpsc::UnboundedReceiver<LoadCompletion>,
    events: broadcast::Sender<PlaybackEvent>,

    /// Spawned loads that have not reported back yet
    in_flight: usize,
}

impl PlayerService {
    /// Spawn the service on the current runtime
    pub fn spawn(
        manager: PlaybackManager,
        backend: Arc<dyn AudioBackend>,
    ) -> (PlayerHandle, JoinHandle<()>) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let service = Self {
            manager,
            adapter: PlaybackAdapter::new(backend),
            commands,
            completions_tx,
            completions_rx,
            events: events.clone(),
            in_flight: 0,
        };

        let handle = PlayerHandle {
            commands: commands_tx,
            events,
        };
        (handle, tokio::spawn(service.run()))
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.manager.config().poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Player service started");

        let mut shutdown_reply = None;
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Transport(command, reply)) => {
                        let result = self.handle_command(command).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.manager.snapshot());
                    }
                    Some(Command::Shutdown(reply)) => {
                        shutdown_reply = Some(reply);
                        break;
                    }
                    None => break,
                },
                Some(done) = self.completions_rx.recv() => {
                    self.on_load_complete(done).await;
                }
                _ = ticker.tick() => {
                    self.poll().await;
                }
            }
            self.publish_events();
        }

        self.teardown().await;
        info!("Player service stopped");
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    async fn handle_command(&mut self, command: TransportCommand) -> Result<()> {
        debug!(?command, "Transport command");
        if matches!(
            command,
            TransportCommand::EnterOverlay
                | TransportCommand::SelectAlternate(_)
                | TransportCommand::ExitOverlay
        ) {
            // Source swaps resume from a fresh playhead
            self.poll().await;
        }

        let m = &mut self.manager;
        let directives = match command {
            TransportCommand::LoadTrack(index) => m.load_track(index)?,
            TransportCommand::PlayOneOff(track) => m.load_one_off(track),
            TransportCommand::TogglePlayPause => m.toggle_play_pause(),
            TransportCommand::Seek(position) => m.seek(position)?,
            TransportCommand::BeginScrub => {
                m.begin_scrub();
                Vec::new()
            }
            TransportCommand::UpdateScrub(position) => {
                m.update_scrub(position);
                Vec::new()
            }
            TransportCommand::CommitScrub => m.commit_scrub(),
            TransportCommand::Next => m.next()?,
            TransportCommand::Previous => m.previous()?,
            TransportCommand::ToggleShuffle => {
                m.toggle_shuffle();
                Vec::new()
            }
            TransportCommand::ToggleRepeat => {
                m.toggle_repeat();
                Vec::new()
            }
            TransportCommand::SetShuffle(enabled) => {
                m.set_shuffle(enabled);
                Vec::new()
            }
            TransportCommand::SetRepeat(mode) => {
                m.set_repeat(mode);
                Vec::new()
            }
            TransportCommand::Stop => m.stop(),
            TransportCommand::ReplacePlaylist(tracks) => m.replace_playlist(tracks),
            TransportCommand::EnterOverlay => m.enter_overlay()?,
            TransportCommand::SelectAlternate(id) => m.select_alternate(&id)?,
            TransportCommand::ExitOverlay => m.exit_overlay()?,
        };
        self.execute(directives).await;
        Ok(())
    }

    async fn on_load_complete(&mut self, done: LoadCompletion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let accepted = done.result.as_ref().ok().copied();
        let directives = self.manager.complete_load(done.token, done.result);

        if let Some(handle) = accepted {
            if self.manager.held_handles().contains(&handle) {
                self.adapter.adopt(handle).await;
            }
        }
        self.execute(directives).await;
    }

    async fn poll(&mut self) {
        let Some(handle) = self.manager.pollable_handle() else {
            return;
        };
        match self.adapter.poll_status(handle) {
            Ok(status) => {
                let directives = self.manager.apply_status(handle, status);
                self.execute(directives).await;
            }
            Err(e) => debug!(%handle, error = %e, "Status poll failed"),
        }
    }

    async fn execute(&mut self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::Release(handle) => self.adapter.release(handle).await,
                Directive::Load(request) => self.spawn_load(request),
                Directive::Play(handle) => {
                    if let Err(e) = self.adapter.play(handle).await {
                        warn!(%handle, error = %e, "Play failed");
                        self.manager.report_error(&e);
                    }
                }
                Directive::Pause(handle) => {
                    if let Err(e) = self.adapter.pause(handle).await {
                        warn!(%handle, error = %e, "Pause failed");
                        self.manager.report_error(&e);
                    }
                }
                Directive::Seek(handle, position) => self.adapter.seek(handle, position).await,
            }
        }
    }

    fn spawn_load(&mut self, request: LoadRequest) {
        let load = self
            .adapter
            .begin_load(request.source.clone(), request.options());
        let tx = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = load.await;
            // Receiver only disappears once the service is gone
            let _ = tx.send(LoadCompletion {
                token: request.token,
                result,
            });
        });
    }

    fn publish_events(&mut self) {
        for event in self.manager.take_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }

    /// Release every held handle, including loads still resolving
    async fn teardown(&mut self) {
        let directives = self.manager.stop();
        self.execute(directives).await;
        self.adapter.release_all().await;

        while self.in_flight > 0 {
            let Some(done) = self.completions_rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            if let Ok(handle) = done.result {
                debug!(%handle, "Releasing load that resolved during shutdown");
                self.adapter.release(handle).await;
            }
        }
        self.publish_events();
    }
}
