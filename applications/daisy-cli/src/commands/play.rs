/// `daisy play`
use crate::app::App;
use clap::{Args, ValueEnum};
use daisy_playback::{RepeatMode, TransportCommand, TransportSnapshot};
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Playlist index to start from
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Seconds to let playback run before reporting
    #[arg(short, long, default_value_t = 2)]
    pub seconds: u64,

    /// Skip forward this many tracks after starting
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Enable shuffle before skipping
    #[arg(long)]
    pub shuffle: bool,

    /// Repeat mode
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatArg {
    Off,
    All,
    One,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::All => RepeatMode::All,
            RepeatArg::One => RepeatMode::One,
        }
    }
}

pub async fn run(app: &App, args: PlayArgs) -> anyhow::Result<TransportSnapshot> {
    app.require_session().await?;
    let player = &app.player;
    let logger = super::spawn_event_logger(player);

    if args.shuffle {
        player.execute(TransportCommand::SetShuffle(true)).await?;
    }
    if let Some(repeat) = args.repeat {
        player
            .execute(TransportCommand::SetRepeat(repeat.into()))
            .await?;
    }

    player.load_track(args.index).await?;
    let load_timeout = app.config.simulation.load_latency() + Duration::from_secs(5);
    super::wait_for_playing(player, load_timeout).await?;

    for _ in 0..args.skip {
        player.next().await?;
        super::wait_for_playing(player, load_timeout).await?;
    }

    tokio::time::sleep(Duration::from_secs(args.seconds)).await;

    let snapshot = player.snapshot().await?;
    info!(
        index = ?snapshot.current_index,
        position_ms = snapshot.position.as_millis(),
        "Playback report"
    );
    logger.abort();
    Ok(snapshot)
}
