/// `daisy iso`
///
/// Loads the track with stems, lets it run, then steps through the
/// alternates. Each alternate starts at the main track's paused position.
use crate::app::App;
use anyhow::Context;
use clap::Args;
use daisy_library::catalog;
use daisy_playback::TransportSnapshot;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct IsoArgs {
    /// Milliseconds of the main track before entering ISO mode
    #[arg(long, default_value_t = 1500)]
    pub lead_in_ms: u64,

    /// Milliseconds each alternate plays
    #[arg(long, default_value_t = 1000)]
    pub hold_ms: u64,

    /// Alternates to audition, in order
    #[arg(short, long, value_delimiter = ',', default_values_t = ["beat".to_string(), "bass".to_string(), "bed".to_string(), "vox".to_string()])]
    pub alternates: Vec<String>,
}

pub async fn run(app: &App, args: IsoArgs) -> anyhow::Result<TransportSnapshot> {
    app.require_session().await?;
    let player = &app.player;
    let logger = super::spawn_event_logger(player);

    let iso_id = catalog::iso_track_id();
    let index = catalog::index_of(iso_id.as_str())
        .with_context(|| format!("ISO track {iso_id} is not in the playlist"))?;

    player.load_track(index).await?;
    let load_timeout = app.config.simulation.load_latency() + Duration::from_secs(5);
    super::wait_for_playing(player, load_timeout).await?;
    tokio::time::sleep(Duration::from_millis(args.lead_in_ms)).await;

    player.enter_overlay().await?;
    let entered = player.snapshot().await?;
    info!(
        paused_ms = entered.overlay.paused_position.as_millis(),
        "Entered ISO mode"
    );

    for alternate in &args.alternates {
        player.select_alternate(alternate.as_str()).await?;
        super::wait_for_playing(player, load_timeout).await?;
        info!(alternate = %alternate, "Auditioning");
        tokio::time::sleep(Duration::from_millis(args.hold_ms)).await;
    }

    player.exit_overlay().await?;
    let snapshot = player.snapshot().await?;
    logger.abort();
    Ok(snapshot)
}
