/// `daisy search`
use crate::app::App;
use anyhow::Context;
use clap::Args;
use daisy_catalog::{CatalogSearch, DEFAULT_SEARCH_LIMIT};
use daisy_core::SearchResult;
use daisy_library::search;
use daisy_playback::{bridge, BridgeError, FallbackChoice, TransportCommand};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text matched against title and artist
    pub query: String,

    /// Also search Apple Music (needs a developer token)
    #[arg(short, long)]
    pub remote: bool,

    /// Play the result at this position in the list
    #[arg(short, long)]
    pub play: Option<usize>,

    /// When a remote result has no preview, play the matching local track
    #[arg(long)]
    pub fallback_local: bool,
}

pub async fn run(app: &App, args: SearchArgs) -> anyhow::Result<Vec<SearchResult>> {
    if args.play.is_some() {
        app.require_session().await?;
    }
    let results = collect(app, &args.query, args.remote).await;

    if results.is_empty() {
        println!("No results for \"{}\"", args.query);
    }
    for (position, result) in results.iter().enumerate() {
        println!(
            "{position:>3}  {} - {}  [{}]",
            result.title(),
            result.artist(),
            result.source_label()
        );
    }

    if let Some(position) = args.play {
        let result = results
            .get(position)
            .with_context(|| format!("No result at position {position}"))?;
        let choice = if args.fallback_local {
            FallbackChoice::PlayLocal
        } else {
            FallbackChoice::Abandon
        };
        if let Some(command) = select(app, result, choice) {
            app.player.execute(command).await?;
            let timeout = app.config.simulation.load_latency() + Duration::from_secs(5);
            let snapshot = super::wait_for_playing(&app.player, timeout).await?;
            super::print_snapshot(&snapshot);
        }
    }

    Ok(results)
}

/// Local matches followed by remote matches
///
/// A failed remote search is logged and contributes nothing.
pub async fn collect(app: &App, query: &str, remote: bool) -> Vec<SearchResult> {
    let local = search::filter_local(&app.tracks, query);

    let mut remote_tracks = Vec::new();
    if remote && search::should_search_remote(query) {
        let catalog: &dyn CatalogSearch = &app.apple;
        match catalog.search_tracks(query, DEFAULT_SEARCH_LIMIT).await {
            Ok(tracks) => remote_tracks = tracks,
            Err(e) => warn!(error = %e, "Remote search failed"),
        }
    }
    debug!(
        local = local.len(),
        remote = remote_tracks.len(),
        "Search finished"
    );

    search::merge(local, remote_tracks)
}

/// Turn a picked result into a transport command
///
/// `None` means nothing should play.
pub fn select(
    app: &App,
    result: &SearchResult,
    choice: FallbackChoice,
) -> Option<TransportCommand> {
    match bridge::resolve(result, &app.tracks) {
        Ok(command) => Some(command),
        Err(error) => {
            println!("{error}");
            let BridgeError::PreviewUnavailable { local_fallback, .. } = &error;
            if let Some(track) = local_fallback.and_then(|index| app.tracks.get(index)) {
                println!("Local match: {} - {}", track.title, track.artist);
            }
            bridge::resolve_fallback(&error, choice)
        }
    }
}
