/// `daisy color`
use crate::app::App;
use clap::Args;
use daisy_storage::preferences;

#[derive(Args, Debug, Clone)]
pub struct ColorArgs {
    /// New background color, `#RRGGBB`
    pub value: Option<String>,

    /// Forget the stored color and use the default
    #[arg(long, conflicts_with = "value")]
    pub reset: bool,
}

/// Apply the change, if any, and return the effective color
pub async fn run(app: &App, args: ColorArgs) -> anyhow::Result<String> {
    if args.reset {
        preferences::delete_preference(&app.pool, preferences::KEY_BACKGROUND_COLOR).await?;
    } else if let Some(value) = args.value {
        preferences::set_background_color(&app.pool, &value).await?;
    }

    Ok(preferences::background_color(&app.pool).await?)
}
