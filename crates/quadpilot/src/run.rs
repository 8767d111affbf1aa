use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::defaults;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = defaults::viewer_config(&args);
    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        texture1 = %config.textures[0].path.display(),
        texture2 = %config.textures[1].path.display(),
        mode = %config.raster_mode,
        "starting quadpilot viewer"
    );

    renderer::run_windowed(config)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
