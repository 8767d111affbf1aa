use std::path::PathBuf;

use renderer::{TextureSource, ViewerConfig};

use crate::cli::Args;

/// Window geometry used when `--size` is not given.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (2400, 1800);

/// Title shown in the window decoration.
pub const DEFAULT_WINDOW_TITLE: &str = "Quadpilot";

/// Image bound to the first texture slot when `--texture1` is not given.
pub const DEFAULT_TEXTURE1: &str = "container.jpg";

/// Image bound to the second texture slot when `--texture2` is not given.
pub const DEFAULT_TEXTURE2: &str = "awesomeface.png";

/// Builds the viewer configuration from CLI arguments and built-in defaults.
pub fn viewer_config(args: &Args) -> ViewerConfig {
    let first = args
        .texture1
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE1));
    let second = args
        .texture2
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE2));

    ViewerConfig {
        surface_size: args.size.unwrap_or(DEFAULT_SURFACE_SIZE),
        window_title: DEFAULT_WINDOW_TITLE.to_string(),
        textures: [texture_source_for(first), texture_source_for(second)],
        raster_mode: args.mode,
    }
}

/// Declares the channel layout from the file extension: JPEG files carry
/// three channels, everything else is treated as RGBA.
fn texture_source_for(path: PathBuf) -> TextureSource {
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            lower == "jpg" || lower == "jpeg"
        })
        .unwrap_or(false);
    if is_jpeg {
        TextureSource::rgb(path)
    } else {
        TextureSource::rgba(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::{ColorChannels, RasterMode};

    fn bare_args() -> Args {
        Args {
            size: None,
            texture1: None,
            texture2: None,
            mode: RasterMode::default(),
        }
    }

    #[test]
    fn bare_invocation_uses_builtin_defaults() {
        let config = viewer_config(&bare_args());
        assert_eq!(config.surface_size, DEFAULT_SURFACE_SIZE);
        assert_eq!(config.window_title, DEFAULT_WINDOW_TITLE);
        assert_eq!(config.textures[0].path, PathBuf::from(DEFAULT_TEXTURE1));
        assert_eq!(config.textures[0].channels, ColorChannels::Rgb);
        assert_eq!(config.textures[1].path, PathBuf::from(DEFAULT_TEXTURE2));
        assert_eq!(config.textures[1].channels, ColorChannels::Rgba);
        assert_eq!(config.raster_mode, RasterMode::Fill);
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut args = bare_args();
        args.size = Some((1280, 720));
        args.texture1 = Some(PathBuf::from("bricks.png"));
        args.texture2 = Some(PathBuf::from("photo.JPEG"));
        args.mode = RasterMode::Line;

        let config = viewer_config(&args);
        assert_eq!(config.surface_size, (1280, 720));
        assert_eq!(config.textures[0].channels, ColorChannels::Rgba);
        assert_eq!(config.textures[1].channels, ColorChannels::Rgb);
        assert_eq!(config.raster_mode, RasterMode::Line);
    }

    #[test]
    fn extensionless_paths_declare_rgba() {
        let source = texture_source_for(PathBuf::from("texture"));
        assert_eq!(source.channels, ColorChannels::Rgba);
    }
}
