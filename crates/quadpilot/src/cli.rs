use std::path::PathBuf;

use clap::Parser;
use renderer::RasterMode;

#[derive(Parser, Debug)]
#[command(
    name = "quadpilot",
    author,
    version,
    about = "Interactive textured-quad viewer",
    arg_required_else_help = false
)]
pub struct Args {
    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Image for the first texture slot (JPEG or PNG).
    #[arg(long, short = '1', value_name = "PATH")]
    pub texture1: Option<PathBuf>,

    /// Image for the second texture slot (JPEG or PNG).
    #[arg(long, short = '2', value_name = "PATH")]
    pub texture2: Option<PathBuf>,

    /// Raster mode the viewer starts in: `fill`, `line`, or `point`.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_raster_mode,
        default_value_t = RasterMode::default()
    )]
    pub mode: RasterMode,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32), String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_raster_mode(value: &str) -> Result<RasterMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("raster mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "fill" | "solid" => Ok(RasterMode::Fill),
        "line" | "wireframe" => Ok(RasterMode::Line),
        "point" | "points" => Ok(RasterMode::Point),
        other => Err(format!(
            "unknown raster mode '{other}'; expected fill, line, or point"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_accepts_both_separators() {
        assert_eq!(parse_surface_size("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_surface_size("800X600"), Ok((800, 600)));
        assert_eq!(parse_surface_size(" 640 x 480 "), Ok((640, 480)));
    }

    #[test]
    fn surface_size_rejects_malformed_specs() {
        assert!(parse_surface_size("1920").is_err());
        assert!(parse_surface_size("x1080").is_err());
        assert!(parse_surface_size("1920x").is_err());
        assert!(parse_surface_size("axb").is_err());
    }

    #[test]
    fn surface_size_rejects_zero_dimensions() {
        assert!(parse_surface_size("0x1080").is_err());
        assert!(parse_surface_size("1920x0").is_err());
    }

    #[test]
    fn raster_mode_accepts_known_names() {
        assert_eq!(parse_raster_mode("fill"), Ok(RasterMode::Fill));
        assert_eq!(parse_raster_mode("LINE"), Ok(RasterMode::Line));
        assert_eq!(parse_raster_mode("wireframe"), Ok(RasterMode::Line));
        assert_eq!(parse_raster_mode(" points "), Ok(RasterMode::Point));
    }

    #[test]
    fn raster_mode_rejects_unknown_names() {
        assert!(parse_raster_mode("").is_err());
        assert!(parse_raster_mode("triangle").is_err());
    }
}
