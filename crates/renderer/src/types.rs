use std::path::PathBuf;

/// The quad shader samples exactly two texture slots.
pub const TEXTURE_SLOT_COUNT: usize = 2;

/// Channel layout an image file is declared to carry.
///
/// The GPU upload is always expanded to RGBA; the declaration exists so a
/// mismatch between what the caller promised and what the decoder found can
/// be reported instead of silently reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannels {
    /// Three 8-bit channels (typical JPEG).
    Rgb,
    /// Four 8-bit channels (typical PNG with alpha).
    Rgba,
}

impl ColorChannels {
    /// Number of channels implied by the declaration.
    pub fn count(self) -> u8 {
        match self {
            ColorChannels::Rgb => 3,
            ColorChannels::Rgba => 4,
        }
    }
}

impl std::fmt::Display for ColorChannels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorChannels::Rgb => f.write_str("rgb"),
            ColorChannels::Rgba => f.write_str("rgba"),
        }
    }
}

/// One image file destined for a texture slot of the quad shader.
#[derive(Debug, Clone)]
pub struct TextureSource {
    /// Path to the image file on disk.
    pub path: PathBuf,
    /// Channel layout the file is expected to carry.
    pub channels: ColorChannels,
}

impl TextureSource {
    pub fn rgb(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channels: ColorChannels::Rgb,
        }
    }

    pub fn rgba(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channels: ColorChannels::Rgba,
        }
    }
}

/// How triangles are rasterized.
///
/// Fill is always available; line and point rasterization are optional GPU
/// features and silently fall back to fill when the adapter lacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    #[default]
    Fill,
    Line,
    Point,
}

impl std::fmt::Display for RasterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterMode::Fill => f.write_str("fill"),
            RasterMode::Line => f.write_str("line"),
            RasterMode::Point => f.write_str("point"),
        }
    }
}

/// Immutable configuration passed to the viewer at start-up.
///
/// `ViewerConfig` mirrors CLI flags: window geometry, the two images to
/// sample, and the raster mode the first frame starts in.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Title shown in the window decoration.
    pub window_title: String,
    /// Image files bound to the shader's two texture slots, in slot order.
    pub textures: [TextureSource; TEXTURE_SLOT_COUNT],
    /// Raster mode active before any key is pressed.
    pub raster_mode: RasterMode,
}
