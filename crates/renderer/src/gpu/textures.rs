use std::path::{Path, PathBuf};

use image::imageops::{flip_vertical_in_place, resize, FilterType};
use image::RgbaImage;
use thiserror::Error;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::types::TextureSource;

/// Failure while turning an image file into upload-ready pixel data.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image at {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// What happened while loading one texture slot.
///
/// Loading never aborts the viewer; the report makes the degraded cases
/// (missing file, channel mismatch) visible to callers and tests.
#[derive(Debug, Clone)]
pub struct TextureReport {
    /// Shader slot the image was bound to (0 or 1).
    pub slot: usize,
    /// Image path the slot was configured with.
    pub path: PathBuf,
    /// False when decoding failed and the placeholder is bound instead.
    pub loaded: bool,
    /// Channel count the configuration declared for the file.
    pub declared_channels: u8,
    /// Channel count the decoder actually found, when decoding succeeded.
    pub decoded_channels: Option<u8>,
}

impl TextureReport {
    /// True when the decoded file carried exactly the declared channels.
    pub fn channels_match(&self) -> bool {
        self.decoded_channels == Some(self.declared_channels)
    }
}

/// GPU resources for one texture slot plus the loading report.
pub(crate) struct TextureResources {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub report: TextureReport,
}

/// Decoded pixels with a full mip chain, ready for a single upload.
#[derive(Debug)]
struct DecodedTexture {
    data: Vec<u8>,
    width: u32,
    height: u32,
    mip_level_count: u32,
    decoded_channels: u8,
}

/// Loads one texture slot, degrading to a 1x1 white placeholder when the
/// file cannot be decoded. Every image is expanded to RGBA for upload; a
/// channel count differing from the declaration is logged, not fatal.
pub(crate) fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    slot: usize,
    source: &TextureSource,
) -> TextureResources {
    match decode_texture(&source.path) {
        Ok(decoded) => {
            let report = TextureReport {
                slot,
                path: source.path.clone(),
                loaded: true,
                declared_channels: source.channels.count(),
                decoded_channels: Some(decoded.decoded_channels),
            };
            if !report.channels_match() {
                tracing::warn!(
                    slot,
                    path = %source.path.display(),
                    declared = report.declared_channels,
                    decoded = decoded.decoded_channels,
                    "texture channel count differs from declaration; uploading as rgba"
                );
            }
            tracing::info!(
                slot,
                path = %source.path.display(),
                width = decoded.width,
                height = decoded.height,
                mip_levels = decoded.mip_level_count,
                "loaded texture"
            );
            create_resources(device, queue, slot, &decoded, report)
        }
        Err(error) => {
            tracing::warn!(
                slot,
                path = %source.path.display(),
                error = %error,
                "failed to load texture; using placeholder"
            );
            let placeholder = DecodedTexture {
                data: vec![255, 255, 255, 255],
                width: 1,
                height: 1,
                mip_level_count: 1,
                decoded_channels: 4,
            };
            let report = TextureReport {
                slot,
                path: source.path.clone(),
                loaded: false,
                declared_channels: source.channels.count(),
                decoded_channels: None,
            };
            create_resources(device, queue, slot, &placeholder, report)
        }
    }
}

fn create_resources(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    slot: usize,
    decoded: &DecodedTexture,
    report: TextureReport,
) -> TextureResources {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(&format!("quad texture slot {slot}")),
            size: wgpu::Extent3d {
                width: decoded.width,
                height: decoded.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: decoded.mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &decoded.data,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    TextureResources {
        _texture: texture,
        view,
        sampler,
        report,
    }
}

/// Decodes an image, flips it to bottom-left origin, and appends every mip
/// level after the base pixels.
fn decode_texture(path: &Path) -> Result<DecodedTexture, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded_channels = image.color().channel_count();
    let mut rgba = image.to_rgba8();
    // Texture coordinates address the image bottom-up.
    flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    let (data, mip_level_count) = build_mip_chain(rgba);
    Ok(DecodedTexture {
        data,
        width,
        height,
        mip_level_count,
        decoded_channels,
    })
}

/// Number of mip levels down to 1x1 for the given base dimensions.
pub(crate) fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Downsamples the base image level by level, concatenating the raw RGBA
/// bytes of every mip in order.
fn build_mip_chain(base: RgbaImage) -> (Vec<u8>, u32) {
    let (width, height) = base.dimensions();
    let levels = mip_level_count(width, height);
    let mut data = Vec::with_capacity(base.as_raw().len() * 4 / 3 + 4);
    data.extend_from_slice(base.as_raw());

    let mut current = base;
    for level in 1..levels {
        let next_width = (width >> level).max(1);
        let next_height = (height >> level).max(1);
        current = resize(&current, next_width, next_height, FilterType::Triangle);
        data.extend_from_slice(current.as_raw());
    }

    (data, levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn mip_count_covers_the_full_chain() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(640, 427), 10);
        assert_eq!(mip_level_count(512, 1), 10);
    }

    #[test]
    fn mip_chain_concatenates_every_level() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let (data, levels) = build_mip_chain(base);
        assert_eq!(levels, 3);
        // 4x4 + 2x2 + 1x1 pixels, four bytes each.
        assert_eq!(data.len(), (16 + 4 + 1) * 4);
        // A constant image stays constant through downsampling.
        let tail = &data[data.len() - 4..];
        assert_eq!(tail, &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_flips_rows_to_bottom_left_origin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("two_rows.png");
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.save(&path).expect("write png");

        let decoded = decode_texture(&path).expect("decode");
        assert_eq!((decoded.width, decoded.height), (1, 2));
        assert_eq!(decoded.decoded_channels, 4);
        // The bottom row of the file is now the first row of the upload.
        assert_eq!(&decoded.data[0..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn decode_reports_three_channels_for_opaque_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("opaque.png");
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        img.save(&path).expect("write png");

        let decoded = decode_texture(&path).expect("decode");
        assert_eq!(decoded.decoded_channels, 3);
        // Upload data is still expanded to four channels.
        assert_eq!(decoded.data.len(), ((2 * 2) + 1) * 4);
    }

    #[test]
    fn decode_failure_carries_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.png");
        let error = decode_texture(&path).expect_err("missing file should fail");
        assert!(error.to_string().contains("missing.png"));
    }

    #[test]
    fn report_flags_channel_mismatch() {
        let mut report = TextureReport {
            slot: 1,
            path: PathBuf::from("awesomeface.png"),
            loaded: true,
            declared_channels: 4,
            decoded_channels: Some(3),
        };
        assert!(!report.channels_match());
        report.decoded_channels = Some(4);
        assert!(report.channels_match());
        report.decoded_channels = None;
        assert!(!report.channels_match());
    }
}
