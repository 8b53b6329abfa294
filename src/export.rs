//! Frame export to disk.
//!
//! One kept tick produces four artifacts under the configured base path:
//! the intrinsics record (written first), the reference channel, the
//! colorized depth, and the raw 16-bit depth. Filenames concatenate the
//! base path, channel name, tick index, and current unix time, so files
//! never collide across ticks and sort roughly by capture order. Two
//! exports of the same tick within the same wall-clock second would
//! collide; nothing dedups that.
//!
//! Image writes are best-effort and independent: a failed channel is
//! logged and skipped, the others still land. A failed metadata write
//! skips the whole tick so image files never exist without their record.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageBuffer, Luma, RgbImage};

use crate::colorize::colorize_depth;
use crate::error::{CaptureError, CaptureResult};
use crate::frame::{PixelFormat, VideoFrame};
use crate::intrinsics::IntrinsicsRecord;

/// Sink for kept, aligned frame bundles.
pub trait FrameExporter {
    /// Persist one tick: intrinsics record plus reference, colorized
    /// depth, and raw depth channels.
    fn export_record(
        &mut self,
        tick: u64,
        reference: &VideoFrame,
        depth: &VideoFrame,
        record: &IntrinsicsRecord,
    ) -> CaptureResult<()>;
}

/// Disk-backed exporter writing PNG images and the intrinsics record.
pub struct DiskExporter {
    /// Output prefix. A trailing separator is expected; the naming
    /// scheme concatenates rather than joins.
    base: String,
}

impl DiskExporter {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn channel_path(&self, channel: &str, tick: u64, unix: u64, ext: &str) -> String {
        format!("{}{}_{}{}{}", self.base, channel, tick, unix, ext)
    }

    fn write_reference(&self, path: &str, reference: &VideoFrame) -> CaptureResult<()> {
        let rgb = reference_rgb_bytes(reference)?;
        let img = RgbImage::from_raw(reference.profile.width, reference.profile.height, rgb)
            .ok_or_else(|| {
                CaptureError::ImageWrite(format!("{}: raster size mismatch", path))
            })?;
        img.save(path)
            .map_err(|e| CaptureError::ImageWrite(format!("{}: {}", path, e)))
    }

    fn write_colorized(&self, path: &str, depth: &VideoFrame) -> CaptureResult<()> {
        let rgb = colorize_depth(depth)?;
        let img = RgbImage::from_raw(depth.profile.width, depth.profile.height, rgb)
            .ok_or_else(|| {
                CaptureError::ImageWrite(format!("{}: raster size mismatch", path))
            })?;
        img.save(path)
            .map_err(|e| CaptureError::ImageWrite(format!("{}: {}", path, e)))
    }

    fn write_raw_depth(&self, path: &str, depth: &VideoFrame) -> CaptureResult<()> {
        if depth.profile.format != PixelFormat::Z16 {
            return Err(CaptureError::ImageWrite(format!(
                "{}: depth channel has non-Z16 format {:?}",
                path, depth.profile.format
            )));
        }
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(
            depth.profile.width,
            depth.profile.height,
            depth.depth_samples(),
        )
        .ok_or_else(|| CaptureError::ImageWrite(format!("{}: raster size mismatch", path)))?;
        img.save(path)
            .map_err(|e| CaptureError::ImageWrite(format!("{}: {}", path, e)))
    }
}

impl FrameExporter for DiskExporter {
    fn export_record(
        &mut self,
        tick: u64,
        reference: &VideoFrame,
        depth: &VideoFrame,
        record: &IntrinsicsRecord,
    ) -> CaptureResult<()> {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| CaptureError::MetadataWrite(format!("clock error: {}", e)))?
            .as_secs();

        // Metadata first: if this fails, no image files for the tick.
        let meta_path = self.channel_path("depth", tick, unix, ".json");
        fs::write(&meta_path, record.render())
            .map_err(|e| CaptureError::MetadataWrite(format!("{}: {}", meta_path, e)))?;

        let color_path = self.channel_path("color", tick, unix, ".png");
        if let Err(e) = self.write_reference(&color_path, reference) {
            log::warn!("{}", e);
        }

        let ir_path = self.channel_path("ir", tick, unix, ".png");
        if let Err(e) = self.write_colorized(&ir_path, depth) {
            log::warn!("{}", e);
        }

        let depth_path = self.channel_path("depth", tick, unix, ".png");
        if let Err(e) = self.write_raw_depth(&depth_path, depth) {
            log::warn!("{}", e);
        }

        Ok(())
    }
}

/// Convert a reference channel to tightly-packed RGB bytes.
fn reference_rgb_bytes(frame: &VideoFrame) -> CaptureResult<Vec<u8>> {
    match frame.profile.format {
        PixelFormat::Rgb8 => Ok(frame.data.clone()),
        PixelFormat::Bgr8 => Ok(frame
            .data
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect()),
        PixelFormat::Y8 => Ok(frame.data.iter().flat_map(|&y| [y, y, y]).collect()),
        PixelFormat::Z16 => Err(CaptureError::ImageWrite(
            "reference channel has depth format".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Intrinsics, StreamKind, StreamProfile};

    fn reference_frame() -> VideoFrame {
        VideoFrame {
            profile: StreamProfile {
                kind: StreamKind::Color,
                format: PixelFormat::Bgr8,
                width: 4,
                height: 2,
                intrinsics: None,
            },
            data: (0u8..24).collect(),
            timestamp_ms: 0.0,
        }
    }

    fn depth_frame() -> VideoFrame {
        VideoFrame {
            profile: StreamProfile {
                kind: StreamKind::Depth,
                format: PixelFormat::Z16,
                width: 4,
                height: 2,
                intrinsics: Some(Intrinsics {
                    fx: 2.0,
                    fy: 2.0,
                    ppx: 2.0,
                    ppy: 1.0,
                    model: "none".to_string(),
                    coeffs: [0.0; 5],
                }),
            },
            data: (1u16..9).flat_map(|s| s.to_le_bytes()).collect(),
            timestamp_ms: 0.0,
        }
    }

    fn record() -> IntrinsicsRecord {
        IntrinsicsRecord::from_depth_frame(&depth_frame(), 0.001).unwrap()
    }

    #[test]
    fn exports_four_artifacts_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("{}/", dir.path().display());
        let mut exporter = DiskExporter::new(base);

        exporter
            .export_record(3, &reference_frame(), &depth_frame(), &record())
            .unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.iter().any(|n| n.starts_with("color_3") && n.ends_with(".png")));
        assert!(names.iter().any(|n| n.starts_with("ir_3") && n.ends_with(".png")));
        assert!(names.iter().any(|n| n.starts_with("depth_3") && n.ends_with(".png")));
        assert!(names.iter().any(|n| n.starts_with("depth_3") && n.ends_with(".json")));
    }

    #[test]
    fn raw_depth_is_written_as_16_bit() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("{}/", dir.path().display());
        let mut exporter = DiskExporter::new(base);
        exporter
            .export_record(1, &reference_frame(), &depth_frame(), &record())
            .unwrap();

        let depth_png = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| {
                let name = p.file_name().unwrap().to_string_lossy().into_owned();
                name.starts_with("depth_1") && name.ends_with(".png")
            })
            .unwrap();
        let img = image::open(&depth_png).unwrap();
        let depth16 = img.as_luma16().expect("depth png should be 16-bit grayscale");
        assert_eq!(depth16.dimensions(), (4, 2));
        assert_eq!(depth16.get_pixel(0, 0).0[0], 1);
        assert_eq!(depth16.get_pixel(3, 1).0[0], 8);
    }

    #[test]
    fn metadata_content_matches_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("{}/", dir.path().display());
        let mut exporter = DiskExporter::new(base);
        exporter
            .export_record(7, &reference_frame(), &depth_frame(), &record())
            .unwrap();

        let json_path = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| p.extension().is_some_and(|e| e == "json"))
            .unwrap();
        assert_eq!(fs::read_to_string(json_path).unwrap(), record().render());
    }

    #[test]
    fn failed_metadata_write_blocks_image_writes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let base = format!("{}/", missing.display());
        let mut exporter = DiskExporter::new(base);

        let err = exporter
            .export_record(3, &reference_frame(), &depth_frame(), &record())
            .unwrap_err();
        assert!(matches!(err, CaptureError::MetadataWrite(_)));
        assert!(!missing.exists());
    }

    #[test]
    fn failed_channel_does_not_block_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("{}/", dir.path().display());
        let mut exporter = DiskExporter::new(base);

        // A reference frame in depth format cannot be rendered as RGB.
        let mut bad_reference = reference_frame();
        bad_reference.profile.format = PixelFormat::Z16;
        bad_reference.data = vec![0u8; 16];

        exporter
            .export_record(3, &bad_reference, &depth_frame(), &record())
            .unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert!(!names.iter().any(|n| n.starts_with("color_")));
        assert!(names.iter().any(|n| n.starts_with("ir_3")));
        assert!(names.iter().any(|n| n.starts_with("depth_3") && n.ends_with(".png")));
    }

    #[test]
    fn bgr_reference_is_swapped_to_rgb() {
        let mut frame = reference_frame();
        frame.data = vec![10, 20, 30, 1, 2, 3];
        frame.profile.width = 2;
        frame.profile.height = 1;
        let rgb = reference_rgb_bytes(&frame).unwrap();
        assert_eq!(rgb, vec![30, 20, 10, 3, 2, 1]);
    }

    #[test]
    fn y8_reference_is_replicated_across_channels() {
        let mut frame = reference_frame();
        frame.profile.format = PixelFormat::Y8;
        frame.profile.width = 2;
        frame.profile.height = 1;
        frame.data = vec![7, 9];
        assert_eq!(reference_rgb_bytes(&frame).unwrap(), vec![7, 7, 7, 9, 9, 9]);
    }
}
