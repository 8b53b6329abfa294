//! Frame and stream types.
//!
//! A `FrameBundle` is one synchronized set of per-stream rasters captured
//! at a single instant. Bundles are produced by a `FrameSource`, owned by
//! the scheduler for exactly one iteration, and not retained afterward.
//!
//! Bundle order matters: align-target selection scans channels in the
//! order the device enumerated them, so `FrameBundle` preserves insertion
//! order rather than keying by stream kind.

use std::fmt;

/// Stream type of a channel within a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Depth,
    Color,
    Infrared,
    Fisheye,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Depth => "depth",
            StreamKind::Color => "color",
            StreamKind::Infrared => "infrared",
            StreamKind::Fisheye => "fisheye",
        };
        write!(f, "{}", name)
    }
}

/// Pixel layout of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 x 8-bit, blue first (the usual color wire format).
    Bgr8,
    /// 3 x 8-bit, red first.
    Rgb8,
    /// Single 8-bit luminance (infrared).
    Y8,
    /// Single 16-bit little-endian depth sample.
    Z16,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Y8 => 1,
            PixelFormat::Z16 => 2,
        }
    }
}

/// Camera calibration parameters attached to a stream profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub ppx: f32,
    pub ppy: f32,
    /// Distortion model name as reported by the device.
    pub model: String,
    pub coeffs: [f32; 5],
}

/// Static description of one stream within a bundle.
#[derive(Clone, Debug)]
pub struct StreamProfile {
    pub kind: StreamKind,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Present for calibrated video streams; the scheduler requires it
    /// on the depth stream to derive the intrinsics record.
    pub intrinsics: Option<Intrinsics>,
}

/// One raster frame plus its profile and capture timestamp.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub profile: StreamProfile,
    pub data: Vec<u8>,
    /// Capture timestamp in milliseconds since the device epoch.
    pub timestamp_ms: f64,
}

impl VideoFrame {
    /// Expected byte length for the profile's dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.profile.width as usize
            * self.profile.height as usize
            * self.profile.format.bytes_per_pixel()
    }

    /// Depth samples as native u16, assuming Z16 little-endian data.
    pub fn depth_samples(&self) -> Vec<u16> {
        self.data
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect()
    }
}

/// One synchronized set of per-stream frames, in device enumeration order.
#[derive(Debug, Default)]
pub struct FrameBundle {
    channels: Vec<VideoFrame>,
}

impl FrameBundle {
    pub fn new(channels: Vec<VideoFrame>) -> Self {
        Self { channels }
    }

    /// Channels in bundle order.
    pub fn channels(&self) -> &[VideoFrame] {
        &self.channels
    }

    /// First channel of the given kind, if present.
    pub fn channel(&self, kind: StreamKind) -> Option<&VideoFrame> {
        self.channels.iter().find(|c| c.profile.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(kind: StreamKind, format: PixelFormat, w: u32, h: u32) -> VideoFrame {
        let len = (w * h) as usize * format.bytes_per_pixel();
        VideoFrame {
            profile: StreamProfile {
                kind,
                format,
                width: w,
                height: h,
                intrinsics: None,
            },
            data: vec![0u8; len],
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn bundle_preserves_order_and_finds_by_kind() {
        let bundle = FrameBundle::new(vec![
            frame(StreamKind::Infrared, PixelFormat::Y8, 4, 4),
            frame(StreamKind::Depth, PixelFormat::Z16, 4, 4),
            frame(StreamKind::Color, PixelFormat::Bgr8, 4, 4),
        ]);

        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.channels()[0].profile.kind, StreamKind::Infrared);
        assert!(bundle.channel(StreamKind::Color).is_some());
        assert!(bundle.channel(StreamKind::Fisheye).is_none());
    }

    #[test]
    fn depth_samples_decode_little_endian() {
        let mut f = frame(StreamKind::Depth, PixelFormat::Z16, 2, 1);
        f.data = vec![0x01, 0x00, 0x00, 0x02];
        assert_eq!(f.depth_samples(), vec![1, 512]);
    }

    #[test]
    fn expected_len_tracks_format() {
        assert_eq!(frame(StreamKind::Color, PixelFormat::Bgr8, 10, 10).expected_len(), 300);
        assert_eq!(frame(StreamKind::Depth, PixelFormat::Z16, 10, 10).expected_len(), 200);
    }
}
