//! Frame sources.
//!
//! A `FrameSource` abstracts the camera device: it is started with a set
//! of stream requests and then produces synchronized frame bundles on
//! demand. `wait_for_bundle` blocks until the device delivers the next
//! bundle; there is no timeout, so a stalled device stalls the caller
//! (acceptable for an offline capture tool).
//!
//! `SyntheticSource` generates gradient rasters so the binary and the
//! test suite run without hardware attached.

use crate::error::{CaptureError, CaptureResult};
use crate::frame::{FrameBundle, Intrinsics, PixelFormat, StreamKind, StreamProfile, VideoFrame};

/// One requested stream: type, resolution, pixel format, rate.
#[derive(Clone, Debug)]
pub struct StreamRequest {
    pub kind: StreamKind,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl StreamRequest {
    /// The color + depth pair the capture tool requests by default
    /// (1280x720 BGR8 / Z16 at 30 fps).
    pub fn default_pair() -> Vec<StreamRequest> {
        vec![
            StreamRequest {
                kind: StreamKind::Color,
                format: PixelFormat::Bgr8,
                width: 1280,
                height: 720,
                fps: 30,
            },
            StreamRequest {
                kind: StreamKind::Depth,
                format: PixelFormat::Z16,
                width: 1280,
                height: 720,
                fps: 30,
            },
        ]
    }
}

/// Black-box producer of synchronized frame bundles.
pub trait FrameSource {
    /// Configure and start streaming. Must be called before
    /// `wait_for_bundle`.
    fn start(&mut self, requests: &[StreamRequest]) -> CaptureResult<()>;

    /// Block until the next synchronized bundle is available.
    fn wait_for_bundle(&mut self) -> CaptureResult<FrameBundle>;

    /// Depth unit scale in meters per Z16 sample.
    fn depth_scale(&self) -> f32;
}

// ----------------------------------------------------------------------------
// Synthetic source
// ----------------------------------------------------------------------------

const SYNTHETIC_DEPTH_SCALE: f32 = 0.001;

/// Hardware-free source producing deterministic gradient rasters.
pub struct SyntheticSource {
    requests: Vec<StreamRequest>,
    frame_count: u64,
    started: bool,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            frame_count: 0,
            started: false,
        }
    }

    fn synthetic_intrinsics(width: u32, height: u32) -> Intrinsics {
        // Plausible pinhole values for a synthetic sensor: focal length
        // of half the width, principal point at the image center.
        Intrinsics {
            fx: width as f32 / 2.0,
            fy: width as f32 / 2.0,
            ppx: width as f32 / 2.0,
            ppy: height as f32 / 2.0,
            model: "none".to_string(),
            coeffs: [0.0; 5],
        }
    }

    fn generate_channel(&self, req: &StreamRequest) -> VideoFrame {
        let w = req.width as usize;
        let h = req.height as usize;
        let data = match req.format {
            PixelFormat::Z16 => {
                // Depth ramp that shifts per frame; samples in device
                // units, zero column marks invalid pixels.
                let mut data = Vec::with_capacity(w * h * 2);
                for i in 0..w * h {
                    let x = i % w;
                    let sample = if x == 0 {
                        0u16
                    } else {
                        ((x as u64 * 8 + self.frame_count) % 4000) as u16 + 400
                    };
                    data.extend_from_slice(&sample.to_le_bytes());
                }
                data
            }
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => (0..w * h * 3)
                .map(|i| ((i as u64 / 3 + self.frame_count) % 256) as u8)
                .collect(),
            PixelFormat::Y8 => (0..w * h)
                .map(|i| {
                    let x = i % w;
                    let y = i / w;
                    ((x + y + self.frame_count as usize) % 256) as u8
                })
                .collect(),
        };

        VideoFrame {
            profile: StreamProfile {
                kind: req.kind,
                format: req.format,
                width: req.width,
                height: req.height,
                intrinsics: Some(Self::synthetic_intrinsics(req.width, req.height)),
            },
            data,
            timestamp_ms: self.frame_count as f64 * 1000.0 / 30.0,
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for SyntheticSource {
    fn start(&mut self, requests: &[StreamRequest]) -> CaptureResult<()> {
        if requests.is_empty() {
            return Err(CaptureError::InvalidConfig(
                "at least one stream request is required".into(),
            ));
        }
        self.requests = requests.to_vec();
        self.started = true;
        log::info!("synthetic source started with {} streams", requests.len());
        Ok(())
    }

    fn wait_for_bundle(&mut self) -> CaptureResult<FrameBundle> {
        if !self.started {
            return Err(CaptureError::Device("source not started".into()));
        }
        self.frame_count += 1;
        let channels = self
            .requests
            .iter()
            .map(|req| self.generate_channel(req))
            .collect();
        Ok(FrameBundle::new(channels))
    }

    fn depth_scale(&self) -> f32 {
        SYNTHETIC_DEPTH_SCALE
    }
}
