//! Depth-to-stream alignment.
//!
//! Alignment resamples the depth channel into the pixel grid of another
//! channel. Target selection prefers a color stream so the overlay looks
//! right, but tolerates color-less devices by falling back to any other
//! non-depth stream.

use crate::error::{CaptureError, CaptureResult};
use crate::frame::{FrameBundle, PixelFormat, StreamKind, VideoFrame};

/// Pick the stream to align depth with.
///
/// Scans channels in bundle order: any non-depth stream is a candidate
/// until a color stream is seen; color, once found, is never displaced.
/// Fails with `NoDepthStream` when no depth channel exists and with
/// `NoAlignTarget` when depth is the only stream.
pub fn find_align_target(bundle: &FrameBundle) -> CaptureResult<StreamKind> {
    let mut target = None;
    let mut color_found = false;
    let mut depth_found = false;

    for channel in bundle.channels() {
        let kind = channel.profile.kind;
        if kind == StreamKind::Depth {
            depth_found = true;
            continue;
        }
        if !color_found {
            target = Some(kind);
        }
        if kind == StreamKind::Color {
            color_found = true;
        }
    }

    if !depth_found {
        return Err(CaptureError::NoDepthStream);
    }
    target.ok_or(CaptureError::NoAlignTarget)
}

/// Black-box transform producing an aligned bundle.
///
/// Implementations may return a bundle with missing channels when device
/// buffers underrun; the scheduler treats that as end-of-stream.
pub trait DepthAligner {
    fn align(&mut self, bundle: FrameBundle, target: StreamKind) -> CaptureResult<FrameBundle>;
}

/// Host-side stand-in for the vendor alignment routine.
///
/// Resamples the depth raster into the target channel's grid by nearest
/// neighbor. Ignores extrinsics, so it is only geometrically exact when
/// the sensors share an optical center; real alignment belongs to the
/// device SDK.
pub struct NearestAligner;

impl DepthAligner for NearestAligner {
    fn align(&mut self, bundle: FrameBundle, target: StreamKind) -> CaptureResult<FrameBundle> {
        let reference = match bundle.channel(target) {
            Some(frame) => frame.clone(),
            None => return Ok(FrameBundle::default()),
        };
        let depth = match bundle.channel(StreamKind::Depth) {
            Some(frame) => frame.clone(),
            None => return Ok(FrameBundle::default()),
        };

        let aligned_depth = if depth.profile.width == reference.profile.width
            && depth.profile.height == reference.profile.height
        {
            depth
        } else {
            resample_depth(&depth, reference.profile.width, reference.profile.height)?
        };

        Ok(FrameBundle::new(vec![reference, aligned_depth]))
    }
}

fn resample_depth(depth: &VideoFrame, out_w: u32, out_h: u32) -> CaptureResult<VideoFrame> {
    if depth.profile.format != PixelFormat::Z16 {
        return Err(CaptureError::Device(format!(
            "depth stream has non-Z16 format {:?}",
            depth.profile.format
        )));
    }
    let samples = depth.depth_samples();
    let in_w = depth.profile.width as usize;
    let in_h = depth.profile.height as usize;

    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * 2);
    for y in 0..out_h as usize {
        let sy = y * in_h / out_h as usize;
        for x in 0..out_w as usize {
            let sx = x * in_w / out_w as usize;
            data.extend_from_slice(&samples[sy * in_w + sx].to_le_bytes());
        }
    }

    let mut profile = depth.profile.clone();
    profile.width = out_w;
    profile.height = out_h;
    Ok(VideoFrame {
        profile,
        data,
        timestamp_ms: depth.timestamp_ms,
    })
}
