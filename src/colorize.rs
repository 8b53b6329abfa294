//! Depth colorization.
//!
//! Renders a Z16 raster as a 3-channel 8-bit image for visual inspection,
//! standing in for the vendor colorizer. Valid (non-zero) samples are
//! normalized over the frame's own range and mapped through a jet-style
//! colormap; invalid samples render black.

use crate::error::{CaptureError, CaptureResult};
use crate::frame::{PixelFormat, VideoFrame};

/// Colorize a depth frame into an RGB byte raster (3 bytes per pixel,
/// row-major, same dimensions as the input).
pub fn colorize_depth(depth: &VideoFrame) -> CaptureResult<Vec<u8>> {
    if depth.profile.format != PixelFormat::Z16 {
        return Err(CaptureError::ImageWrite(format!(
            "cannot colorize non-Z16 format {:?}",
            depth.profile.format
        )));
    }

    let samples = depth.depth_samples();
    let mut min = u16::MAX;
    let mut max = 0u16;
    for &s in &samples {
        if s == 0 {
            continue;
        }
        min = min.min(s);
        max = max.max(s);
    }

    let mut rgb = Vec::with_capacity(samples.len() * 3);
    if max < min {
        // No valid samples in the frame.
        rgb.resize(samples.len() * 3, 0);
        return Ok(rgb);
    }

    let range = (max - min).max(1) as f32;
    for &s in &samples {
        if s == 0 {
            rgb.extend_from_slice(&[0, 0, 0]);
        } else {
            let t = (s - min) as f32 / range;
            rgb.extend_from_slice(&jet(t));
        }
    }
    Ok(rgb)
}

/// Jet colormap: blue at 0, green mid-range, red at 1.
fn jet(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}
