//! Intrinsics record rendering.
//!
//! One record is derived per kept tick from the depth channel's profile
//! plus the device depth scale, and written alongside the image files.
//! The on-disk layout is a fixed, field-ordered text document that also
//! parses as JSON; downstream tooling greps it, so the layout never
//! changes.

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};
use crate::frame::VideoFrame;

/// Depth unit scale plus depth-stream calibration, as persisted per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicsRecord {
    /// Depth unit scale in meters per sample (device-specific).
    pub scale: f32,
    pub fx: f32,
    pub fy: f32,
    pub ppx: f32,
    pub ppy: f32,
    pub model: String,
    pub coeffs: [f32; 5],
}

impl IntrinsicsRecord {
    /// Derive a record from an aligned depth frame. Fails with `Device`
    /// if the depth stream carries no calibration.
    pub fn from_depth_frame(depth: &VideoFrame, scale: f32) -> CaptureResult<Self> {
        let intr = depth
            .profile
            .intrinsics
            .as_ref()
            .ok_or_else(|| CaptureError::Device("depth stream has no intrinsics".into()))?;
        Ok(Self {
            scale,
            fx: intr.fx,
            fy: intr.fy,
            ppx: intr.ppx,
            ppy: intr.ppy,
            model: intr.model.clone(),
            coeffs: intr.coeffs,
        })
    }

    /// Render the fixed two-line layout. Field order is part of the
    /// format; the last coefficient carries no trailing separator.
    pub fn render(&self) -> String {
        format!(
            "{{\n\"scale\":{},\"fx\":{},\"fy\":{},\"ppx\":{},\"ppy\":{},\n\"model\":\"{}\",\"coeffs\": [{},{},{},{},{}]}}\n",
            self.scale,
            self.fx,
            self.fy,
            self.ppx,
            self.ppy,
            self.model,
            self.coeffs[0],
            self.coeffs[1],
            self.coeffs[2],
            self.coeffs[3],
            self.coeffs[4],
        )
    }
}
