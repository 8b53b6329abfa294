//! Error taxonomy for the capture pipeline.
//!
//! Configuration and device-level errors are fatal and abort the run.
//! Per-tick I/O errors (`MetadataWrite`, `ImageWrite`) are recoverable:
//! the scheduler logs them and the loop continues.

use std::fmt;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors that can occur in the capture pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Bad configuration (e.g. target rate outside 1..=30). Rejected
    /// before any capture call is made.
    InvalidConfig(String),
    /// The bundle carries no depth channel at all.
    NoDepthStream,
    /// The bundle carries only a depth channel, nothing to align to.
    NoAlignTarget,
    /// Capture interruption (device disconnect, stream fault). No retry.
    Device(String),
    /// The intrinsics record could not be written. The tick is skipped;
    /// no image files are written for it.
    MetadataWrite(String),
    /// A single image channel could not be encoded or written. Other
    /// channels of the same tick are unaffected.
    ImageWrite(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            CaptureError::NoDepthStream => write!(f, "no depth stream available"),
            CaptureError::NoAlignTarget => write!(f, "no stream found to align depth with"),
            CaptureError::Device(msg) => write!(f, "device error: {}", msg),
            CaptureError::MetadataWrite(msg) => write!(f, "metadata write failed: {}", msg),
            CaptureError::ImageWrite(msg) => write!(f, "image write failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}
