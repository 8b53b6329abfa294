//! depthcap - frame-rate-gated capture and export for depth cameras
//!
//! This crate pulls synchronized frame bundles from a depth camera,
//! aligns depth to a reference stream, and writes per-tick artifacts
//! (reference image, colorized depth, raw 16-bit depth, intrinsics
//! record) to disk at a caller-specified output rate.
//!
//! # Architecture
//!
//! Three narrow seams keep the core loop testable without hardware:
//!
//! 1. **FrameSource**: pull-next-bundle (blocking, no timeout)
//! 2. **DepthAligner**: align-to-target (black-box transform)
//! 3. **FrameExporter**: export-record (best-effort file sink)
//!
//! The `CaptureScheduler` in between owns the only control flow: warm-up
//! discard, tick gating by skip interval, align-target selection, and the
//! optional export cap.
//!
//! # Module Structure
//!
//! - `frame`: stream kinds, pixel formats, frames, bundles
//! - `source`: `FrameSource` trait + hardware-free `SyntheticSource`
//! - `align`: target selection and the `DepthAligner` seam
//! - `colorize`: depth-to-RGB rendering for the colorized channel
//! - `intrinsics`: the fixed per-tick calibration record
//! - `export`: `FrameExporter` trait + `DiskExporter`
//! - `scheduler`: the capture loop

pub mod align;
pub mod colorize;
pub mod error;
pub mod export;
pub mod frame;
pub mod intrinsics;
pub mod scheduler;
pub mod source;

pub use align::{find_align_target, DepthAligner, NearestAligner};
pub use colorize::colorize_depth;
pub use error::{CaptureError, CaptureResult};
pub use export::{DiskExporter, FrameExporter};
pub use frame::{FrameBundle, Intrinsics, PixelFormat, StreamKind, StreamProfile, VideoFrame};
pub use intrinsics::IntrinsicsRecord;
pub use scheduler::{CaptureScheduler, RunSummary, ScheduleConfig, SOURCE_RATE_CAP};
pub use source::{FrameSource, StreamRequest, SyntheticSource};
