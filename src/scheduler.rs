//! Capture scheduling.
//!
//! The scheduler converts a continuous stream of frame bundles into a
//! sparser stream of export jobs at a caller-specified rate, with an
//! optional cap on total exports. Rate gating is a skip interval derived
//! by integer division from the fixed source rate cap: the fractional
//! remainder is truncated, so e.g. a target of 7 fps yields an interval
//! of 4 and an actual output rate near 7.5. That approximation is
//! intended, not a bug.
//!
//! The loop is single-threaded and blocking. Configuration and device
//! errors abort the run; per-tick metadata failures skip the tick.

use crate::align::{find_align_target, DepthAligner};
use crate::error::{CaptureError, CaptureResult};
use crate::export::FrameExporter;
use crate::frame::StreamKind;
use crate::intrinsics::IntrinsicsRecord;
use crate::source::FrameSource;

/// Fixed upper bound on the source frame rate.
pub const SOURCE_RATE_CAP: u32 = 30;

/// Validated schedule parameters.
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    pub target_fps: u32,
    /// A tick is kept iff `tick % skip_interval == 0` (ticks are
    /// 1-indexed).
    pub skip_interval: u64,
    /// Total exports before the run stops; 0 means unbounded.
    pub max_exports: u64,
}

impl ScheduleConfig {
    /// Fails with `InvalidConfig` unless `1 <= target_fps <= 30`.
    pub fn new(target_fps: u32, max_exports: u64) -> CaptureResult<Self> {
        if target_fps == 0 || target_fps > SOURCE_RATE_CAP {
            return Err(CaptureError::InvalidConfig(format!(
                "target rate {} outside 1..={}",
                target_fps, SOURCE_RATE_CAP
            )));
        }
        Ok(Self {
            target_fps,
            skip_interval: (SOURCE_RATE_CAP / target_fps) as u64,
            max_exports,
        })
    }
}

/// Counters reported by a completed run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    /// Bundles pulled from the source (warm-up excluded).
    pub ticks: u64,
    /// Bundles successfully exported.
    pub exported: u64,
}

/// Drives the capture loop over the three pipeline seams.
pub struct CaptureScheduler<S, A, E> {
    config: ScheduleConfig,
    source: S,
    aligner: A,
    exporter: E,
}

impl<S, A, E> CaptureScheduler<S, A, E>
where
    S: FrameSource,
    A: DepthAligner,
    E: FrameExporter,
{
    pub fn new(config: ScheduleConfig, source: S, aligner: A, exporter: E) -> Self {
        Self {
            config,
            source,
            aligner,
            exporter,
        }
    }

    /// Discard the first `n` bundles unconditionally so auto-exposure
    /// and auto-gain settle. No alignment, no export.
    pub fn warm_up(&mut self, n: u32) -> CaptureResult<()> {
        for _ in 0..n {
            self.source.wait_for_bundle()?;
        }
        log::info!("warm-up complete ({} bundles discarded)", n);
        Ok(())
    }

    /// Run the capture loop until the export cap is reached or the
    /// stream ends (an aligned bundle missing its depth or reference
    /// channel).
    pub fn run(&mut self) -> CaptureResult<RunSummary> {
        let scale = self.source.depth_scale();
        log::info!(
            "capture loop: target {} fps, skip interval {}, depth scale {}",
            self.config.target_fps,
            self.config.skip_interval,
            scale
        );

        let mut summary = RunSummary::default();
        loop {
            // Cap check sits at the iteration boundary: once the cap is
            // reached no further pull is started.
            if self.config.max_exports != 0 && summary.exported >= self.config.max_exports {
                break;
            }
            summary.ticks += 1;
            let tick = summary.ticks;

            let bundle = self.source.wait_for_bundle()?;
            if tick % self.config.skip_interval != 0 {
                continue;
            }

            let target = find_align_target(&bundle)?;
            let aligned = self.aligner.align(bundle, target)?;

            let (reference, depth) = match (
                aligned.channel(target),
                aligned.channel(StreamKind::Depth),
            ) {
                (Some(r), Some(d)) => (r, d),
                _ => {
                    log::info!("aligned bundle incomplete at tick {}, ending run", tick);
                    break;
                }
            };
            if reference.data.len() != reference.expected_len()
                || depth.data.len() != depth.expected_len()
            {
                log::info!("aligned frame truncated at tick {}, ending run", tick);
                break;
            }

            let record = IntrinsicsRecord::from_depth_frame(depth, scale)?;
            match self.exporter.export_record(tick, reference, depth, &record) {
                Ok(()) => {
                    summary.exported += 1;
                    log::info!("exported tick {} ({} total)", tick, summary.exported);
                }
                Err(CaptureError::MetadataWrite(msg)) => {
                    log::warn!("skipping tick {}: {}", tick, msg);
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "run finished: {} ticks, {} exported",
            summary.ticks,
            summary.exported
        );
        Ok(summary)
    }
}
