//! depthcap - capture frame bundles and export them to disk
//!
//! Pulls synchronized color + depth bundles, discards 30 warm-up frames
//! so auto-exposure settles, then exports every skip-interval-th bundle
//! until the optional cap is reached.

use anyhow::Result;
use clap::Parser;

use depthcap::{
    CaptureScheduler, DiskExporter, FrameSource, NearestAligner, ScheduleConfig, StreamRequest,
    SyntheticSource,
};

/// Bundles discarded before the export loop starts.
const WARMUP_FRAMES: u32 = 30;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Target output frame rate (1..=30).
    rate: u32,
    /// Output directory path; the naming scheme expects a trailing
    /// separator.
    out_dir: String,
    /// Maximum number of exports; 0 means unbounded.
    #[arg(default_value_t = 0)]
    max_count: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ScheduleConfig::new(args.rate, args.max_count)?;

    let mut source = SyntheticSource::new();
    source.start(&StreamRequest::default_pair())?;
    log::info!("depth scale: {}", source.depth_scale());

    let exporter = DiskExporter::new(args.out_dir);
    let mut scheduler = CaptureScheduler::new(config, source, NearestAligner, exporter);

    scheduler.warm_up(WARMUP_FRAMES)?;
    let summary = scheduler.run()?;
    log::info!(
        "done: {} ticks pulled, {} bundles exported",
        summary.ticks,
        summary.exported
    );
    Ok(())
}
