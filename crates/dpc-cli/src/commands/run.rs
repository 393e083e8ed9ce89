use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use dpc_core::config::RunConfig;
use dpc_core::io::file_source::FileFrameSource;
use dpc_core::io::{FrameSource, LoadError};
use dpc_core::orchestrator;
use dpc_core::results::ResultSnapshot;
use ndarray::Array2;

use crate::summary;

#[derive(Args)]
pub struct RunArgs {
    /// Run configuration (TOML, see `dpc config`)
    pub config: PathBuf,

    /// Directory containing per-frame image files
    #[arg(long)]
    pub data_directory: PathBuf,

    /// Filename prefix before the zero-padded frame number
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// File extension, without the dot
    #[arg(long, default_value = "tif")]
    pub extension: String,

    /// Zero-padding width of the frame number in the filename
    #[arg(long, default_value_t = 5)]
    pub width: usize,

    /// Linear scan index corresponding to grid cell (0, 0)
    #[arg(long, default_value_t = 1)]
    pub first_image: usize,

    /// Linear index of the designated reference frame
    #[arg(long)]
    pub reference_frame_number: usize,

    /// Poll for files that have not yet appeared instead of failing immediately
    #[arg(long)]
    pub hang: bool,

    /// Abandon a poll-for-file wait after this many seconds
    #[arg(long)]
    pub poll_timeout_secs: Option<u64>,

    /// Print partial progress as frames complete, instead of only at the end
    #[arg(long)]
    pub live: bool,
}

/// Wraps a `FrameSource` to count `load_cell` calls, purely to drive the
/// CLI's progress bar — independent of the orchestrator's own live-update
/// snapshots, which don't carry a completion count.
struct CountingSource<S> {
    inner: S,
    loaded: AtomicUsize,
}

impl<S: FrameSource> FrameSource for CountingSource<S> {
    fn load_cell(&self, row: usize, col: usize) -> std::result::Result<Array2<u32>, LoadError> {
        let result = self.inner.load_cell(row, col);
        self.loaded.fetch_add(1, Ordering::Relaxed);
        result
    }

    fn load_reference(&self) -> std::result::Result<Array2<u32>, LoadError> {
        self.inner.load_reference()
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config {}", args.config.display()))?;
    let config: RunConfig = toml::from_str(&contents).context("invalid run configuration")?;

    let file_source = FileFrameSource {
        directory: args.data_directory.clone(),
        prefix: args.prefix.clone(),
        extension: args.extension.clone(),
        width: args.width,
        first_image: args.first_image,
        cols: config.cols,
        reference_frame_number: args.reference_frame_number,
        hang: args.hang,
        poll_timeout: args.poll_timeout_secs.map(Duration::from_secs),
    };
    let counted = Arc::new(CountingSource { inner: file_source, loaded: AtomicUsize::new(0) });
    let source: Arc<dyn FrameSource> = counted.clone();

    summary::print_run_header(&config);

    let pb = ProgressBar::new((config.rows * config.cols) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("reconstructing");

    let cancel = AtomicBool::new(false);
    let outcome = if args.live {
        let mut tick = |_: &ResultSnapshot| {
            pb.set_position(counted.loaded.load(Ordering::Relaxed) as u64);
        };
        orchestrator::run(&config, source, &cancel, Some(&mut tick))?
    } else {
        let result = orchestrator::run(&config, source, &cancel, None)?;
        pb.set_position(counted.loaded.load(Ordering::Relaxed) as u64);
        result
    };
    pb.finish_with_message("done");

    summary::print_run_summary(&outcome);

    Ok(())
}
