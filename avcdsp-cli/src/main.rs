#![forbid(unsafe_code)]

mod raw;
mod y4m;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use avcdsp::{Plane, Qp, forward_transform_plane, gbim, interpolate, inverse_transform_plane};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_QP: &str = "28";

/// Batch driver for the H.264 integer transform and quarter-pel interpolation
/// kernels over raw planar files.
#[derive(Parser, Debug)]
#[command(name = "avcdsp")]
#[command(version)]
#[command(long_about = "Runs the bit-exact H.264/AVC DSP kernels over raw planar files.\n\n\
    EXAMPLES:\n    \
    avcdsp forward -i luma.yuv -o luma.coef --width 352 --height 288 --qp 28\n    \
    avcdsp inverse -i luma.coef -o luma.res --width 352 --height 288 --qp 28\n    \
    avcdsp qpel -i clip.y4m -o clip.qpel\n    \
    avcdsp gbim -i decoded.y4m --block-size 8")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Worker threads (defaults to one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forward transform and quantize 8-bit samples into i32 LE coefficients
    Forward(TransformArgs),
    /// Rescale and inverse transform i32 LE coefficients into i32 LE residuals
    Inverse(TransformArgs),
    /// Build the padded quarter-sample luma plane as 8-bit samples
    Qpel(PlaneArgs),
    /// Report the GBIM blockiness of every 8-bit luma frame
    Gbim(GbimArgs),
}

#[derive(Args, Debug)]
struct PlaneArgs {
    /// Input file (raw planar, or .y4m for sample input)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Plane width in samples (taken from the header for .y4m input)
    #[arg(long)]
    width: Option<usize>,

    /// Plane height in samples (taken from the header for .y4m input)
    #[arg(long)]
    height: Option<usize>,
}

#[derive(Args, Debug)]
struct GbimArgs {
    /// Input file (raw planar, or .y4m)
    #[arg(short, long)]
    input: PathBuf,

    /// Report file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plane width in samples (taken from the header for .y4m input)
    #[arg(long)]
    width: Option<usize>,

    /// Plane height in samples (taken from the header for .y4m input)
    #[arg(long)]
    height: Option<usize>,

    /// Side of the square block grid the metric looks at
    #[arg(short, long, default_value_t = 8)]
    block_size: usize,
}

#[derive(Args, Debug)]
struct TransformArgs {
    #[command(flatten)]
    plane: PlaneArgs,

    /// Quantization parameter (0-51)
    #[arg(short, long, default_value = DEFAULT_QP, value_parser = parse_qp)]
    qp: Qp,
}

fn parse_qp(s: &str) -> Result<Qp, String> {
    let value: i32 = s.parse().map_err(|_| format!("invalid QP: {s}"))?;
    Qp::new(value).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Forward(Qp),
    Inverse(Qp),
    Qpel,
    Gbim { block_size: usize },
}

/// Everything a single run needs, resolved from the command line.
#[derive(Debug, Clone)]
struct JobConfig {
    operation: Operation,
    input: PathBuf,
    /// `None` writes to stdout.
    output: Option<PathBuf>,
    width: Option<usize>,
    height: Option<usize>,
}

impl JobConfig {
    fn from_plane_args(operation: Operation, plane: PlaneArgs) -> Self {
        Self {
            operation,
            input: plane.input,
            output: Some(plane.output),
            width: plane.width,
            height: plane.height,
        }
    }
}

impl From<Command> for JobConfig {
    fn from(command: Command) -> Self {
        match command {
            Command::Forward(args) => Self::from_plane_args(Operation::Forward(args.qp), args.plane),
            Command::Inverse(args) => Self::from_plane_args(Operation::Inverse(args.qp), args.plane),
            Command::Qpel(plane) => Self::from_plane_args(Operation::Qpel, plane),
            Command::Gbim(args) => Self {
                operation: Operation::Gbim {
                    block_size: args.block_size,
                },
                input: args.input,
                output: args.output,
                width: args.width,
                height: args.height,
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_y4m(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("y4m"))
}

fn dimensions(config: &JobConfig) -> Result<(usize, usize)> {
    match (config.width, config.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => bail!("--width and --height are required for raw input"),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn read_samples(config: &JobConfig) -> Result<Vec<Plane<u8>>> {
    let data = read_input(&config.input)?;
    if is_y4m(&config.input) {
        let planes = y4m::luma_planes(&data)
            .with_context(|| format!("parsing {}", config.input.display()))?;
        let header = (planes[0].width(), planes[0].height());
        if config.width.zip(config.height).is_some_and(|dims| dims != header) {
            warn!(
                width = header.0,
                height = header.1,
                "ignoring --width/--height in favour of the Y4M header"
            );
        }
        return Ok(planes);
    }
    let (width, height) = dimensions(config)?;
    raw::split_u8_planes(&data, width, height)
}

fn run(config: &JobConfig) -> Result<()> {
    let mut output = Vec::new();
    let frames = match config.operation {
        Operation::Forward(qp) => {
            let planes = read_samples(config)?;
            let coeffs = planes
                .par_iter()
                .map(|p| forward_transform_plane(&p.to_i32(), qp))
                .collect::<avcdsp::Result<Vec<_>>>()?;
            for plane in &coeffs {
                raw::write_i32_plane(&mut output, plane);
            }
            coeffs.len()
        }
        Operation::Inverse(qp) => {
            let (width, height) = dimensions(config)?;
            let data = read_input(&config.input)?;
            let planes = raw::split_i32_planes(&data, width, height)?;
            let residuals = planes
                .par_iter()
                .map(|p| inverse_transform_plane(p, qp))
                .collect::<avcdsp::Result<Vec<_>>>()?;
            for plane in &residuals {
                raw::write_i32_plane(&mut output, plane);
            }
            residuals.len()
        }
        Operation::Qpel => {
            let planes = read_samples(config)?;
            let upsampled: Vec<_> = planes.par_iter().map(interpolate).collect();
            if let Some(first) = upsampled.first() {
                info!(
                    width = first.width(),
                    height = first.height(),
                    "padded quarter-sample plane size"
                );
            }
            for plane in &upsampled {
                raw::write_u8_plane(&mut output, plane.as_plane());
            }
            upsampled.len()
        }
        Operation::Gbim { block_size } => {
            let planes = read_samples(config)?;
            let scores = planes
                .par_iter()
                .map(|p| gbim(p, block_size))
                .collect::<avcdsp::Result<Vec<_>>>()?;
            output.extend_from_slice(b"frame\thorizontal\tvertical\tgbim\n");
            for (frame, s) in scores.iter().enumerate() {
                output.extend_from_slice(
                    format!("{frame}\t{:.6}\t{:.6}\t{:.6}\n", s.horizontal, s.vertical, s.score)
                        .as_bytes(),
                );
            }
            scores.len()
        }
    };

    match &config.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("writing {}", path.display()))?;
            info!(frames, bytes = output.len(), output = %path.display(), "done");
        }
        None => {
            io::stdout()
                .lock()
                .write_all(&output)
                .context("writing to stdout")?;
            debug!(frames, "done");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads.unwrap_or(0))
        .build()
        .context("building thread pool")?;

    let config = JobConfig::from(cli.command);
    debug!(?config, "starting job");
    pool.install(|| run(&config))
}
