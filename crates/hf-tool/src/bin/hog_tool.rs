use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use hf_grad::{Backend, rgb_to_luma};
use hf_hog::{GradientField, HogConfig, KernelExpansion, extract_features};
use hf_tool::{extract_batch, load_file_list, load_rgb, write_sparse_features};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "hog_tool")]
#[command(about = "Extract HOG feature vectors from images and datasets")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract features for a dataset list into a sparse feature file.
    #[command(name = "extract")]
    Extract(ExtractArgs),
    /// Extract features of a single image as JSON.
    #[command(name = "describe")]
    Describe(DescribeArgs),
    /// Check that the scalar and SIMD backends agree on an image.
    #[command(name = "compare")]
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// JSON file with `HogConfig` fields; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use the scalar backend instead of SIMD.
    #[arg(long)]
    scalar: bool,
}

#[derive(Args, Debug, Clone)]
struct ExtractArgs {
    #[arg(short = 'd', long = "data-set", required = true)]
    data_set: PathBuf,
    #[arg(short, long, required = true)]
    out: PathBuf,
    #[command(flatten)]
    settings: ConfigArgs,
    /// Append descriptors of the four image quadrants.
    #[arg(long)]
    quadrants: bool,
    /// Expand descriptors with the intersection-kernel map.
    #[arg(long)]
    kernel: bool,
    /// Append mean colours over an `n x n` cell grid.
    #[arg(long, value_name = "N")]
    colors: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct DescribeArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    settings: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct CompareArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct DescriptorDto {
    rows: usize,
    cols: usize,
    len: usize,
    backend: &'static str,
    values: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct CompareReport {
    rows: usize,
    cols: usize,
    gradients_identical: bool,
    magnitude_identical: bool,
    max_feature_diff: f32,
    scalar_ms: f64,
    simd_ms: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Extract(args) => run_extract(args),
        Command::Describe(args) => run_describe(args),
        Command::Compare(args) => run_compare(args),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    ensure_file_exists(&args.data_set, "dataset list")?;
    let mut cfg = resolve_config(&args.settings)?;
    if args.quadrants {
        cfg.quadrants = true;
    }
    if args.kernel && cfg.kernel.is_none() {
        cfg.kernel = Some(KernelExpansion::default());
    }
    if let Some(n) = args.colors {
        cfg.color_cells = Some(n);
    }

    let samples = load_file_list(&args.data_set)?;
    if samples.is_empty() {
        bail!("dataset list {} has no entries", args.data_set.display());
    }

    let start = Instant::now();
    let features = extract_batch(&samples, &cfg)?;
    info!(
        "extracted {} feature vectors in {:.1} ms",
        features.len(),
        start.elapsed().as_secs_f64() * 1e3
    );

    let file = fs::File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_sparse_features(BufWriter::new(file), &features)
        .with_context(|| format!("writing features {}", args.out.display()))
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let cfg = resolve_config(&args.settings)?;
    let img = load_rgb(&args.input)?;
    let values = extract_features(&img.view(), &cfg)
        .with_context(|| format!("extracting features of {}", args.input.display()))?;

    let dto = DescriptorDto {
        rows: img.rows(),
        cols: img.cols(),
        len: values.len(),
        backend: cfg.backend.name(),
        values,
    };
    match args.out {
        Some(path) => write_json(path, &dto),
        None => {
            println!("{}", serde_json::to_string_pretty(&dto).context("serializing json")?);
            Ok(())
        }
    }
}

fn run_compare(args: CompareArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let base = match &args.config {
        Some(path) => read_json::<HogConfig>(path)?,
        None => HogConfig::default(),
    };
    let img = load_rgb(&args.input)?;
    let luma = rgb_to_luma(&img.view());

    let scalar = GradientField::compute(&luma.view(), Backend::Scalar)?;
    let simd = GradientField::compute(&luma.view(), Backend::Simd)?;

    let mut timings = [0.0f64; 2];
    let mut outputs = Vec::with_capacity(2);
    for (slot, backend) in timings.iter_mut().zip([Backend::Scalar, Backend::Simd]) {
        let cfg = HogConfig { backend, ..base };
        let start = Instant::now();
        outputs.push(extract_features(&img.view(), &cfg)?);
        *slot = start.elapsed().as_secs_f64() * 1e3;
    }
    let max_feature_diff = outputs[0]
        .iter()
        .zip(&outputs[1])
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);

    let report = CompareReport {
        rows: img.rows(),
        cols: img.cols(),
        gradients_identical: scalar.hor.to_vec() == simd.hor.to_vec()
            && scalar.vert.to_vec() == simd.vert.to_vec(),
        magnitude_identical: scalar
            .magn
            .to_vec()
            .iter()
            .zip(simd.magn.to_vec())
            .all(|(a, b)| a.to_bits() == b.to_bits()),
        max_feature_diff,
        scalar_ms: timings[0],
        simd_ms: timings[1],
    };
    println!("{}", serde_json::to_string_pretty(&report).context("serializing json")?);

    if !(report.gradients_identical && report.magnitude_identical) {
        bail!("scalar and SIMD backends disagree on {}", args.input.display());
    }
    Ok(())
}

fn resolve_config(args: &ConfigArgs) -> Result<HogConfig> {
    let mut cfg = match &args.config {
        Some(path) => read_json::<HogConfig>(path)?,
        None => HogConfig::default(),
    };
    if args.scalar {
        cfg.backend = Backend::Scalar;
    }
    cfg.validate().context("invalid feature config")?;
    Ok(cfg)
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
