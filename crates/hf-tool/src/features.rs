use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hf_core::Grid;
use hf_hog::{HogConfig, extract_features};
use log::{debug, info};
use rayon::prelude::*;

use crate::dataset::Sample;

/// Feature vector of one dataset sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFeatures {
    pub path: PathBuf,
    pub label: i32,
    pub values: Vec<f32>,
}

/// Decodes an image file into an RGB grid, one `[r, g, b]` per pixel.
pub fn load_rgb(path: &Path) -> Result<Grid<[u8; 3]>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let data = rgb
        .into_raw()
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect();

    Grid::from_vec(h as usize, w as usize, data)
        .with_context(|| format!("constructing rgb grid from {}", path.display()))
}

pub fn extract_sample(sample: &Sample, cfg: &HogConfig) -> Result<LabeledFeatures> {
    let img = load_rgb(&sample.path)?;
    let values = extract_features(&img.view(), cfg)
        .with_context(|| format!("extracting features of {}", sample.path.display()))?;
    debug!(
        "{}: {}x{} -> {} values",
        sample.path.display(),
        img.rows(),
        img.cols(),
        values.len()
    );
    Ok(LabeledFeatures {
        path: sample.path.clone(),
        label: sample.label,
        values,
    })
}

/// Extracts features for every sample in parallel; the result keeps the
/// order of `samples`. The first failure aborts the batch.
pub fn extract_batch(samples: &[Sample], cfg: &HogConfig) -> Result<Vec<LabeledFeatures>> {
    cfg.validate().context("invalid feature config")?;
    info!(
        "extracting {} samples, backend {}",
        samples.len(),
        cfg.backend.name()
    );
    samples
        .par_iter()
        .map(|sample| extract_sample(sample, cfg))
        .collect()
}

/// Writes features in the sparse `label index:value ...` text format read by
/// liblinear and libsvm. Indices are 1-based; zero values are omitted.
pub fn write_sparse_features<W: Write>(mut writer: W, features: &[LabeledFeatures]) -> Result<()> {
    for f in features {
        write!(writer, "{}", f.label).context("writing label")?;
        for (i, v) in f.values.iter().enumerate() {
            if *v != 0.0 {
                write!(writer, " {}:{}", i + 1, v).context("writing feature")?;
            }
        }
        writeln!(writer).context("writing line end")?;
    }
    writer.flush().context("flushing features")
}
