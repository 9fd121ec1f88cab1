use hf_core::{Error, Grid, GridView};
use hf_grad::{Backend, magnitude, rgb_to_luma, sobel};
use log::{debug, warn};

use crate::color::color_features;
use crate::config::HogConfig;
use crate::descriptor::{append_hog_descriptor, descriptor_len};

/// Gradient pair and magnitude of one luminance image.
#[derive(Debug, Clone)]
pub struct GradientField {
    pub hor: Grid<i16>,
    pub vert: Grid<i16>,
    pub magn: Grid<f32>,
}

impl GradientField {
    pub fn compute(luma: &GridView<'_, u8>, backend: Backend) -> Result<Self, Error> {
        let (hor, vert) = sobel(luma, backend);
        let magn = magnitude(&hor.view(), &vert.view(), backend)?;
        Ok(Self { hor, vert, magn })
    }

    pub fn rows(&self) -> usize {
        self.hor.rows()
    }

    pub fn cols(&self) -> usize {
        self.hor.cols()
    }

    /// Descriptor of the window `(row, col, rows, cols)` appended to `out`.
    fn append_window(
        &self,
        window: (usize, usize, usize, usize),
        cfg: &HogConfig,
        out: &mut Vec<f32>,
    ) -> Result<(), Error> {
        let (r, c, rows, cols) = window;
        let hor = self.hor.view().subview(r, c, rows, cols)?;
        let vert = self.vert.view().subview(r, c, rows, cols)?;
        let magn = self.magn.view().subview(r, c, rows, cols)?;
        append_hog_descriptor(&hor, &vert, &magn, cfg.cell_count, cfg.segment_count, out)
    }
}

/// Length of the vector [`extract_features`] returns for `cfg`.
///
/// Fails for a config that [`HogConfig::validate`] rejects.
pub fn feature_len(cfg: &HogConfig) -> Result<usize, Error> {
    cfg.validate()?;

    let overflow = || Error::InvalidConfig("feature length overflows usize");
    let regions = if cfg.quadrants { 5 } else { 1 };
    let mut len = descriptor_len(cfg.cell_count, cfg.segment_count)?
        .checked_mul(regions)
        .ok_or_else(overflow)?;
    if let Some(k) = &cfg.kernel {
        len = len.checked_mul(k.factor()?).ok_or_else(overflow)?;
    }
    if let Some(n) = cfg.color_cells {
        len = n
            .checked_mul(n)
            .and_then(|cells| cells.checked_mul(3))
            .and_then(|colors| len.checked_add(colors))
            .ok_or_else(overflow)?;
    }
    Ok(len)
}

/// Full per-image feature vector.
///
/// Order: whole-image descriptor, then (with `quadrants`) top-left, top-right,
/// bottom-left and bottom-right half-size descriptors, all passed through the
/// kernel map when `kernel` is set, then the mean cell colours when
/// `color_cells` is set.
pub fn extract_features(rgb: &GridView<'_, [u8; 3]>, cfg: &HogConfig) -> Result<Vec<f32>, Error> {
    let len = feature_len(cfg)?;

    if rgb.is_empty() {
        warn!(
            "extract_features: empty {}x{} image, descriptor will be all zeros",
            rgb.rows(),
            rgb.cols()
        );
    }
    debug!(
        "extract_features: {}x{} image, backend {}",
        rgb.rows(),
        rgb.cols(),
        cfg.backend.name()
    );

    let luma = rgb_to_luma(rgb);
    let field = GradientField::compute(&luma.view(), cfg.backend)?;

    let mut out = Vec::with_capacity(len);
    let (rows, cols) = (field.rows(), field.cols());
    field.append_window((0, 0, rows, cols), cfg, &mut out)?;

    if cfg.quadrants {
        let (hr, hc) = (rows / 2, cols / 2);
        for (r, c) in [(0, 0), (0, hc), (hr, 0), (hr, hc)] {
            field.append_window((r, c, hr, hc), cfg, &mut out)?;
        }
    }

    if let Some(k) = &cfg.kernel {
        out = k.expand(&out)?;
    }

    if let Some(n) = cfg.color_cells {
        out.extend(color_features(rgb, n)?);
    }

    debug!("extract_features: {} values", out.len());
    Ok(out)
}
