use hf_core::Error;
use hf_grad::Backend;
use serde::{Deserialize, Serialize};

use crate::descriptor::MAX_CELL_COUNT;
use crate::hik::KernelExpansion;
use crate::histogram::MAX_SEGMENT_COUNT;

/// Parameters of the per-image feature pipeline.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HogConfig {
    /// Cells per side of the descriptor partition.
    pub cell_count: usize,
    /// Angular bins per cell histogram.
    pub segment_count: usize,
    pub backend: Backend,
    /// Append descriptors of the four half-size quadrants.
    pub quadrants: bool,
    /// Expand the gradient descriptors with the intersection-kernel map.
    pub kernel: Option<KernelExpansion>,
    /// Append mean cell colours over a `n x n` partition.
    pub color_cells: Option<usize>,
}

impl Default for HogConfig {
    fn default() -> Self {
        Self {
            cell_count: 16,
            segment_count: 16,
            backend: Backend::Simd,
            quadrants: false,
            kernel: None,
            color_cells: None,
        }
    }
}

impl HogConfig {
    /// The extended layout: quadrants, kernel expansion with `n = 1, l = 0.5`
    /// and an 8x8 colour grid.
    pub fn extended() -> Self {
        Self {
            quadrants: true,
            kernel: Some(KernelExpansion::default()),
            color_cells: Some(8),
            ..Self::default()
        }
    }

    /// Rejects counts outside `1..=64` and kernels outside
    /// [`KernelExpansion::validate`], which keeps every length product in
    /// range.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_CELL_COUNT).contains(&self.cell_count) {
            return Err(Error::InvalidConfig("cell_count must be in 1..=64"));
        }
        if !(1..=MAX_SEGMENT_COUNT).contains(&self.segment_count) {
            return Err(Error::InvalidConfig("segment_count must be in 1..=64"));
        }
        if let Some(n) = self.color_cells {
            if !(1..=MAX_CELL_COUNT).contains(&n) {
                return Err(Error::InvalidConfig("color_cells must be in 1..=64"));
            }
        }
        if let Some(k) = &self.kernel {
            k.validate()?;
        }
        Ok(())
    }
}
