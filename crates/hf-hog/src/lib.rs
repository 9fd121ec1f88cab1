//! Histogram-of-oriented-gradients descriptors.
//!
//! A descriptor partitions a region into `cell_count x cell_count` cells and
//! concatenates one L2-normalized, magnitude-weighted orientation histogram
//! per cell in row-major order. Its length does not depend on the region
//! size: cells that end up empty contribute zero histograms.
//!
//! Cell partition policy:
//! - Every cell but the last along an axis spans `extent / cell_count`.
//! - The last cell absorbs the remainder, so cells tile the region exactly.
//!
//! Cell and segment counts are bounded by [`MAX_CELL_COUNT`] and
//! [`MAX_SEGMENT_COUNT`], the kernel order by [`MAX_KERNEL_ORDER`]. Out of
//! range values are reported as `Error::InvalidConfig`.
//!
//! [`extract_features`] runs the full per-image pipeline configured by
//! [`HogConfig`]: luminance, Sobel gradients, magnitude, descriptor, and the
//! optional quadrant descriptors, intersection-kernel map and colour cells.

mod color;
mod config;
mod descriptor;
mod hik;
mod histogram;
mod partition;
mod pipeline;

pub use color::color_features;
pub use config::HogConfig;
pub use descriptor::{MAX_CELL_COUNT, append_hog_descriptor, descriptor_len, hog_descriptor};
pub use hik::{KernelExpansion, MAX_KERNEL_ORDER, hik_expand};
pub use histogram::{MAX_SEGMENT_COUNT, l2_normalize, orientation_histogram, orientation_histogram_into};
pub use partition::{CellPartition, cell_span};
pub use pipeline::{GradientField, extract_features, feature_len};
