//! Per-pixel stages of the HOG pipeline: luminance, Sobel gradients and
//! gradient magnitude.
//!
//! Grid conventions follow `hf-core`: `(row, col)` indexing, luminance as `u8`,
//! gradients as `i16`, magnitude as `f32`.
//!
//! Every stage that has a vectorized form takes a [`Backend`]. The scalar
//! backend is the reference; the SIMD backend processes fixed-width lane
//! groups per row and falls back to the scalar routine for the row remainder.
//! Both backends return identical grids, bit for bit: Sobel for every `u8`
//! luminance grid, magnitude for every pair of `i16` gradient grids.

mod kernel;
mod luma;
mod magnitude;
mod sobel;

pub use kernel::{Backend, Kernel3x3};
pub use luma::{luma_of, rgb_to_luma};
pub use magnitude::{MAGNITUDE_LANES, magnitude, magnitude_of};
pub use sobel::{SOBEL_LANES, apply_kernel3x3, sobel};
