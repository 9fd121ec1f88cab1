//! 3x3 gradient convolution over edge-replicated luminance.
//!
//! The source is extended by one pixel on every side before convolution, so
//! every output cell, edges included, sees a full 3x3 neighbourhood.
//!
//! The SIMD path keeps sixteen `i16` lanes per step. Lane loads read the
//! extended rows at `[x, x + LANES + 2)`, which stays inside the extended row
//! while `x + LANES <= cols`; the remaining columns go through the scalar cell
//! routine. Sobel responses of 8-bit input stay within
//! `[-1020, 1020]`, so lane arithmetic never wraps and both paths agree exactly.

use hf_core::{Grid, GridView, extend_border};
use log::debug;
use wide::i16x16;

use crate::kernel::{Backend, Kernel3x3};

pub const SOBEL_LANES: usize = 16;

/// Applies one kernel to `src` and returns a grid of the same shape.
pub fn apply_kernel3x3(src: &GridView<'_, u8>, kernel: Kernel3x3, backend: Backend) -> Grid<i16> {
    let ext = extend_border(src, 1);
    apply_extended(&ext, src.rows(), src.cols(), kernel, backend)
}

/// Horizontal and vertical Sobel gradients of `src`.
pub fn sobel(src: &GridView<'_, u8>, backend: Backend) -> (Grid<i16>, Grid<i16>) {
    debug!(
        "sobel: {}x{} backend={}",
        src.rows(),
        src.cols(),
        backend.name()
    );

    let ext = extend_border(src, 1);
    let hor = apply_extended(&ext, src.rows(), src.cols(), Kernel3x3::SobelX, backend);
    let vert = apply_extended(&ext, src.rows(), src.cols(), Kernel3x3::SobelY, backend);
    (hor, vert)
}

fn apply_extended(
    ext: &Grid<u8>,
    rows: usize,
    cols: usize,
    kernel: Kernel3x3,
    backend: Backend,
) -> Grid<i16> {
    let mut out = Grid::new_fill(rows, cols, 0i16);
    if rows == 0 || cols == 0 {
        return out;
    }

    let k = kernel.coefficients();
    for r in 0..rows {
        let taps = [ext.row(r), ext.row(r + 1), ext.row(r + 2)];
        let out_row = out.row_mut(r);
        match backend {
            Backend::Scalar => convolve_row_scalar(&taps, &k, out_row, 0),
            Backend::Simd => convolve_row_simd(&taps, &k, out_row),
        }
    }

    out
}

/// Writes `out[c]` for every `c >= start`.
fn convolve_row_scalar(taps: &[&[u8]; 3], k: &[[i16; 3]; 3], out: &mut [i16], start: usize) {
    for (c, out_c) in out.iter_mut().enumerate().skip(start) {
        let mut acc = 0i32;
        for (tap, k_row) in taps.iter().zip(k) {
            for (dc, &w) in k_row.iter().enumerate() {
                acc += w as i32 * tap[c + dc] as i32;
            }
        }
        *out_c = acc as i16;
    }
}

fn convolve_row_simd(taps: &[&[u8]; 3], k: &[[i16; 3]; 3], out: &mut [i16]) {
    let cols = out.len();
    let mut x = 0usize;

    while x + SOBEL_LANES <= cols {
        let mut acc = i16x16::splat(0);
        for (tap, k_row) in taps.iter().zip(k) {
            for (dc, &w) in k_row.iter().enumerate() {
                if w == 0 {
                    continue;
                }
                let lanes = load_u8_lanes(&tap[x + dc..x + dc + SOBEL_LANES]);
                acc = accumulate(acc, lanes, w);
            }
        }
        out[x..x + SOBEL_LANES].copy_from_slice(&acc.to_array());
        x += SOBEL_LANES;
    }

    convolve_row_scalar(taps, k, out, x);
}

#[inline]
fn load_u8_lanes(src: &[u8]) -> i16x16 {
    let mut lanes = [0i16; SOBEL_LANES];
    for (lane, &v) in lanes.iter_mut().zip(src) {
        *lane = v as i16;
    }
    i16x16::new(lanes)
}

#[inline]
fn accumulate(acc: i16x16, lanes: i16x16, w: i16) -> i16x16 {
    match w {
        1 => acc + lanes,
        -1 => acc - lanes,
        2 => acc + lanes + lanes,
        -2 => acc - lanes - lanes,
        _ => acc + lanes * i16x16::splat(w),
    }
}
