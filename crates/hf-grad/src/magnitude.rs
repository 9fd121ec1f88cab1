//! Gradient magnitude `sqrt(hor^2 + vert^2)`.
//!
//! Exactness contract between backends: for any `i16` inputs,
//! `hor^2 + vert^2 <= 2 * 32768^2 = 2^31`, so the sum is exact in `f64`.
//! Both paths take the correctly rounded `f64` square root of that exact sum
//! and round it to `f32`; the SIMD path does so four lanes at a time. The two
//! grids are therefore bit-identical over the whole `i16` domain.

use hf_core::{Error, Grid, GridView, ensure_same_shape};
use log::debug;
use wide::f64x4;

use crate::kernel::Backend;

pub const MAGNITUDE_LANES: usize = 4;

pub fn magnitude(
    hor: &GridView<'_, i16>,
    vert: &GridView<'_, i16>,
    backend: Backend,
) -> Result<Grid<f32>, Error> {
    ensure_same_shape(hor.shape(), vert.shape())?;
    debug!(
        "magnitude: {}x{} backend={}",
        hor.rows(),
        hor.cols(),
        backend.name()
    );

    let mut out = Grid::new_fill(hor.rows(), hor.cols(), 0.0f32);
    for r in 0..hor.rows() {
        let (h, v) = (hor.row(r), vert.row(r));
        let out_row = out.row_mut(r);
        match backend {
            Backend::Scalar => magnitude_row_scalar(h, v, out_row, 0),
            Backend::Simd => magnitude_row_simd(h, v, out_row),
        }
    }

    Ok(out)
}

#[inline]
pub fn magnitude_of(h: i16, v: i16) -> f32 {
    let (h, v) = (h as f64, v as f64);
    (h * h + v * v).sqrt() as f32
}

fn magnitude_row_scalar(hor: &[i16], vert: &[i16], out: &mut [f32], start: usize) {
    for ((o, &h), &v) in out.iter_mut().zip(hor).zip(vert).skip(start) {
        *o = magnitude_of(h, v);
    }
}

fn magnitude_row_simd(hor: &[i16], vert: &[i16], out: &mut [f32]) {
    let cols = out.len();
    let mut x = 0usize;

    while x + MAGNITUDE_LANES <= cols {
        let h = widen(&hor[x..x + MAGNITUDE_LANES]);
        let v = widen(&vert[x..x + MAGNITUDE_LANES]);
        let m = (h * h + v * v).sqrt().to_array();
        for (o, &m) in out[x..x + MAGNITUDE_LANES].iter_mut().zip(&m) {
            *o = m as f32;
        }
        x += MAGNITUDE_LANES;
    }

    magnitude_row_scalar(hor, vert, out, x);
}

#[inline]
fn widen(src: &[i16]) -> f64x4 {
    let mut lanes = [0.0f64; MAGNITUDE_LANES];
    for (lane, &v) in lanes.iter_mut().zip(src) {
        *lane = v as f64;
    }
    f64x4::from(lanes)
}

#[cfg(test)]
mod tests {
    use hf_core::{Error, Grid};

    use super::{MAGNITUDE_LANES, magnitude, magnitude_of};
    use crate::kernel::Backend;

    fn ramp(rows: usize, cols: usize, scale: i32, offset: i32) -> Grid<i16> {
        let data = (0..rows * cols)
            .map(|i| (((i as i32 * scale + offset) % 2041) - 1020) as i16)
            .collect();
        Grid::from_vec(rows, cols, data).expect("valid grid")
    }

    #[test]
    fn pythagorean_triples_are_exact() {
        assert_eq!(magnitude_of(3, 4), 5.0);
        assert_eq!(magnitude_of(-5, 12), 13.0);
        assert_eq!(magnitude_of(0, 0), 0.0);
        assert_eq!(magnitude_of(1020, 0), 1020.0);
    }

    #[test]
    fn backends_are_bit_identical() {
        for (rows, cols) in [(3, MAGNITUDE_LANES), (4, 2 * MAGNITUDE_LANES + 3), (2, 5)] {
            let hor = ramp(rows, cols, 37, 11);
            let vert = ramp(rows, cols, 53, 499);
            let scalar = magnitude(&hor.view(), &vert.view(), Backend::Scalar).expect("shapes");
            let simd = magnitude(&hor.view(), &vert.view(), Backend::Simd).expect("shapes");

            let sb: Vec<u32> = scalar.to_vec().iter().map(|v| v.to_bits()).collect();
            let vb: Vec<u32> = simd.to_vec().iter().map(|v| v.to_bits()).collect();
            assert_eq!(sb, vb, "bit mismatch for {rows}x{cols}");
        }
    }

    #[test]
    fn full_gradient_range_is_bit_identical() {
        let values: Vec<i16> = (-1020..=1020).step_by(7).collect();
        let n = values.len();
        let hor = Grid::from_vec(1, n, values.clone()).expect("valid grid");
        let vert_data: Vec<i16> = values.iter().rev().copied().collect();
        let vert = Grid::from_vec(1, n, vert_data).expect("valid grid");

        let scalar = magnitude(&hor.view(), &vert.view(), Backend::Scalar).expect("shapes");
        let simd = magnitude(&hor.view(), &vert.view(), Backend::Simd).expect("shapes");
        for (a, b) in scalar.to_vec().iter().zip(simd.to_vec().iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn whole_i16_range_is_bit_identical() {
        let mut values: Vec<i16> = (1020..=i16::MAX).step_by(3).collect();
        values.extend((i16::MIN..-1020).step_by(5));
        values.extend([i16::MIN, i16::MAX, -1, 0, 1]);
        let n = values.len();
        let hor = Grid::from_vec(1, n, values.clone()).expect("valid grid");
        let vert_data: Vec<i16> = values.iter().rev().copied().collect();
        let vert = Grid::from_vec(1, n, vert_data).expect("valid grid");

        let scalar = magnitude(&hor.view(), &vert.view(), Backend::Scalar).expect("shapes");
        let simd = magnitude(&hor.view(), &vert.view(), Backend::Simd).expect("shapes");
        let mismatches = scalar
            .to_vec()
            .iter()
            .zip(simd.to_vec())
            .filter(|(a, b)| a.to_bits() != b.to_bits())
            .count();
        assert_eq!(mismatches, 0, "of {n} values");
        assert_eq!(magnitude_of(i16::MIN, i16::MIN), (2.0f64.powi(31)).sqrt() as f32);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let hor = Grid::new_fill(2, 3, 0i16);
        let vert = Grid::new_fill(3, 2, 0i16);
        let err = magnitude(&hor.view(), &vert.view(), Backend::Simd).expect_err("mismatch");
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: (2, 3),
                actual: (3, 2)
            }
        );
    }
}
