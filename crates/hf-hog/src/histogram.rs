use std::f64::consts::PI;

use hf_core::{Error, GridView, ensure_same_shape};

/// Largest accepted number of angular bins.
pub const MAX_SEGMENT_COUNT: usize = 64;

/// Angular bin of the gradient `(h, v)` among `segments` bins covering
/// `[-pi, pi)`. An angle of exactly `pi` lands in the last bin.
///
/// `segments` must be non-zero.
#[inline]
pub(crate) fn orientation_bin(h: i16, v: i16, segments: usize) -> usize {
    debug_assert!(segments > 0);
    let angle = (v as f64).atan2(h as f64);
    let bin = (segments as f64 * (angle + PI) / (2.0 * PI)) as usize;
    bin.min(segments.saturating_sub(1))
}

/// Magnitude-weighted orientation histogram over a region, L2-normalized.
///
/// A region without gradient energy yields an all-zero histogram.
pub fn orientation_histogram(
    hor: &GridView<'_, i16>,
    vert: &GridView<'_, i16>,
    magn: &GridView<'_, f32>,
    segments: usize,
) -> Result<Vec<f32>, Error> {
    if !(1..=MAX_SEGMENT_COUNT).contains(&segments) {
        return Err(Error::InvalidConfig("segment count must be in 1..=64"));
    }
    let mut out = vec![0.0f32; segments];
    orientation_histogram_into(hor, vert, magn, &mut out)?;
    Ok(out)
}

/// Same as [`orientation_histogram`], writing into `out` whose length sets the
/// bin count. `out` is overwritten.
pub fn orientation_histogram_into(
    hor: &GridView<'_, i16>,
    vert: &GridView<'_, i16>,
    magn: &GridView<'_, f32>,
    out: &mut [f32],
) -> Result<(), Error> {
    ensure_same_shape(hor.shape(), vert.shape())?;
    ensure_same_shape(hor.shape(), magn.shape())?;

    let segments = out.len();
    out.fill(0.0);
    if segments == 0 {
        return Ok(());
    }

    for r in 0..hor.rows() {
        let rows = hor.row(r).iter().zip(vert.row(r)).zip(magn.row(r));
        for ((&h, &v), &m) in rows {
            out[orientation_bin(h, v, segments)] += m;
        }
    }

    l2_normalize(out);
    Ok(())
}

/// Scales `values` to unit L2 norm; leaves an all-zero slice untouched.
pub fn l2_normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}
