use hf_core::{Error, GridView, ensure_same_shape};
use log::debug;

use crate::histogram::{MAX_SEGMENT_COUNT, orientation_histogram_into};
use crate::partition::CellPartition;

/// Largest accepted number of cells per side.
pub const MAX_CELL_COUNT: usize = 64;

/// Number of values [`hog_descriptor`] returns.
pub fn descriptor_len(cell_count: usize, segments: usize) -> Result<usize, Error> {
    cell_count
        .checked_mul(cell_count)
        .and_then(|cells| cells.checked_mul(segments))
        .ok_or(Error::InvalidConfig("descriptor length overflows usize"))
}

/// Concatenated per-cell orientation histograms over a `cell_count x
/// cell_count` partition of the region, in row-major cell order.
///
/// The output length is always [`descriptor_len`], whatever the region size;
/// empty cells contribute zero histograms. `cell_count` must lie in
/// `1..=MAX_CELL_COUNT` and `segments` in `1..=MAX_SEGMENT_COUNT`.
pub fn hog_descriptor(
    hor: &GridView<'_, i16>,
    vert: &GridView<'_, i16>,
    magn: &GridView<'_, f32>,
    cell_count: usize,
    segments: usize,
) -> Result<Vec<f32>, Error> {
    let mut out = Vec::new();
    append_hog_descriptor(hor, vert, magn, cell_count, segments, &mut out)?;
    Ok(out)
}

/// Appends the descriptor of the region to `out`.
pub fn append_hog_descriptor(
    hor: &GridView<'_, i16>,
    vert: &GridView<'_, i16>,
    magn: &GridView<'_, f32>,
    cell_count: usize,
    segments: usize,
    out: &mut Vec<f32>,
) -> Result<(), Error> {
    if !(1..=MAX_CELL_COUNT).contains(&cell_count) {
        return Err(Error::InvalidConfig("cell count must be in 1..=64"));
    }
    if !(1..=MAX_SEGMENT_COUNT).contains(&segments) {
        return Err(Error::InvalidConfig("segment count must be in 1..=64"));
    }
    ensure_same_shape(hor.shape(), vert.shape())?;
    ensure_same_shape(hor.shape(), magn.shape())?;

    debug!(
        "hog_descriptor: region {}x{}, {cell_count}x{cell_count} cells, {segments} bins",
        hor.rows(),
        hor.cols()
    );

    let row_cells = CellPartition::new(hor.rows(), cell_count);
    let col_cells = CellPartition::new(hor.cols(), cell_count);

    let base = out.len();
    out.resize(base + descriptor_len(cell_count, segments)?, 0.0);

    let cells = row_cells.iter().flat_map(|(r0, rows)| {
        col_cells
            .iter()
            .map(move |(c0, cols)| (r0, rows, c0, cols))
    });
    for ((r0, rows, c0, cols), bins) in cells.zip(out[base..].chunks_exact_mut(segments)) {
        let h = hor.subview(r0, c0, rows, cols)?;
        let v = vert.subview(r0, c0, rows, cols)?;
        let m = magn.subview(r0, c0, rows, cols)?;
        orientation_histogram_into(&h, &v, &m, bins)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use hf_core::Grid;
    use hf_grad::{Backend, magnitude, sobel};

    use hf_core::Error;

    use super::{MAX_CELL_COUNT, descriptor_len, hog_descriptor};

    fn checker(rows: usize, cols: usize, block: usize) -> Grid<u8> {
        let data = (0..rows * cols)
            .map(|i| {
                let (r, c) = (i / cols, i % cols);
                if (r / block + c / block) % 2 == 0 { 30 } else { 220 }
            })
            .collect();
        Grid::from_vec(rows, cols, data).expect("valid grid")
    }

    #[test]
    fn length_is_fixed_for_any_region() {
        for (rows, cols) in [(0, 0), (1, 1), (5, 9), (16, 16), (33, 70)] {
            let img = checker(rows, cols, 3);
            let (hor, vert) = sobel(&img.view(), Backend::Scalar);
            let magn = magnitude(&hor.view(), &vert.view(), Backend::Scalar).expect("shapes");

            let desc = hog_descriptor(&hor.view(), &vert.view(), &magn.view(), 16, 16)
                .expect("valid descriptor");
            assert_eq!(desc.len(), 4096, "length for {rows}x{cols}");
        }
        assert_eq!(descriptor_len(4, 8), Ok(128));
        assert!(matches!(
            descriptor_len(usize::MAX, 2),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn each_cell_is_unit_norm_or_zero() {
        let img = checker(40, 52, 4);
        let (hor, vert) = sobel(&img.view(), Backend::Simd);
        let magn = magnitude(&hor.view(), &vert.view(), Backend::Simd).expect("shapes");
        let desc = hog_descriptor(&hor.view(), &vert.view(), &magn.view(), 4, 16).expect("desc");

        for cell in desc.chunks_exact(16) {
            let n = cell.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!(n == 0.0 || (n - 1.0).abs() < 1e-5, "cell norm {n}");
        }
    }

    #[test]
    fn cells_follow_row_major_order() {
        // Gradient energy stays inside the bottom-right cell.
        let mut data = vec![0u8; 8 * 8];
        for r in 5..8 {
            for c in 6..8 {
                data[r * 8 + c] = 200;
            }
        }
        let img = Grid::from_vec(8, 8, data).expect("valid grid");
        let (hor, vert) = sobel(&img.view(), Backend::Scalar);
        let magn = magnitude(&hor.view(), &vert.view(), Backend::Scalar).expect("shapes");
        let desc = hog_descriptor(&hor.view(), &vert.view(), &magn.view(), 2, 16).expect("desc");

        let energy = |cell: usize| desc[cell * 16..(cell + 1) * 16].iter().sum::<f32>();
        assert_eq!(energy(0), 0.0);
        assert_eq!(energy(1), 0.0);
        assert_eq!(energy(2), 0.0);
        assert!(energy(3) > 0.0);
    }

    #[test]
    fn backends_give_identical_descriptors() {
        let img = checker(37, 51, 5);
        let (hs, vs) = sobel(&img.view(), Backend::Scalar);
        let ms = magnitude(&hs.view(), &vs.view(), Backend::Scalar).expect("shapes");
        let (hv, vv) = sobel(&img.view(), Backend::Simd);
        let mv = magnitude(&hv.view(), &vv.view(), Backend::Simd).expect("shapes");

        let a = hog_descriptor(&hs.view(), &vs.view(), &ms.view(), 16, 16).expect("desc");
        let b = hog_descriptor(&hv.view(), &vv.view(), &mv.view(), 16, 16).expect("desc");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let g = Grid::new_fill(4, 4, 0i16);
        let m = Grid::new_fill(4, 4, 0.0f32);
        assert!(hog_descriptor(&g.view(), &g.view(), &m.view(), 0, 16).is_err());
        assert!(hog_descriptor(&g.view(), &g.view(), &m.view(), 4, 0).is_err());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let g = Grid::new_fill(4, 4, 0i16);
        let m = Grid::new_fill(4, 4, 0.0f32);
        for (cells, segments) in [(MAX_CELL_COUNT + 1, 16), (4, 65), (usize::MAX, usize::MAX)] {
            assert!(matches!(
                hog_descriptor(&g.view(), &g.view(), &m.view(), cells, segments),
                Err(Error::InvalidConfig(_))
            ));
        }
        let desc = hog_descriptor(&g.view(), &g.view(), &m.view(), MAX_CELL_COUNT, 64)
            .expect("largest accepted layout");
        assert_eq!(desc.len(), MAX_CELL_COUNT * MAX_CELL_COUNT * 64);
    }
}
