use hf_core::{Error, GridView};

use crate::descriptor::MAX_CELL_COUNT;
use crate::partition::CellPartition;

/// Mean colour of each cell of a `cell_count x cell_count` partition, as
/// `(r, g, b)` triples scaled to `[0, 1]`, in row-major cell order.
///
/// Empty cells contribute `(0, 0, 0)`. The output length is always
/// `3 * cell_count²`; `cell_count` must lie in `1..=MAX_CELL_COUNT`.
pub fn color_features(view: &GridView<'_, [u8; 3]>, cell_count: usize) -> Result<Vec<f32>, Error> {
    if !(1..=MAX_CELL_COUNT).contains(&cell_count) {
        return Err(Error::InvalidConfig("color cell count must be in 1..=64"));
    }
    let mut out = Vec::with_capacity(3 * cell_count * cell_count);

    let row_cells = CellPartition::new(view.rows(), cell_count);
    let col_cells = CellPartition::new(view.cols(), cell_count);

    for (r0, rows) in row_cells.iter() {
        for (c0, cols) in col_cells.iter() {
            let area = (rows * cols) as u64;
            if area == 0 {
                out.extend_from_slice(&[0.0; 3]);
                continue;
            }

            let mut sums = [0u64; 3];
            for r in r0..r0 + rows {
                for px in &view.row(r)[c0..c0 + cols] {
                    for (s, &ch) in sums.iter_mut().zip(px) {
                        *s += ch as u64;
                    }
                }
            }
            out.extend(sums.map(|s| (s as f64 / area as f64 / 255.0) as f32));
        }
    }
    Ok(out)
}
