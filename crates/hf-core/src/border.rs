use crate::{Grid, GridView};

/// Maps a possibly out-of-range index onto `0..len` by repeating the nearest
/// edge element. Returns `None` for an empty range.
#[inline]
pub fn replicate_index(i: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i < 0 {
        Some(0)
    } else {
        Some((i as usize).min(len - 1))
    }
}

/// Copies `src` into a new grid grown by `radius` on every side, border cells
/// repeating the nearest edge element.
///
/// The interior at `(r + radius, c + radius)` equals `src(r, c)`. An empty
/// source yields an empty grid, since there is no edge value to replicate.
pub fn extend_border<T: Copy>(src: &GridView<'_, T>, radius: usize) -> Grid<T> {
    if src.is_empty() {
        return Grid::from_parts(0, 0, 0, Vec::new());
    }

    let rows = src.rows() + 2 * radius;
    let cols = src.cols() + 2 * radius;

    let col_map: Vec<usize> = (0..cols)
        .filter_map(|c| replicate_index(c as isize - radius as isize, src.cols()))
        .collect();

    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        if let Some(sr) = replicate_index(r as isize - radius as isize, src.rows()) {
            let src_row = src.row(sr);
            data.extend(col_map.iter().map(|&sc| src_row[sc]));
        }
    }

    Grid::from_parts(rows, cols, cols, data)
}
