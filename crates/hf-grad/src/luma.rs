use hf_core::{Grid, GridView};

const WEIGHT_R: f64 = 0.299;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_B: f64 = 0.114;

/// Truncated BT.601 luma of one `[r, g, b]` pixel.
#[inline]
pub fn luma_of(px: [u8; 3]) -> u8 {
    let v = WEIGHT_R * px[0] as f64 + WEIGHT_G * px[1] as f64 + WEIGHT_B * px[2] as f64;
    v as u8
}

pub fn rgb_to_luma(src: &GridView<'_, [u8; 3]>) -> Grid<u8> {
    let mut out = Grid::new_fill(src.rows(), src.cols(), 0u8);
    for r in 0..src.rows() {
        for (dst, &px) in out.row_mut(r).iter_mut().zip(src.row(r)) {
            *dst = luma_of(px);
        }
    }
    out
}
