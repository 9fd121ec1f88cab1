//! Foundational containers for HOG feature extraction.
//!
//! ## Grids, Views and Stride
//! Grids are indexed `(row, col)` from zero. `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `cols`, which
//! is how a window keeps addressing its parent's rows.
//!
//! A [`GridView`] borrows a rectangular window of a parent buffer without
//! copying. The borrow checker keeps every view inside the lifetime of the
//! buffer it reads, and shared views cannot write.
//!
//! ## Border Extension
//! [`extend_border`] grows a grid by a radius on every side, each border cell
//! repeating the nearest edge element.

mod border;
mod error;
mod grid;

pub use border::{extend_border, replicate_index};
pub use error::{Error, ensure_same_shape};
pub use grid::{Grid, GridView};
