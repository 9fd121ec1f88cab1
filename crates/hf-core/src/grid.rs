use crate::Error;

/// Owned row-major grid.
///
/// Rows start every `stride` elements; `stride >= cols`. Elements between
/// `cols` and `stride` are padding and never belong to the logical grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = rows.checked_mul(cols).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            rows,
            cols,
            stride: cols,
            data,
        })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, stride: usize, data: Vec<T>) -> Self {
        debug_assert!(stride >= cols);
        debug_assert_eq!(data.len(), rows * stride);
        Self {
            rows,
            cols,
            stride,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Backing storage, padding included.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[T] {
        assert!(r < self.rows, "row index out of bounds");
        let start = r * self.stride;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        assert!(r < self.rows, "row index out of bounds");
        let start = r * self.stride;
        &mut self.data[start..start + self.cols]
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&T> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.data.get(r * self.stride + c)
    }

    pub fn view(&self) -> GridView<'_, T> {
        GridView {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &self.data,
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_fill(rows: usize, cols: usize, value: T) -> Self {
        let len = rows.checked_mul(cols).expect("grid size overflow");
        Self {
            rows,
            cols,
            stride: cols,
            data: vec![value; len],
        }
    }

    /// Logical elements in row-major order, padding dropped.
    pub fn to_vec(&self) -> Vec<T> {
        self.view().to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridView<'a, T> {
    rows: usize,
    cols: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> GridView<'a, T> {
    pub fn from_slice(
        rows: usize,
        cols: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < cols {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(rows, cols, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            rows,
            cols,
            stride,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn row(&self, r: usize) -> &'a [T] {
        assert!(r < self.rows, "row index out of bounds");
        let start = r * self.stride;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&'a T> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.data.get(r * self.stride + c)
    }

    /// Window of `rows x cols` starting at `(row, col)`, sharing storage with
    /// `self`.
    pub fn subview(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<GridView<'a, T>, Error> {
        if row > self.rows || col > self.cols || rows > (self.rows - row) || cols > (self.cols - col)
        {
            return Err(Error::OutOfBounds);
        }

        let min_len = min_required_len(rows, cols, self.stride).ok_or(Error::OutOfBounds)?;
        if min_len == 0 {
            return Ok(GridView {
                rows,
                cols,
                stride: self.stride,
                data: &[],
            });
        }

        let start = row
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(col))
            .ok_or(Error::OutOfBounds)?;
        let tail = self.data.get(start..).ok_or(Error::OutOfBounds)?;

        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(GridView {
            rows,
            cols,
            stride: self.stride,
            data: tail,
        })
    }
}

impl<T: Clone> GridView<'_, T> {
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for r in 0..self.rows {
            out.extend_from_slice(self.row(r));
        }
        out
    }

    pub fn to_grid(&self) -> Grid<T> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
            data: self.to_vec(),
        }
    }
}

fn min_required_len(rows: usize, cols: usize, stride: usize) -> Option<usize> {
    if rows == 0 || cols == 0 {
        return Some(0);
    }

    let rows_before_last = rows.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(cols)
}
