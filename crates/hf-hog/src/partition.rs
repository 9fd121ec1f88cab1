/// Start and length of cell `i` when `extent` is split into `count` cells.
///
/// Every cell but the last spans `extent / count`; the last one absorbs the
/// remainder. Cells tile `0..extent` without gaps or overlaps. When
/// `extent < count` all leading cells are empty and the last cell covers the
/// whole extent.
pub fn cell_span(i: usize, extent: usize, count: usize) -> (usize, usize) {
    assert!(i < count, "cell index out of range");
    let base = extent / count;
    let start = i * base;
    let len = if i + 1 == count {
        extent - (count - 1) * base
    } else {
        base
    };
    (start, len)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPartition {
    extent: usize,
    count: usize,
}

impl CellPartition {
    pub fn new(extent: usize, count: usize) -> Self {
        assert!(count > 0, "cell count must be > 0");
        Self { extent, count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn span(&self, i: usize) -> (usize, usize) {
        cell_span(i, self.extent, self.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.count).map(|i| self.span(i))
    }
}
