use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    OutOfBounds,
    InvalidStride,
    InvalidConfig(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::InvalidStride => write!(f, "invalid stride"),
            Self::InvalidConfig(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for Error {}

/// Fails with [`Error::ShapeMismatch`] unless both shapes are `(rows, cols)`-equal.
pub fn ensure_same_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::ShapeMismatch { expected, actual });
    }
    Ok(())
}
