use serde::{Deserialize, Serialize};

/// 3x3 integer convolution kernels used for the gradient pair.
///
/// Coefficients are indexed `[dr][dc]` with `(1, 1)` the centre, so
/// `out(r, c) = sum k[dr][dc] * p(r + dr - 1, c + dc - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel3x3 {
    /// Horizontal Sobel derivative (right minus left).
    SobelX,
    /// Vertical Sobel derivative (bottom minus top).
    SobelY,
}

impl Kernel3x3 {
    pub const fn coefficients(self) -> [[i16; 3]; 3] {
        match self {
            Self::SobelX => [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]],
            Self::SobelY => [[-1, -2, -1], [0, 0, 0], [1, 2, 1]],
        }
    }
}

/// Execution strategy for the per-pixel stages.
///
/// Both backends produce bit-identical grids: Sobel over any `u8` source and
/// magnitude over any `i16` gradient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Scalar,
    #[default]
    Simd,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Simd => "simd",
        }
    }
}
