//! Explicit feature map approximating the histogram-intersection kernel.
//!
//! Each non-negative component `x` expands into `2 * (2n + 1)` values: for
//! every `j` in `[-n, n]` the pair
//! `(-sqrt(x * sech(pi * j * l)) * sin(j * l * ln x), sqrt(x * sech(pi * j * l)) * cos(j * l * ln x))`.
//! A dot product of two expanded vectors approximates `sum min(x_i, y_i)`,
//! which lets a linear classifier act as an intersection-kernel one.

use std::f64::consts::PI;

use hf_core::Error;
use serde::{Deserialize, Serialize};

/// Largest accepted sampling half-order.
pub const MAX_KERNEL_ORDER: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelExpansion {
    /// Sampling half-order; `2n + 1` frequencies per component.
    pub n: usize,
    /// Sampling period.
    pub l: f32,
}

impl Default for KernelExpansion {
    fn default() -> Self {
        Self { n: 1, l: 0.5 }
    }
}

impl KernelExpansion {
    pub fn validate(&self) -> Result<(), Error> {
        if self.n > MAX_KERNEL_ORDER {
            return Err(Error::InvalidConfig("kernel order must be <= 8"));
        }
        if !(self.l.is_finite() && self.l > 0.0) {
            return Err(Error::InvalidConfig("kernel period must be finite and > 0"));
        }
        Ok(())
    }

    /// Values emitted per input component.
    pub fn factor(&self) -> Result<usize, Error> {
        self.validate()?;
        Ok(2 * (2 * self.n + 1))
    }

    pub fn expand(&self, values: &[f32]) -> Result<Vec<f32>, Error> {
        hik_expand(values, self.n, self.l)
    }
}

#[inline]
fn sech(t: f64) -> f64 {
    2.0 / (t.exp() + (-t).exp())
}

pub fn hik_expand(values: &[f32], n: usize, l: f32) -> Result<Vec<f32>, Error> {
    KernelExpansion { n, l }.validate()?;

    let n = n as i64;
    let l = l as f64;
    let weights: Vec<f64> = (-n..=n).map(|j| sech(PI * j as f64 * l)).collect();

    let mut out = Vec::with_capacity(values.len() * weights.len() * 2);
    for &x in values {
        // Components are non-negative; zero has no logarithm.
        if x <= 0.0 {
            out.extend(std::iter::repeat_n(0.0f32, weights.len() * 2));
            continue;
        }

        let x = x as f64;
        let ln_x = x.ln();
        for (j, w) in (-n..=n).zip(&weights) {
            let amp = (x * w).sqrt();
            let phase = j as f64 * l * ln_x;
            out.push((-amp * phase.sin()) as f32);
            out.push((amp * phase.cos()) as f32);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use hf_core::Error;

    use super::{KernelExpansion, MAX_KERNEL_ORDER, hik_expand};

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn zeros_expand_to_zeros() {
        let out = hik_expand(&[0.0; 10], 1, 0.5).expect("valid order");
        assert_eq!(out.len(), 60);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn length_scales_with_order() {
        let k = KernelExpansion { n: 2, l: 0.4 };
        assert_eq!(k.factor(), Ok(10));
        assert_eq!(k.expand(&[0.1, 0.2, 0.0]).expect("valid order").len(), 30);
    }

    #[test]
    fn central_term_is_sqrt_x() {
        let out = hik_expand(&[0.25], 1, 0.5).expect("valid order");
        // j = 0 is the middle pair: (-0 * sin 0, sqrt(x) * cos 0).
        assert_eq!(out[2], 0.0);
        assert!((out[3] - 0.5).abs() < 1e-7);
    }

    #[test]
    fn known_values_for_unit_component() {
        // ln(1) = 0, so only the real parts survive and equal sqrt(sech(pi j l)).
        let out = hik_expand(&[1.0], 1, 0.5).expect("valid order");
        let s = (2.0 / ((std::f64::consts::FRAC_PI_2).exp() + (-std::f64::consts::FRAC_PI_2).exp()))
            .sqrt() as f32;
        assert!((out[1] - s).abs() < 1e-6);
        assert!((out[3] - 1.0).abs() < 1e-7);
        assert!((out[5] - s).abs() < 1e-6);
        assert!(out[0].abs() < 1e-7 && out[4].abs() < 1e-7);
    }

    #[test]
    fn self_inner_product_is_linear_in_x() {
        // Phases cancel in <e(x), e(x)>, leaving x * sum_j sech(pi j l).
        let unit = hik_expand(&[1.0], 2, 0.5).expect("valid order");
        let c = dot(&unit, &unit);
        for x in [0.05f32, 0.3, 0.8] {
            let e = hik_expand(&[x], 2, 0.5).expect("valid order");
            let got = dot(&e, &e);
            assert!((got - c * x).abs() < 1e-5, "x={x} got={got}");
        }
    }

    #[test]
    fn oversized_order_and_bad_period_are_rejected() {
        for n in [MAX_KERNEL_ORDER + 1, 4_611_686_018_427_387_903, usize::MAX] {
            assert!(matches!(hik_expand(&[0.5], n, 0.5), Err(Error::InvalidConfig(_))));
            assert!(KernelExpansion { n, l: 0.5 }.factor().is_err());
        }
        for l in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            assert!(hik_expand(&[0.5], 1, l).is_err());
        }
        let top = hik_expand(&[0.5], MAX_KERNEL_ORDER, 0.5).expect("largest order");
        assert_eq!(top.len(), 2 * (2 * MAX_KERNEL_ORDER + 1));
    }
}
