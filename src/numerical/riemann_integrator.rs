//! # Numeric Integrator
//!
//! Left Riemann sums on `n` equal subintervals:
//!
//! ```text
//!   dx = (b - a) / n,   mean = (1/n) * Σ f(a + i dx),  i = 0..n-1
//!   integral ≈ mean * (b - a)
//! ```
//! Deterministic for a given `(f, a, b, n)`; no adaptivity. Callers pass guarded functions when
//! the result must stay finite.
use crate::errors::PreconditionViolation;
use crate::numerical::domain::Interval;
use crate::numerical::scalar_function::ScalarFunction;

/// Subinterval count used by every mean-value computation unless configured otherwise.
pub const REFERENCE_SAMPLES: usize = 1000;

/// Segments of the tower view.
pub const REFERENCE_BARS: usize = 100;

/// Mean of `f` over `[a, b]` with the reference granularity.
pub fn mean_value<F>(f: &F, a: f64, b: f64) -> Result<f64, PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    riemann_mean(f, a, b, REFERENCE_SAMPLES)
}

/// Left-Riemann mean with `n` subintervals. `a == b` is a precondition violation.
pub fn riemann_mean<F>(f: &F, a: f64, b: f64, n: usize) -> Result<f64, PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    let interval = Interval::new(a, b)?;
    if n == 0 {
        return Err(PreconditionViolation::InvalidSampleCount(n));
    }
    Ok(left_sum(f, &interval, n) / n as f64)
}

/// `∫ f dx` over `[a, b]` as `mean * (b - a)`.
pub fn definite_integral<F>(f: &F, a: f64, b: f64, n: usize) -> Result<f64, PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    Ok(riemann_mean(f, a, b, n)? * (b - a))
}

/// Slope of the secant through `(a, f(a))` and `(b, f(b))`.
pub fn secant_slope<F>(f: &F, a: f64, b: f64) -> Result<f64, PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    let interval = Interval::new(a, b)?;
    Ok((f.evaluate(b) - f.evaluate(a)) / interval.width())
}

fn left_sum<F>(f: &F, interval: &Interval, n: usize) -> f64
where
    F: ScalarFunction + ?Sized,
{
    let dx = interval.width() / n as f64;
    (0..n).map(|i| f.evaluate(interval.a() + i as f64 * dx)).sum()
}

/// One left-endpoint rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiemannBar {
    pub x_left: f64,
    pub x_right: f64,
    pub height: f64,
}

impl RiemannBar {
    /// Signed area.
    pub fn area(&self) -> f64 {
        (self.x_right - self.x_left) * self.height
    }
}

/// `n` left-endpoint bars covering `[a, b]` and their total signed area. Bars with a
/// non-finite height are dropped and do not contribute to the area.
pub fn riemann_rectangles<F>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<(Vec<RiemannBar>, f64), PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    let interval = Interval::new(a, b)?;
    if n == 0 {
        return Err(PreconditionViolation::InvalidSampleCount(n));
    }
    let dx = interval.width() / n as f64;
    let mut area = 0.0;
    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        let x_left = a + i as f64 * dx;
        let x_right = if i + 1 == n { b } else { a + (i + 1) as f64 * dx };
        let height = f.evaluate(x_left);
        if !height.is_finite() {
            continue;
        }
        let bar = RiemannBar {
            x_left,
            x_right,
            height,
        };
        area += bar.area();
        bars.push(bar);
    }
    Ok((bars, area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::scalar_function::ClosureFunction;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_square_on_zero_three() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let mean = mean_value(&f, 0.0, 3.0).unwrap();
        // left sum underestimates an increasing function: 3 * 0.999 * 0.9995
        assert_abs_diff_eq!(mean, 2.9955015, epsilon = 1e-9);
        assert!((mean - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_quadratic_scenario_mean() {
        let f = ClosureFunction::new(|x| 0.5 * x * x + 1.0, "0.5x^2 + 1");
        let mean = mean_value(&f, -2.0, 4.0).unwrap();
        // exact mean is 3
        assert_abs_diff_eq!(mean, 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_mean_is_idempotent() {
        let f = ClosureFunction::new(|x: f64| 2.0 * x.sin(), "2sin");
        let first = mean_value(&f, -1.0, 5.0).unwrap();
        let second = mean_value(&f, -1.0, 5.0).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_constant_is_exact() {
        let f = ClosureFunction::new(|_| 2.5, "2.5");
        assert_eq!(riemann_mean(&f, -1.0, 1.0, 7).unwrap(), 2.5);
        assert_relative_eq!(definite_integral(&f, -1.0, 1.0, 7).unwrap(), 5.0);
    }

    #[test]
    fn test_granularity_matters() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let coarse = riemann_mean(&f, 0.0, 3.0, 10).unwrap();
        let fine = riemann_mean(&f, 0.0, 3.0, 10_000).unwrap();
        assert!((coarse - 3.0).abs() > (fine - 3.0).abs());
    }

    #[test]
    fn test_degenerate_interval_is_rejected() {
        let f = ClosureFunction::new(|x| x, "x");
        assert_eq!(
            mean_value(&f, 1.0, 1.0),
            Err(PreconditionViolation::DegenerateInterval { a: 1.0, b: 1.0 })
        );
        assert_eq!(
            riemann_mean(&f, 0.0, 1.0, 0),
            Err(PreconditionViolation::InvalidSampleCount(0))
        );
    }

    #[test]
    fn test_secant_slope() {
        let f = ClosureFunction::new(|x| 0.1 * x * x * x - 0.5 * x, "cubic");
        // (f(2) - f(-1)) / 3 = (-0.2 - 0.4) / 3
        assert_relative_eq!(secant_slope(&f, -1.0, 2.0).unwrap(), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_rectangles_match_mean() {
        let f = ClosureFunction::new(|x| 0.3 * x * x - 1.0, "parabola");
        let (bars, area) = riemann_rectangles(&f, -1.0, 3.0, REFERENCE_BARS).unwrap();
        assert_eq!(bars.len(), 100);
        assert_eq!(bars[0].x_left, -1.0);
        assert_eq!(bars[99].x_right, 3.0);
        let mean = riemann_mean(&f, -1.0, 3.0, REFERENCE_BARS).unwrap();
        assert_relative_eq!(area, mean * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rectangles_skip_non_finite_bars() {
        let f = ClosureFunction::new(|x: f64| 1.0 / x, "1/x");
        let (bars, _) = riemann_rectangles(&f, 0.0, 1.0, 4).unwrap();
        assert_eq!(bars.len(), 3);
    }
}
