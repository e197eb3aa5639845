//! # Mean-Value Solver
//!
//! Finds `c ∈ [a, b]` with `f(c) = mean(f, a, b)` by bisection on `f(x) - mean`:
//!
//! ```text
//!   low = a, high = b
//!   repeat max_iterations times:
//!       c = (low + high) / 2,  diff = f(c) - mean
//!       |diff| < tolerance  -> converged
//!       diff > 0            -> high = c
//!       otherwise           -> low = c
//! ```
//! When the cap is exhausted the last midpoint is returned with `converged == false`; that is a
//! result, not an error. The narrowing rule assumes `f` increases through the crossing. With
//! several crossings (oscillating `f`) only one is returned and which one is not specified; use
//! [`MeanValueSolver::all_crossings`] to enumerate them.
use crate::errors::PreconditionViolation;
use crate::numerical::domain::Interval;
use crate::numerical::riemann_integrator::{REFERENCE_SAMPLES, riemann_mean};
use crate::numerical::scalar_function::{ClosureFunction, ScalarFunction};
use itertools::Itertools;
use log::{debug, info, warn};

/// Configuration for the mean-value search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// acceptance threshold on `|f(c) - mean|`
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Riemann subintervals for the mean
    pub samples: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_iterations: 50,
            samples: REFERENCE_SAMPLES,
        }
    }
}

impl SolverConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}

/// One bisection step, recorded before the bracket is narrowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverStep {
    pub iteration: usize,
    pub low: f64,
    pub high: f64,
    pub c: f64,
    pub diff: f64,
}

/// Result of the mean-value search
#[derive(Debug, Clone, PartialEq)]
pub struct MeanValueSolution {
    pub mean_value: f64,
    /// converged point, or the last midpoint
    pub point: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub converged: bool,
    pub trace: Vec<SolverStep>,
}

impl MeanValueSolution {
    /// Distance between a user's guess and the solver point.
    pub fn estimate_error(&self, estimate: f64) -> f64 {
        (estimate - self.point).abs()
    }

    /// `f(c) - mean` at the returned point.
    pub fn residual(&self) -> f64 {
        self.function_value - self.mean_value
    }
}

/// `{ mean_value, point }` as handed to a display: `point` stays `None` until a converged
/// solution exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanValueResult {
    pub mean_value: f64,
    pub point: Option<f64>,
}

impl MeanValueResult {
    pub fn pending(mean_value: f64) -> Self {
        Self {
            mean_value,
            point: None,
        }
    }
}

impl From<&MeanValueSolution> for MeanValueResult {
    fn from(solution: &MeanValueSolution) -> Self {
        Self {
            mean_value: solution.mean_value,
            point: solution.converged.then_some(solution.point),
        }
    }
}

/// Mean-value point finder
#[derive(Debug, Clone, Default)]
pub struct MeanValueSolver {
    config: SolverConfig,
}

impl MeanValueSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = tolerance;
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.config.max_iterations = max_iterations;
    }

    pub fn set_samples(&mut self, samples: usize) {
        self.config.samples = samples;
    }

    /// Mean of `f` with the configured granularity, then the bisection search.
    pub fn solve<F>(
        &self,
        function: &F,
        a: f64,
        b: f64,
    ) -> Result<MeanValueSolution, PreconditionViolation>
    where
        F: ScalarFunction + ?Sized,
    {
        let target = riemann_mean(function, a, b, self.config.samples)?;
        self.solve_for_target(function, a, b, target)
    }

    /// Bisection for `f(c) = target` inside `[a, b]`.
    pub fn solve_for_target<F>(
        &self,
        function: &F,
        a: f64,
        b: f64,
        target: f64,
    ) -> Result<MeanValueSolution, PreconditionViolation>
    where
        F: ScalarFunction + ?Sized,
    {
        let interval = Interval::new(a, b)?;
        let mut low = interval.a();
        let mut high = interval.b();
        let mut c = interval.midpoint();
        let mut fc = function.evaluate(c);
        let mut trace = Vec::with_capacity(self.config.max_iterations);

        debug!(
            "mean-value bisection for {}: target {:.6} on [{}, {}], tolerance {}",
            function.name(),
            target,
            low,
            high,
            self.config.tolerance
        );

        for iteration in 1..=self.config.max_iterations {
            c = 0.5 * (low + high);
            fc = function.evaluate(c);
            let diff = fc - target;
            trace.push(SolverStep {
                iteration,
                low,
                high,
                c,
                diff,
            });
            debug!(
                "Iteration {}: c = {:.10}, f(c) - mean = {:.2e}, interval = [{:.6}, {:.6}]",
                iteration, c, diff, low, high
            );

            if diff.abs() < self.config.tolerance {
                info!(
                    "mean-value point of {} found: c = {:.6} after {} iterations",
                    function.name(),
                    c,
                    iteration
                );
                return Ok(MeanValueSolution {
                    mean_value: target,
                    point: c,
                    function_value: fc,
                    iterations: iteration,
                    converged: true,
                    trace,
                });
            }

            if diff > 0.0 {
                high = c;
            } else {
                low = c;
            }
        }

        warn!(
            "mean-value search for {} missed tolerance {} in {} iterations, returning c = {:.6}",
            function.name(),
            self.config.tolerance,
            self.config.max_iterations,
            c
        );
        Ok(MeanValueSolution {
            mean_value: target,
            point: c,
            function_value: fc,
            iterations: trace.len(),
            converged: false,
            trace,
        })
    }

    /// Every crossing of `f(x) = mean` in `[a, b]`, ascending.
    ///
    /// Sign changes of `f(x) - mean` are located on the Riemann grid and each bracket is refined
    /// by a bisection that follows the sign, so decreasing crossings are found too. Crossings
    /// closer together than one grid step may be missed.
    pub fn all_crossings<F>(
        &self,
        function: &F,
        a: f64,
        b: f64,
    ) -> Result<Vec<f64>, PreconditionViolation>
    where
        F: ScalarFunction + ?Sized,
    {
        let target = riemann_mean(function, a, b, self.config.samples)?;
        let g = |x: f64| function.evaluate(x) - target;
        let n = self.config.samples;
        let dx = (b - a) / n as f64;
        let grid: Vec<(f64, f64)> = (0..=n)
            .map(|i| if i == n { b } else { a + i as f64 * dx })
            .map(|x| (x, g(x)))
            .collect();

        let mut crossings = Vec::new();
        for ((x_l, g_l), (x_r, g_r)) in grid.iter().copied().tuple_windows() {
            if !g_l.is_finite() || !g_r.is_finite() {
                continue;
            }
            if g_l == 0.0 {
                crossings.push(x_l);
            } else if g_r != 0.0 && g_l.signum() != g_r.signum() {
                crossings.push(self.refine_bracket(&g, x_l, g_l, x_r));
            }
        }
        if let Some(&(x_last, g_last)) = grid.last() {
            if g_last == 0.0 {
                crossings.push(x_last);
            }
        }
        debug!(
            "{} crossings of the mean {:.6} for {} on [{}, {}]",
            crossings.len(),
            target,
            function.name(),
            a,
            b
        );
        Ok(crossings)
    }

    fn refine_bracket<G>(&self, g: &G, mut low: f64, mut g_low: f64, mut high: f64) -> f64
    where
        G: Fn(f64) -> f64,
    {
        let mut c = 0.5 * (low + high);
        for _ in 0..self.config.max_iterations {
            c = 0.5 * (low + high);
            let g_c = g(c);
            if g_c == 0.0 || high - low <= f64::EPSILON * c.abs().max(1.0) {
                break;
            }
            if g_c.signum() == g_low.signum() {
                low = c;
                g_low = g_c;
            } else {
                high = c;
            }
        }
        c
    }
}

/// Quick mean-value point of a closure with the reference configuration and a custom tolerance.
pub fn solve_mean_value_point<F>(
    function: F,
    a: f64,
    b: f64,
    tolerance: f64,
) -> Result<f64, PreconditionViolation>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    let func = ClosureFunction::new(function, "mean_value_function");
    let mut solver = MeanValueSolver::new();
    solver.set_tolerance(tolerance);
    let result = solver.solve(&func, a, b)?;
    Ok(result.point)
}

/////////////////////////////////////////TESTS////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_square_on_zero_three() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let solution = MeanValueSolver::new().solve(&f, 0.0, 3.0).unwrap();
        assert!(solution.converged);
        assert!(solution.point > 0.0 && solution.point < 3.0);
        assert!((f.evaluate(solution.point) - solution.mean_value).abs() < 0.01);
        assert_abs_diff_eq!(solution.point, 3f64.sqrt(), epsilon = 0.01);
        assert_eq!(solution.point, 1.728515625);
        assert_eq!(solution.iterations, 9);
        assert_eq!(solution.trace.len(), 9);
    }

    #[test]
    fn test_trace_records_bracket_before_narrowing() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let solution = MeanValueSolver::new().solve(&f, 0.0, 3.0).unwrap();
        let first = solution.trace[0];
        assert_eq!((first.iteration, first.low, first.high, first.c), (1, 0.0, 3.0, 1.5));
        assert!(first.diff < 0.0);
        let second = solution.trace[1];
        assert_eq!((second.low, second.high, second.c), (1.5, 3.0, 2.25));
    }

    #[test]
    fn test_quadratic_scenario() {
        let f = ClosureFunction::new(|x| 0.5 * x * x + 1.0, "quadratic");
        let solution = MeanValueSolver::new().solve(&f, -2.0, 4.0).unwrap();
        assert!(solution.converged);
        assert_abs_diff_eq!(solution.mean_value, 3.0, epsilon = 0.01);
        assert!(solution.residual().abs() < 0.01);
        assert_abs_diff_eq!(solution.point, 2.0, epsilon = 0.01);
    }

    #[test]
    fn test_iteration_cap_returns_last_midpoint() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let config = SolverConfig::default()
            .with_tolerance(1e-12)
            .with_max_iterations(5);
        let solution = MeanValueSolver::with_config(config).solve(&f, 0.0, 3.0).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 5);
        assert_eq!(solution.point, 1.78125);
        assert_eq!(MeanValueResult::from(&solution).point, None);
    }

    #[test]
    fn test_point_stays_inside_interval() {
        // decreasing function: the narrowing rule walks away from the crossing
        let f = ClosureFunction::new(|x| -x * x, "-x^2");
        let solution = MeanValueSolver::new().solve(&f, 0.0, 3.0).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 50);
        assert!(solution.point >= 0.0 && solution.point <= 3.0);
        // the crossing itself is still found by the sign-following scan
        let crossings = MeanValueSolver::new().all_crossings(&f, 0.0, 3.0).unwrap();
        assert_eq!(crossings.len(), 1);
        assert_abs_diff_eq!(crossings[0], 2.9955015f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_interval() {
        let f = ClosureFunction::new(|x| x, "x");
        assert_eq!(
            MeanValueSolver::new().solve(&f, 2.0, 2.0).err(),
            Some(PreconditionViolation::DegenerateInterval { a: 2.0, b: 2.0 })
        );
    }

    #[test]
    fn test_all_crossings_of_even_function() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let solver = MeanValueSolver::new();
        let crossings = solver.all_crossings(&f, -1.0, 2.0).unwrap();
        assert_eq!(crossings.len(), 2);
        let target = riemann_mean(&f, -1.0, 2.0, REFERENCE_SAMPLES).unwrap();
        assert_abs_diff_eq!(crossings[0], -target.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(crossings[1], target.sqrt(), epsilon = 1e-9);
        // the plain bisection only reports one of them
        let single = solver.solve(&f, -1.0, 2.0).unwrap();
        assert!(single.point > 0.0);
    }

    #[test]
    fn test_all_crossings_of_cosine() {
        let f = ClosureFunction::new(|x: f64| x.cos(), "cos");
        let crossings = MeanValueSolver::new().all_crossings(&f, 0.0, 2.0 * PI).unwrap();
        assert_eq!(crossings.len(), 2);
        assert_abs_diff_eq!(crossings[0], PI / 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(crossings[1], 1.5 * PI, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_value_result() {
        let f = ClosureFunction::new(|x| x * x, "x^2");
        let solution = MeanValueSolver::new().solve(&f, 0.0, 3.0).unwrap();
        let result = MeanValueResult::from(&solution);
        assert_eq!(result.point, Some(solution.point));
        assert_eq!(MeanValueResult::pending(3.0).point, None);
        assert_abs_diff_eq!(solution.estimate_error(2.0), 2.0 - 1.728515625);
    }

    #[test]
    fn test_convenience_function() {
        let c = solve_mean_value_point(|x| x * x, 0.0, 3.0, 0.01).unwrap();
        assert_eq!(c, 1.728515625);
    }
}
