//! Facade used by a UI collaborator. Every call recomputes from its arguments; the only state is
//! the registry (current custom expression) and the solver defaults.
//!
//!# Example
//! ```
//! use calculus_explorer::numerical::explorer::CalculusExplorer;
//! use calculus_explorer::numerical::function_registry::FunctionId;
//! let explorer = CalculusExplorer::new();
//! let mean = explorer.mean_value(FunctionId::Square, 0.0, 3.0).unwrap();
//! assert!((mean - 3.0).abs() < 0.01);
//! let c = explorer.solve_mean_value_point(FunctionId::Square, 0.0, 3.0, None, None).unwrap();
//! assert!((c - 3f64.sqrt()).abs() < 0.01);
//! ```
use crate::errors::{CoreError, EvaluationError, PreconditionViolation};
use crate::numerical::coordinate_mapper::CoordinateMapper;
use crate::numerical::curve_sampler::{self, FamilyMember, SampledCurve};
use crate::numerical::domain::{DomainWindow, MathPoint, ScreenPoint, Viewport};
use crate::numerical::function_registry::{FunctionId, FunctionInfo, FunctionRegistry};
use crate::numerical::mean_value_solver::{MeanValueSolution, MeanValueSolver, SolverConfig};
use crate::numerical::riemann_integrator::{self, RiemannBar};

pub struct CalculusExplorer {
    registry: FunctionRegistry,
    solver_config: SolverConfig,
}

impl CalculusExplorer {
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::new())
    }

    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self {
            registry,
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver_config
    }

    /// Compile error is reported but the `custom` function keeps drawing (as zero).
    pub fn set_custom_expression(&mut self, text: &str) -> Result<(), EvaluationError> {
        self.registry.set_custom_expression(text)
    }

    pub fn list_functions(&self) -> Vec<FunctionInfo> {
        self.registry.list_functions()
    }

    pub fn evaluate(&self, id: FunctionId, x: f64) -> Result<f64, EvaluationError> {
        self.registry.evaluate(id, x)
    }

    pub fn evaluate_family(&self, id: FunctionId, x: f64, c: f64) -> Result<f64, EvaluationError> {
        self.registry.evaluate_family(id, x, c)
    }

    /// Samples of `f`; non-finite values become gaps, a broken custom expression a flat line.
    pub fn sample_curve(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
        step: f64,
    ) -> Result<SampledCurve, PreconditionViolation> {
        let f = self.registry.drawable(id);
        curve_sampler::sample(f.as_ref(), a, b, step)
    }

    pub fn sample_family(
        &self,
        id: FunctionId,
        constants: &[f64],
        a: f64,
        b: f64,
        step: f64,
    ) -> Result<Vec<FamilyMember>, CoreError> {
        let family = self.registry.family(id)?;
        Ok(curve_sampler::sample_family(
            family.as_ref(),
            constants,
            a,
            b,
            step,
        )?)
    }

    pub fn mean_value(&self, id: FunctionId, a: f64, b: f64) -> Result<f64, PreconditionViolation> {
        let f = self.registry.resolve(id);
        riemann_integrator::riemann_mean(f.as_ref(), a, b, self.solver_config.samples)
    }

    pub fn definite_integral(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
    ) -> Result<f64, PreconditionViolation> {
        let f = self.registry.resolve(id);
        riemann_integrator::definite_integral(f.as_ref(), a, b, self.solver_config.samples)
    }

    pub fn secant_slope(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
    ) -> Result<f64, PreconditionViolation> {
        let f = self.registry.resolve(id);
        riemann_integrator::secant_slope(f.as_ref(), a, b)
    }

    pub fn riemann_rectangles(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<(Vec<RiemannBar>, f64), PreconditionViolation> {
        let f = self.registry.resolve(id);
        riemann_integrator::riemann_rectangles(f.as_ref(), a, b, n)
    }

    /// Full solver output with optional overrides of the configured tolerance and cap.
    pub fn solve_mean_value(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
        tolerance: Option<f64>,
        max_iterations: Option<usize>,
    ) -> Result<MeanValueSolution, PreconditionViolation> {
        let mut config = self.solver_config;
        if let Some(tolerance) = tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        let f = self.registry.resolve(id);
        MeanValueSolver::with_config(config).solve(f.as_ref(), a, b)
    }

    /// The point only; a non-converged search still yields its last midpoint.
    pub fn solve_mean_value_point(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
        tolerance: Option<f64>,
        max_iterations: Option<usize>,
    ) -> Result<f64, PreconditionViolation> {
        Ok(self
            .solve_mean_value(id, a, b, tolerance, max_iterations)?
            .point)
    }

    /// All crossings of the mean, ascending.
    pub fn mean_value_points(
        &self,
        id: FunctionId,
        a: f64,
        b: f64,
    ) -> Result<Vec<f64>, PreconditionViolation> {
        let f = self.registry.resolve(id);
        MeanValueSolver::with_config(self.solver_config).all_crossings(f.as_ref(), a, b)
    }
}

impl Default for CalculusExplorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel position to mathematical point.
pub fn screen_to_math(
    px: f64,
    py: f64,
    window: &DomainWindow,
    viewport: &Viewport,
) -> (f64, f64) {
    let p = CoordinateMapper::new(*window, *viewport).to_math(ScreenPoint::new(px, py));
    (p.x, p.y)
}

/// Mathematical point to pixel position.
pub fn math_to_screen(x: f64, y: f64, window: &DomainWindow, viewport: &Viewport) -> (f64, f64) {
    let s = CoordinateMapper::new(*window, *viewport).to_screen(MathPoint::new(x, y));
    (s.x, s.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_overrides_reach_the_solver() {
        let explorer = CalculusExplorer::new();
        let loose = explorer
            .solve_mean_value(FunctionId::Square, 0.0, 3.0, Some(0.5), None)
            .unwrap();
        let capped = explorer
            .solve_mean_value(FunctionId::Square, 0.0, 3.0, Some(1e-12), Some(3))
            .unwrap();
        assert!(loose.iterations < 9);
        assert_eq!(capped.iterations, 3);
        assert!(!capped.converged);
    }

    #[test]
    fn test_family_of_custom_is_an_error() {
        let mut explorer = CalculusExplorer::new();
        explorer.set_custom_expression("x").unwrap();
        assert_eq!(
            explorer.sample_family(FunctionId::Custom, &[0.0], 0.0, 1.0, 0.1),
            Err(CoreError::Evaluation(EvaluationError::MissingAntiderivative(
                FunctionId::Custom
            )))
        );
    }

    #[test]
    fn test_family_samples() {
        let explorer = CalculusExplorer::new();
        let members = explorer
            .sample_family(FunctionId::Linear, &[-1.0, 2.0], 0.0, 1.0, 0.5)
            .unwrap();
        assert_eq!(members[1].constant, 2.0);
        let ys: Vec<f64> = members[1].curve.points().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![2.0, 2.75, 4.0]);
    }

    #[test]
    fn test_definite_integral_and_secant() {
        let explorer = CalculusExplorer::new();
        let integral = explorer.definite_integral(FunctionId::Quadratic, -2.0, 4.0).unwrap();
        assert_abs_diff_eq!(integral, 18.0, epsilon = 0.05);
        let slope = explorer.secant_slope(FunctionId::Linear, -3.0, 5.0).unwrap();
        assert_abs_diff_eq!(slope, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_transform_functions() {
        let window = DomainWindow::new(-2.0, 4.0, 0.0, 10.0).unwrap();
        let viewport = Viewport::new(800.0, 400.0, 60.0).unwrap();
        let (px, py) = math_to_screen(1.0, 5.0, &window, &viewport);
        assert_eq!((px, py), (400.0, 200.0));
        let (x, y) = screen_to_math(px, py, &window, &viewport);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 5.0, epsilon = 1e-12);
    }
}
