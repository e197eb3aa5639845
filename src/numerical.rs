/// # Scalar functions
/// the `ScalarFunction` and `AntiderivativeFamily` capabilities, guarded evaluation with the
/// `0.0` fallback and the expression compiler seam for custom functions
pub mod scalar_function;
/// # Function registry
/// closed catalog of functions with matched antiderivative families plus the `custom` escape
///  Example
/// ```
/// use calculus_explorer::numerical::function_registry::{FunctionId, FunctionRegistry};
/// let mut registry = FunctionRegistry::new();
/// assert_eq!(registry.evaluate(FunctionId::Quadratic, 2.0), Ok(3.0));
/// assert_eq!(registry.evaluate_family(FunctionId::Square, 3.0, 1.0), Ok(10.0));
/// // a malformed custom expression is reported, then drawn as zero
/// assert!(registry.set_custom_expression("x^(").is_err());
/// assert_eq!(registry.resolve(FunctionId::Custom).evaluate(2.0), 0.0);
/// ```
pub mod function_registry;
/// validated interval, domain window and viewport
pub mod domain;
/// # Coordinate mapper
/// affine math <-> screen transform with a flipped vertical axis
pub mod coordinate_mapper;
/// # Curve sampler
/// polylines of a function or of a whole antiderivative family on a shared grid
pub mod curve_sampler;
/// # Numeric integrator
/// left Riemann mean, definite integral, secant slope and tower rectangles
///  Example
/// ```
/// use calculus_explorer::numerical::riemann_integrator::mean_value;
/// use calculus_explorer::numerical::scalar_function::ClosureFunction;
/// let f = ClosureFunction::new(|x| x * x, "x^2");
/// let mean = mean_value(&f, 0.0, 3.0).unwrap();
/// assert!((mean - 3.0).abs() < 0.01);
/// ```
pub mod riemann_integrator;
/// # Mean-value solver
/// bisection for `f(c) = mean(f)` and the enumeration of all crossings
///  Example
/// ```
/// use calculus_explorer::numerical::mean_value_solver::{MeanValueSolver, SolverConfig};
/// use calculus_explorer::numerical::scalar_function::ClosureFunction;
/// let f = ClosureFunction::new(|x| x * x, "x^2");
/// let solver = MeanValueSolver::with_config(SolverConfig::default().with_tolerance(0.001));
/// let solution = solver.solve(&f, 0.0, 3.0).unwrap();
/// assert!(solution.converged);
/// println!(
///     "c = {}, f(c) = {}, mean = {}",
///     solution.point, solution.function_value, solution.mean_value
/// );
/// ```
pub mod mean_value_solver;
/// # Interaction mapper
/// clicks back into the domain, rejected outside `[a, b]` or while locked
pub mod interaction_mapper;
/// redraw pacing, family cycling and staged solver replay
pub mod frame_clock;
/// # Scene
/// renderer-ready geometry of one frame
pub mod scene;
/// # Explorer
/// the facade a UI talks to
pub mod explorer;
