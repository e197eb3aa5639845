//! Renderer-ready geometry for one frame.
//!
//! [`Scene::build`] runs the whole pipeline for a parameter snapshot: resolve the function,
//! sample the curve and the family, integrate, solve, then map everything into viewport units.
//! The result contains screen coordinates only, so any sink (plotters, a canvas, a test) can draw
//! it without knowing about the mathematics.
use crate::errors::CoreError;
use crate::numerical::coordinate_mapper::CoordinateMapper;
use crate::numerical::curve_sampler::{self, FamilyScaling, SampledCurve};
use crate::numerical::domain::{DomainWindow, Interval, MathPoint, ScreenPoint, Viewport};
use crate::numerical::function_registry::{FunctionId, FunctionRegistry};
use crate::numerical::mean_value_solver::{MeanValueSolution, MeanValueSolver, SolverConfig};
use crate::numerical::riemann_integrator::{self, REFERENCE_BARS};
use log::{debug, info};

/// Relative padding of an automatically fitted window.
pub const AUTO_WINDOW_MARGIN: f64 = 0.1;
/// Step between sparkle points on the highlighted family member.
pub const SPARKLE_STEP: f64 = 0.5;
/// Wide intervals coarsen the sparkle step so that at most this many are drawn.
pub const MAX_SPARKLES: usize = 200;
/// Half-length, in `x`, of a tangent marker.
pub const TANGENT_HALF_LENGTH: f64 = 1.0;
/// Grid lines are only drawn when an axis carries at most this many integer ticks.
pub const MAX_GRID_LINES: usize = 50;

/// Input snapshot of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParameters {
    pub function: FunctionId,
    pub interval: Interval,
    pub step: f64,
    pub family_constants: Vec<f64>,
    pub selected_constant: Option<f64>,
    pub family_scaling: Option<FamilyScaling>,
    /// fitted to the samples when absent
    pub window: Option<DomainWindow>,
    pub viewport: Viewport,
    pub solver: SolverConfig,
    pub user_estimate: Option<f64>,
    pub show_secant: bool,
    pub show_tower: bool,
}

impl SceneParameters {
    /// Mean-value view of `function` on `interval` with the reference settings.
    pub fn new(function: FunctionId, interval: Interval, viewport: Viewport) -> Self {
        Self {
            function,
            interval,
            step: interval.width() / 200.0,
            family_constants: Vec::new(),
            selected_constant: None,
            family_scaling: None,
            window: None,
            viewport,
            solver: SolverConfig::default(),
            user_estimate: None,
            show_secant: true,
            show_tower: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<ScreenPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyCurve {
    pub constant: f64,
    pub highlighted: bool,
    pub polylines: Vec<Polyline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    IntervalStart,
    IntervalEnd,
    UserEstimate,
    SolverPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: ScreenPoint,
    pub label: String,
}

/// Axis-aligned screen rectangle of a Riemann bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// `f(x_left)`
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub window: DomainWindow,
    pub title: String,
    pub axes: Vec<Line>,
    pub grid: Vec<Line>,
    pub curve: Vec<Polyline>,
    pub family: Vec<FamilyCurve>,
    pub sparkles: Vec<ScreenPoint>,
    pub mean_line: Line,
    pub secant: Option<Line>,
    pub tangents: Vec<Line>,
    pub bars: Vec<Bar>,
    pub markers: Vec<Marker>,
    pub solution: MeanValueSolution,
}

impl Scene {
    pub fn build(
        params: &SceneParameters,
        registry: &FunctionRegistry,
    ) -> Result<Scene, CoreError> {
        let a = params.interval.a();
        let b = params.interval.b();
        let f = registry.resolve(params.function);

        let drawn = registry.drawable(params.function);
        let curve = curve_sampler::sample(drawn.as_ref(), a, b, params.step)?;
        let solver = MeanValueSolver::with_config(params.solver);
        let solution = solver.solve(f.as_ref(), a, b)?;
        let mean = solution.mean_value;

        let members = if params.family_constants.is_empty() {
            Vec::new()
        } else {
            match registry.family(params.function) {
                Ok(family) => {
                    let members = curve_sampler::sample_family(
                        family.as_ref(),
                        &params.family_constants,
                        a,
                        b,
                        params.step,
                    )?;
                    members
                        .into_iter()
                        .map(|member| {
                            let curve = match &params.family_scaling {
                                Some(scaling) => member.curve.scaled(scaling),
                                None => member.curve,
                            };
                            (member.constant, curve)
                        })
                        .collect()
                }
                Err(e) => {
                    debug!("no family drawn: {}", e);
                    Vec::new()
                }
            }
        };

        let window = match params.window {
            Some(window) => window,
            None => {
                let mut points: Vec<MathPoint> = curve.points().to_vec();
                points.extend(members.iter().flat_map(|(_, c)| c.points().iter().copied()));
                points.push(MathPoint::new(a, mean));
                points.push(MathPoint::new(a, 0.0));
                DomainWindow::fit(&points, AUTO_WINDOW_MARGIN)?
            }
        };
        let mapper = CoordinateMapper::new(window, params.viewport);
        let (left, top, right, bottom) = mapper.plot_area();

        let mut scene = Scene {
            viewport: params.viewport,
            window,
            title: params.function.display_name().to_string(),
            axes: axes(&mapper),
            grid: grid(&mapper),
            curve: polylines(&mapper, &curve),
            family: Vec::new(),
            sparkles: Vec::new(),
            mean_line: Line {
                from: ScreenPoint::new(left, mapper.y_to_screen(mean)),
                to: ScreenPoint::new(right, mapper.y_to_screen(mean)),
            },
            secant: None,
            tangents: Vec::new(),
            bars: Vec::new(),
            markers: Vec::new(),
            solution,
        };

        for (constant, member) in &members {
            let highlighted = params
                .selected_constant
                .is_some_and(|selected| (selected - constant).abs() < 1e-9);
            if highlighted {
                scene.sparkles = sparkles(&mapper, registry, params, *constant)?;
            }
            scene.family.push(FamilyCurve {
                constant: *constant,
                highlighted,
                polylines: polylines(&mapper, member),
            });
        }

        if params.show_secant {
            let slope = riemann_integrator::secant_slope(f.as_ref(), a, b)?;
            scene.secant = Some(Line {
                from: mapper.to_screen(MathPoint::new(a, f.evaluate(a))),
                to: mapper.to_screen(MathPoint::new(b, f.evaluate(b))),
            });
            let through = params
                .user_estimate
                .into_iter()
                .chain(std::iter::once(scene.solution.point));
            scene.tangents = through
                .map(|c| {
                    let y = f.evaluate(c);
                    Line {
                        from: mapper.to_screen(MathPoint::new(
                            c - TANGENT_HALF_LENGTH,
                            y - slope * TANGENT_HALF_LENGTH,
                        )),
                        to: mapper.to_screen(MathPoint::new(
                            c + TANGENT_HALF_LENGTH,
                            y + slope * TANGENT_HALF_LENGTH,
                        )),
                    }
                })
                .collect();
        }

        if params.show_tower {
            let (bars, _) =
                riemann_integrator::riemann_rectangles(f.as_ref(), a, b, REFERENCE_BARS)?;
            let base = mapper.y_to_screen(0.0).clamp(top, bottom);
            scene.bars = bars
                .iter()
                .map(|bar| {
                    let height = mapper.y_to_screen(bar.height).clamp(top, bottom);
                    Bar {
                        left: mapper.x_to_screen(bar.x_left),
                        right: mapper.x_to_screen(bar.x_right),
                        top: height.min(base),
                        bottom: height.max(base),
                        value: bar.height,
                    }
                })
                .collect();
        }

        let marker = |kind, x: f64, label: String| Marker {
            kind,
            position: mapper.to_screen(MathPoint::new(x, f.evaluate(x))),
            label,
        };
        scene.markers.push(marker(MarkerKind::IntervalStart, a, format!("a = {:.2}", a)));
        scene.markers.push(marker(MarkerKind::IntervalEnd, b, format!("b = {:.2}", b)));
        if let Some(estimate) = params.user_estimate {
            scene.markers.push(marker(
                MarkerKind::UserEstimate,
                estimate,
                format!("your c = {:.3}", estimate),
            ));
        }
        let c = scene.solution.point;
        scene
            .markers
            .push(marker(MarkerKind::SolverPoint, c, format!("c = {:.3}", c)));

        info!(
            "scene for {} on [{}, {}]: {} curve points, {} family members, mean {:.4}, c = {:.4}",
            params.function,
            a,
            b,
            curve.len(),
            scene.family.len(),
            scene.solution.mean_value,
            c
        );
        Ok(scene)
    }
}

/// `x = 0` and `y = 0`, each only when inside the window.
fn axes(mapper: &CoordinateMapper) -> Vec<Line> {
    let w = mapper.window();
    let (left, top, right, bottom) = mapper.plot_area();
    let mut lines = Vec::new();
    if w.y_min() <= 0.0 && 0.0 <= w.y_max() {
        let y = mapper.y_to_screen(0.0);
        lines.push(Line {
            from: ScreenPoint::new(left, y),
            to: ScreenPoint::new(right, y),
        });
    }
    if w.x_min() <= 0.0 && 0.0 <= w.x_max() {
        let x = mapper.x_to_screen(0.0);
        lines.push(Line {
            from: ScreenPoint::new(x, top),
            to: ScreenPoint::new(x, bottom),
        });
    }
    lines
}

fn integer_ticks(min: f64, max: f64) -> Vec<f64> {
    let first = min.ceil();
    let last = max.floor();
    if last < first || last - first >= MAX_GRID_LINES as f64 {
        return Vec::new();
    }
    (0..=(last - first) as usize).map(|i| first + i as f64).collect()
}

fn grid(mapper: &CoordinateMapper) -> Vec<Line> {
    let w = mapper.window();
    let (left, top, right, bottom) = mapper.plot_area();
    let vertical = integer_ticks(w.x_min(), w.x_max()).into_iter().map(|x| {
        let sx = mapper.x_to_screen(x);
        Line {
            from: ScreenPoint::new(sx, top),
            to: ScreenPoint::new(sx, bottom),
        }
    });
    let horizontal = integer_ticks(w.y_min(), w.y_max()).into_iter().map(|y| {
        let sy = mapper.y_to_screen(y);
        Line {
            from: ScreenPoint::new(left, sy),
            to: ScreenPoint::new(right, sy),
        }
    });
    vertical.chain(horizontal).collect()
}

fn polylines(mapper: &CoordinateMapper, curve: &SampledCurve) -> Vec<Polyline> {
    curve
        .segments()
        .into_iter()
        .map(|segment| Polyline {
            points: segment.iter().map(|p| mapper.to_screen(*p)).collect(),
        })
        .collect()
}

fn sparkle_step(interval: &Interval) -> f64 {
    SPARKLE_STEP.max(interval.width() / MAX_SPARKLES as f64)
}

fn sparkles(
    mapper: &CoordinateMapper,
    registry: &FunctionRegistry,
    params: &SceneParameters,
    constant: f64,
) -> Result<Vec<ScreenPoint>, CoreError> {
    let family = registry.family(params.function)?;
    let members = curve_sampler::sample_family(
        family.as_ref(),
        &[constant],
        params.interval.a(),
        params.interval.b(),
        sparkle_step(&params.interval),
    )?;
    Ok(members
        .into_iter()
        .flat_map(|member| match &params.family_scaling {
            Some(scaling) => member.curve.scaled(scaling).into_points(),
            None => member.curve.into_points(),
        })
        .filter(|p| p.y.is_finite())
        .map(|p| mapper.to_screen(p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(function: FunctionId) -> SceneParameters {
        SceneParameters::new(
            function,
            Interval::new(-2.0, 4.0).unwrap(),
            Viewport::new(800.0, 400.0, 60.0).unwrap(),
        )
    }

    #[test]
    fn test_scenario_scene() {
        let registry = FunctionRegistry::new();
        let mut p = params(FunctionId::Quadratic);
        p.user_estimate = Some(1.0);
        let scene = Scene::build(&p, &registry).unwrap();
        assert!(scene.solution.converged);
        assert_eq!(scene.curve.len(), 1);
        assert_eq!(scene.curve[0].points.len(), 201);
        // user tangent and solver tangent
        assert_eq!(scene.tangents.len(), 2);
        assert_eq!(scene.markers.len(), 4);
        assert!(scene.secant.is_some());
        assert!(scene.bars.is_empty());
        assert_eq!(scene.axes.len(), 2);
    }

    #[test]
    fn test_geometry_stays_in_viewport() {
        let registry = FunctionRegistry::new();
        let scene = Scene::build(&params(FunctionId::Cubic), &registry).unwrap();
        let (w, h) = (scene.viewport.width(), scene.viewport.height());
        for p in scene.curve.iter().flat_map(|l| l.points.iter()) {
            assert!(p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h);
        }
        assert!(scene.mean_line.from.y >= 0.0 && scene.mean_line.from.y <= h);
    }

    #[test]
    fn test_family_with_highlight() {
        let registry = FunctionRegistry::new();
        let mut p = params(FunctionId::Exponential);
        p.family_constants = vec![-3.0, -1.5, 0.0, 1.5, 3.0];
        p.selected_constant = Some(1.5);
        p.family_scaling = Some(FamilyScaling::reference());
        let scene = Scene::build(&p, &registry).unwrap();
        assert_eq!(scene.family.len(), 5);
        let highlighted: Vec<_> = scene.family.iter().filter(|m| m.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].constant, 1.5);
        // [-2, 4] every 0.5
        assert_eq!(scene.sparkles.len(), 13);
    }

    #[test]
    fn test_custom_function_has_no_family() {
        let mut registry = FunctionRegistry::new();
        registry.set_custom_expression("x^2").unwrap();
        let mut p = params(FunctionId::Custom);
        p.family_constants = vec![0.0, 1.0];
        let scene = Scene::build(&p, &registry).unwrap();
        assert!(scene.family.is_empty());
        assert!(scene.solution.converged);
    }

    #[test]
    fn test_non_finite_samples_split_the_curve() {
        let mut registry = FunctionRegistry::new();
        registry.set_custom_expression("ln(x)").unwrap();
        let scene = Scene::build(&params(FunctionId::Custom), &registry).unwrap();
        // x <= 0 is a gap, not a flat run at the fallback value
        assert_eq!(scene.curve.len(), 1);
        assert_eq!(scene.curve[0].points.len(), 134);
    }

    #[test]
    fn test_sparkles_on_wide_interval() {
        let registry = FunctionRegistry::new();
        let mut p = SceneParameters::new(
            FunctionId::Linear,
            Interval::new(0.0, 1.0e6).unwrap(),
            Viewport::new(800.0, 400.0, 60.0).unwrap(),
        );
        p.family_constants = vec![0.0];
        p.selected_constant = Some(0.0);
        let scene = Scene::build(&p, &registry).unwrap();
        assert!(!scene.sparkles.is_empty());
        assert!(scene.sparkles.len() <= MAX_SPARKLES + 1);
        assert_eq!(sparkle_step(&Interval::new(-2.0, 4.0).unwrap()), SPARKLE_STEP);
    }

    #[test]
    fn test_tower_bars() {
        let registry = FunctionRegistry::new();
        let mut p = params(FunctionId::Parabola);
        p.show_tower = true;
        p.show_secant = false;
        let scene = Scene::build(&p, &registry).unwrap();
        assert_eq!(scene.bars.len(), 100);
        assert!(scene.bars.iter().all(|bar| bar.top <= bar.bottom && bar.left < bar.right));
        assert!(scene.tangents.is_empty());
    }

    #[test]
    fn test_explicit_window_and_grid() {
        let registry = FunctionRegistry::new();
        let mut p = params(FunctionId::Sine);
        p.window = Some(DomainWindow::new(-3.0, 5.0, -3.0, 3.0).unwrap());
        let scene = Scene::build(&p, &registry).unwrap();
        // x ticks -3..=5 and y ticks -3..=3
        assert_eq!(scene.grid.len(), 9 + 7);
        assert_eq!(integer_ticks(0.5, 0.7), Vec::<f64>::new());
    }
}
