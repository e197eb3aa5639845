//! # Curve Sampler
//!
//! Turns a function over `[a, b]` into an ordered polyline on the grid
//! `a, a + step, a + 2 step, ...`, the last sample clamped to exactly `b`.
//!
//! Gap policy: a non-finite `f(x)` is stored as a point with `y = NaN`. The `x` grid therefore
//! stays identical for every curve over the same interval and step, and [`SampledCurve::segments`]
//! splits the polyline at the gaps for drawing. Sampling itself never fails on a bad value.
use crate::errors::PreconditionViolation;
use crate::numerical::domain::MathPoint;
use crate::numerical::scalar_function::{AntiderivativeFamily, ScalarFunction};
use itertools::Itertools;
use log::debug;

/// Upper bound on the number of samples a single call may produce.
pub const MAX_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampledCurve {
    points: Vec<MathPoint>,
}

impl SampledCurve {
    pub fn from_points(points: Vec<MathPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[MathPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<MathPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&MathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&MathPoint> {
        self.points.last()
    }

    /// Number of samples stored as gaps.
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| !p.y.is_finite()).count()
    }

    /// Maximal runs of finite points, in order.
    pub fn segments(&self) -> Vec<&[MathPoint]> {
        self.points
            .split(|p| !p.y.is_finite())
            .filter(|run| !run.is_empty())
            .collect()
    }

    /// `(min, max)` of the finite `y` values.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.y)
            .filter(|y| y.is_finite())
            .minmax()
            .into_option()
    }

    /// Same grid, `y` passed through `scaling`.
    pub fn scaled(&self, scaling: &FamilyScaling) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| MathPoint::new(p.x, scaling.apply(p.y)))
                .collect(),
        }
    }
}

/// Display scaling for steep antiderivatives: `y / divisor`, then clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyScaling {
    pub divisor: f64,
    pub clamp: (f64, f64),
}

impl FamilyScaling {
    /// Divide by 4 and clamp to [-4, 4].
    pub fn reference() -> Self {
        Self {
            divisor: 4.0,
            clamp: (-4.0, 4.0),
        }
    }

    /// Gaps stay gaps.
    pub fn apply(&self, y: f64) -> f64 {
        if !y.is_finite() {
            return y;
        }
        (y / self.divisor).clamp(self.clamp.0, self.clamp.1)
    }
}

impl Default for FamilyScaling {
    fn default() -> Self {
        Self::reference()
    }
}

/// One member `F(x) + C` of a sampled family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyMember {
    pub constant: f64,
    pub curve: SampledCurve,
}

/// The `x` grid for `[a, b]` with the given step. `a == b` gives the single point `[a]`.
pub fn sample_grid(a: f64, b: f64, step: f64) -> Result<Vec<f64>, PreconditionViolation> {
    if !a.is_finite() || !b.is_finite() {
        return Err(PreconditionViolation::DegenerateInterval { a, b });
    }
    if a > b {
        return Err(PreconditionViolation::ReversedBounds { a, b });
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(PreconditionViolation::InvalidStep(step));
    }
    let ratio = (b - a) / step;
    if !ratio.is_finite() || ratio > MAX_SAMPLES as f64 {
        return Err(PreconditionViolation::InvalidStep(step));
    }
    let mut n = ratio.ceil() as usize;
    // drop a last step that would only repeat b because of rounding
    if n > 0 && a + (n - 1) as f64 * step >= b - 1e-9 * step {
        n -= 1;
    }
    let mut grid: Vec<f64> = (0..=n).map(|i| (a + i as f64 * step).min(b)).collect();
    grid[n] = b;
    Ok(grid)
}

/// Samples `f` on the grid of [`sample_grid`].
pub fn sample<F>(f: &F, a: f64, b: f64, step: f64) -> Result<SampledCurve, PreconditionViolation>
where
    F: ScalarFunction + ?Sized,
{
    let grid = sample_grid(a, b, step)?;
    let points: Vec<MathPoint> = grid
        .into_iter()
        .map(|x| {
            let y = f.evaluate(x);
            MathPoint::new(x, if y.is_finite() { y } else { f64::NAN })
        })
        .collect();
    let curve = SampledCurve::from_points(points);
    let gaps = curve.gap_count();
    if gaps > 0 {
        debug!("{}: {} of {} samples are gaps", f.name(), gaps, curve.len());
    }
    Ok(curve)
}

/// Samples one curve per constant, all on the same grid, in the order of `constants`.
pub fn sample_family<A>(
    family: &A,
    constants: &[f64],
    a: f64,
    b: f64,
    step: f64,
) -> Result<Vec<FamilyMember>, PreconditionViolation>
where
    A: AntiderivativeFamily + ?Sized,
{
    let grid = sample_grid(a, b, step)?;
    Ok(constants
        .iter()
        .map(|&constant| {
            let points = grid
                .iter()
                .map(|&x| {
                    let y = family.evaluate_member(x, constant);
                    MathPoint::new(x, if y.is_finite() { y } else { f64::NAN })
                })
                .collect();
            FamilyMember {
                constant,
                curve: SampledCurve::from_points(points),
            }
        })
        .collect())
}
