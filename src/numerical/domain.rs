//! Validated value types shared by the numeric core: the interval `[a, b]`, the visible
//! mathematical window and the pixel viewport. Every constructor checks its invariant once so
//! downstream code never re-validates.
use crate::errors::PreconditionViolation;
use itertools::Itertools;

/// A point of the mathematical plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MathPoint {
    pub x: f64,
    pub y: f64,
}

impl MathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in viewport units, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed interval with finite bounds and `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    a: f64,
    b: f64,
}

impl Interval {
    pub fn new(a: f64, b: f64) -> Result<Self, PreconditionViolation> {
        if !a.is_finite() || !b.is_finite() || a == b {
            return Err(PreconditionViolation::DegenerateInterval { a, b });
        }
        if a > b {
            return Err(PreconditionViolation::ReversedBounds { a, b });
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn width(&self) -> f64 {
        self.b - self.a
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.a + self.b)
    }

    pub fn contains(&self, x: f64) -> bool {
        self.a <= x && x <= self.b
    }
}

/// Visible rectangle `[x_min, x_max] × [y_min, y_max]` of the mathematical plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainWindow {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl DomainWindow {
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<Self, PreconditionViolation> {
        check_axis('x', x_min, x_max)?;
        check_axis('y', y_min, y_max)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Smallest window holding every finite point of `points`, padded on each side by
    /// `margin` times the span. A flat range is widened by one unit each way, an empty input
    /// yields the unit square around the origin.
    pub fn fit<'a, I>(points: I, margin: f64) -> Result<Self, PreconditionViolation>
    where
        I: IntoIterator<Item = &'a MathPoint>,
    {
        let finite: Vec<&MathPoint> = points
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        let (x_min, x_max) = widen(
            finite.iter().map(|p| p.x).minmax().into_option(),
            margin,
        );
        let (y_min, y_max) = widen(
            finite.iter().map(|p| p.y).minmax().into_option(),
            margin,
        );
        Self::new(x_min, x_max, y_min, y_max)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: MathPoint) -> bool {
        self.x_min <= p.x && p.x <= self.x_max && self.y_min <= p.y && p.y <= self.y_max
    }
}

fn check_axis(axis: char, min: f64, max: f64) -> Result<(), PreconditionViolation> {
    if min.is_finite() && max.is_finite() && max > min {
        Ok(())
    } else {
        Err(PreconditionViolation::DegenerateWindow { axis, min, max })
    }
}

fn widen(range: Option<(f64, f64)>, margin: f64) -> (f64, f64) {
    match range {
        None => (-1.0, 1.0),
        Some((lo, hi)) if hi - lo <= f64::EPSILON * lo.abs().max(1.0) => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * margin.max(0.0);
            (lo - pad, hi + pad)
        }
    }
}

/// Pixel rectangle `width × height` with a uniform `padding` on all four sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: f64) -> Result<Self, PreconditionViolation> {
        let valid = width.is_finite()
            && height.is_finite()
            && padding.is_finite()
            && padding >= 0.0
            && width > 2.0 * padding
            && height > 2.0 * padding;
        if valid {
            Ok(Self {
                width,
                height,
                padding,
            })
        } else {
            Err(PreconditionViolation::InvalidViewport {
                width,
                height,
                padding,
            })
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Drawable width between the paddings.
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_validation() {
        let interval = Interval::new(-2.0, 4.0).unwrap();
        assert_eq!(interval.width(), 6.0);
        assert_eq!(interval.midpoint(), 1.0);
        assert!(interval.contains(-2.0) && interval.contains(4.0));
        assert!(!interval.contains(4.0001));
        assert_eq!(
            Interval::new(1.0, 1.0),
            Err(PreconditionViolation::DegenerateInterval { a: 1.0, b: 1.0 })
        );
        assert_eq!(
            Interval::new(3.0, 0.0),
            Err(PreconditionViolation::ReversedBounds { a: 3.0, b: 0.0 })
        );
        assert!(Interval::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_window_validation() {
        assert!(DomainWindow::new(-5.0, 5.0, -3.0, 3.0).is_ok());
        assert_eq!(
            DomainWindow::new(0.0, 0.0, -1.0, 1.0),
            Err(PreconditionViolation::DegenerateWindow {
                axis: 'x',
                min: 0.0,
                max: 0.0
            })
        );
        assert!(matches!(
            DomainWindow::new(0.0, 1.0, 2.0, -2.0),
            Err(PreconditionViolation::DegenerateWindow { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_window_fit() {
        let points = vec![
            MathPoint::new(0.0, 1.0),
            MathPoint::new(2.0, f64::NAN),
            MathPoint::new(4.0, 3.0),
        ];
        let window = DomainWindow::fit(&points, 0.1).unwrap();
        assert!((window.x_min() + 0.4).abs() < 1e-12);
        assert!((window.x_max() - 4.4).abs() < 1e-12);
        assert!((window.y_min() - 0.8).abs() < 1e-12);
        assert!((window.y_max() - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_window_fit_flat_and_empty() {
        let flat = vec![MathPoint::new(-1.0, 2.0), MathPoint::new(1.0, 2.0)];
        let window = DomainWindow::fit(&flat, 0.1).unwrap();
        assert_eq!((window.y_min(), window.y_max()), (1.0, 3.0));
        let empty: Vec<MathPoint> = Vec::new();
        let window = DomainWindow::fit(&empty, 0.1).unwrap();
        assert_eq!(window.x_span(), 2.0);
    }

    #[test]
    fn test_viewport_validation() {
        let viewport = Viewport::new(800.0, 400.0, 60.0).unwrap();
        assert_eq!(viewport.inner_width(), 680.0);
        assert_eq!(viewport.inner_height(), 280.0);
        assert!(Viewport::new(100.0, 100.0, 50.0).is_err());
        assert!(Viewport::new(100.0, 100.0, -1.0).is_err());
    }
}
