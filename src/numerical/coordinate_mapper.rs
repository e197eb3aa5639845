//! Affine transform between the mathematical plane and the padded viewport.
//!
//! ```text
//!   sx = p + (x - x_min) / (x_max - x_min) * (w - 2p)
//!   sy = h - p - (y - y_min) / (y_max - y_min) * (h - 2p)
//! ```
//! The vertical axis is flipped: larger `y` is higher on screen, i.e. a smaller pixel row.
use crate::errors::PreconditionViolation;
use crate::numerical::domain::{DomainWindow, MathPoint, ScreenPoint, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    window: DomainWindow,
    viewport: Viewport,
}

impl CoordinateMapper {
    /// Both rectangles are already validated, so construction cannot fail.
    pub fn new(window: DomainWindow, viewport: Viewport) -> Self {
        Self { window, viewport }
    }

    /// Builds the mapper from raw numbers, validating both rectangles.
    pub fn from_bounds(
        (x_min, x_max, y_min, y_max): (f64, f64, f64, f64),
        (width, height, padding): (f64, f64, f64),
    ) -> Result<Self, PreconditionViolation> {
        let window = DomainWindow::new(x_min, x_max, y_min, y_max)?;
        let viewport = Viewport::new(width, height, padding)?;
        Ok(Self::new(window, viewport))
    }

    pub fn window(&self) -> &DomainWindow {
        &self.window
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn x_to_screen(&self, x: f64) -> f64 {
        let w = &self.window;
        let v = &self.viewport;
        v.padding() + (x - w.x_min()) / w.x_span() * v.inner_width()
    }

    pub fn y_to_screen(&self, y: f64) -> f64 {
        let w = &self.window;
        let v = &self.viewport;
        v.height() - v.padding() - (y - w.y_min()) / w.y_span() * v.inner_height()
    }

    pub fn x_to_math(&self, sx: f64) -> f64 {
        let w = &self.window;
        let v = &self.viewport;
        w.x_min() + (sx - v.padding()) / v.inner_width() * w.x_span()
    }

    pub fn y_to_math(&self, sy: f64) -> f64 {
        let w = &self.window;
        let v = &self.viewport;
        w.y_min() + (v.height() - v.padding() - sy) / v.inner_height() * w.y_span()
    }

    pub fn to_screen(&self, p: MathPoint) -> ScreenPoint {
        ScreenPoint::new(self.x_to_screen(p.x), self.y_to_screen(p.y))
    }

    pub fn to_math(&self, s: ScreenPoint) -> MathPoint {
        MathPoint::new(self.x_to_math(s.x), self.y_to_math(s.y))
    }

    /// Maps a polyline; points with a non-finite coordinate map to `None` so the caller can
    /// break the line there.
    pub fn map_points(&self, points: &[MathPoint]) -> Vec<Option<ScreenPoint>> {
        points
            .iter()
            .map(|p| {
                if p.x.is_finite() && p.y.is_finite() {
                    Some(self.to_screen(*p))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Screen rectangle `(left, top, right, bottom)` of the drawable area.
    pub fn plot_area(&self) -> (f64, f64, f64, f64) {
        let v = &self.viewport;
        (
            v.padding(),
            v.padding(),
            v.width() - v.padding(),
            v.height() - v.padding(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::from_bounds((-2.0, 4.0, 0.0, 10.0), (800.0, 400.0, 60.0)).unwrap()
    }

    #[test]
    fn test_corners_map_to_padded_rectangle() {
        let m = mapper();
        assert_eq!(m.to_screen(MathPoint::new(-2.0, 0.0)), ScreenPoint::new(60.0, 340.0));
        assert_eq!(m.to_screen(MathPoint::new(4.0, 10.0)), ScreenPoint::new(740.0, 60.0));
        assert_eq!(m.plot_area(), (60.0, 60.0, 740.0, 340.0));
    }

    #[test]
    fn test_vertical_axis_is_flipped() {
        let m = mapper();
        let low = m.to_screen(MathPoint::new(0.0, 1.0));
        let high = m.to_screen(MathPoint::new(0.0, 9.0));
        assert!(high.y < low.y);
        assert_eq!(low.x, high.x);
    }

    #[test]
    fn test_roundtrip() {
        let m = mapper();
        for &(x, y) in &[(-2.0, 0.0), (0.3, 7.1), (1.0, 3.0), (3.99, 9.5)] {
            let back = m.to_math(m.to_screen(MathPoint::new(x, y)));
            assert_relative_eq!(back.x, x, epsilon = 1e-9);
            assert_relative_eq!(back.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inverse_from_pixels() {
        let m = mapper();
        // centre of the drawable area is the centre of the window
        let centre = m.to_math(ScreenPoint::new(400.0, 200.0));
        assert_relative_eq!(centre.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(centre.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_points_break_the_polyline() {
        let m = mapper();
        let mapped = m.map_points(&[
            MathPoint::new(0.0, 1.0),
            MathPoint::new(0.5, f64::NAN),
            MathPoint::new(1.0, 2.0),
        ]);
        assert!(mapped[0].is_some());
        assert!(mapped[1].is_none());
        assert!(mapped[2].is_some());
    }

    #[test]
    fn test_degenerate_window_rejected() {
        assert!(matches!(
            CoordinateMapper::from_bounds((1.0, 1.0, 0.0, 1.0), (800.0, 400.0, 60.0)),
            Err(PreconditionViolation::DegenerateWindow { axis: 'x', .. })
        ));
        assert!(matches!(
            CoordinateMapper::from_bounds((0.0, 1.0, 0.0, 1.0), (100.0, 100.0, 60.0)),
            Err(PreconditionViolation::InvalidViewport { .. })
        ));
    }
}
