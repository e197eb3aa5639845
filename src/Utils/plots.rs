//! Draws a [`Scene`] with plotters. `.svg` files go through the SVG backend, anything else through
//! the bitmap backend (format from the extension).
use crate::errors::RenderError;
use crate::numerical::domain::ScreenPoint;
use crate::numerical::scene::{Line, MarkerKind, Polyline, Scene};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// titles and marker labels; needs a system font
    pub draw_labels: bool,
    pub draw_grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            draw_labels: true,
            draw_grid: true,
        }
    }
}

const GRID: RGBColor = RGBColor(225, 225, 225);
const CURVE: RGBColor = RGBColor(30, 90, 200);
const MEAN: RGBColor = RGBColor(210, 40, 40);
const SECANT: RGBColor = RGBColor(40, 150, 60);
const TANGENT: RGBColor = RGBColor(230, 130, 20);
const TOWER: RGBColor = RGBColor(120, 170, 230);
const SPARKLE: RGBColor = RGBColor(240, 190, 30);

fn pixel(p: &ScreenPoint) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn backend_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Backend(e.to_string())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    line: &Line,
    style: ShapeStyle,
) -> Result<(), RenderError> {
    root.draw(&PathElement::new(vec![pixel(&line.from), pixel(&line.to)], style))
        .map_err(backend_error)
}

fn draw_polyline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    polyline: &Polyline,
    style: ShapeStyle,
) -> Result<(), RenderError> {
    if polyline.points.len() < 2 {
        return Ok(());
    }
    let points: Vec<(i32, i32)> = polyline.points.iter().map(pixel).collect();
    root.draw(&PathElement::new(points, style)).map_err(backend_error)
}

fn marker_color(kind: MarkerKind) -> RGBColor {
    match kind {
        MarkerKind::IntervalStart | MarkerKind::IntervalEnd => BLACK,
        MarkerKind::UserEstimate => TANGENT,
        MarkerKind::SolverPoint => MEAN,
    }
}

/// Paints the whole scene, back to front.
pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(backend_error)?;

    if options.draw_grid {
        for line in &scene.grid {
            draw_line(root, line, GRID.stroke_width(1))?;
        }
    }
    for line in &scene.axes {
        draw_line(root, line, BLACK.stroke_width(1))?;
    }

    for bar in &scene.bars {
        let corners = [
            (bar.left.round() as i32, bar.top.round() as i32),
            (bar.right.round() as i32, bar.bottom.round() as i32),
        ];
        root.draw(&Rectangle::new(corners, TOWER.mix(0.5).filled()))
            .map_err(backend_error)?;
        root.draw(&Rectangle::new(corners, TOWER.stroke_width(1)))
            .map_err(backend_error)?;
    }

    for (i, member) in scene.family.iter().enumerate() {
        let width = if member.highlighted { 3 } else { 1 };
        let style = Palette99::pick(i).stroke_width(width);
        for polyline in &member.polylines {
            draw_polyline(root, polyline, style)?;
        }
    }
    for sparkle in &scene.sparkles {
        root.draw(&Circle::new(pixel(sparkle), 2, SPARKLE.filled()))
            .map_err(backend_error)?;
    }

    for polyline in &scene.curve {
        draw_polyline(root, polyline, CURVE.stroke_width(2))?;
    }
    draw_line(root, &scene.mean_line, MEAN.stroke_width(1))?;
    if let Some(secant) = &scene.secant {
        draw_line(root, secant, SECANT.stroke_width(2))?;
    }
    for tangent in &scene.tangents {
        draw_line(root, tangent, TANGENT.stroke_width(2))?;
    }

    for marker in &scene.markers {
        let color = marker_color(marker.kind);
        root.draw(&Circle::new(pixel(&marker.position), 5, color.filled()))
            .map_err(backend_error)?;
        if options.draw_labels {
            let (x, y) = pixel(&marker.position);
            root.draw(&Text::new(
                marker.label.clone(),
                (x + 8, y - 16),
                ("sans-serif", 14).into_font().color(&color),
            ))
            .map_err(backend_error)?;
        }
    }

    if options.draw_labels {
        let caption = format!(
            "{}   mean = {:.4}   c = {:.4}",
            scene.title, scene.solution.mean_value, scene.solution.point
        );
        root.draw(&Text::new(caption, (10, 10), ("sans-serif", 18).into_font()))
            .map_err(backend_error)?;
    }
    Ok(())
}

/// Renders `scene` into `filename` at the scene's viewport size.
pub fn render_scene(
    scene: &Scene,
    filename: &Path,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let size = (
        scene.viewport.width().round() as u32,
        scene.viewport.height().round() as u32,
    );
    let is_svg = filename
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(filename, size).into_drawing_area();
        draw_scene(&root, scene, options)?;
        root.present()
            .map_err(|e| RenderError::Output(format!("{}: {}", filename.display(), e)))?;
    } else {
        let root = BitMapBackend::new(filename, size).into_drawing_area();
        draw_scene(&root, scene, options)?;
        root.present()
            .map_err(|e| RenderError::Output(format!("{}: {}", filename.display(), e)))?;
    }
    info!("scene written to {}", filename.display());
    Ok(())
}
