//! 2D Canvas drawing surface
//!
//! Implements the core [`Surface`] primitives on a `CanvasRenderingContext2d`.

use nodefield_core::color::Rgba;
use nodefield_core::render::{Point, Stroke, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// 2D Canvas surface
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    /// Create surface from canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("Failed to get 2d context: {:?}", e))?
            .ok_or("2d context not available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn circle_path(&self, center: Point, radius: f64) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.to_string());
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
    }
}

impl Surface for Canvas2dSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.apply_stroke(&stroke);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&fill.to_string());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        self.circle_path(center, radius);
        self.apply_stroke(&stroke);
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Rgba, outline: Option<Stroke>) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&fill.to_string());
        self.ctx.fill();

        if let Some(stroke) = outline {
            self.apply_stroke(&stroke);
        }
    }

    fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        let gradient = match self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        {
            Ok(gradient) => gradient,
            Err(err) => {
                tracing::warn!(?err, "radial gradient unavailable");
                return;
            }
        };
        // Color stops only fail on malformed CSS, which Rgba never produces
        gradient.add_color_stop(0.0, &inner.to_string()).ok();
        gradient.add_color_stop(1.0, &outer.to_string()).ok();

        self.circle_path(center, radius);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill();
    }
}
