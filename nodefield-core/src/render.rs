//! Drawing surface abstraction
//!
//! The field renderers only speak in terms of the primitives below. The
//! browser crate implements [`Surface`] on top of `CanvasRenderingContext2d`,
//! the CLI implements it as an SVG writer, and tests use [`Recording`].

use crate::color::Rgba;

/// A point in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at fraction `t` along the segment from `self` to `other`
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// Target of a rendered frame
pub trait Surface {
    /// Adopt a new size in pixels; surfaces with a fixed size ignore it
    fn resize(&mut self, _width: f64, _height: f64) {}

    /// Erase everything in the `width` x `height` area
    fn clear(&mut self, width: f64, height: f64);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba);

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke);

    /// Closed polygon, optionally outlined
    fn fill_polygon(&mut self, points: &[Point], fill: Rgba, outline: Option<Stroke>);

    /// Disc filled with a radial gradient from `inner` at the center to
    /// `outer` at `radius`
    fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba);
}

/// Vertices of a regular hexagon with the first vertex straight up
pub fn hexagon(center: Point, radius: f64) -> [Point; 6] {
    std::array::from_fn(|i| {
        let angle = std::f64::consts::FRAC_PI_3 * i as f64 - std::f64::consts::FRAC_PI_2;
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    })
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize {
        width: f64,
        height: f64,
    },
    Clear {
        width: f64,
        height: f64,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    FillCircle {
        center: Point,
        radius: f64,
        fill: Rgba,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Rgba,
        outline: Option<Stroke>,
    },
    Glow {
        center: Point,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
}

/// Surface that remembers every call, for inspection in tests and tooling
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub calls: Vec<DrawCall>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Point, &Point, &Stroke)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Line { from, to, stroke } => Some((from, to, stroke)),
            _ => None,
        })
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Glow { .. }))
    }

    /// Number of `clear` calls, i.e. frames drawn
    pub fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Clear { .. }))
            .count()
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface for Recording {
    fn resize(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Resize { width, height });
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.calls.push(DrawCall::Line { from, to, stroke });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            fill,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        self.calls.push(DrawCall::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Rgba, outline: Option<Stroke>) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            fill,
            outline,
        });
    }

    fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        self.calls.push(DrawCall::Glow {
            center,
            radius,
            inner,
            outer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn lerp_along_segment() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(100.0, 30.0);
        assert_eq!(a.lerp(b, 0.25), Point::new(25.0, 15.0));
    }

    #[test]
    fn hexagon_starts_at_top() {
        let points = hexagon(Point::new(10.0, 10.0), 5.0);
        assert!((points[0].x - 10.0).abs() < 1e-9);
        assert!((points[0].y - 5.0).abs() < 1e-9);
        for p in points {
            assert!((p.distance(Point::new(10.0, 10.0)) - 5.0).abs() < 1e-9);
        }
    }
}
