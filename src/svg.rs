//! SVG rendering of a single frame
//!
//! [`SvgSurface`] records drawing calls as SVG elements. Clearing starts a
//! new frame, so after running a scene the surface holds its last frame.

use askama::Template;
use nodefield_core::color::Rgba;
use nodefield_core::render::{Point, Stroke, Surface};

#[derive(Template)]
#[template(path = "frame.svg")]
struct FrameTemplate<'a> {
    width: String,
    height: String,
    defs: &'a [String],
    elements: &'a [String],
}

/// Surface writing SVG markup
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    defs: Vec<String>,
    elements: Vec<String>,
    gradients: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: Vec::new(),
            elements: Vec::new(),
            gradients: 0,
        }
    }

    /// Number of drawn elements in the current frame
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Render the current frame as a standalone SVG document
    pub fn to_document(&self) -> Result<String, askama::Error> {
        FrameTemplate {
            width: num(self.width),
            height: num(self.height),
            defs: &self.defs,
            elements: &self.elements,
        }
        .render()
    }
}

/// Two decimals are plenty for pixel coordinates
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn paint(attr: &str, color: Rgba) -> String {
    format!(
        r#"{attr}="{}" {attr}-opacity="{}""#,
        color.rgb.to_hex(),
        num(color.alpha.clamp(0.0, 1.0))
    )
}

fn stroke_attrs(stroke: &Stroke) -> String {
    format!(
        r#"{} stroke-width="{}""#,
        paint("stroke", stroke.color),
        num(stroke.width)
    )
}

impl Surface for SvgSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, _width: f64, _height: f64) {
        self.defs.clear();
        self.elements.clear();
        self.gradients = 0;
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        if stroke.color.is_transparent() {
            return;
        }
        self.elements.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(&stroke)
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba) {
        if fill.is_transparent() {
            return;
        }
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            paint("fill", fill)
        ));
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        if stroke.color.is_transparent() {
            return;
        }
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" {}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            stroke_attrs(&stroke)
        ));
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Rgba, outline: Option<Stroke>) {
        if points.is_empty() {
            return;
        }
        let points = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        let outline = outline
            .map(|stroke| format!(" {}", stroke_attrs(&stroke)))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"<polygon points="{points}" {}{outline}/>"#,
            paint("fill", fill)
        ));
    }

    fn fill_radial_glow(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        if inner.is_transparent() && outer.is_transparent() {
            return;
        }
        let id = format!("glow{}", self.gradients);
        self.gradients += 1;
        self.defs.push(format!(
            r#"<radialGradient id="{id}"><stop offset="0" stop-color="{}" stop-opacity="{}"/><stop offset="1" stop-color="{}" stop-opacity="{}"/></radialGradient>"#,
            inner.rgb.to_hex(),
            num(inner.alpha.clamp(0.0, 1.0)),
            outer.rgb.to_hex(),
            num(outer.alpha.clamp(0.0, 1.0)),
        ));
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="url(#{id})"/>"#,
            num(center.x),
            num(center.y),
            num(radius)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodefield_core::color::palette;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.126), "0.13");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut svg = SvgSurface::new(100.0, 100.0);
        svg.fill_circle(Point::new(1.0, 1.0), 2.0, palette::PRIMARY.with_alpha(1.0));
        svg.clear(100.0, 100.0);
        svg.fill_circle(Point::new(5.0, 5.0), 2.0, palette::PRIMARY.with_alpha(1.0));

        assert_eq!(svg.element_count(), 1);
    }

    #[test]
    fn transparent_shapes_are_not_written() {
        let mut svg = SvgSurface::new(100.0, 100.0);
        let invisible = Stroke::new(palette::SLATE.with_alpha(0.0), 1.0);
        svg.stroke_line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), invisible);
        svg.stroke_circle(Point::new(5.0, 5.0), 3.0, invisible);

        assert_eq!(svg.element_count(), 0);
    }

    #[test]
    fn document_snapshot() {
        let mut svg = SvgSurface::new(200.0, 100.0);
        svg.clear(200.0, 100.0);
        svg.stroke_line(
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
            Stroke::new(palette::SLATE.with_alpha(0.25), 1.0),
        );
        svg.fill_radial_glow(
            Point::new(50.0, 40.0),
            12.0,
            palette::PRIMARY.with_alpha(0.4),
            palette::PRIMARY.with_alpha(0.0),
        );
        svg.fill_polygon(
            &[
                Point::new(0.0, -3.0),
                Point::new(3.0, 0.0),
                Point::new(0.0, 3.0),
            ],
            palette::SECONDARY.with_alpha(1.0),
            Some(Stroke::new(palette::WHITE.with_alpha(0.2), 1.0)),
        );

        insta::assert_snapshot!(svg.to_document().unwrap(), @r##"
        <svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
          <defs>
            <radialGradient id="glow0"><stop offset="0" stop-color="#4b4b9e" stop-opacity="0.4"/><stop offset="1" stop-color="#4b4b9e" stop-opacity="0"/></radialGradient>
          </defs>
          <line x1="10" y1="10" x2="50" y2="40" stroke="#94a3b8" stroke-opacity="0.25" stroke-width="1"/>
          <circle cx="50" cy="40" r="12" fill="url(#glow0)"/>
          <polygon points="0,-3 3,0 0,3" fill="#64748b" fill-opacity="1" stroke="#ffffff" stroke-opacity="0.2" stroke-width="1"/>
        </svg>
        "##);
    }
}
