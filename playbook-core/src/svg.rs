use std::f64::consts::TAU;
use std::fmt::Write as _;

use pitch_core::config::Config;
use pitch_core::geometry::Rect;
use pitch_core::render::{
    FIELD_DASH, LABEL_FONT_PX, LABEL_OUTLINE, Painter, Stroke, compose_frame, render_field,
};
use pitch_core::{Point, Scene};

/// Grass behind the markings; the browser gets it from CSS.
pub const GRASS: &str = "#4CAF50";

/// Collects board drawing calls as SVG elements.
#[derive(Clone, Debug, Default)]
pub struct SvgPainter {
    width: f64,
    height: f64,
    body: String,
}

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn stroke_attrs(s: &Stroke) -> String {
    let mut out = format!(
        "fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"",
        s.color, s.width
    );
    if s.dashed {
        let _ = write!(out, " stroke-dasharray=\"{} {}\"", FIELD_DASH[0], FIELD_DASH[1]);
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SvgPainter {
    pub fn new(width: f64, height: f64) -> Self {
        SvgPainter {
            width,
            height,
            body: String::new(),
        }
    }

    /// Complete document with the collected elements.
    pub fn finish(&self) -> String {
        let mut s = String::new();
        s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            s,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" stroke-linecap=\"round\" stroke-linejoin=\"round\">",
            w = self.width.ceil(),
            h = self.height.ceil(),
        );
        s.push_str(&self.body);
        s.push_str("</svg>\n");
        s
    }
}

impl Painter for SvgPainter {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.body.clear();
        let _ = writeln!(
            self.body,
            "<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{GRASS}\"/>"
        );
    }

    fn stroke_rect(&mut self, r: Rect, stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {}/>",
            r.x,
            r.y,
            r.w,
            r.h,
            stroke_attrs(stroke)
        );
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let _ = writeln!(
            self.body,
            "<polyline points=\"{}\" {}/>",
            points_attr(points),
            stroke_attrs(stroke)
        );
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: &Stroke) {
        let sweep = end - start;
        if sweep >= TAU - 1e-9 {
            let _ = writeln!(
                self.body,
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {}/>",
                center.x,
                center.y,
                radius,
                stroke_attrs(stroke)
            );
            return;
        }
        let (sx, sy) = (center.x + radius * start.cos(), center.y + radius * start.sin());
        let (ex, ey) = (center.x + radius * end.cos(), center.y + radius * end.sin());
        // y points down, so increasing angles run clockwise: sweep-flag 1
        let large = u8::from(sweep > std::f64::consts::PI);
        let _ = writeln!(
            self.body,
            "<path d=\"M {sx:.2} {sy:.2} A {radius:.2} {radius:.2} 0 {large} 1 {ex:.2} {ey:.2}\" {}/>",
            stroke_attrs(stroke)
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &str, outline: Option<&Stroke>) {
        let edge = outline
            .map(|o| format!(" stroke=\"{}\" stroke-width=\"{:.2}\"", o.color, o.width))
            .unwrap_or_default();
        let _ = writeln!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\"{edge}/>",
            center.x, center.y, radius
        );
    }

    fn fill_polygon(&mut self, points: &[Point], fill: &str) {
        let _ = writeln!(
            self.body,
            "<polygon points=\"{}\" fill=\"{fill}\" stroke=\"none\"/>",
            points_attr(points)
        );
    }

    fn label(&mut self, text: &str, at: Point) {
        let _ = writeln!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"{}\" fill=\"black\" stroke=\"{}\" stroke-width=\"3\" paint-order=\"stroke\">{}</text>",
            at.x,
            at.y,
            LABEL_FONT_PX,
            LABEL_OUTLINE,
            svg_escape(text)
        );
    }
}

/// The whole board as an SVG document, in the same paint order as the canvas.
pub fn build_diagram_svg(scene: &Scene, cfg: &Config) -> String {
    let mut p = SvgPainter::new(scene.width, scene.height);
    compose_frame(&mut p, scene, cfg);
    p.finish()
}

/// Markings only.
pub fn build_field_svg(width: f64, height: f64, cfg: &Config) -> String {
    let mut p = SvgPainter::new(width, height);
    render_field(&mut p, width, height, cfg);
    p.finish()
}
