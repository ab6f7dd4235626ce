use std::collections::HashMap;
use std::f64::consts::TAU;

use pitch_core::assets::{Icon, IconSet};
use pitch_core::config::Config;
use pitch_core::geometry::Rect;
use pitch_core::render::{FIELD_DASH, LABEL_FONT_PX, LABEL_OUTLINE, Painter, Stroke, render_field};
use pitch_core::Point;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// 2D-context back-end of the board renderer.
pub struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
    icons: Option<(&'a IconSet, &'a HashMap<Icon, HtmlImageElement>)>,
    field: Option<&'a HtmlCanvasElement>,
}

impl<'a> CanvasPainter<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        CanvasPainter {
            ctx,
            icons: None,
            field: None,
        }
    }

    pub fn with_icons(mut self, set: &'a IconSet, images: &'a HashMap<Icon, HtmlImageElement>) -> Self {
        self.icons = Some((set, images));
        self
    }

    /// Blit this pre-rendered buffer instead of painting markings each frame.
    pub fn with_field(mut self, field: &'a HtmlCanvasElement) -> Self {
        self.field = Some(field);
        self
    }

    fn apply_stroke(&self, s: &Stroke) {
        set_stroke_style(self.ctx, s.color);
        self.ctx.set_line_width(s.width);
        let dash = js_sys::Array::new();
        if s.dashed {
            for d in FIELD_DASH {
                dash.push(&JsValue::from_f64(d));
            }
        }
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn trace(&self, points: &[Point]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
        }
    }
}

impl Painter for CanvasPainter<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_rect(&mut self, r: Rect, stroke: &Stroke) {
        self.apply_stroke(stroke);
        self.ctx.stroke_rect(r.x, r.y, r.w, r.h);
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.apply_stroke(stroke);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.trace(points);
        self.ctx.stroke();
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: &Stroke) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, start, end);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &str, outline: Option<&Stroke>) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        set_fill_style(self.ctx, fill);
        self.ctx.fill();
        if let Some(o) = outline {
            self.apply_stroke(o);
            self.ctx.stroke();
        }
    }

    fn fill_polygon(&mut self, points: &[Point], fill: &str) {
        self.trace(points);
        self.ctx.close_path();
        set_fill_style(self.ctx, fill);
        self.ctx.fill();
    }

    fn label(&mut self, text: &str, at: Point) {
        self.ctx.set_font(&format!("{LABEL_FONT_PX}px sans-serif"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("alphabetic");
        // Outline for contrast
        self.ctx.set_line_width(3.0);
        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
        set_stroke_style(self.ctx, LABEL_OUTLINE);
        let _ = self.ctx.stroke_text(text, at.x, at.y);
        set_fill_style(self.ctx, "black");
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }

    fn draw_icon(&mut self, icon: Icon, center: Point, size: f64) -> bool {
        let Some((set, images)) = self.icons else {
            return false;
        };
        if !set.is_ready(icon) {
            return false;
        }
        let Some(img) = images.get(&icon) else {
            return false;
        };
        let half = size / 2.0;
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                img,
                center.x - half,
                center.y - half,
                size,
                size,
            )
            .is_ok()
    }

    fn field_layer(&mut self, width: f64, height: f64, cfg: &Config) {
        match self.field {
            Some(buf) => {
                let _ = self
                    .ctx
                    .draw_image_with_html_canvas_element_and_dw_and_dh(buf, 0.0, 0.0, width, height);
            }
            None => render_field(self, width, height, cfg),
        }
    }
}
