//! Paint order and styles of the board, independent of the drawing back-end.

use crate::assets::Icon;
use crate::config::Config;
use crate::geometry::{FieldMark, Rect, arrowhead, field_markings};
use crate::models::{Arrow, Point, Team};
use crate::scene::Scene;

pub const FIELD_LINE: &str = "white";
pub const FIELD_LINE_WIDTH: f64 = 2.0;
pub const FIELD_DASH: [f64; 2] = [5.0, 5.0];
pub const PATH_COLOR: &str = "red";
pub const ARROW_COLOR: &str = "#ff3b30";
pub const DRILL_WIDTH: f64 = 3.0;
pub const CONE_COLOR: &str = "#ff8c00";
pub const HOME_COLOR: &str = "#FF5A5F";
pub const OPPONENT_COLOR: &str = "#1E88E5";
pub const BALL_FILL: &str = "#ffffff";
pub const BALL_OUTLINE: &str = "#222";
pub const LABEL_FONT_PX: f64 = 12.0;
pub const LABEL_OUTLINE: &str = "rgba(255,255,255,0.9)";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub dashed: bool,
}

impl<'a> Stroke<'a> {
    pub const fn solid(color: &'a str, width: f64) -> Self {
        Stroke {
            color,
            width,
            dashed: false,
        }
    }
}

/// Drawing back-end. Coordinates are CSS pixels.
pub trait Painter {
    fn clear(&mut self, width: f64, height: f64);
    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke);
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);
    /// Clockwise arc from `start` to `end` (radians, `end >= start`).
    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: &Stroke);
    fn fill_circle(&mut self, center: Point, radius: f64, fill: &str, outline: Option<&Stroke>);
    fn fill_polygon(&mut self, points: &[Point], fill: &str);
    /// White-outlined black text centered horizontally on `at`, which is the
    /// baseline position.
    fn label(&mut self, text: &str, at: Point);

    /// Draws `icon` centered on `center`. Returns false when the image is
    /// not available so the caller can draw a fallback shape.
    fn draw_icon(&mut self, _icon: Icon, _center: Point, _size: f64) -> bool {
        false
    }

    /// Static field markings. Back-ends that keep an offscreen copy blit it
    /// here instead of re-painting.
    fn field_layer(&mut self, width: f64, height: f64, cfg: &Config)
    where
        Self: Sized,
    {
        paint_markings(self, width, height, cfg);
    }
}

/// Paints the static field from scratch.
pub fn render_field<P: Painter>(painter: &mut P, width: f64, height: f64, cfg: &Config) {
    painter.clear(width, height);
    paint_markings(painter, width, height, cfg);
}

fn paint_markings<P: Painter>(painter: &mut P, width: f64, height: f64, cfg: &Config) {
    let line = Stroke::solid(FIELD_LINE, FIELD_LINE_WIDTH);
    let dashed = Stroke {
        dashed: true,
        ..line
    };
    for mark in field_markings(width, height, cfg) {
        match mark {
            FieldMark::Rect(r) => painter.stroke_rect(r, &line),
            FieldMark::Line { from, to, dashed: d } => {
                painter.stroke_polyline(&[from, to], if d { &dashed } else { &line })
            }
            FieldMark::Arc {
                center,
                radius,
                start,
                end,
            } => painter.stroke_arc(center, radius, start, end, &line),
            FieldMark::Dot { center, radius } => painter.fill_circle(center, radius, FIELD_LINE, None),
        }
    }
}

fn draw_arrow<P: Painter>(painter: &mut P, a: &Arrow, cfg: &Config) {
    let stroke = Stroke::solid(ARROW_COLOR, DRILL_WIDTH);
    painter.stroke_polyline(&[a.start(), a.end()], &stroke);
    let [b1, b2] = arrowhead(a, cfg.arrow_head_len);
    painter.stroke_polyline(&[b1, a.end(), b2], &stroke);
}

pub fn team_color(team: Team) -> &'static str {
    match team {
        Team::Home => HOME_COLOR,
        Team::Opponent => OPPONENT_COLOR,
    }
}

/// One full frame, back to front: field, freehand paths, arrows, cones,
/// ball, players with their name labels.
pub fn compose_frame<P: Painter>(painter: &mut P, scene: &Scene, cfg: &Config) {
    let (w, h) = (scene.width, scene.height);
    painter.clear(w, h);
    painter.field_layer(w, h, cfg);

    let path_stroke = Stroke::solid(PATH_COLOR, DRILL_WIDTH);
    for path in scene.paths.iter().filter(|p| !p.is_empty()) {
        painter.stroke_polyline(path, &path_stroke);
    }

    for a in scene.arrows.iter().chain(scene.pending_arrow.iter()) {
        draw_arrow(painter, a, cfg);
    }

    let half = cfg.cone_size / 2.0;
    for c in &scene.cones {
        if !painter.draw_icon(Icon::Cone, c.pos(), cfg.cone_size) {
            painter.fill_polygon(
                &[
                    Point::new(c.x, c.y - half),
                    Point::new(c.x - half, c.y + half),
                    Point::new(c.x + half, c.y + half),
                ],
                CONE_COLOR,
            );
        }
    }

    if let Some(b) = scene.ball {
        if !painter.draw_icon(Icon::Ball, b, cfg.ball_size) {
            let outline = Stroke::solid(BALL_OUTLINE, 2.0);
            painter.fill_circle(b, cfg.ball_radius(), BALL_FILL, Some(&outline));
        }
    }

    for p in scene.on_field() {
        let icon = match p.team {
            Team::Home => Icon::HomePlayer,
            Team::Opponent => Icon::OpponentPlayer,
        };
        if !painter.draw_icon(icon, p.pos(), cfg.icon_size) {
            painter.fill_circle(p.pos(), cfg.player_radius(), team_color(p.team), None);
        }
        let baseline = Point::new(p.x, p.y + cfg.icon_size / 2.0 + cfg.label_gap);
        painter.label(&p.name, baseline);
    }
}

/// Remembers which canvas size the offscreen field buffer was painted for.
#[derive(Clone, Debug, Default)]
pub struct FieldCache {
    key: Option<(u64, u64, u64)>,
}

impl FieldCache {
    /// True when the buffer must be re-painted for this size; records the
    /// size as painted.
    pub fn needs_render(&mut self, width: f64, height: f64, dpr: f64) -> bool {
        let key = (width.to_bits(), height.to_bits(), dpr.to_bits());
        if self.key == Some(key) {
            return false;
        }
        self.key = Some(key);
        true
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
