use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

use crate::config::Config;
use crate::models::{Arrow, Point};

/// Axis-aligned rectangle; `contains` is inclusive on every edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Yard-to-pixel factors for one canvas size. Radii use the average of the
/// two axes so circles stay round on non-proportional canvases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldScale {
    pub x: f64,
    pub y: f64,
    pub avg: f64,
}

impl FieldScale {
    pub fn new(width: f64, height: f64, cfg: &Config) -> Self {
        let x = width / cfg.field_width_yards;
        let y = height / cfg.field_height_yards;
        FieldScale {
            x,
            y,
            avg: (x + y) / 2.0,
        }
    }
}

/// One static field marking in pixel space.
///
/// Arcs sweep clockwise (screen space, y down) from `start` to `end`;
/// `end` is always `>= start`.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldMark {
    Rect(Rect),
    Line { from: Point, to: Point, dashed: bool },
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Dot { center: Point, radius: f64 },
}

pub const PENALTY_DOT_RADIUS: f64 = 2.0;

fn arc(center: Point, radius: f64, start: f64, end: f64) -> FieldMark {
    let mut end = end;
    while end < start {
        end += TAU;
    }
    FieldMark::Arc {
        center,
        radius,
        start,
        end,
    }
}

/// Every static marking of the pitch scaled to `width` x `height`, in the
/// order they are painted.
pub fn field_markings(width: f64, height: f64, cfg: &Config) -> Vec<FieldMark> {
    let s = FieldScale::new(width, height, cfg);
    let mid_y = height / 2.0;
    let mut marks = Vec::with_capacity(17);

    marks.push(FieldMark::Rect(Rect::new(0.0, 0.0, width, height)));
    marks.push(FieldMark::Line {
        from: Point::new(width / 2.0, 0.0),
        to: Point::new(width / 2.0, height),
        dashed: false,
    });
    marks.push(arc(Point::new(width / 2.0, mid_y), 4.0 * s.avg, 0.0, TAU));

    // penalty boxes
    let box_w = 10.0 * s.x;
    let box_h = 18.0 * s.y;
    marks.push(FieldMark::Rect(Rect::new(0.0, mid_y - box_h / 2.0, box_w, box_h)));
    marks.push(FieldMark::Rect(Rect::new(
        width - box_w,
        mid_y - box_h / 2.0,
        box_w,
        box_h,
    )));

    // goal areas
    let goal_w = 4.0 * s.x;
    let goal_h = 8.0 * s.y;
    marks.push(FieldMark::Rect(Rect::new(0.0, mid_y - goal_h / 2.0, goal_w, goal_h)));
    marks.push(FieldMark::Rect(Rect::new(
        width - goal_w,
        mid_y - goal_h / 2.0,
        goal_w,
        goal_h,
    )));

    let dot_x1 = 8.0 * s.x;
    let dot_x2 = width - dot_x1;
    marks.push(FieldMark::Dot {
        center: Point::new(dot_x1, mid_y),
        radius: PENALTY_DOT_RADIUS,
    });
    marks.push(FieldMark::Dot {
        center: Point::new(dot_x2, mid_y),
        radius: PENALTY_DOT_RADIUS,
    });

    // Only the part of the arc outside the box is drawn.
    let arc_r = 4.0 * s.avg;
    let angle = ((box_w - dot_x1) / arc_r).clamp(-1.0, 1.0).acos();
    marks.push(arc(Point::new(dot_x1, mid_y), arc_r, -angle, angle));
    marks.push(arc(Point::new(dot_x2, mid_y), arc_r, PI - angle, PI + angle));

    let build_x1 = 20.0 * s.x;
    let build_x2 = width - build_x1;
    for x in [build_x1, build_x2] {
        marks.push(FieldMark::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            dashed: true,
        });
    }

    let corner_r = s.x;
    marks.push(arc(Point::new(0.0, 0.0), corner_r, 0.0, FRAC_PI_2));
    marks.push(arc(Point::new(width, 0.0), corner_r, FRAC_PI_2, PI));
    marks.push(arc(Point::new(0.0, height), corner_r, -FRAC_PI_2, 0.0));
    marks.push(arc(Point::new(width, height), corner_r, PI, -FRAC_PI_2));
    marks
}

/// The two barb endpoints of an arrowhead drawn at `arrow`'s tip.
pub fn arrowhead(arrow: &Arrow, head_len: f64) -> [Point; 2] {
    let angle = (arrow.y2 - arrow.y1).atan2(arrow.x2 - arrow.x1);
    let barb = |a: f64| Point::new(arrow.x2 - head_len * a.cos(), arrow.y2 - head_len * a.sin());
    [barb(angle - FRAC_PI_6), barb(angle + FRAC_PI_6)]
}

/// Point-in-circle test without a square root. The boundary is outside.
pub fn circle_hit(center: Point, radius: f64, p: Point) -> bool {
    center.dist_sq(p) < radius * radius
}
