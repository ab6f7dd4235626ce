//! Pointer router: one state machine for mouse and touch.
//!
//! The shell normalizes DOM pointer events into [`PointerEvent`]s and feeds
//! them to [`Router::handle`], which mutates the [`Scene`] and reports the
//! side effects the shell has to carry out.

use crate::config::Config;
use crate::geometry::Rect;
use crate::models::{Arrow, Cone, Point};
use crate::scene::Scene;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Freehand,
    Arrow,
    Cone,
}

impl Tool {
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Freehand => "freehand",
            Tool::Arrow => "arrow",
            Tool::Cone => "cone",
        }
    }

    pub fn parse(s: &str) -> Option<Tool> {
        match s {
            "freehand" => Some(Tool::Freehand),
            "arrow" => Some(Tool::Arrow),
            "cone" => Some(Tool::Cone),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// Abnormal end of a gesture; handled exactly like `Release`.
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Canvas-local CSS pixels.
    pub pos: Point,
    /// Viewport pixels, compared against the bench region.
    pub client: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, pos: Point, client: Point) -> Self {
        PointerEvent { phase, pos, client }
    }

    /// Event whose canvas and viewport coordinates coincide.
    pub fn at(phase: PointerPhase, x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        PointerEvent::new(phase, p, p)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    DraggingPlayer {
        id: u64,
        offset: Point,
        from_bench: bool,
    },
    DraggingBall {
        offset: Point,
    },
    DrawingFreehand,
    DrawingArrow,
    PlacingCone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    SavePlayers,
    SaveBall,
    RenderBench,
}

#[derive(Clone, Debug)]
pub struct Router {
    state: Interaction,
    pub draw_mode: bool,
    pub tool: Tool,
    /// Bench container bounds in viewport pixels, refreshed by the shell.
    pub bench_region: Option<Rect>,
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Router {
            state: Interaction::Idle,
            draw_mode: false,
            tool: Tool::Freehand,
            bench_region: None,
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == Interaction::Idle
    }

    pub fn toggle_draw_mode(&mut self) -> bool {
        self.draw_mode = !self.draw_mode;
        self.draw_mode
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// A bench chip was pressed. The drop position decides where the player
    /// lands, so there is no grab offset.
    pub fn begin_bench_drag(&mut self, scene: &Scene, id: u64) -> bool {
        if !self.is_idle() || scene.player(id).is_none_or(|p| !p.is_benched) {
            return false;
        }
        self.state = Interaction::DraggingPlayer {
            id,
            offset: Point::default(),
            from_bench: true,
        };
        log::debug!("bench drag started for player {id}");
        true
    }

    pub fn handle(&mut self, scene: &mut Scene, ev: PointerEvent, cfg: &Config) -> Vec<Effect> {
        match ev.phase {
            PointerPhase::Press => self.press(scene, ev.pos, cfg),
            PointerPhase::Move => self.drag(scene, ev.pos),
            PointerPhase::Release | PointerPhase::Cancel => self.release(scene, ev, cfg),
        }
        .unwrap_or_default()
    }

    fn press(&mut self, scene: &mut Scene, pos: Point, cfg: &Config) -> Option<Vec<Effect>> {
        // One gesture at a time; a second finger going down is ignored.
        if !self.is_idle() {
            return None;
        }
        if self.draw_mode {
            return Some(self.start_tool(scene, pos));
        }
        self.press_entity(scene, pos, cfg)
    }

    fn press_entity(&mut self, scene: &Scene, pos: Point, cfg: &Config) -> Option<Vec<Effect>> {
        if let Some(ball) = scene.ball.filter(|_| scene.ball_hit(pos, cfg)) {
            self.state = Interaction::DraggingBall {
                offset: pos.sub(ball),
            };
            return Some(Vec::new());
        }
        let id = scene.player_at(pos, cfg)?;
        let p = scene.player(id)?;
        self.state = Interaction::DraggingPlayer {
            id,
            offset: pos.sub(p.pos()),
            from_bench: false,
        };
        Some(Vec::new())
    }

    fn start_tool(&mut self, scene: &mut Scene, pos: Point) -> Vec<Effect> {
        match self.tool {
            Tool::Freehand => {
                scene.paths.push(vec![pos]);
                self.state = Interaction::DrawingFreehand;
                Vec::new()
            }
            Tool::Arrow => {
                scene.pending_arrow = Some(Arrow::from_points(pos, pos));
                self.state = Interaction::DrawingArrow;
                Vec::new()
            }
            Tool::Cone => {
                scene.cones.push(Cone { x: pos.x, y: pos.y });
                self.state = Interaction::PlacingCone;
                vec![Effect::Redraw]
            }
        }
    }

    fn drag(&mut self, scene: &mut Scene, pos: Point) -> Option<Vec<Effect>> {
        match self.state {
            Interaction::Idle | Interaction::PlacingCone => return None,
            Interaction::DrawingFreehand => scene.paths.last_mut()?.push(pos),
            Interaction::DrawingArrow => {
                let a = scene.pending_arrow.as_mut()?;
                a.x2 = pos.x;
                a.y2 = pos.y;
            }
            Interaction::DraggingBall { offset } => scene.ball = Some(pos.sub(offset)),
            Interaction::DraggingPlayer { id, offset, .. } => {
                scene.player_mut(id)?.set_pos(pos.sub(offset));
            }
        }
        Some(vec![Effect::Redraw])
    }

    fn release(&mut self, scene: &mut Scene, ev: PointerEvent, cfg: &Config) -> Option<Vec<Effect>> {
        let state = std::mem::replace(&mut self.state, Interaction::Idle);
        let mut fx = Vec::new();
        match state {
            Interaction::Idle => return None,
            Interaction::DrawingFreehand | Interaction::PlacingCone => {}
            Interaction::DrawingArrow => {
                if let Some(a) = scene.pending_arrow.take() {
                    if a.length() > cfg.arrow_min_len {
                        scene.arrows.push(a);
                    }
                }
            }
            Interaction::DraggingBall { .. } => fx.push(Effect::SaveBall),
            Interaction::DraggingPlayer { id, from_bench, .. } => {
                let over_bench = self.bench_region.is_some_and(|r| r.contains(ev.client));
                if let Some(p) = scene.player_mut(id) {
                    if from_bench {
                        p.is_benched = false;
                        p.set_pos(ev.pos);
                        fx.push(Effect::RenderBench);
                    } else if over_bench {
                        p.is_benched = true;
                        fx.push(Effect::RenderBench);
                    }
                    fx.push(Effect::SavePlayers);
                }
            }
        }
        fx.push(Effect::Redraw);
        Some(fx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use PointerPhase::*;

    fn setup() -> (Scene, Router, Config) {
        let mut s = Scene::new(600.0, 400.0);
        s.add_player(1, "Ana", Team::Home);
        (s, Router::new(), Config::default())
    }

    fn place(s: &mut Scene, id: u64, x: f64, y: f64) {
        let p = s.player_mut(id).unwrap();
        p.is_benched = false;
        p.set_pos(Point::new(x, y));
    }

    #[test]
    fn bench_drag_unbenches_at_drop_point() {
        let (mut s, mut r, cfg) = setup();
        assert!(r.begin_bench_drag(&s, 1));
        r.handle(&mut s, PointerEvent::at(Move, 50.0, 60.0), &cfg);
        let fx = r.handle(&mut s, PointerEvent::at(Release, 120.0, 80.0), &cfg);
        let p = s.player(1).unwrap();
        assert!(!p.is_benched);
        assert_eq!(p.pos(), Point::new(120.0, 80.0));
        assert!(fx.contains(&Effect::SavePlayers));
        assert!(fx.contains(&Effect::RenderBench));
        assert!(r.is_idle());
    }

    #[test]
    fn field_player_dropped_on_bench_is_rebenched() {
        let (mut s, mut r, cfg) = setup();
        place(&mut s, 1, 100.0, 100.0);
        r.bench_region = Some(Rect::new(0.0, 500.0, 600.0, 100.0));
        r.handle(&mut s, PointerEvent::at(Press, 105.0, 100.0), &cfg);
        assert!(matches!(r.state(), Interaction::DraggingPlayer { id: 1, from_bench: false, .. }));
        r.handle(&mut s, PointerEvent::at(Move, 305.0, 550.0), &cfg);
        // grab offset is preserved while dragging
        assert_eq!(s.player(1).unwrap().pos(), Point::new(300.0, 550.0));
        let canvas_pos = Point::new(305.0, 399.0);
        let client = Point::new(305.0, 550.0);
        r.handle(&mut s, PointerEvent::new(Release, canvas_pos, client), &cfg);
        assert!(s.player(1).unwrap().is_benched);
    }

    #[test]
    fn field_drop_outside_bench_keeps_player_on_field() {
        let (mut s, mut r, cfg) = setup();
        place(&mut s, 1, 100.0, 100.0);
        r.bench_region = Some(Rect::new(0.0, 500.0, 600.0, 100.0));
        r.handle(&mut s, PointerEvent::at(Press, 100.0, 100.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Move, 200.0, 150.0), &cfg);
        let fx = r.handle(&mut s, PointerEvent::at(Release, 200.0, 150.0), &cfg);
        assert!(!s.player(1).unwrap().is_benched);
        assert_eq!(fx, vec![Effect::SavePlayers, Effect::Redraw]);
    }

    #[test]
    fn ball_takes_priority_over_players() {
        let (mut s, mut r, cfg) = setup();
        place(&mut s, 1, 300.0, 200.0);
        s.center_ball();
        r.handle(&mut s, PointerEvent::at(Press, 305.0, 200.0), &cfg);
        assert!(matches!(r.state(), Interaction::DraggingBall { .. }));
        r.handle(&mut s, PointerEvent::at(Move, 55.0, 80.0), &cfg);
        let fx = r.handle(&mut s, PointerEvent::at(Cancel, 55.0, 80.0), &cfg);
        assert_eq!(s.ball, Some(Point::new(50.0, 80.0)));
        assert!(fx.contains(&Effect::SaveBall));
        assert_eq!(s.player(1).unwrap().pos(), Point::new(300.0, 200.0));
    }

    #[test]
    fn press_on_empty_field_stays_idle() {
        let (mut s, mut r, cfg) = setup();
        let fx = r.handle(&mut s, PointerEvent::at(Press, 10.0, 10.0), &cfg);
        assert!(fx.is_empty());
        assert!(r.is_idle());
        assert!(r.handle(&mut s, PointerEvent::at(Release, 10.0, 10.0), &cfg).is_empty());
    }

    #[test]
    fn short_arrows_are_discarded() {
        let (mut s, mut r, cfg) = setup();
        r.toggle_draw_mode();
        r.set_tool(Tool::Arrow);
        r.handle(&mut s, PointerEvent::at(Press, 0.0, 0.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Release, 0.0, 0.0), &cfg);
        assert!(s.arrows.is_empty());
        assert!(s.pending_arrow.is_none());

        r.handle(&mut s, PointerEvent::at(Press, 0.0, 0.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Move, 10.0, 0.0), &cfg);
        assert_eq!(s.pending_arrow.map(|a| a.x2), Some(10.0));
        r.handle(&mut s, PointerEvent::at(Release, 10.0, 0.0), &cfg);
        assert_eq!(s.arrows.len(), 1);
        assert_eq!(s.arrows[0].length(), 10.0);
    }

    #[test]
    fn arrow_at_threshold_is_not_committed() {
        let (mut s, mut r, cfg) = setup();
        r.draw_mode = true;
        r.set_tool(Tool::Arrow);
        r.handle(&mut s, PointerEvent::at(Press, 0.0, 0.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Move, 3.0, 4.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Release, 3.0, 4.0), &cfg);
        assert!(s.arrows.is_empty());
    }

    #[test]
    fn freehand_appends_to_latest_path() {
        let (mut s, mut r, cfg) = setup();
        r.draw_mode = true;
        for x in [0.0, 1.0, 2.0] {
            let phase = if x == 0.0 { Press } else { Move };
            r.handle(&mut s, PointerEvent::at(phase, x, x), &cfg);
        }
        r.handle(&mut s, PointerEvent::at(Release, 2.0, 2.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Press, 9.0, 9.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Release, 9.0, 9.0), &cfg);
        assert_eq!(s.paths.len(), 2);
        assert_eq!(s.paths[0].len(), 3);
        assert_eq!(s.paths[1], vec![Point::new(9.0, 9.0)]);
    }

    #[test]
    fn cone_is_placed_on_press_without_drag() {
        let (mut s, mut r, cfg) = setup();
        r.draw_mode = true;
        r.set_tool(Tool::Cone);
        let fx = r.handle(&mut s, PointerEvent::at(Press, 40.0, 30.0), &cfg);
        assert_eq!(fx, vec![Effect::Redraw]);
        assert_eq!(r.state(), Interaction::PlacingCone);
        r.handle(&mut s, PointerEvent::at(Move, 90.0, 90.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Release, 90.0, 90.0), &cfg);
        assert_eq!(s.cones, vec![Cone { x: 40.0, y: 30.0 }]);
    }

    #[test]
    fn draw_mode_ignores_entities() {
        let (mut s, mut r, cfg) = setup();
        place(&mut s, 1, 100.0, 100.0);
        r.draw_mode = true;
        r.handle(&mut s, PointerEvent::at(Press, 100.0, 100.0), &cfg);
        r.handle(&mut s, PointerEvent::at(Move, 150.0, 150.0), &cfg);
        assert_eq!(s.player(1).unwrap().pos(), Point::new(100.0, 100.0));
        assert_eq!(r.state(), Interaction::DrawingFreehand);
    }

    #[test]
    fn second_press_does_not_start_another_gesture() {
        let (mut s, mut r, cfg) = setup();
        s.center_ball();
        assert!(r.begin_bench_drag(&s, 1));
        r.handle(&mut s, PointerEvent::at(Press, 300.0, 200.0), &cfg);
        assert!(matches!(r.state(), Interaction::DraggingPlayer { from_bench: true, .. }));
        assert!(!r.begin_bench_drag(&s, 1));
    }

    #[test]
    fn bench_drag_requires_benched_player() {
        let (mut s, mut r, _) = setup();
        place(&mut s, 1, 10.0, 10.0);
        assert!(!r.begin_bench_drag(&s, 1));
        assert!(!r.begin_bench_drag(&s, 99));
    }

    #[test]
    fn tool_names_round_trip() {
        for t in [Tool::Freehand, Tool::Arrow, Tool::Cone] {
            assert_eq!(Tool::parse(t.as_str()), Some(t));
        }
        assert_eq!(Tool::parse("laser"), None);
    }
}
