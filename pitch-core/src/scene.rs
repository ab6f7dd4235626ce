use crate::config::Config;
use crate::geometry::circle_hit;
use crate::models::{Arrow, Cone, DrawingPath, Player, Point, Team};

/// The board document: everything that is drawn, owned in one place and
/// handed explicitly to the renderer, the router and persistence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub players: Vec<Player>,
    pub ball: Option<Point>,
    pub paths: Vec<DrawingPath>,
    pub arrows: Vec<Arrow>,
    pub cones: Vec<Cone>,
    /// Arrow being dragged out; not part of `arrows` until committed.
    pub pending_arrow: Option<Arrow>,
    /// Canvas size in CSS pixels.
    pub width: f64,
    pub height: f64,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Scene {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn center_ball(&mut self) {
        self.ball = Some(self.center());
    }

    /// Adds a benched player at the origin. Blank names are ignored. `id` is
    /// normally the creation timestamp; a clash bumps it past the largest id.
    pub fn add_player(&mut self, id: u64, name: &str, team: Team) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = if self.player(id).is_some() { self.free_id() } else { id };
        self.players.push(Player {
            id,
            name: name.to_string(),
            x: 0.0,
            y: 0.0,
            is_benched: true,
            team,
        });
        Some(id)
    }

    /// One past the largest id, or the smallest unused id once that would
    /// overflow.
    fn free_id(&self) -> u64 {
        let max = self.players.iter().map(|p| p.id).max().unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => next,
            None => (0..=u64::MAX)
                .find(|c| self.player(*c).is_none())
                .unwrap_or(0),
        }
    }

    pub fn remove_player(&mut self, id: u64) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    /// Returns false when the player is unknown or the new name is blank.
    pub fn rename_player(&mut self, id: u64, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.player_mut(id) {
            Some(p) => {
                p.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn player(&self, id: u64) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u64) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Topmost (last inserted) player on the field under `pos`.
    pub fn player_at(&self, pos: Point, cfg: &Config) -> Option<u64> {
        let r = cfg.player_radius();
        self.players
            .iter()
            .rev()
            .find(|p| !p.is_benched && circle_hit(p.pos(), r, pos))
            .map(|p| p.id)
    }

    pub fn ball_hit(&self, pos: Point, cfg: &Config) -> bool {
        self.ball
            .is_some_and(|b| circle_hit(b, cfg.ball_radius(), pos))
    }

    pub fn benched(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_benched)
    }

    pub fn on_field(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_benched)
    }

    pub fn clear_drawing(&mut self) {
        self.paths.clear();
        self.arrows.clear();
        self.cones.clear();
        self.pending_arrow = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_player(scene: &mut Scene, id: u64, at: (f64, f64)) {
        scene.add_player(id, &format!("p{id}"), Team::Home);
        let p = scene.player_mut(id).unwrap();
        p.is_benched = false;
        p.set_pos(at.into());
    }

    #[test]
    fn blank_names_are_ignored() {
        let mut s = Scene::new(600.0, 400.0);
        assert_eq!(s.add_player(1, "   ", Team::Home), None);
        assert!(s.players.is_empty());
        s.add_player(1, " Ana ", Team::Opponent);
        assert_eq!(s.players[0].name, "Ana");
        assert!(s.players[0].is_benched);
        assert!(!s.rename_player(1, ""));
        assert_eq!(s.players[0].name, "Ana");
    }

    #[test]
    fn colliding_ids_are_bumped() {
        let mut s = Scene::new(600.0, 400.0);
        assert_eq!(s.add_player(100, "a", Team::Home), Some(100));
        assert_eq!(s.add_player(100, "b", Team::Home), Some(101));
        assert_eq!(s.add_player(101, "c", Team::Home), Some(102));
    }

    #[test]
    fn bump_at_id_ceiling_reuses_a_free_id() {
        let mut s = Scene::new(600.0, 400.0);
        assert_eq!(s.add_player(u64::MAX, "a", Team::Home), Some(u64::MAX));
        assert_eq!(s.add_player(u64::MAX, "b", Team::Home), Some(0));
        assert_eq!(s.add_player(u64::MAX, "c", Team::Home), Some(1));
    }

    #[test]
    fn rename_keeps_id_and_position() {
        let mut s = Scene::new(600.0, 400.0);
        field_player(&mut s, 5, (40.0, 50.0));
        assert!(s.rename_player(5, "Zed"));
        let p = s.player(5).unwrap();
        assert_eq!((p.name.as_str(), p.x, p.y), ("Zed", 40.0, 50.0));
    }

    #[test]
    fn topmost_player_wins_and_bench_is_invisible() {
        let cfg = Config::default();
        let mut s = Scene::new(600.0, 400.0);
        field_player(&mut s, 1, (100.0, 100.0));
        field_player(&mut s, 2, (110.0, 100.0));
        assert_eq!(s.player_at(Point::new(105.0, 100.0), &cfg), Some(2));
        s.player_mut(2).unwrap().is_benched = true;
        assert_eq!(s.player_at(Point::new(105.0, 100.0), &cfg), Some(1));
        assert_eq!(s.player_at(Point::new(300.0, 300.0), &cfg), None);
    }

    #[test]
    fn ball_hit_requires_a_ball() {
        let cfg = Config::default();
        let mut s = Scene::new(600.0, 400.0);
        assert!(!s.ball_hit(Point::new(300.0, 200.0), &cfg));
        s.center_ball();
        assert!(s.ball_hit(Point::new(310.0, 200.0), &cfg));
        assert!(!s.ball_hit(Point::new(320.0, 200.0), &cfg));
    }

    #[test]
    fn clear_drawing_keeps_players() {
        let mut s = Scene::new(600.0, 400.0);
        field_player(&mut s, 1, (1.0, 1.0));
        s.paths.push(vec![Point::new(0.0, 0.0)]);
        s.cones.push(Cone { x: 1.0, y: 1.0 });
        s.pending_arrow = Some(Arrow::default());
        s.clear_drawing();
        assert!(s.paths.is_empty() && s.cones.is_empty() && s.pending_arrow.is_none());
        assert_eq!(s.players.len(), 1);
    }
}
