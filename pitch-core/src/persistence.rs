//! Durable key-value persistence of the board.
//!
//! Every write is best effort: quota and serialization failures are logged
//! and swallowed, and reads that fail to parse count as "nothing stored".

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::formation::Formations;
use crate::models::{Player, Point};
use crate::panels::Theme;
use crate::scene::Scene;

pub const PLAYERS_KEY: &str = "soccerPlayers";
pub const FORMATIONS_KEY: &str = "soccerFormations";
pub const BALL_KEY: &str = "soccerBall";
pub const NOTES_KEY: &str = "soccerNotes";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String-to-string store with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store with an optional byte quota.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        MemoryStore {
            entries: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(q) = self.quota {
            if self.used_without(key) + key.len() + value.len() > q {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the board's storage keys.
#[derive(Clone, Debug, Default)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Persistence { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("could not persist {key}: {e}");
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.write_raw(key, &text),
            Err(e) => log::warn!("could not serialize {key}: {e}"),
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("could not read {key}: {e}");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.read_raw(key)?;
        match serde_json::from_str(&text) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("ignoring unreadable {key}: {e}");
                None
            }
        }
    }

    pub fn save_players(&mut self, players: &[Player]) {
        self.write_json(PLAYERS_KEY, players);
    }

    /// Stored players; a missing `team` reads back as home.
    pub fn load_players(&self) -> Option<Vec<Player>> {
        self.read_json(PLAYERS_KEY)
    }

    pub fn save_formations(&mut self, formations: &Formations) {
        self.write_json(FORMATIONS_KEY, formations);
    }

    pub fn load_formations(&self) -> Option<Formations> {
        self.read_json(FORMATIONS_KEY)
    }

    pub fn save_ball(&mut self, ball: Option<Point>) {
        self.write_json(BALL_KEY, &ball);
    }

    /// `None` when nothing usable is stored. The origin counts as unset,
    /// matching how older saves marked a missing ball.
    pub fn load_ball(&self) -> Option<Point> {
        self.read_json::<Option<Point>>(BALL_KEY)
            .flatten()
            .filter(|b| b.x.is_finite() && b.y.is_finite())
            .filter(|b| *b != Point::default())
    }

    pub fn save_notes(&mut self, notes: &str) {
        self.write_raw(NOTES_KEY, notes);
    }

    pub fn load_notes(&self) -> Option<String> {
        self.read_raw(NOTES_KEY).filter(|n| !n.is_empty())
    }

    pub fn save_theme(&mut self, theme: Theme) {
        self.write_raw(THEME_KEY, theme.as_str());
    }

    pub fn load_theme(&self) -> Option<Theme> {
        self.read_raw(THEME_KEY).and_then(|t| Theme::parse(&t))
    }

    /// Builds the scene from storage: stored players (or none) and the
    /// stored ball, centered when absent.
    pub fn restore_scene(&self, width: f64, height: f64) -> Scene {
        let mut scene = Scene::new(width, height);
        scene.players = self.load_players().unwrap_or_default();
        match self.load_ball() {
            Some(b) => scene.ball = Some(b),
            None => scene.center_ball(),
        }
        scene
    }

    pub fn export_backup(&self) -> Backup {
        Backup {
            players: self.load_players(),
            formations: self.load_formations(),
            ball: self.load_ball(),
            notes: self.load_notes(),
            theme: self.load_theme(),
        }
    }

    /// Writes every key present in the backup; absent keys are left alone.
    pub fn import_backup(&mut self, backup: &Backup) {
        if let Some(p) = &backup.players {
            self.save_players(p);
        }
        if let Some(f) = &backup.formations {
            self.save_formations(f);
        }
        if let Some(b) = backup.ball {
            self.save_ball(Some(b));
        }
        if let Some(n) = &backup.notes {
            self.save_notes(n);
        }
        if let Some(t) = backup.theme {
            self.save_theme(t);
        }
    }
}

/// All persisted keys in one JSON document, for download and re-import.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(rename = "soccerPlayers", default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
    #[serde(rename = "soccerFormations", default, skip_serializing_if = "Option::is_none")]
    pub formations: Option<Formations>,
    #[serde(rename = "soccerBall", default, skip_serializing_if = "Option::is_none")]
    pub ball: Option<Point>,
    #[serde(rename = "soccerNotes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "theme", default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Backup {
    pub fn from_json(text: &str) -> Result<Backup, StorageError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads the backup into a fresh in-memory store.
    pub fn into_persistence(self) -> Persistence<MemoryStore> {
        let mut p = Persistence::new(MemoryStore::new());
        p.import_backup(&self);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;

    #[test]
    fn ball_round_trip_and_centering() {
        let mut p = Persistence::new(MemoryStore::new());
        assert_eq!(p.load_ball(), None);
        assert_eq!(p.restore_scene(600.0, 400.0).ball, Some(Point::new(300.0, 200.0)));
        p.save_ball(Some(Point::new(50.0, 80.0)));
        let fresh = Persistence::new(p.into_inner());
        assert_eq!(fresh.load_ball(), Some(Point::new(50.0, 80.0)));
        assert_eq!(fresh.restore_scene(600.0, 400.0).ball, Some(Point::new(50.0, 80.0)));
    }

    #[test]
    fn falsy_ball_values_recenter() {
        for raw in ["null", "{\"x\":0,\"y\":0}", "garbage", "[1,2"] {
            let mut s = MemoryStore::new();
            s.set(BALL_KEY, raw).unwrap();
            let p = Persistence::new(s);
            assert_eq!(p.load_ball(), None, "{raw}");
        }
    }

    #[test]
    fn legacy_players_get_home_team() {
        let mut s = MemoryStore::new();
        s.set(
            PLAYERS_KEY,
            r#"[{"id":1,"name":"Ana","x":5,"y":6,"isBenched":false},
                {"id":2,"name":"Bo","x":0,"y":0,"isBenched":true,"team":"opponent"}]"#,
        )
        .unwrap();
        let players = Persistence::new(s).load_players().unwrap();
        assert_eq!(players[0].team, Team::Home);
        assert_eq!(players[1].team, Team::Opponent);
    }

    #[test]
    fn quota_failures_are_swallowed() {
        let mut p = Persistence::new(MemoryStore::with_quota(40));
        p.save_notes("short");
        assert_eq!(p.load_notes().as_deref(), Some("short"));
        p.save_notes(&"x".repeat(100));
        assert_eq!(p.load_notes().as_deref(), Some("short"));
    }

    #[test]
    fn notes_and_theme_are_plain_strings() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save_notes("press high");
        p.save_theme(Theme::Dark);
        assert_eq!(p.store().get(NOTES_KEY).unwrap().as_deref(), Some("press high"));
        assert_eq!(p.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(p.load_theme(), Some(Theme::Dark));
        p.save_notes("");
        assert_eq!(p.load_notes(), None);
    }

    #[test]
    fn backup_round_trip_through_a_fresh_store() {
        let mut p = Persistence::new(MemoryStore::new());
        let mut scene = Scene::new(600.0, 400.0);
        scene.add_player(1, "Ana", Team::Home);
        p.save_players(&scene.players);
        p.save_ball(Some(Point::new(1.0, 2.0)));
        p.save_notes("n");
        let json = p.export_backup().to_json().unwrap();
        let restored = Backup::from_json(&json).unwrap().into_persistence();
        assert_eq!(restored.load_players(), Some(scene.players));
        assert_eq!(restored.load_ball(), Some(Point::new(1.0, 2.0)));
        assert_eq!(restored.load_notes().as_deref(), Some("n"));
        assert_eq!(restored.load_formations(), None);
    }

    #[test]
    fn partial_backup_leaves_other_keys() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save_notes("keep me");
        p.save_theme(Theme::Dark);
        p.import_backup(&Backup::from_json(r#"{"soccerBall":{"x":4,"y":5}}"#).unwrap());
        assert_eq!(p.load_ball(), Some(Point::new(4.0, 5.0)));
        assert_eq!(p.load_notes().as_deref(), Some("keep me"));
        assert_eq!(p.load_theme(), Some(Theme::Dark));
    }
}
