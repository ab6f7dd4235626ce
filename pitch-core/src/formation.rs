use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Arrow, Cone, DrawingPath, Team};
use crate::scene::Scene;

/// Blocking yes/no prompt guarding destructive edits.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Where a player stood when the formation was saved. Names are not kept:
/// players are matched back by id only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationPlayer {
    pub id: u64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub is_benched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    #[serde(default)]
    pub players: Vec<FormationPlayer>,
    #[serde(default)]
    pub drawing: Vec<DrawingPath>,
    #[serde(default)]
    pub arrows: Vec<Arrow>,
    #[serde(default)]
    pub cones: Vec<Cone>,
}

impl Formation {
    /// Deep copy of the scene's positions and drill annotations.
    pub fn snapshot(scene: &Scene) -> Formation {
        Formation {
            players: scene
                .players
                .iter()
                .map(|p| FormationPlayer {
                    id: p.id,
                    x: p.x,
                    y: p.y,
                    is_benched: p.is_benched,
                    team: Some(p.team),
                })
                .collect(),
            drawing: scene.paths.clone(),
            arrows: scene.arrows.clone(),
            cones: scene.cones.clone(),
        }
    }

    /// Moves players present in the snapshot; everyone else stays put.
    /// Drill annotations are replaced wholesale.
    pub fn apply(&self, scene: &mut Scene) {
        for p in scene.players.iter_mut() {
            if let Some(saved) = self.players.iter().find(|s| s.id == p.id) {
                p.x = saved.x;
                p.y = saved.y;
                p.is_benched = saved.is_benched;
                if let Some(team) = saved.team {
                    p.team = team;
                }
            }
        }
        scene.paths = self.drawing.clone();
        scene.arrows = self.arrows.clone();
        scene.cones = self.cones.clone();
        scene.pending_arrow = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Overwritten,
    /// Blank name, or the overwrite prompt was declined.
    Skipped,
}

/// Named snapshots in insertion order (the order shown in the picker).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Formations(IndexMap<String, Formation>);

impl Formations {
    pub fn new() -> Self {
        Formations::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Formation> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn save(&mut self, name: &str, scene: &Scene, confirm: &mut impl Confirm) -> SaveOutcome {
        let name = name.trim();
        if name.is_empty() {
            return SaveOutcome::Skipped;
        }
        let exists = self.contains(name);
        if exists && !confirm.confirm(&format!("Formation \"{name}\" exists. Overwrite?")) {
            return SaveOutcome::Skipped;
        }
        // insert() keeps an existing key's slot
        self.0.insert(name.to_string(), Formation::snapshot(scene));
        log::info!("saved formation {name:?}");
        if exists {
            SaveOutcome::Overwritten
        } else {
            SaveOutcome::Created
        }
    }

    /// Returns false when no formation has that name.
    pub fn apply(&self, name: &str, scene: &mut Scene) -> bool {
        match self.get(name) {
            Some(f) => {
                f.apply(scene);
                true
            }
            None => false,
        }
    }

    /// Renames `from` to the trimmed `to`. A blank or unchanged target is
    /// ignored; replacing another formation needs confirmation and keeps
    /// that formation's place. A new name goes to the end of the order.
    pub fn rename(&mut self, from: &str, to: &str, confirm: &mut impl Confirm) -> bool {
        let to = to.trim();
        if to.is_empty() || to == from || !self.contains(from) {
            return false;
        }
        if self.contains(to) && !confirm.confirm(&format!("\"{to}\" already exists. Overwrite?")) {
            return false;
        }
        let Some(f) = self.0.shift_remove(from) else {
            return false;
        };
        match self.0.get_mut(to) {
            Some(slot) => *slot = f,
            None => {
                self.0.insert(to.to_string(), f);
            }
        }
        true
    }

    pub fn delete(&mut self, name: &str, confirm: &mut impl Confirm) -> bool {
        if !self.contains(name) || !confirm.confirm(&format!("Delete formation \"{name}\"?")) {
            return false;
        }
        self.0.shift_remove(name).is_some()
    }
}
