//! View models for the side panels. The shell turns these into DOM nodes.

use serde::{Deserialize, Serialize};

use crate::formation::Formations;
use crate::models::Team;
use crate::scene::Scene;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchChip {
    pub id: u64,
    pub name: String,
    pub team: Team,
}

impl BenchChip {
    /// CSS classes of the chip element.
    pub fn class_name(&self) -> String {
        format!("player-chip {}", self.team.as_str())
    }
}

/// Benched players in insertion order.
pub fn bench_chips(scene: &Scene) -> Vec<BenchChip> {
    scene
        .benched()
        .map(|p| BenchChip {
            id: p.id,
            name: p.name.clone(),
            team: p.team,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// Formation picker entries. When `selected` is unknown the first entry is
/// selected, as a browser `<select>` would do.
pub fn formation_options(formations: &Formations, selected: Option<&str>) -> Vec<SelectOption> {
    let keep = selected.filter(|s| formations.contains(s));
    formations
        .names()
        .enumerate()
        .map(|(i, name)| SelectOption {
            value: name.to_string(),
            selected: match keep {
                Some(s) => s == name,
                None => i == 0,
            },
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn from_checked(dark: bool) -> Theme {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn body_class(self) -> Option<&'static str> {
        self.is_dark().then_some("dark-mode")
    }
}

/// Collapsible containers toggled from the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Controls,
    Bench,
}

impl Panel {
    pub fn element_id(self) -> &'static str {
        match self {
            Panel::Controls => "controls",
            Panel::Bench => "bench",
        }
    }

    pub fn toggle_id(self) -> &'static str {
        match self {
            Panel::Controls => "controls-toggle",
            Panel::Bench => "bench-toggle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Controls => "Controls",
            Panel::Bench => "Bench",
        }
    }
}

pub fn draw_mode_label(on: bool) -> String {
    format!("Draw Mode: {}", if on { "On" } else { "Off" })
}
