use serde::{Deserialize, Serialize};

/// Logical field size in yards. Markings are scaled from this to pixels.
pub const FIELD_WIDTH_YARDS: f64 = 60.0;
pub const FIELD_HEIGHT_YARDS: f64 = 40.0;
/// Player icon edge length (CSS px). Hit radius is half of it.
pub const ICON_SIZE: f64 = 64.0;
pub const BALL_SIZE: f64 = 40.0;
pub const CONE_SIZE: f64 = 24.0;
/// Arrows no longer than this are dropped on release.
pub const ARROW_MIN_LEN: f64 = 5.0;
pub const ARROW_HEAD_LEN: f64 = 12.0;
/// Distance from the icon's bottom edge to the label baseline.
pub const LABEL_GAP: f64 = 12.0;

/// Tunable sizes for the board. Every field falls back to the defaults
/// above, so a partial JSON document is enough to override one value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub field_width_yards: f64,
    pub field_height_yards: f64,
    pub icon_size: f64,
    pub ball_size: f64,
    pub cone_size: f64,
    pub arrow_min_len: f64,
    pub arrow_head_len: f64,
    pub label_gap: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            field_width_yards: FIELD_WIDTH_YARDS,
            field_height_yards: FIELD_HEIGHT_YARDS,
            icon_size: ICON_SIZE,
            ball_size: BALL_SIZE,
            cone_size: CONE_SIZE,
            arrow_min_len: ARROW_MIN_LEN,
            arrow_head_len: ARROW_HEAD_LEN,
            label_gap: LABEL_GAP,
        }
    }
}

impl Config {
    /// Parse a JSON override document. Unknown or malformed input yields the
    /// defaults rather than an error.
    pub fn from_json(text: &str) -> Config {
        match serde_json::from_str::<Config>(text) {
            Ok(c) => c.sanitized(),
            Err(e) => {
                log::warn!("ignoring invalid board config: {e}");
                Config::default()
            }
        }
    }

    // Non-positive sizes would make hit tests and scaling meaningless.
    fn sanitized(mut self) -> Config {
        let d = Config::default();
        let fix = |v: f64, dv: f64| if v.is_finite() && v > 0.0 { v } else { dv };
        self.field_width_yards = fix(self.field_width_yards, d.field_width_yards);
        self.field_height_yards = fix(self.field_height_yards, d.field_height_yards);
        self.icon_size = fix(self.icon_size, d.icon_size);
        self.ball_size = fix(self.ball_size, d.ball_size);
        self.cone_size = fix(self.cone_size, d.cone_size);
        self.arrow_head_len = fix(self.arrow_head_len, d.arrow_head_len);
        if !self.arrow_min_len.is_finite() || self.arrow_min_len < 0.0 {
            self.arrow_min_len = d.arrow_min_len;
        }
        if !self.label_gap.is_finite() {
            self.label_gap = d.label_gap;
        }
        self
    }

    pub fn player_radius(&self) -> f64 {
        self.icon_size / 2.0
    }

    pub fn ball_radius(&self) -> f64 {
        self.ball_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let c = Config::from_json(r#"{"iconSize": 48}"#);
        assert_eq!(c.icon_size, 48.0);
        assert_eq!(c.ball_size, BALL_SIZE);
        assert_eq!(c.player_radius(), 24.0);
    }

    #[test]
    fn garbage_and_negative_values_fall_back() {
        assert_eq!(Config::from_json("not json"), Config::default());
        let c = Config::from_json(r#"{"ballSize": -3, "arrowMinLen": -1}"#);
        assert_eq!(c.ball_size, BALL_SIZE);
        assert_eq!(c.arrow_min_len, ARROW_MIN_LEN);
    }
}
