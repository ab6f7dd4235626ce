use serde::{Deserialize, Deserializer, Serialize};

/// Point in field-local CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn sub(self, o: Point) -> Point {
        Point {
            x: self.x - o.x,
            y: self.y - o.y,
        }
    }

    pub fn dist_sq(self, o: Point) -> f64 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Home,
    Opponent,
}

impl Team {
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Home => "home",
            Team::Opponent => "opponent",
        }
    }
}

// Older saves may carry no team, `null`, or an unknown string; all of those
// mean the home side.
impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(match raw.as_deref() {
            Some("opponent") => Team::Opponent,
            _ => Team::Home,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub is_benched: bool,
    #[serde(default)]
    pub team: Team,
}

impl Player {
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_pos(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// A freehand stroke. Points are appended only while the stroke is active.
pub type DrawingPath = Vec<Point>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Arrow {
    pub fn from_points(a: Point, b: Point) -> Self {
        Arrow {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    pub x: f64,
    pub y: f64,
}

impl Cone {
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
