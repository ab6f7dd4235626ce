//! Framework-free model of the sideline board: field geometry, the scene
//! document, the pointer router, formations and persistence.
//!
//! Nothing in this crate touches the DOM. The browser shell (`pitch-wasm`)
//! and the export tools (`playbook-core`) drive it through the [`render::Painter`]
//! and [`persistence::KeyValueStore`] seams.

pub mod assets;
pub mod config;
pub mod formation;
pub mod geometry;
pub mod input;
pub mod models;
pub mod offline;
pub mod panels;
pub mod persistence;
pub mod render;
pub mod scene;
pub mod timer;

pub use config::Config;
pub use formation::{Confirm, Formation, Formations};
pub use input::{Effect, PointerEvent, PointerPhase, Router, Tool};
pub use models::{Arrow, Cone, Player, Point, Team};
pub use persistence::{KeyValueStore, MemoryStore, Persistence, StorageError};
pub use scene::Scene;
