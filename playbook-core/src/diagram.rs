use pitch_core::persistence::Backup;
use pitch_core::{Config, Scene};

use crate::raster::ExportError;

/// Rebuilds the board stored in a backup document on a canvas of the given
/// size, optionally with a saved formation applied on top.
pub fn scene_from_backup(
    backup_json: &str,
    formation: Option<&str>,
    width: f64,
    height: f64,
) -> Result<Scene, ExportError> {
    let store = Backup::from_json(backup_json)?.into_persistence();
    let mut scene = store.restore_scene(width, height);
    if let Some(name) = formation {
        let formations = store.load_formations().unwrap_or_default();
        if !formations.apply(name, &mut scene) {
            return Err(ExportError::FormationNotFound(name.to_string()));
        }
    }
    log::info!(
        "restored {} players ({} on the field)",
        scene.players.len(),
        scene.on_field().count()
    );
    Ok(scene)
}

/// Convenience for callers that only need the SVG text.
pub fn backup_to_svg(
    backup_json: &str,
    formation: Option<&str>,
    width: f64,
    height: f64,
    cfg: &Config,
) -> Result<String, ExportError> {
    let scene = scene_from_backup(backup_json, formation, width, height)?;
    Ok(crate::svg::build_diagram_svg(&scene, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKUP: &str = r#"{
        "soccerPlayers": [
            {"id": 1, "name": "Ana", "x": 10, "y": 20, "isBenched": false, "team": "home"},
            {"id": 2, "name": "Bo", "x": 0, "y": 0, "isBenched": true}
        ],
        "soccerFormations": {
            "press": {
                "players": [
                    {"id": 1, "x": 5, "y": 6, "isBenched": true},
                    {"id": 2, "x": 300, "y": 150, "isBenched": false}
                ],
                "drawing": [[{"x": 1, "y": 1}, {"x": 2, "y": 2}]],
                "arrows": [],
                "cones": [{"x": 40, "y": 40}]
            }
        },
        "soccerBall": {"x": 100, "y": 100}
    }"#;

    #[test]
    fn plain_backup_keeps_stored_positions() {
        let scene = scene_from_backup(BACKUP, None, 600.0, 400.0).unwrap();
        assert_eq!(scene.on_field().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(scene.ball.map(|b| b.x), Some(100.0));
        assert!(scene.cones.is_empty());
    }

    #[test]
    fn formation_is_applied() {
        let scene = scene_from_backup(BACKUP, Some("press"), 600.0, 400.0).unwrap();
        assert_eq!(scene.on_field().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(scene.cones.len(), 1);
        assert_eq!(scene.paths.len(), 1);
    }

    #[test]
    fn unknown_formation_is_an_error() {
        let err = scene_from_backup(BACKUP, Some("nope"), 600.0, 400.0).unwrap_err();
        assert_eq!(err.to_string(), "formation \"nope\" not found");
        assert!(matches!(
            scene_from_backup("not json", None, 1.0, 1.0),
            Err(ExportError::Backup(_))
        ));
    }

    #[test]
    fn svg_from_backup_has_formation_cone() {
        let svg = backup_to_svg(BACKUP, Some("press"), 600.0, 400.0, &Config::default()).unwrap();
        assert!(svg.contains("fill=\"#ff8c00\""));
        assert!(svg.contains(">Bo</text>"));
    }
}
