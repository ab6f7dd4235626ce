use pitch_core::formation::SaveOutcome;
use pitch_core::geometry::Rect;
use pitch_core::input::PointerPhase::{Move, Press, Release};
use pitch_core::persistence::FORMATIONS_KEY;
use pitch_core::{
    Config, Formations, KeyValueStore, MemoryStore, Persistence, PointerEvent, Router, Scene, Team,
};
use proptest::prelude::*;

fn yes(_: &str) -> bool {
    true
}

fn no(_: &str) -> bool {
    false
}

#[derive(Clone, Debug)]
enum Op {
    Add(String, bool),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-zA-Z ]{0,8}", any::<bool>()).prop_map(|(n, opp)| Op::Add(n, opp)),
        (0usize..16).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn reloaded_players_match_last_save(ops in prop::collection::vec(op(), 0..24)) {
        let mut persistence = Persistence::new(MemoryStore::new());
        let mut scene = Scene::new(600.0, 400.0);
        let mut clock = 1_700_000_000_000u64;
        for op in ops {
            match op {
                Op::Add(name, opp) => {
                    clock += 1;
                    let team = if opp { Team::Opponent } else { Team::Home };
                    scene.add_player(clock, &name, team);
                }
                Op::Remove(i) => {
                    if let Some(id) = scene.players.get(i).map(|p| p.id) {
                        scene.remove_player(id);
                    }
                }
            }
            persistence.save_players(&scene.players);
        }
        let reloaded = Persistence::new(persistence.into_inner()).restore_scene(600.0, 400.0);
        prop_assert_eq!(reloaded.players, scene.players);
    }
}

#[test]
fn bench_to_field_and_back_persists() {
    let cfg = Config::default();
    let mut store = Persistence::new(MemoryStore::new());
    let mut scene = store.restore_scene(600.0, 400.0);
    let mut router = Router::new();
    router.bench_region = Some(Rect::new(620.0, 0.0, 200.0, 400.0));
    let id = scene.add_player(42, "Ana", Team::Home).unwrap();

    assert!(router.begin_bench_drag(&scene, id));
    router.handle(&mut scene, PointerEvent::at(Move, 200.0, 100.0), &cfg);
    for fx in router.handle(&mut scene, PointerEvent::at(Release, 210.0, 120.0), &cfg) {
        if fx == pitch_core::Effect::SavePlayers {
            store.save_players(&scene.players);
        }
    }
    let saved = store.load_players().unwrap();
    assert!(!saved[0].is_benched);
    assert_eq!((saved[0].x, saved[0].y), (210.0, 120.0));

    router.handle(&mut scene, PointerEvent::at(Press, 210.0, 120.0), &cfg);
    router.handle(&mut scene, PointerEvent::at(Move, 700.0, 50.0), &cfg);
    router.handle(&mut scene, PointerEvent::at(Release, 700.0, 50.0), &cfg);
    assert!(scene.player(id).unwrap().is_benched);
}

#[test]
fn declined_overwrite_leaves_stored_formation_alone() {
    let mut persistence = Persistence::new(MemoryStore::new());
    let mut scene = Scene::new(600.0, 400.0);
    scene.add_player(1, "Ana", Team::Home);
    let mut formations = Formations::new();
    formations.save("base", &scene, &mut yes);
    persistence.save_formations(&formations);
    let stored = persistence.store().get(FORMATIONS_KEY).unwrap();

    scene.player_mut(1).unwrap().x = 250.0;
    if formations.save("base", &scene, &mut no) != SaveOutcome::Skipped {
        persistence.save_formations(&formations);
    }
    assert_eq!(persistence.store().get(FORMATIONS_KEY).unwrap(), stored);

    assert_eq!(formations.save("base", &scene, &mut yes), SaveOutcome::Overwritten);
    persistence.save_formations(&formations);
    let reloaded = persistence.load_formations().unwrap();
    assert_eq!(reloaded.get("base").unwrap().players[0].x, 250.0);
}

#[test]
fn loading_formation_keeps_players_added_later() {
    let mut scene = Scene::new(600.0, 400.0);
    scene.add_player(1, "Ana", Team::Home);
    let mut formations = Formations::new();
    formations.save("f", &scene, &mut yes);

    scene.add_player(2, "Late", Team::Opponent);
    {
        let late = scene.player_mut(2).unwrap();
        late.is_benched = false;
        late.x = 77.0;
    }
    scene.player_mut(1).unwrap().is_benched = false;
    formations.apply("f", &mut scene);

    assert!(scene.player(1).unwrap().is_benched);
    let late = scene.player(2).unwrap();
    assert!(!late.is_benched);
    assert_eq!(late.x, 77.0);
}

#[test]
fn formations_survive_reload_in_order() {
    let mut persistence = Persistence::new(MemoryStore::new());
    let scene = Scene::new(600.0, 400.0);
    let mut formations = Formations::new();
    for name in ["zeta", "alpha", "mid"] {
        formations.save(name, &scene, &mut yes);
    }
    persistence.save_formations(&formations);
    let reloaded = Persistence::new(persistence.into_inner())
        .load_formations()
        .unwrap();
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
}
