use std::collections::HashMap;

use citygrid::{
    denizen::Roster,
    engine::{step, EngineBuilder, EngineSettings},
    grid::{Coord, Grid, ZoneType},
    rng::{FixedRng, ScriptedRng, SeededRng},
    scenario::ScenarioLoader,
    systems::commute::find_path,
    world::CityState,
};

fn starter_state() -> CityState {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("scenarios/starter_town.yaml")
        .expect("scenario parses")
        .build_state()
        .expect("scenario is valid")
}

fn assert_ledger_matches(state: &CityState) {
    let homes = state.roster.count_by_home();
    let jobs = state.roster.count_by_work();
    for (coord, tile) in state.grid.iter() {
        let address = coord.address();
        let residents = homes.get(&address).copied().unwrap_or(0);
        let workers = jobs.get(&address).copied().unwrap_or(0);
        match tile.zone {
            ZoneType::Residential => assert_eq!(
                residents, tile.population,
                "tick {}: residents at {address}",
                state.time
            ),
            ZoneType::Commercial | ZoneType::Industrial => assert_eq!(
                workers, tile.population,
                "tick {}: workers at {address}",
                state.time
            ),
            _ => assert_eq!(residents, 0, "tick {}: squatters at {address}", state.time),
        }
        assert!(tile.population <= tile.capacity() || tile.capacity() == 0);
    }
    assert_eq!(state.population, state.grid.residents());
}

fn assert_history_grows(before: &Roster, after: &Roster) {
    assert!(after.len() >= before.len());
    for old in before.all() {
        let new = after.get(old.id).expect("denizens are never deleted");
        assert!(new.history().starts_with(old.history()));
        if let Some(left) = old.left() {
            assert_eq!(new.left(), Some(left));
        }
    }
}

#[test]
fn ledger_stays_in_lock_step_over_a_long_run() {
    let mut state = starter_state();
    let mut rng = SeededRng::new(99);
    for _ in 0..150 {
        let outcome = step(&state, &mut rng);
        assert_ledger_matches(&outcome.state);
        assert_history_grows(&state.roster, &outcome.state.roster);
        state = outcome.state;
    }
}

#[test]
fn ledger_survives_bulldozing_mid_run() {
    let mut engine = EngineBuilder::new(EngineSettings {
        scenario_name: "starter_town".into(),
        seed: 5,
    })
    .with_state(starter_state())
    .build();

    engine.run(20);
    let edits = [
        (0, 1, ZoneType::Empty),
        (5, 1, ZoneType::Park),
        (3, 0, ZoneType::Empty),
        (1, 1, ZoneType::Commercial),
        (0, 1, ZoneType::Residential),
        (3, 0, ZoneType::Road),
    ];
    for (x, y, zone) in edits {
        let before = engine.state().roster.clone();
        engine.build(x, y, zone);
        engine.tick();
        assert_ledger_matches(engine.state());
        assert_history_grows(&before, &engine.state().roster);
        engine.run(3);
        assert_ledger_matches(engine.state());
    }
}

#[test]
fn always_rolling_high_or_low_keeps_invariants() {
    for roll in [0.0, 0.999] {
        let mut state = starter_state();
        for _ in 0..60 {
            state = step(&state, &mut FixedRng::new(roll)).state;
            assert_ledger_matches(&state);
        }
    }
    let mut state = starter_state();
    let mut rng = ScriptedRng::new(vec![0.1, 0.7, 0.3, 0.95, 0.02]);
    for _ in 0..60 {
        state = step(&state, &mut rng).state;
        assert_ledger_matches(&state);
    }
}

#[test]
fn same_seed_same_city() {
    let run = |seed| {
        let mut engine = EngineBuilder::new(EngineSettings {
            scenario_name: "starter_town".into(),
            seed,
        })
        .with_state(starter_state())
        .build();
        engine.run(80);
        engine.state().clone()
    };
    let a = run(17);
    let b = run(17);
    assert_eq!(a.grid, b.grid);
    assert_eq!(a.roster, b.roster);
    assert_eq!(a.money, b.money);
}

#[test]
fn empty_city_only_counts_days() {
    let mut state = CityState::empty();
    let mut rng = SeededRng::new(1);
    for _ in 0..12 {
        state = step(&state, &mut rng).state;
    }
    assert_eq!(state.time, 12);
    assert_eq!(state.population, 0);
    assert_eq!(state.money, 5000);
    assert_eq!(state.grid, Grid::new());
    assert!(state.roster.is_empty());
    assert_eq!(state.demand.residential, 50.0);
}

#[test]
fn taxes_land_every_fifth_day() {
    let mut state = starter_state();
    let mut rng = SeededRng::new(3);
    let mut collected: HashMap<u64, i64> = HashMap::new();
    for _ in 0..15 {
        let outcome = step(&state, &mut rng);
        let report = outcome.report;
        assert_eq!(report.money, state.money + report.tax_collected);
        if report.tax_collected > 0 {
            collected.insert(report.tick, report.tax_collected);
            assert_eq!(report.tax_collected, (report.population as f64 * 0.5).floor() as i64);
        }
        state = outcome.state;
    }
    let mut days: Vec<u64> = collected.keys().copied().collect();
    days.sort();
    assert_eq!(days, vec![5, 10, 15]);
}

#[test]
fn traffic_follows_commutes() {
    let state = starter_state();
    let outcome = step(&state, &mut FixedRng::new(0.999));
    let traffic: u32 = outcome
        .state
        .grid
        .iter()
        .map(|(_, tile)| tile.traffic_count)
        .sum();
    assert!(traffic > 0);
    for (coord, tile) in outcome.state.grid.iter() {
        if tile.traffic_count > 0 {
            assert_eq!(tile.zone, ZoneType::Road, "traffic off-road at {coord:?}");
        }
    }
}

#[test]
fn router_takes_the_short_way() {
    let mut grid = Grid::new();
    let short = [(0, 5), (1, 5), (2, 5), (3, 5), (4, 5), (5, 5)];
    let long = [
        (0, 6),
        (0, 7),
        (0, 8),
        (1, 8),
        (2, 8),
        (3, 8),
        (4, 8),
        (5, 8),
        (5, 7),
        (5, 6),
    ];
    for (x, y) in short.iter().chain(long.iter()) {
        grid.get_mut(Coord::new(*x, *y)).unwrap().zone = ZoneType::Road;
    }
    let path = find_path(&grid, &[Coord::new(0, 5)], &[Coord::new(5, 5)]).unwrap();
    assert_eq!(path.len() - 1, 5);

    grid.get_mut(Coord::new(3, 5)).unwrap().zone = ZoneType::Empty;
    let path = find_path(&grid, &[Coord::new(0, 5)], &[Coord::new(5, 5)]).unwrap();
    assert_eq!(path.len() - 1, 3 + 5 + 3);
}
