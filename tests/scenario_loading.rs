use std::fs;

use citygrid::{
    engine::{EngineBuilder, EngineSettings},
    events::SimEvent,
    grid::{Coord, ZoneType},
    scenario::ScenarioLoader,
};
use tempfile::tempdir;

#[test]
fn loader_reads_every_fixture() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    for file in [
        "scenarios/starter_town.yaml",
        "scenarios/commute_break.yaml",
        "scenarios/industrial_isolation.yaml",
    ] {
        let scenario = loader.load(file).expect("fixture loads");
        let state = scenario.build_state().expect("fixture is valid");
        assert_eq!(state.population, state.grid.residents());
        assert_eq!(state.roster.active_count() as u64, state.population);
    }
}

#[test]
fn loader_reads_from_any_directory() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("corner.yaml"),
        r#"
name: corner
seed: 4
ticks: 3
starting_money: 120
tax: { interval_ticks: 2, rate: 1.0 }
roads: [A1]
tiles:
  - { at: B1, zone: residential, population: 2 }
  - { at: A2, zone: commercial, population: 1, level: 2 }
denizens:
  - { home: B1, work: A2 }
  - { home: B1 }
"#,
    )
    .expect("write scenario");

    let scenario = ScenarioLoader::new(temp.path())
        .load("corner.yaml")
        .expect("scenario loads");
    assert_eq!(scenario.ticks(None), 3);
    let state = scenario.build_state().expect("valid");
    assert_eq!(state.money, 120);
    assert_eq!(state.tax.interval_ticks, 2);
    assert_eq!(state.grid.get(Coord::new(1, 0)).unwrap().level, 2);
    assert_eq!(state.roster.active_count(), 2);
}

#[test]
fn loader_reports_missing_and_invalid_files() {
    let temp = tempdir().expect("tempdir");
    let loader = ScenarioLoader::new(temp.path());

    let missing = loader.load("nope.yaml").unwrap_err();
    assert!(format!("{missing:#}").contains("Failed to read scenario file"));

    fs::write(temp.path().join("broken.yaml"), "name: [unterminated").expect("write");
    let broken = loader.load("broken.yaml").unwrap_err();
    assert!(format!("{broken:#}").contains("Failed to parse"));

    fs::write(
        temp.path().join("invalid.yaml"),
        "name: invalid\nseed: 1\ntiles:\n  - { at: B1, zone: park }\ndenizens:\n  - { home: B1 }\n",
    )
    .expect("write");
    let invalid = loader.load("invalid.yaml").unwrap_err();
    let message = format!("{invalid:#}");
    assert!(message.contains("Invalid scenario"));
    assert!(message.contains("B1 is not a residential tile"));
}

#[test]
fn engine_runs_hook_each_tick() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/starter_town.yaml")
        .expect("scenario should load");
    let mut engine = EngineBuilder::new(EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
    })
    .with_state(scenario.build_state().expect("valid"))
    .build();

    let reminder = SimEvent::Rezoned {
        address: Coord::new(7, 1).address(),
        from: ZoneType::Empty,
        to: ZoneType::Park,
    };
    engine.schedule(4, reminder.clone());

    let mut ticks = Vec::new();
    let mut delivered = Vec::new();
    engine.run_with_hook(6, |report| {
        ticks.push(report.tick);
        if !report.due.is_empty() {
            delivered.push((report.tick, report.due.clone()));
        }
    });

    assert_eq!(ticks, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(delivered, vec![(4, vec![reminder])]);
}
