use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    address::Address,
    denizen::Roster,
    grid::{Coord, Grid, Tile, ZoneType},
    rng::SeededRng,
    world::{CityState, TaxPolicy, DEFAULT_STARTING_MONEY},
};

fn default_starting_money() -> i64 {
    DEFAULT_STARTING_MONEY
}

fn default_level() -> u32 {
    1
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_starting_money")]
    pub starting_money: i64,
    #[serde(default)]
    pub tax: TaxPolicy,
    #[serde(default)]
    pub roads: Vec<String>,
    #[serde(default)]
    pub tiles: Vec<ScenarioTile>,
    #[serde(default)]
    pub denizens: Vec<ScenarioDenizens>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioTile {
    pub at: String,
    pub zone: ZoneType,
    #[serde(default)]
    pub population: u32,
    #[serde(default = "default_level")]
    pub level: u32,
}

/// `count` residents living at `home`, optionally all employed at `work`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioDenizens {
    pub home: String,
    pub work: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("'{0}' is not a grid address")]
    BadAddress(String),
    #[error("{at}: level must be at least 1")]
    BadLevel { at: String },
    #[error("{at}: population {population} exceeds capacity {capacity}")]
    OverCapacity {
        at: String,
        population: u32,
        capacity: u32,
    },
    #[error("denizen home {0} is not a residential tile")]
    HomeNotResidential(String),
    #[error("denizen workplace {0} is not a commercial or industrial tile")]
    WorkNotJob(String),
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Lays out the grid without seeding anyone.
    fn layout(&self) -> Result<Grid, ScenarioError> {
        let mut grid = Grid::new();
        for road in &self.roads {
            let at = locate(&grid, road)?;
            if let Some(slot) = grid.get_mut(at) {
                *slot = Tile::new(ZoneType::Road);
            }
        }
        for entry in &self.tiles {
            let at = locate(&grid, &entry.at)?;
            if entry.level == 0 {
                return Err(ScenarioError::BadLevel {
                    at: entry.at.clone(),
                });
            }
            let mut tile = Tile::new(entry.zone);
            tile.level = entry.level;
            tile.population = entry.population;
            if tile.population > tile.capacity() {
                return Err(ScenarioError::OverCapacity {
                    at: entry.at.clone(),
                    population: tile.population,
                    capacity: tile.capacity(),
                });
            }
            if let Some(slot) = grid.get_mut(at) {
                *slot = tile;
            }
        }
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let grid = self.layout()?;
        for group in &self.denizens {
            let home = locate(&grid, &group.home)?;
            if grid.zone_at(home) != Some(ZoneType::Residential) {
                return Err(ScenarioError::HomeNotResidential(group.home.clone()));
            }
            if let Some(work) = &group.work {
                let at = locate(&grid, work)?;
                if !grid.zone_at(at).is_some_and(ZoneType::is_job) {
                    return Err(ScenarioError::WorkNotJob(work.clone()));
                }
            }
        }
        Ok(())
    }

    /// Builds the starting city. Seeded residents are created first; the
    /// first reconciliation pass then evens out any mismatch against the
    /// tile populations.
    pub fn build_state(&self) -> Result<CityState, ScenarioError> {
        self.validate()?;
        let grid = self.layout()?;
        let mut roster = Roster::new();
        let mut rng = SeededRng::new(self.seed);
        for group in &self.denizens {
            for _ in 0..group.count {
                let id = roster.admit(&mut rng, 0, Address::raw(&group.home), false);
                if let (Some(work), Some(denizen)) = (&group.work, roster.get_mut(id)) {
                    denizen.assign_job(0, Address::raw(work));
                }
            }
        }
        Ok(CityState::new(grid, roster, self.starting_money).with_tax(self.tax))
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(100)
    }
}

fn locate(grid: &Grid, text: &str) -> Result<Coord, ScenarioError> {
    grid.locate(&Address::raw(text))
        .ok_or_else(|| ScenarioError::BadAddress(text.to_string()))
}
