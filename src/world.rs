use serde::{Deserialize, Serialize};

use crate::denizen::Roster;
use crate::grid::Grid;
use crate::systems::demand::Demand;

pub const DEFAULT_STARTING_MONEY: i64 = 5000;

fn default_tax_interval() -> u64 {
    5
}

fn default_tax_rate() -> f64 {
    0.5
}

/// Every `interval_ticks` ticks the city collects `floor(population * rate)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxPolicy {
    #[serde(default = "default_tax_interval")]
    pub interval_ticks: u64,
    #[serde(default = "default_tax_rate")]
    pub rate: f64,
}

impl TaxPolicy {
    /// Tax due at `tick`, zero between collection days.
    pub fn due(&self, tick: u64, population: u64) -> i64 {
        if self.interval_ticks == 0 || tick % self.interval_ticks != 0 {
            return 0;
        }
        (population as f64 * self.rate).floor() as i64
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            interval_ticks: default_tax_interval(),
            rate: default_tax_rate(),
        }
    }
}

/// Everything one tick reads and the next tick is built from.
#[derive(Debug, Clone, Serialize)]
pub struct CityState {
    pub grid: Grid,
    pub roster: Roster,
    pub money: i64,
    pub time: u64,
    pub demand: Demand,
    pub tax: TaxPolicy,
    /// Total residential population as of the last completed tick.
    pub population: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub tick: u64,
    pub money: i64,
    pub population: u64,
    pub jobs: u64,
    pub active_denizens: usize,
    pub departed_denizens: usize,
}

impl CityState {
    pub fn new(grid: Grid, roster: Roster, money: i64) -> Self {
        let demand = Demand::assess(&grid);
        let population = grid.residents();
        Self {
            grid,
            roster,
            money,
            time: 0,
            demand,
            tax: TaxPolicy::default(),
            population,
        }
    }

    pub fn with_tax(mut self, tax: TaxPolicy) -> Self {
        self.tax = tax;
        self
    }

    pub fn empty() -> Self {
        Self::new(Grid::new(), Roster::new(), DEFAULT_STARTING_MONEY)
    }

    pub fn jobs(&self) -> u64 {
        self.grid.jobs()
    }

    pub fn snapshot(&self) -> CitySnapshot {
        let active = self.roster.active_count();
        CitySnapshot {
            tick: self.time,
            money: self.money,
            population: self.population,
            jobs: self.jobs(),
            active_denizens: active,
            departed_denizens: self.roster.len() - active,
        }
    }
}

impl Default for CityState {
    fn default() -> Self {
        Self::empty()
    }
}
