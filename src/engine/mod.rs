use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    events::SimEvent,
    grid::{Coord, Grid, Tile, ZoneType},
    rng::{SeededRng, SimRng},
    schedule::Schedule,
    systems::{
        commute,
        demand::Demand,
        ledger::{self, LedgerInput},
        network, pollution,
        zoning::{self, ZoningInput, ZoningOutcome},
    },
    world::CityState,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
}

/// What one tick did, in a shape the narrative layer or CLI can consume.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub demand: Demand,
    pub population: u64,
    pub jobs: u64,
    pub money: i64,
    pub tax_collected: i64,
    pub events: Vec<SimEvent>,
    /// Scheduled items that came due this tick.
    pub due: Vec<SimEvent>,
}

pub struct TickOutcome {
    pub state: CityState,
    pub report: TickReport,
}

/// Advances the city by one day. `state` is read only; the returned state
/// is built from fresh copies.
pub fn step(state: &CityState, rng: &mut dyn SimRng) -> TickOutcome {
    let tick = state.time + 1;

    let demand = Demand::assess(&state.grid);
    debug!(
        tick,
        residential = demand.residential,
        commercial = demand.commercial,
        industrial = demand.industrial,
        "demand assessed"
    );

    let networks = network::analyze(&state.grid);
    debug!(tick, networks = networks.len(), "road networks analyzed");

    let pollution = pollution::compute(&state.grid);
    debug!(tick, peak = pollution.max(), "pollution computed");

    let commutes = commute::route_all(&state.grid, &state.roster);
    debug!(
        tick,
        succeeded = commutes.succeeded.len(),
        failed = commutes.failed.len(),
        "commutes routed"
    );

    let ZoningOutcome {
        mut grid,
        res_growth,
        res_decline,
        mut events,
    } = zoning::update(
        &ZoningInput {
            grid: &state.grid,
            networks: &networks,
            pollution: &pollution,
            demand,
        },
        rng,
    );
    record_traffic(&mut grid, &commutes.traffic);
    debug!(
        tick,
        growth = res_growth.len(),
        decline = res_decline.len(),
        "zones updated"
    );

    let roster = ledger::update(
        &LedgerInput {
            tick,
            grid: &grid,
            networks: &networks,
            roster: &state.roster,
            commutes: &commutes,
            res_growth: &res_growth,
            res_decline: &res_decline,
        },
        &mut events,
        rng,
    );
    let grid = ledger::contract_jobs(&grid, &roster);
    debug!(
        tick,
        active = roster.active_count(),
        events = events.len(),
        "ledger reconciled"
    );

    let population = grid.residents();
    let jobs = grid.jobs();
    let tax_collected = state.tax.due(tick, population);
    let money = state.money + tax_collected;
    if tax_collected > 0 {
        debug!(tick, tax_collected, money, "taxes collected");
    }

    let next = CityState {
        grid,
        roster,
        money,
        time: tick,
        demand,
        tax: state.tax,
        population,
    };
    let report = TickReport {
        tick,
        demand,
        population,
        jobs,
        money,
        tax_collected,
        events,
        due: Vec::new(),
    };
    TickOutcome {
        state: next,
        report,
    }
}

fn record_traffic(grid: &mut Grid, traffic: &[u32]) {
    let coords: Vec<Coord> = grid.coords().collect();
    for (coord, trips) in coords.into_iter().zip(traffic) {
        if let Some(tile) = grid.get_mut(coord) {
            tile.traffic_count = *trips;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildOutcome {
    pub at: Coord,
    pub zone: ZoneType,
    pub cost: i64,
    pub event: Option<SimEvent>,
}

/// Replaces the tile at `(x, y)` and charges for it. Out-of-range
/// coordinates and insufficient funds are a silent no-op.
pub fn build(state: &mut CityState, x: usize, y: usize, zone: ZoneType) -> Option<BuildOutcome> {
    let at = Coord::new(x, y);
    let cost = zone.cost();
    if state.money < cost {
        trace!(x, y, ?zone, money = state.money, cost, "build rejected: funds");
        return None;
    }
    let Some(tile) = state.grid.get_mut(at) else {
        trace!(x, y, ?zone, "build rejected: out of range");
        return None;
    };

    let from = tile.zone;
    *tile = Tile::new(zone);
    state.money -= cost;

    let address = at.address();
    let event = if (from == ZoneType::Road && zone != ZoneType::Road)
        || (zone == ZoneType::Empty && from != ZoneType::Empty)
    {
        Some(SimEvent::Bulldozed { address, from })
    } else if from != zone && zone != ZoneType::Road {
        Some(SimEvent::Rezoned {
            address,
            from,
            to: zone,
        })
    } else {
        None
    };

    Some(BuildOutcome {
        at,
        zone,
        cost,
        event,
    })
}

pub struct EngineBuilder {
    settings: EngineSettings,
    state: Option<CityState>,
    rng: Option<Box<dyn SimRng>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            state: None,
            rng: None,
        }
    }

    pub fn with_state(mut self, state: CityState) -> Self {
        self.state = Some(state);
        self
    }

    /// Overrides the seeded generator, e.g. with a scripted one in tests.
    pub fn with_rng(mut self, rng: impl SimRng + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn build(self) -> Engine {
        let seed = self.settings.seed;
        Engine {
            state: self.state.unwrap_or_default(),
            rng: self
                .rng
                .unwrap_or_else(|| Box::new(SeededRng::new(seed))),
            schedule: Schedule::new(),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    state: CityState,
    rng: Box<dyn SimRng>,
    schedule: Schedule<SimEvent>,
    settings: EngineSettings,
}

impl Engine {
    pub fn state(&self) -> &CityState {
        &self.state
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn tick(&mut self) -> TickReport {
        let due = self.schedule.drain_due(self.state.time + 1);
        let TickOutcome { state, mut report } = step(&self.state, self.rng.as_mut());
        self.state = state;
        report.due = due;
        report
    }

    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(ticks as usize);
        self.run_with_hook(ticks, |report| reports.push(report.clone()));
        reports
    }

    pub fn run_with_hook<F>(&mut self, ticks: u64, mut hook: F)
    where
        F: FnMut(&TickReport),
    {
        info!(
            scenario = %self.settings.scenario_name,
            seed = self.settings.seed,
            ticks,
            "running"
        );
        for _ in 0..ticks {
            let report = self.tick();
            hook(&report);
        }
        info!(
            scenario = %self.settings.scenario_name,
            tick = self.state.time,
            population = self.state.population,
            money = self.state.money,
            "run finished"
        );
    }

    pub fn build(&mut self, x: usize, y: usize, zone: ZoneType) -> Option<BuildOutcome> {
        build(&mut self.state, x, y, zone)
    }

    /// Queues `event` to be handed back in the report of tick `due`.
    pub fn schedule(&mut self, due: u64, event: SimEvent) {
        self.schedule.push(due, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;

    fn settings() -> EngineSettings {
        EngineSettings {
            scenario_name: "unit".into(),
            seed: 7,
        }
    }

    #[test]
    fn empty_city_only_advances_time() {
        let state = CityState::empty();
        let outcome = step(&state, &mut FixedRng::new(0.0));
        assert_eq!(outcome.state.time, 1);
        assert_eq!(outcome.state.population, 0);
        assert_eq!(outcome.state.money, state.money);
        assert_eq!(outcome.state.grid, state.grid);
        assert!(outcome.report.events.is_empty());
        assert_eq!(outcome.report.demand, Demand::default());
        // Input untouched.
        assert_eq!(state.time, 0);
    }

    #[test]
    fn build_charges_and_reports() {
        let mut state = CityState::empty();
        let outcome = build(&mut state, 3, 1, ZoneType::Residential).unwrap();
        assert_eq!(outcome.cost, 100);
        assert_eq!(state.money, 4900);
        assert!(matches!(outcome.event, Some(SimEvent::Rezoned { .. })));

        let road = build(&mut state, 3, 0, ZoneType::Road).unwrap();
        assert_eq!(road.event, None);

        let cleared = build(&mut state, 3, 0, ZoneType::Empty).unwrap();
        assert!(matches!(
            cleared.event,
            Some(SimEvent::Bulldozed {
                from: ZoneType::Road,
                ..
            })
        ));

        let again = build(&mut state, 3, 1, ZoneType::Residential).unwrap();
        assert_eq!(again.event, None);
        assert_eq!(state.money, 5000 - 100 - 10 - 5 - 100);
    }

    #[test]
    fn build_resets_the_tile() {
        let mut state = CityState::empty();
        let tile = state.grid.get_mut(Coord::new(1, 1)).unwrap();
        tile.zone = ZoneType::Industrial;
        tile.population = 12;
        tile.level = 2;
        tile.days_isolated = 4;
        tile.traffic_count = 9;

        build(&mut state, 1, 1, ZoneType::Commercial).unwrap();
        assert_eq!(state.grid.get(Coord::new(1, 1)), Some(&Tile::new(ZoneType::Commercial)));
    }

    #[test]
    fn build_is_silent_when_it_cannot_happen() {
        let mut state = CityState::empty();
        assert!(build(&mut state, 20, 0, ZoneType::Road).is_none());
        state.money = 299;
        assert!(build(&mut state, 0, 0, ZoneType::Industrial).is_none());
        assert_eq!(state.money, 299);
        assert_eq!(state.grid.zone_at(Coord::new(0, 0)), Some(ZoneType::Empty));
    }

    #[test]
    fn scheduled_events_come_back_when_due() {
        let mut engine = EngineBuilder::new(settings()).build();
        let event = SimEvent::Bulldozed {
            address: Coord::new(0, 0).address(),
            from: ZoneType::Road,
        };
        engine.schedule(2, event.clone());

        assert!(engine.tick().due.is_empty());
        assert_eq!(engine.tick().due, vec![event]);
        assert!(engine.tick().due.is_empty());
    }

    #[test]
    fn hook_sees_every_tick() {
        let mut engine = EngineBuilder::new(settings())
            .with_rng(FixedRng::new(0.5))
            .build();
        let mut ticks = Vec::new();
        engine.run_with_hook(4, |report| ticks.push(report.tick));
        assert_eq!(ticks, vec![1, 2, 3, 4]);
        assert_eq!(engine.state().time, 4);
    }
}
