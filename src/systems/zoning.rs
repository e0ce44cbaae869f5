//! Growth and decay of zone populations.

use crate::events::{DeclineCause, SimEvent};
use crate::grid::{Coord, Grid, ZoneType};
use crate::rng::SimRng;

use super::demand::Demand;
use super::network::{nearest_distance, NetworkMap, RoadNetwork};
use super::pollution::PollutionField;

const MAX_COMMUTE: f64 = 15.0;
const MAX_CUSTOMER_DISTANCE: f64 = 20.0;
const BUST_AFTER_DAYS: u32 = 7;
const BASE_JOB_CUT_CHANCE: f64 = 0.05;

pub struct ZoningInput<'a> {
    pub grid: &'a Grid,
    pub networks: &'a NetworkMap,
    pub pollution: &'a PollutionField,
    pub demand: Demand,
}

#[derive(Debug, Clone, Default)]
pub struct ZoningOutcome {
    pub grid: Grid,
    pub res_growth: Vec<Coord>,
    pub res_decline: Vec<Coord>,
    pub events: Vec<SimEvent>,
}

/// Produces the next grid. `input.grid` is left untouched; tiles are read
/// from it and written to a fresh copy.
pub fn update(input: &ZoningInput<'_>, rng: &mut dyn SimRng) -> ZoningOutcome {
    let mut outcome = ZoningOutcome {
        grid: input.grid.clone(),
        ..ZoningOutcome::default()
    };

    for coord in input.grid.coords() {
        match input.grid.zone_at(coord) {
            Some(ZoneType::Residential) => update_residential(input, coord, rng, &mut outcome),
            Some(zone) if zone.is_job() => update_jobs(input, coord, zone, rng, &mut outcome),
            _ => {}
        }
    }
    outcome
}

fn access<'a>(input: &ZoningInput<'a>, coord: Coord) -> Option<&'a RoadNetwork> {
    if input.grid.has_road_access(coord) {
        input.networks.zone_network(input.grid, coord)
    } else {
        None
    }
}

fn update_residential(
    input: &ZoningInput<'_>,
    coord: Coord,
    rng: &mut dyn SimRng,
    outcome: &mut ZoningOutcome,
) {
    let Some(tile) = outcome.grid.get_mut(coord) else {
        return;
    };
    let Some(network) = access(input, coord) else {
        if tile.population > 0 {
            tile.population -= 1;
            outcome.res_decline.push(coord);
            outcome.events.push(SimEvent::Decline {
                address: coord.address(),
                cause: DeclineCause::NoRoad,
                resident: None,
            });
        }
        return;
    };

    let pollution = input.pollution.at(coord);
    let commute = nearest_distance(coord, &network.job_tiles);
    let commute_ok = commute <= MAX_COMMUTE;

    let mut chance = input.demand.residential / 100.0;
    if pollution > 5.0 {
        chance -= 0.5;
    }
    if pollution > 20.0 {
        chance -= 1.0;
    }
    if commute < 5.0 {
        chance += 0.2;
    } else if commute > 10.0 {
        chance -= 0.1;
    }

    if commute_ok && chance > 0.0 {
        if tile.population < tile.capacity() && rng.chance(chance) {
            tile.population += 1;
            outcome.res_growth.push(coord);
            outcome.events.push(SimEvent::Growth {
                address: coord.address(),
                zone: ZoneType::Residential,
            });
        }
    } else if tile.population > 0 && (!commute_ok || pollution > 20.0 || chance < -0.2) {
        tile.population -= 1;
        let cause = if pollution > 20.0 {
            DeclineCause::Pollution
        } else if !commute_ok {
            DeclineCause::LongCommute
        } else {
            DeclineCause::Stagnation
        };
        outcome.res_decline.push(coord);
        outcome.events.push(SimEvent::Decline {
            address: coord.address(),
            cause,
            resident: None,
        });
    }
}

fn update_jobs(
    input: &ZoningInput<'_>,
    coord: Coord,
    zone: ZoneType,
    rng: &mut dyn SimRng,
    outcome: &mut ZoningOutcome,
) {
    let Some(tile) = outcome.grid.get_mut(coord) else {
        return;
    };
    let Some(network) = access(input, coord) else {
        tile.days_isolated = 0;
        if tile.population > 0 {
            tile.population = 0;
            outcome.events.push(SimEvent::Bust {
                address: coord.address(),
                zone,
            });
        }
        return;
    };

    // Shops need customers close by; industry only needs a workforce
    // somewhere on the same network.
    let (connected, demand) = match zone {
        ZoneType::Commercial => (
            nearest_distance(coord, &network.res_tiles) <= MAX_CUSTOMER_DISTANCE,
            input.demand.commercial,
        ),
        _ => (!network.res_tiles.is_empty(), input.demand.industrial),
    };

    if connected {
        tile.days_isolated = 0;
    } else {
        tile.days_isolated += 1;
    }

    if connected && demand > 0.0 {
        if tile.population < tile.capacity() && rng.chance(demand / 100.0) {
            tile.population += 1;
            outcome.events.push(SimEvent::Growth {
                address: coord.address(),
                zone,
            });
        }
        return;
    }

    if tile.days_isolated >= BUST_AFTER_DAYS {
        tile.days_isolated = 0;
        if tile.population > 0 {
            tile.population = 0;
            outcome.events.push(SimEvent::Bust {
                address: coord.address(),
                zone,
            });
        }
        return;
    }

    let job_cut = input.demand.job_cut_chance;
    if tile.population > 0
        && (demand < -20.0 || rng.chance(job_cut))
        && (rng.chance(BASE_JOB_CUT_CHANCE) || rng.chance(job_cut))
    {
        tile.population -= 1;
    }
}
