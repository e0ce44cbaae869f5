//! Keeps the denizen roster in lock-step with tile populations.
//!
//! The probabilistic part (moves, hires, arrivals, departures) follows the
//! growth and decline events produced by zoning. [`reconcile`] then forces
//! exact agreement regardless of what the earlier steps managed, and
//! [`contract_jobs`] shrinks job tiles down to the workers they really have.

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;

use crate::address::Address;
use crate::denizen::{DenizenId, LifeEventKind, Roster};
use crate::events::{DepartureReason, EvictionReason, SimEvent};
use crate::grid::{Coord, Grid, ZoneType};
use crate::rng::SimRng;

use super::commute::CommuteReport;
use super::network::{NetworkId, NetworkMap};

pub const FIRE_AFTER_MISSED_DAYS: u32 = 7;
pub const LEAVE_AFTER_UNEMPLOYED_DAYS: u32 = 30;

pub struct LedgerInput<'a> {
    pub tick: u64,
    /// Grid produced by zoning this tick.
    pub grid: &'a Grid,
    pub networks: &'a NetworkMap,
    /// Roster as it stood at the end of the previous tick.
    pub roster: &'a Roster,
    pub commutes: &'a CommuteReport,
    pub res_growth: &'a [Coord],
    pub res_decline: &'a [Coord],
}

#[derive(Debug, Clone)]
struct OpenJob {
    work: Address,
    networks: BTreeSet<NetworkId>,
}

struct Ledger<'a, 'r> {
    tick: u64,
    grid: &'a Grid,
    networks: &'a NetworkMap,
    roster: Roster,
    open_jobs: Vec<OpenJob>,
    events: &'r mut Vec<SimEvent>,
}

/// Builds the next roster. Events are appended to `events`; decline events
/// already in there get bound to the resident who actually left.
pub fn update(input: &LedgerInput<'_>, events: &mut Vec<SimEvent>, rng: &mut dyn SimRng) -> Roster {
    let mut open_jobs = collect_vacancies(input.grid, input.networks, input.roster);
    open_jobs.shuffle(rng);

    let mut ledger = Ledger {
        tick: input.tick,
        grid: input.grid,
        networks: input.networks,
        roster: input.roster.clone(),
        open_jobs,
        events: &mut *events,
    };

    let timed_out = ledger.track_attendance(input.commutes);
    let staying_put: HashSet<DenizenId> = timed_out.iter().copied().collect();

    let pairs = input.res_decline.len().min(input.res_growth.len());
    let mut leaving: Vec<Coord> = input.res_decline[pairs..].to_vec();
    let mut arriving: Vec<Coord> = input.res_growth[pairs..].to_vec();
    for (from, to) in input.res_decline.iter().zip(input.res_growth) {
        if !ledger.relocate(*from, *to, &staying_put) {
            leaving.push(*from);
            arriving.push(*to);
        }
    }

    ledger.backfill(&staying_put);

    for from in leaving {
        ledger.depart_from(from);
    }
    for id in timed_out {
        ledger.depart_unemployed(id);
    }
    for to in arriving {
        ledger.arrive(to, rng);
    }

    let mut roster = ledger.roster;
    reconcile(input.grid, &mut roster, input.tick, events, rng);
    roster
}

fn collect_vacancies(grid: &Grid, networks: &NetworkMap, roster: &Roster) -> Vec<OpenJob> {
    let workers = roster.count_by_work();
    let mut jobs = Vec::new();
    for (coord, tile) in grid.iter() {
        if !tile.zone.is_job() {
            continue;
        }
        let work = coord.address();
        let filled = workers.get(&work).copied().unwrap_or(0);
        let reachable = networks.networks_touching(grid, coord);
        for _ in filled..tile.population {
            jobs.push(OpenJob {
                work: work.clone(),
                networks: reachable.clone(),
            });
        }
    }
    jobs
}

impl Ledger<'_, '_> {
    fn home_networks(&self, home: &Address) -> BTreeSet<NetworkId> {
        self.grid
            .locate(home)
            .map(|coord| self.networks.networks_touching(self.grid, coord))
            .unwrap_or_default()
    }

    /// Takes the first open job reachable from `home`.
    fn take_job(&mut self, home: &Address) -> Option<Address> {
        let reachable = self.home_networks(home);
        let index = self
            .open_jobs
            .iter()
            .position(|job| !job.networks.is_disjoint(&reachable))?;
        Some(self.open_jobs.remove(index).work)
    }

    fn hire(&mut self, id: DenizenId, home: &Address) {
        let Some(work) = self.take_job(home) else {
            return;
        };
        if let Some(denizen) = self.roster.get_mut(id) {
            denizen.assign_job(self.tick, work.clone());
            self.events.push(SimEvent::Hired { denizen: id, work });
        }
    }

    /// Attendance and unemployment counters. Returns denizens who have been
    /// out of work too long and are leaving town.
    fn track_attendance(&mut self, commutes: &CommuteReport) -> Vec<DenizenId> {
        let tick = self.tick;
        let mut timed_out = Vec::new();
        for denizen in self.roster.slots_mut().filter(|d| d.is_active()) {
            if commutes.succeeded.contains(&denizen.id) {
                denizen.days_missed = 0;
            } else if commutes.failed.contains(&denizen.id) {
                denizen.days_missed += 1;
                if denizen.days_missed >= FIRE_AFTER_MISSED_DAYS {
                    if let Some(work) = denizen.lose_job(tick, |work| LifeEventKind::Fired { work }) {
                        self.events.push(SimEvent::Fired {
                            denizen: denizen.id,
                            work,
                        });
                    }
                }
            }

            if denizen.work.is_some() {
                denizen.unemployed_days = 0;
            } else {
                denizen.unemployed_days += 1;
                if denizen.unemployed_days > LEAVE_AFTER_UNEMPLOYED_DAYS {
                    timed_out.push(denizen.id);
                }
            }
        }
        timed_out
    }

    /// Moves the first resident of `from` to `to`, keeping identity and job.
    fn relocate(&mut self, from: Coord, to: Coord, excluded: &HashSet<DenizenId>) -> bool {
        let from_addr = from.address();
        let to_addr = to.address();
        let Some(id) = self
            .roster
            .active()
            .find(|d| d.home.as_ref() == Some(&from_addr) && !excluded.contains(&d.id))
            .map(|d| d.id)
        else {
            return false;
        };

        let tick = self.tick;
        let Some(denizen) = self.roster.get_mut(id) else {
            return false;
        };
        denizen.record(
            tick,
            LifeEventKind::Moved {
                from: from_addr.clone(),
                to: to_addr.clone(),
            },
        );
        denizen.home = Some(to_addr.clone());
        let needs_job = denizen.work.is_none();

        self.events.push(SimEvent::Moved {
            denizen: id,
            from: from_addr,
            to: to_addr.clone(),
        });
        if needs_job {
            self.hire(id, &to_addr);
        }
        true
    }

    /// Gives remaining vacancies to residents who already live here.
    fn backfill(&mut self, excluded: &HashSet<DenizenId>) {
        let jobless: Vec<(DenizenId, Address)> = self
            .roster
            .active()
            .filter(|d| d.work.is_none() && !excluded.contains(&d.id))
            .filter_map(|d| d.home.clone().map(|home| (d.id, home)))
            .collect();
        for (id, home) in jobless {
            if self.open_jobs.is_empty() {
                break;
            }
            self.hire(id, &home);
        }
    }

    fn depart_from(&mut self, from: Coord) {
        let home = from.address();
        let Some(id) = self.roster.first_resident(&home) else {
            return;
        };
        if let Some(denizen) = self.roster.get_mut(id) {
            denizen.mark_left(
                self.tick,
                LifeEventKind::LeftCity {
                    reason: DepartureReason::Decline,
                },
            );
        }
        let unbound = self.events.iter_mut().find(|event| {
            matches!(event, SimEvent::Decline { address, resident: None, .. } if *address == home)
        });
        if let Some(SimEvent::Decline { resident, .. }) = unbound {
            *resident = Some(id);
        }
        self.events.push(SimEvent::Departed {
            denizen: id,
            home: Some(home),
            reason: DepartureReason::Decline,
        });
    }

    fn depart_unemployed(&mut self, id: DenizenId) {
        let Some(denizen) = self.roster.get_mut(id) else {
            return;
        };
        if !denizen.is_active() {
            return;
        }
        denizen.mark_left(
            self.tick,
            LifeEventKind::LeftCity {
                reason: DepartureReason::Unemployment,
            },
        );
        let home = denizen.home.clone();
        self.events.push(SimEvent::Departed {
            denizen: id,
            home,
            reason: DepartureReason::Unemployment,
        });
    }

    fn arrive(&mut self, to: Coord, rng: &mut dyn SimRng) {
        let home = to.address();
        let id = self.roster.admit(rng, self.tick, home.clone(), false);
        self.events.push(SimEvent::Arrived {
            denizen: id,
            home: home.clone(),
            drift: false,
        });
        self.hire(id, &home);
    }
}

/// Forces tile populations and active denizen counts to agree.
///
/// Residential tiles evict or spawn residents to match their population.
/// Residents of anything that is no longer residential are evicted. Job
/// tiles lay off surplus workers, and workers whose workplace is gone lose
/// their job. Job tiles that are short of workers are left for
/// [`contract_jobs`].
pub fn reconcile(
    grid: &Grid,
    roster: &mut Roster,
    tick: u64,
    events: &mut Vec<SimEvent>,
    rng: &mut dyn SimRng,
) {
    for (coord, tile) in grid.iter() {
        if tile.zone != ZoneType::Residential {
            continue;
        }
        let home = coord.address();
        let residents = roster.residents_of(&home);
        let target = tile.population as usize;
        if residents.len() > target {
            for id in &residents[target..] {
                evict(roster, *id, tick, EvictionReason::Overcrowded, events);
            }
        }
        for _ in residents.len()..target {
            let id = roster.admit(rng, tick, home.clone(), true);
            events.push(SimEvent::Arrived {
                denizen: id,
                home: home.clone(),
                drift: true,
            });
        }
    }

    let misplaced: Vec<DenizenId> = roster
        .active()
        .filter(|d| {
            d.home.as_ref().is_some_and(|home| {
                grid.locate(home).and_then(|c| grid.zone_at(c)) != Some(ZoneType::Residential)
            })
        })
        .map(|d| d.id)
        .collect();
    for id in misplaced {
        evict(roster, id, tick, EvictionReason::Bulldozed, events);
    }

    for (coord, tile) in grid.iter() {
        if !tile.zone.is_job() {
            continue;
        }
        let work = coord.address();
        let workers = roster.workers_of(&work);
        let target = tile.population as usize;
        if workers.len() > target {
            for id in &workers[target..] {
                dismiss(roster, *id, tick, events, JobLoss::LaidOff);
            }
        }
    }

    let orphaned: Vec<DenizenId> = roster
        .active()
        .filter(|d| {
            d.work.as_ref().is_some_and(|work| {
                !grid
                    .locate(work)
                    .and_then(|c| grid.zone_at(c))
                    .is_some_and(ZoneType::is_job)
            })
        })
        .map(|d| d.id)
        .collect();
    for id in orphaned {
        dismiss(roster, id, tick, events, JobLoss::WorkplaceDemolished);
    }
}

fn evict(
    roster: &mut Roster,
    id: DenizenId,
    tick: u64,
    reason: EvictionReason,
    events: &mut Vec<SimEvent>,
) {
    let Some(denizen) = roster.get_mut(id) else {
        return;
    };
    denizen.mark_left(tick, LifeEventKind::Evicted { reason });
    if let Some(home) = denizen.home.clone() {
        events.push(SimEvent::Evicted {
            denizen: id,
            home,
            reason,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobLoss {
    LaidOff,
    WorkplaceDemolished,
}

impl JobLoss {
    fn life_event(self, work: Address) -> LifeEventKind {
        match self {
            JobLoss::LaidOff => LifeEventKind::LaidOff { work },
            JobLoss::WorkplaceDemolished => LifeEventKind::WorkplaceDemolished { work },
        }
    }

    fn event(self, denizen: DenizenId, work: Address) -> SimEvent {
        match self {
            JobLoss::LaidOff => SimEvent::LaidOff { denizen, work },
            JobLoss::WorkplaceDemolished => SimEvent::WorkplaceDemolished { denizen, work },
        }
    }
}

fn dismiss(
    roster: &mut Roster,
    id: DenizenId,
    tick: u64,
    events: &mut Vec<SimEvent>,
    loss: JobLoss,
) {
    let Some(denizen) = roster.get_mut(id) else {
        return;
    };
    let Some(work) = denizen.lose_job(tick, |work| loss.life_event(work)) else {
        return;
    };
    events.push(loss.event(id, work));
}

/// Job tiles never keep more population than they have active workers.
pub fn contract_jobs(grid: &Grid, roster: &Roster) -> Grid {
    let workers = roster.count_by_work();
    let mut next = grid.clone();
    for coord in grid.coords() {
        let Some(tile) = next.get_mut(coord) else {
            continue;
        };
        if tile.zone.is_job() {
            let filled = workers.get(&coord.address()).copied().unwrap_or(0);
            tile.population = tile.population.min(filled);
        }
    }
    next
}
