//! Commute routing over the road grid.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::denizen::{DenizenId, Roster};
use crate::grid::{Coord, Grid, ZoneType};

/// Breadth-first search from every start cell at once, through road tiles
/// only, stopping at the first cell that is one of `ends`. The returned
/// path includes both endpoints.
pub fn find_path(grid: &Grid, starts: &[Coord], ends: &[Coord]) -> Option<Vec<Coord>> {
    if starts.is_empty() || ends.is_empty() {
        return None;
    }
    let targets: HashSet<Coord> = ends.iter().copied().collect();
    let mut parent: HashMap<Coord, Option<Coord>> = HashMap::new();
    let mut queue = VecDeque::new();
    for start in starts {
        if parent.insert(*start, None).is_none() {
            queue.push_back(*start);
        }
    }

    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(Some(prev)) = parent.get(&cursor) {
                path.push(*prev);
                cursor = *prev;
            }
            path.reverse();
            return Some(path);
        }
        for next in grid.neighbors(current) {
            if grid.is_road(next) && !parent.contains_key(&next) {
                parent.insert(next, Some(current));
                queue.push_back(next);
            }
        }
    }
    None
}

/// Tick-scoped path cache keyed by (home, work).
pub struct PathRouter<'a> {
    grid: &'a Grid,
    cache: HashMap<(Coord, Coord), Option<Vec<Coord>>>,
    searches: usize,
}

impl<'a> PathRouter<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            cache: HashMap::new(),
            searches: 0,
        }
    }

    pub fn route(&mut self, home: Coord, work: Coord) -> Option<&[Coord]> {
        let grid = self.grid;
        let searches = &mut self.searches;
        self.cache
            .entry((home, work))
            .or_insert_with(|| {
                *searches += 1;
                find_path(grid, &grid.access_points(home), &grid.access_points(work))
            })
            .as_deref()
    }

    /// Number of BFS runs performed; repeated pairs hit the cache.
    pub fn searches(&self) -> usize {
        self.searches
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommuteReport {
    pub succeeded: HashSet<DenizenId>,
    pub failed: HashSet<DenizenId>,
    /// Trips per cell, row-major.
    pub traffic: Vec<u32>,
}

/// Routes every active, employed denizen whose home and workplace still
/// carry the right zoning. Others are skipped and counted as neither
/// success nor failure.
pub fn route_all(grid: &Grid, roster: &Roster) -> CommuteReport {
    let size = grid.size();
    let mut report = CommuteReport {
        traffic: vec![0; size * size],
        ..CommuteReport::default()
    };
    let mut router = PathRouter::new(grid);

    for denizen in roster.active() {
        let (Some(home), Some(work)) = (&denizen.home, &denizen.work) else {
            continue;
        };
        let (Some(home), Some(work)) = (grid.locate(home), grid.locate(work)) else {
            continue;
        };
        let home_ok = grid.zone_at(home) == Some(ZoneType::Residential);
        let work_ok = grid.zone_at(work).is_some_and(ZoneType::is_job);
        if !home_ok || !work_ok {
            continue;
        }
        match router.route(home, work) {
            Some(path) => {
                for step in path {
                    report.traffic[step.y * size + step.x] += 1;
                }
                report.succeeded.insert(denizen.id);
            }
            None => {
                report.failed.insert(denizen.id);
            }
        }
    }
    report
}
