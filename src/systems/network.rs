//! Road connectivity: connected components of road tiles and the zones
//! that front onto each one. Ids are reassigned every tick.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grid::{Coord, Grid, ZoneType};

pub type NetworkId = u32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadNetwork {
    pub id: NetworkId,
    pub res_tiles: BTreeSet<Coord>,
    pub job_tiles: BTreeSet<Coord>,
    pub road_count: u32,
}

impl RoadNetwork {
    fn new(id: NetworkId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkMap {
    size: usize,
    cells: Vec<Option<NetworkId>>,
    networks: BTreeMap<NetworkId, RoadNetwork>,
}

impl NetworkMap {
    pub fn network_at(&self, coord: Coord) -> Option<NetworkId> {
        if coord.x < self.size && coord.y < self.size {
            self.cells[coord.y * self.size + coord.x]
        } else {
            None
        }
    }

    pub fn get(&self, id: NetworkId) -> Option<&RoadNetwork> {
        self.networks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoadNetwork> {
        self.networks.values()
    }

    /// The network a zone tile belongs to: the first road neighbour's, in
    /// north, south, west, east order.
    pub fn zone_network(&self, grid: &Grid, coord: Coord) -> Option<&RoadNetwork> {
        grid.neighbors(coord)
            .into_iter()
            .find_map(|n| self.network_at(n))
            .and_then(|id| self.get(id))
    }

    /// Every network touching the tile's road neighbours.
    pub fn networks_touching(&self, grid: &Grid, coord: Coord) -> BTreeSet<NetworkId> {
        grid.neighbors(coord)
            .into_iter()
            .filter_map(|n| self.network_at(n))
            .collect()
    }
}

pub fn analyze(grid: &Grid) -> NetworkMap {
    let size = grid.size();
    let mut cells: Vec<Option<NetworkId>> = vec![None; size * size];
    let mut networks = BTreeMap::new();
    let mut next_id: NetworkId = 1;

    for start in grid.coords() {
        if !grid.is_road(start) || cells[start.y * size + start.x].is_some() {
            continue;
        }
        let id = next_id;
        next_id += 1;
        let mut network = RoadNetwork::new(id);
        let mut queue = VecDeque::from([start]);
        cells[start.y * size + start.x] = Some(id);
        network.road_count += 1;

        while let Some(current) = queue.pop_front() {
            for neighbor in grid.neighbors(current) {
                match grid.zone_at(neighbor) {
                    Some(ZoneType::Road) => {
                        let slot = &mut cells[neighbor.y * size + neighbor.x];
                        if slot.is_none() {
                            *slot = Some(id);
                            network.road_count += 1;
                            queue.push_back(neighbor);
                        }
                    }
                    Some(ZoneType::Residential) => {
                        network.res_tiles.insert(neighbor);
                    }
                    Some(zone) if zone.is_job() => {
                        network.job_tiles.insert(neighbor);
                    }
                    _ => {}
                }
            }
        }
        networks.insert(id, network);
    }

    NetworkMap {
        size,
        cells,
        networks,
    }
}

/// Euclidean distance from `from` to the closest of `targets`, 999 if none.
pub fn nearest_distance<'a>(from: Coord, targets: impl IntoIterator<Item = &'a Coord>) -> f64 {
    targets
        .into_iter()
        .map(|t| from.distance(*t))
        .fold(999.0, f64::min)
}
