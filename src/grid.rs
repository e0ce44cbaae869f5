//! Tile grid: zoning state and population for every cell.

use serde::{Deserialize, Serialize};

use crate::address::Address;

pub const GRID_SIZE: usize = 20;

/// Cell position; `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn address(self) -> Address {
        Address::from_coord(self)
    }

    pub fn distance(self, other: Coord) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Empty,
    Residential,
    Commercial,
    Industrial,
    Road,
    Park,
}

impl ZoneType {
    pub fn cost(self) -> i64 {
        match self {
            ZoneType::Residential => 100,
            ZoneType::Commercial => 200,
            ZoneType::Industrial => 300,
            ZoneType::Road => 10,
            ZoneType::Park => 50,
            ZoneType::Empty => 5,
        }
    }

    pub fn is_job(self) -> bool {
        matches!(self, ZoneType::Commercial | ZoneType::Industrial)
    }

    /// Population ceiling per level: homes for residential, jobs for
    /// commercial and industrial, nothing for the rest.
    pub fn capacity_per_level(self) -> u32 {
        match self {
            ZoneType::Residential => 50,
            ZoneType::Commercial | ZoneType::Industrial => 25,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub zone: ZoneType,
    pub population: u32,
    pub level: u32,
    pub traffic_count: u32,
    pub days_isolated: u32,
}

impl Tile {
    pub fn new(zone: ZoneType) -> Self {
        Self {
            zone,
            population: 0,
            level: 1,
            traffic_count: 0,
            days_isolated: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.zone.capacity_per_level() * self.level
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(ZoneType::Empty)
    }
}

/// Fixed-size square grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new() -> Self {
        Self::with_size(GRID_SIZE)
    }

    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            tiles: vec![Tile::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.size && coord.y < self.size
    }

    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y * self.size + coord.x)
        } else {
            None
        }
    }

    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index(coord).map(|idx| &self.tiles[idx])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.index(coord).map(move |idx| &mut self.tiles[idx])
    }

    pub fn zone_at(&self, coord: Coord) -> Option<ZoneType> {
        self.get(coord).map(|tile| tile.zone)
    }

    pub fn is_road(&self, coord: Coord) -> bool {
        self.zone_at(coord) == Some(ZoneType::Road)
    }

    /// Resolves an address to a coordinate on this grid.
    pub fn locate(&self, address: &Address) -> Option<Coord> {
        address.coord().filter(|coord| self.contains(*coord))
    }

    /// Coordinates in row-major scan order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Coord::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> + '_ {
        self.coords().zip(self.tiles.iter())
    }

    /// Orthogonal neighbours in north, south, west, east order.
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        let mut out = Vec::with_capacity(4);
        if coord.y > 0 {
            out.push(Coord::new(coord.x, coord.y - 1));
        }
        if coord.y + 1 < self.size {
            out.push(Coord::new(coord.x, coord.y + 1));
        }
        if coord.x > 0 {
            out.push(Coord::new(coord.x - 1, coord.y));
        }
        if coord.x + 1 < self.size {
            out.push(Coord::new(coord.x + 1, coord.y));
        }
        out
    }

    /// Road tiles a zone can enter the network from: the cell itself and
    /// its orthogonal neighbours, keeping only roads.
    pub fn access_points(&self, coord: Coord) -> Vec<Coord> {
        if !self.contains(coord) {
            return Vec::new();
        }
        std::iter::once(coord)
            .chain(self.neighbors(coord))
            .filter(|c| self.is_road(*c))
            .collect()
    }

    pub fn has_road_access(&self, coord: Coord) -> bool {
        self.neighbors(coord).into_iter().any(|c| self.is_road(c))
    }

    pub fn total_population(&self, zone_filter: impl Fn(ZoneType) -> bool) -> u64 {
        self.tiles
            .iter()
            .filter(|tile| zone_filter(tile.zone))
            .map(|tile| tile.population as u64)
            .sum()
    }

    pub fn residents(&self) -> u64 {
        self.total_population(|zone| zone == ZoneType::Residential)
    }

    pub fn jobs(&self) -> u64 {
        self.total_population(ZoneType::is_job)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
