use crate::grid::{Coord, Grid, ZoneType};

const RADIUS: f64 = 8.0;
const BASE_INTENSITY: f64 = 10.0;

/// Dense per-cell pollution, rebuilt from scratch every tick.
#[derive(Debug, Clone)]
pub struct PollutionField {
    size: usize,
    values: Vec<f64>,
}

impl PollutionField {
    pub fn at(&self, coord: Coord) -> f64 {
        if coord.x < self.size && coord.y < self.size {
            self.values[coord.y * self.size + coord.x]
        } else {
            0.0
        }
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Industrial tiles emit `10 + population`, falling off as
/// `intensity / (distance + 1)` and cut off at distance 8.
pub fn compute(grid: &Grid) -> PollutionField {
    let size = grid.size();
    let sources: Vec<(Coord, f64)> = grid
        .iter()
        .filter(|(_, tile)| tile.zone == ZoneType::Industrial)
        .map(|(coord, tile)| (coord, BASE_INTENSITY + tile.population as f64))
        .collect();

    let mut values = vec![0.0; size * size];
    if !sources.is_empty() {
        for cell in grid.coords() {
            values[cell.y * size + cell.x] = sources
                .iter()
                .map(|(source, intensity)| (cell.distance(*source), intensity))
                .filter(|(distance, _)| *distance < RADIUS)
                .map(|(distance, intensity)| intensity / (distance + 1.0))
                .sum();
        }
    }
    PollutionField { size, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_industry_no_pollution() {
        let field = compute(&Grid::new());
        assert_eq!(field.max(), 0.0);
    }

    #[test]
    fn falloff_and_cutoff() {
        let mut grid = Grid::new();
        let plant = grid.get_mut(Coord::new(10, 10)).unwrap();
        plant.zone = ZoneType::Industrial;
        plant.population = 20;

        let field = compute(&grid);
        assert!((field.at(Coord::new(10, 10)) - 30.0).abs() < 1e-9);
        assert!((field.at(Coord::new(12, 10)) - 10.0).abs() < 1e-9);
        // 7 tiles away still counts, 8 does not.
        assert!((field.at(Coord::new(17, 10)) - 30.0 / 8.0).abs() < 1e-9);
        assert_eq!(field.at(Coord::new(18, 10)), 0.0);
    }

    #[test]
    fn sources_accumulate() {
        let mut grid = Grid::new();
        for x in [4, 6] {
            grid.get_mut(Coord::new(x, 0)).unwrap().zone = ZoneType::Industrial;
        }
        let field = compute(&grid);
        // Each source contributes 10 / (1 + 1) at the midpoint.
        assert!((field.at(Coord::new(5, 0)) - 10.0).abs() < 1e-9);
    }
}
