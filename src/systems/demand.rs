use serde::Serialize;

use crate::grid::Grid;

/// RCI demand in `[-100, 100]` plus the layoff pressure applied to job
/// zones when jobs outnumber residents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Demand {
    pub residential: f64,
    pub commercial: f64,
    pub industrial: f64,
    pub job_cut_chance: f64,
}

impl Demand {
    pub fn from_totals(residents: u64, jobs: u64) -> Self {
        let r = residents as f64;
        let j = jobs as f64;
        let job_cut_chance = if jobs > 0 && jobs > residents {
            (2.0 * (j - r) / j).min(1.0)
        } else {
            0.0
        };
        Self {
            residential: clamp(50.0 + (j - r)),
            commercial: clamp(0.5 * (r - j)),
            industrial: clamp(0.5 * (r - j)),
            job_cut_chance,
        }
    }

    pub fn assess(grid: &Grid) -> Self {
        Self::from_totals(grid.residents(), grid.jobs())
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::from_totals(0, 0)
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(-100.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_city_baseline() {
        let demand = Demand::default();
        assert_eq!(demand.residential, 50.0);
        assert_eq!(demand.commercial, 0.0);
        assert_eq!(demand.industrial, 0.0);
        assert_eq!(demand.job_cut_chance, 0.0);
    }

    #[test]
    fn residents_drive_job_demand() {
        let demand = Demand::from_totals(80, 20);
        assert_eq!(demand.residential, -10.0);
        assert_eq!(demand.commercial, 30.0);
        assert_eq!(demand.industrial, 30.0);
        assert_eq!(demand.job_cut_chance, 0.0);
    }

    #[test]
    fn values_are_clamped() {
        let demand = Demand::from_totals(0, 500);
        assert_eq!(demand.residential, 100.0);
        assert_eq!(demand.commercial, -100.0);
        let demand = Demand::from_totals(500, 0);
        assert_eq!(demand.residential, -100.0);
        assert_eq!(demand.industrial, 100.0);
    }

    #[test]
    fn job_cut_chance_tracks_excess_jobs() {
        let demand = Demand::from_totals(30, 40);
        assert!((demand.job_cut_chance - 0.5).abs() < 1e-9);
        assert_eq!(Demand::from_totals(10, 40).job_cut_chance, 1.0);
        assert_eq!(Demand::from_totals(40, 40).job_cut_chance, 0.0);
    }
}
