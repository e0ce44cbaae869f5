pub mod address;
pub mod denizen;
pub mod engine;
pub mod events;
pub mod grid;
pub mod rng;
pub mod scenario;
pub mod schedule;
pub mod systems;
pub mod world;

pub use engine::{step, BuildOutcome, Engine, EngineBuilder, EngineSettings, TickReport};
pub use events::SimEvent;
pub use grid::{Coord, Grid, Tile, ZoneType};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::CityState;
