pub mod commute;
pub mod demand;
pub mod ledger;
pub mod network;
pub mod pollution;
pub mod zoning;

pub use commute::{find_path, route_all, CommuteReport, PathRouter};
pub use demand::Demand;
pub use network::{NetworkId, NetworkMap, RoadNetwork};
pub use pollution::PollutionField;
