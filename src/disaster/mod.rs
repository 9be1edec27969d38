/// Recommendation generation from weather and risk state.
pub mod advisor;
/// Virtual one-second clock for deterministic stepping.
pub mod clock;
pub mod engine;
pub mod report;
pub mod types;
/// Weather conditions and risk rolls.
pub mod weather;

pub use engine::{DisasterSim, TickRecord};
pub use report::DisasterReport;
pub use types::{DisasterError, ResourcePool, Substation};
pub use weather::WeatherKind;
