//! Physics and exchange kernel
//!
//! Everything here is deterministic for a given seed:
//! - Seeded RNG only, owned by the world and never reseeded
//! - Stable pair order (by disk index)
//! - No presentation or platform dependencies

pub mod collision;
pub mod disk;
pub mod stats;
pub mod tick;
pub mod world;

pub use collision::{CollisionOutcome, ExchangeRule, elastic_response, overlaps, resolve};
pub use disk::Disk;
pub use stats::{SeriesPoint, StatisticsTracker, StatsSnapshot};
pub use tick::{Pacing, Presenter, RunSummary, SimulationLoop, StopHandle};
pub use world::{CollisionEvent, CollisionSink, World};
