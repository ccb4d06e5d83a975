//! Coin Gas - A 2-D hard-disk gas trading conserved coins on every collision
//!
//! Core modules:
//! - `sim`: Physics and exchange kernel (disks, collisions, world stepping, statistics)
//! - `config`: Validated run configuration and presets
//! - `report`: Console presentation of the running statistics
//! - `error`: Crate-wide error type

pub mod config;
pub mod error;
pub mod report;
pub mod sim;

pub use config::{DiskSpec, Preset, SimConfig};
pub use error::{Error, Result};
pub use report::ConsoleReporter;
pub use sim::{
    CollisionEvent, CollisionOutcome, Disk, ExchangeRule, Presenter, SimulationLoop,
    StatisticsTracker, StatsSnapshot, StopHandle, World,
};

/// Simulation configuration constants
pub mod consts {
    /// Window-sized world bounds
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Tick rate of the pacing clock
    pub const FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will absorb (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Disk defaults
    pub const DISK_RADIUS: f32 = 40.0;
    pub const DISK_COUNT: usize = 3;
    pub const MAX_COINS: u32 = 4;
    /// Multiplier applied once to every initial velocity
    pub const SPEED_FACTOR: f32 = 5.0;
    /// Initial velocity components are drawn from ±this (before the speed factor)
    pub const INITIAL_SPEED_RANGE: f32 = 400.0;

    /// Floor for the center distance when it is used as a divisor
    pub const DISTANCE_EPSILON: f32 = 1e-5;

    /// Print the running averages every this many collisions
    pub const REPORT_EVERY: u64 = 100;
}
