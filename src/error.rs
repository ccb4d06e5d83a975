//! Crate-wide error type

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by configuration, stepping and statistics.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A step was requested with an unusable timestep.
    #[error("invalid step: {0}")]
    InvalidStep(String),

    /// A disk ended up outside `[0, max]` coins. Means the configuration lets
    /// more coins exist than one bucket range can hold.
    #[error("disk {disk} holds {coins} coins, above the maximum of {max}")]
    CoinOverflow { disk: usize, coins: u32, max: u32 },

    /// Statistics were asked to count a coin value with no bucket.
    #[error("no bucket for {coins} coins (buckets cover 0..={max})")]
    Bucket { coins: u32, max: u32 },

    /// Statistics were handed a different number of disks than they track.
    #[error("expected coin counts for {expected} disks, got {got}")]
    DiskCount { expected: usize, got: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
