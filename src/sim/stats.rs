//! Running coin-count statistics over collision events
//!
//! After every collision the tracker counts how many disks hold each coin
//! value `k` and adds those counts to a cumulative bucket. Dividing by the
//! number of collisions gives the running average number of disks with `k`
//! coins, which converges toward the equilibrium distribution.

use serde::Serialize;

use super::disk::Disk;
use super::world::{CollisionEvent, CollisionSink};
use crate::error::{Error, Result};

/// Read-only view of the tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub collision_count: u64,
    pub disk_count: usize,
    /// `cumulative[k]`: disks seen holding `k` coins, summed over all collisions
    pub cumulative: Vec<u64>,
}

impl StatsSnapshot {
    /// Average number of disks holding `k` coins, per bucket.
    ///
    /// `None` until the first collision.
    pub fn running_average(&self) -> Option<Vec<f64>> {
        if self.collision_count == 0 {
            return None;
        }
        let c = self.collision_count as f64;
        Some(self.cumulative.iter().map(|&n| n as f64 / c).collect())
    }

    /// Fraction of disks holding `k` coins, per bucket. Sums to 1.
    pub fn running_fraction(&self) -> Option<Vec<f64>> {
        if self.collision_count == 0 || self.disk_count == 0 {
            return None;
        }
        let denom = self.collision_count as f64 * self.disk_count as f64;
        Some(self.cumulative.iter().map(|&n| n as f64 / denom).collect())
    }

    /// Sum over every bucket; equals `collision_count * disk_count`
    pub fn observations(&self) -> u64 {
        self.cumulative.iter().sum()
    }
}

/// One point of the convergence curves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub collision: u64,
    pub running_average: Vec<f64>,
}

/// Accumulates bucket counts over the run; never reset
#[derive(Debug, Clone)]
pub struct StatisticsTracker {
    disk_count: usize,
    collision_count: u64,
    cumulative: Vec<u64>,
    /// Running averages after every collision, when enabled
    series: Option<Vec<SeriesPoint>>,
}

impl StatisticsTracker {
    /// Tracker for `disk_count` disks with buckets `0..=max_coins`
    pub fn new(disk_count: usize, max_coins: u32) -> Self {
        Self {
            disk_count,
            collision_count: 0,
            cumulative: vec![0; max_coins as usize + 1],
            series: None,
        }
    }

    /// Also keep the running-average series for plotting
    pub fn with_series(mut self) -> Self {
        self.series = Some(Vec::new());
        self
    }

    pub fn max_coins(&self) -> u32 {
        (self.cumulative.len() - 1) as u32
    }

    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// Record one collision, given every disk's coin count right after it
    pub fn record(&mut self, coins: impl IntoIterator<Item = u32>) -> Result<()> {
        let max = self.max_coins();
        let mut observed = vec![0u64; self.cumulative.len()];
        let mut disks = 0usize;
        for c in coins {
            let bucket = observed
                .get_mut(c as usize)
                .ok_or(Error::Bucket { coins: c, max })?;
            *bucket += 1;
            disks += 1;
        }
        if disks != self.disk_count {
            return Err(Error::DiskCount {
                expected: self.disk_count,
                got: disks,
            });
        }

        self.collision_count += 1;
        for (total, n) in self.cumulative.iter_mut().zip(observed) {
            *total += n;
        }

        if self.series.is_some() {
            let point = SeriesPoint {
                collision: self.collision_count,
                running_average: self.running_average_now(),
            };
            if let Some(series) = self.series.as_mut() {
                series.push(point);
            }
        }
        Ok(())
    }

    /// Record a collision straight from the disks
    pub fn record_disks(&mut self, disks: &[Disk]) -> Result<()> {
        self.record(disks.iter().map(Disk::coins))
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            collision_count: self.collision_count,
            disk_count: self.disk_count,
            cumulative: self.cumulative.clone(),
        }
    }

    /// Recorded series (empty unless built `with_series`)
    pub fn series(&self) -> &[SeriesPoint] {
        self.series.as_deref().unwrap_or(&[])
    }

    fn running_average_now(&self) -> Vec<f64> {
        let c = self.collision_count as f64;
        self.cumulative.iter().map(|&n| n as f64 / c).collect()
    }
}

impl CollisionSink for StatisticsTracker {
    fn on_collision(&mut self, _event: &CollisionEvent, disks: &[Disk]) -> Result<()> {
        self.record_disks(disks)
    }
}
