//! World container: owns the disks and advances them one tick at a time
//!
//! A tick moves every disk, then scans every unordered pair `(i, j)` with
//! `i < j` once, in index order. Collisions are resolved against the live
//! state, so a disk changed by an earlier pair is seen changed by later
//! pairs in the same scan, and a disk may collide more than once per tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{self, ExchangeRule};
use super::disk::Disk;
use crate::config::SimConfig;
use crate::error::{Error, Result};

/// A resolved disk-disk collision
#[derive(Debug, Clone, Serialize)]
pub struct CollisionEvent {
    /// Tick the collision happened in (1-based)
    pub tick: u64,
    /// Indices of the pair, `first < second`
    pub pair: (usize, usize),
    /// Post-collision state of the first disk
    pub first: Disk,
    /// Post-collision state of the second disk
    pub second: Disk,
    /// Unit normal from first to second
    pub normal: Vec2,
}

/// Receives collisions synchronously during the pair scan
pub trait CollisionSink {
    /// `disks` is the whole world right after this collision was resolved.
    fn on_collision(&mut self, event: &CollisionEvent, disks: &[Disk]) -> Result<()>;
}

impl<F> CollisionSink for F
where
    F: FnMut(&CollisionEvent, &[Disk]) -> Result<()>,
{
    fn on_collision(&mut self, event: &CollisionEvent, disks: &[Disk]) -> Result<()> {
        self(event, disks)
    }
}

/// The simulated box of disks
#[derive(Debug, Clone)]
pub struct World {
    disks: Vec<Disk>,
    bounds: Vec2,
    max_coins: u32,
    rule: ExchangeRule,
    seed: u64,
    rng: Pcg32,
    tick: u64,
    total_coins: u64,
}

impl World {
    /// Build a world from a validated configuration.
    ///
    /// The generator is seeded once here; a missing seed is drawn from OS entropy.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let disks = config.build_disks(&mut rng)?;
        let total_coins = disks.iter().map(|d| d.coins as u64).sum();

        log::info!(
            "World {}x{}: {} disks, {} coins (max {} per disk), rule={}, seed={}",
            config.width,
            config.height,
            disks.len(),
            total_coins,
            config.max_coins,
            config.exchange.as_str(),
            seed
        );

        Ok(Self {
            disks,
            bounds: Vec2::new(config.width, config.height),
            max_coins: config.max_coins,
            rule: config.exchange,
            seed,
            rng,
            tick: 0,
            total_coins,
        })
    }

    /// Advance the world by `dt` seconds.
    ///
    /// Every collision is handed to `sink` before the scan moves on to the
    /// next pair. Returns how many collisions were reported.
    pub fn step(&mut self, dt: f32, sink: &mut dyn CollisionSink) -> Result<usize> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidStep(format!(
                "dt must be finite and >= 0, got {dt}"
            )));
        }

        self.tick += 1;

        for disk in &mut self.disks {
            disk.advance(dt, self.bounds);
        }

        let mut collisions = 0;
        let n = self.disks.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.disks.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);

                let outcome = collision::resolve(a, b, self.rule, self.max_coins, &mut self.rng);
                if !outcome.occurred {
                    continue;
                }

                for (idx, disk) in [(i, &*a), (j, &*b)] {
                    if disk.coins > self.max_coins {
                        return Err(Error::CoinOverflow {
                            disk: idx,
                            coins: disk.coins,
                            max: self.max_coins,
                        });
                    }
                }

                let event = CollisionEvent {
                    tick: self.tick,
                    pair: (i, j),
                    first: a.clone(),
                    second: b.clone(),
                    normal: outcome.normal,
                };
                collisions += 1;
                debug_assert_eq!(self.coin_sum(), self.total_coins);
                sink.on_collision(&event, &self.disks)?;
            }
        }

        Ok(collisions)
    }

    /// Step and collect the collisions instead of streaming them
    pub fn step_collect(&mut self, dt: f32) -> Result<Vec<CollisionEvent>> {
        let mut events = Vec::new();
        let mut collect = |event: &CollisionEvent, _: &[Disk]| -> Result<()> {
            events.push(event.clone());
            Ok(())
        };
        self.step(dt, &mut collect)?;
        Ok(events)
    }

    /// Read-only view of the disks (for drawing)
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn max_coins(&self) -> u32 {
        self.max_coins
    }

    pub fn rule(&self) -> ExchangeRule {
        self.rule
    }

    /// Seed the generator was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks stepped so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Coins in the system at construction; never changes
    pub fn total_coins(&self) -> u64 {
        self.total_coins
    }

    /// Coins currently held, summed over the disks
    pub fn coin_sum(&self) -> u64 {
        self.disks.iter().map(|d| d.coins as u64).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.disks.iter().map(Disk::kinetic_energy).sum()
    }
}
