//! Fixed timestep simulation loop
//!
//! Drives the world tick by tick, feeds every collision to the statistics
//! tracker and then to any attached presenters. Physics never waits on
//! presentation: presenters only observe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::disk::Disk;
use super::stats::StatisticsTracker;
use super::world::{CollisionEvent, CollisionSink, World};
use crate::config::SimConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{Error, Result};

/// Observer of a running simulation (drawing, plotting, logging)
pub trait Presenter {
    /// Called after the tracker has recorded `event`
    fn on_collision(&mut self, _event: &CollisionEvent, _stats: &StatisticsTracker) {}

    /// Called once the whole tick has completed
    fn on_tick(&mut self, _world: &World, _stats: &StatisticsTracker) {}
}

/// Cooperative stop flag, checked between ticks
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How `run` spaces its ticks in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Tick as fast as possible
    Unpaced,
    /// Sleep until each tick boundary
    RealTime,
}

/// Totals for a `run` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub collisions: u64,
    pub stopped: bool,
}

/// Owns the world and its statistics for one run
pub struct SimulationLoop {
    world: World,
    stats: StatisticsTracker,
    presenters: Vec<Box<dyn Presenter>>,
    /// Fixed timestep (1 / fps)
    fixed_dt: f32,
    accumulator: f32,
    stop: StopHandle,
}

impl SimulationLoop {
    pub fn new(config: &SimConfig) -> Result<Self> {
        let world = World::new(config)?;
        let mut stats = StatisticsTracker::new(world.disk_count(), world.max_coins());
        if config.record_series {
            stats = stats.with_series();
        }
        Ok(Self::from_parts(world, stats, config.fps))
    }

    /// Wrap an existing world and tracker, ticking at `fps`
    pub fn from_parts(world: World, stats: StatisticsTracker, fps: u32) -> Self {
        Self {
            world,
            stats,
            presenters: Vec::new(),
            fixed_dt: 1.0 / fps.max(1) as f32,
            accumulator: 0.0,
            stop: StopHandle::default(),
        }
    }

    /// Attach a presenter; presenters are called in attach order
    pub fn add_presenter(&mut self, presenter: Box<dyn Presenter>) {
        self.presenters.push(presenter);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> &StatisticsTracker {
        &self.stats
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Handle another thread can use to stop `run`
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run exactly one step of `dt` seconds. Returns the collisions it produced.
    pub fn tick(&mut self, dt: f32) -> Result<usize> {
        let Self {
            world,
            stats,
            presenters,
            ..
        } = self;

        let mut forward = |event: &CollisionEvent, disks: &[Disk]| -> Result<()> {
            stats.on_collision(event, disks)?;
            for presenter in presenters.iter_mut() {
                presenter.on_collision(event, &*stats);
            }
            Ok(())
        };
        let collisions = world.step(dt, &mut forward)?;

        for presenter in presenters.iter_mut() {
            presenter.on_tick(world, stats);
        }
        Ok(collisions)
    }

    /// Feed `frame_dt` seconds of wall-clock time and run the whole fixed
    /// ticks it covers. Leftover time carries over to the next call; a
    /// backlog beyond the substep cap is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> Result<usize> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(Error::InvalidStep(format!(
                "frame time must be finite and >= 0, got {frame_dt}"
            )));
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut collisions = 0;
        let mut substeps = 0;
        while self.accumulator >= self.fixed_dt && substeps < MAX_SUBSTEPS {
            collisions += self.tick(self.fixed_dt)?;
            self.accumulator -= self.fixed_dt;
            substeps += 1;
        }
        if self.accumulator >= self.fixed_dt {
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator %= self.fixed_dt;
        }
        Ok(collisions)
    }

    /// Run fixed ticks until `ticks` have run (`None`: until stopped)
    pub fn run(&mut self, ticks: Option<u64>, pacing: Pacing) -> Result<RunSummary> {
        let period = Duration::from_secs_f32(self.fixed_dt);
        let mut summary = RunSummary {
            ticks: 0,
            collisions: 0,
            stopped: false,
        };
        let mut next_deadline = Instant::now() + period;

        while ticks.is_none_or(|limit| summary.ticks < limit) {
            if self.stop.is_stopped() {
                summary.stopped = true;
                break;
            }

            summary.collisions += self.tick(self.fixed_dt)? as u64;
            summary.ticks += 1;

            if pacing == Pacing::RealTime {
                let now = Instant::now();
                if now < next_deadline {
                    std::thread::sleep(next_deadline - now);
                    next_deadline += period;
                } else {
                    log::warn!("Tick {} overran its {:?} budget", self.world.tick(), period);
                    next_deadline = now + period;
                }
            }
        }

        log::info!(
            "Run finished: {} ticks, {} collisions{}",
            summary.ticks,
            summary.collisions,
            if summary.stopped { " (stopped)" } else { "" }
        );
        Ok(summary)
    }
}
