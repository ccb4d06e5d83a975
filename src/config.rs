//! Run configuration and presets
//!
//! Loaded from JSON or built from a preset, then validated before a world
//! is created from it.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{Disk, ExchangeRule};

/// Named starting setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Three disks sharing four coins, fast
    #[default]
    Classic,
    /// Six disks sharing eight coins, spread out from the start
    Large,
    /// Six disks, all eight coins on one disk, pooled re-split exchange
    Pooled,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Large => "Large",
            Preset::Pooled => "Pooled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "small" => Some(Preset::Classic),
            "large" | "six" => Some(Preset::Large),
            "pooled" | "uniform" => Some(Preset::Pooled),
            _ => None,
        }
    }
}

/// Initial conditions of one disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskSpec {
    pub pos: Vec2,
    /// Velocity before the speed factor is applied
    pub vel: Vec2,
    pub coins: u32,
}

/// Everything needed to construct a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    pub width: f32,
    pub height: f32,
    /// Shared radius of every disk
    pub disk_radius: f32,
    /// Largest coin count a disk may hold; buckets run 0..=max_coins
    pub max_coins: u32,
    /// Multiplies every initial velocity, once
    pub speed_factor: f32,
    pub exchange: ExchangeRule,
    /// RNG seed; `None` draws one from OS entropy
    pub seed: Option<u64>,

    // === Initial conditions ===
    /// Explicit disks. When empty, a random layout of `disk_count` disks is used.
    pub disks: Vec<DiskSpec>,
    pub disk_count: usize,
    /// Random velocity components are uniform in ±this
    pub initial_velocity_range: f32,
    /// Coins per disk for the random layout. Empty puts `max_coins` on the
    /// first disk and none on the rest.
    pub coin_distribution: Vec<u32>,

    // === Host ===
    /// Tick rate of the pacing clock
    pub fps: u32,
    /// Console report cadence, in collisions
    pub report_every: u64,
    /// Keep the running-average series for plotting
    pub record_series: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            disk_radius: DISK_RADIUS,
            max_coins: MAX_COINS,
            speed_factor: SPEED_FACTOR,
            exchange: ExchangeRule::default(),
            seed: None,

            disks: Vec::new(),
            disk_count: DISK_COUNT,
            initial_velocity_range: INITIAL_SPEED_RANGE,
            coin_distribution: Vec::new(),

            fps: FPS,
            report_every: REPORT_EVERY,
            record_series: false,
        }
    }
}

impl SimConfig {
    /// Configuration for a preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self::default(),
            Preset::Large => Self {
                disk_count: 6,
                max_coins: 8,
                speed_factor: 1.0,
                initial_velocity_range: 200.0,
                coin_distribution: vec![1, 1, 1, 1, 2, 2],
                ..Self::default()
            },
            Preset::Pooled => Self {
                disk_count: 6,
                max_coins: 8,
                exchange: ExchangeRule::UniformSplit,
                ..Self::default()
            },
        }
    }

    /// Number of disks the world will hold
    pub fn effective_disk_count(&self) -> usize {
        if self.disks.is_empty() {
            self.disk_count
        } else {
            self.disks.len()
        }
    }

    /// Coins each disk starts with
    pub fn effective_coins(&self) -> Vec<u32> {
        if !self.disks.is_empty() {
            return self.disks.iter().map(|d| d.coins).collect();
        }
        if !self.coin_distribution.is_empty() {
            return self.coin_distribution.clone();
        }
        let mut coins = vec![0; self.disk_count];
        if let Some(first) = coins.first_mut() {
            *first = self.max_coins;
        }
        coins
    }

    /// Reject anything the world cannot run with
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return invalid("world bounds must be finite and > 0");
        }
        if !self.disk_radius.is_finite() || self.disk_radius <= 0.0 {
            return invalid("disk_radius must be finite and > 0");
        }
        if 2.0 * self.disk_radius > self.width || 2.0 * self.disk_radius > self.height {
            return invalid("a disk must fit inside the world");
        }
        if !self.speed_factor.is_finite() || self.speed_factor < 0.0 {
            return invalid("speed_factor must be finite and >= 0");
        }
        if self.fps == 0 {
            return invalid("fps must be > 0");
        }
        if self.report_every == 0 {
            return invalid("report_every must be > 0");
        }

        let count = self.effective_disk_count();
        if count == 0 {
            return invalid("at least one disk is required");
        }

        if self.disks.is_empty() {
            if !self.initial_velocity_range.is_finite() || self.initial_velocity_range < 0.0 {
                return invalid("initial_velocity_range must be finite and >= 0");
            }
            if !self.coin_distribution.is_empty() && self.coin_distribution.len() != count {
                return invalid(format!(
                    "coin_distribution lists {} disks but disk_count is {}",
                    self.coin_distribution.len(),
                    count
                ));
            }
        } else {
            for (i, d) in self.disks.iter().enumerate() {
                if !d.pos.is_finite() || !d.vel.is_finite() {
                    return invalid(format!("disk {i} has a non-finite position or velocity"));
                }
            }
        }

        let coins = self.effective_coins();
        if let Some((i, c)) = coins.iter().enumerate().find(|(_, c)| **c > self.max_coins) {
            return invalid(format!(
                "disk {i} starts with {c} coins, above max_coins {}",
                self.max_coins
            ));
        }
        let total: u64 = coins.iter().map(|&c| c as u64).sum();
        if total > self.max_coins as u64 {
            return invalid(format!(
                "{total} coins in total cannot fit the 0..={} bucket range",
                self.max_coins
            ));
        }

        Ok(())
    }

    /// Create the initial disks, drawing any random layout from `rng`
    pub fn build_disks<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Disk>> {
        self.validate()?;
        let r = self.disk_radius;

        if !self.disks.is_empty() {
            return Ok(self
                .disks
                .iter()
                .map(|d| Disk::new(d.pos, d.vel * self.speed_factor, r, d.coins))
                .collect());
        }

        let coins = self.effective_coins();
        let range = self.initial_velocity_range;
        let disks = coins
            .into_iter()
            .map(|c| {
                let pos = Vec2::new(
                    random_grid_coord(rng, r, self.width),
                    random_grid_coord(rng, r, self.height),
                );
                let vel = if range > 0.0 {
                    Vec2::new(rng.random_range(-range..=range), rng.random_range(-range..=range))
                } else {
                    Vec2::ZERO
                };
                Disk::new(pos, vel * self.speed_factor, r, c)
            })
            .collect();
        Ok(disks)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

/// Whole-pixel coordinate keeping a disk of radius `r` inside `[0, extent]`
fn random_grid_coord<R: Rng + ?Sized>(rng: &mut R, r: f32, extent: f32) -> f32 {
    let lo = r.ceil() as i64;
    let hi = (extent - r).floor() as i64;
    if lo > hi {
        // Fits only off-grid
        return extent / 2.0;
    }
    rng.random_range(lo..=hi) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_invalid(config: SimConfig, needle: &str) {
        match config.validate() {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
            other => panic!("expected config error about {needle}, got {other:?}"),
        }
    }

    #[test]
    fn test_presets_are_valid() -> Result<()> {
        for preset in [Preset::Classic, Preset::Large, Preset::Pooled] {
            SimConfig::from_preset(preset).validate()?;
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        Ok(())
    }

    #[test]
    fn test_preset_starting_coins() {
        let large = SimConfig::from_preset(Preset::Large);
        assert_eq!(large.effective_coins(), vec![1, 1, 1, 1, 2, 2]);
        assert_eq!(large.speed_factor, 1.0);
        assert_eq!(large.initial_velocity_range, 200.0);

        let pooled = SimConfig::from_preset(Preset::Pooled);
        assert_eq!(pooled.effective_coins(), vec![8, 0, 0, 0, 0, 0]);
        assert_eq!(pooled.exchange, ExchangeRule::UniformSplit);
        assert_eq!(pooled.speed_factor, SPEED_FACTOR);
    }

    #[test]
    fn test_default_coins_on_first_disk() {
        let config = SimConfig::default();
        assert_eq!(config.effective_coins(), vec![4, 0, 0]);
    }

    #[test]
    fn test_rejects_bad_bounds_and_radius() {
        assert_invalid(SimConfig { width: 0.0, ..SimConfig::default() }, "bounds");
        assert_invalid(SimConfig { height: f32::NAN, ..SimConfig::default() }, "bounds");
        assert_invalid(SimConfig { disk_radius: -1.0, ..SimConfig::default() }, "disk_radius");
        assert_invalid(SimConfig { disk_radius: 350.0, ..SimConfig::default() }, "fit");
    }

    #[test]
    fn test_rejects_zero_disks() {
        assert_invalid(SimConfig { disk_count: 0, ..SimConfig::default() }, "at least one");
    }

    #[test]
    fn test_rejects_more_coins_than_buckets() {
        assert_invalid(
            SimConfig {
                coin_distribution: vec![3, 2, 0],
                ..SimConfig::default()
            },
            "cannot fit",
        );
        assert_invalid(
            SimConfig {
                coin_distribution: vec![5, 0, 0],
                ..SimConfig::default()
            },
            "above max_coins",
        );
    }

    #[test]
    fn test_rejects_mismatched_coin_list() {
        assert_invalid(
            SimConfig {
                coin_distribution: vec![1, 1],
                ..SimConfig::default()
            },
            "coin_distribution",
        );
    }

    #[test]
    fn test_random_layout_fits_world() -> Result<()> {
        let config = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Vec2::new(config.width, config.height);
        for _ in 0..100 {
            let disks = config.build_disks(&mut rng)?;
            assert_eq!(disks.len(), 3);
            for d in &disks {
                assert!(d.is_contained(bounds));
                assert_eq!(d.pos().x.fract(), 0.0);
                assert!(d.vel().x.abs() <= INITIAL_SPEED_RANGE * SPEED_FACTOR);
            }
        }
        Ok(())
    }

    #[test]
    fn test_speed_factor_scales_explicit_disks() -> Result<()> {
        let config = SimConfig {
            speed_factor: 2.0,
            disks: vec![DiskSpec {
                pos: Vec2::new(100.0, 100.0),
                vel: Vec2::new(3.0, -4.0),
                coins: 1,
            }],
            ..SimConfig::default()
        };
        let disks = config.build_disks(&mut Pcg32::seed_from_u64(0))?;
        assert_eq!(disks[0].vel(), Vec2::new(6.0, -8.0));
        assert_eq!(disks[0].radius(), DISK_RADIUS);
        Ok(())
    }

    #[test]
    fn test_json_defaults_missing_fields() -> Result<()> {
        let config: SimConfig = serde_json::from_str(r#"{ "max_coins": 8, "exchange": "uniform_split" }"#)?;
        assert_eq!(config.max_coins, 8);
        assert_eq!(config.exchange, ExchangeRule::UniformSplit);
        assert_eq!(config.width, WORLD_WIDTH);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let path = std::env::temp_dir().join(format!("coin_gas_config_{}.json", std::process::id()));
        let config = SimConfig {
            seed: Some(7),
            ..SimConfig::from_preset(Preset::Large)
        };
        config.save(&path)?;
        let loaded = SimConfig::load(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }
}
