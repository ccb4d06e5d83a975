//! Disk-disk collision detection, elastic response and coin exchange
//!
//! Disks have equal unit mass, so the elastic response swaps the normal
//! components of the two velocities and leaves the tangential ones alone.
//! Each collision also trades coins between the pair under an [`ExchangeRule`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::disk::Disk;
use crate::consts::DISTANCE_EPSILON;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionOutcome {
    /// Whether the disks overlapped (and were resolved)
    pub occurred: bool,
    /// Unit normal from the first disk toward the second (zero on a miss)
    pub normal: Vec2,
}

impl CollisionOutcome {
    pub fn miss() -> Self {
        Self {
            occurred: false,
            normal: Vec2::ZERO,
        }
    }
}

/// How two colliding disks redistribute their coins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeRule {
    /// Every coin on either disk independently crosses over with probability 1/2.
    /// Both directions are drawn before either is applied.
    #[default]
    Bernoulli,
    /// The pair's pooled coins are re-split uniformly over every split that
    /// keeps both disks within the maximum.
    UniformSplit,
}

impl ExchangeRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeRule::Bernoulli => "bernoulli",
            ExchangeRule::UniformSplit => "uniform",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bernoulli" | "coin-flip" => Some(ExchangeRule::Bernoulli),
            "uniform" | "uniform-split" => Some(ExchangeRule::UniformSplit),
            _ => None,
        }
    }

    /// New coin counts for a pair holding `a` and `b` coins.
    ///
    /// The returned pair always sums to `a + b`.
    pub fn exchange<R: Rng + ?Sized>(&self, a: u32, b: u32, max_coins: u32, rng: &mut R) -> (u32, u32) {
        match self {
            ExchangeRule::Bernoulli => {
                let to_b = flip_count(a, rng);
                let to_a = flip_count(b, rng);
                (a - to_b + to_a, b - to_a + to_b)
            }
            ExchangeRule::UniformSplit => {
                let total = a + b;
                let lo = total.saturating_sub(max_coins);
                let hi = total.min(max_coins);
                if lo > hi {
                    // No admissible split; the world reports the overflow.
                    return (a, b);
                }
                let first = rng.random_range(lo..=hi);
                (first, total - first)
            }
        }
    }
}

/// Number of `coins` that pass a fair Bernoulli draw
fn flip_count<R: Rng + ?Sized>(coins: u32, rng: &mut R) -> u32 {
    (0..coins).filter(|_| rng.random_bool(0.5)).count() as u32
}

/// True when the disk centers are closer than the sum of the radii
#[inline]
pub fn overlaps(a: &Disk, b: &Disk) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Resolve a possible collision between two disks.
///
/// On overlap: swaps the normal velocity components and exchanges coins.
/// Without overlap neither disk is touched.
pub fn resolve<R: Rng + ?Sized>(
    a: &mut Disk,
    b: &mut Disk,
    rule: ExchangeRule,
    max_coins: u32,
    rng: &mut R,
) -> CollisionOutcome {
    let dist = a.pos.distance(b.pos);
    if dist >= a.radius + b.radius {
        return CollisionOutcome::miss();
    }

    // Coincident centers give a zero normal instead of a NaN one
    let normal = (b.pos - a.pos) / dist.max(DISTANCE_EPSILON);
    elastic_response(a, b, normal);

    let (coins_a, coins_b) = rule.exchange(a.coins, b.coins, max_coins, rng);
    log::debug!(
        "exchange {}+{} -> {}+{} ({})",
        a.coins,
        b.coins,
        coins_a,
        coins_b,
        rule.as_str()
    );
    a.coins = coins_a;
    b.coins = coins_b;

    CollisionOutcome {
        occurred: true,
        normal,
    }
}

/// Equal-mass elastic response along `normal`
///
/// Both updates use the normal speeds taken before either velocity changes.
pub fn elastic_response(a: &mut Disk, b: &mut Disk, normal: Vec2) {
    let v1n = a.vel.dot(normal);
    let v2n = b.vel.dot(normal);
    a.vel += (v2n - v1n) * normal;
    b.vel += (v1n - v2n) * normal;
}
