//! Disk entity: a hard disk of unit mass carrying an integer coin count

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A disk in the gas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) radius: f32,
    pub(crate) coins: u32,
}

impl Disk {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, coins: u32) -> Self {
        Self {
            pos,
            vel,
            radius,
            coins,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn coins(&self) -> u32 {
        self.coins
    }

    /// Kinetic energy with unit mass: |v|² / 2
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }

    /// Move by `vel * dt`, then bounce off the walls of a `bounds.x` × `bounds.y` box.
    ///
    /// Each axis is checked on its own, so a corner hit flips both components.
    /// A bounce clamps the disk back inside and flips only the sign of the
    /// velocity component; speed is preserved.
    pub fn advance(&mut self, dt: f32, bounds: Vec2) {
        self.pos += self.vel * dt;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
        } else if self.pos.x + self.radius > bounds.x {
            self.pos.x = bounds.x - self.radius;
            self.vel.x = -self.vel.x;
        }

        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y;
        } else if self.pos.y + self.radius > bounds.y {
            self.pos.y = bounds.y - self.radius;
            self.vel.y = -self.vel.y;
        }
    }

    /// True when the disk lies fully inside the box
    pub fn is_contained(&self, bounds: Vec2) -> bool {
        self.pos.x >= self.radius
            && self.pos.x <= bounds.x - self.radius
            && self.pos.y >= self.radius
            && self.pos.y <= bounds.y - self.radius
    }
}
