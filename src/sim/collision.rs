//! Arcade collision primitives
//!
//! Everything here is pure geometry: axis-aligned boxes for hulls and
//! tiles, circles for projectiles, and minimal-axis separation for
//! response. The orchestrator decides what a contact means.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box described by center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Box spanning `min`..`max`
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            half: (max - min) * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half.x
            && (point.y - self.center.y).abs() <= self.half.y
    }
}

/// Separation data for an overlapping pair
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit axis pointing from `b` toward `a`
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

/// Minimal-axis contact between two boxes, `None` when separated
pub fn aabb_contact(a: &Aabb, b: &Aabb) -> Option<Contact> {
    let delta = a.center - b.center;
    let overlap_x = a.half.x + b.half.x - delta.x.abs();
    let overlap_y = a.half.y + b.half.y - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_x < overlap_y {
        Some(Contact {
            normal: Vec2::new(delta.x.signum(), 0.0),
            penetration: overlap_x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, delta.y.signum()),
            penetration: overlap_y,
        })
    }
}

/// Circle-vs-box overlap test (projectile against a hull or tile)
pub fn circle_overlaps_aabb(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    center.distance_squared(closest) < radius * radius
}

/// Keep a box of half-extents `half` inside `bounds`, reflecting the
/// velocity component on each axis it touches (full restitution).
/// Returns true when a wall was hit.
pub fn bounce_in_bounds(pos: &mut Vec2, vel: &mut Vec2, half: Vec2, bounds: &Aabb) -> bool {
    let min = bounds.min() + half;
    let max = bounds.max() - half;
    let mut hit = false;

    if pos.x < min.x {
        pos.x = min.x;
        vel.x = vel.x.abs();
        hit = true;
    } else if pos.x > max.x {
        pos.x = max.x;
        vel.x = -vel.x.abs();
        hit = true;
    }

    if pos.y < min.y {
        pos.y = min.y;
        vel.y = vel.y.abs();
        hit = true;
    } else if pos.y > max.y {
        pos.y = max.y;
        vel.y = -vel.y.abs();
        hit = true;
    }

    hit
}

/// Whether a point has left the world entirely
#[inline]
pub fn outside_bounds(point: Vec2, bounds: &Aabb) -> bool {
    !bounds.contains(point)
}
