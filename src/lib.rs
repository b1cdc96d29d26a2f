//! Tank Brawl - a top-down arcade tank shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tanks, projectiles, destructible terrain)
//! - `ui`: HUD and menu overlay models (no rendering)
//! - `audio`: Audio track/event model for a frontend to drain
//! - `settings`: Persisted preferences

pub mod audio;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; steering constants are tuned per-tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per simulation tick
    pub const TICK_MS: f32 = SIM_DT * 1000.0;

    /// Hull sprite edge length
    pub const HULL_SIZE: f32 = 32.0;
    /// Hull collision box is inset from the sprite on each axis
    pub const HULL_INSET: f32 = 8.0;
    /// Collision half-extent of a hull
    pub const HULL_HALF: f32 = (HULL_SIZE - HULL_INSET) / 2.0;

    /// Projectile muzzle speed (units/s)
    pub const PROJECTILE_SPEED: f32 = 500.0;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    /// Concurrent projectiles per owner class
    pub const PROJECTILE_POOL_SIZE: usize = 5;

    /// Enemy opens fire inside this range (units)
    pub const ENGAGEMENT_RANGE: f32 = 300.0;

    /// Player speed change per tick while accelerating
    pub const PLAYER_ACCEL_PER_TICK: f32 = 10.0;
    /// Player speed multiplier per tick while coasting
    pub const PLAYER_SPEED_DECAY: f32 = 0.9;
    /// Player hull turn per tick (radians, one degree)
    pub const PLAYER_TURN_PER_TICK: f32 = std::f32::consts::PI / 180.0;

    /// Explosion animation: frame count and playback rate
    pub const EXPLOSION_FRAMES: u32 = 24;
    pub const EXPLOSION_FPS: f32 = 24.0;

    /// Camera shake raised by each player hit (duration ms, amplitude)
    pub const SHAKE_DURATION_MS: f32 = 200.0;
    pub const SHAKE_AMPLITUDE: f32 = 0.005;
    /// Camera follow interpolation factor per tick
    pub const CAMERA_LERP: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Velocity vector for a heading and scalar speed
#[inline]
pub fn velocity_from_heading(heading: f32, speed: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin()) * speed
}

/// Angle of the ray from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(PI / 4.0) - PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_from_heading() {
        let v = velocity_from_heading(0.0, 100.0);
        assert!((v.x - 100.0).abs() < 1e-4);
        assert!(v.y.abs() < 1e-4);

        let v = velocity_from_heading(PI / 2.0, 50.0);
        assert!(v.x.abs() < 1e-3);
        assert!((v.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - PI / 2.0).abs() < 1e-5);
    }
}
