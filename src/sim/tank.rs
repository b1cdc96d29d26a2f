//! Tank entities
//!
//! One concrete record covers every variant; behavior differences are a
//! `match` over [`TankKind`] plus the per-kind parameter set. A tank is
//! three stacked visual parts (shadow, hull, turret) sharing one position,
//! with independent hull and turret headings.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::{angle_between, normalize_angle, velocity_from_heading};

/// Tank variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    /// Baseline tracked enemy
    Enemy,
    /// Slower, tougher, faster fire rate
    Boss,
    /// Quicker, default toughness, slower fire rate
    Fast,
}

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankParams {
    pub max_speed: f32,
    pub damage_max: u32,
    /// Minimum cooldown between shots. Unused for the player, whose fire
    /// rate is bounded by the projectile pool alone.
    pub shot_interval_ms: f32,
}

impl TankKind {
    pub fn params(self) -> TankParams {
        match self {
            TankKind::Player => TankParams {
                max_speed: 100.0,
                damage_max: 10,
                shot_interval_ms: 0.0,
            },
            TankKind::Enemy => TankParams {
                max_speed: 100.0,
                damage_max: 2,
                shot_interval_ms: 500.0,
            },
            TankKind::Boss => TankParams {
                max_speed: 50.0,
                damage_max: 5,
                shot_interval_ms: 200.0,
            },
            TankKind::Fast => TankParams {
                max_speed: 150.0,
                damage_max: 2,
                shot_interval_ms: 800.0,
            },
        }
    }

    pub fn is_enemy(self) -> bool {
        self != TankKind::Player
    }
}

/// What a single hit did to the tank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Hit registered, tank still fully operational
    Damaged,
    /// This hit pushed the tank into the burning state
    Burning,
    /// This hit destroyed the tank
    Destroyed,
}

/// Directional drive input for the player tank
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveInput {
    pub forward: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Pointer position in world space (turret aim)
    pub pointer_world: Vec2,
}

/// A combat unit of any variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    pub kind: TankKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hull heading (radians)
    pub heading: f32,
    /// Turret heading, independent of the hull
    pub turret_heading: f32,
    /// Shadow part mirrors the hull each update
    pub shadow_heading: f32,
    /// Player scalar drive speed (signed, reverse is negative)
    pub current_speed: f32,
    pub damage_count: u32,
    pub damage_max: u32,
    pub max_speed: f32,
    pub shot_interval_ms: f32,
    /// Earliest time the tank may fire again (ms on the frame clock)
    pub next_shot_ms: f32,
    pub turret_visible: bool,
    pub immovable: bool,
}

impl Tank {
    pub fn new(id: u32, kind: TankKind, pos: Vec2) -> Self {
        let params = kind.params();
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            turret_heading: 0.0,
            shadow_heading: 0.0,
            current_speed: 0.0,
            damage_count: 0,
            damage_max: params.damage_max,
            max_speed: params.max_speed,
            shot_interval_ms: params.shot_interval_ms,
            next_shot_ms: 0.0,
            turret_visible: true,
            immovable: false,
        }
    }

    /// Set off in a direction at full speed (enemy spawn movement)
    pub fn init_movement(&mut self, heading: f32) {
        self.heading = normalize_angle(heading);
        self.shadow_heading = self.heading;
        self.vel = velocity_from_heading(self.heading, self.max_speed);
    }

    /// Hull collision box (inset from the sprite)
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(HULL_HALF))
    }

    /// Projectiles spawn here
    pub fn turret_tip(&self) -> Vec2 {
        self.pos + velocity_from_heading(self.turret_heading, HULL_SIZE / 2.0)
    }

    pub fn is_destroyed(&self) -> bool {
        self.damage_count >= self.damage_max
    }

    pub fn is_burning(&self) -> bool {
        self.damage_count + 1 == self.damage_max
    }

    pub fn is_undamaged(&self) -> bool {
        self.damage_count == 0
    }

    /// A tank fights only while it has more than one hit left
    pub fn can_fire(&self) -> bool {
        self.damage_count + 2 <= self.damage_max
    }

    /// Enter the burning state: turret gone, dead in the water. Idempotent.
    pub fn burn(&mut self) {
        self.turret_visible = false;
        self.vel = Vec2::ZERO;
        self.current_speed = 0.0;
        self.immovable = true;
    }

    /// Apply one confirmed hit
    pub fn damage(&mut self) -> DamageOutcome {
        self.damage_count = (self.damage_count + 1).min(self.damage_max);
        if self.is_destroyed() {
            DamageOutcome::Destroyed
        } else if self.is_burning() {
            self.burn();
            DamageOutcome::Burning
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Mirror the auxiliary parts onto the hull
    fn sync_parts(&mut self) {
        self.shadow_heading = self.heading;
    }

    /// Player per-tick update: drive, steer, aim
    pub fn update_player(&mut self, input: &DriveInput) {
        self.sync_parts();

        if !self.immovable {
            if input.forward {
                if self.current_speed < self.max_speed {
                    self.current_speed += PLAYER_ACCEL_PER_TICK;
                }
            } else if input.reverse {
                if self.current_speed > -self.max_speed {
                    self.current_speed -= PLAYER_ACCEL_PER_TICK;
                }
            } else {
                self.current_speed *= PLAYER_SPEED_DECAY;
            }

            // Steering inverts while reversing, like a real vehicle
            if input.steer_left {
                if self.current_speed > 0.0 {
                    self.heading -= PLAYER_TURN_PER_TICK;
                } else {
                    self.heading += PLAYER_TURN_PER_TICK;
                }
            } else if input.steer_right {
                if self.current_speed > 0.0 {
                    self.heading += PLAYER_TURN_PER_TICK;
                } else {
                    self.heading -= PLAYER_TURN_PER_TICK;
                }
            }
            self.heading = normalize_angle(self.heading);

            self.vel = velocity_from_heading(self.heading, self.current_speed);
        }

        self.turret_heading = angle_between(self.pos, input.pointer_world);
        self.shadow_heading = self.heading;
    }

    /// Enemy per-tick update: track the player, decide whether to fire.
    /// Returns true when the tank wants a shot this tick (cooldown reset
    /// happens here so a dropped shot still consumes the window).
    pub fn update_enemy(&mut self, player_pos: Vec2, now_ms: f32) -> bool {
        self.sync_parts();

        self.turret_heading = angle_between(self.pos, player_pos);
        // Hull follows physical motion, not turret aim
        if self.vel.length_squared() > f32::EPSILON {
            self.heading = self.vel.y.atan2(self.vel.x);
            self.shadow_heading = self.heading;
        }

        if !self.can_fire() {
            return false;
        }
        if self.pos.distance(player_pos) >= ENGAGEMENT_RANGE {
            return false;
        }
        if now_ms < self.next_shot_ms {
            return false;
        }
        self.next_shot_ms = now_ms + self.shot_interval_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_variant_defaults() {
        let enemy = TankKind::Enemy.params();
        assert_eq!(enemy.damage_max, 2);
        assert_eq!(enemy.shot_interval_ms, 500.0);
        assert_eq!(enemy.max_speed, 100.0);

        let boss = TankKind::Boss.params();
        assert_eq!(boss.damage_max, 5);
        assert_eq!(boss.shot_interval_ms, 200.0);
        assert_eq!(boss.max_speed, 50.0);

        let fast = TankKind::Fast.params();
        assert_eq!(fast.damage_max, 2);
        assert_eq!(fast.shot_interval_ms, 800.0);
        assert_eq!(fast.max_speed, 150.0);

        assert_eq!(TankKind::Player.params().damage_max, 10);
    }

    #[test]
    fn test_two_hit_enemy_burns_then_dies() {
        let mut tank = Tank::new(1, TankKind::Enemy, Vec2::ZERO);
        assert!(tank.is_undamaged());

        // damage_max=2: first hit is already the burning threshold
        assert_eq!(tank.damage(), DamageOutcome::Burning);
        assert!(tank.is_burning());
        assert!(!tank.is_destroyed());
        assert!(!tank.turret_visible);
        assert!(tank.immovable);

        assert_eq!(tank.damage(), DamageOutcome::Destroyed);
        assert!(tank.is_destroyed());
    }

    #[test]
    fn test_boss_burns_on_fourth_hit() {
        let mut boss = Tank::new(1, TankKind::Boss, Vec2::ZERO);
        for _ in 0..3 {
            assert_eq!(boss.damage(), DamageOutcome::Damaged);
        }
        assert_eq!(boss.damage(), DamageOutcome::Burning);
        assert_eq!(boss.damage_count, 4);
        assert_eq!(boss.damage(), DamageOutcome::Destroyed);
    }

    #[test]
    fn test_damage_count_never_exceeds_max() {
        let mut tank = Tank::new(1, TankKind::Enemy, Vec2::ZERO);
        for _ in 0..10 {
            tank.damage();
        }
        assert_eq!(tank.damage_count, tank.damage_max);
    }

    #[test]
    fn test_burn_is_idempotent() {
        let mut tank = Tank::new(1, TankKind::Enemy, Vec2::ZERO);
        tank.vel = Vec2::new(50.0, 0.0);
        tank.burn();
        let snapshot = (tank.turret_visible, tank.immovable, tank.vel);
        tank.burn();
        assert_eq!(snapshot, (tank.turret_visible, tank.immovable, tank.vel));
    }

    #[test]
    fn test_enemy_fire_gating() {
        let mut tank = Tank::new(1, TankKind::Enemy, Vec2::ZERO);
        let player = Vec2::new(100.0, 0.0);

        assert!(tank.update_enemy(player, 0.0));
        // Cooldown: 500 ms window consumed
        assert!(!tank.update_enemy(player, 100.0));
        assert!(tank.update_enemy(player, 500.0));

        // Out of range: no shot even with cooldown elapsed
        assert!(!tank.update_enemy(Vec2::new(400.0, 0.0), 2000.0));

        // Burning tanks hold fire
        tank.damage();
        assert!(!tank.update_enemy(player, 5000.0));
    }

    #[test]
    fn test_enemy_heading_follows_velocity() {
        let mut tank = Tank::new(1, TankKind::Enemy, Vec2::ZERO);
        tank.vel = Vec2::new(0.0, 80.0);
        tank.update_enemy(Vec2::new(500.0, 0.0), 0.0);
        assert!((tank.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(tank.shadow_heading, tank.heading);
        // Turret aims at the player regardless
        assert!(tank.turret_heading.abs() < 1e-5);
    }

    #[test]
    fn test_player_accel_clamps_and_decays() {
        let mut player = Tank::new(0, TankKind::Player, Vec2::ZERO);
        let mut input = DriveInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..20 {
            player.update_player(&input);
        }
        assert!(player.current_speed <= player.max_speed + PLAYER_ACCEL_PER_TICK);

        input.forward = false;
        let before = player.current_speed;
        player.update_player(&input);
        assert!((player.current_speed - before * PLAYER_SPEED_DECAY).abs() < 1e-4);
    }

    #[test]
    fn test_player_reverse_steering_inverts() {
        let mut player = Tank::new(0, TankKind::Player, Vec2::ZERO);
        player.current_speed = 50.0;
        let input = DriveInput {
            steer_left: true,
            ..Default::default()
        };
        player.update_player(&input);
        assert!(player.heading < 0.0);

        player.heading = 0.0;
        player.current_speed = -50.0;
        player.update_player(&input);
        assert!(player.heading > 0.0);
    }

    #[test]
    fn test_burning_player_cannot_drive() {
        let mut player = Tank::new(0, TankKind::Player, Vec2::ZERO);
        player.burn();
        let input = DriveInput {
            forward: true,
            pointer_world: Vec2::new(10.0, 10.0),
            ..Default::default()
        };
        player.update_player(&input);
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.current_speed, 0.0);
        // Turret tracking still runs; the turret is just not rendered
        assert!(player.turret_heading != 0.0);
    }

    proptest! {
        /// damage_count only ever grows and never passes damage_max
        #[test]
        fn prop_damage_count_monotone_and_bounded(hits in 0usize..32) {
            let mut tank = Tank::new(0, TankKind::Boss, Vec2::ZERO);
            let mut previous = tank.damage_count;
            for _ in 0..hits {
                tank.damage();
                prop_assert!(tank.damage_count >= previous);
                prop_assert!(tank.damage_count <= tank.damage_max);
                previous = tank.damage_count;
            }
        }
    }
}
