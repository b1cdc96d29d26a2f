//! Game state and scene construction
//!
//! The whole scene lives in one explicit [`GameState`] owned by the frame
//! driver - no module-level singletons. The orchestrator in `tick` is the
//! sole mutator of the enemy roster; frontends observe changes through the
//! drainable event queue.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::{DestructibleGrid, Level, SpawnKind};
use super::pool::Pool;
use super::tank::{Tank, TankKind};
use crate::consts::*;

/// Scene lifecycle. No resume path from the terminal state: a new game
/// rebuilds the state from the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities are being placed
    Loading,
    /// Frame loop active
    Running,
    /// Terminal: input disabled, physics halted, roster cleared
    PlayerDestroyed,
}

/// Which side fired a projectile; decides what it can damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemies,
}

/// A pooled projectile slot. Active means visible and collidable; the
/// pool's flag is the single source of truth for all three.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
}

/// A pooled, visual-only explosion effect
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    /// Seconds since activation
    pub elapsed: f32,
}

impl Explosion {
    /// Fixed-length animation has played out
    pub fn finished(&self) -> bool {
        self.elapsed >= EXPLOSION_FRAMES as f32 / EXPLOSION_FPS
    }

    /// Current animation frame for rendering
    pub fn frame(&self) -> u32 {
        ((self.elapsed * EXPLOSION_FPS) as u32).min(EXPLOSION_FRAMES - 1)
    }
}

/// Follow camera with impact shake
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub shake_remaining_ms: f32,
    pub shake_amplitude: f32,
}

impl Camera {
    fn new(pos: Vec2) -> Self {
        Self {
            pos,
            shake_remaining_ms: 0.0,
            shake_amplitude: 0.0,
        }
    }

    /// Lerp toward the target, staying inside the map
    pub fn follow(&mut self, target: Vec2, bounds: &Aabb) {
        self.pos += (target - self.pos) * CAMERA_LERP;
        self.pos = self.pos.clamp(bounds.min(), bounds.max());
    }

    pub fn shake(&mut self, duration_ms: f32, amplitude: f32) {
        self.shake_remaining_ms = self.shake_remaining_ms.max(duration_ms);
        self.shake_amplitude = amplitude;
    }

    pub fn decay_shake(&mut self) {
        self.shake_remaining_ms = (self.shake_remaining_ms - TICK_MS).max(0.0);
        if self.shake_remaining_ms == 0.0 {
            self.shake_amplitude = 0.0;
        }
    }
}

/// Things that happened during a tick, drained by the frontend for
/// rendering, HUD refresh and audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired { owner: Owner },
    TileDamaged { x: u32, y: u32 },
    /// A player projectile damaged this enemy (score already updated)
    EnemyHit { id: u32 },
    EnemyDestroyed { id: u32 },
    PlayerHit,
    PlayerDestroyed,
    ExplosionFinished,
}

/// Complete scene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed used to place enemies, kept for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub time_ticks: u64,
    /// +1 per confirmed player-projectile hit on an enemy
    pub score: u32,
    pub player: Tank,
    /// Live roster; destroyed enemies are removed
    pub enemies: Vec<Tank>,
    pub player_shots: Pool<Projectile>,
    pub enemy_shots: Pool<Projectile>,
    pub explosions: Pool<Explosion>,
    pub grid: DestructibleGrid,
    pub bounds: Aabb,
    pub camera: Camera,
    pub input_enabled: bool,
    pub physics_paused: bool,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build a scene from a parsed level: exactly one player, zero or more
    /// enemies with seeded random spawn headings.
    pub fn from_level(level: &Level, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = level.world_bounds();

        let player_spawn = level
            .spawns
            .iter()
            .find(|s| s.kind == SpawnKind::Player)
            .expect("Level::from_json guarantees a player spawn");

        let mut next_id = 0;
        let player = Tank::new(next_id, TankKind::Player, player_spawn.pos);
        next_id += 1;

        let mut enemies = Vec::new();
        for spawn in &level.spawns {
            let kind = match spawn.kind {
                SpawnKind::Player => continue,
                SpawnKind::Enemy => TankKind::Enemy,
                SpawnKind::Boss => TankKind::Boss,
                SpawnKind::Fast => TankKind::Fast,
            };
            let mut enemy = Tank::new(next_id, kind, spawn.pos);
            next_id += 1;
            enemy.init_movement(rng.random_range(-std::f32::consts::PI..std::f32::consts::PI));
            enemies.push(enemy);
        }

        log::info!(
            "scene built: 1 player, {} enemies, {}x{} tiles",
            enemies.len(),
            level.width,
            level.height
        );

        let explosion_capacity = enemies.len() + 1;
        Self {
            seed,
            phase: GamePhase::Running,
            time_ticks: 0,
            score: 0,
            camera: Camera::new(player.pos),
            player,
            enemies,
            player_shots: Pool::new(PROJECTILE_POOL_SIZE, Projectile::default),
            enemy_shots: Pool::new(PROJECTILE_POOL_SIZE, Projectile::default),
            explosions: Pool::new(explosion_capacity, Explosion::default),
            grid: DestructibleGrid::from_level(level),
            bounds,
            input_enabled: true,
            physics_paused: false,
            events: Vec::new(),
            next_id,
        }
    }

    /// Frame clock in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.time_ticks as f32 * TICK_MS
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand this tick's events to the frontend
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Terminal transition on player destruction: deterministic halt
    pub fn halt_simulation(&mut self) {
        log::info!("player destroyed at tick {}, halting", self.time_ticks);
        self.phase = GamePhase::PlayerDestroyed;
        self.input_enabled = false;
        self.physics_paused = true;
        self.enemies.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;

    pub(crate) fn test_level() -> Level {
        Level::from_json(
            r#"{
                "width": 20,
                "height": 20,
                "tilewidth": 32,
                "tileheight": 32,
                "tilesets": [{
                    "firstgid": 1,
                    "tilecount": 4,
                    "tileproperties": {
                        "0": { "collides": true },
                        "1": { "collides": false }
                    }
                }],
                "layers": [
                    { "name": "ground", "data": [] },
                    { "name": "destructable", "data": [] },
                    { "name": "objects", "objects": [
                        { "type": "playerSpawn", "x": 100.0, "y": 100.0 },
                        { "type": "enemySpawn", "x": 300.0, "y": 100.0 },
                        { "type": "bossSpawn", "x": 500.0, "y": 500.0 },
                        { "type": "fastSpawn", "x": 100.0, "y": 500.0 }
                    ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_scene_construction() {
        let state = GameState::from_level(&test_level(), 7);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.kind, TankKind::Player);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.enemies[0].kind, TankKind::Enemy);
        assert_eq!(state.enemies[1].kind, TankKind::Boss);
        assert_eq!(state.enemies[2].kind, TankKind::Fast);
        // Explosion pool sized to roster + 1
        assert_eq!(state.explosions.capacity(), 4);
        assert_eq!(state.player_shots.capacity(), 5);
    }

    #[test]
    fn test_enemy_spawn_headings_are_seeded() {
        let a = GameState::from_level(&test_level(), 42);
        let b = GameState::from_level(&test_level(), 42);
        let c = GameState::from_level(&test_level(), 43);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.heading, eb.heading);
        }
        // Different seed should move at least one heading
        assert!(
            a.enemies
                .iter()
                .zip(&c.enemies)
                .any(|(ea, ec)| ea.heading != ec.heading)
        );
    }

    #[test]
    fn test_enemies_spawn_moving_at_full_speed() {
        let state = GameState::from_level(&test_level(), 1);
        for enemy in &state.enemies {
            let speed = enemy.vel.length();
            assert!((speed - enemy.max_speed).abs() < 1e-3);
        }
    }

    #[test]
    fn test_halt_simulation_is_terminal_and_clean() {
        let mut state = GameState::from_level(&test_level(), 1);
        state.halt_simulation();
        assert_eq!(state.phase, GamePhase::PlayerDestroyed);
        assert!(!state.input_enabled);
        assert!(state.physics_paused);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_explosion_animation_lifecycle() {
        let mut fx = Explosion {
            pos: Vec2::ZERO,
            elapsed: 0.0,
        };
        assert_eq!(fx.frame(), 0);
        assert!(!fx.finished());
        fx.elapsed = 0.5;
        assert_eq!(fx.frame(), 12);
        fx.elapsed = 1.1;
        assert!(fx.finished());
        assert_eq!(fx.frame(), EXPLOSION_FRAMES - 1);
    }

    #[test]
    fn test_camera_follow_clamps_to_bounds() {
        let mut cam = Camera::new(Vec2::ZERO);
        let bounds = Aabb::from_min_max(Vec2::ZERO, Vec2::splat(640.0));
        cam.follow(Vec2::new(-200.0, 300.0), &bounds);
        assert!(cam.pos.x >= 0.0);
        assert!(cam.pos.y > 0.0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = GameState::from_level(&test_level(), 9);
        state.score = 3;
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase, state.phase);
        assert_eq!(restored.score, 3);
        assert_eq!(restored.enemies.len(), state.enemies.len());
    }
}
