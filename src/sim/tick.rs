//! Fixed timestep simulation tick
//!
//! One `tick` pass per frame, driven by the frontend: advance the player
//! and every live enemy, integrate projectiles, then run explicit
//! post-integration resolution passes over the pending contacts. All
//! collision outcomes are decided here, not in per-collider callbacks.

use glam::Vec2;

use super::collision::{self, aabb_contact, circle_overlaps_aabb, outside_bounds};
use super::pool::Handle;
use super::state::{Explosion, GameEvent, GamePhase, GameState, Owner, Projectile};
use super::tank::{DamageOutcome, DriveInput, Tank};
use crate::consts::*;
use crate::velocity_from_heading;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub forward: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Pointer position in world space
    pub pointer_world: Vec2,
    /// Pointer pressed this tick (player shot request)
    pub fire: bool,
}

/// Advance the scene by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running || state.physics_paused {
        return;
    }

    state.time_ticks += 1;
    state.camera.decay_shake();
    let now_ms = state.now_ms();

    // --- Entity updates ---
    if state.input_enabled {
        let drive = DriveInput {
            forward: input.forward,
            reverse: input.reverse,
            steer_left: input.steer_left,
            steer_right: input.steer_right,
            pointer_world: input.pointer_world,
        };
        state.player.update_player(&drive);

        // Weapon is gone once the player is burning
        if input.fire && state.player.turret_visible {
            try_fire(
                state,
                state.player.turret_tip(),
                state.player.turret_heading,
                Owner::Player,
            );
        }
    }

    let player_pos = state.player.pos;
    let mut shot_requests: Vec<(Vec2, f32)> = Vec::new();
    for enemy in &mut state.enemies {
        if enemy.update_enemy(player_pos, now_ms) {
            shot_requests.push((enemy.turret_tip(), enemy.turret_heading));
        }
    }
    for (origin, heading) in shot_requests {
        try_fire(state, origin, heading, Owner::Enemies);
    }

    // --- Kinematics ---
    integrate_tanks(state, dt);
    resolve_tank_terrain(state);
    resolve_tank_pairs(state);
    apply_world_bounds(state);

    for (_, shot) in state.player_shots.iter_active_mut() {
        shot.pos += shot.vel * dt;
    }
    for (_, shot) in state.enemy_shots.iter_active_mut() {
        shot.pos += shot.vel * dt;
    }

    // --- Contact resolution ---
    resolve_projectiles(state, Owner::Player);
    resolve_projectiles(state, Owner::Enemies);
    advance_explosions(state, dt);

    let bounds = state.bounds;
    let target = state.player.pos;
    state.camera.follow(target, &bounds);
}

/// Request a projectile from the owner's pool. Exhaustion drops the shot
/// silently: no queueing, no error, no state change.
pub fn try_fire(state: &mut GameState, origin: Vec2, heading: f32, owner: Owner) -> bool {
    let pool = match owner {
        Owner::Player => &mut state.player_shots,
        Owner::Enemies => &mut state.enemy_shots,
    };
    let Some(handle) = pool.acquire() else {
        log::debug!("{owner:?} shot dropped: pool exhausted");
        return false;
    };
    if let Some(shot) = pool.get_mut(handle) {
        *shot = Projectile {
            pos: origin,
            vel: velocity_from_heading(heading, PROJECTILE_SPEED),
            heading,
        };
    }
    state.push_event(GameEvent::ShotFired { owner });
    true
}

fn integrate_tanks(state: &mut GameState, dt: f32) {
    if !state.player.immovable {
        state.player.pos += state.player.vel * dt;
    }
    for enemy in &mut state.enemies {
        if !enemy.immovable {
            enemy.pos += enemy.vel * dt;
        }
    }
}

/// Push hulls out of solid destructible cells, reflecting the velocity
/// component into the wall (arcade full restitution)
fn resolve_tank_terrain(state: &mut GameState) {
    let grid = &state.grid;
    let mut fix = |tank: &mut Tank| {
        if tank.immovable {
            return;
        }
        for (_, _, rect) in grid.solid_rects_near(&tank.hitbox()) {
            if let Some(contact) = aabb_contact(&tank.hitbox(), &rect) {
                tank.pos += contact.normal * contact.penetration;
                let into_wall = tank.vel.dot(contact.normal);
                if into_wall < 0.0 {
                    tank.vel -= 2.0 * into_wall * contact.normal;
                }
            }
        }
    };
    fix(&mut state.player);
    for enemy in &mut state.enemies {
        fix(enemy);
    }
}

/// Separate two overlapping hulls and exchange velocity along the contact
/// normal. An immovable (burning) hull takes none of the correction.
fn resolve_pair(a: &mut Tank, b: &mut Tank) {
    let Some(contact) = aabb_contact(&a.hitbox(), &b.hitbox()) else {
        return;
    };
    match (a.immovable, b.immovable) {
        (true, true) => {}
        (true, false) => b.pos -= contact.normal * contact.penetration,
        (false, true) => a.pos += contact.normal * contact.penetration,
        (false, false) => {
            a.pos += contact.normal * (contact.penetration * 0.5);
            b.pos -= contact.normal * (contact.penetration * 0.5);
        }
    }

    if !a.immovable && a.vel.dot(contact.normal) < 0.0 {
        a.vel -= 2.0 * a.vel.dot(contact.normal) * contact.normal;
    }
    if !b.immovable && b.vel.dot(contact.normal) > 0.0 {
        b.vel -= 2.0 * b.vel.dot(contact.normal) * contact.normal;
    }
}

/// Enemy-vs-player and enemy-vs-every-other-enemy pairs
fn resolve_tank_pairs(state: &mut GameState) {
    for enemy in &mut state.enemies {
        resolve_pair(&mut state.player, enemy);
    }
    let n = state.enemies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (left, right) = state.enemies.split_at_mut(j);
            resolve_pair(&mut left[i], &mut right[0]);
        }
    }
}

fn apply_world_bounds(state: &mut GameState) {
    let bounds = state.bounds;
    let half = Vec2::splat(HULL_HALF);
    collision::bounce_in_bounds(&mut state.player.pos, &mut state.player.vel, half, &bounds);
    for enemy in &mut state.enemies {
        collision::bounce_in_bounds(&mut enemy.pos, &mut enemy.vel, half, &bounds);
    }
}

/// Resolve every pending contact for one projectile class. Exactly one
/// outcome is processed per projectile: world-bounds exit, then the
/// destructible layer, then the relevant target set. A projectile already
/// deactivated this pass is skipped by the active-flag check.
fn resolve_projectiles(state: &mut GameState, owner: Owner) {
    let in_flight: Vec<(Handle, Vec2)> = match owner {
        Owner::Player => &state.player_shots,
        Owner::Enemies => &state.enemy_shots,
    }
    .iter_active()
    .map(|(h, shot)| (h, shot.pos))
    .collect();

    for (handle, pos) in in_flight {
        let active = match owner {
            Owner::Player => state.player_shots.is_active(handle),
            Owner::Enemies => state.enemy_shots.is_active(handle),
        };
        if !active {
            continue;
        }

        // World-bounds exit: dispose, no damage
        if outside_bounds(pos, &state.bounds) {
            dispose(state, owner, handle);
            continue;
        }

        // Destructible layer
        if let Some((x, y)) = struck_cell(state, pos) {
            dispose(state, owner, handle);
            state.grid.advance(x, y);
            state.push_event(GameEvent::TileDamaged { x, y });
            continue;
        }

        // Target set: the player for enemy shots, every live enemy for
        // player shots
        match owner {
            Owner::Enemies => {
                if circle_overlaps_aabb(pos, PROJECTILE_RADIUS, &state.player.hitbox()) {
                    dispose(state, owner, handle);
                    resolve_player_hit(state, pos);
                }
            }
            Owner::Player => {
                let struck = state
                    .enemies
                    .iter()
                    .position(|e| circle_overlaps_aabb(pos, PROJECTILE_RADIUS, &e.hitbox()));
                if let Some(index) = struck {
                    dispose(state, owner, handle);
                    resolve_enemy_hit(state, index);
                }
            }
        }
    }
}

fn dispose(state: &mut GameState, owner: Owner, handle: Handle) {
    match owner {
        Owner::Player => state.player_shots.release(handle),
        Owner::Enemies => state.enemy_shots.release(handle),
    }
}

/// First solid destructible cell the projectile overlaps
fn struck_cell(state: &GameState, pos: Vec2) -> Option<(u32, u32)> {
    let probe = collision::Aabb::new(pos, Vec2::splat(PROJECTILE_RADIUS));
    state
        .grid
        .solid_rects_near(&probe)
        .into_iter()
        .find(|(_, _, rect)| circle_overlaps_aabb(pos, PROJECTILE_RADIUS, rect))
        .map(|(x, y, _)| (x, y))
}

/// A player projectile damaged the enemy at `index`
fn resolve_enemy_hit(state: &mut GameState, index: usize) {
    state.score += 1;
    let id = state.enemies[index].id;
    state.push_event(GameEvent::EnemyHit { id });

    let pos = state.enemies[index].pos;
    let outcome = state.enemies[index].damage();
    if outcome == DamageOutcome::Destroyed {
        state.enemies.remove(index);
        state.push_event(GameEvent::EnemyDestroyed { id });
        log::debug!("enemy {id} destroyed, {} remain", state.enemies.len());
    }
    spawn_explosion(state, pos);
}

/// An enemy projectile damaged the player
fn resolve_player_hit(state: &mut GameState, hit_pos: Vec2) {
    state.camera.shake(SHAKE_DURATION_MS, SHAKE_AMPLITUDE);
    state.push_event(GameEvent::PlayerHit);

    if state.player.damage() == DamageOutcome::Destroyed {
        state.push_event(GameEvent::PlayerDestroyed);
        spawn_explosion(state, hit_pos);
        state.halt_simulation();
    }
}

/// Activate a pooled explosion at a hit location; dropped when the pool is
/// exhausted, like any other capacity miss
fn spawn_explosion(state: &mut GameState, pos: Vec2) {
    if let Some(handle) = state.explosions.acquire()
        && let Some(fx) = state.explosions.get_mut(handle)
    {
        *fx = Explosion { pos, elapsed: 0.0 };
    }
}

/// Play out explosion animations, returning finished effects to the pool
fn advance_explosions(state: &mut GameState, dt: f32) {
    let mut finished = Vec::new();
    for (handle, fx) in state.explosions.iter_active_mut() {
        fx.elapsed += dt;
        if fx.finished() {
            finished.push(handle);
        }
    }
    for handle in finished {
        state.explosions.release(handle);
        state.push_event(GameEvent::ExplosionFinished);
    }
}
