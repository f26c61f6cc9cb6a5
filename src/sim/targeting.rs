//! Targeting, autofire and per-tick movement systems
//!
//! All movement is simple pursuit: no prediction, no steering, no
//! separation. Enemies may stack on top of each other.

use glam::Vec2;

use super::pool::{Handle, Pool};
use super::state::{Enemy, GameState, Target};
use crate::step_toward;

/// Closest active enemy to `pos`. Ties go to the lowest slot.
pub fn nearest_enemy(pos: Vec2, enemies: &Pool<Enemy>) -> Option<(Handle, Vec2)> {
    let mut best: Option<(Handle, Vec2, f32)> = None;
    for (handle, enemy) in enemies.iter() {
        let dist = pos.distance_squared(enemy.pos);
        if best.is_none_or(|(_, _, d)| dist < d) {
            best = Some((handle, enemy.pos, dist));
        }
    }
    best.map(|(handle, pos, _)| (handle, pos))
}

/// What happened when the attack timer elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Timer still charging
    Charging,
    /// Fired a projectile
    Fired(Handle),
    /// Timer elapsed with nobody to shoot
    Whiffed,
    /// Target found but the projectile pool is full
    PoolExhausted,
}

/// Advance the attack timer and fire at the nearest enemy when it elapses.
///
/// The timer resets on every elapse, so a missed shot is never carried over.
pub fn autofire(state: &mut GameState, delta_ms: f32) -> ShotOutcome {
    state.attack_timer_ms += delta_ms;
    if state.attack_timer_ms < state.player.attack_interval_ms {
        return ShotOutcome::Charging;
    }
    state.attack_timer_ms = 0.0;

    let origin = state.player.pos;
    let Some((_, target_pos)) = nearest_enemy(origin, &state.enemies) else {
        return ShotOutcome::Whiffed;
    };
    let Some(handle) = state.projectiles.acquire() else {
        log::debug!("Projectile pool exhausted, shot dropped");
        return ShotOutcome::PoolExhausted;
    };
    if let Some(projectile) = state.projectiles.get_mut(handle) {
        projectile.fire(origin, target_pos, &state.tuning);
    }
    ShotOutcome::Fired(handle)
}

/// Move every active enemy toward its target; recycle expired ones
pub fn update_enemies(state: &mut GameState, delta_ms: f32) {
    let dt = delta_ms / 1000.0;
    let player_pos = state.target_pos(Target::Player);

    for handle in state.enemies.handles() {
        let Some(enemy) = state.enemies.get_mut(handle) else {
            continue;
        };

        enemy.lifespan_ms -= delta_ms;
        if enemy.lifespan_ms <= 0.0 {
            state.enemies.release(handle);
            continue;
        }

        let goal = match enemy.target {
            Some(Target::Player) => player_pos,
            None => None,
        };
        if let Some(goal) = goal {
            enemy.pos = step_toward(enemy.pos, goal, enemy.speed * dt);
        }
    }
}

/// Fly projectiles along their velocity; recycle when their lifespan runs out
pub fn update_projectiles(state: &mut GameState, delta_ms: f32) {
    let dt = delta_ms / 1000.0;
    for handle in state.projectiles.handles() {
        let Some(projectile) = state.projectiles.get_mut(handle) else {
            continue;
        };
        projectile.pos += projectile.vel * dt;
        projectile.lifespan_ms -= delta_ms;
        if projectile.lifespan_ms <= 0.0 {
            state.projectiles.release(handle);
        }
    }
}

/// Magnetize gems near the player and pull magnetized gems in.
///
/// Magnetism is one-way: once set it stays for the gem's active lifetime.
pub fn update_gems(state: &mut GameState, delta_ms: f32) {
    let dt = delta_ms / 1000.0;
    let player_pos = state.target_pos(Target::Player);
    let radius = state.tuning.magnet_radius;
    let speed = state.tuning.magnet_speed;

    for (_, gem) in state.gems.iter_mut() {
        if let Some(player_pos) = player_pos
            && !gem.magnetized
            && gem.pos.distance(player_pos) < radius
        {
            gem.start_magnet(Target::Player);
        }

        let goal = match gem.magnet_target {
            Some(Target::Player) => player_pos,
            None => None,
        };
        if gem.magnetized
            && let Some(goal) = goal
        {
            gem.pos = step_toward(gem.pos, goal, speed * dt);
        }
    }
}
