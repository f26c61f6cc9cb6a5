//! Per-frame simulation tick
//!
//! Discrete commands are applied first, then the gameplay systems run only
//! if the run is in `Running`. While paused nothing advances: no timers, no
//! positions, no elapsed time.

use glam::Vec2;
use rand::Rng;

use super::combat::{self, CombatReport};
use super::phase::{self, UpgradeChoice};
use super::pool::Handle;
use super::state::GameState;
use super::targeting::{self, ShotOutcome};
use crate::clamp_to_world;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Merged movement direction (unit length or zero)
    pub direction: Vec2,
    /// Pause requested (pause menu / key)
    pub pause: bool,
    /// Resume requested
    pub resume: bool,
    /// Upgrade picked on the level-up prompt
    pub upgrade: Option<UpgradeChoice>,
    /// Leave the run for the title screen (handled by the session)
    pub return_to_title: bool,
}

/// Summary of one tick, mostly for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub simulated: bool,
    pub spawned: u32,
    pub shot: Option<ShotOutcome>,
    pub combat: CombatReport,
}

/// Advance the run by `delta_ms`
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) -> TickReport {
    if input.pause {
        phase::request_pause(state);
    }
    if input.resume {
        phase::request_resume(state);
    }
    if let Some(choice) = input.upgrade {
        phase::select_upgrade(state, choice);
    }

    if !state.phase.is_simulating() {
        return TickReport::default();
    }

    let delta_ms = delta_ms.max(0.0);
    state.stats.elapsed_ms += delta_ms as f64;

    move_player(state, input.direction, delta_ms);
    let spawned = update_spawner(state, delta_ms);
    targeting::update_enemies(state, delta_ms);
    let shot = targeting::autofire(state, delta_ms);
    targeting::update_projectiles(state, delta_ms);
    targeting::update_gems(state, delta_ms);
    let combat = combat::resolve(state);

    // Death outranks a level-up earned in the same tick
    if !state.player.is_alive() {
        phase::enter_game_over(state);
    } else if state.pending_level_ups > 0 {
        phase::enter_level_up(state);
    }

    TickReport {
        simulated: true,
        spawned,
        shot: Some(shot),
        combat,
    }
}

/// Move the player along the input direction, clamped to the world
pub fn move_player(state: &mut GameState, direction: Vec2, delta_ms: f32) {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let player = &mut state.player;
    player.pos = clamp_to_world(player.pos + dir * player.speed * (delta_ms / 1000.0));
}

/// Spawn enemies on the spawn timer. Returns how many spawned.
pub fn update_spawner(state: &mut GameState, delta_ms: f32) -> u32 {
    let interval = state.tuning.enemy_spawn_interval_ms;
    if interval <= 0.0 {
        return 0;
    }

    state.spawn_timer_ms += delta_ms;
    let mut spawned = 0;
    while state.spawn_timer_ms >= interval {
        state.spawn_timer_ms -= interval;
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let offset = Vec2::from_angle(angle) * state.tuning.enemy_spawn_distance;
        let pos = spawn_point(state.player.pos, offset);
        if spawn_enemy(state, pos).is_some() {
            spawned += 1;
        }
    }
    spawned
}

/// Point on the spawn ring around `center`, kept inside the world.
///
/// An axis that would leave the world is mirrored to the other side of the
/// player, which keeps the ring distance. The final clamp only bites when
/// the ring is wider than half the world.
pub fn spawn_point(center: Vec2, offset: Vec2) -> Vec2 {
    let x = if (0.0..=WORLD_WIDTH).contains(&(center.x + offset.x)) {
        offset.x
    } else {
        -offset.x
    };
    let y = if (0.0..=WORLD_HEIGHT).contains(&(center.y + offset.y)) {
        offset.y
    } else {
        -offset.y
    };
    clamp_to_world(center + Vec2::new(x, y))
}

/// Best-effort enemy spawn. A full pool drops the request.
pub fn spawn_enemy(state: &mut GameState, pos: Vec2) -> Option<Handle> {
    let Some(handle) = state.enemies.acquire() else {
        log::debug!("Enemy pool exhausted, spawn skipped");
        return None;
    };
    let tuning = &state.tuning;
    if let Some(enemy) = state.enemies.get_mut(handle) {
        enemy.activate(pos, tuning);
    }
    Some(handle)
}
