//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a balance pass never has
//! to touch system code. Values default to the shipped game; a JSON override
//! only needs the fields it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to parse a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pool capacity for {0} must be at least 1")]
    ZeroCapacity(&'static str),
}

/// Balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_radius: f32,
    /// Starting delay between shots (ms)
    pub attack_interval_ms: f32,
    pub initial_exp_threshold: u32,
    /// Threshold multiplier per level (result is floored)
    pub exp_threshold_growth: f32,

    // === Level-up choices ===
    pub attack_interval_step_ms: f32,
    pub attack_interval_floor_ms: f32,
    pub move_speed_step: f32,
    pub heal_amount: u32,

    // === Enemies ===
    pub enemy_pool_capacity: usize,
    pub enemy_radius: f32,
    pub enemy_health: u32,
    pub enemy_speed: f32,
    pub enemy_lifespan_ms: f32,
    pub enemy_spawn_interval_ms: f32,
    /// Spawn ring radius around the player
    pub enemy_spawn_distance: f32,
    pub contact_damage: u32,
    /// How far an enemy is shoved after touching the player
    pub contact_bounce: f32,

    // === Projectiles ===
    pub projectile_pool_capacity: usize,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_lifespan_ms: f32,

    // === Experience gems ===
    pub gem_pool_capacity: usize,
    pub gem_radius: f32,
    pub gem_value: u32,
    pub magnet_radius: f32,
    pub magnet_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 12.0,
            attack_interval_ms: 1000.0,
            initial_exp_threshold: 100,
            exp_threshold_growth: 1.5,

            attack_interval_step_ms: 100.0,
            attack_interval_floor_ms: 100.0,
            move_speed_step: 20.0,
            heal_amount: 20,

            enemy_pool_capacity: 100,
            enemy_radius: 14.0,
            enemy_health: 30,
            enemy_speed: 80.0,
            enemy_lifespan_ms: 60_000.0,
            enemy_spawn_interval_ms: 1000.0,
            enemy_spawn_distance: 600.0,
            contact_damage: 10,
            contact_bounce: 40.0,

            projectile_pool_capacity: 64,
            projectile_radius: 6.0,
            projectile_speed: 400.0,
            projectile_lifespan_ms: 2000.0,

            gem_pool_capacity: 200,
            gem_radius: 10.0,
            gem_value: 10,
            magnet_radius: 150.0,
            magnet_speed: 400.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), TuningError> {
        if self.enemy_pool_capacity == 0 {
            return Err(TuningError::ZeroCapacity("enemies"));
        }
        if self.projectile_pool_capacity == 0 {
            return Err(TuningError::ZeroCapacity("projectiles"));
        }
        if self.gem_pool_capacity == 0 {
            return Err(TuningError::ZeroCapacity("gems"));
        }
        Ok(())
    }
}
