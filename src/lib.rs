//! Yoru Survivor - A top-down survivors-like arcade game
//!
//! Core modules:
//! - `sim`: Run simulation (pools, targeting, combat, progression, run phases)
//! - `profile`: Coin-funded meta-progression persisted between runs
//! - `platform`: Browser/native storage abstraction
//! - `session`: Title / shop / run screen flow
//! - `hud`: Read-only projection of run notifications
//! - `input`: Merges keyboard and joystick directions
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod input;
pub mod platform;
pub mod profile;
pub mod session;
pub mod sim;
pub mod tuning;

pub use hud::Hud;
pub use profile::{MetaStats, Profile, ProfileStore, UpgradeKind};
pub use session::{Screen, Session};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// LocalStorage key for the meta-progression profile
    pub const PROFILE_STORAGE_KEY: &str = "yoru_survivor_meta";

    /// World dimensions (player is clamped inside)
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;

    /// Frame delta cap (ms) so a backgrounded tab doesn't teleport everything
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;
}

/// Move `from` toward `to` by at most `max_step`, without overshooting
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist <= f32::EPSILON {
        to
    } else {
        from + delta / dist * max_step
    }
}

/// Clamp a position to the world rectangle
#[inline]
pub fn clamp_to_world(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, consts::WORLD_WIDTH),
        pos.y.clamp(0.0, consts::WORLD_HEIGHT),
    )
}
