//! Run simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded, one tick per rendered frame
//! - Fixed-capacity pools; spawns are best-effort
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod combat;
pub mod phase;
pub mod pool;
pub mod progression;
pub mod state;
pub mod targeting;
pub mod tick;

pub use combat::{CombatReport, circles_overlap};
pub use phase::{RunPhase, UpgradeChoice, request_pause, request_resume, select_upgrade};
pub use pool::{Handle, Pool, Poolable};
pub use progression::{LevelUp, Progression};
pub use state::{
    Enemy, ExperienceGem, GameEvent, GameState, Player, Projectile, RunStats, Target,
};
pub use targeting::{ShotOutcome, nearest_enemy};
pub use tick::{TickInput, TickReport, spawn_enemy, spawn_point, tick};
