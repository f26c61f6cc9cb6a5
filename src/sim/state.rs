//! Run state and core simulation types
//!
//! Everything a single run owns lives here. Entities are plain records
//! stored in pools; renderers key their sprites off the same pool handles.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::phase::RunPhase;
use super::pool::{Pool, Poolable};
use super::progression::Progression;
use crate::consts::*;
use crate::profile::MetaStats;
use crate::tuning::Tuning;

/// Lookup key for an entity that something else follows.
///
/// Only the player can be targeted; the key resolves through the owning
/// [`GameState`] and dies with the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Player,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    /// Movement speed (units per second)
    pub speed: f32,
    /// Delay between shots (ms)
    pub attack_interval_ms: f32,
    pub damage: u32,
    pub progression: Progression,
}

impl Player {
    /// Build a fresh player from meta-progression stats
    pub fn new(meta: &MetaStats, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            radius: tuning.player_radius,
            health: meta.max_health,
            max_health: meta.max_health,
            speed: meta.speed,
            attack_interval_ms: tuning.attack_interval_ms,
            damage: meta.damage,
            progression: Progression::new(
                tuning.initial_exp_threshold,
                tuning.exp_threshold_growth,
            ),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, clamped at zero.
    ///
    /// Returns `true` only on the hit that takes health from above zero to
    /// zero, so death fires exactly once.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// Restore health, clamped to max
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    pub speed: f32,
    /// Time left before the enemy is recycled without a kill (ms)
    pub lifespan_ms: f32,
    pub target: Option<Target>,
}

impl Enemy {
    /// Reset for a fresh spawn at `pos`
    pub fn activate(&mut self, pos: Vec2, tuning: &Tuning) {
        self.pos = pos;
        self.radius = tuning.enemy_radius;
        self.health = tuning.enemy_health;
        self.max_health = tuning.enemy_health;
        self.speed = tuning.enemy_speed;
        self.lifespan_ms = tuning.enemy_lifespan_ms;
        self.target = Some(Target::Player);
    }

    /// Apply damage; returns `true` when this hit killed the enemy
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

impl Poolable for Enemy {
    fn clear(&mut self) {
        self.health = 0;
        self.target = None;
        self.lifespan_ms = 0.0;
    }
}

/// A single-use shot fired by the player
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifespan_ms: f32,
}

impl Projectile {
    /// Launch from `from` toward `toward`
    pub fn fire(&mut self, from: Vec2, toward: Vec2, tuning: &Tuning) {
        self.pos = from;
        self.vel = (toward - from).normalize_or_zero() * tuning.projectile_speed;
        self.radius = tuning.projectile_radius;
        self.lifespan_ms = tuning.projectile_lifespan_ms;
    }
}

impl Poolable for Projectile {
    fn clear(&mut self) {
        self.vel = Vec2::ZERO;
        self.lifespan_ms = 0.0;
    }
}

/// An experience pickup dropped by a dead enemy
#[derive(Debug, Clone, Default)]
pub struct ExperienceGem {
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
    pub magnetized: bool,
    pub magnet_target: Option<Target>,
}

impl ExperienceGem {
    pub fn activate(&mut self, pos: Vec2, tuning: &Tuning) {
        self.pos = pos;
        self.radius = tuning.gem_radius;
        self.value = tuning.gem_value;
        self.magnetized = false;
        self.magnet_target = None;
    }

    pub fn start_magnet(&mut self, target: Target) {
        self.magnetized = true;
        self.magnet_target = Some(target);
    }
}

impl Poolable for ExperienceGem {
    fn clear(&mut self) {
        self.value = 0;
        self.magnetized = false;
        self.magnet_target = None;
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub kill_count: u32,
    /// Time spent in `Running` (ms)
    pub elapsed_ms: f64,
}

/// Outbound notifications, drained once per frame by presenters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    HealthChanged { current: u32, max: u32 },
    ExperienceChanged { current: u32, threshold: u32, level: u32 },
    ScoreChanged { kill_count: u32 },
    LevelUp { level: u32 },
    PauseChanged { paused: bool },
    GameOver { kill_count: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub gems: Pool<ExperienceGem>,
    pub stats: RunStats,
    /// Accumulated time toward the next shot (ms)
    pub attack_timer_ms: f32,
    /// Accumulated time toward the next enemy spawn (ms)
    pub spawn_timer_ms: f32,
    /// Level-up prompts still waiting for a choice
    pub pending_level_ups: u32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run in `Running` with the given seed
    pub fn new(seed: u64, meta: &MetaStats, tuning: Tuning) -> Self {
        let player = Player::new(meta, &tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            enemies: Pool::with_capacity(tuning.enemy_pool_capacity),
            projectiles: Pool::with_capacity(tuning.projectile_pool_capacity),
            gems: Pool::with_capacity(tuning.gem_pool_capacity),
            tuning,
            phase: RunPhase::Running,
            player,
            stats: RunStats::default(),
            attack_timer_ms: 0.0,
            spawn_timer_ms: 0.0,
            pending_level_ups: 0,
            events: Vec::new(),
        };

        // Initial HUD snapshot
        state.push_health();
        state.push_experience();
        state.push_event(GameEvent::ScoreChanged { kill_count: 0 });
        state
    }

    /// Resolve a target key to a live position
    pub fn target_pos(&self, target: Target) -> Option<Vec2> {
        match target {
            Target::Player if self.player.is_alive() => Some(self.player.pos),
            Target::Player => None,
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn push_health(&mut self) {
        self.push_event(GameEvent::HealthChanged {
            current: self.player.health,
            max: self.player.max_health,
        });
    }

    pub(crate) fn push_experience(&mut self) {
        let p = &self.player.progression;
        let event = GameEvent::ExperienceChanged {
            current: p.experience(),
            threshold: p.threshold(),
            level: p.level(),
        };
        self.push_event(event);
    }

    /// Take every queued notification
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&MetaStats::default(), &Tuning::default())
    }

    #[test]
    fn test_new_run_starts_running_at_center() {
        let state = GameState::new(1, &MetaStats::default(), Tuning::default());
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.player.pos, Vec2::new(1000.0, 1000.0));
        assert_eq!(state.player.health, 100);
        assert_eq!(state.enemies.capacity(), 100);
        assert!(
            state
                .pending_events()
                .contains(&GameEvent::HealthChanged { current: 100, max: 100 })
        );
    }

    #[test]
    fn test_death_fires_once() {
        let mut p = player();
        assert!(!p.take_damage(60));
        assert!(p.take_damage(60));
        assert_eq!(p.health, 0);
        assert!(!p.take_damage(10), "already dead");
    }

    #[test]
    fn test_enemy_kill_fires_once() {
        let mut enemy = Enemy::default();
        enemy.activate(Vec2::ZERO, &Tuning::default());
        assert!(!enemy.take_damage(10));
        assert!(!enemy.take_damage(10));
        assert!(enemy.take_damage(10));
        assert!(!enemy.take_damage(10));
    }

    #[test]
    fn test_target_pos_requires_live_player() {
        let mut state = GameState::new(1, &MetaStats::default(), Tuning::default());
        assert!(state.target_pos(Target::Player).is_some());
        state.player.health = 0;
        assert!(state.target_pos(Target::Player).is_none());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(ops in proptest::collection::vec((any::<bool>(), 0u32..200), 0..64)) {
            let mut p = player();
            for (is_damage, amount) in ops {
                if is_damage {
                    p.take_damage(amount);
                } else {
                    p.heal(amount);
                }
                prop_assert!(p.health <= p.max_health);
            }
        }
    }
}
