//! Run phase state machine
//!
//! `Running` is the only phase in which gameplay systems are invoked. Every
//! transition queues the notification the overlays need, so presenters never
//! poll the phase directly.

use super::state::{GameEvent, GameState};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Waiting on an upgrade choice
    PausedForLevelUp,
    /// Paused from the pause menu
    PausedByUser,
    /// Player died; terminal
    GameOver,
}

impl RunPhase {
    /// Whether gameplay systems tick in this phase
    pub fn is_simulating(self) -> bool {
        self == RunPhase::Running
    }
}

/// The three in-run level-up choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeChoice {
    AttackSpeed,
    MoveSpeed,
    Heal,
}

impl UpgradeChoice {
    /// Choices offered on every level-up prompt, in display order
    pub const ALL: [UpgradeChoice; 3] = [
        UpgradeChoice::AttackSpeed,
        UpgradeChoice::MoveSpeed,
        UpgradeChoice::Heal,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            UpgradeChoice::AttackSpeed => "ATTACK SPEED UP",
            UpgradeChoice::MoveSpeed => "MOVEMENT SPEED UP",
            UpgradeChoice::Heal => "HEAL HP",
        }
    }

    /// Map a 1-based menu slot to a choice
    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Pause from the menu. Rejected outside `Running`.
pub fn request_pause(state: &mut GameState) -> bool {
    if state.phase != RunPhase::Running {
        log::debug!("Pause request ignored in {:?}", state.phase);
        return false;
    }
    state.phase = RunPhase::PausedByUser;
    state.push_event(GameEvent::PauseChanged { paused: true });
    true
}

/// Resume from the pause menu. No-op unless paused by the user.
pub fn request_resume(state: &mut GameState) -> bool {
    if state.phase != RunPhase::PausedByUser {
        return false;
    }
    state.phase = RunPhase::Running;
    state.push_event(GameEvent::PauseChanged { paused: false });
    true
}

/// Open the upgrade prompt if one is queued. Only leaves `Running`.
pub(crate) fn enter_level_up(state: &mut GameState) -> bool {
    if state.phase != RunPhase::Running || state.pending_level_ups == 0 {
        return false;
    }
    state.phase = RunPhase::PausedForLevelUp;
    let level = state.player.progression.level();
    state.push_event(GameEvent::LevelUp { level });
    log::info!("Level up! Now level {}", level);
    true
}

/// Apply an upgrade choice and leave the prompt.
///
/// Stays in `PausedForLevelUp` (with a fresh `LevelUp` notification) while
/// more prompts are queued. Ignored outside the prompt.
pub fn select_upgrade(state: &mut GameState, choice: UpgradeChoice) -> bool {
    if state.phase != RunPhase::PausedForLevelUp {
        log::debug!("Upgrade {:?} ignored in {:?}", choice, state.phase);
        return false;
    }

    apply_upgrade(state, choice);
    state.pending_level_ups = state.pending_level_ups.saturating_sub(1);

    if state.pending_level_ups > 0 {
        let level = state.player.progression.level();
        state.push_event(GameEvent::LevelUp { level });
    } else {
        state.phase = RunPhase::Running;
    }
    true
}

fn apply_upgrade(state: &mut GameState, choice: UpgradeChoice) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    match choice {
        UpgradeChoice::AttackSpeed => {
            player.attack_interval_ms = (player.attack_interval_ms
                - tuning.attack_interval_step_ms)
                .max(tuning.attack_interval_floor_ms);
            log::info!("Upgraded attack speed: {}ms", player.attack_interval_ms);
        }
        UpgradeChoice::MoveSpeed => {
            player.speed += tuning.move_speed_step;
            log::info!("Upgraded move speed: {}", player.speed);
        }
        UpgradeChoice::Heal => {
            player.heal(tuning.heal_amount);
            log::info!("Healed: {}/{}", player.health, player.max_health);
            state.push_health();
        }
    }
}

/// Enter the terminal phase. Only the first call has any effect.
pub(crate) fn enter_game_over(state: &mut GameState) -> bool {
    if state.phase == RunPhase::GameOver {
        return false;
    }
    state.phase = RunPhase::GameOver;
    state.pending_level_ups = 0;
    let kill_count = state.stats.kill_count;
    state.push_event(GameEvent::GameOver { kill_count });
    log::info!(
        "Game over: {} kills in {:.1}s",
        kill_count,
        state.stats.elapsed_ms / 1000.0
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MetaStats;
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        let mut state = GameState::new(7, &MetaStats::default(), Tuning::default());
        state.drain_events();
        state
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = new_state();
        assert!(request_pause(&mut state));
        assert_eq!(state.phase, RunPhase::PausedByUser);
        assert!(!request_pause(&mut state), "already paused");

        assert!(request_resume(&mut state));
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::PauseChanged { paused: true },
                GameEvent::PauseChanged { paused: false },
            ]
        );
    }

    #[test]
    fn test_pause_cannot_override_level_up() {
        let mut state = new_state();
        state.pending_level_ups = 1;
        assert!(enter_level_up(&mut state));
        assert!(!request_pause(&mut state));
        assert!(!request_resume(&mut state));
        assert_eq!(state.phase, RunPhase::PausedForLevelUp);
    }

    #[test]
    fn test_level_up_requires_pending_prompt() {
        let mut state = new_state();
        assert!(!enter_level_up(&mut state));
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_attack_speed_has_floor() {
        let mut state = new_state();
        state.player.attack_interval_ms = 150.0;
        state.pending_level_ups = 1;
        enter_level_up(&mut state);
        select_upgrade(&mut state, UpgradeChoice::AttackSpeed);
        assert_eq!(state.player.attack_interval_ms, 100.0);
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_move_speed_adds_step() {
        let mut state = new_state();
        state.pending_level_ups = 1;
        enter_level_up(&mut state);
        select_upgrade(&mut state, UpgradeChoice::MoveSpeed);
        assert_eq!(state.player.speed, 220.0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut state = new_state();
        state.player.health = 95;
        state.pending_level_ups = 1;
        enter_level_up(&mut state);
        state.drain_events();
        select_upgrade(&mut state, UpgradeChoice::Heal);
        assert_eq!(state.player.health, 100);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::HealthChanged { current: 100, max: 100 }]
        );
    }

    #[test]
    fn test_queued_prompts_keep_paused() {
        let mut state = new_state();
        state.pending_level_ups = 2;
        enter_level_up(&mut state);
        select_upgrade(&mut state, UpgradeChoice::MoveSpeed);
        assert_eq!(state.phase, RunPhase::PausedForLevelUp);
        select_upgrade(&mut state, UpgradeChoice::MoveSpeed);
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.player.speed, 240.0);
    }

    #[test]
    fn test_upgrade_ignored_while_running() {
        let mut state = new_state();
        assert!(!select_upgrade(&mut state, UpgradeChoice::MoveSpeed));
        assert_eq!(state.player.speed, 200.0);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = new_state();
        state.stats.kill_count = 4;
        assert!(enter_game_over(&mut state));
        assert!(!enter_game_over(&mut state));
        assert!(!request_pause(&mut state));
        assert!(!request_resume(&mut state));
        assert!(!select_upgrade(&mut state, UpgradeChoice::Heal));
        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GameOver { kill_count: 4 }]
        );
    }

    #[test]
    fn test_choice_slots() {
        assert_eq!(UpgradeChoice::from_slot(1), Some(UpgradeChoice::AttackSpeed));
        assert_eq!(UpgradeChoice::from_slot(3), Some(UpgradeChoice::Heal));
        assert_eq!(UpgradeChoice::from_slot(0), None);
        assert_eq!(UpgradeChoice::from_slot(4), None);
    }
}
