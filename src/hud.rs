//! HUD projection
//!
//! Folds run notifications into display values. Never writes back to the
//! simulation.

use crate::sim::GameEvent;

/// Last-seen values for the in-run overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub health: u32,
    pub max_health: u32,
    pub experience: u32,
    pub threshold: u32,
    pub level: u32,
    pub kill_count: u32,
    pub elapsed_ms: f64,
    pub level_up_prompt_visible: bool,
    pub paused: bool,
    pub game_over: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            health: 100,
            max_health: 100,
            experience: 0,
            threshold: 100,
            level: 1,
            kill_count: 0,
            elapsed_ms: 0.0,
            level_up_prompt_visible: false,
            paused: false,
            game_over: false,
        }
    }
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::HealthChanged { current, max } => {
                self.health = current;
                self.max_health = max;
            }
            GameEvent::ExperienceChanged {
                current,
                threshold,
                level,
            } => {
                self.experience = current;
                self.threshold = threshold;
                self.level = level;
            }
            GameEvent::ScoreChanged { kill_count } => self.kill_count = kill_count,
            GameEvent::LevelUp { level } => {
                self.level = level;
                self.level_up_prompt_visible = true;
            }
            GameEvent::PauseChanged { paused } => self.paused = paused,
            GameEvent::GameOver { kill_count } => {
                self.kill_count = kill_count;
                self.game_over = true;
                self.level_up_prompt_visible = false;
            }
        }
    }

    pub fn apply_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    /// The level-up prompt was answered
    pub fn dismiss_level_up(&mut self) {
        self.level_up_prompt_visible = false;
    }

    /// Elapsed run time; the session feeds this every frame
    pub fn set_elapsed(&mut self, elapsed_ms: f64) {
        self.elapsed_ms = elapsed_ms;
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health, self.max_health)
    }

    pub fn experience_fraction(&self) -> f32 {
        fraction(self.experience, self.threshold)
    }

    /// `MM:SS`
    pub fn timer_text(&self) -> String {
        let seconds = (self.elapsed_ms / 1000.0).floor().max(0.0) as u64;
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }

    pub fn kills_text(&self) -> String {
        format!("KILLS: {}", self.kill_count)
    }

    pub fn level_text(&self) -> String {
        format!("LV. {}", self.level)
    }
}

fn fraction(value: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        (value as f32 / max as f32).clamp(0.0, 1.0)
    }
}
