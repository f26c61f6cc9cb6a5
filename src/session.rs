//! Screen flow
//!
//! The session is the process-wide context: it owns the profile store, the
//! HUD, and at most one run. Runs get the store by reference when they end,
//! never through a global.

use crate::hud::Hud;
use crate::platform::Storage;
use crate::profile::{ProfileStore, UpgradeKind};
use crate::sim::{GameEvent, GameState, RunPhase, TickInput, TickReport, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Shop,
    Run,
}

/// Reward toast shown on the title screen after a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub coins_earned: u64,
    pub kill_count: u32,
    pub elapsed_ms: f64,
    pub level: u32,
}

/// Result of a shop purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    Purchased { kind: UpgradeKind, new_level: u32 },
    InsufficientFunds { kind: UpgradeKind, cost: u64 },
    NotInShop,
}

impl ShopOutcome {
    /// Message for the shop banner
    pub fn message(&self) -> String {
        match self {
            ShopOutcome::Purchased { kind, new_level } => {
                format!("{} upgraded to level {}", kind.as_str(), new_level)
            }
            ShopOutcome::InsufficientFunds { cost, .. } => {
                format!("Not enough coins ({} needed)", cost)
            }
            ShopOutcome::NotInShop => String::new(),
        }
    }
}

/// Application context
pub struct Session<S: Storage> {
    profile: ProfileStore<S>,
    tuning: Tuning,
    screen: Screen,
    run: Option<GameState>,
    /// Kills from the current run already paid out
    credited: bool,
    last_summary: Option<RunSummary>,
    pub hud: Hud,
}

impl<S: Storage> Session<S> {
    pub fn new(profile: ProfileStore<S>, tuning: Tuning) -> Self {
        Self {
            profile,
            tuning,
            screen: Screen::Title,
            run: None,
            credited: false,
            last_summary: None,
            hud: Hud::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &ProfileStore<S> {
        &self.profile
    }

    pub fn run(&self) -> Option<&GameState> {
        self.run.as_ref()
    }

    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// Begin a new run from the title screen, built from current meta stats
    pub fn start_run(&mut self, seed: u64) -> bool {
        if self.screen != Screen::Title {
            return false;
        }
        let meta = self.profile.meta_stats();
        let mut state = GameState::new(seed, &meta, self.tuning.clone());
        log::info!("Run started with seed {} ({:?})", state.seed, meta);
        self.hud = Hud::new();
        self.hud.apply_all(&state.drain_events());
        self.run = Some(state);
        self.credited = false;
        self.last_summary = None;
        self.screen = Screen::Run;
        true
    }

    /// Advance the active run and project its notifications.
    ///
    /// Returns the drained notifications so a presenter can react to them
    /// (sounds, popups) after the HUD is updated.
    pub fn update(&mut self, input: &TickInput, delta_ms: f32) -> (TickReport, Vec<GameEvent>) {
        if self.screen != Screen::Run {
            return (TickReport::default(), Vec::new());
        }
        if input.return_to_title {
            self.return_to_title();
            return (TickReport::default(), Vec::new());
        }
        let Some(state) = self.run.as_mut() else {
            return (TickReport::default(), Vec::new());
        };

        let report = tick(state, input, delta_ms);
        let events = state.drain_events();
        let phase = state.phase;
        self.hud.apply_all(&events);
        self.hud.set_elapsed(state.stats.elapsed_ms);
        if phase != RunPhase::PausedForLevelUp {
            self.hud.dismiss_level_up();
        }

        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            self.settle_run();
        }

        (report, events)
    }

    /// Pay out the run's kills exactly once
    fn settle_run(&mut self) {
        if self.credited {
            return;
        }
        let Some(state) = self.run.as_ref() else {
            return;
        };
        let kills = state.stats.kill_count;
        let summary = RunSummary {
            coins_earned: kills as u64,
            kill_count: kills,
            elapsed_ms: state.stats.elapsed_ms,
            level: state.player.progression.level(),
        };
        self.credited = true;
        self.profile.earn_coins(kills as i64);
        self.last_summary = Some(summary);
        log::info!(
            "Run {} settled: +{} coins",
            state.seed,
            summary.coins_earned
        );
    }

    /// Leave the run (at any phase) for the title screen
    pub fn return_to_title(&mut self) {
        if self.screen == Screen::Run {
            self.settle_run();
            self.run = None;
        }
        self.screen = Screen::Title;
    }

    pub fn open_shop(&mut self) -> bool {
        if self.screen != Screen::Title {
            return false;
        }
        self.screen = Screen::Shop;
        true
    }

    pub fn close_shop(&mut self) {
        if self.screen == Screen::Shop {
            self.screen = Screen::Title;
        }
    }

    /// Buy the next level of `kind` at shop price
    pub fn buy(&mut self, kind: UpgradeKind) -> ShopOutcome {
        if self.screen != Screen::Shop {
            return ShopOutcome::NotInShop;
        }
        if self.profile.buy_next_level(kind) {
            ShopOutcome::Purchased {
                kind,
                new_level: self.profile.profile().level(kind),
            }
        } else {
            // Level unchanged on failure
            let cost = self.profile.profile().next_upgrade_cost(kind);
            ShopOutcome::InsufficientFunds { kind, cost }
        }
    }
}
