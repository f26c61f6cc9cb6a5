//! Meta-progression profile
//!
//! Coins earned from kills buy permanent stat upgrades that every new run
//! starts with. Persisted to a single storage key as JSON.

use serde::{Deserialize, Serialize};

use crate::consts::PROFILE_STORAGE_KEY;
use crate::platform::Storage;

/// Permanent upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Damage,
    Speed,
    MaxHealth,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::Damage,
        UpgradeKind::Speed,
        UpgradeKind::MaxHealth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "damage",
            UpgradeKind::Speed => "speed",
            UpgradeKind::MaxHealth => "maxHp",
        }
    }

}

/// Shop price for buying the next level when currently at `level`
pub fn upgrade_cost(level: u32) -> u64 {
    50 + 25 * level as u64
}

/// Persisted meta-progression record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub total_coins: u64,
    pub upgrade_level_damage: u32,
    pub upgrade_level_speed: u32,
    #[serde(rename = "upgradeLevelMaxHP")]
    pub upgrade_level_max_hp: u32,
}

impl Profile {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Damage => self.upgrade_level_damage,
            UpgradeKind::Speed => self.upgrade_level_speed,
            UpgradeKind::MaxHealth => self.upgrade_level_max_hp,
        }
    }

    /// Price of the next level of `kind`
    pub fn next_upgrade_cost(&self, kind: UpgradeKind) -> u64 {
        upgrade_cost(self.level(kind))
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Damage => &mut self.upgrade_level_damage,
            UpgradeKind::Speed => &mut self.upgrade_level_speed,
            UpgradeKind::MaxHealth => &mut self.upgrade_level_max_hp,
        }
    }

    pub fn meta_stats(&self) -> MetaStats {
        MetaStats::from_levels(
            self.upgrade_level_damage,
            self.upgrade_level_speed,
            self.upgrade_level_max_hp,
        )
    }
}

/// Base player stats derived from upgrade levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaStats {
    pub damage: u32,
    pub speed: f32,
    pub max_health: u32,
}

impl MetaStats {
    pub fn from_levels(damage_level: u32, speed_level: u32, max_hp_level: u32) -> Self {
        Self {
            damage: 10u32.saturating_add(damage_level.saturating_mul(5)),
            speed: 200.0 + 12.0 * speed_level as f32,
            max_health: 100u32.saturating_add(max_hp_level.saturating_mul(20)),
        }
    }
}

impl Default for MetaStats {
    fn default() -> Self {
        Self::from_levels(0, 0, 0)
    }
}

/// Profile plus the storage it lives in.
///
/// Constructed once per process and passed by reference; every mutation is
/// written through immediately and storage failures never propagate.
#[derive(Debug)]
pub struct ProfileStore<S: Storage> {
    storage: S,
    profile: Profile,
}

impl<S: Storage> ProfileStore<S> {
    /// Load from storage, falling back to defaults.
    ///
    /// Missing data is initialized; corrupt data is discarded and
    /// overwritten with defaults.
    pub fn load(storage: S) -> Self {
        let mut store = Self {
            storage,
            profile: Profile::default(),
        };

        match store.storage.get(PROFILE_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Profile>(&json) {
                Ok(profile) => {
                    log::info!("Loaded profile: {} coins", profile.total_coins);
                    store.profile = profile;
                }
                Err(e) => {
                    log::warn!("Failed to load save data, using defaults: {}", e);
                    store.persist();
                }
            },
            Ok(None) => {
                log::info!("No profile found, starting fresh");
                store.persist();
            }
            Err(e) => {
                log::warn!("Profile storage unavailable, using defaults: {}", e);
            }
        }

        store
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn meta_stats(&self) -> MetaStats {
        self.profile.meta_stats()
    }

    /// Credit coins. Non-positive amounts are ignored.
    pub fn earn_coins(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.profile.total_coins = self.profile.total_coins.saturating_add(amount as u64);
        log::info!("Earned {} coins ({} total)", amount, self.profile.total_coins);
        self.persist();
    }

    /// Spend `cost` coins on one level of `kind`.
    ///
    /// All-or-nothing: on `false` neither coins nor levels change.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind, cost: u64) -> bool {
        if self.profile.total_coins < cost {
            log::info!(
                "Cannot afford {} upgrade: {} < {}",
                kind.as_str(),
                self.profile.total_coins,
                cost
            );
            return false;
        }

        let mut next = self.profile;
        next.total_coins -= cost;
        let level = next.level_mut(kind);
        *level = level.saturating_add(1);
        self.profile = next;

        log::info!(
            "Purchased {} upgrade (level {}) for {} coins",
            kind.as_str(),
            self.profile.level(kind),
            cost
        );
        self.persist();
        true
    }

    /// Buy the next level at shop price
    pub fn buy_next_level(&mut self, kind: UpgradeKind) -> bool {
        let cost = self.profile.next_upgrade_cost(kind);
        self.purchase_upgrade(kind, cost)
    }

    /// Write the profile to storage; failures are logged and swallowed
    pub fn persist(&mut self) {
        match serde_json::to_string(&self.profile) {
            Ok(json) => {
                if let Err(e) = self.storage.set(PROFILE_STORAGE_KEY, &json) {
                    log::warn!("Failed to save meta progression data: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize profile: {}", e),
        }
    }
}
