//! Pairwise combat rules
//!
//! Overlap is a plain circle test; there is no broad phase. Pool exhaustion
//! and dead targets are ordinary outcomes here, never errors.

use glam::Vec2;

use super::pool::Handle;
use super::state::{GameEvent, GameState};

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// What a single tick of combat produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub hits: u32,
    pub kills: u32,
    pub gems_dropped: u32,
    pub contacts: u32,
    pub gems_collected: u32,
    /// The player died during this tick
    pub player_died: bool,
}

/// Run all three rules in order: shots, contact, pickups
pub fn resolve(state: &mut GameState) -> CombatReport {
    let mut report = CombatReport::default();
    resolve_projectile_hits(state, &mut report);
    resolve_contact(state, &mut report);
    resolve_pickups(state, &mut report);
    report
}

/// Projectiles hit at most one enemy and are consumed on the hit
pub fn resolve_projectile_hits(state: &mut GameState, report: &mut CombatReport) {
    let damage = state.player.damage;

    for shot in state.projectiles.handles() {
        let Some(projectile) = state.projectiles.get(shot) else {
            continue;
        };
        let (shot_pos, shot_radius) = (projectile.pos, projectile.radius);

        let victim = state
            .enemies
            .iter()
            .find(|(_, enemy)| circles_overlap(shot_pos, shot_radius, enemy.pos, enemy.radius))
            .map(|(handle, _)| handle);
        let Some(victim) = victim else {
            continue;
        };

        state.projectiles.release(shot);
        report.hits += 1;
        damage_enemy(state, victim, damage, report);
    }
}

/// Apply damage to one enemy and handle its death
pub fn damage_enemy(state: &mut GameState, victim: Handle, damage: u32, report: &mut CombatReport) {
    let Some(enemy) = state.enemies.get_mut(victim) else {
        return;
    };
    if !enemy.take_damage(damage) {
        return;
    }

    let drop_pos = enemy.pos;
    state.enemies.release(victim);
    report.kills += 1;

    if let Some(gem) = state.gems.acquire() {
        let tuning = &state.tuning;
        if let Some(slot) = state.gems.get_mut(gem) {
            slot.activate(drop_pos, tuning);
        }
        report.gems_dropped += 1;
    } else {
        log::debug!("Gem pool exhausted, drop skipped");
    }

    state.stats.kill_count += 1;
    let kill_count = state.stats.kill_count;
    state.push_event(GameEvent::ScoreChanged { kill_count });
}

/// Touching enemies hurt the player once each, then get knocked back
pub fn resolve_contact(state: &mut GameState, report: &mut CombatReport) {
    let contact_damage = state.tuning.contact_damage;
    let bounce = state.tuning.contact_bounce;

    for handle in state.enemies.handles() {
        if !state.player.is_alive() {
            break;
        }
        let player_pos = state.player.pos;
        let player_radius = state.player.radius;
        let Some(enemy) = state.enemies.get_mut(handle) else {
            continue;
        };
        if !circles_overlap(player_pos, player_radius, enemy.pos, enemy.radius) {
            continue;
        }

        // Push away along the contact angle; straight right if stacked exactly
        let away = (enemy.pos - player_pos).try_normalize().unwrap_or(Vec2::X);
        enemy.pos += away * bounce;

        report.contacts += 1;
        let died = state.player.take_damage(contact_damage);
        state.push_health();
        if died {
            report.player_died = true;
        }
    }
}

/// Collect gems touching the player
pub fn resolve_pickups(state: &mut GameState, report: &mut CombatReport) {
    if !state.player.is_alive() {
        return;
    }
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    for handle in state.gems.handles() {
        let Some(gem) = state.gems.get(handle) else {
            continue;
        };
        if !circles_overlap(player_pos, player_radius, gem.pos, gem.radius) {
            continue;
        }

        let value = gem.value;
        state.gems.release(handle);
        report.gems_collected += 1;

        let level_up = state.player.progression.gain_experience(value);
        state.push_experience();
        if level_up.is_some() {
            state.pending_level_ups += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MetaStats;
    use crate::tuning::Tuning;

    fn new_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(11, &MetaStats::default(), tuning);
        state.drain_events();
        state
    }

    fn spawn_enemy(state: &mut GameState, pos: Vec2) -> Handle {
        let h = state.enemies.acquire().expect("enemy slot");
        let tuning = state.tuning.clone();
        state.enemies.get_mut(h).unwrap().activate(pos, &tuning);
        h
    }

    fn spawn_shot_at(state: &mut GameState, pos: Vec2) -> Handle {
        let h = state.projectiles.acquire().expect("projectile slot");
        let tuning = state.tuning.clone();
        state
            .projectiles
            .get_mut(h)
            .unwrap()
            .fire(pos, pos + Vec2::X, &tuning);
        h
    }

    fn spawn_gem(state: &mut GameState, pos: Vec2, value: u32) -> Handle {
        let h = state.gems.acquire().expect("gem slot");
        let tuning = state.tuning.clone();
        let gem = state.gems.get_mut(h).unwrap();
        gem.activate(pos, &tuning);
        gem.value = value;
        h
    }

    #[test]
    fn test_three_hits_kill_with_one_gem() {
        let mut state = new_state(Tuning::default());
        let far = state.player.pos + Vec2::new(500.0, 0.0);
        let enemy = spawn_enemy(&mut state, far);

        for expected in [20, 10] {
            let shot = spawn_shot_at(&mut state, far);
            let report = resolve(&mut state);
            assert_eq!(report.hits, 1);
            assert!(state.projectiles.get(shot).is_none(), "no pierce");
            assert_eq!(state.enemies.get(enemy).unwrap().health, expected);
        }

        spawn_shot_at(&mut state, far);
        let report = resolve(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(report.gems_dropped, 1);
        assert!(state.enemies.get(enemy).is_none());
        assert_eq!(state.gems.active_count(), 1);
        assert_eq!(state.gems.iter().next().unwrap().1.pos, far);
        assert_eq!(state.stats.kill_count, 1);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScoreChanged { kill_count: 1 }]
        );
    }

    #[test]
    fn test_dead_enemy_absorbs_no_second_shot() {
        let mut state = new_state(Tuning {
            enemy_health: 10,
            ..Tuning::default()
        });
        let far = state.player.pos + Vec2::new(500.0, 0.0);
        spawn_enemy(&mut state, far);
        let first = spawn_shot_at(&mut state, far);
        let second = spawn_shot_at(&mut state, far);

        let report = resolve(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(report.hits, 1);
        assert!(state.projectiles.get(first).is_none());
        assert!(state.projectiles.get(second).is_some(), "nothing left to hit");
    }

    #[test]
    fn test_kill_counts_when_gem_pool_full() {
        let mut state = new_state(Tuning {
            enemy_health: 10,
            gem_pool_capacity: 1,
            ..Tuning::default()
        });
        let far = state.player.pos + Vec2::new(500.0, 0.0);
        spawn_gem(&mut state, Vec2::ZERO, 10);
        spawn_enemy(&mut state, far);
        spawn_shot_at(&mut state, far);

        let report = resolve(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(report.gems_dropped, 0);
        assert_eq!(state.stats.kill_count, 1);
        assert_eq!(state.gems.active_count(), 1);
    }

    #[test]
    fn test_contact_damages_once_and_bounces() {
        let mut state = new_state(Tuning::default());
        let p = state.player.pos;
        let enemy = spawn_enemy(&mut state, p + Vec2::new(10.0, 0.0));

        let report = resolve(&mut state);
        assert_eq!(report.contacts, 1);
        assert_eq!(state.player.health, 90);
        let pos = state.enemies.get(enemy).unwrap().pos;
        assert!((pos - (p + Vec2::new(50.0, 0.0))).length() < 0.001);

        // Knocked out of reach: no stacking on the next resolve
        let report = resolve(&mut state);
        assert_eq!(report.contacts, 0);
        assert_eq!(state.player.health, 90);
    }

    #[test]
    fn test_contact_stops_after_death() {
        let mut state = new_state(Tuning::default());
        let p = state.player.pos;
        state.player.health = 15;
        for _ in 0..3 {
            spawn_enemy(&mut state, p + Vec2::new(5.0, 0.0));
        }
        let report = resolve(&mut state);
        assert!(report.player_died);
        assert_eq!(report.contacts, 2);
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn test_pickup_credits_experience() {
        let mut state = new_state(Tuning::default());
        let p = state.player.pos;
        let gem = spawn_gem(&mut state, p, 10);

        let report = resolve(&mut state);
        assert_eq!(report.gems_collected, 1);
        assert!(state.gems.get(gem).is_none());
        assert_eq!(state.player.progression.experience(), 10);
        assert_eq!(state.pending_level_ups, 0);
    }

    #[test]
    fn test_pickup_queues_one_prompt_per_gem() {
        let mut state = new_state(Tuning::default());
        let p = state.player.pos;
        spawn_gem(&mut state, p, 500);
        spawn_gem(&mut state, p, 10);

        resolve(&mut state);
        // 500 crosses three levels in one gain: one prompt
        assert_eq!(state.player.progression.level(), 4);
        assert_eq!(state.pending_level_ups, 1);
    }
}
