//! Mafia arrivals and power-up drops.

use glam::Vec2;
use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Enemy, EnemyStatus, GameSession, MafiaLook, Pickup, PickupKind, SpawnClock};
use crate::events::GameEvent;

/// Advance the spawn clocks one frame and create whatever is due.
pub fn run(session: &mut GameSession, rng: &mut impl Rng) {
    let dt = session.tuning.frame_ms;
    let clock = &mut session.spawner;
    clock.since_spawn_ms = clock.since_spawn_ms.saturating_add(dt);
    clock.since_pickup_ms = clock.since_pickup_ms.saturating_add(dt);
    clock.since_ramp_ms = clock.since_ramp_ms.saturating_add(dt);

    // Every difficulty period the base interval shrinks, down to a floor.
    if clock.since_ramp_ms >= session.tuning.difficulty_period_ms {
        let shrunk = (clock.interval_ms as f32 * session.tuning.difficulty_factor) as u32;
        clock.interval_ms = shrunk.max(session.tuning.spawn_interval_floor_ms);
        clock.since_ramp_ms = 0;
    }

    if clock.since_spawn_ms >= effective_interval(clock, &session.tuning) {
        clock.since_spawn_ms = 0;
        spawn_enemy(session, rng);
    }

    if session.spawner.since_pickup_ms >= session.tuning.pickup_interval_ms {
        session.spawner.since_pickup_ms = 0;
        drop_pickup(session, rng);
    }
}

/// The interval actually waited before the next spawn: the base interval,
/// shortened a little by every enemy already spawned.
pub fn effective_interval(clock: &SpawnClock, tuning: &Tuning) -> u32 {
    clock
        .interval_ms
        .saturating_sub(clock.spawned.saturating_mul(tuning.spawn_interval_step_ms))
        .max(tuning.min_spawn_interval_ms)
}

/// A uniformly random point on the arena boundary: edge first, then the
/// position along it.
pub fn edge_position(tuning: &Tuning, rng: &mut impl Rng) -> Vec2 {
    let (w, h) = (tuning.arena_width, tuning.arena_height);
    match rng.gen_range(0..4) {
        0 => Vec2::new(rng.gen_range(0.0..=w), 0.0),
        1 => Vec2::new(rng.gen_range(0.0..=w), h),
        2 => Vec2::new(0.0, rng.gen_range(0.0..=h)),
        _ => Vec2::new(w, rng.gen_range(0.0..=h)),
    }
}

/// Toughness tier for an enemy spawned after `elapsed_ms` of play.  Tier 2
/// and tier 3 chances grow linearly with time up to their caps.
pub fn roll_tier(elapsed_ms: u64, tuning: &Tuning, rng: &mut impl Rng) -> u32 {
    let secs = elapsed_ms as f32 / 1000.0;
    let tier3 = (secs * tuning.toughness_ramp_per_sec * 0.5).min(tuning.max_tier3_chance);
    let tier2 = (secs * tuning.toughness_ramp_per_sec).min(tuning.max_tier2_chance);
    let roll: f32 = rng.gen();
    if roll < tier3 {
        3
    } else if roll < tier3 + tier2 {
        2
    } else {
        1
    }
}

/// Spawn one mafioso on the boundary and return its id.
pub fn spawn_enemy(session: &mut GameSession, rng: &mut impl Rng) -> u32 {
    let tuning = &session.tuning;
    let pos = edge_position(tuning, rng);
    let top_speed = tuning.mafia_max_speed + session.spawner.spawned as f32 * tuning.speed_ramp;
    let speed = rng.gen_range(tuning.mafia_min_speed..=top_speed);
    let tier = roll_tier(session.elapsed_ms, tuning, rng);
    let look = match rng.gen_range(0..3) {
        0 => MafiaLook::Fedora,
        1 => MafiaLook::FlatCap,
        _ => MafiaLook::Bowler,
    };

    let id = session.next_entity_id();
    session.enemies.push(Enemy {
        id,
        pos,
        speed,
        health: tier,
        max_health: tier,
        status: EnemyStatus::Pursuing,
        look,
    });
    session.spawner.spawned += 1;
    session.events.push(GameEvent::EnemySpawned { id, pos, tier });
    id
}

/// Drop a random power-up somewhere inside the arena, away from the walls.
pub fn drop_pickup(session: &mut GameSession, rng: &mut impl Rng) {
    let tuning = &session.tuning;
    let margin = tuning.pickup_margin;
    let pos = Vec2::new(
        rng.gen_range(margin..=tuning.arena_width - margin),
        rng.gen_range(margin..=tuning.arena_height - margin),
    );
    let kind = if rng.gen_bool(0.5) {
        PickupKind::Gun
    } else {
        PickupKind::Grenades
    };
    log::debug!("{kind:?} dropped at ({:.0}, {:.0})", pos.x, pos.y);
    session.pickups.push(Pickup {
        pos,
        kind,
        remaining_ms: tuning.pickup_ttl_ms,
    });
}
