#![allow(dead_code)]

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mamma_mia::compute::init_session;
use mamma_mia::config::Tuning;
use mamma_mia::entities::{Enemy, EnemyStatus, GameSession, MafiaLook};

/// Default balance with the spawner and pickup drops switched off, so a test
/// only sees the entities it places itself.
pub fn quiet_tuning() -> Tuning {
    Tuning {
        spawn_interval_ms: u32::MAX,
        min_spawn_interval_ms: u32::MAX,
        pickup_interval_ms: u32::MAX,
        ..Tuning::default()
    }
}

pub fn quiet_session() -> GameSession {
    init_session(quiet_tuning())
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Place a pursuing mafioso with the given toughness.
pub fn enemy_at(session: &mut GameSession, pos: Vec2, health: u32, speed: f32) -> u32 {
    let id = session.next_entity_id();
    session.enemies.push(Enemy {
        id,
        pos,
        speed,
        health,
        max_health: health,
        status: EnemyStatus::Pursuing,
        look: MafiaLook::Fedora,
    });
    id
}
