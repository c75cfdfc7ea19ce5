mod common;

use glam::Vec2;

use mamma_mia::compute::combat::{points_for, try_melee, try_shoot, try_throw_grenade};
use mamma_mia::compute::*;
use mamma_mia::entities::*;
use mamma_mia::events::GameEvent;

use common::{enemy_at, quiet_session, seeded_rng};

fn idle() -> FrameInput {
    FrameInput::default()
}

fn swing() -> FrameInput {
    FrameInput {
        melee: true,
        ..FrameInput::default()
    }
}

// ── Rolling pin ───────────────────────────────────────────────────────────────

#[test]
fn melee_defeats_a_weak_enemy_in_front() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let id = enemy_at(&mut s, Vec2::new(490.0, 320.0), 1, 4.0);

    tick(&mut s, &swing(), &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(s.best_score, 100);
    assert_eq!(s.popups.len(), 1);
    assert_eq!(s.popups[0].value, 100);
    assert_eq!(s.player.lives, 3);

    let events = s.drain_events();
    assert!(events.contains(&GameEvent::EnemyHit { id, damage: 1 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyDefeated { id: hit, points: 100, .. } if *hit == id)));
}

#[test]
fn melee_misses_behind_mamma() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    enemy_at(&mut s, Vec2::new(390.0, 320.0), 1, 0.0);

    tick(&mut s, &swing(), &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].health, 1);
    assert_eq!(s.score, 0);
    assert!(s.player.is_swinging());
}

#[test]
fn melee_follows_the_facing() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    enemy_at(&mut s, Vec2::new(390.0, 320.0), 1, 0.0);
    let turn_left = FrameInput {
        left: true,
        melee: true,
        ..FrameInput::default()
    };

    tick(&mut s, &turn_left, &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 100);
}

#[test]
fn melee_knocks_back_a_tough_enemy() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    enemy_at(&mut s, Vec2::new(490.0, 320.0), 2, 0.0);

    tick(&mut s, &swing(), &mut rng);
    assert_eq!(s.enemies[0].health, 1);
    assert_eq!(s.score, 0);
    match s.enemies[0].status {
        EnemyStatus::KnockedBack {
            velocity,
            remaining_ms,
        } => {
            assert!(velocity.x > 0.0);
            assert_eq!(remaining_ms, s.tuning.knockback_ms);
        }
        other => panic!("expected knockback, got {other:?}"),
    }

    tick(&mut s, &idle(), &mut rng);
    assert!(s.enemies[0].pos.x > 490.0);
}

#[test]
fn melee_hits_everyone_in_the_strip() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    enemy_at(&mut s, Vec2::new(485.0, 310.0), 1, 0.0);
    enemy_at(&mut s, Vec2::new(520.0, 330.0), 1, 0.0);

    tick(&mut s, &swing(), &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 200);
}

#[test]
fn melee_cooldown_spaces_out_swings() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let mut swung_on = Vec::new();
    for frame in 1..=25u64 {
        tick(&mut s, &swing(), &mut rng);
        if s.player.melee_cooldown_ms == s.tuning.melee_cooldown_ms {
            swung_on.push(frame);
        }
    }
    // 300 ms at 33 ms a frame: ready again ten frames later.
    assert_eq!(swung_on, vec![1, 11, 21]);
}

#[test]
fn melee_during_cooldown_changes_nothing() {
    let mut s = quiet_session();
    enemy_at(&mut s, Vec2::new(490.0, 320.0), 1, 0.0);
    s.player.melee_cooldown_ms = 100;

    assert!(!try_melee(&mut s));
    assert_eq!(s.enemies[0].health, 1);
    assert_eq!(s.player.melee_cooldown_ms, 100);
    assert!(!s.player.is_swinging());
    assert!(s.events.is_empty());
}

// ── Gun ───────────────────────────────────────────────────────────────────────

#[test]
fn shooting_needs_the_gun() {
    let mut s = quiet_session();
    assert!(!try_shoot(&mut s));
    assert!(s.projectiles.is_empty());

    s.player.gun_ms = 1000;
    assert!(try_shoot(&mut s));
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.projectiles[0].pos, Vec2::new(472.0, 320.0));
    assert_eq!(s.projectiles[0].vel, Vec2::new(16.0, 0.0));

    // Barrel still hot.
    assert!(!try_shoot(&mut s));
    assert_eq!(s.projectiles.len(), 1);
}

#[test]
fn gun_pickup_runs_out() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.player.gun_ms = 66;
    tick(&mut s, &idle(), &mut rng);
    assert!(s.player.has_gun());
    tick(&mut s, &idle(), &mut rng);
    assert!(!s.player.has_gun());

    let fire = FrameInput {
        shoot: true,
        ..FrameInput::default()
    };
    tick(&mut s, &fire, &mut rng);
    assert!(s.projectiles.is_empty());
}

#[test]
fn bullet_stops_at_the_first_enemy() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.player.gun_ms = 5000;
    let near = enemy_at(&mut s, Vec2::new(510.0, 320.0), 1, 0.0);
    let far = enemy_at(&mut s, Vec2::new(530.0, 320.0), 1, 0.0);
    let fire = FrameInput {
        shoot: true,
        ..FrameInput::default()
    };

    tick(&mut s, &fire, &mut rng);
    assert_eq!(s.projectiles.len(), 1);
    for _ in 0..10 {
        tick(&mut s, &idle(), &mut rng);
    }
    assert!(s.projectiles.is_empty());
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].id, far);
    assert_eq!(s.enemies[0].health, 1);
    assert_eq!(s.score, 100);

    let hits: Vec<_> = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::EnemyHit { .. }))
        .collect();
    assert_eq!(hits, vec![GameEvent::EnemyHit { id: near, damage: 1 }]);
}

#[test]
fn bullet_fizzles_after_its_range() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.player.pos = Vec2::new(100.0, 320.0);
    s.player.gun_ms = 5000;
    let fire = FrameInput {
        shoot: true,
        ..FrameInput::default()
    };
    tick(&mut s, &fire, &mut rng);
    // 700 units at 16 a frame is under 44 frames, well before the far wall.
    for _ in 0..44 {
        tick(&mut s, &idle(), &mut rng);
    }
    assert!(s.projectiles.is_empty());
}

// ── Grenades ──────────────────────────────────────────────────────────────────

#[test]
fn grenade_needs_a_grenade() {
    let mut s = quiet_session();
    assert!(!try_throw_grenade(&mut s));
    assert!(s.grenades.is_empty());

    s.player.grenades = 2;
    assert!(try_throw_grenade(&mut s));
    assert_eq!(s.player.grenades, 1);
    assert_eq!(s.grenades.len(), 1);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::GrenadeThrown { grenades_left: 1 }]
    );
}

#[test]
fn grenade_blast_damages_inside_the_radius() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.player.grenades = 1;
    // The grenade rolls about 117 units to the right before the fuse runs out.
    let center = enemy_at(&mut s, Vec2::new(570.0, 320.0), 3, 0.0);
    let tough = enemy_at(&mut s, Vec2::new(560.0, 360.0), 5, 0.0);
    let outside = enemy_at(&mut s, Vec2::new(700.0, 320.0), 1, 0.0);
    let throw = FrameInput {
        grenade: true,
        ..FrameInput::default()
    };

    tick(&mut s, &throw, &mut rng);
    assert_eq!(s.player.grenades, 0);
    let mut frames = 0;
    while !s.grenades.is_empty() && frames < 60 {
        tick(&mut s, &idle(), &mut rng);
        frames += 1;
    }
    // 1100 ms of fuse.
    assert_eq!(frames, 34);

    assert!(s.enemies.iter().all(|e| e.id != center));
    assert_eq!(s.score, 300);

    let survivor = s.enemies.iter().find(|e| e.id == tough).unwrap();
    assert_eq!(survivor.health, 2);
    assert!(matches!(survivor.status, EnemyStatus::KnockedBack { .. }));

    let spared = s.enemies.iter().find(|e| e.id == outside).unwrap();
    assert_eq!(spared.health, 1);
    assert_eq!(spared.status, EnemyStatus::Pursuing);

    assert_eq!(s.explosions.len(), 1);
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::GrenadeExploded { .. })));
}

#[test]
fn explosion_flash_fades() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.explosions.push(Explosion {
        pos: Vec2::new(100.0, 100.0),
        radius: 90.0,
        remaining_ms: 66,
    });
    tick(&mut s, &idle(), &mut rng);
    assert_eq!(s.explosions.len(), 1);
    tick(&mut s, &idle(), &mut rng);
    assert!(s.explosions.is_empty());
}

// ── Pickups & scoring ─────────────────────────────────────────────────────────

#[test]
fn walking_over_a_gun_arms_mamma() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.pickups.push(Pickup {
        pos: s.player.pos + Vec2::new(20.0, 0.0),
        kind: PickupKind::Gun,
        remaining_ms: 5000,
    });
    tick(&mut s, &idle(), &mut rng);
    assert!(s.pickups.is_empty());
    assert_eq!(s.player.gun_ms, s.tuning.gun_duration_ms);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::PickupCollected(PickupKind::Gun)]
    );
}

#[test]
fn grenade_pickups_stack() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.player.grenades = 1;
    s.pickups.push(Pickup {
        pos: s.player.pos,
        kind: PickupKind::Grenades,
        remaining_ms: 5000,
    });
    tick(&mut s, &idle(), &mut rng);
    assert_eq!(s.player.grenades, 3);
}

#[test]
fn distant_pickup_expires() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.pickups.push(Pickup {
        pos: Vec2::new(100.0, 100.0),
        kind: PickupKind::Gun,
        remaining_ms: 33,
    });
    tick(&mut s, &idle(), &mut rng);
    assert!(s.pickups.is_empty());
    assert!(!s.player.has_gun());
}

#[test]
fn tougher_enemies_are_worth_more() {
    let s = quiet_session();
    let enemy = |max_health| Enemy {
        id: 1,
        pos: Vec2::ZERO,
        speed: 1.0,
        health: 0,
        max_health,
        status: EnemyStatus::Pursuing,
        look: MafiaLook::FlatCap,
    };
    assert_eq!(points_for(&enemy(1), &s.tuning), 100);
    assert_eq!(points_for(&enemy(3), &s.tuning), 300);
}
