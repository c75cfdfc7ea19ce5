//! Movement and the mafia "AI": walk toward Mamma.

use glam::Vec2;

use crate::compute::FrameInput;
use crate::config::Tuning;
use crate::entities::{compact, Enemy, EnemyStatus, Facing, GameSession, Transient};

/// Keep a point at least `margin` inside the arena.
pub fn clamp_to_arena(pos: Vec2, margin: f32, tuning: &Tuning) -> Vec2 {
    let lo = Vec2::splat(margin);
    let hi = Vec2::new(tuning.arena_width - margin, tuning.arena_height - margin);
    pos.max(lo).min(hi)
}

pub fn inside_arena(pos: Vec2, tuning: &Tuning) -> bool {
    (0.0..=tuning.arena_width).contains(&pos.x) && (0.0..=tuning.arena_height).contains(&pos.y)
}

/// Move Mamma straight from the input flags; no acceleration.
pub fn move_player(session: &mut GameSession, input: &FrameInput) {
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let player = &mut session.player;
    // Horizontal input wins the facing, like a side-on sprite would.
    player.facing = if dir.x < 0.0 {
        Facing::Left
    } else if dir.x > 0.0 {
        Facing::Right
    } else if dir.y < 0.0 {
        Facing::Up
    } else {
        Facing::Down
    };

    let tuning = &session.tuning;
    player.pos = clamp_to_arena(
        player.pos + dir.normalize() * player.speed,
        tuning.player_radius,
        tuning,
    );
    player.stride = player.stride.wrapping_add(1);
}

/// Step one pursuing enemy toward `target` without overshooting it.
///
/// An enemy already on the target stays put; contact is the life tracker's
/// business.
pub fn pursue(enemy: &mut Enemy, target: Vec2) {
    let offset = target - enemy.pos;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }
    enemy.pos += offset / distance * enemy.speed.min(distance);
}

/// Run every enemy one frame: pursue, slide along a knockback, or stand dazed.
pub fn step_enemies(session: &mut GameSession) {
    let target = session.player.pos;
    let tuning = &session.tuning;
    let dt = tuning.frame_ms;
    let lo = Vec2::splat(-tuning.spawn_slack);
    let hi = Vec2::new(
        tuning.arena_width + tuning.spawn_slack,
        tuning.arena_height + tuning.spawn_slack,
    );

    for enemy in &mut session.enemies {
        enemy.status = match enemy.status {
            EnemyStatus::Pursuing => {
                pursue(enemy, target);
                EnemyStatus::Pursuing
            }
            EnemyStatus::KnockedBack {
                velocity,
                remaining_ms,
            } => {
                enemy.pos = (enemy.pos + velocity).max(lo).min(hi);
                let remaining_ms = remaining_ms.saturating_sub(dt);
                if remaining_ms == 0 {
                    EnemyStatus::Dazed {
                        remaining_ms: tuning.daze_ms,
                    }
                } else {
                    EnemyStatus::KnockedBack {
                        velocity: velocity * tuning.knockback_decay,
                        remaining_ms,
                    }
                }
            }
            EnemyStatus::Dazed { remaining_ms } => match remaining_ms.saturating_sub(dt) {
                0 => EnemyStatus::Pursuing,
                remaining_ms => EnemyStatus::Dazed { remaining_ms },
            },
        };
    }
}

/// Age bullets, grenades, flashes, pickups and pop-ups by one frame.
///
/// Spent flashes and pop-ups are dropped here.  Bullets, grenades and pickups
/// are left for combat, which still has to resolve hits, detonations and
/// collection this frame.
pub fn step_transients(session: &mut GameSession) {
    let tuning = &session.tuning;
    let dt = tuning.frame_ms;

    for projectile in &mut session.projectiles {
        projectile.advance(dt);
        if !inside_arena(projectile.pos, tuning) {
            projectile.range_left = 0.0;
        }
    }
    for grenade in &mut session.grenades {
        grenade.advance(dt);
        grenade.pos = clamp_to_arena(grenade.pos, 0.0, tuning);
    }
    for pickup in &mut session.pickups {
        pickup.advance(dt);
    }
    for explosion in &mut session.explosions {
        explosion.advance(dt);
    }
    for popup in &mut session.popups {
        popup.advance(dt);
    }

    compact(&mut session.explosions);
    compact(&mut session.popups);
}
