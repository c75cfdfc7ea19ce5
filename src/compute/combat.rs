//! Combat resolution: rolling pin, gun, grenades, pickups and defeats.
//!
//! Bullets stop at the first mafioso they hit.

use glam::Vec2;

use crate::compute::FrameInput;
use crate::config::Tuning;
use crate::entities::{
    compact, Enemy, EnemyStatus, Explosion, GameSession, Grenade, PickupKind, Player, Projectile,
    ScorePopup, Transient,
};
use crate::events::GameEvent;

/// Axis-aligned rectangle in arena coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn expand(self, by: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(by),
            max: self.max + Vec2::splat(by),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// The strip swept by the rolling pin: `melee_range` long and `melee_width`
/// wide, starting `melee_offset` in front of Mamma.
pub fn melee_region(player: &Player, tuning: &Tuning) -> Aabb {
    let forward = player.facing.unit();
    let half_width = forward.perp() * (tuning.melee_width / 2.0);
    let near = player.pos + forward * tuning.melee_offset;
    let far = near + forward * tuning.melee_range;
    Aabb::from_corners(near - half_width, far + half_width)
}

/// Resolve this frame's attacks and their consequences.
pub fn resolve(session: &mut GameSession, input: &FrameInput) {
    if input.melee {
        try_melee(session);
    }
    if input.shoot {
        try_shoot(session);
    }
    if input.grenade {
        try_throw_grenade(session);
    }

    hit_with_projectiles(session);
    detonate_grenades(session);
    collect_pickups(session);
    remove_defeated(session);

    compact(&mut session.projectiles);
    compact(&mut session.grenades);
    compact(&mut session.pickups);
}

/// Push `enemy` along `away` and queue the daze that follows.
fn knock_back(enemy: &mut Enemy, away: Vec2, tuning: &Tuning) {
    enemy.status = EnemyStatus::KnockedBack {
        velocity: away * tuning.knockback_impulse,
        remaining_ms: tuning.knockback_ms,
    };
}

// ── Attacks ──────────────────────────────────────────────────────────────────

/// Swing the rolling pin.  Returns `false`, changing nothing, while the
/// previous swing is still cooling down.
pub fn try_melee(session: &mut GameSession) -> bool {
    let tuning = &session.tuning;
    let player = &mut session.player;
    if player.melee_cooldown_ms > 0 {
        return false;
    }
    player.melee_cooldown_ms = tuning.melee_cooldown_ms;
    player.swing_ms = tuning.melee_swing_ms;

    let region = melee_region(player, tuning).expand(tuning.enemy_radius);
    for enemy in session.enemies.iter_mut().filter(|e| !e.is_defeated()) {
        if !region.contains(enemy.pos) {
            continue;
        }
        enemy.take_damage(tuning.melee_damage);
        session.events.push(GameEvent::EnemyHit {
            id: enemy.id,
            damage: tuning.melee_damage,
        });
        let away = (enemy.pos - player.pos)
            .try_normalize()
            .unwrap_or(player.facing.unit());
        knock_back(enemy, away, tuning);
    }
    true
}

/// Fire one bullet along Mamma's facing.  Needs the gun and a cooled barrel.
pub fn try_shoot(session: &mut GameSession) -> bool {
    let tuning = &session.tuning;
    let player = &mut session.player;
    if !player.has_gun() || player.gun_cooldown_ms > 0 {
        return false;
    }
    player.gun_cooldown_ms = tuning.gun_cooldown_ms;

    let dir = player.facing.unit();
    let pos = player.pos + dir * tuning.player_radius;
    session.projectiles.push(Projectile {
        pos,
        vel: dir * tuning.projectile_speed,
        range_left: tuning.projectile_range,
    });
    session.events.push(GameEvent::ShotFired { pos });
    true
}

/// Lob a grenade along Mamma's facing.  Needs at least one grenade.
pub fn try_throw_grenade(session: &mut GameSession) -> bool {
    let tuning = &session.tuning;
    let player = &mut session.player;
    if player.grenades == 0 || player.grenade_cooldown_ms > 0 {
        return false;
    }
    player.grenades -= 1;
    player.grenade_cooldown_ms = tuning.grenade_cooldown_ms;

    session.grenades.push(Grenade {
        pos: player.pos,
        vel: player.facing.unit() * tuning.grenade_speed,
        drag: tuning.grenade_drag,
        fuse_ms: tuning.grenade_fuse_ms,
        radius: tuning.grenade_radius,
    });
    session.events.push(GameEvent::GrenadeThrown {
        grenades_left: player.grenades,
    });
    true
}

// ── Per-frame resolution ─────────────────────────────────────────────────────

/// Each live bullet damages the nearest mafioso it overlaps and is spent.
pub fn hit_with_projectiles(session: &mut GameSession) {
    let tuning = &session.tuning;
    let reach = tuning.enemy_radius + tuning.projectile_radius;

    for projectile in session.projectiles.iter_mut().filter(|p| p.is_alive()) {
        let target = session
            .enemies
            .iter_mut()
            .filter(|e| !e.is_defeated() && e.pos.distance(projectile.pos) <= reach)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(projectile.pos)
                    .total_cmp(&b.pos.distance_squared(projectile.pos))
            });

        if let Some(enemy) = target {
            enemy.take_damage(tuning.gun_damage);
            session.events.push(GameEvent::EnemyHit {
                id: enemy.id,
                damage: tuning.gun_damage,
            });
            projectile.range_left = 0.0;
        }
    }
}

/// Grenades whose fuse ran out blow up, hurting everyone in the radius and
/// throwing the survivors clear.
pub fn detonate_grenades(session: &mut GameSession) {
    let tuning = &session.tuning;

    for grenade in session.grenades.iter().filter(|g| g.should_detonate()) {
        for enemy in session.enemies.iter_mut().filter(|e| !e.is_defeated()) {
            if enemy.pos.distance(grenade.pos) > grenade.radius {
                continue;
            }
            enemy.take_damage(tuning.grenade_damage);
            session.events.push(GameEvent::EnemyHit {
                id: enemy.id,
                damage: tuning.grenade_damage,
            });
            if !enemy.is_defeated() {
                let away = (enemy.pos - grenade.pos).try_normalize().unwrap_or(Vec2::Y);
                knock_back(enemy, away, tuning);
            }
        }

        session.explosions.push(Explosion {
            pos: grenade.pos,
            radius: grenade.radius,
            remaining_ms: tuning.explosion_ms,
        });
        session.events.push(GameEvent::GrenadeExploded {
            pos: grenade.pos,
            radius: grenade.radius,
        });
    }
}

/// Walking over a power-up takes it.
pub fn collect_pickups(session: &mut GameSession) {
    let tuning = &session.tuning;
    let player = &mut session.player;
    let reach = tuning.pickup_radius + tuning.player_radius;

    for pickup in session.pickups.iter_mut().filter(|p| p.is_alive()) {
        if pickup.pos.distance(player.pos) > reach {
            continue;
        }
        match pickup.kind {
            PickupKind::Gun => player.gun_ms = tuning.gun_duration_ms,
            PickupKind::Grenades => {
                player.grenades = player.grenades.saturating_add(tuning.grenades_per_pickup)
            }
        }
        pickup.remaining_ms = 0;
        session.events.push(GameEvent::PickupCollected(pickup.kind));
    }
}

/// Points for defeating an enemy of the given toughness.
pub fn points_for(enemy: &Enemy, tuning: &Tuning) -> u32 {
    tuning.points_per_tier.saturating_mul(enemy.max_health)
}

/// Score every defeated mafioso, leave a pop-up where it fell, and drop it.
pub fn remove_defeated(session: &mut GameSession) {
    let tuning = &session.tuning;

    for enemy in session.enemies.iter().filter(|e| e.is_defeated()) {
        let points = points_for(enemy, tuning);
        session.score = session.score.saturating_add(points);
        session.popups.push(ScorePopup {
            pos: enemy.pos,
            value: points,
            rise: tuning.popup_rise,
            remaining_ms: tuning.popup_ms,
        });
        session.events.push(GameEvent::EnemyDefeated {
            id: enemy.id,
            pos: enemy.pos,
            points,
        });
    }
    session.enemies.retain(|e| !e.is_defeated());
    session.best_score = session.best_score.max(session.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Facing;

    #[test]
    fn aabb_from_corners_orders_components() {
        let r = Aabb::from_corners(Vec2::new(5.0, -1.0), Vec2::new(-3.0, 4.0));
        assert_eq!(r.min, Vec2::new(-3.0, -1.0));
        assert_eq!(r.max, Vec2::new(5.0, 4.0));
    }

    #[test]
    fn aabb_contains_is_inclusive() {
        let r = Aabb::from_corners(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(r.contains(Vec2::new(10.0, 0.0)));
        assert!(!r.contains(Vec2::new(10.1, 0.0)));
        assert!(r.expand(1.0).contains(Vec2::new(10.5, -0.5)));
    }

    #[test]
    fn melee_region_follows_facing() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(100.0, 100.0);

        player.facing = Facing::Right;
        let right = melee_region(&player, &tuning);
        assert!(right.min.x >= 100.0);

        player.facing = Facing::Left;
        let left = melee_region(&player, &tuning);
        assert!(left.max.x <= 100.0);

        player.facing = Facing::Up;
        let up = melee_region(&player, &tuning);
        assert!(up.max.y <= 100.0);
        assert!((up.max.x - up.min.x - tuning.melee_width).abs() < 1e-4);
    }
}
