//! Gameplay hooks.
//!
//! `tick` records what happened as [`GameEvent`]s on the session.  The frame
//! loop drains them afterwards and hands each one to every registered
//! [`GameHook`], so audio, sprites or score keeping can react without the
//! simulation knowing they exist.

use glam::Vec2;

use crate::entities::PickupKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemySpawned { id: u32, pos: Vec2, tier: u32 },
    EnemyHit { id: u32, damage: u32 },
    EnemyDefeated { id: u32, pos: Vec2, points: u32 },
    PlayerHit { lives_left: u32 },
    PickupCollected(PickupKind),
    ShotFired { pos: Vec2 },
    GrenadeThrown { grenades_left: u32 },
    GrenadeExploded { pos: Vec2, radius: f32 },
    GameOver { score: u32 },
    Restarted,
}

pub trait GameHook {
    fn on_event(&mut self, event: &GameEvent);
}

/// Closures make quick hooks.
impl<F: FnMut(&GameEvent)> GameHook for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct Hooks {
    hooks: Vec<Box<dyn GameHook>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, hook: impl GameHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            for hook in &mut self.hooks {
                hook.on_event(event);
            }
        }
    }
}

/// Writes every event to the `log` facade.
pub struct LogHook;

impl GameHook for LogHook {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemySpawned { id, pos, tier } => {
                log::trace!("mafioso #{id} (tier {tier}) at ({:.0}, {:.0})", pos.x, pos.y)
            }
            GameEvent::EnemyHit { id, damage } => log::trace!("mafioso #{id} took {damage}"),
            GameEvent::EnemyDefeated { id, points, .. } => {
                log::debug!("mafioso #{id} defeated, +{points}")
            }
            GameEvent::PlayerHit { lives_left } => log::debug!("mamma hit, {lives_left} lives left"),
            GameEvent::PickupCollected(kind) => log::debug!("picked up {kind:?}"),
            GameEvent::ShotFired { .. } => log::trace!("bang"),
            GameEvent::GrenadeThrown { grenades_left } => {
                log::debug!("grenade thrown, {grenades_left} left")
            }
            GameEvent::GrenadeExploded { pos, .. } => {
                log::debug!("grenade exploded at ({:.0}, {:.0})", pos.x, pos.y)
            }
            GameEvent::GameOver { score } => log::info!("game over, final score {score}"),
            GameEvent::Restarted => log::info!("restarted"),
        }
    }
}
