//! All game entity types.
//!
//! Plain data plus the small amount of self-contained bookkeeping each
//! short-lived entity needs to age one frame.  Everything that involves more
//! than one entity lives in `compute`.

use glam::Vec2;

use crate::config::Tuning;
use crate::events::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    /// Unit vector in arena coordinates (+y is down).
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
            Facing::Up => Vec2::NEG_Y,
            Facing::Down => Vec2::Y,
        }
    }
}

/// Hat style of a mafioso.  Purely cosmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MafiaLook {
    Fedora,
    FlatCap,
    Bowler,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyStatus {
    Pursuing,
    /// Pushed along `velocity`, which decays every frame.
    KnockedBack { velocity: Vec2, remaining_ms: u32 },
    /// Standing still, seeing stars.
    Dazed { remaining_ms: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    /// Timed: the gun works for `gun_duration_ms`.
    Gun,
    /// Counted: adds `grenades_per_pickup` grenades.
    Grenades,
}

// ── Mamma ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub lives: u32,
    pub facing: Facing,
    /// Frames spent walking; drives the leg animation.
    pub stride: u32,
    pub melee_cooldown_ms: u32,
    /// Remaining display time of the current rolling-pin swing.
    pub swing_ms: u32,
    pub gun_cooldown_ms: u32,
    pub grenade_cooldown_ms: u32,
    /// Remaining gun time; zero means no gun.
    pub gun_ms: u32,
    pub grenades: u32,
    pub invulnerable_ms: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.arena_width / 2.0, tuning.arena_height / 2.0),
            speed: tuning.player_speed,
            lives: tuning.starting_lives,
            facing: Facing::Right,
            stride: 0,
            melee_cooldown_ms: 0,
            swing_ms: 0,
            gun_cooldown_ms: 0,
            grenade_cooldown_ms: 0,
            gun_ms: 0,
            grenades: 0,
            invulnerable_ms: 0,
        }
    }

    pub fn has_gun(&self) -> bool {
        self.gun_ms > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0
    }

    pub fn is_swinging(&self) -> bool {
        self.swing_ms > 0
    }
}

// ── Mafia ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub health: u32,
    /// Toughness tier; also the health it spawned with.
    pub max_health: u32,
    pub status: EnemyStatus,
    pub look: MafiaLook,
}

impl Enemy {
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Subtract `damage`, clamping at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }
}

// ── Short-lived entities ──────────────────────────────────────────────────────

/// Entities that age on their own and disappear when spent.
pub trait Transient {
    /// Age by one fixed step of `dt_ms`.
    fn advance(&mut self, dt_ms: u32);
    fn is_alive(&self) -> bool;
}

/// Drop every spent entity in one compacting pass.
pub fn compact<T: Transient>(items: &mut Vec<T>) {
    items.retain(Transient::is_alive);
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Distance left before the bullet fizzles.
    pub range_left: f32,
}

impl Transient for Projectile {
    fn advance(&mut self, _dt_ms: u32) {
        self.pos += self.vel;
        self.range_left -= self.vel.length();
    }

    fn is_alive(&self) -> bool {
        self.range_left > 0.0
    }
}

#[derive(Clone, Debug)]
pub struct Grenade {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Velocity multiplier applied every frame.
    pub drag: f32,
    pub fuse_ms: u32,
    pub radius: f32,
}

impl Grenade {
    pub fn should_detonate(&self) -> bool {
        self.fuse_ms == 0
    }
}

impl Transient for Grenade {
    fn advance(&mut self, dt_ms: u32) {
        self.pos += self.vel;
        self.vel *= self.drag;
        self.fuse_ms = self.fuse_ms.saturating_sub(dt_ms);
    }

    fn is_alive(&self) -> bool {
        self.fuse_ms > 0
    }
}

/// The flash left behind by a detonated grenade.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub remaining_ms: u32,
}

impl Transient for Explosion {
    fn advance(&mut self, dt_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
    }

    fn is_alive(&self) -> bool {
        self.remaining_ms > 0
    }
}

#[derive(Clone, Debug)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    pub remaining_ms: u32,
}

impl Transient for Pickup {
    fn advance(&mut self, dt_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
    }

    fn is_alive(&self) -> bool {
        self.remaining_ms > 0
    }
}

#[derive(Clone, Debug)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub value: u32,
    /// Upward drift per frame.
    pub rise: f32,
    pub remaining_ms: u32,
}

impl Transient for ScorePopup {
    fn advance(&mut self, dt_ms: u32) {
        self.pos.y -= self.rise;
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
    }

    fn is_alive(&self) -> bool {
        self.remaining_ms > 0
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Spawner clocks and the difficulty ramp.
#[derive(Clone, Debug)]
pub struct SpawnClock {
    pub since_spawn_ms: u32,
    pub since_pickup_ms: u32,
    pub since_ramp_ms: u32,
    /// Base spawn interval; shrinks every difficulty period.
    pub interval_ms: u32,
    pub spawned: u32,
}

impl SpawnClock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            since_spawn_ms: 0,
            since_pickup_ms: 0,
            since_ramp_ms: 0,
            interval_ms: tuning.spawn_interval_ms,
            spawned: 0,
        }
    }
}

/// The whole game.  Owned by the frame loop and handed to `tick` and the
/// renderer; nothing else holds game state.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub grenades: Vec<Grenade>,
    pub explosions: Vec<Explosion>,
    pub pickups: Vec<Pickup>,
    pub popups: Vec<ScorePopup>,
    pub score: u32,
    /// Highest score of this process; survives restarts.
    pub best_score: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Playing time since the last (re)start.
    pub elapsed_ms: u64,
    pub spawner: SpawnClock,
    /// Events raised since the last drain, waiting for the hooks.  Drain
    /// after every `tick`.
    pub events: Vec<GameEvent>,
    pub(crate) next_id: u32,
}

impl GameSession {
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
