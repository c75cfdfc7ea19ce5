//! Game logic.
//!
//! Every function here works on an explicit `&mut GameSession`; nothing is
//! global.  Randomness is injected as `impl Rng` so tests can drive the game
//! with a seeded generator.
//!
//! One call to [`tick`] is one fixed-length frame:
//! input → player & cooldowns → spawner → movement/AI → combat → lives.

pub mod combat;
pub mod lives;
pub mod movement;
pub mod spawner;

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{GameSession, GameStatus, Player, SpawnClock};
use crate::events::GameEvent;

/// Keyboard state for one frame, already reduced to actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub melee: bool,
    pub shoot: bool,
    pub grenade: bool,
    pub restart: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh session: Mamma in the middle of the kitchen, nobody else around.
pub fn init_session(tuning: Tuning) -> GameSession {
    GameSession {
        player: Player::new(&tuning),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        grenades: Vec::new(),
        explosions: Vec::new(),
        pickups: Vec::new(),
        popups: Vec::new(),
        score: 0,
        best_score: 0,
        status: GameStatus::Playing,
        frame: 0,
        elapsed_ms: 0,
        spawner: SpawnClock::new(&tuning),
        events: Vec::new(),
        next_id: 1,
        tuning,
    }
}

/// Put everything back to its starting values except the best score, and
/// resume play.  Events not yet drained are kept, ahead of `Restarted`.
pub fn restart(session: &mut GameSession) {
    let best_score = session.best_score.max(session.score);
    let pending = session.drain_events();
    let tuning = session.tuning.clone();
    *session = init_session(tuning);
    session.best_score = best_score;
    session.events = pending;
    session.events.push(GameEvent::Restarted);
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// While the game is over nothing changes unless `input.restart` is set.
///
/// Events raised during the frame are appended to `session.events`.  The
/// caller drains them with [`GameSession::drain_events`] after every tick;
/// the queue is never trimmed otherwise.
pub fn tick(session: &mut GameSession, input: &FrameInput, rng: &mut impl Rng) {
    if session.status == GameStatus::GameOver {
        if input.restart {
            restart(session);
        }
        return;
    }

    session.frame += 1;
    session.elapsed_ms += session.tuning.frame_ms_u64();

    // ── 1. Player & cooldowns ────────────────────────────────────────────────
    movement::move_player(session, input);
    cool_down(&mut session.player, session.tuning.frame_ms);

    // ── 2. Spawner ───────────────────────────────────────────────────────────
    spawner::run(session, rng);

    // ── 3. Movement / AI ─────────────────────────────────────────────────────
    movement::step_enemies(session);
    movement::step_transients(session);

    // ── 4. Combat ────────────────────────────────────────────────────────────
    combat::resolve(session, input);

    // ── 5. Lives & game state ────────────────────────────────────────────────
    lives::check_contacts(session);
}

/// Count every player timer down by one frame.
pub fn cool_down(player: &mut Player, dt_ms: u32) {
    player.melee_cooldown_ms = player.melee_cooldown_ms.saturating_sub(dt_ms);
    player.swing_ms = player.swing_ms.saturating_sub(dt_ms);
    player.gun_cooldown_ms = player.gun_cooldown_ms.saturating_sub(dt_ms);
    player.grenade_cooldown_ms = player.grenade_cooldown_ms.saturating_sub(dt_ms);
    player.gun_ms = player.gun_ms.saturating_sub(dt_ms);
    player.invulnerable_ms = player.invulnerable_ms.saturating_sub(dt_ms);
}
