//! Lives and the Playing → GameOver transition.

use crate::entities::{GameSession, GameStatus};
use crate::events::GameEvent;

/// Every mafioso that reached Mamma leaves the kitchen.
///
/// The first one costs a life and starts a short invulnerability window;
/// while it lasts, contact still removes the enemy but spares the life.
pub fn check_contacts(session: &mut GameSession) {
    let tuning = &session.tuning;
    let player = &mut session.player;
    let events = &mut session.events;

    session.enemies.retain(|enemy| {
        if enemy.pos.distance(player.pos) >= tuning.contact_distance {
            return true;
        }
        if player.lives > 0 && !player.is_invulnerable() {
            player.lives -= 1;
            player.invulnerable_ms = tuning.invulnerability_ms;
            events.push(GameEvent::PlayerHit {
                lives_left: player.lives,
            });
        }
        false
    });

    if player.lives == 0 {
        end_game(session);
    }
}

/// Freeze the session.  Only called from a Playing tick, so it happens once
/// per run.
pub fn end_game(session: &mut GameSession) {
    session.status = GameStatus::GameOver;
    session.best_score = session.best_score.max(session.score);
    session.events.push(GameEvent::GameOver {
        score: session.score,
    });
    log::info!(
        "game over after {} frames with {} points",
        session.frame,
        session.score
    );
}
