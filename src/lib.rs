//! Mamma Mia: defend the kitchen from the mafia.
//!
//! - `entities`: plain game data and the session that owns it
//! - `compute`: the per-frame simulation (spawner, movement, combat, lives)
//! - `events`: hooks for collaborators (audio, sprites, score keeping)
//! - `config`: gameplay tuning

pub mod compute;
pub mod config;
pub mod entities;
pub mod events;

pub use compute::{init_session, restart, tick, FrameInput};
pub use config::{ConfigError, Tuning};
pub use entities::{GameSession, GameStatus};
pub use events::{GameEvent, GameHook, Hooks, LogHook};
