//! Gameplay tuning.
//!
//! Every balance constant lives in [`Tuning`].  The defaults are the built-in
//! game; a JSON file named by `MAMMA_MIA_TUNING` may override any subset of
//! fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding an optional path to a tuning JSON file.
pub const TUNING_ENV: &str = "MAMMA_MIA_TUNING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All distances are arena units, speeds are units per frame, timers are
/// milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Arena & clock ────────────────────────────────────────────────────────
    pub arena_width: f32,
    pub arena_height: f32,
    /// Fixed simulation step; one `tick` advances every timer by this much.
    pub frame_ms: u32,

    // ── Mamma ────────────────────────────────────────────────────────────────
    pub starting_lives: u32,
    pub player_radius: f32,
    pub player_speed: f32,
    pub invulnerability_ms: u32,

    // ── Mafia ────────────────────────────────────────────────────────────────
    pub enemy_radius: f32,
    /// An enemy closer than this to Mamma has reached her.
    pub contact_distance: f32,
    pub mafia_min_speed: f32,
    pub mafia_max_speed: f32,
    /// Added to the top of the speed range for every enemy spawned so far.
    pub speed_ramp: f32,
    pub points_per_tier: u32,

    // ── Spawner ──────────────────────────────────────────────────────────────
    pub spawn_interval_ms: u32,
    pub min_spawn_interval_ms: u32,
    pub spawn_interval_step_ms: u32,
    pub spawn_interval_floor_ms: u32,
    pub difficulty_period_ms: u32,
    pub difficulty_factor: f32,
    /// Tier-2 chance gained per second of play.
    pub toughness_ramp_per_sec: f32,
    pub max_tier2_chance: f32,
    pub max_tier3_chance: f32,
    /// How far outside the arena a knocked-back enemy may be pushed.
    pub spawn_slack: f32,

    // ── Melee (rolling pin) ──────────────────────────────────────────────────
    pub melee_cooldown_ms: u32,
    pub melee_swing_ms: u32,
    pub melee_range: f32,
    pub melee_width: f32,
    pub melee_offset: f32,
    pub melee_damage: u32,
    pub knockback_impulse: f32,
    pub knockback_decay: f32,
    pub knockback_ms: u32,
    pub daze_ms: u32,

    // ── Gun ──────────────────────────────────────────────────────────────────
    pub gun_duration_ms: u32,
    pub gun_cooldown_ms: u32,
    pub gun_damage: u32,
    pub projectile_speed: f32,
    pub projectile_range: f32,
    pub projectile_radius: f32,

    // ── Grenades ─────────────────────────────────────────────────────────────
    pub grenades_per_pickup: u32,
    pub grenade_cooldown_ms: u32,
    pub grenade_speed: f32,
    pub grenade_drag: f32,
    pub grenade_fuse_ms: u32,
    pub grenade_radius: f32,
    pub grenade_damage: u32,
    pub explosion_ms: u32,

    // ── Pickups & pop-ups ────────────────────────────────────────────────────
    pub pickup_interval_ms: u32,
    pub pickup_ttl_ms: u32,
    pub pickup_radius: f32,
    pub pickup_margin: f32,
    pub popup_ms: u32,
    pub popup_rise: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 900.0,
            arena_height: 640.0,
            frame_ms: 33, // ≈30 FPS

            starting_lives: 3,
            player_radius: 22.0,
            player_speed: 8.0,
            invulnerability_ms: 1000,

            enemy_radius: 16.0,
            contact_distance: 32.0,
            mafia_min_speed: 2.0,
            mafia_max_speed: 4.4,
            speed_ramp: 0.04,
            points_per_tier: 100,

            spawn_interval_ms: 1500,
            min_spawn_interval_ms: 400,
            spawn_interval_step_ms: 10,
            spawn_interval_floor_ms: 600,
            difficulty_period_ms: 10_000,
            difficulty_factor: 0.92,
            toughness_ramp_per_sec: 0.004,
            max_tier2_chance: 0.35,
            max_tier3_chance: 0.15,
            spawn_slack: 40.0,

            melee_cooldown_ms: 300,
            melee_swing_ms: 120,
            melee_range: 70.0,
            melee_width: 48.0,
            melee_offset: 11.0,
            melee_damage: 1,
            knockback_impulse: 14.0,
            knockback_decay: 0.85,
            knockback_ms: 200,
            daze_ms: 400,

            gun_duration_ms: 15_000,
            gun_cooldown_ms: 220,
            gun_damage: 1,
            projectile_speed: 16.0,
            projectile_range: 700.0,
            projectile_radius: 4.0,

            grenades_per_pickup: 2,
            grenade_cooldown_ms: 400,
            grenade_speed: 12.0,
            grenade_drag: 0.9,
            grenade_fuse_ms: 1100,
            grenade_radius: 90.0,
            grenade_damage: 3,
            explosion_ms: 350,

            pickup_interval_ms: 12_000,
            pickup_ttl_ms: 10_000,
            pickup_radius: 11.0,
            pickup_margin: 60.0,
            popup_ms: 800,
            popup_rise: 1.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Tuning named by `MAMMA_MIA_TUNING`, or the defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(TUNING_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("loading tuning from {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.frame_ms == 0 {
            return Err(invalid("frame_ms", "must be at least 1"));
        }
        if !(self.arena_width > 0.0 && self.arena_width.is_finite()) {
            return Err(invalid("arena_width", "must be a positive number"));
        }
        if !(self.arena_height > 0.0 && self.arena_height.is_finite()) {
            return Err(invalid("arena_height", "must be a positive number"));
        }
        if self.contact_distance <= 0.0 {
            return Err(invalid("contact_distance", "must be positive"));
        }
        if self.mafia_min_speed <= 0.0 {
            return Err(invalid("mafia_min_speed", "must be positive"));
        }
        if self.mafia_min_speed > self.mafia_max_speed {
            return Err(invalid(
                "mafia_min_speed",
                format!(
                    "{} exceeds mafia_max_speed {}",
                    self.mafia_min_speed, self.mafia_max_speed
                ),
            ));
        }
        if !(self.speed_ramp >= 0.0) {
            return Err(invalid("speed_ramp", "must not be negative"));
        }
        if !(self.difficulty_factor > 0.0 && self.difficulty_factor <= 1.0) {
            return Err(invalid("difficulty_factor", "must be in (0, 1]"));
        }
        let unit_range = [
            ("max_tier2_chance", self.max_tier2_chance),
            ("max_tier3_chance", self.max_tier3_chance),
            ("knockback_decay", self.knockback_decay),
            ("grenade_drag", self.grenade_drag),
        ];
        for (field, value) in unit_range {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be in [0, 1]"));
            }
        }
        if self.starting_lives == 0 {
            return Err(invalid("starting_lives", "must be at least 1"));
        }
        if self.pickup_margin * 2.0 >= self.arena_width.min(self.arena_height) {
            return Err(invalid("pickup_margin", "leaves no room inside the arena"));
        }
        Ok(())
    }

    /// The per-frame step as a `u64`, for counters measured in milliseconds.
    pub fn frame_ms_u64(&self) -> u64 {
        u64::from(self.frame_ms)
    }
}
