//! Конфигурация симуляции (JSON через serde_json)
//!
//! Все секции имеют serde defaults: пустой `{}` = канонические константы.
//! Ошибки только здесь: симуляция сама по себе не возвращает Result.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{ai_bundle, AiConfig};
use crate::components::{EmpowermentCounter, MovementTuning, StatBlock, Team, ATTACKS_UNTIL_EMPOWERED};
use crate::player::{player_bundle, AttackTuning};
use crate::scoring::{goal_zone_bundle, GoalZoneConfig, MatchRules};

/// Ошибки загрузки конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Параметры персонажа игрока
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub stats: StatBlock,
    /// N: каждая N-я засчитанная атака усилена
    pub attacks_until_empowered: u8,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            stats: StatBlock::default(),
            attacks_until_empowered: ATTACKS_UNTIL_EMPOWERED,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Частота FixedUpdate (Hz)
    pub fixed_hz: f64,
    /// Применяет ли этот процесс урон/payout (иначе ждёт репликации)
    pub authoritative: bool,
    pub player: PlayerTuning,
    pub movement: MovementTuning,
    pub attack: AttackTuning,
    pub ai: AiConfig,
    pub ai_stats: StatBlock,
    pub goal: GoalZoneConfig,
    pub match_rules: MatchRules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fixed_hz: 60.0,
            authoritative: true,
            player: PlayerTuning::default(),
            movement: MovementTuning::default(),
            attack: AttackTuning::default(),
            ai: AiConfig::default(),
            ai_stats: StatBlock::default(),
            goal: GoalZoneConfig::default(),
            match_rules: MatchRules::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value < 0.0 || !value.is_finite() {
        return Err(invalid(field, format!("must be a finite value ≥ 0, got {value}")));
    }
    Ok(())
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Игрок с тюнингом из конфига
    pub fn player_bundle(&self, team: Team, position: Vec3) -> impl Bundle {
        (
            player_bundle(team, position, self.player.stats),
            EmpowermentCounter::with_threshold(self.player.attacks_until_empowered),
            self.movement,
            self.attack,
        )
    }

    pub fn ai_bundle(&self, team: Team, position: Vec3) -> impl Bundle {
        ai_bundle(team, position, self.ai, self.ai_stats)
    }

    pub fn goal_bundle(&self, team: Team, position: Vec3) -> impl Bundle {
        goal_zone_bundle(team, position, &self.goal)
    }

    /// Отклоняет значения, на которых симуляция не имеет смысла
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_hz > 0.0 && self.fixed_hz.is_finite()) {
            return Err(invalid("fixed_hz", format!("must be > 0, got {}", self.fixed_hz)));
        }

        if self.player.attacks_until_empowered == 0 {
            return Err(invalid("player.attacks_until_empowered", "must be ≥ 1"));
        }

        let cut_off = self.movement.jump_cut_off_multiplier;
        if !(0.0..=1.0).contains(&cut_off) {
            return Err(invalid(
                "movement.jump_cut_off_multiplier",
                format!("must be in [0, 1], got {cut_off}"),
            ));
        }
        if self.movement.gravity > 0.0 {
            return Err(invalid("movement.gravity", "must point down (≤ 0)"));
        }
        non_negative("movement.jump_height", self.movement.jump_height)?;
        non_negative("movement.jump_buffer_time", self.movement.jump_buffer_time)?;
        non_negative("movement.jump_hold_duration", self.movement.jump_hold_duration)?;

        non_negative("attack.duration", self.attack.duration)?;
        non_negative("attack.melee_radius", self.attack.melee_radius)?;
        non_negative("attack.targeting_range", self.attack.targeting_range)?;
        non_negative("attack.reveal_duration", self.attack.reveal_duration)?;

        non_negative("ai.leash_radius", self.ai.leash_radius)?;
        non_negative("ai.attack_radius", self.ai.attack_radius)?;
        non_negative("ai.death_fade_duration", self.ai.death_fade_duration)?;

        for (field, stats) in [("player.stats.crit_rate", &self.player.stats), ("ai_stats.crit_rate", &self.ai_stats)] {
            if !(0.0..=1.0).contains(&stats.crit_rate) {
                return Err(invalid(field, format!("must be in [0, 1], got {}", stats.crit_rate)));
            }
        }

        non_negative("goal.time_per_coin", self.goal.time_per_coin)?;
        non_negative("match_rules.match_duration", self.match_rules.match_duration)?;
        non_negative("match_rules.pregame_duration", self.match_rules.pregame_duration)?;

        Ok(())
    }
}
