//! Состояние матча: фазы, таймер, счёт команд
//!
//! Pregame → Running → FinalStretch (последняя минута) → Postgame.
//! Один resource на App вместо глобального game manager.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Team;

/// Правила матча (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub match_duration: f32,
    pub pregame_duration: f32,
    /// Сколько секунд до конца считается FinalStretch
    pub final_stretch_time: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            match_duration: 300.0,
            pregame_duration: 5.0,
            final_stretch_time: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum MatchPhase {
    #[default]
    Pregame,
    Running,
    FinalStretch,
    Postgame,
}

/// Событие: фаза матча сменилась
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPhaseChanged {
    pub phase: MatchPhase,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub pregame_remaining: f32,
    pub time_remaining: f32,
    pub home_score: u32,
    pub away_score: u32,
    pub rules: MatchRules,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchRules::default())
    }
}

impl MatchState {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            phase: MatchPhase::Pregame,
            pregame_remaining: rules.pregame_duration,
            time_remaining: rules.match_duration,
            home_score: 0,
            away_score: 0,
            rules,
        }
    }

    /// Нейтральная команда очков не получает
    pub fn add_score(&mut self, team: Team, points: u32) {
        match team {
            Team::Home => self.home_score += points,
            Team::Away => self.away_score += points,
            Team::Neutral => {}
        }
    }

    /// Продвигает часы; возвращает новую фазу, если она сменилась
    pub fn tick(&mut self, delta: f32) -> Option<MatchPhase> {
        let next = match self.phase {
            MatchPhase::Pregame => {
                self.pregame_remaining = (self.pregame_remaining - delta).max(0.0);
                (self.pregame_remaining <= 0.0).then_some(MatchPhase::Running)
            }
            MatchPhase::Running | MatchPhase::FinalStretch => {
                self.time_remaining = (self.time_remaining - delta).max(0.0);
                if self.time_remaining <= 0.0 {
                    Some(MatchPhase::Postgame)
                } else if self.phase == MatchPhase::Running
                    && self.time_remaining <= self.rules.final_stretch_time
                {
                    Some(MatchPhase::FinalStretch)
                } else {
                    None
                }
            }
            MatchPhase::Postgame => None,
        };

        if let Some(phase) = next {
            self.phase = phase;
        }
        next
    }
}
