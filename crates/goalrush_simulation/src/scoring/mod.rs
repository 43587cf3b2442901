//! Scoring domain: монеты, ворота, payout, матч
//!
//! ECS ответственность:
//! - PlayerScoring: монеты и текущие ворота игрока
//! - GoalZone: приём очков (capacity → broken), лечение своей команды
//! - MatchState: фазы матча и счёт команд
//!
//! Внешний physics слой сообщает о trigger зонах через TriggerEvent.

use bevy::prelude::*;

pub mod goal;
pub mod match_state;
pub mod systems;

#[cfg(test)]
mod systems_tests;

// Re-export основных типов
pub use goal::{goal_zone_bundle, GoalView, GoalZone, GoalZoneConfig};
pub use match_state::{MatchPhase, MatchPhaseChanged, MatchRules, MatchState};
pub use systems::scoring_xp;

use crate::SimulationSet;

/// Монеты и ворота игрока
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerScoring {
    pub coins: u32,
    /// Ворота, в trigger которых стоит игрок
    pub goal: Option<Entity>,
    /// Дробный остаток лечения в своих воротах
    pub heal_carry: f32,
}

/// Событие: trigger зона от внешнего physics слоя
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    EnteredGoal { player: Entity, goal: Entity },
    ExitedGoal { player: Entity, goal: Entity },
    EnteredGrass { actor: Entity },
    ExitedGrass { actor: Entity },
    CoinTouched { player: Entity, value: u32 },
}

/// Событие: игрок закончил забивание (scoring payout boundary)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAttempt {
    pub player: Entity,
    pub goal: Entity,
    pub coins: u32,
}

/// Событие: ворота приняли очки
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAccepted {
    pub player: Entity,
    pub goal: Entity,
    pub points: u32,
}

/// Событие: entity получил уровень
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub entity: Entity,
    pub level: u32,
}

/// Scoring Plugin
///
/// Порядок выполнения (Update):
/// 1. Input: tick_match_clock, handle_trigger_events
/// 2. Apply (после apply_damage): process_score_attempts → apply_level_ups → heal_in_goal_zones
pub struct ScoringPlugin;

impl Plugin for ScoringPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TriggerEvent>()
            .add_event::<ScoreAttempt>()
            .add_event::<ScoreAccepted>()
            .add_event::<LevelUp>()
            .add_event::<MatchPhaseChanged>()
            .init_resource::<MatchState>()
            .register_type::<PlayerScoring>()
            .register_type::<GoalZone>();

        app.add_systems(
            Update,
            (systems::tick_match_clock, systems::handle_trigger_events).in_set(SimulationSet::Input),
        )
        .add_systems(
            Update,
            (
                (systems::process_score_attempts, systems::apply_level_ups).chain(),
                systems::heal_in_goal_zones,
            )
                .chain()
                .in_set(SimulationSet::Apply)
                .after(crate::combat::apply_damage),
        );
    }
}
