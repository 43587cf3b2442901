//! GoalRush Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16: state machines игрока и AI,
//! правила боя, scoring в ворота.
//!
//! Граница с внешним движком:
//! - внутрь: PlayerInput, TriggerEvent, Kinematics.grounded
//! - наружу: VisualCommand, DamageDealt, EntityDied, LootDropped, ScoreAccepted

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod player;
pub mod scoring;
pub mod state_machine;

// Re-export базовых компонентов для удобства
pub use ai::{AiConfig, AiPlugin, AiState, AiStateMachine, AggroTracker};
pub use combat::{
    calculate_damage, AttackIntent, AttackKind, CombatPlugin, DamageDealt, DamageRequest, EntityDied, LootDropped,
    TargetPriority,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::MovementPlugin;
pub use player::{Player, PlayerInput, PlayerPlugin, PlayerState, PlayerStateMachine};
pub use scoring::{MatchPhase, MatchState, PlayerScoring, ScoreAccepted, ScoringPlugin, TriggerEvent};

/// Порядок фаз кадра (Update)
///
/// Input → Decide → Resolve → Apply → Aftermath
/// - Input: таймеры, триггеры, буферы ввода
/// - Decide: state machines пишут intents
/// - Resolve: intents → DamageRequest
/// - Apply: урон, payout, лечение
/// - Aftermath: смерть, loot, fade-out
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Decide,
    Resolve,
    Apply,
    Aftermath,
}

/// Применяет ли этот процесс урон, payout и смерть
///
/// false → клиентская копия: события читаются и отбрасываются,
/// состояние приходит репликацией.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationAuthority {
    pub is_authoritative: bool,
}

impl Default for SimulationAuthority {
    fn default() -> Self {
        Self {
            is_authoritative: true,
        }
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Decide,
                SimulationSet::Resolve,
                SimulationSet::Apply,
                SimulationSet::Aftermath,
            )
                .chain(),
        )
        // Fixed timestep для движения и снарядов
        .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
        // Детерминистичный RNG (crit/variance, loot)
        .insert_resource(DeterministicRng::new(config.seed))
        .insert_resource(SimulationAuthority {
            is_authoritative: config.authoritative,
        })
        .insert_resource(MatchState::new(config.match_rules))
        .insert_resource(config.clone())
        // Подсистемы
        .add_plugins((MovementPlugin, CombatPlugin, PlayerPlugin, AiPlugin, ScoringPlugin));

        log_info(&format!(
            "🎮 Simulation configured (seed: {}, fixed: {} Hz, authoritative: {})",
            config.seed, config.fixed_hz, config.authoritative
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт Bevy App для headless симуляции (MinimalPlugins + SimulationPlugin)
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..default()
    })
}

pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::new(config));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
