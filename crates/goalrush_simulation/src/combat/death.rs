//! Death sequence (терминальная под-фаза перед удалением)
//!
//! AI: машина и навигация выключены, hurtbox выключен, loot (только authoritative),
//! затем opacity 1 → 0 за fade_duration и despawn.
//! Игрок: Dead + выключенная машина (респавн вне ядра).
//! Повторно не входится: DeathSequence/Dead уже стоят.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AiConfig, AiStateMachine};
use crate::combat::EntityDied;
use crate::components::{Dead, Health, Hurtbox, MovementCommand, VisualChange, VisualCommand};
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::player::PlayerStateMachine;
use crate::{DeterministicRng, SimulationAuthority};

/// Разброс точек выпадения монет вокруг трупа (±)
pub const LOOT_SCATTER: f32 = 0.5;

/// Fade-out мёртвого AI
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DeathSequence {
    pub fade_timer: f32,
    pub fade_duration: f32,
}

impl DeathSequence {
    pub fn new(fade_duration: f32) -> Self {
        let fade_duration = fade_duration.max(0.0);
        Self {
            fade_timer: fade_duration,
            fade_duration,
        }
    }

    /// 1.0 в начале → 0.0 в конце
    pub fn opacity(&self) -> f32 {
        if self.fade_duration <= 0.0 {
            return 0.0;
        }
        (self.fade_timer / self.fade_duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.fade_timer <= 0.0
    }
}

/// Событие: монета выпала (спавн/пул объектов вне ядра)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LootDropped {
    pub source: Entity,
    pub position: Vec3,
    pub value: u32,
}

/// Кандидаты на смерть за кадр: EntityDied (authoritative) плюс актёры,
/// чей реплицированный Health уже 0, а Dead ещё не стоит.
/// Порядок стабильный, дубликаты отброшены.
fn collect_deaths(
    died: &mut EventReader<EntityDied>,
    fallen: &Query<(Entity, &Health), (Without<Dead>, Without<DeathSequence>)>,
) -> Vec<Entity> {
    let mut deaths: Vec<Entity> = Vec::new();
    for event in died.read() {
        if !deaths.contains(&event.entity) {
            deaths.push(event.entity);
        }
    }
    for (entity, health) in fallen.iter() {
        if !health.is_alive() && !deaths.contains(&entity) {
            deaths.push(entity);
        }
    }
    deaths
}

/// System: вход в death sequence
///
/// Срабатывает на любой стороне: authoritative получает EntityDied из
/// apply_damage, остальные видят Health == 0 после репликации.
/// Loot выпадает только на authoritative стороне.
#[allow(clippy::type_complexity)]
pub fn handle_deaths(
    mut died: EventReader<EntityDied>,
    fallen: Query<(Entity, &Health), (Without<Dead>, Without<DeathSequence>)>,
    authority: Res<SimulationAuthority>,
    mut rng: ResMut<DeterministicRng>,
    mut ai: Query<
        (&mut AiStateMachine, &mut MovementCommand, &mut Hurtbox, &Transform, &AiConfig),
        (Without<DeathSequence>, Without<Dead>),
    >,
    mut players: Query<&mut PlayerStateMachine, Without<Dead>>,
    mut loot: EventWriter<LootDropped>,
    mut commands: Commands,
) {
    for entity in collect_deaths(&mut died, &fallen) {
        if let Ok((mut machine, mut command, mut hurtbox, transform, config)) = ai.get_mut(entity) {
            machine.disable();
            *command = MovementCommand::Stop;
            hurtbox.enabled = false;

            let coins = if authority.is_authoritative {
                config.coin_drop_amount
            } else {
                0
            };
            for _ in 0..coins {
                let offset = Vec3::new(
                    rng.rng.gen_range(-LOOT_SCATTER..=LOOT_SCATTER),
                    0.0,
                    rng.rng.gen_range(-LOOT_SCATTER..=LOOT_SCATTER),
                );
                loot.write(LootDropped {
                    source: entity,
                    position: transform.translation + offset,
                    value: 1,
                });
            }

            commands
                .entity(entity)
                .insert((Dead, DeathSequence::new(config.death_fade_duration)));

            log_category(
                LogLevel::Info,
                LogCategory::Ai,
                &format!("AI {:?} died, dropping {} coins", entity, coins),
            );
            continue;
        }

        if let Ok(mut machine) = players.get_mut(entity) {
            machine.disable();
            commands.entity(entity).insert(Dead);
        }
    }
}

/// System: fade-out и удаление
pub fn tick_death_sequences(
    time: Res<Time>,
    authority: Res<SimulationAuthority>,
    mut dying: Query<(Entity, &mut DeathSequence)>,
    mut visuals: EventWriter<VisualCommand>,
    mut commands: Commands,
) {
    let delta = time.delta_secs();

    for (entity, mut sequence) in dying.iter_mut() {
        sequence.fade_timer = (sequence.fade_timer - delta).max(0.0);

        visuals.write(VisualCommand {
            entity,
            change: VisualChange::Opacity(sequence.opacity()),
        });

        // Не-authoritative сторона ждёт удаления по репликации
        if sequence.is_finished() && authority.is_authoritative {
            commands.entity(entity).despawn();
        }
    }
}
