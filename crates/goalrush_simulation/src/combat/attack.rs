//! Attack execution: AttackIntent → (цель, урон) → DamageRequest / снаряд
//!
//! Архитектура:
//! - Состояния (player Attack, AI Combat) только решают "атакую" и кладут intent
//! - Эта система разрешает intent против снимка мира: overlap, выбор цели, формула
//! - Применение урона - отдельная граница (DamageRequest → apply_damage)

use bevy::prelude::*;

use crate::combat::projectile::{Projectile, ShotProfile};
use crate::combat::resolver::{calculate_damage, CombatRoll, DamageOutcome};
use crate::combat::spatial::{ActorSnapshot, LayerFilter, SpatialQuery, WorldSnapshot};
use crate::combat::targeting::{select_target, TargetCandidate, TargetPriority};
use crate::combat::DamageRequest;
use crate::components::{Actor, EmpowermentCounter, Health, Hurtbox, Progression, StatBlock, Team};
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::DeterministicRng;

/// Вид атаки, выбранный состоянием
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackKind {
    /// Базовая атака игрока: первый враг в радиусе
    MeleeSweep { radius: f32 },
    /// Усиленная атака игрока: снаряд в лучшую цель (или по facing)
    EmpoweredShot {
        targeting_range: f32,
        priority: TargetPriority,
        facing: Vec3,
    },
    /// Атака AI по конкретной цели
    Strike {
        target: Entity,
        radius: f32,
        empowered: bool,
    },
}

/// Событие: entity выполняет атаку (одно событие = одно разрешение)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub kind: AttackKind,
}

/// Статы атакующего для формулы
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackerProfile {
    pub entity: Entity,
    pub team: Team,
    pub position: Vec3,
    pub level: u32,
    pub attack: i32,
    pub crit_rate: f32,
}

impl AttackerProfile {
    pub fn shot(&self) -> ShotProfile {
        ShotProfile {
            level: self.level,
            attack: self.attack,
            crit_rate: self.crit_rate,
        }
    }
}

/// Результат попадания по цели
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackHit {
    pub target: Entity,
    pub target_team: Team,
    pub outcome: DamageOutcome,
}

/// Базовая атака: первый враг из overlap (break после первого попадания)
pub fn resolve_melee_sweep<Q, R>(
    attacker: &AttackerProfile,
    radius: f32,
    world: &Q,
    roll: &mut R,
) -> Option<AttackHit>
where
    Q: SpatialQuery + ?Sized,
    R: CombatRoll + ?Sized,
{
    let filter = LayerFilter::enemies_of(attacker.entity, attacker.team);
    let target = world
        .overlap_in_radius(attacker.position, radius, &filter)
        .into_iter()
        .next()?;

    Some(hit(attacker, &target, false, roll))
}

/// Атака AI по своей цели: попадает только если цель в радиусе и попадаема
pub fn resolve_strike<Q, R>(
    attacker: &AttackerProfile,
    target: Entity,
    radius: f32,
    empowered: bool,
    world: &Q,
    roll: &mut R,
) -> Option<AttackHit>
where
    Q: SpatialQuery + ?Sized,
    R: CombatRoll + ?Sized,
{
    let filter = LayerFilter::enemies_of(attacker.entity, attacker.team);
    let target = world
        .overlap_in_radius(attacker.position, radius, &filter)
        .into_iter()
        .find(|actor| actor.entity == target)?;

    Some(hit(attacker, &target, empowered, roll))
}

/// Цель усиленного выстрела среди врагов в радиусе наведения
pub fn choose_shot_target<Q>(
    attacker: &AttackerProfile,
    range: f32,
    priority: TargetPriority,
    world: &Q,
) -> Option<ActorSnapshot>
where
    Q: SpatialQuery + ?Sized,
{
    let filter = LayerFilter::enemies_of(attacker.entity, attacker.team);
    let in_range = world.overlap_in_radius(attacker.position, range, &filter);

    let chosen = select_target(
        in_range.iter().map(|actor| TargetCandidate {
            entity: actor.entity,
            current_health: actor.health.current,
            max_health: actor.health.max,
        }),
        priority,
    )?;

    in_range.into_iter().find(|actor| actor.entity == chosen)
}

fn hit<R: CombatRoll + ?Sized>(
    attacker: &AttackerProfile,
    target: &ActorSnapshot,
    empowered: bool,
    roll: &mut R,
) -> AttackHit {
    let outcome = calculate_damage(
        attacker.level,
        attacker.attack,
        target.defense,
        empowered,
        attacker.crit_rate,
        roll,
    );

    AttackHit {
        target: target.entity,
        target_team: target.team,
        outcome,
    }
}

/// Точка вылета снаряда: чуть впереди атакующего по направлению
const SHOT_SPAWN_OFFSET: f32 = 1.0;

/// System: разрешение AttackIntent событий
///
/// 1. Снимок всех персонажей (позиция, команда, HP, защита, hurtbox)
/// 2. Melee/Strike → формула → DamageRequest
/// 3. EmpoweredShot → выбор цели → спавн Projectile
/// 4. Засчитанная базовая атака игрока → EmpowermentCounter::register_attack
pub fn resolve_attack_intents(
    mut intents: EventReader<AttackIntent>,
    actors: Query<(Entity, &Actor, &Health, &Transform, &StatBlock, &Progression, &Hurtbox)>,
    mut counters: Query<&mut EmpowermentCounter>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut commands: Commands,
) {
    if intents.is_empty() {
        return;
    }

    let world = WorldSnapshot::new(
        actors
            .iter()
            .map(|(entity, actor, health, transform, stats, _, hurtbox)| ActorSnapshot {
                entity,
                team: actor.team,
                position: transform.translation,
                health: *health,
                defense: stats.defense,
                hurtbox_radius: hurtbox.enabled.then_some(hurtbox.radius),
            })
            .collect(),
    );

    for intent in intents.read() {
        let Ok((entity, actor, health, transform, stats, progression, _)) = actors.get(intent.attacker) else {
            log_category(
                LogLevel::Warning,
                LogCategory::Combat,
                &format!("AttackIntent: attacker {:?} not found, skipped", intent.attacker),
            );
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        let attacker = AttackerProfile {
            entity,
            team: actor.team,
            position: transform.translation,
            level: progression.level,
            attack: stats.attack,
            crit_rate: stats.crit_rate,
        };

        match intent.kind {
            AttackKind::MeleeSweep { radius } => {
                let Some(hit) = resolve_melee_sweep(&attacker, radius, &world, &mut *rng) else {
                    continue;
                };

                if let Ok(mut counter) = counters.get_mut(entity) {
                    counter.register_attack(hit.target_team);
                }

                request_damage(&mut damage_requests, &attacker, &hit, false);
            }
            AttackKind::Strike {
                target,
                radius,
                empowered,
            } => {
                if let Some(hit) = resolve_strike(&attacker, target, radius, empowered, &world, &mut *rng) {
                    request_damage(&mut damage_requests, &attacker, &hit, empowered);
                }
            }
            AttackKind::EmpoweredShot {
                targeting_range,
                priority,
                facing,
            } => {
                let target = choose_shot_target(&attacker, targeting_range, priority, &world);

                let direction = target
                    .map(|target| target.position - attacker.position)
                    .unwrap_or(facing)
                    .with_y(0.0)
                    .try_normalize()
                    .unwrap_or(Vec3::Z);

                let origin = attacker.position + direction * SHOT_SPAWN_OFFSET;
                commands.spawn((
                    Projectile::new(entity, attacker.team, direction, attacker.shot()),
                    Transform::from_translation(origin),
                ));

                crate::log(&format!(
                    "💥 Empowered shot: {:?} → {:?}",
                    entity,
                    target.map(|target| target.entity)
                ));
            }
        }
    }
}

fn request_damage(
    writer: &mut EventWriter<DamageRequest>,
    attacker: &AttackerProfile,
    hit: &AttackHit,
    empowered: bool,
) {
    writer.write(DamageRequest {
        target: hit.target,
        attacker: attacker.entity,
        amount: hit.outcome.amount,
        critical: hit.outcome.critical,
        empowered,
    });
}
