//! Снаряд усиленной атаки
//!
//! Headless полёт: прямая линия, lifetime, попадание по сфере hurtbox.
//! Урон считается в момент попадания против защиты реальной цели
//! (статы стрелка зафиксированы при выстреле).

use bevy::prelude::*;

use crate::combat::resolver::calculate_damage;
use crate::combat::DamageRequest;
use crate::components::{Actor, Health, Hurtbox, StatBlock, Team};
use crate::DeterministicRng;

pub const PROJECTILE_SPEED: f32 = 15.0;
pub const PROJECTILE_LIFETIME: f32 = 3.0;
pub const PROJECTILE_RADIUS: f32 = 0.25;

/// Статы стрелка на момент выстрела
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ShotProfile {
    pub level: u32,
    pub attack: i32,
    pub crit_rate: f32,
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub shooter: Entity,
    pub team: Team,
    pub direction: Vec3,
    pub speed: f32,
    /// Оставшееся время жизни (сек)
    pub lifetime: f32,
    pub shot: ShotProfile,
}

impl Projectile {
    pub fn new(shooter: Entity, team: Team, direction: Vec3, shot: ShotProfile) -> Self {
        Self {
            shooter,
            team,
            direction,
            speed: PROJECTILE_SPEED,
            lifetime: PROJECTILE_LIFETIME,
            shot,
        }
    }
}

/// Событие: снаряд попал (от headless полёта или внешнего projectile слоя)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub shooter: Entity,
    pub target: Entity,
    pub shot: ShotProfile,
}

/// System: полёт снарядов (FixedUpdate)
///
/// Попадает в первого живого персонажа другой команды (не стрелка).
pub fn advance_projectiles(
    time: Res<Time<Fixed>>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    actors: Query<(Entity, &Actor, &Health, &Hurtbox, &Transform), Without<Projectile>>,
    mut hits: EventWriter<ProjectileHit>,
    mut commands: Commands,
) {
    let delta = time.delta_secs();

    for (projectile_entity, mut projectile, mut transform) in projectiles.iter_mut() {
        transform.translation += projectile.direction * projectile.speed * delta;
        projectile.lifetime -= delta;

        let position = transform.translation;
        let victim = actors.iter().find(|(entity, actor, health, hurtbox, actor_transform)| {
            *entity != projectile.shooter
                && actor.team != projectile.team
                && health.is_alive()
                && hurtbox.enabled
                && actor_transform.translation.distance(position) <= hurtbox.radius + PROJECTILE_RADIUS
        });

        if let Some((target, ..)) = victim {
            hits.write(ProjectileHit {
                shooter: projectile.shooter,
                target,
                shot: projectile.shot,
            });
            commands.entity(projectile_entity).despawn();
        } else if projectile.lifetime <= 0.0 {
            commands.entity(projectile_entity).despawn();
        }
    }
}

/// System: ProjectileHit → формула (empowered) → DamageRequest
pub fn process_projectile_hits(
    mut hit_events: EventReader<ProjectileHit>,
    defenders: Query<&StatBlock>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for hit in hit_events.read() {
        if hit.shooter == hit.target {
            continue;
        }

        let Ok(defender) = defenders.get(hit.target) else {
            continue;
        };

        let outcome = calculate_damage(
            hit.shot.level,
            hit.shot.attack,
            defender.defense,
            true,
            hit.shot.crit_rate,
            &mut *rng,
        );

        damage_requests.write(DamageRequest {
            target: hit.target,
            attacker: hit.shooter,
            amount: outcome.amount,
            critical: outcome.critical,
            empowered: true,
        });
    }
}
