//! Damage application boundary
//!
//! Ядро считает amount (CombatResolver) и пишет DamageRequest.
//! apply_damage - локальный диспетчер: применяет урон только на
//! authoritative стороне, не-authoritative ждёт репликации.
//! Инвариант: не больше одного damage-and-death разрешения на событие атаки.

use bevy::prelude::*;

use crate::ai::{AggroTracker, AiConfig};
use crate::components::Health;
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::SimulationAuthority;

/// Событие: запрос на урон (applyDamage(target, amount, attacker))
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub attacker: Entity,
    pub amount: u32,
    pub critical: bool,
    pub empowered: bool,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub critical: bool,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// System: apply damage от DamageRequest событий
///
/// 1. Мёртвые цели игнорируются (повторная смерть невозможна)
/// 2. Health::take_damage (saturating)
/// 3. AI цель агрится на атакующего (если может преследовать)
/// 4. DamageDealt и EntityDied события
pub fn apply_damage(
    authority: Res<SimulationAuthority>,
    mut requests: EventReader<DamageRequest>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut targets: Query<(&mut Health, Option<&mut AggroTracker>, Option<&AiConfig>)>,
) {
    if !authority.is_authoritative {
        requests.clear();
        return;
    }

    for request in requests.read() {
        let Ok((mut health, aggro, config)) = targets.get_mut(request.target) else {
            log_category(
                LogLevel::Warning,
                LogCategory::Combat,
                &format!("DamageRequest: target {:?} has no Health, skipped", request.target),
            );
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        health.take_damage(request.amount);
        let died = !health.is_alive();

        if !died {
            if let (Some(mut aggro), Some(config)) = (aggro, config) {
                if config.can_follow {
                    aggro.aggro_on_damage(request.attacker);
                }
            }
        }

        damage_dealt_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: request.amount,
            critical: request.critical,
            target_died: died,
        });

        if died {
            entity_died_events.write(EntityDied {
                entity: request.target,
                killer: Some(request.attacker),
            });

            log_category(
                LogLevel::Info,
                LogCategory::Combat,
                &format!("💀 Entity {:?} killed by {:?}", request.target, request.attacker),
            );
        }
    }
}
