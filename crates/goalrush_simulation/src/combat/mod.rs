//! Combat system module
//!
//! ECS ответственность:
//! - Combat rules: CombatResolver (формула урона), TargetSelector
//! - Разрешение атак: AttackIntent → overlap/цель → DamageRequest
//! - Применение урона, смерть, loot, fade-out
//!
//! Внешние слои (рендер, сеть, пулы объектов) получают только события:
//! DamageDealt, EntityDied, LootDropped, VisualCommand.

use bevy::prelude::*;

pub mod attack;
pub mod damage;
pub mod death;
pub mod projectile;
pub mod resolver;
pub mod spatial;
pub mod targeting;


// Re-export основных типов
pub use attack::{resolve_attack_intents, AttackIntent, AttackKind, AttackerProfile};
pub use damage::{apply_damage, DamageDealt, DamageRequest, EntityDied};
pub use death::{DeathSequence, LootDropped};
pub use projectile::{Projectile, ProjectileHit, ShotProfile};
pub use resolver::{calculate_damage, CombatRoll, DamageOutcome, FixedRoll};
pub use spatial::{ActorSnapshot, LayerFilter, SpatialQuery, WorldSnapshot};
pub use targeting::{select_target, TargetCandidate, TargetPriority};

use crate::components::{Attacker, Stealth, VisualCommand};
use crate::SimulationSet;

/// System: cooldown атаки и таймер раскрытия
pub fn tick_combat_timers(
    time: Res<Time>,
    mut attackers: Query<&mut Attacker>,
    mut stealthy: Query<&mut Stealth>,
) {
    let delta = time.delta_secs();

    for mut attacker in attackers.iter_mut() {
        attacker.tick(delta);
    }

    for mut stealth in stealthy.iter_mut() {
        if stealth.is_revealed() {
            stealth.tick(delta);
        }
    }
}

/// Combat Plugin
///
/// Порядок выполнения (Update):
/// 1. Input: tick_combat_timers
/// 2. Resolve: resolve_attack_intents (intents от state machines)
/// 3. Apply: process_projectile_hits → apply_damage
/// 4. Aftermath: handle_deaths → tick_death_sequences
///
/// FixedUpdate: advance_projectiles (полёт снарядов)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ProjectileHit>()
            .add_event::<LootDropped>()
            .add_event::<VisualCommand>();

        app.add_systems(Update, tick_combat_timers.in_set(SimulationSet::Input))
            .add_systems(Update, resolve_attack_intents.in_set(SimulationSet::Resolve))
            .add_systems(
                Update,
                (projectile::process_projectile_hits, apply_damage)
                    .chain()
                    .in_set(SimulationSet::Apply),
            )
            .add_systems(
                Update,
                (death::handle_deaths, death::tick_death_sequences)
                    .chain()
                    .in_set(SimulationSet::Aftermath),
            )
            .add_systems(
                FixedUpdate,
                projectile::advance_projectiles
                    .after(crate::physics::steer_nav_agents)
                    .after(crate::player::fixed_tick_player_state_machines),
            );
    }
}
