//! AI systems: per-entity контекст для машины + tick в Decide

use bevy::prelude::*;

use crate::ai::aggro::{AggroTracker, ChaseQuery, TargetView};
use crate::ai::fsm::{AiConfig, AiControl, AiStateMachine};
use crate::combat::{AttackIntent, AttackKind};
use crate::components::{
    Actor, Dead, DebugColor, EmpowermentCounter, Health, MovementCommand, NavAgent, SpawnPoint, StatBlock,
    Stealth, Team, VisualChange, VisualCommand,
};
use crate::SimulationAuthority;

/// Команды, которые состояния AI отдали за тик (сбрасываются в events после tick)
#[derive(Debug, Default)]
pub struct AiOutbox {
    pub attacks: Vec<AttackIntent>,
    pub visuals: Vec<VisualCommand>,
}

/// AiControl поверх компонентов одной AI entity
pub struct AiContext<'a> {
    pub entity: Entity,
    pub delta: f32,
    pub position: Vec3,
    pub team: Team,
    pub spawn: Vec3,
    pub config: &'a AiConfig,
    pub stats: &'a StatBlock,
    pub aggro: &'a mut AggroTracker,
    pub counter: &'a mut EmpowermentCounter,
    pub command: &'a mut MovementCommand,
    pub agent: &'a mut NavAgent,
    /// Снимок цели агра (None: цели нет, она мертва или удалена)
    pub target: Option<TargetView>,
    pub outbox: &'a mut AiOutbox,
}

impl AiControl for AiContext<'_> {
    fn delta(&self) -> f32 {
        self.delta
    }

    fn config(&self) -> &AiConfig {
        self.config
    }

    fn is_aggroed(&self) -> bool {
        self.aggro.is_aggroed()
    }

    fn should_chase(&mut self) -> bool {
        let query = ChaseQuery {
            target: self.target,
            can_follow: self.config.can_follow,
            own_team: self.team,
            spawn: self.spawn,
            leash_radius: self.config.leash_radius,
            delta: self.delta,
        };
        self.aggro.should_chase(&query)
    }

    fn lose_aggro(&mut self) {
        self.aggro.lose_aggro();
    }

    fn spawn_point(&self) -> Vec3 {
        self.spawn
    }

    fn distance_to_spawn(&self) -> f32 {
        self.position.distance(self.spawn)
    }

    fn target_position(&self) -> Option<Vec3> {
        self.target.map(|target| target.position)
    }

    fn target_in_radius(&self, radius: f32) -> bool {
        self.target
            .is_some_and(|target| target.position.distance(self.position) <= radius)
    }

    fn attack_interval(&self) -> f32 {
        self.stats.attack_interval()
    }

    fn is_on_nav_mesh(&self) -> bool {
        self.agent.on_nav_mesh
    }

    fn set_destination(&mut self, point: Vec3) {
        *self.command = MovementCommand::MoveToPosition { target: point };
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.agent.stopping_distance = distance.max(0.0);
    }

    fn stop(&mut self) {
        *self.command = MovementCommand::Stop;
    }

    fn reset_path(&mut self) {
        *self.command = MovementCommand::Idle;
    }

    fn strike_target(&mut self) {
        let Some(target) = self.aggro.target() else {
            return;
        };

        // Усиленный удар тратит заряд, обычный его копит (кроме нейтральных целей)
        let empowered = self.counter.is_next_attack_empowered();
        if empowered {
            self.counter.consume_empowered();
        } else {
            let target_team = self.target.map(|view| view.team).unwrap_or_default();
            self.counter.register_attack(target_team);
        }

        self.outbox.attacks.push(AttackIntent {
            attacker: self.entity,
            kind: AttackKind::Strike {
                target,
                radius: self.config.attack_radius,
                empowered,
            },
        });
    }

    fn set_debug_color(&mut self, color: DebugColor) {
        self.outbox.visuals.push(VisualCommand {
            entity: self.entity,
            change: VisualChange::DebugColor(color),
        });
    }
}

/// Снимок цели агра; мёртвая или удалённая цель = None
pub fn view_target(
    target: Option<Entity>,
    targets: &Query<(&Transform, &Stealth, &Health, &Actor)>,
) -> Option<TargetView> {
    let (transform, stealth, health, actor) = targets.get(target?).ok()?;
    if !health.is_alive() {
        return None;
    }

    Some(TargetView {
        position: transform.translation,
        concealed: stealth.is_concealed(),
        team: actor.team,
    })
}

/// System: tick AI state machines (Decide)
///
/// Первый tick входит в начальное состояние (Idle), дальше update + таблица.
/// Атаки уходят AttackIntent событиями в Resolve.
#[allow(clippy::type_complexity)]
pub fn tick_ai_state_machines(
    time: Res<Time>,
    mut ai: Query<
        (
            Entity,
            &mut AiStateMachine,
            &Transform,
            &Actor,
            &SpawnPoint,
            &AiConfig,
            &StatBlock,
            &mut AggroTracker,
            &mut EmpowermentCounter,
            &mut MovementCommand,
            &mut NavAgent,
        ),
        Without<Dead>,
    >,
    targets: Query<(&Transform, &Stealth, &Health, &Actor)>,
    mut attacks: EventWriter<AttackIntent>,
    mut visuals: EventWriter<VisualCommand>,
    authority: Res<SimulationAuthority>,
) {
    // AI решает только на authoritative стороне, остальные получают репликацию
    if !authority.is_authoritative {
        return;
    }

    let delta = time.delta_secs();
    let mut outbox = AiOutbox::default();

    for (
        entity,
        mut machine,
        transform,
        actor,
        spawn,
        config,
        stats,
        mut aggro,
        mut counter,
        mut command,
        mut agent,
    ) in ai.iter_mut()
    {
        let target = view_target(aggro.target(), &targets);

        let mut ctx = AiContext {
            entity,
            delta,
            position: transform.translation,
            team: actor.team,
            spawn: spawn.0,
            config,
            stats,
            aggro: &mut aggro,
            counter: &mut counter,
            command: &mut command,
            agent: &mut agent,
            target,
            outbox: &mut outbox,
        };

        machine.start(&mut ctx);
        machine.tick(&mut ctx, &());
    }

    attacks.write_batch(outbox.attacks);
    visuals.write_batch(outbox.visuals);
}
