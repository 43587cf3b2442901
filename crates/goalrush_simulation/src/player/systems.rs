//! Player systems: контекст машины поверх компонентов + tick/fixed_tick

use bevy::prelude::*;

use crate::combat::{AttackIntent, AttackKind};
use crate::components::{
    Actor, Attacker, Dead, DebugColor, EmpowermentCounter, Kinematics, MovementTuning, StatBlock, Stealth, Team,
    VisualChange, VisualCommand,
};
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::physics::integrate_kinematics;
use crate::player::fsm::{PlayerControl, PlayerStateMachine};
use crate::player::input::{AttackTuning, InputSnapshot, PlayerController, PlayerInput};
use crate::scoring::{GoalView, GoalZone, PlayerScoring, ScoreAttempt};

/// Кросс-entity эффекты игрока за тик (сбрасываются в events после цикла)
#[derive(Debug, Default)]
pub struct PlayerOutbox {
    pub attacks: Vec<AttackIntent>,
    pub scores: Vec<ScoreAttempt>,
    pub visuals: Vec<VisualCommand>,
}

impl PlayerOutbox {
    fn flush(
        self,
        attacks: &mut EventWriter<AttackIntent>,
        scores: &mut EventWriter<ScoreAttempt>,
        visuals: &mut EventWriter<VisualCommand>,
    ) {
        attacks.write_batch(self.attacks);
        scores.write_batch(self.scores);
        visuals.write_batch(self.visuals);
    }
}

/// PlayerControl поверх компонентов одного игрока
pub struct PlayerContext<'a> {
    pub entity: Entity,
    pub delta: f32,
    pub team: Team,
    pub movement: &'a MovementTuning,
    pub attack: &'a AttackTuning,
    pub stats: &'a StatBlock,
    pub controller: &'a mut PlayerController,
    pub kinematics: &'a mut Kinematics,
    pub transform: &'a mut Transform,
    pub attacker: &'a mut Attacker,
    pub stealth: &'a mut Stealth,
    pub counter: &'a mut EmpowermentCounter,
    pub coins: u32,
    pub goal: Option<GoalView>,
    pub outbox: &'a mut PlayerOutbox,
}

impl PlayerContext<'_> {
    fn visual(&mut self, change: VisualChange) {
        self.outbox.visuals.push(VisualCommand {
            entity: self.entity,
            change,
        });
    }
}

impl PlayerControl for PlayerContext<'_> {
    fn delta(&self) -> f32 {
        self.delta
    }

    fn movement_tuning(&self) -> &MovementTuning {
        self.movement
    }

    fn attack_tuning(&self) -> &AttackTuning {
        self.attack
    }

    fn is_grounded(&self) -> bool {
        self.kinematics.grounded
    }

    fn vertical_velocity(&self) -> f32 {
        self.kinematics.velocity.y
    }

    fn set_vertical_velocity(&mut self, velocity: f32) {
        self.kinematics.velocity.y = velocity;
    }

    fn jumps_remaining(&self) -> u8 {
        self.kinematics.jumps_remaining
    }

    fn set_jumps_remaining(&mut self, jumps: u8) {
        self.kinematics.jumps_remaining = jumps;
    }

    fn integrate_movement(&mut self, input: Vec2, gravity_scale: f32) {
        integrate_kinematics(
            self.kinematics,
            &mut self.transform.translation,
            input,
            self.stats.speed,
            self.movement.gravity * gravity_scale,
            self.delta,
        );
    }

    fn consume_jump_buffer(&mut self) -> bool {
        self.controller.consume_jump_buffer()
    }

    fn consume_attack_press(&mut self) -> bool {
        self.controller.consume_attack_press()
    }

    fn is_attack_on_cooldown(&self) -> bool {
        self.attacker.is_on_cooldown()
    }

    fn is_next_attack_empowered(&self) -> bool {
        self.counter.is_next_attack_empowered()
    }

    fn execute_attack(&mut self) {
        self.attacker.start_cooldown(self.stats.attack_interval());

        if self.stealth.in_grass {
            self.stealth.reveal(self.attack.reveal_duration);
        }

        let kind = if self.counter.is_next_attack_empowered() {
            self.counter.consume_empowered();
            AttackKind::EmpoweredShot {
                targeting_range: self.attack.targeting_range,
                priority: self.attack.target_priority,
                facing: self.kinematics.facing,
            }
        } else {
            // Счётчик растёт в Resolve, когда известна команда цели
            AttackKind::MeleeSweep {
                radius: self.attack.melee_radius,
            }
        };

        self.outbox.attacks.push(AttackIntent {
            attacker: self.entity,
            kind,
        });
    }

    fn can_start_scoring(&self) -> bool {
        self.coins > 0 && self.goal.is_some_and(|goal| goal.accepts_from(self.team))
    }

    fn scoring_duration(&self) -> Option<f32> {
        self.goal.map(|goal| self.coins as f32 * goal.time_per_coin)
    }

    fn attempt_score(&mut self) {
        let Some(goal) = self.goal else {
            log_category(
                LogLevel::Warning,
                LogCategory::Scoring,
                &format!("Player {:?}: score attempt without goal zone", self.entity),
            );
            return;
        };

        self.outbox.scores.push(ScoreAttempt {
            player: self.entity,
            goal: goal.entity,
            coins: self.coins,
        });
    }

    fn set_debug_color(&mut self, color: DebugColor) {
        self.visual(VisualChange::DebugColor(color));
    }

    fn set_scoring_visual(&mut self, active: bool) {
        self.visual(VisualChange::ScoringIndicator(active));
    }
}

/// Компоненты, с которыми работает машина игрока
pub type PlayerData = (
    Entity,
    &'static mut PlayerStateMachine,
    &'static Actor,
    &'static PlayerInput,
    &'static mut PlayerController,
    &'static mut Kinematics,
    &'static mut Transform,
    &'static MovementTuning,
    &'static AttackTuning,
    &'static StatBlock,
    &'static mut Attacker,
    &'static mut Stealth,
    &'static mut EmpowermentCounter,
    &'static PlayerScoring,
);

/// Ворота, в которых стоит игрок (удалённые ворота = None)
fn goal_view(scoring: &PlayerScoring, goals: &Query<&GoalZone>) -> Option<GoalView> {
    let entity = scoring.goal?;
    goals.get(entity).ok().map(|zone| zone.view(entity))
}

/// Собирает контекст для каждого живого игрока и вызывает `run`
fn for_each_player(
    players: &mut Query<PlayerData, Without<Dead>>,
    goals: &Query<&GoalZone>,
    delta: f32,
    outbox: &mut PlayerOutbox,
    mut run: impl FnMut(&mut PlayerStateMachine, &mut PlayerContext, &InputSnapshot),
) {
    for (
        entity,
        mut machine,
        actor,
        input,
        mut controller,
        mut kinematics,
        mut transform,
        movement,
        attack,
        stats,
        mut attacker,
        mut stealth,
        mut counter,
        scoring,
    ) in players.iter_mut()
    {
        let snapshot = controller.snapshot(input);

        let mut ctx = PlayerContext {
            entity,
            delta,
            team: actor.team,
            movement,
            attack,
            stats,
            controller: &mut controller,
            kinematics: &mut kinematics,
            transform: &mut transform,
            attacker: &mut attacker,
            stealth: &mut stealth,
            counter: &mut counter,
            coins: scoring.coins,
            goal: goal_view(scoring, goals),
            outbox: &mut *outbox,
        };

        run(&mut *machine, &mut ctx, &snapshot);
    }
}

/// System: input-rate tick машины игрока (SimulationSet::Decide)
pub fn tick_player_state_machines(
    time: Res<Time>,
    mut players: Query<PlayerData, Without<Dead>>,
    goals: Query<&GoalZone>,
    mut attacks: EventWriter<AttackIntent>,
    mut scores: EventWriter<ScoreAttempt>,
    mut visuals: EventWriter<VisualCommand>,
) {
    let mut outbox = PlayerOutbox::default();

    for_each_player(&mut players, &goals, time.delta_secs(), &mut outbox, |machine, ctx, input| {
        machine.start(ctx);
        machine.tick(ctx, input);
    });

    outbox.flush(&mut attacks, &mut scores, &mut visuals);
}

/// System: physics-rate tick (FixedUpdate), интеграция движения внутри состояний
pub fn fixed_tick_player_state_machines(
    time: Res<Time>,
    mut players: Query<PlayerData, Without<Dead>>,
    goals: Query<&GoalZone>,
    mut attacks: EventWriter<AttackIntent>,
    mut scores: EventWriter<ScoreAttempt>,
    mut visuals: EventWriter<VisualCommand>,
) {
    let mut outbox = PlayerOutbox::default();

    for_each_player(&mut players, &goals, time.delta_secs(), &mut outbox, |machine, ctx, input| {
        machine.fixed_tick(ctx, input);
    });

    outbox.flush(&mut attacks, &mut scores, &mut visuals);
}
