//! Tests для player FSM (mock capability, без App)

use super::fsm::*;
use super::input::{AttackTuning, InputSnapshot};
use crate::components::{DebugColor, MovementTuning};
use bevy::prelude::*;

struct MockPlayer {
    delta: f32,
    movement: MovementTuning,
    attack: AttackTuning,
    grounded: bool,
    vertical_velocity: f32,
    jumps_remaining: u8,
    jump_buffer: bool,
    attack_press: bool,
    on_cooldown: bool,
    empowered: bool,
    attacks: u32,
    can_score: bool,
    scoring_duration: Option<f32>,
    score_attempts: u32,
    colors: Vec<DebugColor>,
    scoring_visual: bool,
    integrations: Vec<(Vec2, f32)>,
}

impl MockPlayer {
    fn new() -> Self {
        Self {
            delta: 0.25,
            movement: MovementTuning::default(),
            attack: AttackTuning::default(),
            grounded: true,
            vertical_velocity: -2.0,
            jumps_remaining: 0,
            jump_buffer: false,
            attack_press: false,
            on_cooldown: false,
            empowered: false,
            attacks: 0,
            can_score: false,
            scoring_duration: None,
            score_attempts: 0,
            colors: Vec::new(),
            scoring_visual: false,
            integrations: Vec::new(),
        }
    }

    /// Снимок из состояния буферов мока
    fn input(&self, move_vector: Vec2) -> InputSnapshot {
        InputSnapshot {
            move_vector,
            jump_held: self.jump_buffer,
            jump_buffered: self.jump_buffer,
            attack_pressed: self.attack_press,
            score_pressed: false,
        }
    }
}

impl PlayerControl for MockPlayer {
    fn delta(&self) -> f32 {
        self.delta
    }

    fn movement_tuning(&self) -> &MovementTuning {
        &self.movement
    }

    fn attack_tuning(&self) -> &AttackTuning {
        &self.attack
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    fn set_vertical_velocity(&mut self, velocity: f32) {
        self.vertical_velocity = velocity;
    }

    fn jumps_remaining(&self) -> u8 {
        self.jumps_remaining
    }

    fn set_jumps_remaining(&mut self, jumps: u8) {
        self.jumps_remaining = jumps;
    }

    fn integrate_movement(&mut self, input: Vec2, gravity_scale: f32) {
        self.integrations.push((input, gravity_scale));
    }

    fn consume_jump_buffer(&mut self) -> bool {
        std::mem::take(&mut self.jump_buffer)
    }

    fn consume_attack_press(&mut self) -> bool {
        std::mem::take(&mut self.attack_press)
    }

    fn is_attack_on_cooldown(&self) -> bool {
        self.on_cooldown
    }

    fn is_next_attack_empowered(&self) -> bool {
        self.empowered
    }

    fn execute_attack(&mut self) {
        self.attacks += 1;
        self.on_cooldown = true;
    }

    fn can_start_scoring(&self) -> bool {
        self.can_score
    }

    fn scoring_duration(&self) -> Option<f32> {
        self.scoring_duration
    }

    fn attempt_score(&mut self) {
        self.score_attempts += 1;
    }

    fn set_debug_color(&mut self, color: DebugColor) {
        self.colors.push(color);
    }

    fn set_scoring_visual(&mut self, active: bool) {
        self.scoring_visual = active;
    }
}

fn started() -> (PlayerStateMachine, MockPlayer) {
    let mut machine = player_state_machine();
    let mut player = MockPlayer::new();
    machine.start(&mut player);
    (machine, player)
}

fn is_airborne(machine: &PlayerStateMachine) -> bool {
    matches!(machine.current(), Some(PlayerState::Airborne { .. }))
}

fn is_attacking(machine: &PlayerStateMachine) -> bool {
    matches!(machine.current(), Some(PlayerState::Attack { .. }))
}

const FORWARD: Vec2 = Vec2::new(0.0, 1.0);

#[test]
fn test_starts_idle_with_one_jump() {
    let (machine, player) = started();

    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert_eq!(player.jumps_remaining, 1);
    assert_eq!(player.colors, vec![DebugColor::Blue]);
}

#[test]
fn test_idle_grounded_idle_round_trip_resets_jumps() {
    let (mut machine, mut player) = started();

    player.jumps_remaining = 0;
    let input = player.input(FORWARD);
    assert!(machine.tick(&mut player, &input));
    assert_eq!(machine.current(), Some(&PlayerState::Grounded));
    assert_eq!(player.jumps_remaining, 1);

    player.jumps_remaining = 0;
    let input = player.input(Vec2::ZERO);
    assert!(machine.tick(&mut player, &input));
    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert_eq!(player.jumps_remaining, 1);
}

#[test]
fn test_grounded_stays_while_moving() {
    let (mut machine, mut player) = started();
    let input = player.input(FORWARD);
    machine.tick(&mut player, &input);

    for _ in 0..5 {
        assert!(!machine.tick(&mut player, &input));
    }
    assert_eq!(machine.current(), Some(&PlayerState::Grounded));
}

#[test]
fn test_buffered_jump_launches_to_jump_height() {
    let (mut machine, mut player) = started();
    player.jump_buffer = true;

    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);

    assert!(is_airborne(&machine));
    assert!(!player.jump_buffer, "буфер потрачен");
    let expected = (2.0_f32 * 2.0 * 30.0).sqrt();
    assert!((player.vertical_velocity - expected).abs() < 1e-4);
}

#[test]
fn test_buffer_kept_while_not_grounded() {
    let (mut machine, mut player) = started();
    player.grounded = false;
    player.jump_buffer = true;

    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);

    // Сошли с земли без прыжка: буфер остался для воздуха
    assert!(is_airborne(&machine));
    assert!(player.jump_buffer);
    assert_eq!(player.vertical_velocity, -2.0);
}

#[test]
fn test_double_jump_allowed_once() {
    let (mut machine, mut player) = started();
    player.jump_buffer = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    player.grounded = false;

    player.jump_buffer = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert_eq!(player.vertical_velocity, 5.0);
    assert_eq!(player.jumps_remaining, 0);
    assert_eq!(player.colors.last(), Some(&DebugColor::Magenta));

    player.vertical_velocity = 1.0;
    player.jump_buffer = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert_eq!(player.vertical_velocity, 1.0);
}

#[test]
fn test_landing_returns_idle_and_restores_jump() {
    let (mut machine, mut player) = started();
    player.jump_buffer = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    player.grounded = false;
    player.jumps_remaining = 0;

    // Ещё летим вверх при касании (grounded, но vy > 0) - не приземление
    player.grounded = true;
    player.vertical_velocity = 3.0;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert!(is_airborne(&machine));

    player.vertical_velocity = -2.0;
    machine.tick(&mut player, &input);
    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert_eq!(player.jumps_remaining, 1);
}

#[test]
fn test_attack_runs_once_and_returns_idle() {
    let (mut machine, mut player) = started();
    player.attack_press = true;

    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert!(is_attacking(&machine));
    assert_eq!(player.attacks, 1);
    assert_eq!(player.colors.last(), Some(&DebugColor::Orange));

    // 0.5 s / 0.25 s: ещё один тик в атаке, затем Idle
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert!(is_attacking(&machine));
    machine.tick(&mut player, &input);
    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert_eq!(player.attacks, 1);
}

#[test]
fn test_attack_press_dropped_on_cooldown() {
    let (mut machine, mut player) = started();
    player.on_cooldown = true;
    player.attack_press = true;

    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);

    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert!(!player.attack_press);
    assert_eq!(player.attacks, 0);
}

#[test]
fn test_empowered_attack_color() {
    let (mut machine, mut player) = started();
    player.empowered = true;
    player.attack_press = true;

    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);

    assert_eq!(player.colors.last(), Some(&DebugColor::White));
}

#[test]
fn test_attack_honored_airborne_and_returns_idle_mid_air() {
    let (mut machine, mut player) = started();
    player.grounded = false;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert!(is_airborne(&machine));

    player.attack_press = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    assert!(is_attacking(&machine));

    machine.tick(&mut player, &input);
    machine.tick(&mut player, &input);
    // Всё ещё в воздухе, но атака всегда возвращает в Idle
    assert_eq!(machine.current(), Some(&PlayerState::Idle));

    machine.tick(&mut player, &input);
    assert!(is_airborne(&machine));
}

#[test]
fn test_attack_damps_movement_and_recovers_linearly() {
    let (mut machine, mut player) = started();
    player.attack_press = true;
    let input = player.input(FORWARD);
    machine.tick(&mut player, &input);

    machine.fixed_tick(&mut player, &input);
    let (damped, _) = player.integrations[0];
    assert!((damped.y - 0.5).abs() < 1e-6);

    // Прошла половина атаки → 0.75
    machine.tick(&mut player, &input);
    machine.fixed_tick(&mut player, &input);
    let (recovering, _) = player.integrations[1];
    assert!((recovering.y - 0.75).abs() < 1e-6);
}

#[test]
fn test_airborne_gravity_scaling() {
    let (mut machine, mut player) = started();
    player.jump_buffer = true;
    let input = player.input(Vec2::ZERO);
    machine.tick(&mut player, &input);
    player.grounded = false;

    let held = InputSnapshot {
        jump_held: true,
        ..default()
    };
    // Окно удержания 0.25 s = один fixed tick по 0.25
    machine.fixed_tick(&mut player, &held);
    machine.fixed_tick(&mut player, &held);
    machine.fixed_tick(&mut player, &InputSnapshot::default());

    let scales: Vec<f32> = player.integrations.iter().map(|(_, scale)| *scale).collect();
    assert_eq!(scales, vec![0.25, 1.0, 0.75]);
    assert!(player.colors.contains(&DebugColor::Yellow));
}

#[test]
fn test_scoring_priority_over_attack() {
    let (mut machine, mut player) = started();
    player.can_score = true;
    player.scoring_duration = Some(1.0);
    player.attack_press = true;

    let mut input = player.input(Vec2::ZERO);
    input.score_pressed = true;
    machine.tick(&mut player, &input);

    assert!(matches!(machine.current(), Some(PlayerState::Scoring { timer: Some(_) })));
    assert!(player.scoring_visual);
    assert_eq!(player.attacks, 0);
}

#[test]
fn test_scoring_expires_into_payout() {
    let (mut machine, mut player) = started();
    player.can_score = true;
    player.scoring_duration = Some(0.5);

    let input = InputSnapshot {
        score_pressed: true,
        ..default()
    };
    machine.tick(&mut player, &input);
    machine.tick(&mut player, &input);
    assert_eq!(player.score_attempts, 0);
    machine.tick(&mut player, &input);

    assert_eq!(player.score_attempts, 1);
    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert!(!player.scoring_visual);
}

#[test]
fn test_scoring_cancelled_by_release_or_movement() {
    for cancel in [
        InputSnapshot::default(),
        InputSnapshot {
            score_pressed: true,
            move_vector: FORWARD,
            ..default()
        },
    ] {
        let (mut machine, mut player) = started();
        player.can_score = true;
        player.scoring_duration = Some(3.0);

        let hold = InputSnapshot {
            score_pressed: true,
            ..default()
        };
        machine.tick(&mut player, &hold);
        machine.tick(&mut player, &cancel);

        assert_eq!(machine.current(), Some(&PlayerState::Idle));
        assert_eq!(player.score_attempts, 0);
        assert!(!player.scoring_visual);
    }
}

#[test]
fn test_scoring_without_goal_falls_back_to_idle() {
    let (mut machine, mut player) = started();
    player.can_score = true;
    player.scoring_duration = None;

    let input = InputSnapshot {
        score_pressed: true,
        ..default()
    };
    machine.tick(&mut player, &input);
    assert!(matches!(machine.current(), Some(PlayerState::Scoring { timer: None })));
    assert!(!player.scoring_visual);

    machine.tick(&mut player, &input);
    assert_eq!(machine.current(), Some(&PlayerState::Idle));
    assert_eq!(player.score_attempts, 0);
}
