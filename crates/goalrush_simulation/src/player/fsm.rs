//! Player FSM: Idle, Grounded, Airborne, Attack, Scoring
//!
//! Переходы запрашивают сами состояния (таблицы нет).
//! update - на частоте ввода, fixed_update - интеграция движения.

use bevy::prelude::*;

use crate::components::{DebugColor, MovementTuning};
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::player::input::{AttackTuning, InputSnapshot};
use crate::state_machine::{State, StateMachine};

/// Capability interface игрока для состояний
pub trait PlayerControl {
    fn delta(&self) -> f32;

    fn movement_tuning(&self) -> &MovementTuning;

    fn attack_tuning(&self) -> &AttackTuning;

    // Movement/physics collaborator
    fn is_grounded(&self) -> bool;
    fn vertical_velocity(&self) -> f32;
    fn set_vertical_velocity(&mut self, velocity: f32);
    fn jumps_remaining(&self) -> u8;
    fn set_jumps_remaining(&mut self, jumps: u8);
    /// Горизонтальное движение по вводу + гравитация, умноженная на gravity_scale
    fn integrate_movement(&mut self, input: Vec2, gravity_scale: f32);

    // Input buffers
    fn consume_jump_buffer(&mut self) -> bool;
    fn consume_attack_press(&mut self) -> bool;

    // Combat
    fn is_attack_on_cooldown(&self) -> bool;
    fn is_next_attack_empowered(&self) -> bool;
    /// Одна атака: melee sweep или усиленный выстрел по счётчику
    fn execute_attack(&mut self);

    // Scoring
    /// Есть монеты и подходящие ворота
    fn can_start_scoring(&self) -> bool;
    /// coins × time_per_coin; None если ворот нет
    fn scoring_duration(&self) -> Option<f32>;
    /// Scoring payout boundary (attemptScore)
    fn attempt_score(&mut self);

    // Visual
    fn set_debug_color(&mut self, color: DebugColor);
    fn set_scoring_visual(&mut self, active: bool);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerState {
    Idle,
    /// Движение по земле (ненулевой ввод)
    Grounded,
    Airborne {
        /// Оставшееся окно ослабленной гравитации при удержании прыжка
        jump_hold_timer: f32,
        high_jump: bool,
    },
    Attack {
        timer: f32,
        duration: f32,
    },
    Scoring {
        /// None: вошли без ворот, выход в Idle на первом update
        timer: Option<f32>,
    },
}

impl PlayerState {
    pub fn airborne() -> Self {
        PlayerState::Airborne {
            jump_hold_timer: 0.0,
            high_jump: false,
        }
    }

    pub fn attack() -> Self {
        PlayerState::Attack {
            timer: 0.0,
            duration: 0.0,
        }
    }

    pub fn scoring() -> Self {
        PlayerState::Scoring { timer: None }
    }
}

/// Scoring → Attack (общие переходы для Idle и Grounded)
fn common_transition<C: PlayerControl>(ctx: &mut C, input: &InputSnapshot) -> Option<PlayerState> {
    if input.score_pressed && ctx.can_start_scoring() {
        return Some(PlayerState::scoring());
    }

    attack_transition(ctx, input)
}

/// Нажатие тратится даже на cooldown
fn attack_transition<C: PlayerControl>(ctx: &mut C, input: &InputSnapshot) -> Option<PlayerState> {
    if input.attack_pressed && ctx.consume_attack_press() && !ctx.is_attack_on_cooldown() {
        return Some(PlayerState::attack());
    }
    None
}

/// Прыжок с земли из буфера: v = sqrt(h · 2 · |g|)
fn try_ground_jump<C: PlayerControl>(ctx: &mut C, input: &InputSnapshot) -> bool {
    if !input.jump_buffered || !ctx.is_grounded() {
        return false;
    }
    if !ctx.consume_jump_buffer() {
        return false;
    }

    let launch = ctx.movement_tuning().launch_velocity();
    ctx.set_vertical_velocity(launch);
    true
}

fn enter_ground_state<C: PlayerControl>(ctx: &mut C, color: DebugColor) {
    ctx.set_debug_color(color);
    ctx.set_jumps_remaining(1);
}

impl<C: PlayerControl> State<C> for PlayerState {
    type Input = InputSnapshot;

    fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Grounded => "Grounded",
            PlayerState::Airborne { .. } => "Airborne",
            PlayerState::Attack { .. } => "Attack",
            PlayerState::Scoring { .. } => "Scoring",
        }
    }

    fn on_enter(&mut self, ctx: &mut C) {
        match self {
            PlayerState::Idle => enter_ground_state(ctx, DebugColor::Blue),
            PlayerState::Grounded => enter_ground_state(ctx, DebugColor::Green),
            PlayerState::Airborne { jump_hold_timer, high_jump } => {
                *jump_hold_timer = ctx.movement_tuning().jump_hold_duration;
                *high_jump = false;
                ctx.set_debug_color(DebugColor::Red);
            }
            PlayerState::Attack { timer, duration } => {
                let empowered = ctx.is_next_attack_empowered();
                ctx.set_debug_color(if empowered {
                    DebugColor::White
                } else {
                    DebugColor::Orange
                });
                ctx.execute_attack();

                *duration = ctx.attack_tuning().duration.max(0.0);
                *timer = *duration;
                log_category(
                    LogLevel::Debug,
                    LogCategory::Combat,
                    if empowered {
                        "Attack state entered (empowered)"
                    } else {
                        "Attack state entered"
                    },
                );
            }
            PlayerState::Scoring { timer } => match ctx.scoring_duration() {
                Some(duration) => {
                    *timer = Some(duration);
                    ctx.set_scoring_visual(true);
                    ctx.set_debug_color(DebugColor::White);
                }
                None => {
                    *timer = None;
                    log_category(
                        LogLevel::Warning,
                        LogCategory::Scoring,
                        "Scoring entered without a goal zone, returning to Idle",
                    );
                }
            },
        }
    }

    fn update(&mut self, ctx: &mut C, input: &InputSnapshot) -> Option<Self> {
        match self {
            PlayerState::Idle | PlayerState::Grounded => {
                if let Some(next) = common_transition(ctx, input) {
                    return Some(next);
                }

                if try_ground_jump(ctx, input) || !ctx.is_grounded() {
                    return Some(PlayerState::airborne());
                }

                match (&*self, input.has_move_input()) {
                    (PlayerState::Idle, true) => Some(PlayerState::Grounded),
                    (PlayerState::Grounded, false) => Some(PlayerState::Idle),
                    _ => None,
                }
            }
            PlayerState::Airborne { .. } => {
                if let Some(next) = attack_transition(ctx, input) {
                    return Some(next);
                }

                if ctx.is_grounded() && ctx.vertical_velocity() <= 0.0 {
                    return Some(PlayerState::Idle);
                }

                // Двойной прыжок: один раз между касаниями земли
                if input.jump_buffered && ctx.jumps_remaining() > 0 && ctx.consume_jump_buffer() {
                    let jumps = ctx.jumps_remaining();
                    ctx.set_jumps_remaining(jumps - 1);
                    let boost = ctx.movement_tuning().double_jump_velocity;
                    ctx.set_vertical_velocity(boost);
                    ctx.set_debug_color(DebugColor::Magenta);
                    log_category(LogLevel::Debug, LogCategory::Movement, "Double jump");
                }
                None
            }
            PlayerState::Attack { timer, .. } => {
                *timer -= ctx.delta();
                if *timer <= 0.0 {
                    return Some(PlayerState::Idle);
                }
                None
            }
            PlayerState::Scoring { timer } => {
                let Some(remaining) = timer.as_mut() else {
                    return Some(PlayerState::Idle);
                };

                *remaining -= ctx.delta();
                if *remaining <= 0.0 {
                    ctx.attempt_score();
                    return Some(PlayerState::Idle);
                }

                if !input.score_pressed || input.has_move_input() {
                    log_category(LogLevel::Debug, LogCategory::Scoring, "Scoring cancelled by player action");
                    return Some(PlayerState::Idle);
                }
                None
            }
        }
    }

    fn fixed_update(&mut self, ctx: &mut C, input: &InputSnapshot) {
        match self {
            PlayerState::Idle | PlayerState::Scoring { .. } => ctx.integrate_movement(Vec2::ZERO, 1.0),
            PlayerState::Grounded => ctx.integrate_movement(input.move_vector, 1.0),
            PlayerState::Airborne {
                jump_hold_timer,
                high_jump,
            } => {
                let tuning = *ctx.movement_tuning();
                let ascending = ctx.vertical_velocity() > 0.0;

                let gravity_scale = if ascending && input.jump_held && *jump_hold_timer > 0.0 {
                    *jump_hold_timer -= ctx.delta();
                    if !*high_jump {
                        *high_jump = true;
                        ctx.set_debug_color(DebugColor::Yellow);
                    }
                    1.0 - tuning.jump_cut_off_multiplier
                } else if ascending && !input.jump_held {
                    tuning.jump_cut_off_multiplier
                } else {
                    1.0
                };

                ctx.integrate_movement(input.move_vector, gravity_scale);
            }
            PlayerState::Attack { timer, duration } => {
                // Скорость линейно восстанавливается от multiplier до 1.0
                let progress = if *duration > 0.0 {
                    (1.0 - *timer / *duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let start = ctx.attack_tuning().move_speed_multiplier;
                let multiplier = start + (1.0 - start) * progress;
                ctx.integrate_movement(input.move_vector * multiplier, 1.0);
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut C) {
        if let PlayerState::Scoring { timer: Some(_) } = self {
            ctx.set_scoring_visual(false);
        }
    }
}

pub type PlayerStateMachine = StateMachine<PlayerState>;

/// Машина игрока, стартует в Idle
pub fn player_state_machine() -> PlayerStateMachine {
    StateMachine::starting_in(PlayerState::Idle)
}
