//! Tests для AI FSM (через mock capability, без App)

use super::aggro::{AggroTracker, ChaseQuery, TargetView};
use super::fsm::*;
use crate::components::{DebugColor, Team};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Nav {
    Destination(Vec3),
    StoppingDistance(f32),
    Stop,
    Reset,
}

struct MockAi {
    delta: f32,
    config: AiConfig,
    aggro: AggroTracker,
    target: Option<TargetView>,
    position: Vec3,
    spawn: Vec3,
    on_nav_mesh: bool,
    attack_interval: f32,
    nav: Vec<Nav>,
    strikes: u32,
    colors: Vec<DebugColor>,
}

impl MockAi {
    fn new() -> Self {
        Self {
            delta: 0.25,
            config: AiConfig::default(),
            aggro: AggroTracker::default(),
            target: None,
            position: Vec3::ZERO,
            spawn: Vec3::ZERO,
            on_nav_mesh: true,
            attack_interval: 0.5,
            nav: Vec::new(),
            strikes: 0,
            colors: Vec::new(),
        }
    }

    fn aggro_on(&mut self, target_position: Vec3) {
        let mut world = World::new();
        self.aggro.aggro_on_damage(world.spawn_empty().id());
        self.target = Some(TargetView {
            position: target_position,
            concealed: false,
            team: Team::Home,
        });
    }
}

impl AiControl for MockAi {
    fn delta(&self) -> f32 {
        self.delta
    }

    fn config(&self) -> &AiConfig {
        &self.config
    }

    fn is_aggroed(&self) -> bool {
        self.aggro.is_aggroed()
    }

    fn should_chase(&mut self) -> bool {
        let query = ChaseQuery {
            target: self.target,
            can_follow: self.config.can_follow,
            own_team: Team::Neutral,
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
        self.attack_interval
    }

    fn is_on_nav_mesh(&self) -> bool {
        self.on_nav_mesh
    }

    fn set_destination(&mut self, point: Vec3) {
        self.nav.push(Nav::Destination(point));
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.nav.push(Nav::StoppingDistance(distance));
    }

    fn stop(&mut self) {
        self.nav.push(Nav::Stop);
    }

    fn reset_path(&mut self) {
        self.nav.push(Nav::Reset);
    }

    fn strike_target(&mut self) {
        self.strikes += 1;
    }

    fn set_debug_color(&mut self, color: DebugColor) {
        self.colors.push(color);
    }
}

fn started() -> (AiStateMachine, MockAi) {
    let mut machine = ai_state_machine();
    let mut ai = MockAi::new();
    machine.start(&mut ai);
    (machine, ai)
}

#[test]
fn test_ai_config_default() {
    let config = AiConfig::default();
    assert!(config.can_follow);
    assert_eq!(config.leash_radius, 15.0);
    assert_eq!(config.attack_radius, 2.0);
    assert_eq!(config.coin_drop_amount, 3);
    assert_eq!(config.death_fade_duration, 1.5);
}

#[test]
fn test_starts_idle_stopped_and_calm() {
    let (machine, ai) = started();

    assert_eq!(machine.current(), Some(&AiState::Idle));
    assert_eq!(ai.colors, vec![DebugColor::Gray]);
    assert_eq!(ai.nav, vec![Nav::Stop]);
    assert!(!ai.aggro.is_aggroed());
}

#[test]
fn test_idle_stays_idle_without_aggro() {
    let (mut machine, mut ai) = started();

    for _ in 0..10 {
        assert!(!machine.tick(&mut ai, &()));
    }
    assert_eq!(machine.current(), Some(&AiState::Idle));
}

#[test]
fn test_damage_aggro_enters_combat() {
    let (mut machine, mut ai) = started();
    ai.aggro_on(Vec3::new(5.0, 0.0, 0.0));

    assert!(machine.tick(&mut ai, &()));

    assert!(matches!(machine.current(), Some(AiState::Combat { .. })));
    assert_eq!(ai.colors.last(), Some(&DebugColor::Magenta));
    assert_eq!(ai.nav.last(), Some(&Nav::StoppingDistance(2.0 * COMBAT_STOPPING_FACTOR)));
}

#[test]
fn test_combat_chases_target_out_of_attack_radius() {
    let (mut machine, mut ai) = started();
    let target = Vec3::new(5.0, 0.0, 0.0);
    ai.aggro_on(target);

    machine.tick(&mut ai, &());
    machine.tick(&mut ai, &());

    assert_eq!(ai.nav.last(), Some(&Nav::Destination(target)));
    assert_eq!(ai.strikes, 0);
}

#[test]
fn test_combat_attacks_on_cooldown() {
    let (mut machine, mut ai) = started();
    ai.aggro_on(Vec3::new(1.0, 0.0, 0.0));

    // Тик 1: Idle → Combat (таймер 0)
    machine.tick(&mut ai, &());
    assert_eq!(ai.strikes, 0);

    // Тик 2: таймер -0.25 → удар, таймер 0.5
    machine.tick(&mut ai, &());
    assert_eq!(ai.strikes, 1);

    // Тик 3: 0.25, тик 4: 0.0 → удар
    machine.tick(&mut ai, &());
    assert_eq!(ai.strikes, 1);
    machine.tick(&mut ai, &());
    assert_eq!(ai.strikes, 2);
}

#[test]
fn test_leash_break_returns_home_after_grace() {
    let (mut machine, mut ai) = started();
    ai.position = Vec3::new(18.0, 0.0, 0.0);
    ai.aggro_on(Vec3::new(20.0, 0.0, 0.0));

    // Таймер: 1.5 (вход в Combat), 1.0, 0.5, 0.0 → Return
    for _ in 0..3 {
        machine.tick(&mut ai, &());
        assert!(matches!(machine.current(), Some(AiState::Combat { .. })));
    }
    machine.tick(&mut ai, &());

    assert_eq!(machine.current(), Some(&AiState::Return));
    assert!(!ai.aggro.is_aggroed());
    assert_eq!(ai.colors.last(), Some(&DebugColor::Orange));
    // Выход из Combat сбросил путь, Return повёл домой
    let tail = &ai.nav[ai.nav.len() - 3..];
    assert_eq!(
        tail,
        &[Nav::Reset, Nav::StoppingDistance(0.0), Nav::Destination(Vec3::ZERO)]
    );
}

#[test]
fn test_return_reaches_spawn_then_idles() {
    let (mut machine, mut ai) = started();
    ai.position = Vec3::new(18.0, 0.0, 0.0);
    ai.aggro_on(Vec3::new(20.0, 0.0, 0.0));
    for _ in 0..4 {
        machine.tick(&mut ai, &());
    }
    assert_eq!(machine.current(), Some(&AiState::Return));

    // Ещё далеко
    machine.tick(&mut ai, &());
    assert_eq!(machine.current(), Some(&AiState::Return));

    ai.position = Vec3::new(0.5, 0.0, 0.0);
    machine.tick(&mut ai, &());

    assert_eq!(machine.current(), Some(&AiState::Idle));
    assert_eq!(ai.colors.last(), Some(&DebugColor::Gray));
    assert_eq!(ai.nav.last(), Some(&Nav::Stop));
}

#[test]
fn test_off_nav_mesh_never_touches_navigation() {
    let mut machine = ai_state_machine();
    let mut ai = MockAi::new();
    ai.on_nav_mesh = false;
    machine.start(&mut ai);

    ai.position = Vec3::new(18.0, 0.0, 0.0);
    ai.aggro_on(Vec3::new(20.0, 0.0, 0.0));
    for _ in 0..6 {
        machine.tick(&mut ai, &());
    }

    assert_eq!(machine.current(), Some(&AiState::Return));
    assert!(ai.nav.is_empty());
}

#[test]
fn test_follow_disabled_never_leaves_idle() {
    let (mut machine, mut ai) = started();
    ai.config.can_follow = false;
    ai.aggro_on(Vec3::new(1.0, 0.0, 0.0));

    for _ in 0..5 {
        machine.tick(&mut ai, &());
    }

    assert_eq!(machine.current(), Some(&AiState::Idle));
}

#[test]
fn test_enter_exit_balance_over_full_cycle() {
    let (mut machine, mut ai) = started();
    ai.position = Vec3::new(18.0, 0.0, 0.0);
    ai.aggro_on(Vec3::new(20.0, 0.0, 0.0));
    for _ in 0..4 {
        machine.tick(&mut ai, &());
    }
    ai.position = Vec3::ZERO;
    machine.tick(&mut ai, &());

    let counters = machine.counters();
    assert_eq!(counters.enters, 4); // Idle, Combat, Return, Idle
    assert_eq!(counters.exits, 3);
}

#[test]
fn test_ai_transition_table_order() {
    let machine = ai_state_machine();
    let table: Vec<_> = machine
        .transitions()
        .iter()
        .map(|transition| (transition.target().clone(), *transition.condition()))
        .collect();

    assert_eq!(
        table,
        vec![
            (AiState::combat(), AiCondition::AggroedAndChasing),
            (AiState::Return, AiCondition::StoppedChasing),
            (AiState::Idle, AiCondition::ReachedSpawn),
        ]
    );
    assert!(machine.transitions()[1].applies_to(&AiState::Combat {
        attack_timer: 0.4,
        attack_interval: 1.0,
    }));
}
