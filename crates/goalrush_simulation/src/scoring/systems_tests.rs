//! Tests для scoring systems (App без плагинов, системы по одной)

use std::time::Duration;

use bevy::prelude::*;

use super::systems::*;
use super::*;
use crate::components::{Actor, Health, Progression, Stealth, Team};
use crate::SimulationAuthority;

fn scoring_app() -> App {
    let mut app = App::new();
    app.add_event::<TriggerEvent>()
        .add_event::<ScoreAttempt>()
        .add_event::<ScoreAccepted>()
        .add_event::<LevelUp>()
        .init_resource::<MatchState>()
        .insert_resource(SimulationAuthority::default())
        .add_systems(
            Update,
            (
                handle_trigger_events,
                (process_score_attempts, apply_level_ups).chain(),
            )
                .chain(),
        );
    app
}

fn spawn_player(app: &mut App, team: Team, coins: u32) -> Entity {
    app.world_mut()
        .spawn((Actor { team }, PlayerScoring { coins, ..default() }))
        .id()
}

fn spawn_goal(app: &mut App, team: Team, capacity: u32) -> Entity {
    let config = GoalZoneConfig {
        capacity,
        ..default()
    };
    app.world_mut().spawn(goal_zone_bundle(team, Vec3::ZERO, &config)).id()
}

fn accepted(app: &App) -> Vec<ScoreAccepted> {
    app.world()
        .resource::<Events<ScoreAccepted>>()
        .iter_current_update_events()
        .copied()
        .collect()
}

#[test]
fn test_scoring_xp_formula() {
    assert_eq!(scoring_xp(0), 0);
    assert_eq!(scoring_xp(4), 4);
    assert_eq!(scoring_xp(12), 32);
    assert_eq!(scoring_xp(100), 300);
}

#[test]
fn test_triggers_update_coins_goal_and_grass() {
    let mut app = scoring_app();
    let player = spawn_player(&mut app, Team::Home, 0);
    let goal = spawn_goal(&mut app, Team::Away, 100);
    let other_goal = spawn_goal(&mut app, Team::Neutral, 100);

    app.world_mut().send_event(TriggerEvent::CoinTouched { player, value: 3 });
    app.world_mut().send_event(TriggerEvent::CoinTouched { player, value: 2 });
    app.world_mut().send_event(TriggerEvent::EnteredGoal { player, goal });
    app.world_mut().send_event(TriggerEvent::EnteredGrass { actor: player });
    app.update();

    let scoring = *app.world().get::<PlayerScoring>(player).unwrap();
    assert_eq!(scoring.coins, 5);
    assert_eq!(scoring.goal, Some(goal));
    assert!(app.world().get::<Stealth>(player).unwrap().in_grass);

    // Выход из чужих ворот не трогает текущие
    app.world_mut().send_event(TriggerEvent::ExitedGoal { player, goal: other_goal });
    app.update();
    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().goal, Some(goal));

    app.world_mut().send_event(TriggerEvent::ExitedGoal { player, goal });
    app.world_mut().send_event(TriggerEvent::ExitedGrass { actor: player });
    app.update();
    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().goal, None);
    assert!(!app.world().get::<Stealth>(player).unwrap().in_grass);
}

#[test]
fn test_score_attempt_pays_out() {
    let mut app = scoring_app();
    let player = spawn_player(&mut app, Team::Home, 12);
    let goal = spawn_goal(&mut app, Team::Away, 100);

    app.world_mut().send_event(ScoreAttempt { player, goal, coins: 12 });
    app.update();

    assert_eq!(accepted(&app), vec![ScoreAccepted { player, goal, points: 12 }]);
    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().coins, 0);
    assert_eq!(app.world().resource::<MatchState>().home_score, 12);

    let progression = *app.world().get::<Progression>(player).unwrap();
    assert_eq!(progression, Progression { level: 1, xp: 32 });
    assert_eq!(app.world().get::<GoalZone>(goal).unwrap().remaining_capacity, 88);
}

#[test]
fn test_score_capped_by_capacity_breaks_goal() {
    let mut app = scoring_app();
    let player = spawn_player(&mut app, Team::Away, 30);
    let goal = spawn_goal(&mut app, Team::Neutral, 10);

    app.world_mut().send_event(ScoreAttempt { player, goal, coins: 30 });
    app.update();

    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().coins, 20);
    assert!(app.world().get::<GoalZone>(goal).unwrap().is_broken());
    assert_eq!(app.world().resource::<MatchState>().away_score, 10);

    // Сломанные ворота больше ничего не принимают
    app.world_mut().send_event(ScoreAttempt { player, goal, coins: 20 });
    app.update();
    assert!(accepted(&app).is_empty());
    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().coins, 20);
}

#[test]
fn test_level_up_heals_fully() {
    let mut app = scoring_app();
    let player = spawn_player(&mut app, Team::Home, 100);
    let goal = spawn_goal(&mut app, Team::Away, 100);
    app.world_mut().get_mut::<Health>(player).unwrap().current = 10;

    app.world_mut().send_event(ScoreAttempt { player, goal, coins: 100 });
    app.update();

    // 300 XP: 150 на level 2, остаток 150 < 200
    let progression = *app.world().get::<Progression>(player).unwrap();
    assert_eq!(progression, Progression { level: 2, xp: 150 });

    let health = app.world().get::<Health>(player).unwrap();
    assert_eq!(health.current, health.max);
}

#[test]
fn test_non_authoritative_side_skips_payout() {
    let mut app = scoring_app();
    app.insert_resource(SimulationAuthority {
        is_authoritative: false,
    });
    let player = spawn_player(&mut app, Team::Home, 5);
    let goal = spawn_goal(&mut app, Team::Away, 100);

    app.world_mut().send_event(ScoreAttempt { player, goal, coins: 5 });
    app.update();

    assert!(accepted(&app).is_empty());
    assert_eq!(app.world().get::<PlayerScoring>(player).unwrap().coins, 5);
}

fn heal_app(step: Duration) -> App {
    let mut app = App::new();
    let mut time = Time::<()>::default();
    time.advance_by(step);
    app.insert_resource(time)
        .add_systems(Update, heal_in_goal_zones);
    app
}

#[test]
fn test_own_goal_heals_with_fractional_carry() {
    let mut app = heal_app(Duration::from_millis(250));
    let goal = spawn_goal(&mut app, Team::Home, 100);
    let player = app
        .world_mut()
        .spawn((
            Actor { team: Team::Home },
            Health { current: 50, max: 100 },
            PlayerScoring {
                goal: Some(goal),
                ..default()
            },
        ))
        .id();

    // 10 HP/s × 0.25 s = 2.5 → +2, остаток 0.5
    app.update();
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 52);

    // 0.5 + 2.5 = 3.0 → +3
    app.update();
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 55);
}

#[test]
fn test_enemy_goal_does_not_heal() {
    let mut app = heal_app(Duration::from_millis(500));
    let goal = spawn_goal(&mut app, Team::Away, 100);
    let player = app
        .world_mut()
        .spawn((
            Actor { team: Team::Home },
            Health { current: 50, max: 100 },
            PlayerScoring {
                goal: Some(goal),
                ..default()
            },
        ))
        .id();

    app.update();
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 50);
}
