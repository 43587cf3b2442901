//! Scoring systems: триггеры мира, payout, лечение в воротах, часы матча

use bevy::prelude::*;

use crate::components::{Actor, Dead, Health, NavAgent, Progression, StatBlock, Stealth};
use crate::logger::{log_category, LogCategory, LogLevel};
use crate::scoring::goal::GoalZone;
use crate::scoring::match_state::{MatchPhaseChanged, MatchState};
use crate::scoring::{LevelUp, PlayerScoring, ScoreAccepted, ScoreAttempt, TriggerEvent};
use crate::SimulationAuthority;

/// XP за забитые очки: points + (points / 5) × 10
pub fn scoring_xp(points: u32) -> u32 {
    points + (points / 5) * 10
}

/// System: события trigger-зон от внешнего physics слоя (SimulationSet::Input)
pub fn handle_trigger_events(
    mut triggers: EventReader<TriggerEvent>,
    mut scorers: Query<&mut PlayerScoring>,
    mut stealthy: Query<&mut Stealth>,
) {
    for trigger in triggers.read() {
        match *trigger {
            TriggerEvent::EnteredGoal { player, goal } => {
                if let Ok(mut scoring) = scorers.get_mut(player) {
                    scoring.goal = Some(goal);
                    scoring.heal_carry = 0.0;
                }
            }
            TriggerEvent::ExitedGoal { player, goal } => {
                if let Ok(mut scoring) = scorers.get_mut(player) {
                    // Выход из других ворот текущие не сбрасывает
                    if scoring.goal == Some(goal) {
                        scoring.goal = None;
                        scoring.heal_carry = 0.0;
                    }
                }
            }
            TriggerEvent::EnteredGrass { actor } => {
                if let Ok(mut stealth) = stealthy.get_mut(actor) {
                    stealth.in_grass = true;
                }
            }
            TriggerEvent::ExitedGrass { actor } => {
                if let Ok(mut stealth) = stealthy.get_mut(actor) {
                    stealth.in_grass = false;
                }
            }
            TriggerEvent::CoinTouched { player, value } => match scorers.get_mut(player) {
                Ok(mut scoring) => scoring.coins += value,
                Err(_) => log_category(
                    LogLevel::Warning,
                    LogCategory::Scoring,
                    &format!("CoinTouched: {:?} cannot carry coins", player),
                ),
            },
        }
    }
}

/// System: scoring payout (attemptScore → accepted points)
///
/// 1. GoalZone::accept(coins) → принятые очки (≤ capacity)
/// 2. Монеты списываются, очки идут команде в MatchState
/// 3. XP за очки, level up → LevelUp
pub fn process_score_attempts(
    authority: Res<SimulationAuthority>,
    mut attempts: EventReader<ScoreAttempt>,
    mut players: Query<(&Actor, &mut PlayerScoring, &mut Progression)>,
    mut goals: Query<&mut GoalZone>,
    mut match_state: ResMut<MatchState>,
    mut accepted_events: EventWriter<ScoreAccepted>,
    mut level_ups: EventWriter<LevelUp>,
) {
    if !authority.is_authoritative {
        attempts.clear();
        return;
    }

    for attempt in attempts.read() {
        let Ok((actor, mut scoring, mut progression)) = players.get_mut(attempt.player) else {
            continue;
        };
        let Ok(mut goal) = goals.get_mut(attempt.goal) else {
            log_category(
                LogLevel::Warning,
                LogCategory::Scoring,
                &format!("ScoreAttempt: goal {:?} not found", attempt.goal),
            );
            continue;
        };

        let offered = attempt.coins.min(scoring.coins);
        let points = goal.accept(offered);
        if points == 0 {
            log_category(
                LogLevel::Info,
                LogCategory::Scoring,
                &format!("Goal {:?} accepted nothing (broken: {})", attempt.goal, goal.is_broken()),
            );
            continue;
        }

        scoring.coins -= points;
        match_state.add_score(actor.team, points);

        let levels = progression.add_xp(scoring_xp(points));
        if levels > 0 {
            level_ups.write(LevelUp {
                entity: attempt.player,
                level: progression.level,
            });
        }

        accepted_events.write(ScoreAccepted {
            player: attempt.player,
            goal: attempt.goal,
            points,
        });

        log_category(
            LogLevel::Info,
            LogCategory::Scoring,
            &format!(
                "⚽ {:?} scored {} ({:?}: {} / {})",
                attempt.player, points, actor.team, match_state.home_score, match_state.away_score
            ),
        );

        if goal.is_broken() {
            log_category(
                LogLevel::Info,
                LogCategory::Scoring,
                &format!("Goal {:?} has been broken", attempt.goal),
            );
        }
    }
}

/// System: level up → полное лечение, скорость навигации из статов
pub fn apply_level_ups(
    mut level_ups: EventReader<LevelUp>,
    mut actors: Query<(&mut Health, &StatBlock, Option<&mut NavAgent>)>,
) {
    for event in level_ups.read() {
        let Ok((mut health, stats, agent)) = actors.get_mut(event.entity) else {
            continue;
        };

        health.restore_full();
        if let Some(mut agent) = agent {
            agent.speed = stats.speed;
        }

        crate::log(&format!("⬆️ {:?} reached level {}", event.entity, event.level));
    }
}

/// System: лечение своей команды в воротах (дробный остаток копится)
pub fn heal_in_goal_zones(
    time: Res<Time>,
    mut players: Query<(&Actor, &mut Health, &mut PlayerScoring), Without<Dead>>,
    goals: Query<&GoalZone>,
) {
    let delta = time.delta_secs();

    for (actor, mut health, mut scoring) in players.iter_mut() {
        let Some(goal) = scoring.goal.and_then(|goal| goals.get(goal).ok()) else {
            continue;
        };

        if goal.team != actor.team || health.current >= health.max {
            scoring.heal_carry = 0.0;
            continue;
        }

        scoring.heal_carry += goal.heal_per_second * delta;
        let whole = scoring.heal_carry.floor();
        if whole >= 1.0 {
            health.heal(whole as u32);
            scoring.heal_carry -= whole;
        }
    }
}

/// System: часы матча
pub fn tick_match_clock(
    time: Res<Time>,
    mut match_state: ResMut<MatchState>,
    mut phase_events: EventWriter<MatchPhaseChanged>,
) {
    if let Some(phase) = match_state.tick(time.delta_secs()) {
        phase_events.write(MatchPhaseChanged { phase });
        log_category(
            LogLevel::Info,
            LogCategory::General,
            &format!("Match phase → {:?} ({:.0}s left)", phase, match_state.time_remaining),
        );
    }
}
