//! TargetSelector: выбор цели по приоритету
//!
//! Кандидаты уже отфильтрованы spatial query (в радиусе, вражеская команда).
//! Мёртвые отбрасываются, при равенстве побеждает первый по порядку входа.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Правило выбора цели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum TargetPriority {
    /// Меньше всего current HP
    LowestAbsoluteHp,
    /// Меньше всего current / max
    #[default]
    LowestPercentageHp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub entity: Entity,
    pub current_health: u32,
    pub max_health: u32,
}

impl TargetCandidate {
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    fn score(&self, priority: TargetPriority) -> f32 {
        match priority {
            TargetPriority::LowestAbsoluteHp => self.current_health as f32,
            TargetPriority::LowestPercentageHp => {
                if self.max_health == 0 {
                    0.0
                } else {
                    self.current_health as f32 / self.max_health as f32
                }
            }
        }
    }
}

/// Возвращает лучшую цель или None, если живых кандидатов нет
pub fn select_target<I>(candidates: I, priority: TargetPriority) -> Option<Entity>
where
    I: IntoIterator<Item = TargetCandidate>,
{
    let mut best: Option<(Entity, f32)> = None;

    for candidate in candidates.into_iter().filter(TargetCandidate::is_alive) {
        let score = candidate.score(priority);
        // Строгое `<`: первый из равных остаётся
        let better = match best {
            Some((_, best_score)) => score < best_score,
            None => true,
        };
        if better {
            best = Some((candidate.entity, score));
        }
    }

    best.map(|(entity, _)| entity)
}
