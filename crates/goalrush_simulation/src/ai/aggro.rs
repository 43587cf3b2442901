//! AggroTracker: на кого AI агрится и как долго держит цель
//!
//! Инварианты:
//! - is_aggroed → target.is_some()
//! - loss_timer ≥ 0, уменьшается только пока цель вне leash

use bevy::prelude::*;

use crate::components::Team;

/// Сколько AI держит агр после выхода цели за leash (сек)
pub const AGGRO_GRACE_PERIOD: f32 = 2.0;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AggroTracker {
    is_aggroed: bool,
    /// Weak reference: entity может уже не существовать
    target: Option<Entity>,
    loss_timer: f32,
}

/// Что AI видит о своей цели в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec3,
    /// В траве и не раскрыт
    pub concealed: bool,
    pub team: Team,
}

/// Входы для should_chase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseQuery {
    /// None: цели нет или она уже не существует/мертва
    pub target: Option<TargetView>,
    pub can_follow: bool,
    pub own_team: Team,
    pub spawn: Vec3,
    pub leash_radius: f32,
    pub delta: f32,
}

impl AggroTracker {
    pub fn is_aggroed(&self) -> bool {
        self.is_aggroed
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn loss_timer(&self) -> f32 {
        self.loss_timer
    }

    /// Damage hook: агр на атакующего, таймер = grace period
    pub fn aggro_on_damage(&mut self, attacker: Entity) {
        self.is_aggroed = true;
        self.target = Some(attacker);
        self.loss_timer = AGGRO_GRACE_PERIOD;
    }

    pub fn lose_aggro(&mut self) {
        self.is_aggroed = false;
    }

    /// Продолжать ли преследование
    ///
    /// Side effects: снимает агр с замаскированной цели (AI не нейтральный),
    /// обновляет/уменьшает loss_timer.
    pub fn should_chase(&mut self, query: &ChaseQuery) -> bool {
        let Some(target) = query.target else {
            return false;
        };
        if self.target.is_none() || !query.can_follow {
            return false;
        }

        if target.concealed && !query.own_team.is_neutral() {
            self.lose_aggro();
            return false;
        }

        if !self.is_aggroed {
            return false;
        }

        if query.spawn.distance(target.position) <= query.leash_radius {
            self.loss_timer = AGGRO_GRACE_PERIOD;
            return true;
        }

        self.loss_timer = (self.loss_timer - query.delta).max(0.0);
        self.loss_timer > 0.0
    }
}
