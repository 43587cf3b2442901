//! Spatial query: overlap-in-radius по снимку персонажей
//!
//! Физика вне ядра; ядру нужен только ответ "кто в радиусе".
//! WorldSnapshot собирается системой из Query один раз за тик,
//! порядок = порядок итерации Query (детерминирован для одинакового спавна).

use bevy::prelude::*;

use crate::components::{Health, Team};

/// Read-only снимок персонажа для боевых расчётов
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSnapshot {
    pub entity: Entity,
    pub team: Team,
    pub position: Vec3,
    pub health: Health,
    pub defense: i32,
    /// Радиус hurtbox; None → hurtbox выключен
    pub hurtbox_radius: Option<f32>,
}

impl ActorSnapshot {
    pub fn can_be_hit(&self) -> bool {
        self.health.is_alive() && self.hurtbox_radius.is_some()
    }
}

/// Фильтр слоёв для overlap
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerFilter {
    /// Исключить себя
    pub exclude: Option<Entity>,
    /// Только персонажи команды, отличной от этой
    pub enemies_of: Option<Team>,
}

impl LayerFilter {
    pub fn enemies_of(owner: Entity, team: Team) -> Self {
        Self {
            exclude: Some(owner),
            enemies_of: Some(team),
        }
    }

    pub fn accepts(&self, actor: &ActorSnapshot) -> bool {
        if self.exclude == Some(actor.entity) {
            return false;
        }
        match self.enemies_of {
            Some(team) => actor.team != team,
            None => true,
        }
    }
}

/// Movement/physics query: `overlapInRadius(center, radius, layerFilter)`
pub trait SpatialQuery {
    /// Живые персонажи с включённым hurtbox, чья сфера пересекает сферу запроса
    fn overlap_in_radius(&self, center: Vec3, radius: f32, filter: &LayerFilter) -> Vec<ActorSnapshot>;
}

/// Снимок всех персонажей за тик
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    actors: Vec<ActorSnapshot>,
}

impl WorldSnapshot {
    pub fn new(actors: Vec<ActorSnapshot>) -> Self {
        Self { actors }
    }
}

impl SpatialQuery for WorldSnapshot {
    fn overlap_in_radius(&self, center: Vec3, radius: f32, filter: &LayerFilter) -> Vec<ActorSnapshot> {
        self.actors
            .iter()
            .filter(|actor| actor.can_be_hit() && filter.accepts(actor))
            .filter(|actor| {
                let reach = radius + actor.hurtbox_radius.unwrap_or(0.0);
                actor.position.distance_squared(center) <= reach * reach
            })
            .copied()
            .collect()
    }
}
