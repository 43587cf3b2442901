//! Goal zones: приём очков (attemptScore), поломка, лечение своей команды

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Team;

/// Параметры ворот
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalZoneConfig {
    /// Сколько очков ворота принимают до поломки
    pub capacity: u32,
    /// Секунд забивания на одну монету
    pub time_per_coin: f32,
    /// HP/s для игроков своей команды внутри зоны
    pub heal_per_second: f32,
}

impl Default for GoalZoneConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            time_per_coin: 0.1,
            heal_per_second: 10.0,
        }
    }
}

/// Ворота (trigger zone во внешнем physics слое)
///
/// Инвариант: broken ⇔ remaining_capacity == 0 после хотя бы одного приёма.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GoalZone {
    pub team: Team,
    pub remaining_capacity: u32,
    pub time_per_coin: f32,
    pub heal_per_second: f32,
    broken: bool,
}

impl GoalZone {
    pub fn new(team: Team, config: &GoalZoneConfig) -> Self {
        Self {
            team,
            remaining_capacity: config.capacity,
            time_per_coin: config.time_per_coin.max(0.0),
            heal_per_second: config.heal_per_second.max(0.0),
            broken: false,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Принимает до remaining_capacity очков, возвращает принятое
    ///
    /// Сломанные ворота принимают 0.
    pub fn accept(&mut self, points: u32) -> u32 {
        if self.broken {
            return 0;
        }

        let accepted = points.min(self.remaining_capacity);
        self.remaining_capacity -= accepted;

        if self.remaining_capacity == 0 {
            self.broken = true;
        }
        accepted
    }

    pub fn view(&self, entity: Entity) -> GoalView {
        GoalView {
            entity,
            team: self.team,
            time_per_coin: self.time_per_coin,
        }
    }
}

/// Что машина игрока знает о воротах, в которых стоит
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalView {
    pub entity: Entity,
    pub team: Team,
    pub time_per_coin: f32,
}

impl GoalView {
    /// В нейтральные ворота может забивать любой, в командные - только соперник
    pub fn accepts_from(&self, team: Team) -> bool {
        self.team.is_neutral() || self.team != team
    }
}

/// Ворота для spawn
pub fn goal_zone_bundle(team: Team, position: Vec3, config: &GoalZoneConfig) -> impl Bundle {
    (GoalZone::new(team, config), Transform::from_translation(position))
}
