//! Базовые компоненты персонажей: Actor, Health, StatBlock, Progression, Stealth

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{EmpowermentCounter, Hurtbox};

/// Команда персонажа
///
/// Neutral - дикие монстры: атаки по ним не копят empowerment,
/// а сами они не теряют цель из-за травы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Neutral,
    Home,
    Away,
}

impl Team {
    pub fn is_neutral(&self) -> bool {
        matches!(self, Team::Neutral)
    }
}

/// Персонаж (игрок или AI)
///
/// Автоматически добавляет Health, StatBlock, Progression, Stealth, EmpowermentCounter, Hurtbox.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, StatBlock, Progression, Stealth, EmpowermentCounter, Hurtbox)]
pub struct Actor {
    pub team: Team,
}

/// Здоровье персонажа
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    /// current / max; max == 0 → 0.0
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Базовые статы персонажа (из описания персонажа, не меняются в бою)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct StatBlock {
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    /// м/с
    pub speed: f32,
    /// [0, 1]
    pub crit_rate: f32,
    /// атак в секунду
    pub attack_speed: f32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            hp: 100,
            attack: 50,
            defense: 30,
            special_attack: 30,
            special_defense: 30,
            speed: 5.0,
            crit_rate: 0.1,
            attack_speed: 1.0,
        }
    }
}

impl StatBlock {
    /// Интервал между атаками: 1 / attack_speed
    ///
    /// attack_speed ≤ 0 → 1 секунда.
    pub fn attack_interval(&self) -> f32 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            1.0
        }
    }
}

/// Уровень и опыт
///
/// Инвариант: level ≥ 1, xp < xp_for_next_level(level) после add_xp
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}

impl Progression {
    pub fn xp_for_next_level(level: u32) -> u32 {
        100 + level * 50
    }

    /// Начисляет опыт; возвращает количество полученных уровней
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);

        let mut gained = 0;
        loop {
            let threshold = Self::xp_for_next_level(self.level);
            if self.xp < threshold {
                break;
            }
            self.xp -= threshold;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

/// Скрытность: трава + временное раскрытие
///
/// Concealed = в траве И не раскрыт.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stealth {
    pub in_grass: bool,
    /// Оставшееся время раскрытия (сек)
    pub reveal_timer: f32,
}

impl Stealth {
    pub fn is_revealed(&self) -> bool {
        self.reveal_timer > 0.0
    }

    pub fn is_concealed(&self) -> bool {
        self.in_grass && !self.is_revealed()
    }

    /// Перезапускает таймер раскрытия
    pub fn reveal(&mut self, duration: f32) {
        self.reveal_timer = duration.max(0.0);
    }

    pub fn tick(&mut self, delta: f32) {
        self.reveal_timer = (self.reveal_timer - delta).max(0.0);
    }
}
