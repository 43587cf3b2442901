//! Combat компоненты: cooldown атаки, empowerment counter, hurtbox, Dead

use bevy::prelude::*;

use crate::components::Team;

/// Сколько базовых атак нужно для усиленной (по умолчанию)
pub const ATTACKS_UNTIL_EMPOWERED: u8 = 3;

/// Cooldown атаки игрока
///
/// Интервал берётся из StatBlock::attack_interval() в момент атаки.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,
}

impl Attacker {
    pub fn is_on_cooldown(&self) -> bool {
        self.cooldown_timer > 0.0
    }

    pub fn start_cooldown(&mut self, interval: f32) {
        self.cooldown_timer = interval.max(0.0);
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Счётчик базовых атак до усиленной
///
/// Инвариант: 0 ≤ count ≤ threshold - 1.
/// count == threshold - 1 → следующая атака усиленная.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EmpowermentCounter {
    pub count: u8,
    pub threshold: u8,
}

impl Default for EmpowermentCounter {
    fn default() -> Self {
        Self::with_threshold(ATTACKS_UNTIL_EMPOWERED)
    }
}

impl EmpowermentCounter {
    /// threshold < 1 трактуется как 1 (каждая атака усиленная)
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    fn cap(&self) -> u8 {
        self.threshold.saturating_sub(1)
    }

    pub fn is_next_attack_empowered(&self) -> bool {
        self.count >= self.cap()
    }

    /// Базовая атака по цели команды `target_team`
    ///
    /// По нейтральным счётчик не растёт. Возвращает true если засчитано.
    pub fn register_attack(&mut self, target_team: Team) -> bool {
        if target_team.is_neutral() {
            return false;
        }
        if self.count < self.cap() {
            self.count += 1;
        }
        true
    }

    pub fn consume_empowered(&mut self) {
        self.count = 0;
    }
}

/// Зона попадания (hit-detection collider)
///
/// Выключается в death sequence: по мёртвым не попадают.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub enabled: bool,
    /// Радиус тела (для overlap/projectile проверок)
    pub radius: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 0.5,
        }
    }
}

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Повторная смерть и урон по Dead игнорируются.
#[derive(Component, Debug, Default)]
pub struct Dead;
