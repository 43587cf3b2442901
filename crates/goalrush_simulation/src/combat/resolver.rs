//! CombatResolver: урон одного события атаки
//!
//! Порядок шагов фиксирован (одинаковый результат у всех клиентов):
//! 1. raw = attack × 1.2 + level × 20
//! 2. defense = max(0, defense)
//! 3. mitigation = 1 − defense / (defense + 600)
//! 4. raw × mitigation
//! 5. empowered → × 1.5
//! 6. crit (бросок [0,1) < crit_rate) → × 1.5
//! 7. variance → × [0.95, 1.05]
//! 8. round (ties to even), минимум 1

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::DeterministicRng;

pub const ATTACK_SCALING: f32 = 1.2;
pub const LEVEL_SCALING: f32 = 20.0;
pub const DEFENSE_CONSTANT: f32 = 600.0;
pub const EMPOWERED_MULTIPLIER: f32 = 1.5;
pub const CRITICAL_MULTIPLIER: f32 = 1.5;
pub const VARIANCE_MIN: f32 = 0.95;
pub const VARIANCE_MAX: f32 = 1.05;
pub const MIN_DAMAGE: u32 = 1;

/// Источник случайности для crit/variance
///
/// Детерминизм: в симуляции это seeded ChaCha8, в тестах - FixedRoll.
pub trait CombatRoll {
    /// Uniform [0, 1)
    fn crit_roll(&mut self) -> f32;

    /// Uniform [VARIANCE_MIN, VARIANCE_MAX]
    fn variance_roll(&mut self) -> f32;
}

impl CombatRoll for ChaCha8Rng {
    fn crit_roll(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn variance_roll(&mut self) -> f32 {
        self.gen_range(VARIANCE_MIN..=VARIANCE_MAX)
    }
}

impl CombatRoll for DeterministicRng {
    fn crit_roll(&mut self) -> f32 {
        self.rng.crit_roll()
    }

    fn variance_roll(&mut self) -> f32 {
        self.rng.variance_roll()
    }
}

/// Зафиксированные броски (тесты, превью урона)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRoll {
    pub crit: f32,
    pub variance: f32,
}

impl FixedRoll {
    /// Без крита, variance = 1.0
    pub const NEUTRAL: FixedRoll = FixedRoll {
        crit: 1.0,
        variance: 1.0,
    };
}

impl CombatRoll for FixedRoll {
    fn crit_roll(&mut self) -> f32 {
        self.crit
    }

    fn variance_roll(&mut self) -> f32 {
        self.variance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// ≥ 1
    pub amount: u32,
    pub critical: bool,
}

/// Урон одного события атаки
///
/// Защитник всегда уже разрешён (реальная цель попадания), поэтому
/// `defender_defense` - его настоящая защита.
pub fn calculate_damage<R: CombatRoll + ?Sized>(
    attacker_level: u32,
    attacker_attack: i32,
    defender_defense: i32,
    is_empowered: bool,
    crit_rate: f32,
    roll: &mut R,
) -> DamageOutcome {
    let raw = attacker_attack as f32 * ATTACK_SCALING + attacker_level as f32 * LEVEL_SCALING;

    let defense = defender_defense.max(0) as f32;
    let mitigation = 1.0 - defense / (defense + DEFENSE_CONSTANT);

    let mut damage = raw * mitigation;

    if is_empowered {
        damage *= EMPOWERED_MULTIPLIER;
    }

    // Бросок делается всегда: число вызовов RNG не зависит от crit_rate
    let critical = roll.crit_roll() < crit_rate;
    if critical {
        damage *= CRITICAL_MULTIPLIER;
    }

    damage *= roll.variance_roll();

    let rounded = damage.round_ties_even();
    let amount = if rounded < MIN_DAMAGE as f32 {
        MIN_DAMAGE
    } else {
        rounded as u32
    };

    DamageOutcome { amount, critical }
}
