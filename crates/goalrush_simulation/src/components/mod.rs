//! ECS Components для персонажей
//!
//! Организация по доменам:
//! - actor: команда, здоровье, статы, прогрессия, скрытность
//! - combat: cooldown атаки, empowerment counter, hurtbox
//! - movement: навигация AI, кинематика и параметры прыжка игрока
//! - world: точки спавна и визуальная граница

pub mod actor;
pub mod combat;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use combat::*;
pub use movement::*;
pub use world::*;
