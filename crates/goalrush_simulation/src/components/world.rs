//! Мир и визуальная граница: SpawnPoint, DebugColor, VisualCommand

use bevy::prelude::*;

/// Точка спавна (AI возвращается сюда, leash считается от неё)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec3);

/// Отладочный цвет текущего состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DebugColor {
    Blue,
    Green,
    Red,
    Yellow,
    Magenta,
    White,
    Orange,
    Gray,
}

/// Что поменять в визуале entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualChange {
    DebugColor(DebugColor),
    /// Индикатор забивания очков (setVisualActive)
    ScoringIndicator(bool),
    /// 1.0 → полностью видим, 0.0 → невидим
    Opacity(f32),
}

/// Событие: fire-and-forget команда визуальному слою
///
/// Симуляция не читает ответ - рендер/UI вне ядра.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VisualCommand {
    pub entity: Entity,
    pub change: VisualChange,
}
