//! Generic state machine (общий движок для игрока и AI)
//!
//! Архитектура:
//! - Состояние = enum variant с локальными таймерами (живёт одну активацию)
//! - `State<C>` - hooks on_enter/update/fixed_update/on_exit поверх capability `C`
//! - `C` - узкий интерфейс к компонентам entity (PlayerControl / AiControl)
//! - Таблица переходов (AI): (from kind, to, condition), проверяется после update
//!
//! Инвариант: on_exit предыдущего состояния завершается до on_enter следующего.

use bevy::prelude::*;
use std::fmt;
use std::mem::Discriminant;


/// Состояние машины поверх capability-контекста `C`
///
/// `update` возвращает `Some(next)` чтобы запросить переход.
pub trait State<C>: Clone + fmt::Debug {
    /// Per-tick snapshot, который передаётся в update/fixed_update
    type Input;

    fn name(&self) -> &'static str;

    fn on_enter(&mut self, _ctx: &mut C) {}

    fn update(&mut self, ctx: &mut C, input: &Self::Input) -> Option<Self>;

    fn fixed_update(&mut self, _ctx: &mut C, _input: &Self::Input) {}

    fn on_exit(&mut self, _ctx: &mut C) {}
}

/// Условие перехода в таблице (вычисляется на контексте entity)
pub trait Predicate<C> {
    fn evaluate(&self, ctx: &mut C) -> bool;
}

/// Машина без таблицы переходов (игрок): переходы запрашивают сами состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCondition {}

impl<C> Predicate<C> for NoCondition {
    fn evaluate(&self, _ctx: &mut C) -> bool {
        match *self {}
    }
}

/// Запись таблицы переходов: из состояния вида `from` в `to`, если `condition`
#[derive(Debug, Clone)]
pub struct Transition<S, P> {
    from: Discriminant<S>,
    to: S,
    condition: P,
}

impl<S, P> Transition<S, P> {
    pub fn new(from: &S, to: S, condition: P) -> Self {
        Self {
            from: std::mem::discriminant(from),
            to,
            condition,
        }
    }

    pub fn applies_to(&self, state: &S) -> bool {
        self.from == std::mem::discriminant(state)
    }

    pub fn target(&self) -> &S {
        &self.to
    }

    pub fn condition(&self) -> &P {
        &self.condition
    }
}

/// Счётчики lifecycle hooks (для инварианта enter == exit + 1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct LifecycleCounters {
    pub enters: u64,
    pub exits: u64,
}

/// Per-entity state machine
///
/// До первого `set_state`/`start` tick и fixed_tick ничего не делают.
#[derive(Component, Debug, Clone)]
pub struct StateMachine<S, P = NoCondition> {
    current: Option<S>,
    initial: Option<S>,
    transitions: Vec<Transition<S, P>>,
    enabled: bool,
    counters: LifecycleCounters,
}

impl<S, P> Default for StateMachine<S, P> {
    fn default() -> Self {
        Self {
            current: None,
            initial: None,
            transitions: Vec::new(),
            enabled: true,
            counters: LifecycleCounters::default(),
        }
    }
}

impl<S, P> StateMachine<S, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Машина, которая войдёт в `initial` при первом `start`
    pub fn starting_in(initial: S) -> Self {
        Self {
            initial: Some(initial),
            ..Self::default()
        }
    }

    /// Добавляет переход в конец таблицы (порядок объявления = приоритет)
    pub fn with_transition(mut self, from: &S, to: S, condition: P) -> Self {
        self.add_transition(from, to, condition);
        self
    }

    pub fn add_transition(&mut self, from: &S, to: S, condition: P) {
        self.transitions.push(Transition::new(from, to, condition));
    }

    pub fn transitions(&self) -> &[Transition<S, P>] {
        &self.transitions
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Выключает машину навсегда (смерть): tick/fixed_tick больше не диспатчат
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn counters(&self) -> LifecycleCounters {
        self.counters
    }

    /// Входит в начальное состояние (один раз)
    pub fn start<C>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        if let Some(initial) = self.initial.take() {
            self.set_state(ctx, initial);
        }
    }

    /// on_exit текущего → замена → on_enter нового
    ///
    /// Повторный set того же состояния не фильтруется: exit/enter будут вызваны.
    pub fn set_state<C>(&mut self, ctx: &mut C, next: S)
    where
        S: State<C>,
    {
        let previous_name = match self.current.take() {
            Some(mut previous) => {
                previous.on_exit(ctx);
                self.counters.exits += 1;
                Some(previous.name())
            }
            None => None,
        };

        let mut next = next;
        if let Some(previous_name) = previous_name {
            crate::logger::log(&format!("FSM: {} → {}", previous_name, next.name()));
        }
        next.on_enter(ctx);
        self.counters.enters += 1;
        self.current = Some(next);
    }

    /// Input-rate tick: update активного состояния, затем таблица переходов
    ///
    /// Возвращает true если в этом тике произошёл переход.
    pub fn tick<C>(&mut self, ctx: &mut C, input: &<S as State<C>>::Input) -> bool
    where
        S: State<C>,
        P: Predicate<C>,
    {
        if !self.enabled {
            return false;
        }

        let Some(state) = self.current.as_mut() else {
            return false;
        };

        if let Some(requested) = state.update(ctx, input) {
            self.set_state(ctx, requested);
            return true;
        }

        match self.next_from_table(ctx) {
            Some(next) => {
                self.set_state(ctx, next);
                true
            }
            None => false,
        }
    }

    /// Physics-rate tick
    pub fn fixed_tick<C>(&mut self, ctx: &mut C, input: &<S as State<C>>::Input)
    where
        S: State<C>,
    {
        if !self.enabled {
            return;
        }

        if let Some(state) = self.current.as_mut() {
            state.fixed_update(ctx, input);
        }
    }

    /// Первый (в порядке объявления) переход из текущего вида с истинным условием
    fn next_from_table<C>(&self, ctx: &mut C) -> Option<S>
    where
        S: State<C>,
        P: Predicate<C>,
    {
        let current = self.current.as_ref()?;

        self.transitions
            .iter()
            .filter(|transition| transition.applies_to(current))
            .find(|transition| transition.condition().evaluate(ctx))
            .map(|transition| transition.target().clone())
    }
}
