//! Movement events

use bevy::prelude::*;

use super::state_machine::SubState;

/// Player input event - генерируется хостом когда меняется ввод
///
/// # Fields
/// - `move_axis`: x = вправо, y = вперёд (`Vec2::ZERO` если нет движения)
/// - `run`: зажат ли бег
/// - `punch`: удар (just_pressed, edge)
///
/// Применяется ко всем entity с `Player`.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInputEvent {
    pub move_axis: Vec2,
    pub run: bool,
    pub punch: bool,
}

/// Event: контакт с полом начался / закончился (collision enter / exit)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact {
    pub entity: Entity,
    pub grounded: bool,
}

/// Event: state machine переключила sub state
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransitioned {
    pub entity: Entity,
    pub from: SubState,
    pub to: SubState,
}

impl PlayerInputEvent {
    pub fn new(move_axis: Vec2, run: bool, punch: bool) -> Self {
        Self { move_axis, run, punch }
    }
}
