//! Movement компоненты: input intent и состояние контроллера

use bevy::prelude::*;

use super::state_machine::PlayerStateMachine;
use crate::components::AnimationFlags;

/// Намерение движения (перезаписывается input'ом, читается каждый тик)
///
/// `axis`: x = вправо, y = вперёд (мапится на world Z).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    pub axis: Vec2,
    pub run_held: bool,
}

impl MovementIntent {
    pub fn new(axis: Vec2, run_held: bool) -> Self {
        Self { axis, run_held }
    }

    pub fn movement_pressed(&self) -> bool {
        self.axis.x != 0.0 || self.axis.y != 0.0
    }
}

/// Состояние character controller'а
///
/// `current_movement` - целевая скорость (m/s), пишется state machine (XZ)
/// и apply_vertical_motion (Y). Применяется к Transform в apply_character_movement.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(MovementIntent, AnimationFlags, PlayerStateMachine, Transform)]
pub struct CharacterMotion {
    pub current_movement: Vec3,
    /// Есть контакт с полом (collision enter/exit от хоста)
    pub grounded: bool,
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self {
            current_movement: Vec3::ZERO,
            grounded: true,
        }
    }
}

impl CharacterMotion {
    pub fn horizontal(&self) -> Vec3 {
        Vec3::new(self.current_movement.x, 0.0, self.current_movement.z)
    }
}
