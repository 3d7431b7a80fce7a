//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через input.

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// `PlayerInputEvent` применяется ко всем entity с этим маркером
/// (в single-player обычно один).
///
/// # Future: Possession
/// Для переключения контроля между персонажами:
/// ```ignore
/// commands.entity(old_character).remove::<Player>();
/// commands.entity(new_character).insert(Player);
/// ```
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
