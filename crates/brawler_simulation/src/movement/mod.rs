//! Movement domain - player controller
//!
//! Содержит:
//! - MovementIntent / CharacterMotion (input intent, controller state)
//! - PlayerStateMachine (Grounded → Idle / Walk / Run)
//! - PlayerInputEvent, GroundContact, StateTransitioned
//! - spawn_player_character

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod components;
pub mod events;
pub mod state_machine;
pub mod systems;


// Re-export all components and events
pub use components::*;
pub use events::*;
pub use state_machine::{PlayerStateMachine, StateContext, StateTransition, SubState, SuperState};

use crate::combat::{Brawler, HitVolume};
use crate::components::Player;
use crate::config::CombatConfig;
use crate::SimulationSet;

/// Movement Plugin
///
/// Input → state machine → rotation → vertical → Transform, строго по порядку.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInputEvent>()
            .add_event::<GroundContact>()
            .add_event::<StateTransitioned>()
            .add_event::<crate::components::AnimationFlagChanged>();

        app.add_systems(
            FixedUpdate,
            (systems::apply_player_input, systems::apply_ground_contacts)
                .chain()
                .in_set(SimulationSet::Input),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_state_machines,
                // Флаги/поворот считаются ДО применения движения
                systems::face_movement_direction,
                systems::apply_vertical_motion,
                systems::apply_character_movement,
            )
                .chain()
                .in_set(SimulationSet::Movement),
        );
    }
}

/// Spawn helper для player-controlled персонажа
///
/// Создает entity с полным набором компонентов:
/// - Transform (+ required: MovementIntent, AnimationFlags, PlayerStateMachine)
/// - CharacterMotion, Player
/// - Brawler + HitVolume (удар)
/// - Rapier: kinematic capsule
pub fn spawn_player_character(
    commands: &mut Commands,
    position: Vec3,
    combat: &CombatConfig,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Player,
            CharacterMotion::default(),
            Brawler::from_config(combat),
            HitVolume::with_duration(combat.punch_duration),
            // Rapier: персонаж кинематический, двигаем Transform сами
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
        ))
        .id()
}
