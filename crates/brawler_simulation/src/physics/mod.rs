//! Physics simulation module
//!
//! PhysicsBody интеграция + синхронизация с Rapier Velocity.

use bevy::prelude::*;

pub mod integration;

// Re-export основных типов
pub use integration::{rest_on_ground, Ballistic, GROUND_HEIGHT};

use crate::SimulationSet;

/// Physics Plugin
///
/// Запускается после destruction (осколки этого тика уже заспавнены).
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                integration::apply_ballistic_gravity,
                integration::integrate_physics_bodies,
                integration::sync_velocity_to_rapier,
            )
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
