//! Destruction domain - damageable entities + fragment spawner
//!
//! ECS ответственность:
//! - Destructible: health, hit grace window, break scheduling
//! - Fragment spawner: grid_size³ осколков, радиальный импульс, lifetime
//! - Score bookkeeping
//!
//! Хост ответственность (опционально):
//! - рендер осколков (SurfaceMaterial копируется с источника)
//! - камера (читает CameraShake resource)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod destructible;
pub mod fragments;
pub mod systems;


pub use destructible::{
    apply_damage, DamageOutcome, Destructible, DestructibleBroken, DestructibleDamaged, Score,
    ShatterRequested,
};
pub use fragments::{
    explosion_impulse, fragment_layout, spawn_fragments, ExplosionParams, Fragment, FragmentCell,
    FragmentsSpawned,
};

use crate::components::{ColliderTag, PhysicsBody, SurfaceMaterial};
use crate::SimulationSet;

/// Destruction Plugin
///
/// Порядок выполнения:
/// Timers фаза: end_hit_grace_windows - EndHitGrace (до combat в этом же тике)
///
/// Destruction фаза:
/// 1. handle_break_timers - Break → ShatterRequested
/// 2. shatter_destructibles - осколки → despawn источника
/// 3. tick_fragment_lifetimes
/// 4. expire_fragments - ExpireFragment → despawn
pub struct DestructionPlugin;

impl Plugin for DestructionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .add_event::<DestructibleDamaged>()
            .add_event::<ShatterRequested>()
            .add_event::<DestructibleBroken>()
            .add_event::<FragmentsSpawned>();

        app.add_systems(
            FixedUpdate,
            systems::end_hit_grace_windows
                .after(crate::timers::fire_due_timers)
                .in_set(SimulationSet::Timers),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::handle_break_timers,
                systems::shatter_destructibles,
                systems::tick_fragment_lifetimes,
                systems::expire_fragments,
            )
                .chain()
                .in_set(SimulationSet::Destruction),
        );
    }
}

/// Spawn helper для разрушаемого куба (unit cube × scale)
pub fn spawn_destructible_cube(
    commands: &mut Commands,
    position: Vec3,
    scale: Vec3,
    health: f32,
    point_worth: i32,
    material: SurfaceMaterial,
) -> Entity {
    commands
        .spawn((
            Destructible::new(health, point_worth),
            Transform::from_translation(position).with_scale(scale),
            ColliderTag::destructible(),
            material,
            PhysicsBody::with_mass(2.0),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(0.5, 0.5, 0.5),
            Velocity::zero(),
        ))
        .id()
}
