//! Fragment spawner: N×N×N grid of debris tiling the source's box.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{PhysicsBody, SurfaceMaterial};
use crate::config::DestructionConfig;
use crate::physics::Ballistic;
use crate::timers::{TimerAction, TimerQueue};

/// Осколок разрушенного объекта
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Fragment {
    /// Ячейка сетки (x, y, z) ∈ [0, grid_size)³
    pub cell: UVec3,
    /// Оставшееся время жизни (секунды), удаление - по таймеру ExpireFragment
    pub time_to_live: f32,
}

/// Одна ячейка раскладки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentCell {
    pub cell: UVec3,
    pub position: Vec3,
    pub scale: Vec3,
}

/// Параметры взрыва
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionParams {
    pub grid_size: u32,
    pub force: f32,
    pub radius: f32,
    pub fragment_mass: f32,
    pub fragment_lifetime: f32,
}

impl From<&DestructionConfig> for ExplosionParams {
    fn from(config: &DestructionConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            force: config.explosion_force,
            radius: config.explosion_radius,
            fragment_mass: config.fragment_mass,
            fragment_lifetime: config.fragment_lifetime,
        }
    }
}

/// Раскладка осколков: сетка точно покрывает box источника.
///
/// cell scale = scale / grid_size,
/// position = origin - scale/2 + cell_scale/2 + (x, y, z) ⊙ cell_scale.
pub fn fragment_layout(origin: Vec3, scale: Vec3, grid_size: u32) -> Vec<FragmentCell> {
    if grid_size == 0 {
        return Vec::new();
    }

    let cell_scale = scale / grid_size as f32;
    let first_center = origin - scale / 2.0 + cell_scale / 2.0;

    let mut cells = Vec::with_capacity((grid_size as usize).pow(3));
    for x in 0..grid_size {
        for y in 0..grid_size {
            for z in 0..grid_size {
                let cell = UVec3::new(x, y, z);
                cells.push(FragmentCell {
                    cell,
                    position: first_center + cell.as_vec3() * cell_scale,
                    scale: cell_scale,
                });
            }
        }
    }
    cells
}

/// Радиальный импульс взрыва: от центра, линейно до нуля на `radius`.
///
/// Осколок ровно в центре получает импульс вверх.
pub fn explosion_impulse(center: Vec3, position: Vec3, force: f32, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }

    let offset = position - center;
    let distance = offset.length();
    if distance >= radius {
        return Vec3::ZERO;
    }

    let falloff = 1.0 - distance / radius;
    let direction = offset.try_normalize().unwrap_or(Vec3::Y);
    direction * force * falloff
}

/// Спавнит осколки для источника и ставит таймеры удаления.
///
/// Источник не трогает - удаление источника на вызывающем (после спавна).
pub fn spawn_fragments(
    commands: &mut Commands,
    queue: &mut TimerQueue,
    source: &Transform,
    material: Option<&SurfaceMaterial>,
    params: &ExplosionParams,
) -> Vec<Entity> {
    let center = source.translation;
    let material = material.cloned().unwrap_or_default();

    fragment_layout(source.translation, source.scale, params.grid_size)
        .into_iter()
        .map(|cell| {
            let mut body = PhysicsBody::with_mass(params.fragment_mass);
            body.apply_impulse(explosion_impulse(center, cell.position, params.force, params.radius));

            let fragment = commands
                .spawn((
                    Fragment {
                        cell: cell.cell,
                        time_to_live: params.fragment_lifetime,
                    },
                    Transform::from_translation(cell.position).with_scale(cell.scale),
                    body,
                    Ballistic,
                    material.clone(),
                    // Rapier: unit cube, масштаб берётся из Transform
                    RigidBody::KinematicPositionBased,
                    Collider::cuboid(0.5, 0.5, 0.5),
                    Velocity::linear(body.velocity),
                ))
                .id();

            queue.schedule_after(fragment, params.fragment_lifetime, TimerAction::ExpireFragment);
            fragment
        })
        .collect()
}

/// Событие: осколки заспавнены (до удаления источника)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentsSpawned {
    pub source: Entity,
    pub count: usize,
}
