//! PhysicsBody интеграция (headless, без Rapier step)
//!
//! Архитектура:
//! - Rapier только для коллизий (RigidBody::KinematicPositionBased)
//! - velocity интегрируем сами: knockback, разлёт осколков
//! - осколки (Ballistic) падают под гравитацией на плоскость y = GROUND_HEIGHT

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::PhysicsBody;
use crate::config::SimulationConfig;

/// Высота пола в headless симуляции
pub const GROUND_HEIGHT: f32 = 0.0;

/// Тело под гравитацией (осколки)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Ballistic;

/// Не даём box'у уйти под пол. Возвращает true если тело лежит на полу.
pub fn rest_on_ground(transform: &mut Transform, body: &mut PhysicsBody) -> bool {
    let floor = GROUND_HEIGHT + transform.scale.y.abs() * 0.5;
    if transform.translation.y > floor {
        return false;
    }

    transform.translation.y = floor;
    if body.velocity.y < 0.0 {
        body.velocity.y = 0.0;
    }
    true
}

/// Система: гравитация для Ballistic тел
pub fn apply_ballistic_gravity(
    mut bodies: Query<&mut PhysicsBody, With<Ballistic>>,
    config: Res<SimulationConfig>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    for mut body in bodies.iter_mut() {
        body.velocity.y += config.movement.gravity * delta;
    }
}

/// Система: velocity → Transform (position += velocity × dt, затем damping)
pub fn integrate_physics_bodies(
    mut bodies: Query<(&mut PhysicsBody, &mut Transform, Has<Ballistic>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform, ballistic) in bodies.iter_mut() {
        let displacement = body.step(delta);
        transform.translation += displacement;

        if ballistic {
            rest_on_ground(&mut transform, &mut body);
        }
    }
}

/// Система: зеркалим PhysicsBody.velocity в rapier Velocity (если хост подключил rapier)
pub fn sync_velocity_to_rapier(mut bodies: Query<(&PhysicsBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in bodies.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_on_ground_clamps_and_stops_fall() {
        let mut transform = Transform::from_xyz(0.0, -0.3, 0.0).with_scale(Vec3::splat(0.2));
        let mut body = PhysicsBody {
            velocity: Vec3::new(1.0, -4.0, 0.0),
            ..default()
        };

        assert!(rest_on_ground(&mut transform, &mut body));
        assert!((transform.translation.y - 0.1).abs() < 1e-6);
        assert_eq!(body.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rest_on_ground_ignores_airborne() {
        let mut transform = Transform::from_xyz(0.0, 2.0, 0.0);
        let mut body = PhysicsBody {
            velocity: Vec3::new(0.0, -4.0, 0.0),
            ..default()
        };

        assert!(!rest_on_ground(&mut transform, &mut body));
        assert_eq!(body.velocity.y, -4.0);
    }
}
