//! Physics body abstraction: velocity, mass, impulses
//!
//! Не физический движок - только то, что нужно симуляции:
//! - apply_impulse (knockback, взрыв)
//! - интеграция velocity → Transform (physics::integrate_physics_bodies)
//! - зеркалирование в rapier Velocity, если хост подключил rapier

use bevy::prelude::*;

/// Физическое тело (knockback target, осколок)
///
/// Инвариант: mass > 0
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub mass: f32,
    /// Линейное затухание скорости (1/сек)
    pub damping: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 1.0,
            damping: 2.0,
        }
    }
}

impl PhysicsBody {
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass: mass.max(f32::EPSILON),
            ..default()
        }
    }

    /// Мгновенный импульс (N·s): Δv = impulse / mass
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass.max(f32::EPSILON);
    }

    /// Один шаг интеграции: возвращает смещение за `delta` и гасит скорость
    pub fn step(&mut self, delta: f32) -> Vec3 {
        let displacement = self.velocity * delta;
        let decay = (1.0 - self.damping * delta).max(0.0);
        self.velocity *= decay;
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_scales_with_mass() {
        let mut light = PhysicsBody::with_mass(1.0);
        let mut heavy = PhysicsBody::with_mass(4.0);

        light.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        heavy.apply_impulse(Vec3::new(4.0, 0.0, 0.0));

        assert_eq!(light.velocity, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(heavy.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_step_moves_and_damps() {
        let mut body = PhysicsBody {
            velocity: Vec3::new(0.0, 0.0, -6.0),
            mass: 1.0,
            damping: 2.0,
        };

        let displacement = body.step(0.5);
        assert_eq!(displacement, Vec3::new(0.0, 0.0, -3.0));
        // decay = 1 - 2 * 0.5 = 0 → остановились
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
