//! Camera shake notification
//!
//! Симуляция камерой не управляет. Разрушение пишет `CameraShakeRequested`,
//! resource `CameraShake` считает offset (random point inside unit sphere × amplitude)
//! каждый тик, пока не истечёт duration. Хост прибавляет offset к позиции камеры.

use bevy::prelude::*;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::DeterministicRng;

/// Событие: запрос тряски камеры (источник - точка разрушения)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CameraShakeRequested {
    pub origin: Vec3,
}

/// Текущее состояние тряски камеры
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    /// Оставшееся время (секунды)
    pub remaining: f32,
    pub amplitude: f32,
    /// Смещение камеры на этом тике (ZERO когда тряска закончилась)
    pub offset: Vec3,
}

impl CameraShake {
    /// Новый запрос перезапускает тряску (не суммируется)
    pub fn start(&mut self, duration: f32, amplitude: f32) {
        self.remaining = duration.max(0.0);
        self.amplitude = amplitude;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Равномерная точка внутри единичной сферы (rejection sampling)
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Система: CameraShakeRequested → CameraShake.start
pub fn start_camera_shake(
    mut requests: EventReader<CameraShakeRequested>,
    mut shake: ResMut<CameraShake>,
    config: Res<SimulationConfig>,
) {
    for request in requests.read() {
        shake.start(config.camera_shake.duration, config.camera_shake.amplitude);
        crate::logger::log(&format!("📷 Camera shake from {:?}", request.origin));
    }
}

/// Система: offset на этот тик
pub fn update_camera_shake(
    mut shake: ResMut<CameraShake>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    if !shake.is_active() {
        shake.offset = Vec3::ZERO;
        return;
    }

    shake.remaining = (shake.remaining - time.delta_secs()).max(0.0);
    shake.offset = if shake.is_active() {
        random_in_unit_sphere(&mut rng.rng) * shake.amplitude
    } else {
        // Закончили → камера возвращается в исходную позицию
        Vec3::ZERO
    };
}

pub struct CameraShakePlugin;

impl Plugin for CameraShakePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraShake>()
            .add_event::<CameraShakeRequested>()
            .add_systems(
                FixedUpdate,
                (start_camera_shake, update_camera_shake)
                    .chain()
                    .in_set(crate::SimulationSet::Effects),
            );
    }
}
