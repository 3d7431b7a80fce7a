//! Combat system module (punch → hit volume → damage / knockback)
//!
//! ECS ответственность:
//! - Brawler / HitVolume state (punch lock, volume enable)
//! - Overlap resolution: проверки + knockback + damage
//! - Events: PunchPressed, PunchStarted, OverlapStay
//!
//! Хост ответственность (опционально):
//! - настоящая физика overlap'ов → пишет OverlapStay сам
//! - animation graph → читает AnimationTriggered("isAttacking")

use bevy::prelude::*;

pub mod hitbox;
pub mod knockback;

// Re-export основных типов
pub use hitbox::{Brawler, HitVolume, OverlapStay, PunchPressed, PunchStarted};
pub use knockback::knockback_direction;

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. start_punches - PunchPressed → volume on + trigger + таймеры
/// 2. handle_attack_timers - volume off / recovery
/// 3. detect_hit_volume_overlaps - headless AABB → OverlapStay
/// 4. resolve_hit_volume_overlaps - OverlapStay → knockback + damage
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<PunchPressed>()
            .add_event::<PunchStarted>()
            .add_event::<OverlapStay>()
            .add_event::<crate::components::AnimationTriggered>();

        app.add_systems(
            FixedUpdate,
            (
                hitbox::start_punches,
                hitbox::handle_attack_timers,
                hitbox::detect_hit_volume_overlaps,
                knockback::resolve_hit_volume_overlaps,
            )
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Combat),
        );
    }
}
