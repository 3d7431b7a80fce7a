//! Combat / knockback resolver
//!
//! На каждый `OverlapStay` проверяем по порядку:
//! 1. hit volume атакующего включён
//! 2. у цели есть `Destructible`
//! 3. цель помечена тегом "Destructible"
//! 4. цель не в grace window (ещё не получила удар в этом окне)
//!
//! Все четыре прошли → knockback impulse + урон. Любая не прошла → тихо пропускаем
//! (не каждый коллайдер разрушаемый). Урон никогда не наносится в обход проверок.

use bevy::prelude::*;

use super::hitbox::{Brawler, HitVolume, OverlapStay};
use crate::components::{ColliderTag, PhysicsBody, DESTRUCTIBLE_TAG};
use crate::config::SimulationConfig;
use crate::destruction::{apply_damage, Destructible, DestructibleDamaged};
use crate::timers::TimerQueue;

/// Горизонтальное направление от атакующего к цели (unit length или ZERO)
pub fn knockback_direction(attacker: Vec3, target: Vec3) -> Vec3 {
    let mut direction = target - attacker;
    direction.y = 0.0;
    direction.normalize_or_zero()
}

/// Система: OverlapStay → knockback + damage
pub fn resolve_hit_volume_overlaps(
    mut overlaps: EventReader<OverlapStay>,
    attackers: Query<(&Brawler, &HitVolume, &Transform)>,
    mut targets: Query<(
        &mut Destructible,
        &Transform,
        Option<&ColliderTag>,
        Option<&mut PhysicsBody>,
    )>,
    mut queue: ResMut<TimerQueue>,
    config: Res<SimulationConfig>,
    mut damaged: EventWriter<DestructibleDamaged>,
) {
    for overlap in overlaps.read() {
        if overlap.attacker == overlap.other {
            continue;
        }

        let Ok((brawler, hit_volume, attacker_transform)) = attackers.get(overlap.attacker) else {
            continue;
        };
        if !hit_volume.enabled {
            continue;
        }

        let Ok((mut destructible, target_transform, tag, body)) = targets.get_mut(overlap.other) else {
            continue;
        };
        if !tag.is_some_and(|tag| tag.is(DESTRUCTIBLE_TAG)) {
            continue;
        }
        if destructible.hit_grace_active {
            continue;
        }

        let direction = knockback_direction(attacker_transform.translation, target_transform.translation);
        if let Some(mut body) = body {
            body.apply_impulse(direction * brawler.knockback_force);
        }

        let outcome = apply_damage(
            overlap.other,
            &mut destructible,
            brawler.base_damage,
            &config.destruction,
            &mut queue,
        );

        damaged.write(DestructibleDamaged {
            entity: overlap.other,
            attacker: Some(overlap.attacker),
            outcome,
            remaining_health: destructible.health,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_direction_is_horizontal_unit() {
        let direction = knockback_direction(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 5.0, 4.0));

        assert_eq!(direction.y, 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!((direction - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_knockback_direction_degenerate() {
        // Цель прямо над атакующим → нет горизонтального направления
        let direction = knockback_direction(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(direction, Vec3::ZERO);
    }
}
