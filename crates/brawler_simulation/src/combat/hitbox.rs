//! Hit volume система для punch
//!
//! Архитектура:
//! - HitVolume живёт на атакующем (offset в local space, box half extents)
//! - PunchPressed → включаем volume + animation trigger (в одной системе)
//! - Через `active_duration` volume выключается таймером (не ждём анимацию)
//! - Пока включён: overlap "stay" события каждый тик → resolver

use bevy::prelude::*;

use crate::components::{AnimationTriggered, ColliderTag, ATTACK_TRIGGER};
use crate::config::CombatConfig;
use crate::timers::{TimerAction, TimerFired, TimerQueue};

/// Hit volume атаки (box перед персонажем)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HitVolume {
    pub enabled: bool,
    /// Сколько секунд volume включён после удара
    pub active_duration: f32,
    /// Центр volume в local space атакующего (forward = -Z)
    pub offset: Vec3,
    pub half_extents: Vec3,
}

impl Default for HitVolume {
    fn default() -> Self {
        Self {
            enabled: false,
            active_duration: 0.1,
            offset: Vec3::new(0.0, 1.0, -0.8),
            half_extents: Vec3::new(0.3, 0.3, 0.4),
        }
    }
}

impl HitVolume {
    pub fn with_duration(active_duration: f32) -> Self {
        Self {
            active_duration,
            ..default()
        }
    }

    /// Центр volume в world space
    pub fn world_center(&self, owner: &Transform) -> Vec3 {
        owner.translation + owner.rotation * self.offset
    }

    /// AABB overlap с box'ом (center, half_extents)
    pub fn overlaps(&self, owner: &Transform, center: Vec3, half_extents: Vec3) -> bool {
        let delta = (self.world_center(owner) - center).abs();
        let reach = self.half_extents + half_extents;
        delta.x <= reach.x && delta.y <= reach.y && delta.z <= reach.z
    }
}

/// Способность бить (punch)
///
/// `attacking` - блокировка повторного удара до окончания анимации.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(HitVolume, Transform)]
pub struct Brawler {
    pub base_damage: f32,
    pub knockback_force: f32,
    /// Сколько секунд после удара нельзя бить снова
    pub attack_recovery: f32,
    pub attacking: bool,
}

impl Default for Brawler {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl Brawler {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            base_damage: config.base_damage,
            knockback_force: config.knockback_force,
            attack_recovery: config.attack_recovery,
            attacking: false,
        }
    }

    pub fn can_punch(&self) -> bool {
        !self.attacking
    }
}

/// Событие: игрок (или AI хоста) нажал удар
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunchPressed {
    pub attacker: Entity,
}

/// Событие: удар начат, hit volume включён
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunchStarted {
    pub attacker: Entity,
}

/// Событие: hit volume атакующего пересекается с коллайдером (каждый тик пока пересекается)
///
/// Пишется `detect_hit_volume_overlaps` или напрямую физикой хоста.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapStay {
    pub attacker: Entity,
    pub other: Entity,
}

/// Система: PunchPressed → включить hit volume + animation trigger
///
/// Включение volume и триггер анимации - в одной системе, в одном тике.
pub fn start_punches(
    mut punches: EventReader<PunchPressed>,
    mut brawlers: Query<(&mut Brawler, &mut HitVolume)>,
    mut queue: ResMut<TimerQueue>,
    mut triggers: EventWriter<AnimationTriggered>,
    mut started: EventWriter<PunchStarted>,
) {
    for punch in punches.read() {
        let Ok((mut brawler, mut hit_volume)) = brawlers.get_mut(punch.attacker) else {
            crate::logger::log_warning(&format!(
                "PunchPressed: attacker {:?} has no Brawler",
                punch.attacker
            ));
            continue;
        };

        if !brawler.can_punch() {
            continue;
        }

        brawler.attacking = true;
        hit_volume.enabled = true;
        triggers.write(AnimationTriggered {
            entity: punch.attacker,
            trigger: ATTACK_TRIGGER,
        });

        queue.schedule_after(punch.attacker, hit_volume.active_duration, TimerAction::DisableHitVolume);
        queue.schedule_after(punch.attacker, brawler.attack_recovery, TimerAction::AttackRecovered);

        started.write(PunchStarted { attacker: punch.attacker });
        crate::logger::log(&format!("👊 {:?} punch started", punch.attacker));
    }
}

/// Система: hit volume disable / attack recovery по таймерам
pub fn handle_attack_timers(
    mut fired: EventReader<TimerFired>,
    mut brawlers: Query<(&mut Brawler, &mut HitVolume)>,
) {
    for timer in fired.read() {
        let Ok((mut brawler, mut hit_volume)) = brawlers.get_mut(timer.owner) else {
            continue;
        };

        match timer.action {
            TimerAction::DisableHitVolume => hit_volume.enabled = false,
            TimerAction::AttackRecovered => brawler.attacking = false,
            _ => {}
        }
    }
}

/// Система: headless overlap detection (AABB)
///
/// Коллайдер цели - unit cube, масштабированный Transform.scale.
/// Хост с настоящей физикой может не использовать эту систему и писать OverlapStay сам.
pub fn detect_hit_volume_overlaps(
    attackers: Query<(Entity, &HitVolume, &Transform)>,
    colliders: Query<(Entity, &Transform), With<ColliderTag>>,
    mut overlaps: EventWriter<OverlapStay>,
) {
    for (attacker, hit_volume, attacker_transform) in attackers.iter() {
        if !hit_volume.enabled {
            continue;
        }

        for (other, other_transform) in colliders.iter() {
            // Не бьем самого себя
            if other == attacker {
                continue;
            }

            let half_extents = other_transform.scale.abs() * 0.5;
            if hit_volume.overlaps(attacker_transform, other_transform.translation, half_extents) {
                overlaps.write(OverlapStay { attacker, other });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brawler_lock() {
        let mut brawler = Brawler::default();
        assert!(brawler.can_punch());

        brawler.attacking = true;
        assert!(!brawler.can_punch());
    }

    #[test]
    fn test_hit_volume_follows_owner_rotation() {
        let volume = HitVolume::default();
        let owner = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::PI));

        // Повернулись на 180° → forward теперь +Z
        let center = volume.world_center(&owner);
        assert!((center - Vec3::new(0.0, 1.0, 0.8)).length() < 1e-5, "center = {:?}", center);
    }

    #[test]
    fn test_hit_volume_overlap_detection() {
        let volume = HitVolume::default();
        let owner = Transform::IDENTITY;

        // Куб 1×1×1 перед персонажем
        assert!(volume.overlaps(&owner, Vec3::new(0.0, 1.0, -1.0), Vec3::splat(0.5)));
        // Куб за спиной
        assert!(!volume.overlaps(&owner, Vec3::new(0.0, 1.0, 2.0), Vec3::splat(0.5)));
        // Куб далеко сбоку
        assert!(!volume.overlaps(&owner, Vec3::new(3.0, 1.0, -1.0), Vec3::splat(0.5)));
    }
}
