//! Damageable entity: health + hit grace window + scheduled break

use bevy::prelude::*;

use crate::components::PhysicsBody;
use crate::config::DestructionConfig;
use crate::timers::{TimerAction, TimerQueue};

/// Разрушаемый объект
///
/// Инварианты:
/// - пока `hit_grace_active`, `take_damage` ничего не делает
/// - после смертельного удара grace не сбрасывается (повторный break невозможен)
/// - `shattered` выставляется один раз, перед спавном осколков
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, PhysicsBody)]
pub struct Destructible {
    pub health: f32,
    pub hit_grace_active: bool,
    /// Очки за разрушение (только bookkeeping → Score)
    pub point_worth: i32,
    pub shattered: bool,
}

impl Default for Destructible {
    fn default() -> Self {
        Self::new(1.0, 0)
    }
}

/// Результат одного вызова take_damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageOutcome {
    /// Grace window - удар проигнорирован
    Ignored,
    Damaged,
    /// health <= 0 - разрушение запланировано
    Lethal,
}

impl Destructible {
    pub fn new(health: f32, point_worth: i32) -> Self {
        Self {
            health,
            hit_grace_active: false,
            point_worth,
            shattered: false,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.health <= 0.0
    }

    /// Урон, зажатый в [0, 1]. Grace flag ставится до проверки health.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.hit_grace_active {
            return DamageOutcome::Ignored;
        }

        self.hit_grace_active = true;

        let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
        self.health -= amount;

        if self.health <= 0.0 {
            DamageOutcome::Lethal
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Конец grace window (не действует на уже разрушаемый объект)
    pub fn end_hit_grace(&mut self) {
        if !self.is_broken() && !self.shattered {
            self.hit_grace_active = false;
        }
    }
}

/// take_damage + планирование таймеров (grace reset / break)
pub fn apply_damage(
    entity: Entity,
    destructible: &mut Destructible,
    amount: f32,
    config: &DestructionConfig,
    queue: &mut TimerQueue,
) -> DamageOutcome {
    let outcome = destructible.take_damage(amount);

    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Damaged => {
            queue.schedule_after(entity, config.hit_grace, TimerAction::EndHitGrace);
        }
        DamageOutcome::Lethal => {
            let due = queue.schedule_after(entity, config.death_delay, TimerAction::Break);
            crate::logger::log(&format!(
                "💀 {:?} health depleted, break scheduled at tick {}",
                entity, due
            ));
        }
    }

    outcome
}

/// Событие: удар прошёл все проверки resolver'а и нанёс урон
///
/// `outcome` - Damaged или Lethal. Удары в grace window отсекаются до урона
/// и события не порождают.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DestructibleDamaged {
    pub entity: Entity,
    pub attacker: Option<Entity>,
    pub outcome: DamageOutcome,
    pub remaining_health: f32,
}

/// Событие: запрос на разрушение (таймер Break или хост напрямую)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShatterRequested {
    pub source: Entity,
}

/// Событие: объект разрушен, осколки заспавнены, источник удаляется
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DestructibleBroken {
    pub entity: Entity,
    pub position: Vec3,
    pub point_worth: i32,
    pub fragment_count: usize,
}

/// Очки за разрушенные объекты
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub points: i64,
    pub objects_broken: u32,
}

impl Score {
    pub fn record_break(&mut self, point_worth: i32) {
        self.points += point_worth as i64;
        self.objects_broken += 1;
    }
}
