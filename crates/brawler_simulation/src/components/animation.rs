//! Animation sink: флаги и триггеры для animation graph хоста
//!
//! ECS владеет значениями флагов, хост читает `AnimationFlagChanged`
//! и `AnimationTriggered` и выставляет параметры своего animator'а.

use bevy::prelude::*;

/// Булевы параметры animator'а, которыми управляет симуляция
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationFlag {
    IsWalking,
    IsRunning,
}

impl AnimationFlag {
    pub const ALL: [AnimationFlag; 2] = [AnimationFlag::IsWalking, AnimationFlag::IsRunning];

    /// Имя параметра в animator'е хоста
    pub fn name(&self) -> &'static str {
        match self {
            AnimationFlag::IsWalking => "isWalking",
            AnimationFlag::IsRunning => "isRunning",
        }
    }
}

/// Триггер атаки (одноразовый параметр animator'а)
pub const ATTACK_TRIGGER: &str = "isAttacking";

/// Текущие значения флагов персонажа
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimationFlags {
    pub is_walking: bool,
    pub is_running: bool,
}

impl AnimationFlags {
    pub fn get(&self, flag: AnimationFlag) -> bool {
        match flag {
            AnimationFlag::IsWalking => self.is_walking,
            AnimationFlag::IsRunning => self.is_running,
        }
    }

    pub fn set(&mut self, flag: AnimationFlag, value: bool) {
        match flag {
            AnimationFlag::IsWalking => self.is_walking = value,
            AnimationFlag::IsRunning => self.is_running = value,
        }
    }

    /// Флаги, значения которых отличаются от `previous`
    pub fn changed_since(&self, previous: &AnimationFlags) -> Vec<(AnimationFlag, bool)> {
        AnimationFlag::ALL
            .into_iter()
            .filter(|flag| self.get(*flag) != previous.get(*flag))
            .map(|flag| (flag, self.get(flag)))
            .collect()
    }
}

/// Событие: флаг animator'а изменился
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFlagChanged {
    pub entity: Entity,
    pub flag: AnimationFlag,
    pub value: bool,
}

/// Событие: одноразовый триггер animator'а (удар)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTriggered {
    pub entity: Entity,
    pub trigger: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_names_match_animator_parameters() {
        assert_eq!(AnimationFlag::IsWalking.name(), "isWalking");
        assert_eq!(AnimationFlag::IsRunning.name(), "isRunning");
    }

    #[test]
    fn test_changed_since_reports_only_diffs() {
        let before = AnimationFlags::default();
        let mut after = before;
        after.set(AnimationFlag::IsWalking, true);

        assert_eq!(after.changed_since(&before), vec![(AnimationFlag::IsWalking, true)]);
        assert!(after.changed_since(&after).is_empty());
    }
}
