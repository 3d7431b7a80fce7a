//! Simulation configuration (RON + serde defaults)
//!
//! Все тюнинг-параметры в одном Resource. Отсутствующие в RON поля
//! берутся из `Default`, так что конфиг может быть частичным:
//!
//! ```ron
//! (
//!     fixed_hz: 50.0,
//!     destruction: (grid_size: 4),
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Ошибка конфигурации - фатальна при сборке App, никогда не возникает во время тика
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Параметры движения персонажа (state machine + controller)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Скорость ходьбы = axis × walk_multiplier (m/s)
    pub walk_multiplier: f32,
    /// Скорость бега = axis × run_multiplier (m/s)
    pub run_multiplier: f32,
    /// Скорость поворота к направлению движения (slerp factor per second)
    pub rotation_factor: f32,
    /// Вертикальная скорость на земле (прижимает контроллер к полу)
    pub grounded_gravity: f32,
    /// Гравитация в воздухе (m/s²)
    pub gravity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_multiplier: 3.0,
            run_multiplier: 8.0,
            rotation_factor: 15.0,
            grounded_gravity: -0.05,
            gravity: -9.8,
        }
    }
}

/// Параметры удара (punch) и knockback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub base_damage: f32,
    pub knockback_force: f32,
    /// Сколько секунд hit volume остаётся включённым после удара
    pub punch_duration: f32,
    /// Блокировка повторного удара (пока играет анимация)
    pub attack_recovery: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_damage: 1.0,
            knockback_force: 5.0,
            punch_duration: 0.1,
            attack_recovery: 0.5,
        }
    }
}

/// Параметры разрушения и осколков
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestructionConfig {
    /// Осколков на ось (итого grid_size³)
    pub grid_size: u32,
    /// Импульс взрыва в центре (N·s), линейно падает до 0 на explosion_radius
    pub explosion_force: f32,
    pub explosion_radius: f32,
    pub fragment_mass: f32,
    /// Время жизни осколка (секунды)
    pub fragment_lifetime: f32,
    /// Окно неуязвимости после урона (секунды)
    pub hit_grace: f32,
    /// Задержка между смертельным ударом и разрушением (секунды)
    pub death_delay: f32,
}

impl Default for DestructionConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            explosion_force: 6.0,
            explosion_radius: 2.0,
            fragment_mass: 1.0,
            fragment_lifetime: 10.0,
            hit_grace: 0.1,
            death_delay: 0.1,
        }
    }
}

/// Camera shake после разрушения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraShakeConfig {
    pub duration: f32,
    pub amplitude: f32,
}

impl Default for CameraShakeConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            amplitude: 1.0,
        }
    }
}

/// Корневой конфиг симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (тиков в секунду)
    pub fixed_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    pub movement: MovementConfig,
    pub combat: CombatConfig,
    pub destruction: DestructionConfig,
    pub camera_shake: CameraShakeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            seed: 42,
            movement: MovementConfig::default(),
            combat: CombatConfig::default(),
            destruction: DestructionConfig::default(),
            camera_shake: CameraShakeConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse из RON строки (без валидации)
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Загрузить RON файл и провалидировать
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_ron_str(&content)?;
        config.validate()?;

        crate::logger::log_info(&format!("⚙️ Loaded simulation config from {}", path.display()));
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Проверка инвариантов. Вызывается до создания App.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(invalid("fixed_hz", format!("must be > 0, got {}", self.fixed_hz)));
        }

        let m = &self.movement;
        require_non_negative("movement.walk_multiplier", m.walk_multiplier)?;
        require_non_negative("movement.run_multiplier", m.run_multiplier)?;
        require_non_negative("movement.rotation_factor", m.rotation_factor)?;

        let c = &self.combat;
        require_non_negative("combat.base_damage", c.base_damage)?;
        require_non_negative("combat.knockback_force", c.knockback_force)?;
        require_non_negative("combat.punch_duration", c.punch_duration)?;
        require_non_negative("combat.attack_recovery", c.attack_recovery)?;
        // DisableHitVolume прошлого удара не должен выключить volume следующего
        if c.attack_recovery < c.punch_duration {
            return Err(invalid(
                "combat.attack_recovery",
                format!(
                    "must be >= combat.punch_duration ({}), got {}",
                    c.punch_duration, c.attack_recovery
                ),
            ));
        }

        let d = &self.destruction;
        if d.grid_size == 0 {
            return Err(invalid("destruction.grid_size", "must be at least 1".to_string()));
        }
        if !(d.fragment_mass > 0.0) {
            return Err(invalid("destruction.fragment_mass", format!("must be > 0, got {}", d.fragment_mass)));
        }
        require_non_negative("destruction.explosion_force", d.explosion_force)?;
        require_non_negative("destruction.explosion_radius", d.explosion_radius)?;
        require_non_negative("destruction.fragment_lifetime", d.fragment_lifetime)?;
        require_non_negative("destruction.hit_grace", d.hit_grace)?;
        require_non_negative("destruction.death_delay", d.death_delay)?;

        require_non_negative("camera_shake.duration", self.camera_shake.duration)?;
        require_non_negative("camera_shake.amplitude", self.camera_shake.amplitude)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a finite non-negative number, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.destruction.grid_size, 8);
        assert_eq!(config.movement.walk_multiplier, 3.0);
        assert_eq!(config.movement.run_multiplier, 8.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = SimulationConfig::from_ron_str("(fixed_hz: 30.0, destruction: (grid_size: 4))")
            .expect("partial config should parse");

        assert_eq!(config.fixed_hz, 30.0);
        assert_eq!(config.destruction.grid_size, 4);
        // Не указанные поля - из Default
        assert_eq!(config.destruction.fragment_lifetime, 10.0);
        assert_eq!(config.combat, CombatConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = SimulationConfig::default();
        config.combat.knockback_force = 12.5;

        let text = config.to_ron_string().expect("serialize");
        let parsed = SimulationConfig::from_ron_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = SimulationConfig::from_ron_str("(fixed_hz: \"fast\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_grid_size_rejected() {
        let mut config = SimulationConfig::default();
        config.destruction.grid_size = 0;

        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "destruction.grid_size"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_tick_rate_rejected() {
        let mut config = SimulationConfig::default();
        config.fixed_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recovery_shorter_than_punch_rejected() {
        let mut config = SimulationConfig::default();
        config.combat.punch_duration = 0.5;
        config.combat.attack_recovery = 0.2;

        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "combat.attack_recovery"),
            other => panic!("expected Invalid, got {:?}", other),
        }

        // Равные значения допустимы
        config.combat.attack_recovery = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load("definitely/not/here.ron");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
