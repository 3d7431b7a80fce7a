//! Brawler Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: third-person контроллер + разрушаемые объекты.
//!
//! HEADLESS ARCHITECTURE:
//! - ECS = game rules (movement state machine, punch, damage, destruction)
//! - Хост = рендер, анимация, камера, настоящая физика (опционально)
//! - Обмен с хостом только через events и resources

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod destruction;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod shared;
pub mod timers;

// Re-export базовых компонентов для удобства
pub use combat::{Brawler, CombatPlugin, HitVolume, OverlapStay, PunchPressed, PunchStarted};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use destruction::{
    spawn_destructible_cube, DamageOutcome, Destructible, DestructibleBroken, DestructibleDamaged,
    DestructionPlugin, Fragment, FragmentsSpawned, Score, ShatterRequested,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::{
    spawn_player_character, CharacterMotion, GroundContact, MovementIntent, MovementPlugin,
    PlayerInputEvent, PlayerStateMachine, StateTransitioned, SubState, SuperState,
};
pub use physics::PhysicsPlugin;
pub use shared::{CameraShake, CameraShakePlugin, CameraShakeRequested};
pub use timers::{TimerAction, TimerFired, TimerPlugin, TimerQueue};

/// Порядок фаз внутри одного FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Созревшие таймеры → TimerFired
    Timers,
    /// Input events → intents
    Input,
    /// State machine + controller
    Movement,
    /// Punch, overlaps, knockback, damage
    Combat,
    /// Break → осколки, expire
    Destruction,
    /// PhysicsBody интеграция
    Physics,
    /// Camera shake
    Effects,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Timers,
                SimulationSet::Input,
                SimulationSet::Movement,
                SimulationSet::Combat,
                SimulationSet::Destruction,
                SimulationSet::Physics,
                SimulationSet::Effects,
            )
                .chain(),
        );

        app
            // Fixed timestep (таймеры считают в тиках этой частоты)
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(TimerQueue::new(config.fixed_hz))
            // Детерминистичный RNG (seed из конфига)
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(config)
            // Подсистемы
            .add_plugins((
                TimerPlugin,
                MovementPlugin,
                CombatPlugin,
                DestructionPlugin,
                PhysicsPlugin,
                CameraShakePlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (конфиг по умолчанию)
pub fn create_headless_app(seed: u64) -> App {
    let config = SimulationConfig {
        seed,
        ..default()
    };
    build_app(config)
}

/// Создаёт headless App из конфига. Невалидный конфиг - ошибка до первого тика.
pub fn try_create_app(config: SimulationConfig) -> Result<App, ConfigError> {
    config.validate()?;
    Ok(build_app(config))
}

fn build_app(config: SimulationConfig) -> App {
    init_logger();

    // Каждый app.update() = ровно один fixed тик (после первого, нулевого)
    let step = Duration::from_secs_f64(1.0 / config.fixed_hz);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .add_plugins(SimulationPlugin::new(config));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
