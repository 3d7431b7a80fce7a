//! Brawl integration test
//!
//! Player + разрушаемый куб, headless App, один update = один fixed тик.
//!
//! Проверяем:
//! - Idle → Walk → Run через App (флаги анимации, движение)
//! - Punch → damage → break → 512 осколков → удаление источника
//! - Knockback, grace window (ровно 6 тиков @ 60Hz), score, camera shake
//! - Разрушение ровно один раз и ровно через death delay
//! - Таймеры удалённых entity не срабатывают
//! - Осколки удаляются через ~10 секунд

use bevy::prelude::*;
use brawler_simulation::*;

/// Куб прямо перед игроком (forward = -Z), внутри hit volume
const CUBE_IN_REACH: Vec3 = Vec3::new(0.0, 0.5, -1.0);

/// Helper: App + warm-up update (первый update имеет нулевой delta)
fn create_brawl_app(config: SimulationConfig) -> App {
    let mut app = try_create_app(config).expect("valid config");
    app.update();
    app
}

/// Helper: spawn игрока в начале координат и куба перед ним
fn spawn_scene(app: &mut App, cube_health: f32) -> (Entity, Entity) {
    let combat = app.world().resource::<SimulationConfig>().combat.clone();
    let world = app.world_mut();

    let (player, cube) = {
        let mut commands = world.commands();
        let player = spawn_player_character(&mut commands, Vec3::ZERO, &combat);
        let cube = spawn_destructible_cube(
            &mut commands,
            CUBE_IN_REACH,
            Vec3::ONE,
            cube_health,
            10,
            SurfaceMaterial::new("crate_wood"),
        );
        (player, cube)
    };
    world.flush();

    (player, cube)
}

fn tick(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

fn send_input(app: &mut App, move_axis: Vec2, run: bool, punch: bool) {
    app.world_mut().send_event(PlayerInputEvent::new(move_axis, run, punch));
}

/// Журнал событий с номером fixed тика
#[derive(Resource, Default)]
struct EventLog {
    damaged: Vec<(u64, Entity, DamageOutcome)>,
    spawned: Vec<(u64, Entity, usize)>,
    fired: Vec<(u64, Entity, TimerAction)>,
}

fn record_events(
    mut log: ResMut<EventLog>,
    queue: Res<TimerQueue>,
    mut damaged: EventReader<DestructibleDamaged>,
    mut spawned: EventReader<FragmentsSpawned>,
    mut fired: EventReader<TimerFired>,
) {
    let now = queue.now();
    for event in damaged.read() {
        log.damaged.push((now, event.entity, event.outcome));
    }
    for event in spawned.read() {
        log.spawned.push((now, event.source, event.count));
    }
    for event in fired.read() {
        log.fired.push((now, event.owner, event.action));
    }
}

/// Helper: журнал пишется в конце каждого тика
fn install_event_log(app: &mut App) {
    app.init_resource::<EventLog>();
    app.add_systems(FixedUpdate, record_events.after(SimulationSet::Effects));
}

fn fragment_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Fragment>().iter(world).count()
}

#[test]
fn test_idle_walk_run_through_app() {
    let mut app = create_brawl_app(SimulationConfig::default());
    let (player, _cube) = spawn_scene(&mut app, 1.0);

    tick(&mut app, 1);
    let machine = app.world().get::<PlayerStateMachine>(player).unwrap();
    assert!(machine.is_initialized());
    assert_eq!(machine.sub_state(), SubState::Idle);

    // Вперёд (+Z), без бега
    send_input(&mut app, Vec2::new(0.0, 1.0), false, false);
    tick(&mut app, 1);

    let world = app.world();
    assert_eq!(world.get::<PlayerStateMachine>(player).unwrap().sub_state(), SubState::Walk);
    let flags = world.get::<AnimationFlags>(player).unwrap();
    assert!(flags.is_walking);
    assert!(!flags.is_running);

    tick(&mut app, 10);
    let motion = app.world().get::<CharacterMotion>(player).unwrap();
    assert!((motion.current_movement.z - 3.0).abs() < 1e-5);
    let transform = app.world().get::<Transform>(player).unwrap();
    assert!(transform.translation.z > 0.4, "z = {}", transform.translation.z);
    // Повернулись лицом к движению: forward (-Z) смотрит в +Z
    let forward = transform.rotation * Vec3::NEG_Z;
    assert!(forward.z > 0.9, "forward = {:?}", forward);

    // Бег зажат → Run (оба флага)
    send_input(&mut app, Vec2::new(0.0, 1.0), true, false);
    tick(&mut app, 2);
    let world = app.world();
    assert_eq!(world.get::<PlayerStateMachine>(player).unwrap().sub_state(), SubState::Run);
    let flags = world.get::<AnimationFlags>(player).unwrap();
    assert!(flags.is_walking && flags.is_running);
    assert!((world.get::<CharacterMotion>(player).unwrap().current_movement.z - 8.0).abs() < 1e-5);

    // Отпустили всё → Walk → Idle
    send_input(&mut app, Vec2::ZERO, false, false);
    tick(&mut app, 3);
    let world = app.world();
    assert_eq!(world.get::<PlayerStateMachine>(player).unwrap().sub_state(), SubState::Idle);
    let flags = world.get::<AnimationFlags>(player).unwrap();
    assert!(!flags.is_walking && !flags.is_running);
}

#[test]
fn test_punch_breaks_cube_into_fragments() {
    let mut app = create_brawl_app(SimulationConfig::default());
    let (player, cube) = spawn_scene(&mut app, 1.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 1);

    // Смертельный удар: health 0, break через 0.1s
    let destructible = app.world().get::<Destructible>(cube).unwrap();
    assert!(destructible.health <= 0.0);
    assert!(destructible.hit_grace_active);
    assert!(app.world().get::<Brawler>(player).unwrap().attacking);

    tick(&mut app, 3);
    assert!(app.world().get_entity(cube).is_ok(), "break must wait for death delay");
    assert_eq!(fragment_count(&mut app), 0);

    tick(&mut app, 6);
    assert!(app.world().get_entity(cube).is_err(), "source must be removed");
    assert_eq!(fragment_count(&mut app), 512);

    let score = app.world().resource::<Score>();
    assert_eq!(score.points, 10);
    assert_eq!(score.objects_broken, 1);

    // Материал скопирован с источника
    let world = app.world_mut();
    let mut materials = world.query_filtered::<&SurfaceMaterial, With<Fragment>>();
    assert!(materials.iter(world).all(|material| material.name == "crate_wood"));

    assert!(app.world().resource::<CameraShake>().is_active());
}

#[test]
fn test_knockback_pushes_cube_away() {
    let mut app = create_brawl_app(SimulationConfig::default());
    let (_player, cube) = spawn_scene(&mut app, 3.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 1);

    let body = app.world().get::<PhysicsBody>(cube).unwrap();
    // Игрок в начале координат, куб на -Z → толкаем в -Z
    assert!(body.velocity.z < 0.0, "velocity = {:?}", body.velocity);
    assert!(body.velocity.x.abs() < 1e-5);
    assert_eq!(body.velocity.y, 0.0);

    let transform = app.world().get::<Transform>(cube).unwrap();
    assert!(transform.translation.z < CUBE_IN_REACH.z);
}

#[test]
fn test_grace_window_prevents_double_damage() {
    // Без knockback куб остаётся в зоне удара
    let mut config = SimulationConfig::default();
    config.combat.knockback_force = 0.0;

    let mut app = create_brawl_app(config);
    let (_player, cube) = spawn_scene(&mut app, 3.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 20);

    // Volume был включён 6 тиков, но урон прошёл один раз
    assert_eq!(app.world().get::<Destructible>(cube).unwrap().health, 2.0);
    assert!(!app.world().get::<Destructible>(cube).unwrap().hit_grace_active);

    // После recovery (0.5s) второй удар снова наносит урон
    tick(&mut app, 20);
    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 2);
    assert_eq!(app.world().get::<Destructible>(cube).unwrap().health, 1.0);
}

#[test]
fn test_punch_ignored_while_attacking() {
    let mut config = SimulationConfig::default();
    config.combat.knockback_force = 0.0;

    let mut app = create_brawl_app(config);
    let (_player, cube) = spawn_scene(&mut app, 3.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 10);

    // Ещё в recovery (0.5s) → удар игнорируется
    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 5);

    assert_eq!(app.world().get::<Destructible>(cube).unwrap().health, 2.0);
}

#[test]
fn test_fragments_expire_after_lifetime() {
    let mut app = create_brawl_app(SimulationConfig::default());
    let (_player, cube) = spawn_scene(&mut app, 1.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 10);
    assert!(app.world().get_entity(cube).is_err());
    assert_eq!(fragment_count(&mut app), 512);

    // 10s @ 60Hz = 600 тиков от break
    tick(&mut app, 580);
    assert_eq!(fragment_count(&mut app), 512);

    tick(&mut app, 40);
    assert_eq!(fragment_count(&mut app), 0);
    assert!(app.world().resource::<TimerQueue>().is_empty());
}

#[test]
fn test_fragments_fall_and_rest_on_ground() {
    let mut app = create_brawl_app(SimulationConfig::default());
    spawn_scene(&mut app, 1.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 300);

    let world = app.world_mut();
    let mut fragments = world.query_filtered::<&Transform, With<Fragment>>();
    for transform in fragments.iter(world) {
        let bottom = transform.translation.y - transform.scale.y * 0.5;
        assert!(bottom >= physics::GROUND_HEIGHT - 1e-4, "fragment below ground: {:?}", transform);
    }
}

#[test]
fn test_invalid_config_rejected_at_build() {
    let mut config = SimulationConfig::default();
    config.destruction.grid_size = 0;

    assert!(matches!(try_create_app(config), Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_grace_window_is_exactly_six_ticks() {
    // Volume включён 0.5s, без knockback: куб всё время в зоне удара
    let mut config = SimulationConfig::default();
    config.combat.knockback_force = 0.0;
    config.combat.punch_duration = 0.5;

    let mut app = create_brawl_app(config);
    install_event_log(&mut app);
    let (_player, cube) = spawn_scene(&mut app, 10.0);

    send_input(&mut app, Vec2::ZERO, false, true);

    let mut health = Vec::new();
    for _ in 0..14 {
        tick(&mut app, 1);
        health.push(app.world().get::<Destructible>(cube).unwrap().health);
    }

    // 0.1s @ 60Hz = 6 тиков между ударами
    let mut expected = vec![9.0; 6];
    expected.extend([8.0; 6]);
    expected.extend([7.0; 2]);
    assert_eq!(health, expected);

    let log = app.world().resource::<EventLog>();
    let hit_ticks: Vec<u64> = log.damaged.iter().map(|(tick, _, _)| *tick).collect();
    assert_eq!(hit_ticks, vec![1, 7, 13]);
    // Удары в grace window события не порождают
    assert!(log
        .damaged
        .iter()
        .all(|(_, entity, outcome)| *entity == cube && *outcome == DamageOutcome::Damaged));
}

#[test]
fn test_lethal_hit_shatters_once_after_death_delay() {
    let mut app = create_brawl_app(SimulationConfig::default());
    install_event_log(&mut app);
    let (_player, cube) = spawn_scene(&mut app, 1.0);

    send_input(&mut app, Vec2::ZERO, false, true);
    tick(&mut app, 20);

    let log = app.world().resource::<EventLog>();
    assert_eq!(log.damaged, vec![(1, cube, DamageOutcome::Lethal)]);
    // death delay 0.1s = 6 тиков после удара
    assert_eq!(log.spawned, vec![(7, cube, 512)]);
}

#[test]
fn test_repeated_shatter_requests_spawn_once() {
    let mut app = create_brawl_app(SimulationConfig::default());
    install_event_log(&mut app);
    let (_player, cube) = spawn_scene(&mut app, 1.0);

    for _ in 0..3 {
        app.world_mut().send_event(ShatterRequested { source: cube });
    }
    tick(&mut app, 1);
    assert!(app.world().get_entity(cube).is_err());

    // Запрос на уже удалённый источник игнорируется
    app.world_mut().send_event(ShatterRequested { source: cube });
    tick(&mut app, 2);

    assert_eq!(app.world().resource::<EventLog>().spawned, vec![(1, cube, 512)]);
    assert_eq!(fragment_count(&mut app), 512);
    assert_eq!(app.world().resource::<Score>().objects_broken, 1);
}

#[test]
fn test_timers_of_despawned_owner_never_fire() {
    let mut app = create_brawl_app(SimulationConfig::default());
    install_event_log(&mut app);

    let survivor = app.world_mut().spawn(Transform::default()).id();
    let doomed = app.world_mut().spawn(Transform::default()).id();
    {
        let mut queue = app.world_mut().resource_mut::<TimerQueue>();
        queue.schedule_after(survivor, 0.1, TimerAction::EndHitGrace);
        queue.schedule_after(doomed, 0.1, TimerAction::EndHitGrace);
        queue.schedule_after(doomed, 0.2, TimerAction::Break);
    }
    app.world_mut().despawn(doomed);

    tick(&mut app, 20);

    let log = app.world().resource::<EventLog>();
    assert_eq!(log.fired, vec![(6, survivor, TimerAction::EndHitGrace)]);
    assert!(app.world().resource::<TimerQueue>().is_empty());
}
