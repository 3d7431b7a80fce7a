//! Headless симуляция brawler
//!
//! Скриптованная демка без рендера: подойти к кубу, ударить, посмотреть на осколки.
//!
//! Использование: `brawler_simulation [config.ron]`

use bevy::prelude::*;
use brawler_simulation::{
    log_error, log_info, spawn_destructible_cube, spawn_player_character, try_create_app, Fragment,
    PlayerInputEvent, PlayerStateMachine, Score, SimulationConfig, SurfaceMaterial,
};

/// Одна фаза скрипта: input + сколько тиков его держать
struct ScriptStep {
    name: &'static str,
    input: PlayerInputEvent,
    ticks: u32,
}

fn script() -> Vec<ScriptStep> {
    let forward = Vec2::new(0.0, 1.0);
    vec![
        ScriptStep {
            name: "walk towards cube",
            input: PlayerInputEvent::new(forward, false, false),
            ticks: 30,
        },
        ScriptStep {
            name: "stop",
            input: PlayerInputEvent::default(),
            ticks: 10,
        },
        ScriptStep {
            name: "punch",
            input: PlayerInputEvent::new(Vec2::ZERO, false, true),
            ticks: 60,
        },
        ScriptStep {
            name: "run sideways",
            input: PlayerInputEvent::new(Vec2::new(1.0, 0.0), true, false),
            ticks: 60,
        },
        ScriptStep {
            name: "idle until debris expires",
            input: PlayerInputEvent::default(),
            ticks: 620,
        },
    ]
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Config error: {}", err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let combat = config.combat.clone();
    let mut app = match try_create_app(config) {
        Ok(app) => app,
        Err(err) => {
            log_error(&format!("Failed to create simulation: {}", err));
            std::process::exit(1);
        }
    };

    log_info("Starting brawler headless simulation");

    let world = app.world_mut();
    let (player, cube) = {
        let mut commands = world.commands();
        let player = spawn_player_character(&mut commands, Vec3::ZERO, &combat);
        let cube = spawn_destructible_cube(
            &mut commands,
            Vec3::new(0.0, 0.5, 3.0),
            Vec3::ONE,
            1.0,
            10,
            SurfaceMaterial::new("crate_wood"),
        );
        (player, cube)
    };
    world.flush();

    // Первый update: нулевой delta, fixed тик не запускается
    app.update();

    for step in script() {
        log_info(&format!("▶ {} ({} ticks)", step.name, step.ticks));
        app.world_mut().send_event(step.input);

        for _ in 0..step.ticks {
            app.update();
        }

        let world = app.world_mut();
        let fragments = world.query::<&Fragment>().iter(world).count();
        let position = world.get::<Transform>(player).map(|t| t.translation);
        let state = world.get::<PlayerStateMachine>(player).map(|m| m.sub_state());
        let cube_alive = world.get_entity(cube).is_ok();

        log_info(&format!(
            "  player {:?} state {:?} | cube alive: {} | fragments: {}",
            position, state, cube_alive, fragments
        ));
    }

    let score = app.world().resource::<Score>();
    log_info(&format!(
        "Simulation complete! score: {} ({} objects broken)",
        score.points, score.objects_broken
    ));
}
