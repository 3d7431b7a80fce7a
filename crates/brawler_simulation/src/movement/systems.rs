//! Movement systems (FixedUpdate).
//!
//! Порядок внутри тика:
//! 1. apply_player_input - PlayerInputEvent → MovementIntent (+ PunchPressed)
//! 2. apply_ground_contacts - GroundContact → CharacterMotion.grounded
//! 3. tick_state_machines - transitions + animation flags + horizontal movement
//! 4. face_movement_direction - поворот к направлению движения
//! 5. apply_vertical_motion - grounded gravity / gravity
//! 6. apply_character_movement - Transform += current_movement × dt

use bevy::prelude::*;

use super::components::{CharacterMotion, MovementIntent};
use super::events::{GroundContact, PlayerInputEvent, StateTransitioned};
use super::state_machine::{PlayerStateMachine, StateContext};
use crate::combat::PunchPressed;
use crate::components::{AnimationFlagChanged, AnimationFlags, Player};
use crate::config::SimulationConfig;

/// Yaw (вокруг Y), при котором forward (-Z) смотрит вдоль `direction` (XZ).
pub fn yaw_towards(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// Система: input → MovementIntent для всех Player entity
pub fn apply_player_input(
    mut input_events: EventReader<PlayerInputEvent>,
    mut players: Query<(Entity, &mut MovementIntent), With<Player>>,
    mut punches: EventWriter<PunchPressed>,
) {
    for input in input_events.read() {
        for (entity, mut intent) in players.iter_mut() {
            intent.axis = input.move_axis;
            intent.run_held = input.run;

            if input.punch {
                punches.write(PunchPressed { attacker: entity });
            }
        }
    }
}

/// Система: collision enter/exit с полом → grounded flag
pub fn apply_ground_contacts(
    mut contacts: EventReader<GroundContact>,
    mut motions: Query<&mut CharacterMotion>,
) {
    for contact in contacts.read() {
        let Ok(mut motion) = motions.get_mut(contact.entity) else {
            continue;
        };
        motion.grounded = contact.grounded;
    }
}

/// Система: один тик state machine для каждого персонажа
///
/// Пишет StateTransitioned и AnimationFlagChanged для хоста.
pub fn tick_state_machines(
    mut characters: Query<(
        Entity,
        &mut PlayerStateMachine,
        &MovementIntent,
        &mut CharacterMotion,
        &mut AnimationFlags,
    )>,
    config: Res<SimulationConfig>,
    mut transitions: EventWriter<StateTransitioned>,
    mut flag_changes: EventWriter<AnimationFlagChanged>,
) {
    for (entity, mut machine, intent, mut motion, mut flags) in characters.iter_mut() {
        let flags_before = *flags;

        let transition = {
            let mut ctx = StateContext {
                intent,
                motion: &mut *motion,
                animation: &mut *flags,
                config: &config.movement,
            };
            machine.tick(&mut ctx)
        };

        if let Some(transition) = transition {
            crate::logger::log(&format!(
                "🏃 {:?}: {:?} → {:?}",
                entity, transition.from, transition.to
            ));
            transitions.write(StateTransitioned {
                entity,
                from: transition.from,
                to: transition.to,
            });
        }

        for (flag, value) in flags.changed_since(&flags_before) {
            flag_changes.write(AnimationFlagChanged { entity, flag, value });
        }
    }
}

/// Система: плавный поворот к направлению движения (только пока есть input)
pub fn face_movement_direction(
    mut characters: Query<(&MovementIntent, &CharacterMotion, &mut Transform)>,
    config: Res<SimulationConfig>,
    time: Res<Time<Fixed>>,
) {
    let t = (config.movement.rotation_factor * time.delta_secs()).clamp(0.0, 1.0);

    for (intent, motion, mut transform) in characters.iter_mut() {
        if !intent.movement_pressed() {
            continue;
        }
        let Some(target) = yaw_towards(motion.horizontal()) else {
            continue;
        };
        transform.rotation = transform.rotation.slerp(target, t);
    }
}

/// Система: вертикальная компонента движения
///
/// На земле - маленькая постоянная скорость вниз (прижимает к полу),
/// в воздухе - накапливаем гравитацию.
pub fn apply_vertical_motion(
    mut characters: Query<&mut CharacterMotion>,
    config: Res<SimulationConfig>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut motion in characters.iter_mut() {
        if motion.grounded {
            motion.current_movement.y = config.movement.grounded_gravity;
        } else {
            motion.current_movement.y += config.movement.gravity * delta;
        }
    }
}

/// Система: Transform += current_movement × dt
///
/// Headless режим без пола: на земле вниз не смещаемся
/// (grounded gravity предназначена для collide-and-slide хоста).
pub fn apply_character_movement(
    mut characters: Query<(&CharacterMotion, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (motion, mut transform) in characters.iter_mut() {
        let mut step = motion.current_movement * delta;
        if motion.grounded {
            step.y = step.y.max(0.0);
        }
        transform.translation += step;
    }
}
