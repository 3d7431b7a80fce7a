//! Scheduled timers (fixed-tick delayed effects)
//!
//! `fire_due_timers` запускается ПЕРВЫМ в каждом FixedUpdate:
//! - двигает tick counter
//! - вынимает созревшие таймеры
//! - отбрасывает таймеры удалённых entity
//! - пишет `TimerFired` события (читают combat / destruction системы)

use bevy::prelude::*;

pub mod queue;


pub use queue::{TimerAction, TimerQueue};

/// Событие: таймер сработал, владелец ещё существует
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub owner: Entity,
    pub action: TimerAction,
}

/// Система: tick + fire due timers
pub fn fire_due_timers(
    mut queue: ResMut<TimerQueue>,
    alive: Query<Entity>,
    mut fired: EventWriter<TimerFired>,
) {
    queue.advance();

    for (owner, action) in queue.drain_due() {
        if !alive.contains(owner) {
            crate::logger::log(&format!(
                "⏱️ Dropped {:?} timer: owner {:?} no longer exists",
                action, owner
            ));
            continue;
        }

        fired.write(TimerFired { owner, action });
    }
}

pub struct TimerPlugin;

impl Plugin for TimerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimerQueue>()
            .add_event::<TimerFired>()
            .add_systems(
                FixedUpdate,
                fire_due_timers.in_set(crate::SimulationSet::Timers),
            );
    }
}
