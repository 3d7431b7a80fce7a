//! Destruction systems (FixedUpdate, после combat)

use bevy::prelude::*;

use super::destructible::{Destructible, DestructibleBroken, Score, ShatterRequested};
use super::fragments::{spawn_fragments, ExplosionParams, Fragment, FragmentsSpawned};
use crate::components::SurfaceMaterial;
use crate::config::SimulationConfig;
use crate::shared::CameraShakeRequested;
use crate::timers::{TimerAction, TimerFired, TimerQueue};

/// Система: EndHitGrace → grace window закончился
///
/// Работает в фазе Timers (сразу после fire_due_timers), чтобы resolver
/// в этом же тике уже видел снятый grace: окно ровно hit_grace секунд.
pub fn end_hit_grace_windows(
    mut fired: EventReader<TimerFired>,
    mut destructibles: Query<&mut Destructible>,
) {
    for timer in fired.read() {
        if timer.action != TimerAction::EndHitGrace {
            continue;
        }
        if let Ok(mut destructible) = destructibles.get_mut(timer.owner) {
            destructible.end_hit_grace();
        }
    }
}

/// Система: Break таймер → ShatterRequested
pub fn handle_break_timers(
    mut fired: EventReader<TimerFired>,
    destructibles: Query<(), With<Destructible>>,
    mut shatter: EventWriter<ShatterRequested>,
) {
    for timer in fired.read() {
        if timer.action == TimerAction::Break && destructibles.contains(timer.owner) {
            shatter.write(ShatterRequested { source: timer.owner });
        }
    }
}

/// Система: ShatterRequested → осколки + удаление источника
///
/// Порядок строгий: осколки спавнятся ДО despawn источника.
/// Повторный запрос (или запрос на уже удалённый объект) игнорируется.
pub fn shatter_destructibles(
    mut requests: EventReader<ShatterRequested>,
    mut destructibles: Query<(&mut Destructible, &Transform, Option<&SurfaceMaterial>)>,
    config: Res<SimulationConfig>,
    mut queue: ResMut<TimerQueue>,
    mut score: ResMut<Score>,
    mut commands: Commands,
    mut spawned: EventWriter<FragmentsSpawned>,
    mut broken: EventWriter<DestructibleBroken>,
    mut shake: EventWriter<CameraShakeRequested>,
) {
    let params = ExplosionParams::from(&config.destruction);

    for request in requests.read() {
        let Ok((mut destructible, transform, material)) = destructibles.get_mut(request.source) else {
            continue;
        };
        if destructible.shattered {
            continue;
        }

        destructible.shattered = true;
        // Лишние таймеры источника больше не нужны
        queue.cancel_owner(request.source);

        let fragments = spawn_fragments(&mut commands, &mut queue, transform, material, &params);
        spawned.write(FragmentsSpawned {
            source: request.source,
            count: fragments.len(),
        });

        shake.write(CameraShakeRequested {
            origin: transform.translation,
        });

        commands.entity(request.source).despawn();

        score.record_break(destructible.point_worth);
        broken.write(DestructibleBroken {
            entity: request.source,
            position: transform.translation,
            point_worth: destructible.point_worth,
            fragment_count: fragments.len(),
        });

        crate::logger::log_info(&format!(
            "💥 {:?} shattered into {} fragments (+{} points, total {})",
            request.source,
            fragments.len(),
            destructible.point_worth,
            score.points
        ));
    }
}

/// Система: время жизни осколков (bookkeeping, удаление - по таймеру)
pub fn tick_fragment_lifetimes(mut fragments: Query<&mut Fragment>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut fragment in fragments.iter_mut() {
        fragment.time_to_live = (fragment.time_to_live - delta).max(0.0);
    }
}

/// Система: ExpireFragment → despawn
pub fn expire_fragments(
    mut fired: EventReader<TimerFired>,
    fragments: Query<(), With<Fragment>>,
    mut commands: Commands,
) {
    for timer in fired.read() {
        if timer.action != TimerAction::ExpireFragment || !fragments.contains(timer.owner) {
            continue;
        }
        commands.entity(timer.owner).despawn();
    }
}
