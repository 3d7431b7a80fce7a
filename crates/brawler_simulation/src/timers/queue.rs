//! Timer queue keyed by absolute fixed tick.
//!
//! Replaces "wait N seconds then do X" callbacks. Every delayed effect
//! (grace window, hit volume disable, death delay, fragment lifetime) is a
//! `ScheduledTimer` owned by an entity. The queue is polled once per fixed
//! tick; timers whose owner is gone never fire.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy::prelude::*;

/// What happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TimerAction {
    /// Destructible может снова получать урон
    EndHitGrace,
    /// Destructible разрушается (осколки + удаление)
    Break,
    /// Hit volume атакующего выключается
    DisableHitVolume,
    /// Brawler снова может бить
    AttackRecovered,
    /// Осколок удаляется
    ExpireFragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTimer {
    due_tick: u64,
    seq: u64,
    owner: Entity,
    action: TimerAction,
}

// BinaryHeap - max-heap, инвертируем сравнение: раньше due_tick / seq = выше приоритет
impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_tick
            .cmp(&self.due_tick)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending timers plus the fixed tick counter.
///
/// Invariant: timers fire in `(due_tick, schedule order)` order, each at most once.
#[derive(Resource, Debug)]
pub struct TimerQueue {
    tick: u64,
    tick_hz: f64,
    next_seq: u64,
    pending: BinaryHeap<ScheduledTimer>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl TimerQueue {
    pub fn new(tick_hz: f64) -> Self {
        Self {
            tick: 0,
            tick_hz,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Текущий fixed tick
    pub fn now(&self) -> u64 {
        self.tick
    }

    pub fn tick_hz(&self) -> f64 {
        self.tick_hz
    }

    /// Seconds → ticks. Anything scheduled fires no earlier than the next tick.
    pub fn secs_to_ticks(&self, secs: f32) -> u64 {
        let ticks = (secs as f64 * self.tick_hz).round();
        if ticks.is_finite() && ticks > 1.0 {
            ticks as u64
        } else {
            1
        }
    }

    /// Schedule `action` for `owner` after `secs` seconds. Returns the due tick.
    pub fn schedule_after(&mut self, owner: Entity, secs: f32, action: TimerAction) -> u64 {
        let ticks = self.secs_to_ticks(secs);
        self.schedule_in_ticks(owner, ticks, action)
    }

    pub fn schedule_in_ticks(&mut self, owner: Entity, ticks: u64, action: TimerAction) -> u64 {
        let due_tick = self.tick + ticks.max(1);
        self.pending.push(ScheduledTimer {
            due_tick,
            seq: self.next_seq,
            owner,
            action,
        });
        self.next_seq += 1;
        due_tick
    }

    /// Drop every pending timer of `owner` (owner despawned). Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.owner != owner);
        before - self.pending.len()
    }

    /// Advance the clock by one fixed tick.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Pop every timer due at or before the current tick, in firing order.
    pub fn drain_due(&mut self) -> Vec<(Entity, TimerAction)> {
        let mut due = Vec::new();
        while let Some(next) = self.pending.peek() {
            if next.due_tick > self.tick {
                break;
            }
            if let Some(timer) = self.pending.pop() {
                due.push((timer.owner, timer.action));
            }
        }
        due
    }

    pub fn pending_for(&self, owner: Entity) -> usize {
        self.pending.iter().filter(|timer| timer.owner == owner).count()
    }

    pub fn has_pending(&self, owner: Entity, action: TimerAction) -> bool {
        self.pending
            .iter()
            .any(|timer| timer.owner == owner && timer.action == action)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
