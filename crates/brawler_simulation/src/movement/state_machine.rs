//! Hierarchical player movement state machine.
//!
//! Two levels:
//! - super state: `Grounded` (composite, owns the locomotion sub states)
//! - sub state: `Idle` / `Walk` / `Run`
//!
//! States are plain enum values: no allocation per tick, no per-entity
//! state objects. Sub state transitions come from a static table
//! (`SUB_STATE_TRANSITIONS`), evaluated top to bottom; the first matching row
//! wins and no match means "stay".
//!
//! **Always grounded:** `Grounded` has no outward transition. There is no
//! airborne super state yet, so the vertical component is handled by the
//! controller (`systems::apply_vertical_motion`), not by the state machine.

use bevy::prelude::*;

use super::components::{CharacterMotion, MovementIntent};
use crate::components::{AnimationFlag, AnimationFlags};
use crate::config::MovementConfig;

/// Composite (parent) state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum SuperState {
    #[default]
    Grounded,
}

/// Leaf locomotion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum SubState {
    #[default]
    Idle,
    Walk,
    Run,
}

impl SubState {
    pub const ALL: [SubState; 3] = [SubState::Idle, SubState::Walk, SubState::Run];
}

/// Shared mutable record every state reads and writes during a tick.
pub struct StateContext<'a> {
    pub intent: &'a MovementIntent,
    pub motion: &'a mut CharacterMotion,
    pub animation: &'a mut AnimationFlags,
    pub config: &'a MovementConfig,
}

/// One row of the sub state transition table.
struct TransitionRule {
    from: SubState,
    to: SubState,
    guard: fn(&MovementIntent) -> bool,
}

fn stopped(intent: &MovementIntent) -> bool {
    !intent.movement_pressed()
}

fn moving(intent: &MovementIntent) -> bool {
    intent.movement_pressed()
}

fn moving_and_running(intent: &MovementIntent) -> bool {
    intent.movement_pressed() && intent.run_held
}

fn moving_without_run(intent: &MovementIntent) -> bool {
    intent.movement_pressed() && !intent.run_held
}

// Порядок строк важен: для каждого `from` первая сработавшая строка побеждает
const SUB_STATE_TRANSITIONS: &[TransitionRule] = &[
    TransitionRule { from: SubState::Idle, to: SubState::Walk, guard: moving },
    TransitionRule { from: SubState::Walk, to: SubState::Idle, guard: stopped },
    TransitionRule { from: SubState::Walk, to: SubState::Run, guard: moving_and_running },
    TransitionRule { from: SubState::Run, to: SubState::Idle, guard: stopped },
    TransitionRule { from: SubState::Run, to: SubState::Walk, guard: moving_without_run },
];

impl SuperState {
    fn enter(self, _ctx: &mut StateContext) {}

    fn exit(self, _ctx: &mut StateContext) {}

    fn initial_sub_state(self) -> SubState {
        match self {
            SuperState::Grounded => SubState::Idle,
        }
    }

    /// Grounded never leaves (no airborne state).
    fn next(self, _intent: &MovementIntent) -> Option<SuperState> {
        match self {
            SuperState::Grounded => None,
        }
    }
}

impl SubState {
    /// Horizontal speed multiplier applied to the move axis.
    pub fn speed_multiplier(self, config: &MovementConfig) -> f32 {
        match self {
            SubState::Idle => 0.0,
            SubState::Walk => config.walk_multiplier,
            SubState::Run => config.run_multiplier,
        }
    }

    /// Evaluate the transition table. `None` = stay.
    pub fn next(self, intent: &MovementIntent) -> Option<SubState> {
        SUB_STATE_TRANSITIONS
            .iter()
            .find(|rule| rule.from == self && (rule.guard)(intent))
            .map(|rule| rule.to)
    }

    /// Writes both animation flags, so exactly one locomotion pose is active.
    pub fn enter(self, ctx: &mut StateContext) {
        let (walking, running) = match self {
            SubState::Idle => (false, false),
            SubState::Walk => (true, false),
            SubState::Run => (true, true),
        };
        ctx.animation.set(AnimationFlag::IsWalking, walking);
        ctx.animation.set(AnimationFlag::IsRunning, running);
    }

    pub fn exit(self, _ctx: &mut StateContext) {}

    /// Transition check first; only when staying, recompute horizontal movement.
    pub fn update(self, ctx: &mut StateContext) -> Option<SubState> {
        if let Some(next) = self.next(ctx.intent) {
            return Some(next);
        }

        let multiplier = self.speed_multiplier(ctx.config);
        ctx.motion.current_movement.x = ctx.intent.axis.x * multiplier;
        ctx.motion.current_movement.z = ctx.intent.axis.y * multiplier;
        None
    }
}

/// A sub state switch performed during `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SubState,
    pub to: SubState,
}

/// Per-entity state machine (exactly one active leaf at any time)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerStateMachine {
    super_state: SuperState,
    sub_state: SubState,
    initialized: bool,
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn super_state(&self) -> SuperState {
        self.super_state
    }

    pub fn sub_state(&self) -> SubState {
        self.sub_state
    }

    /// Grounded → Idle, entering down the hierarchy (parent first).
    pub fn initialize(&mut self, ctx: &mut StateContext) {
        self.super_state = SuperState::Grounded;
        self.super_state.enter(ctx);

        self.sub_state = self.super_state.initial_sub_state();
        self.sub_state.enter(ctx);

        self.initialized = true;
    }

    /// One fixed step. Returns the sub state switch, if any.
    ///
    /// Lazily initializes a machine that was never initialized.
    pub fn tick(&mut self, ctx: &mut StateContext) -> Option<StateTransition> {
        if !self.initialized {
            self.initialize(ctx);
        }

        if let Some(next_super) = self.super_state.next(ctx.intent) {
            self.switch_super_state(next_super, ctx);
        }

        let next = self.sub_state.update(ctx)?;
        Some(self.switch_sub_state(next, ctx))
    }

    fn switch_super_state(&mut self, next: SuperState, ctx: &mut StateContext) {
        self.sub_state.exit(ctx);
        self.super_state.exit(ctx);

        self.super_state = next;
        self.super_state.enter(ctx);
        self.sub_state = self.super_state.initial_sub_state();
        self.sub_state.enter(ctx);
    }

    fn switch_sub_state(&mut self, next: SubState, ctx: &mut StateContext) -> StateTransition {
        let from = self.sub_state;
        from.exit(ctx);
        self.sub_state = next;
        next.enter(ctx);
        StateTransition { from, to: next }
    }
}
