//! Idle/demo mode - derives intents from the current run state
//!
//! Two players live here:
//! - [`autopilot`]: a stateless reflex. Runs right and jumps when a pit,
//!   wall or hazard reaches its take-off distance.
//! - [`Autopilot`]: plans ahead by playing candidate inputs on copies of the
//!   run and committing to the furthest path that takes no damage. The
//!   simulation is deterministic, so the committed inputs replay exactly.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use super::player::Intents;
use super::state::{GameEvent, RunState};
use crate::consts::*;

/// Time from take-off back down to the ground
const AIRTIME: f32 = 2.0 * JUMP_SPEED / GRAVITY;
/// Horizontal distance covered by a full running jump
const JUMP_REACH: f32 = RUN_SPEED * AIRTIME;
const HITBOX_WIDTH: f32 = PLAYER_WIDTH * HITBOX_SCALE;
/// The ground test uses the hitbox centre, so take off within three ticks
/// of running before the pit edge
const PIT_TAKEOFF: f32 = 3.0 * RUN_SPEED * SIM_DT;
/// Gap from hitbox front to a wall that puts the apex over it
const WALL_TAKEOFF: f32 = JUMP_REACH / 2.0 - HITBOX_WIDTH;
/// A hazard closes in at running speed plus its own drift
const HAZARD_CLOSING_SPEED: f32 = RUN_SPEED + HAZARD_SPEED;
/// Gap from hitbox front to a hazard that has it pass under the apex
const HAZARD_TAKEOFF: f32 = HAZARD_CLOSING_SPEED * AIRTIME / 2.0 - (HAZARD_WIDTH + HITBOX_WIDTH) / 2.0;
/// Landing closer than this to a pit edge counts as landing in it
const LANDING_MARGIN: f32 = 6.0;

/// Ticks each planned input is held for
const STEP_TICKS: usize = 6;
/// Planned steps per search (1.2 s ahead, about 450 units of hazard closing)
const SEARCH_STEPS: usize = 24;
/// Paths kept after each step
const BEAM_WIDTH: usize = 16;
/// Ticks of a found path played before searching again
const COMMIT_TICKS: usize = 72;
/// Grid used to merge near-identical positions in the beam
const MERGE_CELL: Vec2 = Vec2::new(12.0, 16.0);

const RUN: Intents = Intents {
    left: false,
    right: true,
    jump: false,
};
const RUN_JUMP: Intents = Intents {
    jump: true,
    ..RUN
};
const STAND: Intents = Intents::NONE;
const HOP: Intents = Intents {
    jump: true,
    ..Intents::NONE
};
const BACK: Intents = Intents {
    left: true,
    right: false,
    jump: false,
};

const GROUND_CHOICES: [Intents; 5] = [RUN, RUN_JUMP, STAND, HOP, BACK];
const AIR_CHOICES: [Intents; 3] = [RUN, STAND, BACK];

/// Intents the reflex player would press this tick
pub fn autopilot(state: &RunState) -> Intents {
    let player = &state.player;
    if !player.grounded || state.phase.is_over() {
        return RUN;
    }

    let hb = player.hitbox();
    let center = hb.center().x;
    let front = hb.right();
    let level = &state.level;

    let within = |gap: f32, takeoff: f32| (0.0..=takeoff).contains(&gap);
    let landing = center + JUMP_REACH;
    let lands_safely = !level
        .pits()
        .any(|p| landing >= p.x() - LANDING_MARGIN && landing <= p.right() + LANDING_MARGIN);

    let pit_edge = level.pits().any(|p| within(p.x() - center, PIT_TAKEOFF));
    let wall_due = level
        .walls()
        .map(|w| w.bounds(level.ground_y))
        .any(|b| within(b.left() - front, WALL_TAKEOFF));
    let hazard_due = level
        .hazards
        .iter()
        .any(|h| within(h.pos.x - front, HAZARD_TAKEOFF));

    Intents {
        jump: pit_edge || (lands_safely && (wall_due || hazard_due)),
        ..RUN
    }
}

/// One planned tick and where the player stood before it
#[derive(Debug, Clone, Copy)]
struct PlannedTick {
    from: Vec2,
    intents: Intents,
}

/// Candidate path during the search
#[derive(Debug, Clone)]
struct Branch {
    state: RunState,
    path: Vec<Intents>,
}

/// Demo player that looks ahead before committing to inputs
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    plan: VecDeque<PlannedTick>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents for the next tick of `state`.
    ///
    /// Follows the committed plan while the run matches it; searches again
    /// once the plan runs out or the run went elsewhere. Falls back to the
    /// reflex when every searched path takes damage.
    pub fn next_intents(&mut self, state: &RunState) -> Intents {
        if state.phase.is_over() {
            self.plan.clear();
            return Intents::NONE;
        }
        if self.plan.front().is_some_and(|t| t.from != state.player.pos) {
            log::debug!("Run left the plan at x={}, searching again", state.player.pos.x);
            self.plan.clear();
        }
        if self.plan.is_empty() {
            self.replan(state);
        }
        match self.plan.pop_front() {
            Some(tick) => tick.intents,
            None => autopilot(state),
        }
    }

    /// Ticks left before the next search
    pub fn planned_ticks(&self) -> usize {
        self.plan.len()
    }

    fn replan(&mut self, state: &RunState) {
        let Some(path) = search(state) else {
            return;
        };
        let mut replay = scratch_copy(state);
        for intents in path.into_iter().take(COMMIT_TICKS) {
            self.plan.push_back(PlannedTick {
                from: replay.player.pos,
                intents,
            });
            replay.advance(SIM_DT, intents);
        }
    }
}

/// Copy of `state` for look-ahead: full lives so damage always shows up as a
/// respawn, and an unreachable goal so copies never finish the run
fn scratch_copy(state: &RunState) -> RunState {
    let mut copy = state.clone();
    copy.events.clear();
    copy.player.set_lives(MAX_LIVES);
    copy.level.goal.x = f32::INFINITY;
    copy
}

/// Hold `intents` for `STEP_TICKS`. False if the player got hurt.
fn step_unhurt(state: &mut RunState, intents: Intents) -> bool {
    for _ in 0..STEP_TICKS {
        state.advance(SIM_DT, intents);
        if state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Respawned { .. } | GameEvent::Lost { .. }))
        {
            return false;
        }
        state.events.clear();
    }
    true
}

/// Beam search for the furthest path that takes no damage
fn search(state: &RunState) -> Option<Vec<Intents>> {
    let mut beam = vec![Branch {
        state: scratch_copy(state),
        path: Vec::new(),
    }];

    for _ in 0..SEARCH_STEPS {
        let mut next = Vec::with_capacity(beam.len() * GROUND_CHOICES.len());
        for branch in &beam {
            let choices: &[Intents] = if branch.state.player.grounded {
                &GROUND_CHOICES
            } else {
                &AIR_CHOICES
            };
            for &intents in choices {
                let mut state = branch.state.clone();
                if !step_unhurt(&mut state, intents) {
                    continue;
                }
                let mut path = Vec::with_capacity(branch.path.len() + STEP_TICKS);
                path.extend_from_slice(&branch.path);
                path.extend(std::iter::repeat_n(intents, STEP_TICKS));
                next.push(Branch { state, path });
            }
        }
        if next.is_empty() {
            break;
        }

        next.sort_by(|a, b| b.state.player.pos.x.total_cmp(&a.state.player.pos.x));
        let mut seen = HashSet::new();
        beam = next
            .into_iter()
            .filter(|b| {
                let cell = (b.state.player.pos / MERGE_CELL).floor().as_ivec2();
                seen.insert((cell.x, cell.y, b.state.player.grounded))
            })
            .take(BEAM_WIDTH)
            .collect();
    }

    beam.into_iter()
        .next()
        .map(|b| b.path)
        .filter(|path| !path.is_empty())
}
