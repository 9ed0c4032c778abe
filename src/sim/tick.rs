//! Per-frame run controller
//!
//! Order inside a tick: player physics, wall push-out, hazards, items, pits,
//! goal, checkpoint. The first hazard (in level order) that touches the
//! player is the only one that hurts this tick.

use super::player::Intents;
use super::state::{FrameResult, GameEvent, RunPhase, RunState};
use crate::consts::*;

impl RunState {
    /// Advance the run by `dt` seconds
    pub fn advance(&mut self, dt: f32, intents: Intents) -> FrameResult {
        advance(self, dt, intents)
    }
}

/// Advance the run by `dt` seconds with the given movement intents
pub fn advance(state: &mut RunState, dt: f32, intents: Intents) -> FrameResult {
    if let Some(result) = state.final_result() {
        return result;
    }

    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid dt {dt}");
        0.0
    };
    // A zero step moves nothing; it only settles a timer that already ran out
    if dt == 0.0 {
        state.player.clear_expired_invincibility();
        return FrameResult::Continue;
    }
    state.elapsed += dt;

    let score_before = state.score;
    let lives_before = state.player.lives();

    // 1. Player physics
    state.player.update(dt, intents, &state.level);
    if intents.jump && state.player.vel.y == -JUMP_SPEED {
        state.events.push(GameEvent::Jumped);
    }

    // 2. Walls
    resolve_walls(state);

    // 3. Hazards
    for hazard in &mut state.level.hazards {
        hazard.update(dt, state.level.width, &mut state.rng);
    }
    let hb = state.player.hitbox();
    let hazard_hit = state
        .level
        .hazards
        .iter()
        .any(|h| h.collides_with(hb.x, hb.y, hb.w, hb.h));
    if hazard_hit {
        if let Some(result) = damage_or_lose(state) {
            return result;
        }
    }

    // 4. Items
    let hb = state.player.hitbox();
    let mut gained = 0u64;
    let events = &mut state.events;
    state.level.items.retain(|item| {
        if item.bounds().overlaps(&hb) {
            gained += u64::from(item.value);
            events.push(GameEvent::ItemCollected { value: item.value });
            log::debug!("Collected item worth {} at x={}", item.value, item.pos.x);
            false
        } else {
            true
        }
    });
    state.score += gained;

    // 5. Pits
    let hb = state.player.hitbox();
    if state.level.is_pit_at(hb.center().x) && hb.bottom() > state.level.ground_y {
        if let Some(result) = damage_or_lose(state) {
            return result;
        }
    }

    // 6. Goal
    let hb = state.player.hitbox();
    if hb.right() >= state.level.goal.x - GOAL_REACH_OFFSET {
        state.phase = RunPhase::Won;
        state.events.push(GameEvent::Won { score: state.score });
        log::info!("Run won with score {} after {:.1}s", state.score, state.elapsed);
        return FrameResult::Won(state.score);
    }

    // 7. Checkpoint
    if state.player.grounded && state.player.pos.x > state.checkpoint_x {
        state.checkpoint_x = state.player.pos.x;
        state.events.push(GameEvent::CheckpointAdvanced {
            x: state.checkpoint_x,
        });
    }

    if state.player.lives() < lives_before {
        FrameResult::LifeLost(state.score - score_before)
    } else {
        FrameResult::Continue
    }
}

/// Push the player out of the first overlapping wall, against its motion
fn resolve_walls(state: &mut RunState) {
    let player = &mut state.player;
    let Some(wall) = state.level.wall_hit(&player.hitbox()) else {
        return;
    };
    let offset = player.hitbox_offset_x();
    let hitbox_w = player.hitbox().w;
    if player.vel.x > 0.0 {
        player.pos.x = wall.left() - offset - hitbox_w;
    } else if player.vel.x < 0.0 {
        player.pos.x = wall.right() - offset;
    }
    player.vel.x = 0.0;
}

/// Hurt the player; ends the run on the last life, otherwise respawns
/// behind the checkpoint
fn damage_or_lose(state: &mut RunState) -> Option<FrameResult> {
    if state.player.take_damage() {
        let lives = state.player.lives();
        state.events.push(GameEvent::Damaged { lives });
        log::debug!("Player hurt at x={}, {} lives left", state.player.pos.x, lives);
    }

    if state.player.lives() == 0 {
        state.phase = RunPhase::Lost;
        state.events.push(GameEvent::Lost { score: state.score });
        log::info!("Run lost with score {} after {:.1}s", state.score, state.elapsed);
        return Some(FrameResult::Lost(state.score));
    }

    let x = (state.checkpoint_x - RESPAWN_BACKOFF).max(0.0);
    state.player.respawn_at(x, state.level.ground_y);
    state.events.push(GameEvent::Respawned { x });
    log::debug!("Respawned at x={x}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{Collectible, HazardSkin, Level, MovingHazard, Obstacle};
    use crate::sim::player::AnimState;
    use crate::tuning::Difficulty;
    use proptest::prelude::*;

    fn flat_run() -> RunState {
        RunState::with_level(Level::flat(3000.0), 99)
    }

    fn right() -> Intents {
        Intents {
            right: true,
            ..Intents::NONE
        }
    }

    fn hazard_on_player(state: &RunState) -> MovingHazard {
        let hb = state.player.hitbox();
        MovingHazard::on_ground(hb.x - 50.0, state.level.ground_y, HazardSkin::Sheep).unwrap()
    }

    #[test]
    fn test_hazard_on_last_life_loses_run() {
        let mut state = flat_run();
        state.player.set_lives(1);
        let hazard = hazard_on_player(&state);
        state.level.hazards.push(hazard);

        let result = state.advance(SIM_DT, Intents::NONE);
        assert_eq!(result, FrameResult::Lost(0));
        assert_eq!(state.phase, RunPhase::Lost);
        assert_eq!(state.player.lives(), 0);
    }

    #[test]
    fn test_reaching_goal_wins() {
        let mut state = flat_run();
        let goal_x = state.level.goal.x;
        let hb = state.player.hitbox();
        let to_right_edge = hb.right() - state.player.pos.x;
        state.player.pos.x = goal_x - 11.0 - to_right_edge;
        state.checkpoint_x = state.player.pos.x;

        // one tick covering exactly 20 units
        let result = state.advance(20.0 / RUN_SPEED, right());
        assert_eq!(result, FrameResult::Won(0));
        assert_eq!(state.phase, RunPhase::Won);
    }

    #[test]
    fn test_goal_not_reached_outside_offset() {
        let mut state = flat_run();
        let hb = state.player.hitbox();
        let to_right_edge = hb.right() - state.player.pos.x;
        state.player.pos.x = state.level.goal.x - 11.0 - to_right_edge;
        assert_eq!(state.advance(SIM_DT, Intents::NONE), FrameResult::Continue);
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_item_collected_once() {
        let mut state = flat_run();
        let hb = state.player.hitbox();
        state.level.items.push(Collectible::new(hb.x, hb.y, 10));

        state.advance(SIM_DT, Intents::NONE);
        assert_eq!(state.score, 10);
        assert!(state.level.items.is_empty());

        state.advance(SIM_DT, Intents::NONE);
        assert_eq!(state.score, 10);
        assert!(state
            .drain_events()
            .contains(&GameEvent::ItemCollected { value: 10 }));
    }

    #[test]
    fn test_pit_fall_costs_life_and_respawns() {
        let mut level = Level::flat(3000.0);
        level.obstacles.push(Obstacle::Hole { x: 1000.0, w: 150.0 });
        let mut state = RunState::with_level(level, 3);
        state.player.set_lives(2);
        state.checkpoint_x = 900.0;
        state.player.pos.x = 1050.0;
        state.player.pos.y = GROUND_Y - PLAYER_HEIGHT + 20.0;
        state.player.vel.y = 300.0;
        state.player.grounded = false;

        let result = state.advance(SIM_DT, Intents::NONE);
        assert_eq!(result, FrameResult::LifeLost(0));
        assert_eq!(state.player.lives(), 1);
        assert_eq!(state.player.pos.x, 800.0);
        assert_eq!(state.player.pos.y, GROUND_Y - PLAYER_HEIGHT);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(state.player.grounded);
        assert_eq!(state.checkpoint_x, 900.0);
    }

    #[test]
    fn test_respawn_never_left_of_zero() {
        let mut level = Level::flat(3000.0);
        level.obstacles.push(Obstacle::Hole { x: 100.0, w: 100.0 });
        let mut state = RunState::with_level(level, 3);
        state.checkpoint_x = 50.0;
        state.player.pos.x = 120.0;
        state.player.pos.y = GROUND_Y;
        state.player.grounded = false;

        state.advance(SIM_DT, Intents::NONE);
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_only_one_hazard_hurts_per_tick() {
        let mut state = flat_run();
        let hazard = hazard_on_player(&state);
        state.level.hazards.push(hazard.clone());
        state.level.hazards.push(hazard);

        let result = state.advance(SIM_DT, Intents::NONE);
        assert_eq!(result, FrameResult::LifeLost(0));
        assert_eq!(state.player.lives(), MAX_LIVES - 1);
    }

    #[test]
    fn test_hazard_while_invincible_keeps_lives() {
        let mut state = flat_run();
        state.player.take_damage();
        let hazard = hazard_on_player(&state);
        state.level.hazards.push(hazard);

        let result = state.advance(SIM_DT, Intents::NONE);
        assert_eq!(result, FrameResult::Continue);
        assert_eq!(state.player.lives(), MAX_LIVES - 1);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Respawned { .. })));
    }

    #[test]
    fn test_wall_blocks_running_player() {
        let mut state = flat_run();
        state.level.obstacles.push(Obstacle::Wall {
            x: 600.0,
            w: WALL_WIDTH,
            h: 80.0,
        });
        let wall = state.level.walls().next().unwrap().bounds(state.level.ground_y);
        let hb = state.player.hitbox();
        let to_right_edge = hb.right() - state.player.pos.x;
        state.player.pos.x = wall.left() - to_right_edge - 1.0;

        state.advance(SIM_DT, right());
        assert_eq!(state.player.vel.x, 0.0);
        assert!((state.player.hitbox().right() - wall.left()).abs() < 1e-3);
    }

    #[test]
    fn test_wall_blocks_from_the_right() {
        let mut state = flat_run();
        state.level.obstacles.push(Obstacle::Wall {
            x: 600.0,
            w: WALL_WIDTH,
            h: 80.0,
        });
        let wall = state.level.walls().next().unwrap().bounds(state.level.ground_y);
        state.player.pos.x = wall.right() - state.player.hitbox_offset_x() + 1.0;

        let left = Intents {
            left: true,
            ..Intents::NONE
        };
        state.advance(SIM_DT, left);
        assert_eq!(state.player.vel.x, 0.0);
        assert!((state.player.hitbox().left() - wall.right()).abs() < 1e-3);
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut state = RunState::new(Difficulty::Medium, 7).unwrap();
        let player = state.player.clone();
        let level = state.level.clone();
        let checkpoint = state.checkpoint_x;

        assert_eq!(state.advance(0.0, Intents::NONE), FrameResult::Continue);
        assert_eq!(state.player, player);
        assert_eq!(state.level, level);
        assert_eq!(state.checkpoint_x, checkpoint);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_zero_dt_after_moving_keeps_motion_state() {
        let mut state = flat_run();
        state.advance(SIM_DT, right());
        assert_eq!(state.player.anim_state(), AnimState::RunRight);

        let player = state.player.clone();
        let elapsed = state.elapsed;
        let events = state.events().len();
        assert_eq!(state.advance(0.0, Intents::NONE), FrameResult::Continue);
        assert_eq!(state.player, player);
        assert_eq!(state.player.vel.x, RUN_SPEED);
        assert_eq!(state.elapsed, elapsed);
        assert_eq!(state.events().len(), events);
    }

    #[test]
    fn test_invalid_dt_treated_as_zero() {
        let mut state = flat_run();
        let x = state.player.pos.x;
        state.advance(f32::NAN, right());
        state.advance(-1.0, right());
        assert_eq!(state.player.pos.x, x);
    }

    #[test]
    fn test_finished_run_is_frozen() {
        let mut state = flat_run();
        state.player.set_lives(1);
        let hazard = hazard_on_player(&state);
        state.level.hazards.push(hazard);
        state.advance(SIM_DT, Intents::NONE);
        let player = state.player.clone();

        for _ in 0..10 {
            assert_eq!(state.advance(SIM_DT, right()), FrameResult::Lost(0));
        }
        assert_eq!(state.player, player);
    }

    #[test]
    fn test_checkpoint_follows_grounded_progress() {
        let mut state = flat_run();
        for _ in 0..60 {
            state.advance(SIM_DT, right());
        }
        assert!((state.checkpoint_x - state.player.pos.x).abs() < 1e-3);
        assert!(state.checkpoint_x > SPAWN_X);

        let saved = state.checkpoint_x;
        let left = Intents {
            left: true,
            ..Intents::NONE
        };
        for _ in 0..30 {
            state.advance(SIM_DT, left);
        }
        assert_eq!(state.checkpoint_x, saved);
    }

    #[test]
    fn test_checkpoint_frozen_while_airborne() {
        let mut state = flat_run();
        let jump_right = Intents {
            right: true,
            jump: true,
            left: false,
        };
        state.advance(SIM_DT, jump_right);
        let at_takeoff = state.checkpoint_x;
        for _ in 0..20 {
            state.advance(SIM_DT, right());
            assert!(!state.player.grounded);
            assert_eq!(state.checkpoint_x, at_takeoff);
        }
        assert!(state
            .drain_events()
            .contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_same_seed_same_run() {
        let inputs = [right(), Intents::NONE, right(), Intents { jump: true, ..right() }];
        let mut a = RunState::new(Difficulty::Hard, 555).unwrap();
        let mut b = RunState::new(Difficulty::Hard, 555).unwrap();
        for _ in 0..300 {
            for input in inputs {
                assert_eq!(a.advance(SIM_DT, input), b.advance(SIM_DT, input));
            }
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.level, b.level);
        assert_eq!(a.score, b.score);
    }

    fn intents_strategy() -> impl Strategy<Value = Intents> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(left, right, jump)| Intents {
            left,
            right,
            jump,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn lives_and_checkpoint_invariants(
            seed in any::<u64>(),
            which in 0usize..3,
            steps in proptest::collection::vec((intents_strategy(), 0.0f32..0.05), 1..400),
        ) {
            let mut state = RunState::new(Difficulty::ALL[which], seed).unwrap();
            let mut checkpoint = state.checkpoint_x;
            for (intents, dt) in steps {
                let result = state.advance(dt, intents);
                prop_assert!(state.player.lives() <= MAX_LIVES);
                prop_assert!(state.checkpoint_x >= checkpoint);
                prop_assert!(state.player.invincibility_remaining() >= 0.0);
                checkpoint = state.checkpoint_x;
                if matches!(result, FrameResult::Lost(_)) {
                    prop_assert_eq!(state.player.lives(), 0);
                }
            }
        }
    }
}
