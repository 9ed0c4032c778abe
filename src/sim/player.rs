//! Player physics and life state
//!
//! Arcade movement: horizontal velocity is a direct function of input,
//! gravity integrates vertically, the ground line stops the fall except over
//! pits. Collision queries always use the centered hitbox.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::geometry::{Rect, is_valid_size};
use super::level::Level;
use crate::consts::*;

/// Animation state exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    RunLeft,
    RunRight,
    Jump,
}

/// Movement intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl Intents {
    pub const NONE: Intents = Intents {
        left: false,
        right: false,
        jump: false,
    };

    /// -1, 0 or +1; both directions at once cancel out
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the visual box
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual size
    pub size: Vec2,
    pub grounded: bool,
    lives: u8,
    invincible: bool,
    /// Seconds of invincibility left
    invincibility_timer: f32,
    blink_timer: f32,
    visible: bool,
    anim: AnimState,
}

impl Player {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Self, SimError> {
        if !is_valid_size(w, h) {
            return Err(SimError::InvalidSize {
                entity: "player",
                w,
                h,
            });
        }
        Ok(Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
            grounded: false,
            lives: MAX_LIVES,
            invincible: false,
            invincibility_timer: 0.0,
            blink_timer: 0.0,
            visible: true,
            anim: AnimState::Idle,
        })
    }

    /// Default-sized player standing on the ground line at `x`
    pub fn spawn(x: f32, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_y - PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: true,
            lives: MAX_LIVES,
            invincible: false,
            invincibility_timer: 0.0,
            blink_timer: 0.0,
            visible: true,
            anim: AnimState::Idle,
        }
    }

    /// Advance one tick of physics against `level`
    pub fn update(&mut self, dt: f32, intents: Intents, level: &Level) {
        self.vel.x = intents.direction() * RUN_SPEED;
        self.pos.x += self.vel.x * dt;

        self.vel.y += GRAVITY * dt;
        self.pos.y += self.vel.y * dt;

        let rest_y = level.ground_y - self.size.y;
        let over_pit = level.is_pit_at(self.center_x());
        if !over_pit && self.pos.y >= rest_y {
            self.pos.y = rest_y;
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        if intents.jump && self.grounded {
            self.vel.y = -JUMP_SPEED;
            self.grounded = false;
        }

        let max_x = (level.width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);

        self.tick_invincibility(dt);

        self.anim = if !self.grounded {
            AnimState::Jump
        } else if intents.left {
            AnimState::RunLeft
        } else if intents.right {
            AnimState::RunRight
        } else {
            AnimState::Idle
        };
    }

    fn tick_invincibility(&mut self, dt: f32) {
        if !self.invincible {
            self.visible = true;
            return;
        }
        self.invincibility_timer = (self.invincibility_timer - dt).max(0.0);
        self.blink_timer += dt;
        if self.blink_timer >= BLINK_INTERVAL {
            self.visible = !self.visible;
            self.blink_timer = 0.0;
        }
        self.clear_expired_invincibility();
    }

    /// Drop the invincible flag if its timer has already run out
    pub fn clear_expired_invincibility(&mut self) {
        if self.invincible && self.invincibility_timer <= 0.0 {
            self.invincible = false;
            self.visible = true;
            self.invincibility_timer = 0.0;
            self.blink_timer = 0.0;
        }
    }

    /// Lose a life unless invincible. Returns true if a life was lost.
    pub fn take_damage(&mut self) -> bool {
        if self.invincible {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.vel.x = -DAMAGE_RECOIL;
        self.invincible = true;
        self.invincibility_timer = INVINCIBILITY_SECS;
        self.blink_timer = 0.0;
        self.visible = false;
        if self.lives == 0 {
            self.die();
        }
        true
    }

    fn die(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Put the player on the ground at `x`, at rest
    pub fn respawn_at(&mut self, x: f32, ground_y: f32) {
        self.pos = Vec2::new(x, ground_y - self.size.y);
        self.vel = Vec2::ZERO;
        self.grounded = true;
    }

    pub fn add_life(&mut self) {
        if self.lives < MAX_LIVES {
            self.lives += 1;
        }
    }

    pub fn reset_lives(&mut self) {
        self.lives = MAX_LIVES;
        self.invincible = false;
        self.invincibility_timer = 0.0;
        self.blink_timer = 0.0;
        self.visible = true;
    }

    /// Overwrite the life count, capped at `MAX_LIVES`
    pub fn set_lives(&mut self, lives: u8) {
        self.lives = lives.min(MAX_LIVES);
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn invincibility_remaining(&self) -> f32 {
        self.invincibility_timer
    }

    /// False during the "off" half of the damage blink
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn anim_state(&self) -> AnimState {
        self.anim
    }

    pub fn visual_bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn hitbox(&self) -> Rect {
        self.visual_bounds().scaled_centered(HITBOX_SCALE)
    }

    /// Horizontal offset of the hitbox inside the visual box
    pub fn hitbox_offset_x(&self) -> f32 {
        self.size.x * (1.0 - HITBOX_SCALE) / 2.0
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = SIM_DT;

    fn level() -> Level {
        Level::flat(3000.0)
    }

    #[test]
    fn test_new_rejects_bad_size() {
        assert!(Player::new(0.0, 0.0, 0.0, 60.0).is_err());
        assert!(Player::new(0.0, 0.0, 48.0, f32::NAN).is_err());
        assert!(Player::new(0.0, 0.0, 48.0, 60.0).is_ok());
    }

    #[test]
    fn test_hitbox_is_centered() {
        let player = Player::spawn(100.0, GROUND_Y);
        let hb = player.hitbox();
        let vb = player.visual_bounds();
        assert!((hb.center() - vb.center()).length() < 1e-4);
        assert!((hb.w - PLAYER_WIDTH * HITBOX_SCALE).abs() < 1e-4);
        assert!((hb.x - (player.pos.x + player.hitbox_offset_x())).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_follows_input_directly() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.update(DT, Intents { right: true, ..Intents::NONE }, &level);
        assert_eq!(player.vel.x, RUN_SPEED);
        player.update(DT, Intents { left: true, ..Intents::NONE }, &level);
        assert_eq!(player.vel.x, -RUN_SPEED);
        player.update(DT, Intents { left: true, right: true, jump: false }, &level);
        assert_eq!(player.vel.x, 0.0);
        player.update(DT, Intents::NONE, &level);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_stays_on_ground() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        for _ in 0..10 {
            player.update(DT, Intents::NONE, &level);
        }
        assert!(player.grounded);
        assert_eq!(player.pos.y, GROUND_Y - PLAYER_HEIGHT);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.anim_state(), AnimState::Idle);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        let jump = Intents { jump: true, ..Intents::NONE };
        player.update(DT, jump, &level);
        assert_eq!(player.vel.y, -JUMP_SPEED);
        assert!(!player.grounded);
        assert_eq!(player.anim_state(), AnimState::Jump);

        // second press mid-air only adds gravity
        player.update(DT, jump, &level);
        assert!((player.vel.y - (-JUMP_SPEED + GRAVITY * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_jump_lands_again() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.update(DT, Intents { jump: true, ..Intents::NONE }, &level);
        for _ in 0..200 {
            player.update(DT, Intents::NONE, &level);
        }
        assert!(player.grounded);
        assert_eq!(player.pos.y, GROUND_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn test_falls_through_pit() {
        let mut level = level();
        level
            .obstacles
            .push(super::super::level::Obstacle::Hole { x: 480.0, w: 100.0 });
        let mut player = Player::spawn(500.0, GROUND_Y);
        for _ in 0..30 {
            player.update(DT, Intents::NONE, &level);
            assert!(!player.grounded);
        }
        assert!(player.pos.y > GROUND_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn test_clamped_to_level_bounds() {
        let level = level();
        let mut player = Player::spawn(1.0, GROUND_Y);
        player.update(0.5, Intents { left: true, ..Intents::NONE }, &level);
        assert_eq!(player.pos.x, 0.0);

        let mut player = Player::spawn(level.width - PLAYER_WIDTH - 1.0, GROUND_Y);
        player.update(0.5, Intents { right: true, ..Intents::NONE }, &level);
        assert_eq!(player.pos.x, level.width - PLAYER_WIDTH);
    }

    #[test]
    fn test_run_animation_states() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.update(DT, Intents { left: true, ..Intents::NONE }, &level);
        assert_eq!(player.anim_state(), AnimState::RunLeft);
        player.update(DT, Intents { right: true, ..Intents::NONE }, &level);
        assert_eq!(player.anim_state(), AnimState::RunRight);
    }

    #[test]
    fn test_take_damage_starts_invincibility() {
        let mut player = Player::spawn(500.0, GROUND_Y);
        assert!(player.take_damage());
        assert_eq!(player.lives(), 2);
        assert!(player.is_invincible());
        assert!(!player.is_visible());
        assert_eq!(player.vel.x, -DAMAGE_RECOIL);
        assert_eq!(player.invincibility_remaining(), INVINCIBILITY_SECS);
    }

    #[test]
    fn test_damage_while_invincible_is_noop() {
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.take_damage();
        let timer = player.invincibility_remaining();
        assert!(!player.take_damage());
        assert_eq!(player.lives(), 2);
        assert_eq!(player.invincibility_remaining(), timer);
    }

    #[test]
    fn test_last_life_stops_player() {
        let mut player = Player::spawn(500.0, GROUND_Y);
        for _ in 0..3 {
            player.reset_invincibility_for_test();
            player.take_damage();
        }
        assert_eq!(player.lives(), 0);
        assert_eq!(player.vel, Vec2::ZERO);
        player.reset_invincibility_for_test();
        player.take_damage();
        assert_eq!(player.lives(), 0);
    }

    #[test]
    fn test_invincibility_blinks_then_expires() {
        let level = level();
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.take_damage();
        let mut toggles = 0;
        let mut last = player.is_visible();
        let mut ticks = 0;
        while player.is_invincible() {
            player.update(DT, Intents::NONE, &level);
            if player.is_visible() != last {
                toggles += 1;
                last = player.is_visible();
            }
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(toggles >= 15);
        assert!(player.is_visible());
        assert_eq!(player.invincibility_remaining(), 0.0);
    }

    #[test]
    fn test_life_helpers() {
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.add_life();
        assert_eq!(player.lives(), MAX_LIVES);
        player.take_damage();
        player.add_life();
        assert_eq!(player.lives(), MAX_LIVES);

        player.reset_invincibility_for_test();
        assert!(player.take_damage());
        assert_eq!(player.lives(), MAX_LIVES - 1);
        assert!(player.is_invincible());
        player.reset_lives();
        assert_eq!(player.lives(), MAX_LIVES);
        assert!(!player.is_invincible());
        assert!(player.is_visible());
    }

    #[test]
    fn test_expired_invincibility_is_cleared() {
        let mut player = Player::spawn(500.0, GROUND_Y);
        player.take_damage();
        player.clear_expired_invincibility();
        assert!(player.is_invincible());

        player.invincibility_timer = 0.0;
        player.clear_expired_invincibility();
        assert!(!player.is_invincible());
        assert!(player.is_visible());
    }

    impl Player {
        fn reset_invincibility_for_test(&mut self) {
            self.invincible = false;
            self.invincibility_timer = 0.0;
        }
    }
}
