//! Procedural level generation
//!
//! Walks a cursor from the left edge, laying platforms, pits and walls until
//! it reaches the safe zone, then scatters hazards, items and the goal.
//! Same seed + same profile = same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::error::SimError;
use super::level::{Collectible, Goal, HazardSkin, Level, MovingHazard, Obstacle};
use crate::consts::*;
use crate::tuning::{Band, Difficulty, DifficultyProfile};

/// Walls are placed inside this central fraction of their platform
const WALL_INTERIOR: f32 = 0.7;

/// Generate the built-in level for `difficulty`
pub fn generate_for(difficulty: Difficulty, seed: u64) -> Result<Level, SimError> {
    let profile = difficulty.profile();
    generate(profile.level_width, &profile, seed)
}

/// Generate a level of `level_width` units using `profile`
pub fn generate(level_width: f32, profile: &DifficultyProfile, seed: u64) -> Result<Level, SimError> {
    profile.validate()?;
    if !level_width.is_finite() || level_width <= SAFE_ZONE {
        return Err(SimError::InvalidProfile {
            reason: format!("level width {level_width} must exceed the safe zone"),
        });
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    let ground_y = GROUND_Y;
    let safe_start = level_width - SAFE_ZONE;

    let obstacles = lay_ground(level_width, safe_start, profile, &mut rng);
    if !obstacles.iter().any(|o| matches!(o, Obstacle::Platform { .. })) {
        return Err(SimError::DegenerateLevel { width: level_width });
    }

    let mut hazards = Vec::with_capacity(profile.hazard_slots.len());
    for &slot in &profile.hazard_slots {
        if slot < 0.0 || slot + HAZARD_WIDTH > safe_start {
            continue;
        }
        let skin = HazardSkin::pick(&mut rng);
        hazards.push(MovingHazard::on_ground(slot, ground_y, skin)?);
    }

    let items = scatter_items(level_width, ground_y, profile.item_count, &mut rng);
    let goal = Goal::on_ground(profile.goal_x, level_width, ground_y);

    let level = Level {
        width: level_width,
        ground_y,
        obstacles,
        hazards,
        items,
        goal,
    };

    log::info!(
        "Level seed {}: width={}, platforms={}, pits={}, walls={}, hazards={}, items={}, goal_x={}",
        seed,
        level_width,
        level.platforms().count(),
        level.pits().count(),
        level.walls().count(),
        level.hazards.len(),
        level.items.len(),
        level.goal.x,
    );

    Ok(level)
}

/// Uniform draw from a band (a collapsed band yields its bound)
fn draw<R: Rng>(rng: &mut R, band: Band) -> f32 {
    if band.min >= band.max {
        band.min
    } else {
        rng.random_range(band.min..=band.max)
    }
}

/// Platforms, pits and walls, left to right
fn lay_ground<R: Rng>(
    level_width: f32,
    safe_start: f32,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let mut cursor = 0.0f32;

    loop {
        if cursor >= safe_start {
            let w = level_width - cursor;
            if w > 0.0 {
                obstacles.push(Obstacle::Platform { x: cursor, w });
            }
            break;
        }

        let len = draw(rng, profile.platform_len).min(safe_start - cursor);
        let platform_end = cursor + len;

        // Pit at the platform's far end, never reaching into the safe zone
        let mut hole = None;
        if rng.random_bool(profile.hole_chance) {
            let w = draw(rng, profile.hole_width).min(safe_start - platform_end);
            if w > 0.0 {
                hole = Some(Obstacle::Hole { x: platform_end, w });
            }
        }

        let mut wall = None;
        if len > WALL_MIN_PLATFORM && rng.random_bool(profile.wall_chance) {
            let h = draw(rng, profile.wall_height);
            wall = place_wall(cursor, len, safe_start, rng).map(|x| Obstacle::Wall {
                x,
                w: WALL_WIDTH,
                h,
            });
        }

        obstacles.push(Obstacle::Platform { x: cursor, w: len });
        obstacles.extend(wall);
        let run_end = match hole {
            Some(h) => {
                obstacles.push(h);
                h.right()
            }
            None => platform_end,
        };

        let band = profile.gap_bands[rng.random_range(0..profile.gap_bands.len())];
        cursor = (run_end + draw(rng, band)).min(level_width);
    }

    obstacles
}

/// Wall x inside the platform interior, or `None` if there is no room.
/// Walls also stay clear of the spawn point.
fn place_wall<R: Rng>(platform_x: f32, len: f32, safe_start: f32, rng: &mut R) -> Option<f32> {
    let margin = len * (1.0 - WALL_INTERIOR) / 2.0;
    let lo = (platform_x + margin)
        .max(platform_x + WALL_EDGE_MARGIN)
        .max(SPAWN_X + PLAYER_WIDTH + WALL_EDGE_MARGIN);
    let hi = (platform_x + len - margin - WALL_WIDTH).min(platform_x + len - WALL_EDGE_MARGIN - WALL_WIDTH);
    if hi < lo {
        return None;
    }
    let x = draw(rng, Band::new(lo, hi));
    if x + WALL_WIDTH > safe_start {
        return None;
    }
    Some(x)
}

/// Evenly spaced items with horizontal jitter and a random lift off the ground
fn scatter_items<R: Rng>(level_width: f32, ground_y: f32, count: u32, rng: &mut R) -> Vec<Collectible> {
    let spacing = level_width / count as f32;
    let max_x = (level_width - ITEM_SIZE).max(0.0);
    (0..count)
        .map(|i| {
            let base = spacing * (i as f32 + 0.5);
            let jitter = rng.random_range(-ITEM_JITTER..=ITEM_JITTER);
            let lift = rng.random_range(ITEM_MIN_LIFT..=ITEM_MAX_LIFT);
            let x = (base + jitter).clamp(0.0, max_x);
            let y = (ground_y - ITEM_SIZE - lift).max(0.0);
            Collectible::new(x, y, ITEM_VALUE)
        })
        .collect()
}
