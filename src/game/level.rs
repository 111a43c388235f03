//! Procedural level generator.
//!
//! Deterministic shape, randomized content: platforms march along +X with
//! a coin-flip vertical direction per step, seasoned with lethal trap
//! platforms at jump midpoints, moving platforms (never two in a row), and
//! a fixed schedule of checkpoints. Same seed, same level.

use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::builder;
use super::entity::Entity;
use super::registry::Registry;
use crate::config::GameConfig;

/// Fall margin below the lowest platform before the world kills.
pub const DEATH_MARGIN: f32 = 500.0;

/// Summary of a generated level, kept by the owning state.
pub struct GeneratedLevel {
    pub seed: u64,
    /// Player start, just above the first platform.
    pub spawn_point: Vec2,
    /// World Y at or below which entities die. Fixed at generation time.
    pub death_height: f32,
    /// Main-path platforms in traversal order.
    pub platforms: Vec<Entity>,
    pub platform_positions: Vec<Vec2>,
    /// Checkpoints in path order; the last one is the win trigger.
    pub checkpoints: Vec<Entity>,
    pub hazard_count: usize,
    pub moving_platform_count: usize,
}

/// Populate `registry` with a full level. The configuration must have been
/// validated; an unsatisfiable checkpoint schedule is rejected there, not
/// silently retried here.
pub fn generate(registry: &mut Registry, config: &GameConfig, seed: u64) -> GeneratedLevel {
    let generator = &config.generator;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut platforms = Vec::with_capacity(generator.platform_count);
    let mut platform_positions = Vec::with_capacity(generator.platform_count);
    let mut checkpoints = Vec::new();
    let mut hazard_count = 0;
    let mut moving_platform_count = 0;

    let step_x = generator.platform_width + generator.jump_length;
    let step_y = generator.platform_height + generator.jump_height;

    let player_size = config.player.collider.size() * config.player.scale;

    let mut previous = generator.origin;
    let mut next = generator.origin;
    let mut previous_was_moving = false;
    let mut max_bottom = f32::NEG_INFINITY;

    for i in 0..generator.platform_count {
        let position = next;
        let past_grace = i > generator.grace_platforms;

        let hosts_checkpoint = past_grace
            && (i - generator.grace_platforms) % generator.checkpoint_interval == 0
            && checkpoints.len() < generator.checkpoint_count;

        // Moving platforms never chain and never host a checkpoint.
        let becomes_moving = past_grace
            && !hosts_checkpoint
            && !previous_was_moving
            && rng.gen_bool(generator.moving_platform_chance);

        let platform = if becomes_moving {
            moving_platform_count += 1;
            builder::create_moving_platform(registry, generator, position)
        } else {
            builder::create_platform(registry, generator, position)
        };
        platforms.push(platform);
        platform_positions.push(position);
        max_bottom = max_bottom.max(position.y + generator.platform_height);

        if hosts_checkpoint {
            let final_goal = checkpoints.len() + 1 == generator.checkpoint_count;
            let checkpoint_position = position
                + Vec2::new(
                    (generator.platform_width - player_size.x) * 0.5,
                    -player_size.y,
                );
            checkpoints.push(builder::create_checkpoint(
                registry,
                checkpoint_position,
                final_goal,
            ));
        }

        let vertical_direction = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };

        // Trap halfway through the jump onto this platform, dropped toward
        // where a short jump would land.
        if past_grace
            && !becomes_moving
            && !hosts_checkpoint
            && rng.gen_bool(generator.hazard_chance)
        {
            let bias = if previous.y < position.y { 1.0 } else { -1.0 };
            let hazard_position = previous + Vec2::new(step_x * 0.5, step_y * 0.5 * bias);
            builder::create_hazard(registry, generator, hazard_position);
            hazard_count += 1;
            max_bottom = max_bottom.max(hazard_position.y + generator.platform_height);
        }

        previous = position;
        previous_was_moving = becomes_moving;
        next = position + Vec2::new(step_x, vertical_direction * step_y);
    }

    let death_height = max_bottom + DEATH_MARGIN;
    let spawn_point = platform_positions[0] + Vec2::new(0.0, -player_size.y - 1.0);

    info!(
        "generated level (seed {seed}): {} platforms, {} checkpoints, {hazard_count} hazards, \
         {moving_platform_count} moving, death height {death_height:.0}",
        platforms.len(),
        checkpoints.len(),
    );

    GeneratedLevel {
        seed,
        spawn_point,
        death_height,
        platforms,
        platform_positions,
        checkpoints,
        hazard_count,
        moving_platform_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::component::Component;
    use crate::game::components::{Checkpoint, Collider, MovingPlatform, Transform};
    use crate::game::transform;

    const SEED: u64 = 48;

    fn generate_default() -> (Registry, GeneratedLevel, crate::game::registry::GroupId) {
        let mut registry = Registry::new();
        let collider_group = registry.register_group(Transform::MASK | Collider::MASK);
        let config = GameConfig::default();
        let level = generate(&mut registry, &config, SEED);
        (registry, level, collider_group)
    }

    #[test]
    fn platform_x_positions_strictly_increase() {
        let (_, level, _) = generate_default();

        assert_eq!(level.platform_positions.len(), 100);
        for pair in level.platform_positions.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn death_height_is_lowest_collider_bottom_plus_margin() {
        let (registry, level, collider_group) = generate_default();

        let max_bottom = registry
            .group_entities(collider_group)
            .iter()
            .map(|&entity| transform::collider_rect(&registry, entity).bottom())
            .fold(f32::NEG_INFINITY, f32::max);

        assert_eq!(level.death_height, max_bottom + DEATH_MARGIN);
    }

    #[test]
    fn exactly_the_configured_checkpoints_with_final_win_trigger() {
        let (registry, level, _) = generate_default();
        let config = GameConfig::default();

        assert_eq!(level.checkpoints.len(), config.generator.checkpoint_count);
        for (i, &checkpoint) in level.checkpoints.iter().enumerate() {
            let component = registry.component::<Checkpoint>(checkpoint);
            assert!(!component.activated);
            let is_last = i + 1 == level.checkpoints.len();
            assert_eq!(component.final_goal, is_last);
        }
    }

    #[test]
    fn moving_platforms_never_chain() {
        let (registry, level, _) = generate_default();

        let moving: Vec<bool> = level
            .platforms
            .iter()
            .map(|&platform| registry.has_component::<MovingPlatform>(platform))
            .collect();
        for pair in moving.windows(2) {
            assert!(!(pair[0] && pair[1]), "two consecutive moving platforms");
        }

        let count = moving.iter().filter(|&&m| m).count();
        assert_eq!(count, level.moving_platform_count);
    }

    #[test]
    fn same_seed_reproduces_the_level() {
        let (_, first, _) = generate_default();
        let (_, second, _) = generate_default();

        assert_eq!(first.platform_positions, second.platform_positions);
        assert_eq!(first.death_height, second.death_height);
        assert_eq!(first.hazard_count, second.hazard_count);
        assert_eq!(first.moving_platform_count, second.moving_platform_count);
    }

    #[test]
    fn different_seed_changes_the_layout() {
        let (_, first, _) = generate_default();

        let mut registry = Registry::new();
        let config = GameConfig::default();
        let second = generate(&mut registry, &config, SEED + 1);

        assert_ne!(first.platform_positions, second.platform_positions);
    }

    #[test]
    fn spawn_point_sits_above_the_first_platform() {
        let (_, level, _) = generate_default();
        let config = GameConfig::default();
        let player_height = config.player.collider.h * config.player.scale.y;

        let first = level.platform_positions[0];
        assert_eq!(level.spawn_point.x, first.x);
        assert_eq!(level.spawn_point.y, first.y - player_height - 1.0);
    }

    #[test]
    fn grace_platforms_stay_plain() {
        let (registry, level, _) = generate_default();
        let config = GameConfig::default();

        for &platform in level.platforms.iter().take(config.generator.grace_platforms + 1) {
            assert!(!registry.has_component::<MovingPlatform>(platform));
        }
    }
}
