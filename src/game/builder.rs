//! Entity templates.
//!
//! Each function assembles one kind of game entity on a registry passed in
//! by the caller. The level/state owns the registry; nothing here is
//! global.

use glam::Vec2;

use super::components::*;
use super::entity::Entity;
use super::rect::Rect;
use super::registry::Registry;
use crate::config::{GeneratorConfig, PlayerConfig};

/// Visual size of a checkpoint pickup, in world units.
pub const CHECKPOINT_SIZE: f32 = 50.0;

pub fn create_player(registry: &mut Registry, config: &PlayerConfig, position: Vec2) -> Entity {
    let player = registry.create_entity();

    registry.add_component(player, Transform::from_position(position));
    registry.add_component(
        player,
        Physics::new(config.move_speed, config.jump_speed, config.max_speed),
    );
    registry.add_component(
        player,
        Collider::solid(config.collider, config.scale),
    );

    let frame_rect = Rect::new(
        0.0,
        0.0,
        config.frame_size.0 as f32,
        config.frame_size.1 as f32,
    );
    registry.add_component(
        player,
        Drawable::new(config.texture.clone(), frame_rect, config.scale, 2),
    );
    registry.add_component(
        player,
        Sprite {
            frame_size: config.frame_size,
            sheet_size: config.sheet_size,
        },
    );
    registry.add_component(player, SpriteAnimation::of(AnimationKind::Idle));
    registry.add_component(player, Player);

    player
}

pub fn create_platform(registry: &mut Registry, config: &GeneratorConfig, position: Vec2) -> Entity {
    let platform = registry.create_entity();
    let rect = Rect::new(0.0, 0.0, config.platform_width, config.platform_height);

    registry.add_component(platform, Transform::from_position(position));
    registry.add_component(platform, Collider::solid(rect, Vec2::ONE));
    registry.add_component(platform, Drawable::new("platform", rect, Vec2::ONE, 1));

    platform
}

/// Lethal platform: same shape as a normal platform, kills on contact.
pub fn create_hazard(registry: &mut Registry, config: &GeneratorConfig, position: Vec2) -> Entity {
    let hazard = registry.create_entity();
    let rect = Rect::new(0.0, 0.0, config.platform_width, config.platform_height);

    registry.add_component(hazard, Transform::from_position(position));
    registry.add_component(
        hazard,
        Collider {
            kind: ColliderEventKind::Lethal,
            rect,
            scale: Vec2::ONE,
        },
    );
    let mut drawable = Drawable::new("platform-hazard", rect, Vec2::ONE, 1);
    drawable.tint = [1.0, 0.35, 0.35, 1.0];
    registry.add_component(hazard, drawable);

    hazard
}

/// Platform shuttling along X from `position`. Landing on it establishes
/// the riding relation instead of a collision event.
pub fn create_moving_platform(
    registry: &mut Registry,
    config: &GeneratorConfig,
    position: Vec2,
) -> Entity {
    let platform = registry.create_entity();
    let rect = Rect::new(0.0, 0.0, config.platform_width, config.platform_height);
    let end = position + Vec2::new(config.moving_platform_span, 0.0);

    registry.add_component(platform, Transform::from_position(position));
    registry.add_component(
        platform,
        Collider {
            kind: ColliderEventKind::MovingPlatform,
            rect,
            scale: Vec2::ONE,
        },
    );
    registry.add_component(
        platform,
        MovingPlatform::between(
            position,
            end,
            config.moving_platform_speed,
            config.moving_platform_pause,
        ),
    );
    let mut drawable = Drawable::new("platform-moving", rect, Vec2::ONE, 1);
    drawable.tint = [0.55, 0.7, 1.0, 1.0];
    registry.add_component(platform, drawable);

    platform
}

/// Progress pickup. No collider; activation is a proximity check.
pub fn create_checkpoint(registry: &mut Registry, position: Vec2, final_goal: bool) -> Entity {
    let checkpoint = registry.create_entity();
    let rect = Rect::new(0.0, 0.0, CHECKPOINT_SIZE, CHECKPOINT_SIZE);

    registry.add_component(checkpoint, Transform::from_position(position));
    registry.add_component(checkpoint, Drawable::new("recording", rect, Vec2::ONE, 2));
    registry.add_component(checkpoint, Checkpoint::new(final_goal));

    checkpoint
}
