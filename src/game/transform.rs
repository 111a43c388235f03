//! World-space resolution of transforms and entity rectangles.
//!
//! Transforms are stored in parent-local space. World position composes the
//! parent chain top-down: each level rotates the child's local position by
//! the parent's rotation and translates by the parent's world position.
//! The chain terminates at the first dead or transform-less parent, so a
//! despawned parent simply degrades the child to world space.

use glam::Vec2;

use super::components::{Collider, Drawable, Transform};
use super::entity::Entity;
use super::rect::Rect;
use super::registry::Registry;

/// World position of an entity with a Transform. Required-component access:
/// callers guarantee the transform exists (their group requires it).
pub fn world_position(registry: &Registry, entity: Entity) -> Vec2 {
    resolve(registry, registry.component::<Transform>(entity))
}

fn resolve(registry: &Registry, transform: &Transform) -> Vec2 {
    let parent = transform.parent;
    if !registry.is_alive(parent) {
        return transform.position;
    }
    let parent_transform = match registry.get::<Transform>(parent) {
        Some(t) => t,
        None => return transform.position,
    };

    let parent_world = resolve(registry, parent_transform);
    Vec2::from_angle(parent_transform.rotation).rotate(transform.position) + parent_world
}

/// Resolved collision rectangle: local rect scaled, translated by the
/// entity's world position.
pub fn collider_rect(registry: &Registry, entity: Entity) -> Rect {
    let collider = registry.component::<Collider>(entity);
    collider
        .rect
        .scaled(collider.scale)
        .translated(world_position(registry, entity))
}

/// Resolved draw rectangle: atlas-sized, scaled, at the world position.
pub fn draw_rect(registry: &Registry, entity: Entity) -> Rect {
    let drawable = registry.component::<Drawable>(entity);
    let size = drawable.atlas_rect.size() * drawable.scale;
    let position = world_position(registry, entity);
    Rect::new(position.x, position.y, size.x, size.y)
}
