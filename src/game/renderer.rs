//! Renderer boundary.
//!
//! The core exposes a per-frame draw list: one resolved world rectangle per
//! drawable entity plus layer/flip/tint and the opaque texture key. Draw
//! ordering, batching and GPU resources are entirely the renderer's
//! problem.

use super::components::{Drawable, SpriteFlip};
use super::entity::Entity;
use super::rect::Rect;
use super::registry::{GroupId, Registry};
use super::transform;

/// One drawable entity, fully resolved for the renderer.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub entity: Entity,
    /// World-space rectangle (scale and parent transform applied).
    pub rect: Rect,
    pub atlas_rect: Rect,
    pub layer: i32,
    pub flip: SpriteFlip,
    pub tint: [f32; 4],
    pub texture: String,
}

/// Build the draw list for every entity in the drawable group
/// (Transform + Drawable).
pub fn build_draw_list(registry: &Registry, drawable_group: GroupId) -> Vec<DrawCommand> {
    registry
        .group_entities(drawable_group)
        .iter()
        .map(|&entity| {
            let drawable = registry.component::<Drawable>(entity);
            DrawCommand {
                entity,
                rect: transform::draw_rect(registry, entity),
                atlas_rect: drawable.atlas_rect,
                layer: drawable.layer,
                flip: drawable.flip,
                tint: drawable.tint,
                texture: drawable.texture.clone(),
            }
        })
        .collect()
}
