//! Leaf component types.
//!
//! Components are plain data; behavior lives in the systems. Entity-valued
//! fields are weak relations; they default to [`Entity::NULL`] and must be
//! liveness-checked through the registry on every use.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::rect::Rect;

// =============================================================================
// Spatial
// =============================================================================

/// Position and rotation, optionally relative to a parent entity.
///
/// World position composes the parent chain (rotation + translation),
/// stopping at the first dead or transform-less parent. Parent chains are
/// expected to be acyclic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub parent: Entity,
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            parent: Entity::NULL,
        }
    }

    pub fn with_parent(position: Vec2, parent: Entity) -> Self {
        Self {
            position,
            rotation: 0.0,
            parent,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec2::ZERO)
    }
}

// =============================================================================
// Physics / collision
// =============================================================================

/// Movement state for entities driven by the physics resolver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Physics {
    /// Acceleration contribution of one held direction key.
    pub move_speed: f32,
    /// Instantaneous upward velocity applied on jump.
    pub jump_speed: f32,
    pub acceleration: Vec2,
    pub velocity: Vec2,
    /// Sub-pixel movement carried over to the next tick.
    pub move_remainder: Vec2,
    /// Per-axis speed clamp, applied symmetrically.
    pub max_speed: Vec2,
    pub falling: bool,
    /// Moving platform currently supporting this entity.
    pub on_platform: Entity,
}

impl Physics {
    pub fn new(move_speed: f32, jump_speed: f32, max_speed: Vec2) -> Self {
        Self {
            move_speed,
            jump_speed,
            acceleration: Vec2::ZERO,
            velocity: Vec2::ZERO,
            move_remainder: Vec2::ZERO,
            max_speed,
            falling: true,
            on_platform: Entity::NULL,
        }
    }
}

/// What touching a collider means for the other entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderEventKind {
    /// Plain solid surface.
    None,
    /// Contact kills (hazard platforms).
    Lethal,
    /// Contact establishes the riding relation instead of an event.
    MovingPlatform,
}

/// Axis-aligned collision shape in entity-local space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub kind: ColliderEventKind,
    pub rect: Rect,
    pub scale: Vec2,
}

impl Collider {
    pub fn solid(rect: Rect, scale: Vec2) -> Self {
        Self {
            kind: ColliderEventKind::None,
            rect,
            scale,
        }
    }
}

/// One-frame collision signal, consumed by the event dispatch stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColliderEvent {
    pub kind: ColliderEventKind,
    pub other: Entity,
}

/// Platform shuttling between two endpoints, pausing at each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub start: Vec2,
    pub end: Vec2,
    /// Endpoint the platform is currently heading for.
    pub destination: Vec2,
    pub speed: f32,
    /// Pause applied every time an endpoint is reached.
    pub cooldown: f32,
    pub cooldown_remaining: f32,
    /// Entity currently standing on this platform.
    pub rider: Entity,
}

impl MovingPlatform {
    pub fn between(start: Vec2, end: Vec2, speed: f32, cooldown: f32) -> Self {
        Self {
            start,
            end,
            destination: end,
            speed,
            cooldown,
            cooldown_remaining: 0.0,
            rider: Entity::NULL,
        }
    }
}

// =============================================================================
// Gameplay markers
// =============================================================================

/// Marks the player entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Marks an entity for the death stage (respawn for the player, destruction
/// for everything else).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeathTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Left,
    Right,
    Jump,
}

/// One-shot "control pressed" marker, consumed by the movement stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StartMovement {
    pub kind: MovementKind,
}

/// One-shot "control released" marker, consumed by the movement stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StopMovement {
    pub kind: MovementKind,
}

/// Progress pickup floating above a platform. Activating one moves the
/// player's respawn point; the final one wins the level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Set once on first contact, never cleared.
    pub activated: bool,
    pub final_goal: bool,
}

impl Checkpoint {
    pub fn new(final_goal: bool) -> Self {
        Self {
            activated: false,
            final_goal,
        }
    }
}

// =============================================================================
// Rendering data (consumed by the external renderer, never drawn here)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteFlip {
    None,
    Horizontal,
}

/// Everything the renderer needs to draw an entity. The texture key is an
/// opaque name resolved by the renderer's own atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawable {
    pub atlas_rect: Rect,
    pub origin: Vec2,
    pub scale: Vec2,
    pub layer: i32,
    pub flip: SpriteFlip,
    pub tint: [f32; 4],
    pub texture: String,
}

impl Drawable {
    pub fn new(texture: impl Into<String>, atlas_rect: Rect, scale: Vec2, layer: i32) -> Self {
        Self {
            atlas_rect,
            origin: Vec2::ZERO,
            scale,
            layer,
            flip: SpriteFlip::None,
            tint: [1.0, 1.0, 1.0, 1.0],
            texture: texture.into(),
        }
    }
}

/// Sprite-sheet layout for frame-indexed animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sprite {
    /// Size of one frame in texels.
    pub frame_size: (u32, u32),
    /// Size of the whole sheet in texels.
    pub sheet_size: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Idle,
    Running,
    Jumping,
}

/// Frame-stepping state for a running animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub kind: AnimationKind,
    /// Frame indices are 1-based within the sheet.
    pub start_frame: u32,
    pub end_frame: u32,
    pub frame_time: f32,
    pub time_left: f32,
    pub current_frame: u32,
    pub looped: bool,
}

impl SpriteAnimation {
    /// Fresh animation state for a kind, starting at its first frame.
    pub fn of(kind: AnimationKind) -> Self {
        let (start_frame, end_frame, frame_time, looped) = match kind {
            AnimationKind::Idle => (1, 4, 0.2, true),
            AnimationKind::Running => (10, 14, 0.2, true),
            AnimationKind::Jumping => (15, 18, 0.1, false),
        };
        Self {
            kind,
            start_frame,
            end_frame,
            frame_time,
            time_left: frame_time,
            current_frame: start_frame,
            looped,
        }
    }
}
