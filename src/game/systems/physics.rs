//! Physics and collision stage.
//!
//! Movement is resolved in whole pixels: continuous velocity accumulates
//! into a sub-pixel remainder and only the integer part moves the entity,
//! stepped in `move_step` increments so a fast body cannot tunnel through a
//! thin collider. The vertical axis resolves fully before the horizontal
//! one. Direction signs are fixed once per axis per tick from the velocity
//! at integration time.

use glam::Vec2;

use crate::game::components::{
    Collider, ColliderEvent, ColliderEventKind, DeathTag, MovingPlatform, Physics, Transform,
};
use crate::game::entity::Entity;
use crate::game::rect::Rect;
use crate::game::registry::{GroupId, Registry};
use crate::game::transform;

/// Run one physics tick over the physics group (Transform + Physics).
///
/// `collider_group` is the set of all solid entities (Transform +
/// Collider); `death_height` is the world Y below which entities are
/// death-marked for the next stage.
pub fn simulate(
    registry: &mut Registry,
    physics_group: GroupId,
    collider_group: GroupId,
    dt: f32,
    gravity: f32,
    move_step: f32,
    death_height: f32,
) {
    for entity in registry.entities_in(physics_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let velocity = {
            let physics = registry.component_mut::<Physics>(entity);
            let mut velocity = physics.velocity + physics.acceleration * dt;
            velocity.y += gravity * dt;
            velocity.x = velocity.x.clamp(-physics.max_speed.x, physics.max_speed.x);
            velocity.y = velocity.y.clamp(-physics.max_speed.y, physics.max_speed.y);
            physics.velocity = velocity;
            velocity
        };

        if registry.has_component::<Collider>(entity) {
            collision_movement(registry, entity, collider_group, velocity, dt, move_step);
        } else {
            registry.component_mut::<Transform>(entity).position += velocity * dt;
        }

        release_platform_if_airborne(registry, entity);

        // Fell out of the world. The death stage decides what that means
        // (respawn for the player, destruction for everything else).
        if transform::world_position(registry, entity).y >= death_height {
            registry.try_add_component(entity, DeathTag);
        }
    }
}

struct Obstacle {
    entity: Entity,
    rect: Rect,
    kind: ColliderEventKind,
}

/// Every other member of the collider group, with resolved world rects.
/// Static for the duration of one entity's resolution: only the entity
/// itself moves during stepping.
fn collect_obstacles(
    registry: &Registry,
    entity: Entity,
    collider_group: GroupId,
) -> Vec<Obstacle> {
    registry
        .group_entities(collider_group)
        .iter()
        .filter(|&&other| other != entity)
        .map(|&other| Obstacle {
            entity: other,
            rect: transform::collider_rect(registry, other),
            kind: registry.component::<Collider>(other).kind,
        })
        .collect()
}

fn collision_movement(
    registry: &mut Registry,
    entity: Entity,
    collider_group: GroupId,
    velocity: Vec2,
    dt: f32,
    move_step: f32,
) {
    let dir_x = if velocity.x > 0.0 { 1.0 } else { -1.0 };
    let dir_y = if velocity.y > 0.0 { 1.0 } else { -1.0 };

    // Whole pixels to move this tick; the fraction stays banked so slow
    // bodies still advance eventually.
    let delta = {
        let physics = registry.component_mut::<Physics>(entity);
        physics.move_remainder += velocity * dt;
        let whole = Vec2::new(
            physics.move_remainder.x.trunc(),
            physics.move_remainder.y.trunc(),
        );
        physics.move_remainder -= whole;
        whole
    };
    if delta.x == 0.0 && delta.y == 0.0 {
        return;
    }

    let obstacles = collect_obstacles(registry, entity, collider_group);

    let mut remaining = delta.y.abs();
    while remaining > 0.0 {
        let step = move_step.min(remaining);
        remaining -= step;

        registry.component_mut::<Transform>(entity).position.y += step * dir_y;
        registry.component_mut::<Physics>(entity).falling = true;

        for obstacle in &obstacles {
            let rect = transform::collider_rect(registry, entity);
            let overlap = rect.intersection(&obstacle.rect);
            // Zero-height overlap is edge contact: it still supports.
            if overlap.w <= 0.0 || overlap.h < 0.0 {
                continue;
            }

            registry.component_mut::<Transform>(entity).position.y -= overlap.h * dir_y;
            let physics = registry.component_mut::<Physics>(entity);
            physics.falling = false;
            physics.velocity.y = 0.0;

            handle_contact(registry, entity, obstacle);
        }
    }

    // A rider's horizontal resolution is the platform's job; testing here
    // would fight the carry.
    let riding = {
        let physics = registry.component::<Physics>(entity);
        registry.is_alive(physics.on_platform)
    };
    if riding {
        registry.component_mut::<Transform>(entity).position.x += delta.x;
        return;
    }

    let mut remaining = delta.x.abs();
    while remaining > 0.0 {
        let step = move_step.min(remaining);
        remaining -= step;

        registry.component_mut::<Transform>(entity).position.x += step * dir_x;

        for obstacle in &obstacles {
            let rect = transform::collider_rect(registry, entity);
            let overlap = rect.intersection(&obstacle.rect);
            if overlap.w <= 0.0 || overlap.h <= 0.0 {
                continue;
            }

            registry.component_mut::<Transform>(entity).position.x -= overlap.w * dir_x;
            handle_contact(registry, entity, obstacle);
        }
    }
}

/// A moving-platform tag claims the riding relation; any other non-none tag
/// becomes a one-frame collision event.
fn handle_contact(registry: &mut Registry, entity: Entity, obstacle: &Obstacle) {
    match obstacle.kind {
        ColliderEventKind::None => {}
        ColliderEventKind::MovingPlatform => claim_platform(registry, entity, obstacle.entity),
        kind => {
            registry.try_add_component(
                entity,
                ColliderEvent {
                    kind,
                    other: obstacle.entity,
                },
            );
        }
    }
}

/// Establish the exclusive riding relation between `rider` and `platform`.
fn claim_platform(registry: &mut Registry, rider: Entity, platform: Entity) {
    let previous = registry.component::<Physics>(rider).on_platform;
    if previous == platform {
        return;
    }

    if registry.is_alive(previous) {
        if let Some(moving) = registry.get_mut::<MovingPlatform>(previous) {
            if moving.rider == rider {
                moving.rider = Entity::NULL;
            }
        }
    }

    // One rider per platform: the old rider loses its reference.
    let displaced = registry
        .get::<MovingPlatform>(platform)
        .map(|moving| moving.rider)
        .unwrap_or(Entity::NULL);
    if displaced != rider && registry.is_alive(displaced) {
        if let Some(physics) = registry.get_mut::<Physics>(displaced) {
            if physics.on_platform == platform {
                physics.on_platform = Entity::NULL;
            }
        }
    }

    if let Some(moving) = registry.get_mut::<MovingPlatform>(platform) {
        moving.rider = rider;
    }
    registry.component_mut::<Physics>(rider).on_platform = platform;
}

/// Clear the riding relation (both directions) once the entity is airborne.
/// Losing horizontal contact alone does not release it.
fn release_platform_if_airborne(registry: &mut Registry, entity: Entity) {
    let (falling, platform) = {
        let physics = registry.component::<Physics>(entity);
        (physics.falling, physics.on_platform)
    };
    if !falling || platform.is_null() {
        return;
    }

    if registry.is_alive(platform) {
        if let Some(moving) = registry.get_mut::<MovingPlatform>(platform) {
            if moving.rider == entity {
                moving.rider = Entity::NULL;
            }
        }
    }
    registry.component_mut::<Physics>(entity).on_platform = Entity::NULL;
}
