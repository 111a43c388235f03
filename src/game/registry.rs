//! The registry: entity lifetimes, typed component storage, and groups.
//!
//! Groups are registered once with a component mask and maintained
//! incrementally as components are added and removed. Systems iterate
//! their group, never the whole registry.
//!
//! Structural deletions are deferred: `destroy_entity` and
//! `remove_component` only queue work, and [`Registry::flush`] applies the
//! queue at the end of the tick. Until then a removed component still reads
//! back its last value and a destroyed entity still counts as alive, so
//! every system in the tick observes a stable world. Component *adds* are
//! visible immediately: a collision event attached during the physics
//! stage must be consumable by the dispatch stage of the same tick.

use super::component::{ids, Component, ComponentId, ComponentMask, ComponentStorage};
use super::components::*;
use super::entity::{Entity, EntityAllocator};

/// Handle to a registered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupId(usize);

struct Group {
    mask: ComponentMask,
    entities: Vec<Entity>,
}

/// Central store for all entities and components.
///
/// The owning state constructs one per level and passes it explicitly to
/// the builder, generator and systems.
pub struct Registry {
    entities: EntityAllocator,
    /// Attached-component bitmask per entity slot.
    masks: Vec<ComponentMask>,
    groups: Vec<Group>,
    pending_destroys: Vec<Entity>,
    pending_removals: Vec<(Entity, ComponentId)>,

    pub transforms: ComponentStorage<Transform>,
    pub physics: ComponentStorage<Physics>,
    pub colliders: ComponentStorage<Collider>,
    pub collider_events: ComponentStorage<ColliderEvent>,
    pub moving_platforms: ComponentStorage<MovingPlatform>,
    pub players: ComponentStorage<Player>,
    pub death_tags: ComponentStorage<DeathTag>,
    pub movement_starts: ComponentStorage<StartMovement>,
    pub movement_stops: ComponentStorage<StopMovement>,
    pub checkpoints: ComponentStorage<Checkpoint>,
    pub drawables: ComponentStorage<Drawable>,
    pub sprites: ComponentStorage<Sprite>,
    pub sprite_animations: ComponentStorage<SpriteAnimation>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            masks: Vec::new(),
            groups: Vec::new(),
            pending_destroys: Vec::new(),
            pending_removals: Vec::new(),

            transforms: ComponentStorage::new(),
            physics: ComponentStorage::new(),
            colliders: ComponentStorage::new(),
            collider_events: ComponentStorage::new(),
            moving_platforms: ComponentStorage::new(),
            players: ComponentStorage::new(),
            death_tags: ComponentStorage::new(),
            movement_starts: ComponentStorage::new(),
            movement_stops: ComponentStorage::new(),
            checkpoints: ComponentStorage::new(),
            drawables: ComponentStorage::new(),
            sprites: ComponentStorage::new(),
            sprite_animations: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity lifetime
    // =========================================================================

    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let slot = entity.index() as usize;
        if slot >= self.masks.len() {
            self.masks.resize(slot + 1, 0);
        }
        self.masks[slot] = 0;
        entity
    }

    /// Queue an entity for destruction at the next flush.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if self.entities.is_alive(entity) {
            self.pending_destroys.push(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attach a component, replacing any existing one. Visible to groups
    /// immediately.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.is_alive(entity) {
            return;
        }

        // Re-adding cancels a same-tick pending removal.
        self.pending_removals
            .retain(|(pending, id)| !(*pending == entity && *id == T::ID));

        T::storage_mut(self).insert(entity, component);
        let slot = entity.index() as usize;
        let before = self.masks[slot];
        if before & T::MASK == 0 {
            self.masks[slot] = before | T::MASK;
            self.groups_attach(entity, before, before | T::MASK);
        }
    }

    /// Attach a component only if the entity does not already have one.
    /// Returns whether the component was added.
    pub fn try_add_component<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        if !self.entities.is_alive(entity) || self.has_component::<T>(entity) {
            return false;
        }
        self.add_component(entity, component);
        true
    }

    /// Queue a component for removal at the next flush. Until then it still
    /// reads back its last value.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        if self.has_component::<T>(entity) {
            self.pending_removals.push((entity, T::ID));
        }
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.masks[entity.index() as usize] & T::MASK != 0
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        T::storage(self).get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        T::storage_mut(self).get_mut(entity)
    }

    /// Required-component access. Missing components are an entity-template
    /// bug, so this fails fast instead of limping along.
    pub fn component<T: Component>(&self, entity: Entity) -> &T {
        match self.get::<T>(entity) {
            Some(component) => component,
            None => panic!(
                "entity {:?} is missing required component id {}",
                entity,
                T::ID
            ),
        }
    }

    /// Mutable variant of [`Registry::component`].
    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        if !self.entities.is_alive(entity) {
            panic!(
                "entity {:?} is dead but a component id {} was required",
                entity,
                T::ID
            );
        }
        match T::storage_mut(self).get_mut(entity) {
            Some(component) => component,
            None => panic!(
                "entity {:?} is missing required component id {}",
                entity,
                T::ID
            ),
        }
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Register a live view over all entities whose component mask covers
    /// `mask`. Existing entities are scanned once; afterwards membership is
    /// maintained incrementally.
    pub fn register_group(&mut self, mask: ComponentMask) -> GroupId {
        let entities = self
            .entities
            .iter_live()
            .filter(|entity| self.masks[entity.index() as usize] & mask == mask)
            .collect();
        self.groups.push(Group { mask, entities });
        GroupId(self.groups.len() - 1)
    }

    pub fn group_entities(&self, group: GroupId) -> &[Entity] {
        &self.groups[group.0].entities
    }

    /// Snapshot of a group's members, for iteration while mutating the
    /// registry. Membership changes made mid-iteration do not affect the
    /// snapshot.
    pub fn entities_in(&self, group: GroupId) -> Vec<Entity> {
        self.groups[group.0].entities.clone()
    }

    fn groups_attach(&mut self, entity: Entity, before: ComponentMask, after: ComponentMask) {
        for group in &mut self.groups {
            if after & group.mask == group.mask && before & group.mask != group.mask {
                group.entities.push(entity);
            }
        }
    }

    fn groups_detach(&mut self, entity: Entity, before: ComponentMask, after: ComponentMask) {
        for group in &mut self.groups {
            if before & group.mask == group.mask && after & group.mask != group.mask {
                if let Some(position) = group.entities.iter().position(|e| *e == entity) {
                    group.entities.swap_remove(position);
                }
            }
        }
    }

    // =========================================================================
    // Deferred flush
    // =========================================================================

    /// Apply every queued component removal and entity destruction. Runs
    /// once at the end of the tick; this is the only point where deletions
    /// become visible to groups.
    pub fn flush(&mut self) {
        let removals = std::mem::take(&mut self.pending_removals);
        for (entity, id) in removals {
            if !self.entities.is_alive(entity) {
                continue;
            }
            let slot = entity.index() as usize;
            let before = self.masks[slot];
            let bit = 1u64 << id;
            if before & bit == 0 {
                continue;
            }
            self.clear_component(entity, id);
            self.masks[slot] = before & !bit;
            self.groups_detach(entity, before, before & !bit);
        }

        let destroys = std::mem::take(&mut self.pending_destroys);
        for entity in destroys {
            if !self.entities.is_alive(entity) {
                continue;
            }
            let slot = entity.index() as usize;
            let before = self.masks[slot];
            self.clear_all_components(entity);
            self.masks[slot] = 0;
            self.groups_detach(entity, before, 0);
            self.entities.free(entity);
        }
    }

    fn clear_component(&mut self, entity: Entity, id: ComponentId) {
        match id {
            ids::TRANSFORM => {
                self.transforms.remove(entity);
            }
            ids::PHYSICS => {
                self.physics.remove(entity);
            }
            ids::COLLIDER => {
                self.colliders.remove(entity);
            }
            ids::COLLIDER_EVENT => {
                self.collider_events.remove(entity);
            }
            ids::MOVING_PLATFORM => {
                self.moving_platforms.remove(entity);
            }
            ids::PLAYER => {
                self.players.remove(entity);
            }
            ids::DEATH_TAG => {
                self.death_tags.remove(entity);
            }
            ids::START_MOVEMENT => {
                self.movement_starts.remove(entity);
            }
            ids::STOP_MOVEMENT => {
                self.movement_stops.remove(entity);
            }
            ids::CHECKPOINT => {
                self.checkpoints.remove(entity);
            }
            ids::DRAWABLE => {
                self.drawables.remove(entity);
            }
            ids::SPRITE => {
                self.sprites.remove(entity);
            }
            ids::SPRITE_ANIMATION => {
                self.sprite_animations.remove(entity);
            }
            _ => {}
        }
    }

    fn clear_all_components(&mut self, entity: Entity) {
        self.transforms.remove(entity);
        self.physics.remove(entity);
        self.colliders.remove(entity);
        self.collider_events.remove(entity);
        self.moving_platforms.remove(entity);
        self.players.remove(entity);
        self.death_tags.remove(entity);
        self.movement_starts.remove(entity);
        self.movement_stops.remove(entity);
        self.checkpoints.remove(entity);
        self.drawables.remove(entity);
        self.sprites.remove(entity);
        self.sprite_animations.remove(entity);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Component registrations
// =============================================================================

macro_rules! impl_component {
    ($type:ty, $id:expr, $field:ident) => {
        impl Component for $type {
            const ID: ComponentId = $id;
            const MASK: ComponentMask = 1 << $id;

            fn storage(registry: &Registry) -> &ComponentStorage<Self> {
                &registry.$field
            }

            fn storage_mut(registry: &mut Registry) -> &mut ComponentStorage<Self> {
                &mut registry.$field
            }
        }
    };
}

impl_component!(Transform, ids::TRANSFORM, transforms);
impl_component!(Physics, ids::PHYSICS, physics);
impl_component!(Collider, ids::COLLIDER, colliders);
impl_component!(ColliderEvent, ids::COLLIDER_EVENT, collider_events);
impl_component!(MovingPlatform, ids::MOVING_PLATFORM, moving_platforms);
impl_component!(Player, ids::PLAYER, players);
impl_component!(DeathTag, ids::DEATH_TAG, death_tags);
impl_component!(StartMovement, ids::START_MOVEMENT, movement_starts);
impl_component!(StopMovement, ids::STOP_MOVEMENT, movement_stops);
impl_component!(Checkpoint, ids::CHECKPOINT, checkpoints);
impl_component!(Drawable, ids::DRAWABLE, drawables);
impl_component!(Sprite, ids::SPRITE, sprites);
impl_component!(SpriteAnimation, ids::SPRITE_ANIMATION, sprite_animations);
