//! Component trait and per-type sparse storage.
//!
//! Every component type carries a compile-time id; group membership is a
//! bitmask over those ids, so "all entities having A and B" is a single
//! mask comparison maintained as components are added and removed.
//!
//! Storage is a sparse array indexed by entity slot. At this game's scale
//! (a few hundred entities) sparse vectors beat archetype shuffling in
//! simplicity and are plenty fast.

use super::entity::Entity;
use super::registry::Registry;

/// Compile-time identifier of a component type (a bit position in
/// [`ComponentMask`]).
pub type ComponentId = u8;

/// Bitmask over component ids; a group's type set is one of these.
pub type ComponentMask = u64;

/// Component ids, one bit each. New component types get the next free bit.
pub mod ids {
    use super::ComponentId;

    pub const TRANSFORM: ComponentId = 0;
    pub const PHYSICS: ComponentId = 1;
    pub const COLLIDER: ComponentId = 2;
    pub const COLLIDER_EVENT: ComponentId = 3;
    pub const MOVING_PLATFORM: ComponentId = 4;
    pub const PLAYER: ComponentId = 5;
    pub const DEATH_TAG: ComponentId = 6;
    pub const START_MOVEMENT: ComponentId = 7;
    pub const STOP_MOVEMENT: ComponentId = 8;
    pub const CHECKPOINT: ComponentId = 9;
    pub const DRAWABLE: ComponentId = 10;
    pub const SPRITE: ComponentId = 11;
    pub const SPRITE_ANIMATION: ComponentId = 12;

    pub const COUNT: usize = 13;
}

/// A plain-data component attachable to entities.
///
/// Implementations live next to the registry so the storage accessors can
/// name its typed fields.
pub trait Component: Sized + 'static {
    const ID: ComponentId;
    /// Bit of this component in an entity's mask; always `1 << Self::ID`.
    const MASK: ComponentMask;

    fn storage(registry: &Registry) -> &ComponentStorage<Self>;
    fn storage_mut(registry: &mut Registry) -> &mut ComponentStorage<Self>;
}

/// Sparse storage for one component type, indexed by entity slot.
///
/// Slots are addressed by `Entity::index()` only; the registry is
/// responsible for checking liveness before handing out references, and for
/// clearing slots when entities are destroyed.
pub struct ComponentStorage<T> {
    slots: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn grow_to(&mut self, slot: usize) {
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
    }

    /// Insert a component, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let slot = entity.index() as usize;
        self.grow_to(slot);
        self.slots[slot] = Some(component);
    }

    /// Take the component out of an entity's slot.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.slots.get_mut(entity.index() as usize)?.take()
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.index() as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.index() as usize)?.as_mut()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        matches!(self.slots.get(entity.index() as usize), Some(Some(_)))
    }

    /// Occupied slots as (slot index, component) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.as_ref().map(|v| (slot as u32, v)))
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
