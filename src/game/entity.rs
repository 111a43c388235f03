//! Entities and the generational allocator.
//!
//! An entity is a slot index plus a generation counter. Freed slots are
//! reused with a bumped generation, so a stale handle held by another
//! component (a platform's rider, a transform's parent) can never be
//! mistaken for the entity that now occupies the slot.

use serde::{Deserialize, Serialize};

/// Handle to a simulation entity.
///
/// Two handles with the same index but different generations refer to
/// different entities. Always check liveness through the registry before
/// trusting a handle stored inside a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot this handle was created for.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Sentinel for "no entity". Used by components that hold an optional
    /// relation (parent, rider, supporting platform).
    pub const NULL: Entity = Entity {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity slots and tracks which handles are still live.
pub struct EntityAllocator {
    /// Current generation per slot. Bumped when the slot is freed.
    generations: Vec<u32>,
    /// Whether the slot currently holds a live entity.
    occupied: Vec<bool>,
    /// Freed slots available for reuse.
    free: Vec<u32>,
    live: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            occupied: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a fresh entity, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.occupied[slot] = true;
            return Entity::new(index, self.generations[slot]);
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.occupied.push(true);
        Entity::new(index, 0)
    }

    /// Free an entity's slot. Returns false if the handle was already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = entity.index as usize;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.occupied[slot] = false;
        self.free.push(entity.index);
        self.live -= 1;
        true
    }

    /// A handle is alive when its slot is occupied and the generations match.
    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let slot = entity.index as usize;
        slot < self.generations.len()
            && self.occupied[slot]
            && self.generations[slot] == entity.generation
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Iterate all currently live entities.
    pub fn iter_live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.occupied
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(slot, _)| Entity::new(slot as u32, self.generations[slot]))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_free() {
        let mut allocator = EntityAllocator::new();

        let a = allocator.allocate();
        let b = allocator.allocate();
        assert!(allocator.is_alive(a));
        assert!(allocator.is_alive(b));
        assert_eq!(allocator.live_count(), 2);

        assert!(allocator.free(a));
        assert!(!allocator.is_alive(a));
        assert!(allocator.is_alive(b));
        assert_eq!(allocator.live_count(), 1);

        // Double free is rejected.
        assert!(!allocator.free(a));
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut allocator = EntityAllocator::new();

        let first = allocator.allocate();
        allocator.free(first);

        let second = allocator.allocate();
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());

        // The stale handle stays dead even though the slot is live again.
        assert!(!allocator.is_alive(first));
        assert!(allocator.is_alive(second));
    }

    #[test]
    fn null_is_never_alive() {
        let allocator = EntityAllocator::new();
        assert!(Entity::NULL.is_null());
        assert!(!allocator.is_alive(Entity::NULL));
    }

    #[test]
    fn iter_live_skips_freed_slots() {
        let mut allocator = EntityAllocator::new();
        let a = allocator.allocate();
        let b = allocator.allocate();
        let c = allocator.allocate();
        allocator.free(b);

        let live: Vec<Entity> = allocator.iter_live().collect();
        assert_eq!(live, vec![a, c]);
    }
}
