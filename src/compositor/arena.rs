use crate::entity::model::Entity;

/// Stable, generation-checked reference to an entity in an [`EntityArena`].
///
/// Handles compare by identity: two entities with identical contents have
/// different handles, and a handle goes stale once its slot is released.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    /// Slot index (diagnostics only).
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation (diagnostics only).
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Generational slot storage for entities.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Option<Entity>>,
    generations: Vec<u32>,
    free: Vec<usize>,
}

impl EntityArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity and return its handle, reusing a freed slot if any.
    pub fn insert(&mut self, entity: Entity) -> EntityHandle {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(entity);
            return EntityHandle {
                index: index as u32,
                generation: self.generations[index],
            };
        }

        let index = self.slots.len();
        self.slots.push(Some(entity));
        self.generations.push(0);
        EntityHandle {
            index: index as u32,
            generation: 0,
        }
    }

    fn live_index(&self, handle: EntityHandle) -> Option<usize> {
        let index = handle.index as usize;
        (index < self.slots.len()
            && self.generations[index] == handle.generation
            && self.slots[index].is_some())
        .then_some(index)
    }

    /// Look up an entity; `None` for stale handles.
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        let index = self.live_index(handle)?;
        self.slots[index].as_ref()
    }

    /// Mutable lookup; `None` for stale handles.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        let index = self.live_index(handle)?;
        self.slots[index].as_mut()
    }

    /// Release a slot, bumping its generation so old handles go stale.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<Entity> {
        let index = self.live_index(handle)?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(index);
        self.slots[index].take()
    }

    /// Whether `handle` still refers to a live entity.
    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.live_index(handle).is_some()
    }

    /// Release every slot. All outstanding handles go stale.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].take().is_some() {
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no entity is live.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/arena.rs"]
mod tests;
