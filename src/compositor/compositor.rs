use crate::{
    compositor::{
        arena::{EntityArena, EntityHandle},
        layer::LayerName,
    },
    entity::model::Entity,
    render::surface::Surface,
};

/// Owns every live entity and the seven insertion-ordered layer buckets.
///
/// Rendering walks [`LayerName::ALL`] in order and each bucket in insertion
/// order, so the painted order never depends on when layers were filled.
#[derive(Debug, Default)]
pub struct LayerCompositor {
    entities: EntityArena,
    layers: [Vec<EntityHandle>; LayerName::COUNT],
}

impl LayerCompositor {
    /// Empty compositor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move an entity into the compositor's store. It is not drawn until it
    /// is added to a layer.
    pub fn spawn(&mut self, entity: Entity) -> EntityHandle {
        self.entities.insert(entity)
    }

    /// Append `handle` to `layer` unless it is already there.
    ///
    /// Returns `false` when the handle was already present.
    pub fn add_to_layer(&mut self, handle: EntityHandle, layer: LayerName) -> bool {
        let bucket = &mut self.layers[layer.index()];
        if bucket.contains(&handle) {
            return false;
        }
        bucket.push(handle);
        true
    }

    /// [`Self::add_to_layer`] with a layer named by string; unknown names
    /// are reported and ignored.
    pub fn add_to_named_layer(&mut self, handle: EntityHandle, layer: &str) -> bool {
        match layer.parse::<LayerName>() {
            Ok(layer) => self.add_to_layer(handle, layer),
            Err(err) => {
                tracing::warn!(%err, "add_to_layer ignored");
                false
            }
        }
    }

    /// Remove the first occurrence of `handle` from `layer`.
    pub fn remove_from_layer(&mut self, handle: EntityHandle, layer: LayerName) -> bool {
        let bucket = &mut self.layers[layer.index()];
        match bucket.iter().position(|h| *h == handle) {
            Some(pos) => {
                bucket.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty one layer. Entities stay alive and can be re-added.
    pub fn clear_layer(&mut self, layer: LayerName) {
        self.layers[layer.index()].clear();
    }

    /// Empty every layer and release every entity.
    pub fn clear_all(&mut self) {
        for bucket in &mut self.layers {
            bucket.clear();
        }
        self.entities.clear();
    }

    /// Handles in `layer`, in insertion order.
    pub fn layer(&self, layer: LayerName) -> &[EntityHandle] {
        &self.layers[layer.index()]
    }

    /// Total number of layer slots in use across all layers.
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Whether every layer is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Look up a live entity.
    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle)
    }

    /// Mutable lookup of a live entity.
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle)
    }

    /// Entities in `layer` that are still alive, in insertion order.
    pub fn entities_in(&self, layer: LayerName) -> impl Iterator<Item = &Entity> + '_ {
        self.layers[layer.index()]
            .iter()
            .filter_map(|h| self.entities.get(*h))
    }

    /// Paint every layer in fixed order. Stale handles are skipped.
    pub fn render(&self, surface: &mut dyn Surface) {
        for layer in LayerName::ALL {
            for entity in self.entities_in(layer) {
                entity.render(surface);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/compositor.rs"]
mod tests;
