use crate::{
    layers::base::{LayerId, LayerKind, LayerTrait},
    prelude::HashMap,
};

/// Owns the layers of one map, stamping each with a fresh id
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<LayerId, Box<dyn LayerTrait>>,
    /// Layer IDs in the order they were added
    order: Vec<LayerId>,
    /// Last id handed out; ids are never reused
    last_id: u64,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            order: Vec::new(),
            last_id: 0,
        }
    }

    /// Continues numbering after `last`, so ids from an earlier map are
    /// never handed out again
    pub fn resume_after(&mut self, last: LayerId) {
        self.last_id = self.last_id.max(last.get());
    }

    /// Last id handed out, `LayerId::UNASSIGNED` before the first add
    pub fn last_id(&self) -> LayerId {
        LayerId::new(self.last_id)
    }

    /// Stamps the layer with a new id, stores it and returns the id
    pub fn add_layer(&mut self, mut layer: Box<dyn LayerTrait>) -> LayerId {
        self.last_id += 1;
        let id = LayerId::new(self.last_id);
        layer.set_id(id);

        self.layers.insert(id, layer);
        self.order.push(id);
        id
    }

    /// Removes a layer, returning it if it was present
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Box<dyn LayerTrait>> {
        let layer = self.layers.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(layer)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn get_layer(&self, id: LayerId) -> Option<&dyn LayerTrait> {
        self.layers.get(&id).map(|l| l.as_ref())
    }

    /// Layer IDs in insertion order
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.order.clone()
    }

    /// Applies a function to each layer in insertion order
    pub fn for_each_layer<F>(&self, mut f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        for id in &self.order {
            if let Some(layer) = self.layers.get(id) {
                f(layer.as_ref());
            }
        }
    }

    pub fn count_of_kind(&self, kind: LayerKind) -> usize {
        self.layers.values().filter(|l| l.kind() == kind).count()
    }

    /// Removes every layer, returning them in insertion order
    pub fn drain(&mut self) -> Vec<Box<dyn LayerTrait>> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.layers.remove(&id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, layers::marker::Marker};

    #[test]
    fn test_ids_are_stamped_in_sequence() {
        let mut manager = LayerManager::new();
        let first = manager.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        let second = manager.add_layer(Box::new(Marker::new(LatLng::new(2.0, 2.0))));

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(manager.get_layer(first).map(|l| l.id()), Some(first));
        assert_eq!(manager.layer_ids(), vec![first, second]);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut manager = LayerManager::new();
        let first = manager.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        assert!(manager.remove_layer(first).is_some());
        assert!(manager.remove_layer(first).is_none());

        let next = manager.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        assert_ne!(first, next);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_resume_after_skips_earlier_ids() {
        let mut first = LayerManager::new();
        first.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        let old = first.add_layer(Box::new(Marker::new(LatLng::new(2.0, 2.0))));
        assert_eq!(first.last_id(), old);

        let mut second = LayerManager::new();
        second.resume_after(first.last_id());
        let fresh = second.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        assert_eq!(fresh.get(), old.get() + 1);

        // resuming never moves the counter backwards
        second.resume_after(LayerId::UNASSIGNED);
        assert_eq!(second.last_id(), fresh);
    }

    #[test]
    fn test_drain_empties_manager() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(Marker::new(LatLng::new(1.0, 1.0))));
        manager.add_layer(Box::new(Marker::new(LatLng::new(2.0, 2.0))));

        assert_eq!(manager.count_of_kind(LayerKind::Marker), 2);
        assert_eq!(manager.drain().len(), 2);
        assert!(manager.is_empty());
        assert!(manager.layer_ids().is_empty());
    }
}
