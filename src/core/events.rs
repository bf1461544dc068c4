use crate::{
    core::geo::LatLng,
    layers::base::{LayerId, LayerKind},
    prelude::{HashMap, VecDeque},
};

/// Things that happened to the map, drained by `Map::process_events`
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    ViewChanged { center: LatLng, zoom: f64 },
    LayerAdd { layer_id: LayerId, kind: LayerKind },
    LayerRemove { layer_id: LayerId, kind: LayerKind },
}

impl MapEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::LayerRemove { .. } => "layerremove",
        }
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent)>;

/// Queues map events and fans them out to listeners on demand
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Runs listeners for every queued event and returns the events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn test_listeners_only_see_their_type() {
        let mut events = EventManager::new();
        let adds = Rc::new(Cell::new(0));

        let counter = Rc::clone(&adds);
        events.on("layeradd", move |_| counter.set(counter.get() + 1));

        events.emit(MapEvent::LayerAdd {
            layer_id: LayerId::UNASSIGNED,
            kind: LayerKind::Marker,
        });
        events.emit(MapEvent::ViewChanged {
            center: LatLng::new(0.0, 0.0),
            zoom: 3.0,
        });
        assert_eq!(events.pending_events(), 2);

        let processed = events.process_events();
        assert_eq!(processed.len(), 2);
        assert_eq!(adds.get(), 1);
        assert_eq!(events.pending_events(), 0);
    }
}
