use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Session-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Session events published by the state dispatcher
pub mod events {
    use super::Event;
    use crate::chart_type::ChartType;
    use crate::state::{AppMode, Generation};

    /// A profiled upload became the current dataset
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub file_name: String,
        pub estimated_row_count: u64,
        pub column_count: usize,
    }

    /// Profiling an upload failed
    #[derive(Debug, Clone)]
    pub struct DatasetRejected {
        pub file_name: String,
        pub error: String,
    }

    /// The user switched between exploring a CSV and detecting a chart
    #[derive(Debug, Clone)]
    pub struct ModeChanged {
        pub mode: AppMode,
    }

    /// The user picked a chart family
    #[derive(Debug, Clone)]
    pub struct ChartSelected {
        pub chart_type: ChartType,
    }

    /// A detection result was accepted
    #[derive(Debug, Clone)]
    pub struct DetectionCompleted {
        pub chart_type: String,
        pub confidence: u8,
    }

    /// An async result arrived after a newer request superseded it
    #[derive(Debug, Clone)]
    pub struct StaleResultDiscarded {
        pub generation: Generation,
        pub current: Option<Generation>,
    }

    /// Everything was cleared
    #[derive(Debug, Clone)]
    pub struct SessionReset;

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetRejected,
        ModeChanged,
        ChartSelected,
        DetectionCompleted,
        StaleResultDiscarded,
        SessionReset
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
