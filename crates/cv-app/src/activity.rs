//! Session activity shown in the status bar, fed by the event bus

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use cv_core::events::events::{
    ChartSelected, DatasetLoaded, DatasetRejected, DetectionCompleted, ModeChanged, SessionReset,
    StaleResultDiscarded,
};
use cv_core::events::{handler_from_fn, Event};
use cv_core::{AppMode, EventBus};

const MAX_ENTRIES: usize = 50;

#[derive(Clone, Default)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<String>>>,
}

impl ActivityLog {
    /// Subscribe to every session event on `bus`
    pub fn attach(&self, bus: &EventBus) {
        self.on::<DatasetLoaded>(bus, |e| {
            format!("Loaded {} (~{} rows, {} columns)", e.file_name, e.estimated_row_count, e.column_count)
        });
        self.on::<DatasetRejected>(bus, |e| format!("Could not read {}: {}", e.file_name, e.error));
        self.on::<ModeChanged>(bus, |e| match e.mode {
            AppMode::Upload => "Exploring CSV".to_string(),
            AppMode::Detect => "Detecting chart from image".to_string(),
        });
        self.on::<ChartSelected>(bus, |e| format!("Showing {}", e.chart_type.label()));
        self.on::<DetectionCompleted>(bus, |e| format!("Detected {} ({}%)", e.chart_type, e.confidence));
        self.on::<StaleResultDiscarded>(bus, |e| format!("Ignored outdated result {}", e.generation));
        self.on::<SessionReset>(bus, |_| "Session reset".to_string());
    }

    fn on<E: Event>(&self, bus: &EventBus, describe: fn(&E) -> String) {
        let entries = self.entries.clone();
        bus.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                let mut entries = entries.lock();
                if entries.len() == MAX_ENTRIES {
                    entries.pop_front();
                }
                entries.push_back(describe(event));
            }
        }));
    }

    /// Add a message that did not come from the event bus
    pub fn push(&self, message: impl Into<String>) {
        let mut entries = self.entries.lock();
        if entries.len() == MAX_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(message.into());
    }

    /// Newest entry first
    pub fn recent(&self, count: usize) -> Vec<String> {
        self.entries.lock().iter().rev().take(count).cloned().collect()
    }
}
