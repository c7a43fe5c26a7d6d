//! # Event Bus
//!
//! In-process publish/subscribe registry. Publishing is a direct, blocking
//! fan-out on the caller's thread: there is no queue and no unsubscribe.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lanprobe_common::event::{Event, EventKind};

/// A subscriber. Invoked concurrently from every worker that publishes.
pub type Handler = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every event of `kind`, after the handlers
    /// already registered for it.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.entry(kind).or_default().push(Arc::new(handler));
    }

    /// Hands `event` to each handler of its kind, in registration order.
    ///
    /// The first handler error stops the fan-out and is returned as-is.
    /// Handlers may publish further events from within their body.
    pub fn publish(&self, event: &Event) -> anyhow::Result<()> {
        // Cloned out so no lock is held while handlers run.
        let handlers: Vec<Handler> = {
            let table = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            table.get(&event.kind()).cloned().unwrap_or_default()
        };

        for handler in handlers {
            handler(event)?;
        }
        Ok(())
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        let table = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        table.get(&kind).map_or(0, Vec::len)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
