//! Handler registry for dispatching events to subscribed handlers

use super::traits::{Event, EventHandler};
use crate::error::Result;
use crate::train::state::EngineState;

/// Manages subscribed handlers and dispatches events
pub struct CallbackManager {
    handlers: Vec<(Event, Box<dyn EventHandler>)>,
}

impl CallbackManager {
    /// Create new callback manager
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Subscribe a handler to an event
    pub fn add<H: EventHandler + 'static>(&mut self, event: Event, handler: H) {
        self.handlers.push((event, Box::new(handler)));
    }

    /// Subscribe an already boxed handler
    pub fn add_boxed(&mut self, event: Event, handler: Box<dyn EventHandler>) {
        self.handlers.push((event, handler));
    }

    /// Check if no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Get number of handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Number of handlers subscribed to `event`
    pub fn count_for(&self, event: Event) -> usize {
        self.handlers.iter().filter(|(e, _)| *e == event).count()
    }

    /// Fire `event`, running its handlers in registration order.
    ///
    /// The first failing handler aborts dispatch; later handlers do not run.
    pub fn fire(&mut self, event: Event, state: &mut EngineState) -> Result<()> {
        for (subscribed, handler) in &mut self.handlers {
            if *subscribed != event {
                continue;
            }
            tracing::trace!(event = %event, handler = handler.name(), "dispatch");
            handler.handle(state)?;
        }
        Ok(())
    }
}

impl Default for CallbackManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl EventHandler {
        let log = Rc::clone(log);
        move |_: &mut EngineState| -> Result<()> {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    #[test]
    fn test_callback_manager_len_and_empty() {
        let mut manager = CallbackManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);

        manager.add(Event::Started, |_: &mut EngineState| -> Result<()> { Ok(()) });
        assert!(!manager.is_empty());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.count_for(Event::Started), 1);
        assert_eq!(manager.count_for(Event::Completed), 0);
    }

    #[test]
    fn test_dispatch_only_to_subscribers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = CallbackManager::new();
        manager.add(Event::IterationCompleted, recorder(&log, "a"));
        manager.add(Event::EpochCompleted, recorder(&log, "epoch"));
        manager.add(Event::IterationCompleted, recorder(&log, "b"));

        let mut state = EngineState::new();
        manager.fire(Event::IterationCompleted, &mut state).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b"]);

        manager.fire(Event::EpochCompleted, &mut state).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b", "epoch"]);
    }

    #[test]
    fn test_error_stops_dispatch() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = CallbackManager::new();
        manager.add(Event::Completed, |_: &mut EngineState| -> Result<()> {
            Err(Error::missing("metric 'loss' not found in engine state"))
        });
        manager.add(Event::Completed, recorder(&log, "after"));

        let err = manager.fire(Event::Completed, &mut EngineState::new()).unwrap_err();
        assert!(matches!(err, Error::MissingData(_)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_callback_manager_default() {
        let manager = CallbackManager::default();
        assert!(manager.is_empty());
    }
}
