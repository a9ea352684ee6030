//! Host session: one workspace and the bus its events travel on.

use crate::events::EventBus;
use crate::workspace::Workspace;
use std::cell::RefCell;
use std::rc::Rc;

/// A host session.
///
/// The workspace is shared with widgets, which read it from their
/// listeners. Listeners run from [`Session::dispatch`], after the
/// mutation that produced the event has released the workspace.
pub struct Session {
    workspace: Rc<RefCell<Workspace>>,
    bus: EventBus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with an empty workspace.
    pub fn new() -> Self {
        let bus = EventBus::new();
        let workspace = Rc::new(RefCell::new(Workspace::new(bus.publisher())));
        Self { workspace, bus }
    }

    /// Returns the shared workspace.
    pub fn workspace(&self) -> &Rc<RefCell<Workspace>> {
        &self.workspace
    }

    /// Returns the session bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Delivers queued events. Returns the number of events drained.
    pub fn dispatch(&self) -> usize {
        self.bus.dispatch_pending()
    }

    /// Ends the session, detaching every listener.
    pub fn close(&mut self) {
        if !self.bus.is_closed() {
            log::info!("Closing session");
            self.bus.close();
        }
    }

    /// Returns whether the session was closed.
    pub fn is_closed(&self) -> bool {
        self.bus.is_closed()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use std::cell::Cell;

    #[test]
    fn test_workspace_events_reach_listeners() {
        let session = Session::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let _sub = session
            .bus()
            .subscribe(Topic::FileEditorSelection, move |_| counter.set(counter.get() + 1));

        session.workspace().borrow_mut().open_text("a", "");
        session.workspace().borrow_mut().open_text("b", "");
        assert_eq!(session.dispatch(), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = Session::new();
        let _sub = session.bus().subscribe(Topic::DocumentEdits, |_| {});
        session.close();
        session.close();
        assert!(session.is_closed());
        assert_eq!(session.bus().listener_count(), 0);
    }
}
