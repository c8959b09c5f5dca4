//! Page navigation seam used after a successful submission.

use std::cell::RefCell;
use std::rc::Rc;

/// Moves the browser to another location.
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// Navigator that records targets instead of leaving the page.
///
/// Clones share the same history, so the host can keep one clone and hand
/// the other to the context.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets navigated to, oldest first.
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn last_visit(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, target: &str) {
        self.visits.borrow_mut().push(target.to_string());
    }
}
