use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Ordered callback list that tolerates subscription and dispatch from inside
/// a running callback.
pub(crate) struct ListenerList<T> {
    name: &'static str,
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T: 'static> ListenerList<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, listener: impl FnMut(&T) + 'static) {
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every listener registered before the call, in order. Returns how
    /// many ran.
    pub(crate) fn dispatch(&self, value: &T) -> usize {
        let snapshot: Vec<Listener<T>> = self.listeners.borrow().clone();
        let mut invoked = 0;
        for listener in snapshot {
            match listener.try_borrow_mut() {
                Ok(mut callback) => {
                    (*callback)(value);
                    invoked += 1;
                }
                Err(_) => {
                    warn!(channel = self.name, "skipping re-entrant listener");
                }
            }
        }
        invoked
    }
}
