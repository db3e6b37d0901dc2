use std::fmt;
use std::rc::Rc;

use crate::listeners::ListenerList;
use crate::scores::Leaderboard;

pub const WINDOW_BLUR: &str = "windowBlur";
pub const SAVE_SCORE: &str = "saveScore";
pub const GET_SCORES: &str = "getScores";
pub const RECEIVE_SCORES: &str = "receiveScores";

/// A named one-directional conduit between the embedded application and its
/// host. Clones share the same subscriber list.
pub struct Port<T> {
    listeners: Rc<ListenerList<T>>,
}

impl<T: 'static> Port<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            listeners: Rc::new(ListenerList::new(name)),
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) {
        self.listeners.push(callback);
    }

    /// Deliver `value` to every subscriber synchronously. Returns the number
    /// of subscribers that ran.
    pub fn send(&self, value: T) -> usize {
        self.listeners.dispatch(&value)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: 'static> fmt::Debug for Port<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

/// Ports an embedded application exposes to its host.
///
/// `window_blur` and `receive_scores` flow host → app, `save_score` and
/// `get_scores` flow app → host.
#[derive(Clone, Debug)]
pub struct AppPorts {
    pub window_blur: Port<String>,
    pub save_score: Port<(String, i64)>,
    pub get_scores: Port<()>,
    pub receive_scores: Port<Leaderboard>,
}

impl Default for AppPorts {
    fn default() -> Self {
        Self {
            window_blur: Port::new(WINDOW_BLUR),
            save_score: Port::new(SAVE_SCORE),
            get_scores: Port::new(GET_SCORES),
            receive_scores: Port::new(RECEIVE_SCORES),
        }
    }
}
