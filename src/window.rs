use std::collections::HashMap;

use winit::event::WindowEvent;

use crate::listeners::ListenerList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    Blur,
    Focus,
}

impl WindowEventKind {
    pub fn name(self) -> &'static str {
        match self {
            WindowEventKind::Blur => "blur",
            WindowEventKind::Focus => "focus",
        }
    }
}

/// Event target for the native window hosting the page.
pub struct HostWindow {
    listeners: HashMap<WindowEventKind, ListenerList<()>>,
}

impl Default for HostWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HostWindow {
    pub fn new() -> Self {
        let listeners = [WindowEventKind::Blur, WindowEventKind::Focus]
            .into_iter()
            .map(|kind| (kind, ListenerList::new(kind.name())))
            .collect();
        Self { listeners }
    }

    pub fn add_event_listener(&self, kind: WindowEventKind, mut listener: impl FnMut() + 'static) {
        if let Some(list) = self.listeners.get(&kind) {
            list.push(move |_: &()| listener());
        }
    }

    /// Run every listener for `kind`. Returns how many ran.
    pub fn dispatch(&self, kind: WindowEventKind) -> usize {
        match self.listeners.get(&kind) {
            Some(list) => list.dispatch(&()),
            None => 0,
        }
    }

    /// Translate a native window event and dispatch it. Returns the kind
    /// dispatched, if the event maps to one.
    pub fn handle_window_event(&self, event: &WindowEvent) -> Option<WindowEventKind> {
        let kind = match event {
            WindowEvent::Focused(false) => WindowEventKind::Blur,
            WindowEvent::Focused(true) => WindowEventKind::Focus,
            _ => return None,
        };
        self.dispatch(kind);
        Some(kind)
    }

    pub fn listener_count(&self, kind: WindowEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, |list| list.len())
    }
}
