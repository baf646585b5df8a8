// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Change notifications emitted by the consistency rebuild

use std::fmt;

/// Summary value that changed during a rebuild
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshEvent {
    ScaleChanged { previous: f64, current: f64 },
    MinEdgeLengthChanged { previous: f64, current: f64 },
}

/// Token returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&MeshEvent)>;

/// Synchronous in-process observers
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    callbacks: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn subscribe(&mut self, callback: impl FnMut(&MeshEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(listener, _)| *listener != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &MeshEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

// Callbacks belong to whoever subscribed them; a cloned mesh starts without any.
impl Clone for Listeners {
    fn clone(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_notify_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();

        let sink = Rc::clone(&seen);
        let id = listeners.subscribe(move |event| sink.borrow_mut().push(*event));

        let event = MeshEvent::ScaleChanged {
            previous: 1.0,
            current: 2.0,
        };
        listeners.notify(&event);
        assert_eq!(seen.borrow().as_slice(), &[event]);

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify(&event);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_clone_drops_callbacks() {
        let mut listeners = Listeners::default();
        listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 1);
        assert!(listeners.clone().is_empty());
    }
}
