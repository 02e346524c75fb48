use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{BufferId, MaterialId, TextureId};

/// A resource some batch bucket is keyed on is about to become unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Invalidation {
    Material(MaterialId),
    VertexBuffer(BufferId),
    IndexBuffer(BufferId),
    Texture(TextureId),
}

/// Shared event buffer a queue drains at the start of each public operation.
pub(crate) type InvalidationSink = Rc<RefCell<Vec<Invalidation>>>;

struct Listener {
    sink: Weak<RefCell<Vec<Invalidation>>>,
    event: Invalidation,
}

/// Release-notification source owned by a resource. Fires at most once,
/// right before the resource stops being usable.
pub(crate) struct ReleaseSignal {
    listeners: Rc<RefCell<Vec<Option<Listener>>>>,
}

impl ReleaseSignal {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Registers a sink to receive `event` on release. Entries are
    /// append-only, so a stale slot can never detach a later subscriber.
    pub(crate) fn connect(&self, sink: &InvalidationSink, event: Invalidation) -> ReleaseSlot {
        let mut listeners = self.listeners.borrow_mut();
        let key = listeners.len();
        listeners.push(Some(Listener {
            sink: Rc::downgrade(sink),
            event,
        }));
        ReleaseSlot {
            listeners: Rc::downgrade(&self.listeners),
            key,
        }
    }

    /// Delivers the registered event to every live subscriber and empties
    /// the registry.
    pub(crate) fn notify(&self) {
        for entry in self.listeners.borrow_mut().iter_mut() {
            if let Some(listener) = entry.take() {
                if let Some(sink) = listener.sink.upgrade() {
                    sink.borrow_mut().push(listener.event);
                }
            }
        }
    }
}

/// Subscription handle held by a batch bucket; dropping it detaches the
/// bucket from the resource's release signal.
pub(crate) struct ReleaseSlot {
    listeners: Weak<RefCell<Vec<Option<Listener>>>>,
    key: usize,
}

impl Drop for ReleaseSlot {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Some(entry) = listeners.borrow_mut().get_mut(self.key) {
                *entry = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> InvalidationSink {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn notify_reaches_connected_sinks() {
        let signal = ReleaseSignal::new();
        let sink = sink();
        let event = Invalidation::Texture(TextureId::new());
        let _slot = signal.connect(&sink, event);

        signal.notify();
        assert_eq!(*sink.borrow(), vec![event]);
    }

    #[test]
    fn dropping_the_slot_disconnects() {
        let signal = ReleaseSignal::new();
        let sink = sink();
        let slot = signal.connect(&sink, Invalidation::Material(MaterialId::new()));
        drop(slot);

        signal.notify();
        assert!(sink.borrow().is_empty());
    }

    #[test]
    fn stale_slot_cannot_detach_a_later_subscriber() {
        let signal = ReleaseSignal::new();
        let sink = sink();
        let first = signal.connect(&sink, Invalidation::VertexBuffer(BufferId::new()));
        let kept = Invalidation::IndexBuffer(BufferId::new());
        let _second = signal.connect(&sink, kept);
        drop(first);

        signal.notify();
        assert_eq!(*sink.borrow(), vec![kept]);
    }

    #[test]
    fn notify_fires_at_most_once_per_slot() {
        let signal = ReleaseSignal::new();
        let sink = sink();
        let _slot = signal.connect(&sink, Invalidation::Material(MaterialId::new()));

        signal.notify();
        signal.notify();
        assert_eq!(sink.borrow().len(), 1);
    }

    #[test]
    fn dead_sink_is_skipped() {
        let signal = ReleaseSignal::new();
        let sink = sink();
        let _slot = signal.connect(&sink, Invalidation::Material(MaterialId::new()));
        drop(sink);

        // Must not panic or leak a borrow.
        signal.notify();
    }
}
