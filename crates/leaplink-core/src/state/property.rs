// ── Observable property cell ──
//
// A single watch-backed value: read it, overwrite it, or subscribe to
// change notification. `send_modify` updates unconditionally, even with
// zero subscribers.

use tokio::sync::watch;

/// One observable value. Writes are crate-internal; hosts read and
/// subscribe.
pub struct Property<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    pub(crate) fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Overwrite the value and notify subscribers.
    pub(crate) fn set(&self, value: T) {
        self.tx.send_modify(|v| *v = value);
    }

    /// Subscribe to value changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}
