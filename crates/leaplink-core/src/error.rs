// ── Adapter errors ──
//
// The adapter is a pass-through: connection failures, malformed frames,
// and protocol trouble stay with the controller implementation and are
// signaled through its event stream (or its silence). The only failure
// owned here is driving a controller that does not exist.

use thiserror::Error;

/// Errors surfaced by [`LeapAdapter`](crate::LeapAdapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// `connect`/`disconnect` was called before any controller was
    /// created. Enable `auto` or call
    /// [`create_controller`](crate::LeapAdapter::create_controller)
    /// first.
    #[error("no active controller")]
    NoController,
}
