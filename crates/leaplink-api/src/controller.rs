// ── Controller capability surface ──
//
// Adapters never talk to the tracking service directly; they drive
// whatever implements `TrackingController`. Implementations own the
// socket, the frame loop, and all protocol concerns. Every method is
// non-blocking: `connect`/`disconnect` are requests acknowledged
// asynchronously through the event stream, never synchronously.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::events::TransportEvent;
use crate::options::ControllerOptions;

/// One session against the tracking hardware/service.
pub trait TrackingController: Send + Sync {
    /// Ask the controller to open its session. Success is signaled by a
    /// [`TransportEvent::Connect`], never by a return value; a
    /// controller that cannot connect simply never emits it.
    fn connect(&self);

    /// Ask the controller to close its session. Acknowledged by a
    /// [`TransportEvent::Disconnect`].
    fn disconnect(&self);

    /// Whether a session to the tracking service is currently open.
    fn connected(&self) -> bool;

    /// Whether tracking data is currently flowing.
    fn streaming(&self) -> bool;

    /// Toggle background-frame delivery on the live session.
    fn set_background(&self, enabled: bool);

    /// Toggle head-mounted-display optimization on the live session.
    fn set_optimize_hmd(&self, enabled: bool);

    /// Subscribe to this controller's event stream.
    ///
    /// Events are delivered in emission order for the lifetime of this
    /// instance. A subscriber that falls behind observes
    /// [`broadcast::error::RecvError::Lagged`].
    fn subscribe(&self) -> broadcast::Receiver<Arc<TransportEvent>>;
}

/// Builds controller instances from an options bundle.
///
/// Controllers are re-created whenever their options change; the
/// factory is the seam that keeps callers ignorant of the concrete
/// transport (and the seam tests hook a mock into).
pub trait ControllerFactory: Send + Sync {
    fn create(&self, options: ControllerOptions) -> Arc<dyn TrackingController>;
}

impl<F> ControllerFactory for F
where
    F: Fn(ControllerOptions) -> Arc<dyn TrackingController> + Send + Sync,
{
    fn create(&self, options: ControllerOptions) -> Arc<dyn TrackingController> {
        self(options)
    }
}
