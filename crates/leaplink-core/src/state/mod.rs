// ── Derived adapter state ──
//
// The host-readable fields the adapter maintains from the controller's
// event stream. Each field holds the value implied by the most recent
// relevant event, nothing else: the four device-presence booleans
// (attached, connected, streaming, focus) move independently and are
// never coupled to each other or to the session state.

mod apply;
mod property;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use leaplink_api::{DeviceInfo, Frame, Gesture, ProtocolInfo};

pub use property::Property;

/// Derived, host-readable state; written only by the adapter's event
/// relay. Every field is individually observable.
pub struct DerivedState {
    pub(crate) connected: Property<bool>,
    pub(crate) streaming: Property<bool>,
    pub(crate) is_device_attached: Property<bool>,
    pub(crate) is_device_connected: Property<bool>,
    pub(crate) is_device_streaming: Property<bool>,
    pub(crate) is_focus: Property<bool>,
    pub(crate) last_device_info: Property<Option<Arc<DeviceInfo>>>,
    pub(crate) last_frame: Property<Option<Arc<Frame>>>,
    pub(crate) last_frame_end: Property<i64>,
    pub(crate) last_gesture: Property<Option<Arc<Gesture>>>,
    pub(crate) last_protocol: Property<Option<Arc<ProtocolInfo>>>,
    pub(crate) last_event_at: Property<Option<DateTime<Utc>>>,
}

impl DerivedState {
    pub(crate) fn new() -> Self {
        Self {
            connected: Property::new(false),
            streaming: Property::new(false),
            is_device_attached: Property::new(false),
            is_device_connected: Property::new(false),
            is_device_streaming: Property::new(false),
            is_focus: Property::new(false),
            last_device_info: Property::new(None),
            last_frame: Property::new(None),
            last_frame_end: Property::new(0),
            last_gesture: Property::new(None),
            last_protocol: Property::new(None),
            last_event_at: Property::new(None),
        }
    }

    // ── Current values ───────────────────────────────────────────────

    /// Whether the controller session is open.
    pub fn connected(&self) -> bool {
        self.connected.get()
    }

    /// Whether tracking data is flowing.
    pub fn streaming(&self) -> bool {
        self.streaming.get()
    }

    /// Whether a device is physically attached.
    pub fn is_device_attached(&self) -> bool {
        self.is_device_attached.get()
    }

    /// Whether a device is online (tracking not paused).
    pub fn is_device_connected(&self) -> bool {
        self.is_device_connected.get()
    }

    /// Whether a device is providing data.
    pub fn is_device_streaming(&self) -> bool {
        self.is_device_streaming.get()
    }

    /// Whether the host application has focus.
    pub fn is_focus(&self) -> bool {
        self.is_focus.get()
    }

    /// Payload of the most recent device lifecycle event.
    pub fn last_device_info(&self) -> Option<Arc<DeviceInfo>> {
        self.last_device_info.get()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<Arc<Frame>> {
        self.last_frame.get()
    }

    /// Timestamp of the most recent frame-end signal (milliseconds).
    pub fn last_frame_end(&self) -> i64 {
        self.last_frame_end.get()
    }

    /// Most recent gesture.
    pub fn last_gesture(&self) -> Option<Arc<Gesture>> {
        self.last_gesture.get()
    }

    /// Most recent protocol negotiation result.
    pub fn last_protocol(&self) -> Option<Arc<ProtocolInfo>> {
        self.last_protocol.get()
    }

    /// When the most recent transport event was processed, or `None`
    /// before the first one.
    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_at.get()
    }

    /// How long ago the last transport event arrived.
    pub fn event_age(&self) -> Option<chrono::Duration> {
        self.last_event_at().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    pub fn watch_streaming(&self) -> watch::Receiver<bool> {
        self.streaming.subscribe()
    }

    pub fn watch_device_attached(&self) -> watch::Receiver<bool> {
        self.is_device_attached.subscribe()
    }

    pub fn watch_device_connected(&self) -> watch::Receiver<bool> {
        self.is_device_connected.subscribe()
    }

    pub fn watch_device_streaming(&self) -> watch::Receiver<bool> {
        self.is_device_streaming.subscribe()
    }

    pub fn watch_focus(&self) -> watch::Receiver<bool> {
        self.is_focus.subscribe()
    }

    pub fn watch_device_info(&self) -> watch::Receiver<Option<Arc<DeviceInfo>>> {
        self.last_device_info.subscribe()
    }

    pub fn watch_frame(&self) -> watch::Receiver<Option<Arc<Frame>>> {
        self.last_frame.subscribe()
    }

    pub fn watch_frame_end(&self) -> watch::Receiver<i64> {
        self.last_frame_end.subscribe()
    }

    pub fn watch_gesture(&self) -> watch::Receiver<Option<Arc<Gesture>>> {
        self.last_gesture.subscribe()
    }

    pub fn watch_protocol(&self) -> watch::Receiver<Option<Arc<ProtocolInfo>>> {
        self.last_protocol.subscribe()
    }

    pub fn watch_event_at(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_event_at.subscribe()
    }
}
