// ── Public adapter events ──
//
// Re-emitted, renamed counterparts of the transport events. The
// device/streaming family takes hyphenated public names; the rest keep
// the transport spelling. Payloads are shared via `Arc` with the
// derived-state fields they also land in.

use std::fmt;
use std::sync::Arc;

use leaplink_api::{DeviceInfo, Frame, Gesture, ProtocolInfo};

/// Events the adapter emits to the host, one per transport event.
#[derive(Debug, Clone)]
pub enum AdapterEvent {
    /// The host application lost focus.
    Blur,
    /// The controller established its session against the service.
    Connect,
    /// A device was plugged in or turned on.
    DeviceAttached(Arc<DeviceInfo>),
    /// A device came online (plugged in, or tracking unpaused).
    DeviceConnected(Arc<DeviceInfo>),
    /// A device went offline (unplugged, or tracking paused).
    DeviceDisconnected(Arc<DeviceInfo>),
    /// A device was unplugged or turned off.
    DeviceRemoved(Arc<DeviceInfo>),
    /// A device stopped providing data.
    DeviceStopped(Arc<DeviceInfo>),
    /// A device started providing data.
    DeviceStreaming(Arc<DeviceInfo>),
    /// The controller's session against the service ended.
    Disconnect,
    /// The host application gained focus.
    Focus,
    /// A frame of tracking data.
    Frame(Arc<Frame>),
    /// A frame of data has been fully constructed; service timestamp in
    /// milliseconds.
    FrameEnd(i64),
    /// A gesture update, with the frame it was detected in.
    Gesture {
        gesture: Arc<Gesture>,
        frame: Arc<Frame>,
    },
    /// Protocol negotiation completed, with the frame current at the
    /// time.
    Protocol {
        protocol: Arc<ProtocolInfo>,
        frame: Arc<Frame>,
    },
    /// The service started providing data.
    StreamingStarted(Arc<DeviceInfo>),
    /// The service stopped providing data.
    StreamingStopped(Arc<DeviceInfo>),
}

impl AdapterEvent {
    /// Public event name: hyphenated for the device/streaming family,
    /// the transport spelling for the rest.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Connect => "connect",
            Self::DeviceAttached(_) => "device-attached",
            Self::DeviceConnected(_) => "device-connected",
            Self::DeviceDisconnected(_) => "device-disconnected",
            Self::DeviceRemoved(_) => "device-removed",
            Self::DeviceStopped(_) => "device-stopped",
            Self::DeviceStreaming(_) => "device-streaming",
            Self::Disconnect => "disconnect",
            Self::Focus => "focus",
            Self::Frame(_) => "frame",
            Self::FrameEnd(_) => "frameEnd",
            Self::Gesture { .. } => "gesture",
            Self::Protocol { .. } => "protocol",
            Self::StreamingStarted(_) => "streaming-started",
            Self::StreamingStopped(_) => "streaming-stopped",
        }
    }
}

impl fmt::Display for AdapterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
