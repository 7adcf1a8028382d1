// ── Transport events and payloads ──
//
// The sixteen events a controller emits over its lifetime, with the
// payload types the tracking service attaches to them. Payload structs
// model the identifying fields and capture everything else in a
// `#[serde(flatten)]` extra, so nothing from the service is silently
// dropped — frame and gesture decoding beyond the header is the
// consumer's concern.

use serde::{Deserialize, Serialize};

/// Device description delivered with the device lifecycle events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Service-assigned device identifier.
    #[serde(default)]
    pub id: String,

    /// Device model, e.g. `"peripheral"`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Whether the device is physically attached, as reported by the
    /// service alongside the event.
    #[serde(default)]
    pub attached: bool,

    /// Whether the device is streaming data, as reported by the service
    /// alongside the event.
    #[serde(default)]
    pub streaming: bool,

    /// All remaining fields the service sends.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// One unit of tracking data, delivered per update tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Monotonic frame counter.
    #[serde(default)]
    pub id: i64,

    /// Service timestamp in microseconds.
    #[serde(default)]
    pub timestamp: i64,

    /// Hands, pointables, and whatever else the service packed into the
    /// frame. Decoding is left to the consumer.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// A recognized motion pattern, delivered alongside the frame in which
/// it was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    #[serde(default)]
    pub id: i64,

    /// Gesture class: `"circle"`, `"swipe"`, `"keyTap"`, `"screenTap"`.
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Gesture phase: `"start"`, `"update"`, or `"stop"`.
    #[serde(default)]
    pub state: String,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Result of the protocol negotiation between controller and service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    /// Negotiated protocol generation.
    #[serde(default)]
    pub version: u32,

    /// Service build version, when the service reports one.
    #[serde(default)]
    pub service_version: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// The sixteen events a controller emits over its lifetime.
///
/// Delivered in emission order for a single controller instance.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The host application lost focus.
    Blur,
    /// The controller established its session against the service.
    Connect,
    /// A device was plugged in or turned on.
    DeviceAttached(DeviceInfo),
    /// A device came online (plugged in, or tracking unpaused).
    DeviceConnected(DeviceInfo),
    /// A device went offline (unplugged, or tracking paused).
    DeviceDisconnected(DeviceInfo),
    /// A device was unplugged or turned off.
    DeviceRemoved(DeviceInfo),
    /// A device stopped providing data.
    DeviceStopped(DeviceInfo),
    /// A device started providing data.
    DeviceStreaming(DeviceInfo),
    /// The controller's session against the service ended.
    Disconnect,
    /// The host application gained focus.
    Focus,
    /// A frame of tracking data.
    Frame(Frame),
    /// A frame of data has been fully constructed. Carries the
    /// service timestamp in milliseconds.
    FrameEnd(i64),
    /// A gesture update, with the frame it was detected in.
    Gesture { gesture: Gesture, frame: Frame },
    /// Protocol negotiation completed, with the frame current at the
    /// time.
    Protocol { protocol: ProtocolInfo, frame: Frame },
    /// The service started providing data.
    StreamingStarted(DeviceInfo),
    /// The service stopped providing data.
    StreamingStopped(DeviceInfo),
}

impl TransportEvent {
    /// Transport-side event name, as the wire protocol spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Connect => "connect",
            Self::DeviceAttached(_) => "deviceAttached",
            Self::DeviceConnected(_) => "deviceConnected",
            Self::DeviceDisconnected(_) => "deviceDisconnected",
            Self::DeviceRemoved(_) => "deviceRemoved",
            Self::DeviceStopped(_) => "deviceStopped",
            Self::DeviceStreaming(_) => "deviceStreaming",
            Self::Disconnect => "disconnect",
            Self::Focus => "focus",
            Self::Frame(_) => "frame",
            Self::FrameEnd(_) => "frameEnd",
            Self::Gesture { .. } => "gesture",
            Self::Protocol { .. } => "protocol",
            Self::StreamingStarted(_) => "streamingStarted",
            Self::StreamingStopped(_) => "streamingStopped",
        }
    }
}
