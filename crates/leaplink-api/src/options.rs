// ── Controller construction options ──
//
// The bundle handed to a ControllerFactory when a controller instance
// is created. These knobs are immutable for the lifetime of one
// instance; changing any of them means building a new controller.
// Only `background` and `optimize_hmd` have live setters on
// `TrackingController` as well.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default host of the tracking service (local daemon).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default WebSocket port of the tracking service.
pub const DEFAULT_PORT: u16 = 6437;

/// Wire protocol generation spoken by the tracking service endpoint.
const PROTOCOL_VERSION: u8 = 6;

/// Which loop drives `frame` event delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameLoop {
    /// Frames follow the host display refresh (typically 60 fps).
    #[default]
    AnimationFrame,
    /// Frames follow the device frame rate (20–200 fps depending on
    /// device settings and available computing power).
    DeviceFrame,
}

impl FrameLoop {
    /// The event name the tracking protocol uses for this loop mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnimationFrame => "animationFrame",
            Self::DeviceFrame => "deviceFrame",
        }
    }
}

/// Construction bundle for one controller instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    /// Host name or IP address of the tracking service.
    pub host: String,
    /// Port the tracking service listens on.
    pub port: u16,
    /// Enable gesture recognition in the service.
    pub enable_gestures: bool,
    /// Keep receiving frames while the host application is not in the
    /// foreground.
    pub background: bool,
    /// Optimize tracking for hardware mounted on a head-mounted display.
    pub optimize_hmd: bool,
    /// Which loop drives frame delivery.
    pub frame_event: FrameLoop,
    /// Run every registered frame-processing plugin.
    pub use_all_plugins: bool,
    /// Keep the frame loop running even while disconnected. Turning
    /// this off saves resources but can stall animations driven by the
    /// loop.
    pub loop_while_disconnected: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            enable_gestures: false,
            background: false,
            optimize_hmd: false,
            frame_event: FrameLoop::default(),
            use_all_plugins: false,
            loop_while_disconnected: true,
        }
    }
}

impl ControllerOptions {
    /// WebSocket endpoint of the tracking service for these options,
    /// e.g. `ws://127.0.0.1:6437/v6.json`.
    pub fn ws_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "ws://{}:{}/v{PROTOCOL_VERSION}.json",
            self.host, self.port
        ))
    }
}
