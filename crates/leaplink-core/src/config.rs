// ── Adapter configuration bundle ──
//
// The host-mutable bundle the adapter watches as a unit. `background`
// and `optimize_hmd` are narrow fields: a live controller picks them up
// in place through its setters. Every other field invalidates the
// controller when `auto` is set — the next controller is built from the
// full bundle, narrow values included.

use serde::{Deserialize, Serialize};

use leaplink_api::{ControllerOptions, FrameLoop};

/// Configuration observed by the adapter. One change handler reacts to
/// every mutation; see [`LeapAdapter`](crate::LeapAdapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Host name or IP address of the tracking service.
    pub host: String,
    /// Port the tracking service listens on.
    pub port: u16,
    /// Enable gesture recognition.
    pub enable_gestures: bool,
    /// Receive frames while the host application is in the background.
    pub background: bool,
    /// Optimize tracking for head-mounted-display mounting.
    pub optimize_hmd: bool,
    /// Which loop drives frame delivery.
    pub frame_event: FrameLoop,
    /// Run every registered frame-processing plugin.
    pub use_all_plugins: bool,
    /// Keep the frame loop running while disconnected.
    pub loop_while_disconnected: bool,
    /// Re-create and connect the controller automatically on
    /// configuration changes. Off by default: the host creates and
    /// connects explicitly.
    pub auto: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        let options = ControllerOptions::default();
        Self {
            host: options.host,
            port: options.port,
            enable_gestures: options.enable_gestures,
            background: options.background,
            optimize_hmd: options.optimize_hmd,
            frame_event: options.frame_event,
            use_all_plugins: options.use_all_plugins,
            loop_while_disconnected: options.loop_while_disconnected,
            auto: false,
        }
    }
}

impl AdapterConfig {
    /// Options bundle for constructing a controller from this config.
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            host: self.host.clone(),
            port: self.port,
            enable_gestures: self.enable_gestures,
            background: self.background,
            optimize_hmd: self.optimize_hmd,
            frame_event: self.frame_event,
            use_all_plugins: self.use_all_plugins,
            loop_while_disconnected: self.loop_while_disconnected,
        }
    }

    /// Field-level diff against the previous snapshot, classified by
    /// reaction.
    pub(crate) fn delta_from(&self, previous: &Self) -> ConfigDelta {
        ConfigDelta {
            background: self.background != previous.background,
            optimize_hmd: self.optimize_hmd != previous.optimize_hmd,
            recreate: self.host != previous.host
                || self.port != previous.port
                || self.enable_gestures != previous.enable_gestures
                || self.frame_event != previous.frame_event
                || self.use_all_plugins != previous.use_all_plugins
                || self.loop_while_disconnected != previous.loop_while_disconnected
                || self.auto != previous.auto,
        }
    }
}

/// Which reaction classes a configuration change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConfigDelta {
    /// A field changed that invalidates the current controller.
    pub recreate: bool,
    /// `background` changed; propagate to a live controller in place.
    pub background: bool,
    /// `optimize_hmd` changed; propagate to a live controller in place.
    pub optimize_hmd: bool,
}
