// leaplink-api: controller-facing surface for motion-tracking services.

pub mod controller;
pub mod events;
pub mod options;

pub use controller::{ControllerFactory, TrackingController};
pub use events::{DeviceInfo, Frame, Gesture, ProtocolInfo, TransportEvent};
pub use options::{ControllerOptions, FrameLoop, DEFAULT_HOST, DEFAULT_PORT};
