// leaplink-core: reactive adapter between leaplink-api controllers and host UIs.

pub mod adapter;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::LeapAdapter;
pub use config::AdapterConfig;
pub use error::AdapterError;
pub use events::AdapterEvent;
pub use state::{DerivedState, Property};
pub use stream::PropertyStream;

// Re-export the collaborator surface so hosts only need this crate.
pub use leaplink_api::{
    ControllerFactory, ControllerOptions, DeviceInfo, Frame, FrameLoop, Gesture, ProtocolInfo,
    TrackingController, TransportEvent,
};
