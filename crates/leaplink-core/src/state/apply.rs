// ── Transport event application ──
//
// The sixteen-way mapping from transport event to state mutation and
// public re-emission. `connected` and `streaming` are re-read from the
// controller rather than hardcoded: the controller is the authority on
// session state and may have transitioned again before this handler
// ran.

use std::sync::Arc;

use chrono::Utc;

use leaplink_api::{TrackingController, TransportEvent};

use super::DerivedState;
use crate::events::AdapterEvent;

impl DerivedState {
    /// Apply one transport event: mutate the governed field(s), then
    /// return the public event to re-emit. Each payload is wrapped in
    /// an `Arc` once and shared between the state field and the event.
    pub(crate) fn apply(
        &self,
        event: &TransportEvent,
        controller: &dyn TrackingController,
    ) -> AdapterEvent {
        self.last_event_at.set(Some(Utc::now()));

        match event {
            TransportEvent::Blur => {
                self.is_focus.set(false);
                AdapterEvent::Blur
            }
            TransportEvent::Connect => {
                self.connected.set(controller.connected());
                AdapterEvent::Connect
            }
            TransportEvent::DeviceAttached(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_attached.set(true);
                AdapterEvent::DeviceAttached(info)
            }
            TransportEvent::DeviceConnected(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_connected.set(true);
                AdapterEvent::DeviceConnected(info)
            }
            TransportEvent::DeviceDisconnected(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_connected.set(false);
                AdapterEvent::DeviceDisconnected(info)
            }
            TransportEvent::DeviceRemoved(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_attached.set(false);
                AdapterEvent::DeviceRemoved(info)
            }
            TransportEvent::DeviceStopped(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_streaming.set(false);
                AdapterEvent::DeviceStopped(info)
            }
            TransportEvent::DeviceStreaming(info) => {
                let info = Arc::new(info.clone());
                self.last_device_info.set(Some(Arc::clone(&info)));
                self.is_device_streaming.set(true);
                AdapterEvent::DeviceStreaming(info)
            }
            TransportEvent::Disconnect => {
                self.connected.set(controller.connected());
                AdapterEvent::Disconnect
            }
            TransportEvent::Focus => {
                self.is_focus.set(true);
                AdapterEvent::Focus
            }
            TransportEvent::Frame(frame) => {
                let frame = Arc::new(frame.clone());
                self.last_frame.set(Some(Arc::clone(&frame)));
                AdapterEvent::Frame(frame)
            }
            TransportEvent::FrameEnd(timestamp) => {
                self.last_frame_end.set(*timestamp);
                AdapterEvent::FrameEnd(*timestamp)
            }
            TransportEvent::Gesture { gesture, frame } => {
                let gesture = Arc::new(gesture.clone());
                let frame = Arc::new(frame.clone());
                self.last_gesture.set(Some(Arc::clone(&gesture)));
                AdapterEvent::Gesture { gesture, frame }
            }
            TransportEvent::Protocol { protocol, frame } => {
                let protocol = Arc::new(protocol.clone());
                let frame = Arc::new(frame.clone());
                self.last_protocol.set(Some(Arc::clone(&protocol)));
                AdapterEvent::Protocol { protocol, frame }
            }
            TransportEvent::StreamingStarted(info) => {
                let info = Arc::new(info.clone());
                self.streaming.set(controller.streaming());
                self.last_device_info.set(Some(Arc::clone(&info)));
                AdapterEvent::StreamingStarted(info)
            }
            TransportEvent::StreamingStopped(info) => {
                let info = Arc::new(info.clone());
                self.streaming.set(controller.streaming());
                self.last_device_info.set(Some(Arc::clone(&info)));
                AdapterEvent::StreamingStopped(info)
            }
        }
    }
}
