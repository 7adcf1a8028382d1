// Integration tests for the adapter: configuration reaction, lifecycle
// relay, and the replacement boundary, driven by a recording mock
// controller.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tokio::sync::broadcast;

use leaplink_api::{
    ControllerOptions, DeviceInfo, Frame, Gesture, ProtocolInfo, TrackingController,
    TransportEvent,
};
use leaplink_core::{AdapterConfig, AdapterError, AdapterEvent, LeapAdapter};

// ── Mock controller ─────────────────────────────────────────────────

struct MockController {
    options: ControllerOptions,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    background_calls: Mutex<Vec<bool>>,
    optimize_hmd_calls: Mutex<Vec<bool>>,
    connected: AtomicBool,
    streaming: AtomicBool,
    event_tx: broadcast::Sender<Arc<TransportEvent>>,
}

impl MockController {
    fn new(options: ControllerOptions) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            options,
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            background_calls: Mutex::new(Vec::new()),
            optimize_hmd_calls: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            streaming: AtomicBool::new(false),
            event_tx,
        })
    }

    fn emit(&self, event: TransportEvent) {
        let _ = self.event_tx.send(Arc::new(event));
    }

    fn set_session(&self, connected: bool, streaming: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        self.streaming.store(streaming, Ordering::SeqCst);
    }

    fn connect_count(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    fn disconnect_count(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    fn background_calls(&self) -> Vec<bool> {
        self.background_calls.lock().unwrap().clone()
    }

    fn optimize_hmd_calls(&self) -> Vec<bool> {
        self.optimize_hmd_calls.lock().unwrap().clone()
    }
}

impl TrackingController for MockController {
    fn connect(&self) {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    fn set_background(&self, enabled: bool) {
        self.background_calls.lock().unwrap().push(enabled);
    }

    fn set_optimize_hmd(&self, enabled: bool) {
        self.optimize_hmd_calls.lock().unwrap().push(enabled);
    }

    fn subscribe(&self) -> broadcast::Receiver<Arc<TransportEvent>> {
        self.event_tx.subscribe()
    }
}

// ── Recording factory ───────────────────────────────────────────────

#[derive(Default)]
struct MockFactory {
    created: Mutex<Vec<Arc<MockController>>>,
}

impl MockFactory {
    fn build(&self, options: ControllerOptions) -> Arc<dyn TrackingController> {
        let controller = MockController::new(options);
        self.created.lock().unwrap().push(Arc::clone(&controller));
        controller
    }

    fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    fn latest(&self) -> Arc<MockController> {
        Arc::clone(self.created.lock().unwrap().last().unwrap())
    }
}

fn setup(config: AdapterConfig) -> (Arc<MockFactory>, LeapAdapter) {
    let factory = Arc::new(MockFactory::default());
    let adapter = {
        let factory = Arc::clone(&factory);
        LeapAdapter::with_config(config, move |options: ControllerOptions| {
            factory.build(options)
        })
    };
    (factory, adapter)
}

fn auto_config() -> AdapterConfig {
    AdapterConfig {
        auto: true,
        ..AdapterConfig::default()
    }
}

fn device(id: &str) -> DeviceInfo {
    DeviceInfo {
        id: id.to_owned(),
        ..DeviceInfo::default()
    }
}

// ── Configuration reaction ──────────────────────────────────────────

#[tokio::test]
async fn port_change_with_auto_recreates_and_connects() {
    let (factory, adapter) = setup(auto_config());
    assert!(!adapter.has_controller());

    adapter.set_port(6438);

    assert_eq!(factory.created_count(), 1);
    let controller = factory.latest();
    assert_eq!(controller.options.port, 6438);
    assert_eq!(controller.options.host, "127.0.0.1");
    assert_eq!(controller.connect_count(), 1);
    assert_eq!(controller.background_calls(), Vec::<bool>::new());
    assert_eq!(controller.optimize_hmd_calls(), Vec::<bool>::new());
}

#[tokio::test]
async fn bundle_change_without_auto_is_inert() {
    let (factory, adapter) = setup(AdapterConfig::default());

    adapter.set_port(6438);
    adapter.set_host("192.168.0.20");

    assert_eq!(factory.created_count(), 0);
    assert!(!adapter.has_controller());
    assert_eq!(adapter.port(), 6438);
    assert_eq!(adapter.host(), "192.168.0.20");
}

#[tokio::test]
async fn enabling_auto_creates_and_connects() {
    let (factory, adapter) = setup(AdapterConfig::default());

    adapter.set_auto(true);

    assert_eq!(factory.created_count(), 1);
    assert_eq!(factory.latest().connect_count(), 1);
    assert!(adapter.has_controller());
}

#[tokio::test]
async fn each_bundle_change_recreates_exactly_once() {
    let (factory, adapter) = setup(auto_config());

    adapter.set_port(6438);
    adapter.set_enable_gestures(true);
    adapter.set_host("10.0.0.2");

    assert_eq!(factory.created_count(), 3);
    // Each instance got exactly one connect; earlier ones were discarded.
    assert_eq!(factory.latest().connect_count(), 1);
    assert!(factory.latest().options.enable_gestures);
    assert_eq!(factory.latest().options.host, "10.0.0.2");
}

#[tokio::test]
async fn setting_field_to_current_value_does_not_react() {
    let (factory, adapter) = setup(auto_config());

    adapter.set_port(6437); // already the default

    assert_eq!(factory.created_count(), 0);
}

#[tokio::test]
async fn background_change_propagates_without_recreation() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    assert_eq!(factory.created_count(), 1);

    adapter.set_background(true);
    adapter.set_background(false);

    assert_eq!(factory.created_count(), 1);
    let controller = factory.latest();
    assert_eq!(controller.background_calls(), vec![true, false]);
    assert_eq!(controller.connect_count(), 1);
}

#[tokio::test]
async fn optimize_hmd_change_propagates_without_recreation() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);

    adapter.set_optimize_hmd(true);

    assert_eq!(factory.created_count(), 1);
    assert_eq!(factory.latest().optimize_hmd_calls(), vec![true]);
}

#[tokio::test]
async fn narrow_change_without_controller_is_silent_noop() {
    let (factory, adapter) = setup(AdapterConfig::default());

    adapter.set_background(true);
    adapter.set_optimize_hmd(true);

    assert_eq!(factory.created_count(), 0);
    assert!(adapter.background());
    assert!(adapter.optimize_hmd());
}

#[tokio::test]
async fn batch_update_recreates_once_with_narrow_values_baked_in() {
    let (factory, adapter) = setup(auto_config());

    adapter.update_config(|c| {
        c.host = "10.0.0.9".into();
        c.port = 6440;
        c.background = true;
    });

    assert_eq!(factory.created_count(), 1);
    let controller = factory.latest();
    assert_eq!(controller.options.host, "10.0.0.9");
    assert_eq!(controller.options.port, 6440);
    assert!(controller.options.background);
    // The value rode in with construction; no separate setter call.
    assert_eq!(controller.background_calls(), Vec::<bool>::new());
    assert_eq!(controller.connect_count(), 1);
}

// ── Explicit lifecycle ──────────────────────────────────────────────

#[tokio::test]
async fn connect_without_controller_is_an_error() {
    let (_factory, adapter) = setup(AdapterConfig::default());

    assert_eq!(adapter.connect(), Err(AdapterError::NoController));
    assert_eq!(adapter.disconnect(), Err(AdapterError::NoController));
}

#[tokio::test]
async fn create_controller_builds_without_connecting() {
    let (factory, adapter) = setup(AdapterConfig::default());

    adapter.create_controller();

    assert_eq!(factory.created_count(), 1);
    assert_eq!(factory.latest().connect_count(), 0);
    assert!(adapter.has_controller());
}

#[tokio::test]
async fn connect_and_disconnect_delegate_to_current_controller() {
    let (factory, adapter) = setup(AdapterConfig::default());
    adapter.create_controller();

    adapter.connect().unwrap();
    adapter.disconnect().unwrap();

    let controller = factory.latest();
    assert_eq!(controller.connect_count(), 1);
    assert_eq!(controller.disconnect_count(), 1);
}

// ── Lifecycle relay ─────────────────────────────────────────────────

#[tokio::test]
async fn device_lifecycle_keeps_presence_axes_separate() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    controller.emit(TransportEvent::DeviceAttached(device("1")));
    controller.emit(TransportEvent::DeviceConnected(device("1")));
    controller.emit(TransportEvent::DeviceRemoved(device("1")));

    assert_eq!(events.recv().await.unwrap().name(), "device-attached");
    assert_eq!(events.recv().await.unwrap().name(), "device-connected");
    assert_eq!(events.recv().await.unwrap().name(), "device-removed");

    let state = adapter.state();
    assert!(!state.is_device_attached());
    // Removal does not touch the connected axis.
    assert!(state.is_device_connected());
    assert_eq!(state.last_device_info().unwrap().id, "1");
}

#[tokio::test]
async fn streaming_axis_is_independent_of_attachment() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    controller.emit(TransportEvent::DeviceAttached(device("LP1")));
    controller.emit(TransportEvent::DeviceStreaming(device("LP1")));
    events.recv().await.unwrap();
    events.recv().await.unwrap();

    assert!(adapter.state().is_device_attached());
    assert!(adapter.state().is_device_streaming());

    controller.emit(TransportEvent::DeviceRemoved(device("LP1")));
    events.recv().await.unwrap();

    assert!(!adapter.state().is_device_attached());
    assert!(adapter.state().is_device_streaming());
}

#[tokio::test]
async fn streaming_started_requeries_controller_and_forwards_payload() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    let info = device("LP7");
    controller.set_session(true, true);
    controller.emit(TransportEvent::StreamingStarted(info.clone()));

    let event = events.recv().await.unwrap();
    match event {
        AdapterEvent::StreamingStarted(payload) => assert_eq!(*payload, info),
        other => panic!("unexpected event {other}"),
    }
    assert!(adapter.streaming());
    assert_eq!(adapter.state().last_device_info().unwrap().id, "LP7");
}

#[tokio::test]
async fn session_events_requery_the_controller() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    controller.set_session(true, false);
    controller.emit(TransportEvent::Connect);
    events.recv().await.unwrap();
    assert!(adapter.connected());

    // The session already dropped again before the handler ran.
    controller.set_session(false, false);
    controller.emit(TransportEvent::Connect);
    events.recv().await.unwrap();
    assert!(!adapter.connected());

    controller.emit(TransportEvent::Disconnect);
    events.recv().await.unwrap();
    assert!(!adapter.connected());
}

#[tokio::test]
async fn data_events_update_their_payload_fields() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    let frame = Frame {
        id: 1017,
        timestamp: 4_807_203,
        ..Frame::default()
    };
    controller.emit(TransportEvent::Frame(frame.clone()));
    controller.emit(TransportEvent::FrameEnd(1_700_000_000));
    controller.emit(TransportEvent::Gesture {
        gesture: Gesture {
            id: 2,
            kind: "circle".into(),
            ..Gesture::default()
        },
        frame: frame.clone(),
    });
    controller.emit(TransportEvent::Protocol {
        protocol: ProtocolInfo {
            version: 6,
            ..ProtocolInfo::default()
        },
        frame: frame.clone(),
    });

    assert_eq!(events.recv().await.unwrap().name(), "frame");
    assert_eq!(events.recv().await.unwrap().name(), "frameEnd");

    let gesture_event = events.recv().await.unwrap();
    match gesture_event {
        AdapterEvent::Gesture { gesture, frame: in_frame } => {
            assert_eq!(gesture.kind, "circle");
            assert_eq!(in_frame.id, 1017);
        }
        other => panic!("unexpected event {other}"),
    }
    assert_eq!(events.recv().await.unwrap().name(), "protocol");

    let state = adapter.state();
    assert_eq!(state.last_frame().unwrap().id, 1017);
    assert_eq!(state.last_frame_end(), 1_700_000_000);
    assert_eq!(state.last_gesture().unwrap().kind, "circle");
    assert_eq!(state.last_protocol().unwrap().version, 6);
    assert!(state.last_event_at().is_some());
}

#[tokio::test]
async fn focus_follows_blur_and_focus_events() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();
    let mut events = adapter.events();

    controller.emit(TransportEvent::Focus);
    events.recv().await.unwrap();
    assert!(adapter.state().is_focus());

    controller.emit(TransportEvent::Blur);
    events.recv().await.unwrap();
    assert!(!adapter.state().is_focus());
}

#[tokio::test]
async fn watch_subscriptions_observe_relay_mutations() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let controller = factory.latest();

    let mut attached = adapter.state().watch_device_attached();
    assert!(!*attached.borrow_and_update());

    controller.emit(TransportEvent::DeviceAttached(device("LP1")));

    attached.changed().await.unwrap();
    assert!(*attached.borrow_and_update());
}

// ── Replacement boundary ────────────────────────────────────────────

#[tokio::test]
async fn replacement_suppresses_events_from_discarded_controller() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let old_controller = factory.latest();

    adapter.set_port(6439);
    assert_eq!(factory.created_count(), 2);
    let new_controller = factory.latest();

    let mut events = adapter.events();

    // The discarded instance keeps talking; none of it may surface.
    old_controller.emit(TransportEvent::DeviceAttached(device("stale")));
    old_controller.emit(TransportEvent::Focus);

    new_controller.emit(TransportEvent::DeviceAttached(device("live")));

    let event = events.recv().await.unwrap();
    match event {
        AdapterEvent::DeviceAttached(info) => assert_eq!(info.id, "live"),
        other => panic!("unexpected event {other}"),
    }

    let state = adapter.state();
    assert_eq!(state.last_device_info().unwrap().id, "live");
    assert!(!state.is_focus());
    assert!(matches!(
        events.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn replaced_controller_is_not_reused() {
    let (factory, adapter) = setup(auto_config());
    adapter.set_port(6438);
    let old_controller = factory.latest();

    adapter.set_port(6439);
    adapter.connect().unwrap();

    // Delegation lands on the replacement, not the discarded instance.
    assert_eq!(old_controller.connect_count(), 1);
    assert_eq!(factory.latest().connect_count(), 2);
}
