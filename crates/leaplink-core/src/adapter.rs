// ── Adapter facade ──
//
// Owns the configuration bundle, the single controller slot, the
// derived state, and the public event channel. Configuration mutation
// runs the watch-list reaction inline on the caller; a per-binding
// relay task feeds transport events into the derived state and back out
// as public events.
//
// Replacement discipline: detach the old binding (cancel + generation
// bump) BEFORE constructing and subscribing the new instance. The relay
// re-checks its generation before applying anything, so an event still
// queued from a discarded instance is dropped rather than delivered.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use leaplink_api::{
    ControllerFactory, DeviceInfo, Frame, FrameLoop, Gesture, ProtocolInfo, TrackingController,
    TransportEvent,
};

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::events::AdapterEvent;
use crate::state::DerivedState;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// One live controller instance plus its relay guard.
struct ControllerBinding {
    controller: Arc<dyn TrackingController>,
    cancel: CancellationToken,
    generation: u64,
}

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc`. Must live on a tokio runtime: the event
/// relay runs as a spawned task, and the adapter is designed for a
/// current-thread runtime driven by the host's event dispatch. No
/// method blocks.
#[derive(Clone)]
pub struct LeapAdapter {
    inner: Arc<AdapterInner>,
}

struct AdapterInner {
    factory: Arc<dyn ControllerFactory>,
    config: watch::Sender<AdapterConfig>,
    state: DerivedState,
    event_tx: broadcast::Sender<AdapterEvent>,
    binding: ArcSwapOption<ControllerBinding>,
    /// Generation of the current binding; bumped on every replacement.
    generation: AtomicU64,
}

impl LeapAdapter {
    /// Create an adapter with default configuration. No controller is
    /// created until a configuration change fires with `auto` set, or
    /// the host calls [`create_controller`](Self::create_controller).
    pub fn new(factory: impl ControllerFactory + 'static) -> Self {
        Self::with_config(AdapterConfig::default(), factory)
    }

    /// Create an adapter with the given starting configuration.
    ///
    /// The starting bundle does not trigger controller creation even
    /// with `auto` set; creation is lazy, on the first change.
    pub fn with_config(config: AdapterConfig, factory: impl ControllerFactory + 'static) -> Self {
        let (config_tx, _) = watch::channel(config);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(AdapterInner {
                factory: Arc::new(factory),
                config: config_tx,
                state: DerivedState::new(),
                event_tx,
                binding: ArcSwapOption::empty(),
                generation: AtomicU64::new(0),
            }),
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Snapshot of the current configuration bundle.
    pub fn config(&self) -> AdapterConfig {
        self.inner.config.borrow().clone()
    }

    /// Subscribe to configuration changes.
    pub fn watch_config(&self) -> watch::Receiver<AdapterConfig> {
        self.inner.config.subscribe()
    }

    /// Apply several configuration changes as one mutation. The
    /// reaction runs once, against the combined diff.
    pub fn update_config(&self, mutate: impl FnOnce(&mut AdapterConfig)) {
        let previous = self.inner.config.borrow().clone();
        let mut next = previous.clone();
        mutate(&mut next);
        if next == previous {
            return;
        }

        self.inner.config.send_modify(|c| *c = next.clone());
        self.react(&previous, &next);
    }

    pub fn host(&self) -> String {
        self.inner.config.borrow().host.clone()
    }

    pub fn set_host(&self, host: impl Into<String>) {
        let host = host.into();
        self.update_config(|c| c.host = host);
    }

    pub fn port(&self) -> u16 {
        self.inner.config.borrow().port
    }

    pub fn set_port(&self, port: u16) {
        self.update_config(|c| c.port = port);
    }

    pub fn enable_gestures(&self) -> bool {
        self.inner.config.borrow().enable_gestures
    }

    pub fn set_enable_gestures(&self, enabled: bool) {
        self.update_config(|c| c.enable_gestures = enabled);
    }

    pub fn background(&self) -> bool {
        self.inner.config.borrow().background
    }

    pub fn set_background(&self, enabled: bool) {
        self.update_config(|c| c.background = enabled);
    }

    pub fn optimize_hmd(&self) -> bool {
        self.inner.config.borrow().optimize_hmd
    }

    pub fn set_optimize_hmd(&self, enabled: bool) {
        self.update_config(|c| c.optimize_hmd = enabled);
    }

    pub fn frame_event(&self) -> FrameLoop {
        self.inner.config.borrow().frame_event
    }

    pub fn set_frame_event(&self, frame_event: FrameLoop) {
        self.update_config(|c| c.frame_event = frame_event);
    }

    pub fn use_all_plugins(&self) -> bool {
        self.inner.config.borrow().use_all_plugins
    }

    pub fn set_use_all_plugins(&self, enabled: bool) {
        self.update_config(|c| c.use_all_plugins = enabled);
    }

    pub fn loop_while_disconnected(&self) -> bool {
        self.inner.config.borrow().loop_while_disconnected
    }

    pub fn set_loop_while_disconnected(&self, enabled: bool) {
        self.update_config(|c| c.loop_while_disconnected = enabled);
    }

    pub fn auto(&self) -> bool {
        self.inner.config.borrow().auto
    }

    pub fn set_auto(&self, enabled: bool) {
        self.update_config(|c| c.auto = enabled);
    }

    // ── Controller lifecycle ─────────────────────────────────────────

    /// Build (or replace) the controller from the current configuration
    /// without connecting. The explicit path when `auto` is off.
    pub fn create_controller(&self) -> Arc<dyn TrackingController> {
        let config = self.config();
        self.rebuild(&config)
    }

    /// Whether a controller instance currently exists.
    pub fn has_controller(&self) -> bool {
        self.inner.binding.load().is_some()
    }

    /// Ask the current controller to open its session against the
    /// tracking service. Acknowledged asynchronously by a `connect`
    /// event.
    pub fn connect(&self) -> Result<(), AdapterError> {
        let binding = self
            .inner
            .binding
            .load_full()
            .ok_or(AdapterError::NoController)?;
        debug!("connect requested");
        binding.controller.connect();
        Ok(())
    }

    /// Ask the current controller to close its session.
    pub fn disconnect(&self) -> Result<(), AdapterError> {
        let binding = self
            .inner
            .binding
            .load_full()
            .ok_or(AdapterError::NoController)?;
        debug!("disconnect requested");
        binding.controller.disconnect();
        Ok(())
    }

    // ── State and event observation ──────────────────────────────────

    /// The derived, host-readable state. Individual fields are
    /// observable through its `watch_*` methods.
    pub fn state(&self) -> &DerivedState {
        &self.inner.state
    }

    // ── State accessors (delegate to DerivedState) ───────────────────

    pub fn connected(&self) -> bool {
        self.inner.state.connected()
    }

    pub fn streaming(&self) -> bool {
        self.inner.state.streaming()
    }

    pub fn is_device_attached(&self) -> bool {
        self.inner.state.is_device_attached()
    }

    pub fn is_device_connected(&self) -> bool {
        self.inner.state.is_device_connected()
    }

    pub fn is_device_streaming(&self) -> bool {
        self.inner.state.is_device_streaming()
    }

    pub fn is_focus(&self) -> bool {
        self.inner.state.is_focus()
    }

    pub fn last_device_info(&self) -> Option<Arc<DeviceInfo>> {
        self.inner.state.last_device_info()
    }

    pub fn last_frame(&self) -> Option<Arc<Frame>> {
        self.inner.state.last_frame()
    }

    pub fn last_frame_end(&self) -> i64 {
        self.inner.state.last_frame_end()
    }

    pub fn last_gesture(&self) -> Option<Arc<Gesture>> {
        self.inner.state.last_gesture()
    }

    pub fn last_protocol(&self) -> Option<Arc<ProtocolInfo>> {
        self.inner.state.last_protocol()
    }

    /// Subscribe to the public event stream.
    pub fn events(&self) -> broadcast::Receiver<AdapterEvent> {
        self.inner.event_tx.subscribe()
    }

    // ── Watch-list reaction ──────────────────────────────────────────

    /// The single change handler: diff the new bundle against the
    /// previous snapshot and react per field class.
    fn react(&self, previous: &AdapterConfig, current: &AdapterConfig) {
        let delta = current.delta_from(previous);

        if delta.recreate && current.auto {
            // The new controller is constructed from the full current
            // bundle, narrow values included; no separate propagation.
            let controller = self.rebuild(current);
            debug!("auto-connect after configuration change");
            controller.connect();
            return;
        }

        if delta.background {
            if let Some(binding) = self.inner.binding.load_full() {
                debug!(background = current.background, "propagating background mode");
                binding.controller.set_background(current.background);
            } else {
                debug!("background changed with no controller; ignored");
            }
        }

        if delta.optimize_hmd {
            if let Some(binding) = self.inner.binding.load_full() {
                debug!(
                    optimize_hmd = current.optimize_hmd,
                    "propagating HMD optimization"
                );
                binding.controller.set_optimize_hmd(current.optimize_hmd);
            } else {
                debug!("optimize_hmd changed with no controller; ignored");
            }
        }
    }

    /// Replace the controller: detach the old binding, construct a new
    /// instance from `config`, attach the relay, store the binding.
    fn rebuild(&self, config: &AdapterConfig) -> Arc<dyn TrackingController> {
        // Detach first -- an event from the discarded instance must not
        // reach the state or the host past this point.
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(old) = self.inner.binding.swap(None) {
            old.cancel.cancel();
            debug!(generation = old.generation, "detached previous controller binding");
        }

        let controller = self.inner.factory.create(config.controller_options());
        let cancel = CancellationToken::new();
        let events = controller.subscribe();

        tokio::spawn(relay_task(
            Arc::clone(&self.inner),
            Arc::clone(&controller),
            events,
            cancel.clone(),
            generation,
        ));

        self.inner
            .binding
            .store(Some(Arc::new(ControllerBinding {
                controller: Arc::clone(&controller),
                cancel,
                generation,
            })));

        info!(host = %config.host, port = config.port, generation, "controller created");
        controller
    }
}

// ── Lifecycle relay ──────────────────────────────────────────────────

/// Feed one controller instance's events into the derived state and the
/// public event channel. Exits when the binding is detached or the
/// controller drops its sender.
async fn relay_task(
    inner: Arc<AdapterInner>,
    controller: Arc<dyn TrackingController>,
    mut events: broadcast::Receiver<Arc<TransportEvent>>,
    cancel: CancellationToken,
    generation: u64,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = events.recv() => {
                match received {
                    Ok(event) => {
                        // A replacement may have landed while this event
                        // was in flight.
                        if inner.generation.load(Ordering::SeqCst) != generation {
                            debug!(
                                event = event.name(),
                                generation,
                                "dropping event from discarded controller"
                            );
                            break;
                        }

                        let public = inner.state.apply(&event, controller.as_ref());
                        debug!(event = public.name(), "relayed controller event");
                        // Send errors just mean no subscribers right now.
                        let _ = inner.event_tx.send(public);
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, generation, "relay lagged behind controller events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    debug!(generation, "relay detached");
}
