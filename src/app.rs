// Runtime wiring: a background tokio loop owns the coordinator, drains a
// command channel, ticks the periodic simulation and forwards every UiEvent
// to the rendering collaborator. Geocoding and device location run as
// spawned tasks whose results come back through the same channel, so all
// state mutation stays on the loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::alerts::model::AlertId;
use crate::core::clock::SystemClock;
use crate::core::config::ConfigManager;
use crate::core::coordinator::Coordinator;
use crate::core::events::{MapLayer, TracingSink, UiEvent, UiSink};
use crate::core::geo::{
    DeviceLocator, GeocodeError, GeocodeMatch, Geocoder, LocateError, LocateRequest,
    OfflineGeocoder, OfflineLocator,
};
use crate::core::model::{GeoPoint, MapView, Screen};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const COMMAND_BUFFER: usize = 32;

/// Everything the embedding UI can ask of the core.
pub enum Command {
    TriggerPanic,
    ShareLiveLocation,
    CallPolice,
    ToggleTracking,
    ClearAlerts,
    MarkRead(AlertId),
    Navigate(Screen),
    Swipe(f64),
    SwitchMapView(MapView),
    SetLayer { layer: MapLayer, visible: bool },
    CenterOnUser,
    SearchInput(String),
    SearchLocation(String),
    SetManualLocation { lat: String, lng: String },
    SetPopularLocation { point: GeoPoint, name: String },
    RequestDeviceLocation,
    ForwardGeocodeResult(Result<Option<GeocodeMatch>, GeocodeError>),
    ReverseGeocodeResult {
        point: GeoPoint,
        result: Result<Option<String>, GeocodeError>,
    },
    DeviceLocationResult(Result<GeoPoint, LocateError>),
    Shutdown,
}

pub struct App {
    pub commands: mpsc::Sender<Command>,
    pub handle: JoinHandle<()>,
}

/// Start the background loop. The returned sender is the only way to reach
/// the coordinator; dropping it (or sending Shutdown) stops the loop.
pub fn spawn(
    mut coordinator: Coordinator,
    sink: Arc<dyn UiSink>,
    geocoder: Arc<dyn Geocoder>,
    locator: Arc<dyn DeviceLocator>,
) -> App {
    let (tx, mut rx) = mpsc::channel::<Command>(COMMAND_BUFFER);
    let loop_tx = tx.clone();

    let handle = tokio::spawn(async move {
        tracing::info!("coordinator loop started");
        emit_all(&*sink, &loop_tx, &geocoder, coordinator.startup());

        loop {
            // Drain whatever the frontend queued since the last tick.
            let mut shutdown = false;
            while let Ok(command) = rx.try_recv() {
                match command {
                    Command::Shutdown => {
                        shutdown = true;
                        break;
                    }
                    command => {
                        let events =
                            dispatch(&mut coordinator, command, &loop_tx, &geocoder, &locator);
                        emit_all(&*sink, &loop_tx, &geocoder, events);
                    }
                }
            }
            if shutdown {
                break;
            }

            let events = coordinator.tick();
            emit_all(&*sink, &loop_tx, &geocoder, events);

            tokio::time::sleep(TICK_INTERVAL).await;
        }
        tracing::info!("coordinator loop stopped");
    });

    App {
        commands: tx,
        handle,
    }
}

fn dispatch(
    coordinator: &mut Coordinator,
    command: Command,
    tx: &mpsc::Sender<Command>,
    geocoder: &Arc<dyn Geocoder>,
    locator: &Arc<dyn DeviceLocator>,
) -> Vec<UiEvent> {
    match command {
        Command::TriggerPanic => coordinator.trigger_panic(),
        Command::ShareLiveLocation => coordinator.share_live_location(),
        Command::CallPolice => coordinator.call_police(),
        Command::ToggleTracking => coordinator.toggle_tracking(),
        Command::ClearAlerts => coordinator.clear_alerts(),
        Command::MarkRead(id) => coordinator.mark_alert_read(id),
        Command::Navigate(screen) => coordinator.navigate(screen),
        Command::Swipe(delta) => coordinator.swipe(delta),
        Command::SwitchMapView(view) => coordinator.switch_map_view(view),
        Command::SetLayer { layer, visible } => coordinator.set_layer(layer, visible),
        Command::CenterOnUser => coordinator.center_on_user(),
        Command::SearchInput(query) => coordinator.search_input(&query),
        Command::SearchLocation(query) => {
            let (events, lookup) = coordinator.search_location(&query);
            if let Some(query) = lookup {
                spawn_forward_geocode(tx.clone(), Arc::clone(geocoder), query);
            }
            events
        }
        Command::SetManualLocation { lat, lng } => coordinator.set_manual_location(&lat, &lng),
        Command::SetPopularLocation { point, name } => {
            coordinator.set_popular_location(point, &name)
        }
        Command::RequestDeviceLocation => {
            spawn_device_location(tx.clone(), Arc::clone(locator));
            Vec::new()
        }
        Command::ForwardGeocodeResult(result) => coordinator.apply_forward_geocode(result),
        Command::ReverseGeocodeResult { point, result } => {
            coordinator.apply_reverse_geocode(point, result)
        }
        Command::DeviceLocationResult(result) => coordinator.apply_device_location(result),
        Command::Shutdown => Vec::new(),
    }
}

/// Forward events to the sink, spawning a reverse lookup for any position
/// write that landed without a label.
fn emit_all(
    sink: &dyn UiSink,
    tx: &mpsc::Sender<Command>,
    geocoder: &Arc<dyn Geocoder>,
    events: Vec<UiEvent>,
) {
    for event in &events {
        if let UiEvent::PositionChanged { position } = event {
            if position.label.is_none() {
                spawn_reverse_geocode(tx.clone(), Arc::clone(geocoder), position.point);
            }
        }
        sink.emit(event);
    }
}

fn spawn_forward_geocode(tx: mpsc::Sender<Command>, geocoder: Arc<dyn Geocoder>, query: String) {
    tokio::spawn(async move {
        let result = geocoder.forward(&query).await;
        let _ = tx.send(Command::ForwardGeocodeResult(result)).await;
    });
}

fn spawn_reverse_geocode(tx: mpsc::Sender<Command>, geocoder: Arc<dyn Geocoder>, point: GeoPoint) {
    tokio::spawn(async move {
        let result = geocoder.reverse(point).await;
        let _ = tx
            .send(Command::ReverseGeocodeResult { point, result })
            .await;
    });
}

fn spawn_device_location(tx: mpsc::Sender<Command>, locator: Arc<dyn DeviceLocator>) {
    tokio::spawn(async move {
        let result = locator.current_position(&LocateRequest::default()).await;
        let _ = tx.send(Command::DeviceLocationResult(result)).await;
    });
}

/// Headless demo entry point: system clock, entropy-seeded RNG, logging
/// sink and the offline collaborators. Runs until Ctrl-C.
pub fn run() {
    let config_dir = std::env::var("TOURGUARD_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let config_manager = ConfigManager::new(config_dir);
    let settings = config_manager.load();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to start runtime: {err}");
            return;
        }
    };

    runtime.block_on(async {
        let coordinator = Coordinator::new(
            settings,
            Box::new(SystemClock),
            Box::new(StdRng::from_entropy()),
        );
        let app = spawn(
            coordinator,
            Arc::new(TracingSink),
            Arc::new(OfflineGeocoder),
            Arc::new(OfflineLocator),
        );

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            let _ = app.commands.send(Command::Shutdown).await;
            let _ = app.handle.await;
        }
    });
}
