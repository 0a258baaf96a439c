// Owns every piece of mutable state and serializes all mutation on one
// logical loop: explicit command handlers plus a periodic tick. Each entry
// point returns the UiEvents the rendering collaborator must apply.

use std::time::{Duration, Instant};

use rand::RngCore;

use crate::core::alerts::model::{AlertCategory, AlertId, Severity};
use crate::core::alerts::queue::AlertQueue;
use crate::core::clock::Clock;
use crate::core::config::Settings;
use crate::core::events::{Affordance, MapCommand, MapLayer, UiEvent};
use crate::core::geo::{self, GeocodeError, GeocodeMatch, LocateError};
use crate::core::model::{
    GeoPoint, MapView, Screen, StopStatus, UserPosition, GEO_FENCE_ZONES, WORLD_TOURISTS,
};
use crate::core::sim;
use crate::core::state::{HealthOutcome, NavigationState, SafetyState};
use crate::core::timeline::{SessionId, Timeline};

const LOCAL_ZOOM: u8 = 13;
const WORLD_ZOOM: u8 = 2;
const POPULAR_WORLD_ZOOM: u8 = 8;
const CENTER_ON_USER_ZOOM: u8 = 15;

const VERY_SAFE_SUMMARY: &str = "AI monitoring active • Very safe environment";

/// Deferred emission queued on the timeline.
enum Deferred {
    Alert {
        category: AlertCategory,
        message: String,
        severity: Severity,
    },
    EfirFiled {
        reference: String,
    },
    BadgeCueEnd,
    SearchSuggestion {
        query: String,
    },
}

pub struct Coordinator {
    settings: Settings,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
    queue: AlertQueue,
    safety: SafetyState,
    nav: NavigationState,
    position: UserPosition,
    tracking: bool,
    timeline: Timeline<Deferred>,
    next_health: Instant,
    next_scenario: Instant,
    next_jitter: Instant,
    panic_session: SessionId,
}

impl Coordinator {
    pub fn new(settings: Settings, clock: Box<dyn Clock>, rng: Box<dyn RngCore + Send>) -> Self {
        let now = clock.instant();
        let position = UserPosition::new(
            settings.home_position,
            Some(settings.profile.home_label.clone()),
        );
        let queue = AlertQueue::new(settings.alert_capacity);
        let safety = SafetyState::new(settings.initial_score);
        // The scenario interval only starts counting after the warm-up.
        let next_scenario = now
            + Duration::from_secs(settings.scenario_warmup_secs)
            + Duration::from_secs(settings.scenario_period_secs);
        Self {
            next_health: now + Duration::from_secs(settings.health_check_secs),
            next_scenario,
            next_jitter: now + Duration::from_secs(settings.jitter_period_secs),
            settings,
            clock,
            rng,
            queue,
            safety,
            nav: NavigationState::new(),
            position,
            tracking: true,
            timeline: Timeline::new(),
            panic_session: 0,
        }
    }

    /// One-time startup announcement plus the initial projections.
    pub fn startup(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.push_alert(
            &mut events,
            AlertCategory::System,
            "AI Monitoring activated for your safety".to_string(),
            Severity::Info,
        );
        events.push(self.score_event());
        events.push(UiEvent::PositionChanged {
            position: self.position.clone(),
        });
        events
    }

    /// Advance every periodic process that has come due and drain deferred
    /// emissions. Safe to call as often as the embedder likes.
    pub fn tick(&mut self) -> Vec<UiEvent> {
        let now = self.clock.instant();
        let mut events = Vec::new();

        let health_period = Duration::from_secs(self.settings.health_check_secs);
        while self.next_health <= now {
            self.next_health += health_period;
            self.run_health_check(&mut events);
        }

        let scenario_period = Duration::from_secs(self.settings.scenario_period_secs);
        while self.next_scenario <= now {
            self.next_scenario += scenario_period;
            self.run_scenario_roll(&mut events);
        }

        let jitter_period = Duration::from_secs(self.settings.jitter_period_secs);
        while self.next_jitter <= now {
            self.next_jitter += jitter_period;
            if self.nav.screen() == Screen::Map {
                self.run_position_jitter(&mut events);
            }
        }

        for deferred in self.timeline.fire_due(now) {
            self.apply_deferred(deferred, &mut events);
        }

        events
    }

    // ------------------------------------------------------------------
    // Alert queue operations
    // ------------------------------------------------------------------

    pub fn mark_alert_read(&mut self, id: AlertId) -> Vec<UiEvent> {
        self.queue.mark_read(id);
        vec![self.alerts_event()]
    }

    pub fn clear_alerts(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.queue.clear(self.clock.wall());
        events.push(self.alerts_event());
        self.raise_badge_cue(&mut events);
        events
    }

    pub fn unread_count(&self) -> usize {
        self.queue.unread_count()
    }

    // ------------------------------------------------------------------
    // Panic mode
    // ------------------------------------------------------------------

    /// Strict two-state flip. Activation scripts the emergency-response
    /// sequence; every toggle cancels whatever the previous session still
    /// had pending, so rapid toggling cannot duplicate emissions.
    pub fn trigger_panic(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.timeline.cancel_session(self.panic_session);

        let active = self.safety.toggle_panic();
        events.push(UiEvent::PanicChanged { active });

        if active {
            self.panic_session += 1;
            let session = self.panic_session;
            let now = self.clock.instant();

            self.push_alert(
                &mut events,
                AlertCategory::Emergency,
                "PANIC BUTTON ACTIVATED - Emergency services notified".to_string(),
                Severity::Danger,
            );
            self.push_alert(
                &mut events,
                AlertCategory::Emergency,
                "Live location shared with authorities and emergency contacts".to_string(),
                Severity::Danger,
            );
            self.push_alert(
                &mut events,
                AlertCategory::Emergency,
                "Auto-calling nearest police station...".to_string(),
                Severity::Danger,
            );

            self.timeline.schedule_for_session(
                now + Duration::from_secs(3),
                session,
                Deferred::Alert {
                    category: AlertCategory::Response,
                    message: "Police unit dispatched to your location (ETA: 8 minutes)"
                        .to_string(),
                    severity: Severity::Info,
                },
            );

            let contact = self
                .settings
                .profile
                .emergency_contacts
                .first()
                .cloned()
                .unwrap_or_else(|| "emergency contact".to_string());
            self.timeline.schedule_for_session(
                now + Duration::from_secs(5),
                session,
                Deferred::Alert {
                    category: AlertCategory::Response,
                    message: format!("Emergency contact {contact} notified via SMS"),
                    severity: Severity::Info,
                },
            );

            let reference = sim::fir_reference(&mut *self.rng, self.clock.wall());
            self.timeline.schedule_for_session(
                now + Duration::from_secs(8),
                session,
                Deferred::EfirFiled { reference },
            );
        } else {
            self.push_alert(
                &mut events,
                AlertCategory::System,
                "Panic mode deactivated".to_string(),
                Severity::Info,
            );
        }
        events
    }

    // ------------------------------------------------------------------
    // Quick actions
    // ------------------------------------------------------------------

    pub fn share_live_location(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.push_alert(
            &mut events,
            AlertCategory::Location,
            "Live location shared with family and authorities".to_string(),
            Severity::Info,
        );

        let place = sim::draw_place(&mut *self.rng);
        let point = self.position.point;
        self.timeline.schedule(
            self.clock.instant() + Duration::from_secs(2),
            Deferred::Alert {
                category: AlertCategory::Location,
                message: format!(
                    "Current location: {place} (Lat: {:.4}, Long: {:.4})",
                    point.lat, point.lng
                ),
                severity: Severity::Info,
            },
        );
        events
    }

    pub fn call_police(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.push_alert(
            &mut events,
            AlertCategory::Emergency,
            "Calling Meghalaya Police Emergency: 100".to_string(),
            Severity::Info,
        );

        let name = self
            .settings
            .profile
            .name
            .split_whitespace()
            .next()
            .unwrap_or("Tourist")
            .to_string();
        let place = self
            .settings
            .itinerary
            .iter()
            .find(|stop| stop.status == StopStatus::Current)
            .map(|stop| stop.place.clone())
            .unwrap_or_else(|| self.settings.profile.home_label.clone());
        let due = self.clock.instant() + Duration::from_secs(3);

        self.timeline.schedule(
            due,
            Deferred::Alert {
                category: AlertCategory::Emergency,
                message: "Connected to Police Control Room".to_string(),
                severity: Severity::Info,
            },
        );
        self.timeline.schedule(
            due,
            Deferred::Alert {
                category: AlertCategory::Emergency,
                message: format!("\"Tourist {name} at {place} requires assistance\""),
                severity: Severity::Info,
            },
        );
        events
    }

    pub fn toggle_tracking(&mut self) -> Vec<UiEvent> {
        self.tracking = !self.tracking;
        let mut events = vec![UiEvent::TrackingChanged {
            enabled: self.tracking,
        }];
        if self.tracking {
            self.push_alert(
                &mut events,
                AlertCategory::System,
                "Real-time tracking enabled".to_string(),
                Severity::Info,
            );
        } else {
            self.push_alert(
                &mut events,
                AlertCategory::System,
                "Real-time tracking disabled".to_string(),
                Severity::Warning,
            );
        }
        events
    }

    // ------------------------------------------------------------------
    // Navigation and map view
    // ------------------------------------------------------------------

    pub fn navigate(&mut self, screen: Screen) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if self.nav.navigate(screen) {
            self.enter_screen(screen, &mut events);
        }
        events
    }

    pub fn swipe(&mut self, delta_px: f64) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if let Some(screen) = self.nav.swipe(delta_px) {
            self.enter_screen(screen, &mut events);
        }
        events
    }

    fn enter_screen(&mut self, screen: Screen, events: &mut Vec<UiEvent>) {
        events.push(UiEvent::ScreenChanged { screen });
        if screen == Screen::Map {
            events.push(UiEvent::Map(MapCommand::Refresh));
            events.push(UiEvent::Map(MapCommand::SetZones {
                zones: GEO_FENCE_ZONES.clone(),
            }));
            events.push(UiEvent::Map(MapCommand::MoveUserMarker {
                point: self.position.point,
            }));
        }
    }

    pub fn switch_map_view(&mut self, view: MapView) -> Vec<UiEvent> {
        self.nav.set_map_view(view);
        let mut events = vec![UiEvent::MapViewChanged { view }];
        match view {
            MapView::World => {
                events.push(UiEvent::Map(MapCommand::SetView {
                    center: GeoPoint::new(20.0, 0.0),
                    zoom: WORLD_ZOOM,
                }));
                events.push(UiEvent::Map(MapCommand::AddWorldTourists {
                    tourists: WORLD_TOURISTS.clone(),
                }));
                self.push_alert(
                    &mut events,
                    AlertCategory::Map,
                    "Switched to world view - showing global tourists".to_string(),
                    Severity::Info,
                );
            }
            MapView::Local => {
                events.push(UiEvent::Map(MapCommand::SetView {
                    center: self.position.point,
                    zoom: LOCAL_ZOOM,
                }));
                events.push(UiEvent::Map(MapCommand::ClearWorldTourists));
                self.push_alert(
                    &mut events,
                    AlertCategory::Map,
                    "Switched to local view - showing nearby data".to_string(),
                    Severity::Info,
                );
            }
        }
        events
    }

    pub fn set_layer(&mut self, layer: MapLayer, visible: bool) -> Vec<UiEvent> {
        let command = if visible {
            MapCommand::ShowLayer { layer }
        } else {
            MapCommand::HideLayer { layer }
        };
        vec![UiEvent::Map(command)]
    }

    pub fn center_on_user(&mut self) -> Vec<UiEvent> {
        let mut events = vec![
            UiEvent::Map(MapCommand::SetView {
                center: self.position.point,
                zoom: CENTER_ON_USER_ZOOM,
            }),
            UiEvent::Map(MapCommand::OpenUserPopup),
        ];
        self.push_alert(
            &mut events,
            AlertCategory::Location,
            "Map centered on your current location".to_string(),
            Severity::Info,
        );
        events
    }

    // ------------------------------------------------------------------
    // Location input and geocoding
    // ------------------------------------------------------------------

    /// Keystroke in the search box. A new keystroke cancels the pending
    /// suggestion timer; queries under three characters never schedule one.
    pub fn search_input(&mut self, query: &str) -> Vec<UiEvent> {
        self.timeline
            .cancel_where(|d| matches!(d, Deferred::SearchSuggestion { .. }));
        let query = query.trim();
        if query.len() >= 3 {
            self.timeline.schedule(
                self.clock.instant() + Duration::from_millis(self.settings.search_debounce_ms),
                Deferred::SearchSuggestion {
                    query: query.to_string(),
                },
            );
        }
        Vec::new()
    }

    /// Submit a location search. Returns the events to apply plus, when the
    /// query needs the geocoding collaborator, the cleaned query for the
    /// embedder to look up asynchronously.
    pub fn search_location(&mut self, query: &str) -> (Vec<UiEvent>, Option<String>) {
        let query = query.trim();
        let mut events = Vec::new();

        if query.is_empty() {
            self.push_alert(
                &mut events,
                AlertCategory::Location,
                "Please enter a location to search".to_string(),
                Severity::Warning,
            );
            return (events, None);
        }

        // "lat, lng" entered directly skips the geocoder.
        if let Some(point) = geo::parse_coordinates(query) {
            self.set_position(point, None, &mut events);
            self.push_alert(
                &mut events,
                AlertCategory::Location,
                format!("Location set manually: {:.6}, {:.6}", point.lat, point.lng),
                Severity::Success,
            );
            events.push(UiEvent::ClearSearchInput);
            return (events, None);
        }

        (events, Some(query.to_string()))
    }

    /// Outcome of an asynchronous forward geocode. The in-flight search
    /// affordance reverts in every case.
    pub fn apply_forward_geocode(
        &mut self,
        result: Result<Option<GeocodeMatch>, GeocodeError>,
    ) -> Vec<UiEvent> {
        let mut events = vec![UiEvent::RestoreAffordance {
            affordance: Affordance::SearchButton,
        }];
        match result {
            Ok(Some(found)) => {
                self.set_position(found.point, Some(found.display_name.clone()), &mut events);
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    format!("Location set to: {}", found.display_name),
                    Severity::Success,
                );
                events.push(UiEvent::ClearSearchInput);
            }
            Ok(None) => {
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    "Location not found. Please try a different search.".to_string(),
                    Severity::Warning,
                );
            }
            Err(err) => {
                tracing::warn!("forward geocode failed: {err}");
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    "Search failed. Please check your connection.".to_string(),
                    Severity::Error,
                );
            }
        }
        events
    }

    /// Outcome of an asynchronous device-location request.
    pub fn apply_device_location(
        &mut self,
        result: Result<GeoPoint, LocateError>,
    ) -> Vec<UiEvent> {
        let mut events = vec![UiEvent::RestoreAffordance {
            affordance: Affordance::GpsButton,
        }];
        match result {
            Ok(point) => {
                self.set_position(point, Some("Your GPS Location".to_string()), &mut events);
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    format!("GPS location acquired: {:.6}, {:.6}", point.lat, point.lng),
                    Severity::Success,
                );
            }
            Err(err) => {
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    err.to_string(),
                    Severity::Warning,
                );
            }
        }
        events
    }

    /// Manually entered coordinates. Invalid input aborts with a warning
    /// alert and no position mutation.
    pub fn set_manual_location(&mut self, lat: &str, lng: &str) -> Vec<UiEvent> {
        let mut events = Vec::new();
        match geo::validate_manual(lat, lng) {
            Ok(point) => {
                self.set_position(point, Some("Manual Location".to_string()), &mut events);
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    format!("Location set manually: {:.6}, {:.6}", point.lat, point.lng),
                    Severity::Success,
                );
            }
            Err(err) => {
                self.push_alert(
                    &mut events,
                    AlertCategory::Location,
                    err.to_string(),
                    Severity::Warning,
                );
            }
        }
        events
    }

    pub fn set_popular_location(&mut self, point: GeoPoint, name: &str) -> Vec<UiEvent> {
        let mut events = Vec::new();
        self.set_position(point, Some(name.to_string()), &mut events);
        self.push_alert(
            &mut events,
            AlertCategory::Location,
            format!("Location set to {name}"),
            Severity::Success,
        );
        events
    }

    /// Outcome of a reverse lookup for a label-less position write. Stale
    /// results (the position moved meanwhile) are dropped; failures fall
    /// back silently to formatted coordinates.
    pub fn apply_reverse_geocode(
        &mut self,
        point: GeoPoint,
        result: Result<Option<String>, GeocodeError>,
    ) -> Vec<UiEvent> {
        if self.position.point != point {
            return Vec::new();
        }
        let label = match result {
            Ok(Some(display_name)) => geo::short_label(&display_name),
            Ok(None) | Err(_) => geo::fallback_label(point),
        };
        self.position.label = Some(label);
        vec![UiEvent::PositionChanged {
            position: self.position.clone(),
        }]
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn score(&self) -> i32 {
        self.safety.score()
    }

    pub fn panic_active(&self) -> bool {
        self.safety.panic_active()
    }

    pub fn screen(&self) -> Screen {
        self.nav.screen()
    }

    pub fn position(&self) -> &UserPosition {
        &self.position
    }

    pub fn tracking(&self) -> bool {
        self.tracking
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn run_health_check(&mut self, events: &mut Vec<UiEvent>) {
        let draw = sim::draw_health(&mut *self.rng);
        match self.safety.apply_health_draw(draw) {
            HealthOutcome::NoChange => {}
            HealthOutcome::Committed { score, .. } => {
                events.push(self.score_event());
                if score < 60 {
                    self.push_alert(
                        events,
                        AlertCategory::Ai,
                        format!("Safety score dropped to {score}. Enhanced monitoring activated."),
                        Severity::Danger,
                    );
                } else if score > 85 {
                    events.push(UiEvent::SafetySummary {
                        text: VERY_SAFE_SUMMARY.to_string(),
                    });
                }
            }
        }
    }

    fn run_scenario_roll(&mut self, events: &mut Vec<UiEvent>) {
        if self.safety.panic_active() {
            return;
        }
        if let Some(scenario) = sim::roll_scenario(&mut *self.rng) {
            self.push_alert(
                events,
                scenario.category,
                scenario.message.to_string(),
                Severity::Warning,
            );
            self.run_health_check(events);
        }
    }

    fn run_position_jitter(&mut self, events: &mut Vec<UiEvent>) {
        self.position.point = sim::jitter(self.position.point, &mut *self.rng);
        events.push(UiEvent::PositionChanged {
            position: self.position.clone(),
        });
        events.push(UiEvent::Map(MapCommand::MoveUserMarker {
            point: self.position.point,
        }));
        events.push(UiEvent::MapFreshness { text: "just now" });
    }

    fn set_position(&mut self, point: GeoPoint, label: Option<String>, events: &mut Vec<UiEvent>) {
        self.position = UserPosition::new(point, label);
        events.push(UiEvent::PositionChanged {
            position: self.position.clone(),
        });
        events.push(UiEvent::Map(MapCommand::MoveUserMarker { point }));
        let zoom = match self.nav.map_view() {
            MapView::World => POPULAR_WORLD_ZOOM,
            MapView::Local => LOCAL_ZOOM,
        };
        events.push(UiEvent::Map(MapCommand::SetView {
            center: point,
            zoom,
        }));
    }

    fn push_alert(
        &mut self,
        events: &mut Vec<UiEvent>,
        category: AlertCategory,
        message: String,
        severity: Severity,
    ) {
        self.queue.push(category, message, severity, self.clock.wall());
        events.push(self.alerts_event());
        self.raise_badge_cue(events);
    }

    fn alerts_event(&self) -> UiEvent {
        UiEvent::AlertsChanged {
            unread: self.queue.unread_count(),
            alerts: self.queue.snapshot(),
        }
    }

    /// Visual badge pulse on the notification affordance, suppressed while
    /// the alerts screen is already open.
    fn raise_badge_cue(&mut self, events: &mut Vec<UiEvent>) {
        if self.nav.screen() == Screen::Alerts {
            return;
        }
        events.push(UiEvent::BadgeCue {
            duration_secs: self.settings.badge_cue_secs,
        });
        self.timeline.schedule(
            self.clock.instant() + Duration::from_secs(self.settings.badge_cue_secs),
            Deferred::BadgeCueEnd,
        );
    }

    fn score_event(&self) -> UiEvent {
        let tier = self.safety.tier();
        UiEvent::ScoreChanged {
            score: self.safety.score(),
            tier,
            summary: tier.summary().to_string(),
            gradient: tier.gradient(),
        }
    }

    fn apply_deferred(&mut self, deferred: Deferred, events: &mut Vec<UiEvent>) {
        match deferred {
            Deferred::Alert {
                category,
                message,
                severity,
            } => self.push_alert(events, category, message, severity),
            Deferred::EfirFiled { reference } => {
                self.push_alert(
                    events,
                    AlertCategory::System,
                    format!("E-FIR automatically generated (Reference: {reference})"),
                    Severity::Info,
                );
                events.push(UiEvent::EfirStatus { status: "Filed" });
            }
            Deferred::BadgeCueEnd => events.push(UiEvent::BadgeCueEnd),
            Deferred::SearchSuggestion { query } => {
                events.push(UiEvent::SearchSuggestions { query });
            }
        }
    }
}
