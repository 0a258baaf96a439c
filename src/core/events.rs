// Typed events for the rendering collaborator. The core never touches a
// widget; it describes every observable change as a UiEvent and the
// embedder's UiSink decides how to draw it.

use serde::Serialize;

use crate::core::alerts::model::AlertView;
use crate::core::model::{
    GeoFenceZone, GeoPoint, MapView, RiskLevel, Screen, UserPosition, WorldTourist,
};

/// In-flight control whose spinner state must be reverted after an
/// external call resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Affordance {
    SearchButton,
    GpsButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Tourist,
    Police,
    Geofence,
    Incidents,
}

/// Commands for the map-widget collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MapCommand {
    SetView { center: GeoPoint, zoom: u8 },
    MoveUserMarker { point: GeoPoint },
    OpenUserPopup,
    ShowLayer { layer: MapLayer },
    HideLayer { layer: MapLayer },
    AddWorldTourists { tourists: Vec<WorldTourist> },
    ClearWorldTourists,
    /// Draw the static geofence overlay circles. The zones are cosmetic
    /// flavor text; no containment test ever runs against them.
    SetZones { zones: Vec<GeoFenceZone> },
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    /// Queue contents or read-state changed; carries the full newest-first
    /// projection plus the unread badge count.
    AlertsChanged {
        unread: usize,
        alerts: Vec<AlertView>,
    },
    /// Transient pulse on the notification affordance.
    BadgeCue { duration_secs: u64 },
    BadgeCueEnd,
    /// A safety-score commit: new value, tier and card gradient token.
    ScoreChanged {
        score: i32,
        tier: RiskLevel,
        summary: String,
        gradient: &'static str,
    },
    /// Summary text refresh without a score commit.
    SafetySummary { text: String },
    PanicChanged { active: bool },
    EfirStatus { status: &'static str },
    PositionChanged { position: UserPosition },
    /// "Last updated" freshness display.
    MapFreshness { text: &'static str },
    ScreenChanged { screen: Screen },
    MapViewChanged { view: MapView },
    TrackingChanged { enabled: bool },
    ClearSearchInput,
    RestoreAffordance { affordance: Affordance },
    /// Debounced suggestion lookup for the search box.
    SearchSuggestions { query: String },
    Map(MapCommand),
}

/// Rendering collaborator seam.
pub trait UiSink: Send + Sync {
    fn emit(&self, event: &UiEvent);
}

/// Sink that logs every event; used by the demo binary.
pub struct TracingSink;

impl UiSink for TracingSink {
    fn emit(&self, event: &UiEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(target: "tourguard::ui", "{json}"),
            Err(err) => tracing::warn!(target: "tourguard::ui", "unserializable event: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_tags() {
        let event = UiEvent::ScoreChanged {
            score: 62,
            tier: RiskLevel::Medium,
            summary: RiskLevel::Medium.summary().to_string(),
            gradient: RiskLevel::Medium.gradient(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"score_changed\""));
        assert!(json.contains("\"tier\":\"medium\""));

        let map = UiEvent::Map(MapCommand::SetView {
            center: GeoPoint::new(20.0, 0.0),
            zoom: 2,
        });
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"command\":\"set_view\""));
    }
}
