use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

pub type PlaceName = String;

/// A WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Clamp into valid coordinate ranges.
    pub fn clamped(self) -> Self {
        Self {
            lat: self.lat.clamp(-90.0, 90.0),
            lng: self.lng.clamp(-180.0, 180.0),
        }
    }
}

/// The single process-wide user position. Last writer wins; all writers run
/// on the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub point: GeoPoint,
    pub label: Option<String>,
}

impl UserPosition {
    pub fn new(point: GeoPoint, label: Option<String>) -> Self {
        Self { point, label }
    }
}

/// Top-level screens, in swipe order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Dashboard,
    Map,
    Alerts,
    Profile,
}

impl Screen {
    pub fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Map, Self::Alerts, Self::Profile]
    }

    pub fn next(self) -> Self {
        let ring = Self::all();
        let idx = ring.iter().position(|s| *s == self).unwrap_or(0);
        ring[(idx + 1) % ring.len()]
    }

    pub fn prev(self) -> Self {
        let ring = Self::all();
        let idx = ring.iter().position(|s| *s == self).unwrap_or(0);
        ring[(idx + ring.len() - 1) % ring.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapView {
    Local,
    World,
}

/// Risk label shared by geofence zones and safety-score tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Score tier mapping: >=80 low, >=60 medium, else high.
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            Self::Low
        } else if score >= 60 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Low => "AI monitoring active • Low risk",
            Self::Medium => "AI monitoring active • Medium risk",
            Self::High => "AI monitoring active • High risk detected",
        }
    }

    /// Gradient style token for the safety card.
    pub fn gradient(&self) -> &'static str {
        match self {
            Self::Low => "linear-gradient(135deg,#0ea5e9 0%,#60a5fa 100%)",
            Self::Medium => "linear-gradient(135deg,#f59e0b 0%,#f97316 100%)",
            Self::High => "linear-gradient(135deg,#ef4444 0%,#dc2626 100%)",
        }
    }
}

/// Static geofence flavor-text zone. Never evaluated against the actual
/// position; only a source of simulated alert text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeoFenceZone {
    pub name: &'static str,
    pub risk: RiskLevel,
    pub message: &'static str,
}

/// Static tourist marker shown in the world map view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldTourist {
    pub point: GeoPoint,
    pub name: &'static str,
    pub country: &'static str,
    pub score: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Current,
    Next,
    Planned,
}

/// One entry of the day's trip plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryStop {
    pub time: String,
    pub place: PlaceName,
    pub status: StopStatus,
}

/// Static identity data shown on the profile screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouristProfile {
    pub name: String,
    pub digital_id: String,
    pub home_label: String,
    pub emergency_contacts: Vec<String>,
}

lazy_static! {
    pub static ref GEO_FENCE_ZONES: Vec<GeoFenceZone> = vec![
        GeoFenceZone {
            name: "Ward's Lake Area",
            risk: RiskLevel::Low,
            message: "Safe tourist zone",
        },
        GeoFenceZone {
            name: "Elephant Falls Trail",
            risk: RiskLevel::Medium,
            message: "Caution: Slippery paths",
        },
        GeoFenceZone {
            name: "Restricted Military Area",
            risk: RiskLevel::High,
            message: "Entry prohibited",
        },
        GeoFenceZone {
            name: "Late Night Commercial Areas",
            risk: RiskLevel::Medium,
            message: "Enhanced patrol recommended",
        },
    ];

    pub static ref WORLD_TOURISTS: Vec<WorldTourist> = vec![
        WorldTourist { point: GeoPoint::new(40.7128, -74.0060), name: "Tourist NYC", country: "USA", score: 88 },
        WorldTourist { point: GeoPoint::new(51.5074, -0.1278), name: "Tourist London", country: "UK", score: 92 },
        WorldTourist { point: GeoPoint::new(35.6762, 139.6503), name: "Tourist Tokyo", country: "Japan", score: 85 },
        WorldTourist { point: GeoPoint::new(-33.8688, 151.2093), name: "Tourist Sydney", country: "Australia", score: 90 },
        WorldTourist { point: GeoPoint::new(48.8566, 2.3522), name: "Tourist Paris", country: "France", score: 86 },
        WorldTourist { point: GeoPoint::new(55.7558, 37.6173), name: "Tourist Moscow", country: "Russia", score: 78 },
        WorldTourist { point: GeoPoint::new(39.9042, 116.4074), name: "Tourist Beijing", country: "China", score: 82 },
        WorldTourist { point: GeoPoint::new(-23.5505, -46.6333), name: "Tourist São Paulo", country: "Brazil", score: 79 },
        WorldTourist { point: GeoPoint::new(19.4326, -99.1332), name: "Tourist Mexico City", country: "Mexico", score: 75 },
        WorldTourist { point: GeoPoint::new(30.0444, 31.2357), name: "Tourist Cairo", country: "Egypt", score: 73 },
    ];
}

/// Nearby places used when drawing a simulated "last seen" location.
pub static KNOWN_PLACES: &[&str] = &[
    "Ward's Lake",
    "Elephant Falls",
    "Police Bazaar",
    "Don Bosco Museum",
    "Hotel Pine Borough",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_ring_wraps() {
        assert_eq!(Screen::Profile.next(), Screen::Dashboard);
        assert_eq!(Screen::Dashboard.prev(), Screen::Profile);
        assert_eq!(Screen::Dashboard.next(), Screen::Map);
    }

    #[test]
    fn test_risk_tier_boundaries() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::High);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(25.5788, 91.8933).is_valid());
        assert!(!GeoPoint::new(91.0, 40.0).is_valid());
        assert!(!GeoPoint::new(45.0, 181.0).is_valid());

        let clamped = GeoPoint::new(91.0, -200.0).clamped();
        assert_eq!(clamped, GeoPoint::new(90.0, -180.0));
    }

    #[test]
    fn test_zone_table_is_cosmetic_flavor_text() {
        assert_eq!(GEO_FENCE_ZONES.len(), 4);
        assert!(GEO_FENCE_ZONES
            .iter()
            .any(|z| z.risk == RiskLevel::High && z.message == "Entry prohibited"));
    }
}
