// Coordinate input handling and the external location collaborators.
// Geocoding and device location are modeled as async traits; the crate
// ships no network implementation (transport is out of scope), only the
// seams and their failure taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::core::model::GeoPoint;

lazy_static! {
    static ref COORD_PAIR: Regex =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").unwrap();
}

/// Validation failures for manually entered coordinates. The messages are
/// surfaced verbatim as warning alerts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("Please enter valid latitude and longitude values")]
    NotANumber,
    #[error("Latitude must be between -90 and 90")]
    LatitudeRange,
    #[error("Longitude must be between -180 and 180")]
    LongitudeRange,
}

/// Validate a manually entered pair. Range checks run per axis so the
/// user sees which value is wrong.
pub fn validate_manual(lat: &str, lng: &str) -> Result<GeoPoint, CoordinateError> {
    let lat: f64 = lat.trim().parse().map_err(|_| CoordinateError::NotANumber)?;
    let lng: f64 = lng.trim().parse().map_err(|_| CoordinateError::NotANumber)?;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(CoordinateError::NotANumber);
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::LatitudeRange);
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoordinateError::LongitudeRange);
    }
    Ok(GeoPoint::new(lat, lng))
}

/// Recognize a free-text "lat, lng" query so coordinate entry in the search
/// box skips the geocoder.
pub fn parse_coordinates(text: &str) -> Option<GeoPoint> {
    let caps = COORD_PAIR.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;
    let point = GeoPoint::new(lat, lng);
    point.is_valid().then_some(point)
}

/// First three comma segments of a reverse-geocode display name.
pub fn short_label(display_name: &str) -> String {
    display_name
        .split(',')
        .take(3)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label used when no display name is available.
pub fn fallback_label(point: GeoPoint) -> String {
    format!("{:.4}, {:.4}", point.lat, point.lng)
}

/// Best match for a forward lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub point: GeoPoint,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("geocoding transport failed: {0}")]
    Transport(String),
}

/// Forward and reverse geocoding collaborator. `Ok(None)` means the lookup
/// succeeded but matched nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeMatch>, GeocodeError>;
    async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GeocodeError>;
}

/// Device location request options: high accuracy, 10s timeout, no cached
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
}

impl Default for LocateRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// Device geolocation failure modes. Messages surface as warning alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Location access denied. Please enable location permissions.")]
    PermissionDenied,
    #[error("Location information unavailable.")]
    PositionUnavailable,
    #[error("Location request timed out.")]
    Timeout,
}

#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self, request: &LocateRequest) -> Result<GeoPoint, LocateError>;
}

/// No-network geocoder: every lookup succeeds with no match. Used by the
/// demo binary; real deployments plug in their own transport.
pub struct OfflineGeocoder;

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn forward(&self, _query: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
        Ok(None)
    }

    async fn reverse(&self, _point: GeoPoint) -> Result<Option<String>, GeocodeError> {
        Ok(None)
    }
}

/// No-sensor locator: always reports the position as unavailable.
pub struct OfflineLocator;

#[async_trait]
impl DeviceLocator for OfflineLocator {
    async fn current_position(&self, _request: &LocateRequest) -> Result<GeoPoint, LocateError> {
        Err(LocateError::PositionUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_validation_ranges() {
        assert_eq!(
            validate_manual("25.5788", "91.8933"),
            Ok(GeoPoint::new(25.5788, 91.8933))
        );
        // Worked example: (91, 40) is rejected on latitude.
        assert_eq!(
            validate_manual("91", "40"),
            Err(CoordinateError::LatitudeRange)
        );
        assert_eq!(
            validate_manual("45", "-181"),
            Err(CoordinateError::LongitudeRange)
        );
        assert_eq!(
            validate_manual("abc", "40"),
            Err(CoordinateError::NotANumber)
        );
        assert_eq!(
            validate_manual("NaN", "40"),
            Err(CoordinateError::NotANumber)
        );
    }

    #[test]
    fn test_parse_coordinate_pair() {
        assert_eq!(
            parse_coordinates("25.58, 91.90"),
            Some(GeoPoint::new(25.58, 91.90))
        );
        assert_eq!(
            parse_coordinates(" -33.8688,151.2093 "),
            Some(GeoPoint::new(-33.8688, 151.2093))
        );
        assert_eq!(parse_coordinates("Elephant Falls"), None);
        // Out-of-range pairs are not coordinates.
        assert_eq!(parse_coordinates("95.0, 10.0"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            short_label("Elephant Falls, East Khasi Hills, Meghalaya, 793005, India"),
            "Elephant Falls, East Khasi Hills, Meghalaya"
        );
        assert_eq!(short_label("Shillong"), "Shillong");
        assert_eq!(
            fallback_label(GeoPoint::new(25.5788, 91.8933)),
            "25.5788, 91.8933"
        );
    }

    #[test]
    fn test_locate_request_defaults() {
        let request = LocateRequest::default();
        assert!(request.high_accuracy);
        assert_eq!(request.timeout, Duration::from_secs(10));
        assert_eq!(request.max_age, Duration::ZERO);
    }
}
