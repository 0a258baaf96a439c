use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::model::{GeoPoint, ItineraryStop, StopStatus, TouristProfile};

/// Application settings: simulation periods, thresholds and the static
/// profile/itinerary sample data.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_health_check_secs")]
    pub health_check_secs: u64,
    #[serde(default = "default_scenario_warmup_secs")]
    pub scenario_warmup_secs: u64,
    #[serde(default = "default_scenario_period_secs")]
    pub scenario_period_secs: u64,
    #[serde(default = "default_jitter_period_secs")]
    pub jitter_period_secs: u64,
    #[serde(default = "default_badge_cue_secs")]
    pub badge_cue_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,
    #[serde(default = "default_initial_score")]
    pub initial_score: i32,
    #[serde(default = "default_home_position")]
    pub home_position: GeoPoint,
    #[serde(default = "default_profile")]
    pub profile: TouristProfile,
    #[serde(default = "default_itinerary")]
    pub itinerary: Vec<ItineraryStop>,
}

fn default_health_check_secs() -> u64 {
    45
}

fn default_scenario_warmup_secs() -> u64 {
    10
}

fn default_scenario_period_secs() -> u64 {
    60
}

fn default_jitter_period_secs() -> u64 {
    30
}

fn default_badge_cue_secs() -> u64 {
    5
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_alert_capacity() -> usize {
    20
}

fn default_initial_score() -> i32 {
    82
}

// Shillong, Meghalaya.
fn default_home_position() -> GeoPoint {
    GeoPoint::new(25.5788, 91.8933)
}

fn default_profile() -> TouristProfile {
    TouristProfile {
        name: "Sandra Glam".to_string(),
        digital_id: "TD-2024-11-001".to_string(),
        home_label: "Shillong, Meghalaya".to_string(),
        emergency_contacts: vec![
            "+91-98765-43210".to_string(),
            "+91-87654-32109".to_string(),
            "police@meghalaya.gov.in".to_string(),
        ],
    }
}

fn default_itinerary() -> Vec<ItineraryStop> {
    let stop = |time: &str, place: &str, status| ItineraryStop {
        time: time.to_string(),
        place: place.to_string(),
        status,
    };
    vec![
        stop("08:00", "Ward's Lake", StopStatus::Current),
        stop("12:00", "Elephant Falls", StopStatus::Next),
        stop("15:30", "Don Bosco Museum", StopStatus::Planned),
        stop("18:00", "Police Bazaar", StopStatus::Planned),
        stop("20:30", "Hotel Return", StopStatus::Planned),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            health_check_secs: default_health_check_secs(),
            scenario_warmup_secs: default_scenario_warmup_secs(),
            scenario_period_secs: default_scenario_period_secs(),
            jitter_period_secs: default_jitter_period_secs(),
            badge_cue_secs: default_badge_cue_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            alert_capacity: default_alert_capacity(),
            initial_score: default_initial_score(),
            home_position: default_home_position(),
            profile: default_profile(),
            itinerary: default_itinerary(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    /// Load settings, falling back to defaults on any read or parse failure.
    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_simulation_periods() {
        let settings = Settings::default();
        assert_eq!(settings.health_check_secs, 45);
        assert_eq!(settings.scenario_period_secs, 60);
        assert_eq!(settings.jitter_period_secs, 30);
        assert_eq!(settings.alert_capacity, 20);
        assert_eq!(settings.initial_score, 82);
        assert_eq!(settings.itinerary.len(), 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let loaded = manager.load();
        assert_eq!(loaded.health_check_secs, 45);

        let mut settings = Settings::default();
        settings.health_check_secs = 5;
        settings.profile.name = "Test Tourist".to_string();

        manager.save(&settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded.health_check_secs, 5);
        assert_eq!(loaded.profile.name, "Test Tourist");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(dir.path().join("settings.json"), "{not json").unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.initial_score, 82);
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(
            dir.path().join("settings.json"),
            r#"{"health_check_secs": 1}"#,
        )
        .unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.health_check_secs, 1);
        assert_eq!(loaded.scenario_period_secs, 60);
        assert_eq!(loaded.profile.digital_id, "TD-2024-11-001");
    }
}
