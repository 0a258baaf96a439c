use crate::core::model::{MapView, RiskLevel, Screen};

pub const SCORE_MIN: i32 = 20;
pub const SCORE_MAX: i32 = 100;
/// A score change only commits when it moved at least this far.
pub const COMMIT_DELTA: i32 = 5;
/// Minimum swipe distance before a gesture navigates.
pub const SWIPE_THRESHOLD_PX: f64 = 100.0;

/// One health-check random draw: a risk factor in [0,4) and its sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthDraw {
    pub risk_factor: i32,
    pub positive: bool,
}

/// Result of applying a health draw to the safety state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Delta below the commit threshold; displayed score unchanged.
    NoChange,
    Committed { score: i32, tier: RiskLevel },
}

pub struct SafetyState {
    score: i32,
    panic_active: bool,
}

impl SafetyState {
    pub fn new(score: i32) -> Self {
        Self {
            score: score.clamp(SCORE_MIN, SCORE_MAX),
            panic_active: false,
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn tier(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    pub fn panic_active(&self) -> bool {
        self.panic_active
    }

    /// Flip panic mode, returning the new state.
    pub fn toggle_panic(&mut self) -> bool {
        self.panic_active = !self.panic_active;
        self.panic_active
    }

    /// Apply one random perturbation. The candidate is clamped to
    /// [SCORE_MIN, SCORE_MAX] and only commits when it moved by at least
    /// COMMIT_DELTA from the current committed score.
    pub fn apply_health_draw(&mut self, draw: HealthDraw) -> HealthOutcome {
        let delta = if draw.positive {
            draw.risk_factor
        } else {
            -draw.risk_factor
        };
        let candidate = (self.score + delta).clamp(SCORE_MIN, SCORE_MAX);

        if (candidate - self.score).abs() >= COMMIT_DELTA {
            self.score = candidate;
            HealthOutcome::Committed {
                score: candidate,
                tier: RiskLevel::from_score(candidate),
            }
        } else {
            HealthOutcome::NoChange
        }
    }
}

/// Current screen plus map view mode. Transitions happen only through
/// explicit navigation or a swipe crossing the threshold.
pub struct NavigationState {
    screen: Screen,
    map_view: MapView,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Dashboard,
            map_view: MapView::Local,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn map_view(&self) -> MapView {
        self.map_view
    }

    /// Returns true when the screen actually changed.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if self.screen == screen {
            return false;
        }
        self.screen = screen;
        true
    }

    /// Horizontal swipe: positive delta is a leftward swipe (next screen).
    /// Deltas under the threshold are ignored.
    pub fn swipe(&mut self, delta_px: f64) -> Option<Screen> {
        if delta_px.abs() <= SWIPE_THRESHOLD_PX {
            return None;
        }
        let target = if delta_px > 0.0 {
            self.screen.next()
        } else {
            self.screen.prev()
        };
        self.screen = target;
        Some(target)
    }

    pub fn set_map_view(&mut self, view: MapView) -> bool {
        if self.map_view == view {
            return false;
        }
        self.map_view = view;
        true
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamped_on_construction() {
        assert_eq!(SafetyState::new(5).score(), SCORE_MIN);
        assert_eq!(SafetyState::new(150).score(), SCORE_MAX);
    }

    #[test]
    fn test_small_delta_does_not_commit() {
        // Worked example: score 82, draw 3 negative -> candidate 79,
        // |82-79| = 3 < 5 -> no commit.
        let mut safety = SafetyState::new(82);
        let outcome = safety.apply_health_draw(HealthDraw {
            risk_factor: 3,
            positive: false,
        });
        assert_eq!(outcome, HealthOutcome::NoChange);
        assert_eq!(safety.score(), 82);
    }

    #[test]
    fn test_large_delta_commits_and_clamps() {
        let mut safety = SafetyState::new(22);
        let outcome = safety.apply_health_draw(HealthDraw {
            risk_factor: 8,
            positive: false,
        });
        // Candidate clamps to SCORE_MIN; |22-20| = 2 < 5 -> still no commit.
        assert_eq!(outcome, HealthOutcome::NoChange);
        assert_eq!(safety.score(), 22);

        let outcome = safety.apply_health_draw(HealthDraw {
            risk_factor: 40,
            positive: true,
        });
        assert_eq!(
            outcome,
            HealthOutcome::Committed {
                score: 62,
                tier: RiskLevel::Medium
            }
        );
        assert_eq!(safety.score(), 62);
    }

    #[test]
    fn test_score_stays_in_bounds_for_any_draw() {
        let mut safety = SafetyState::new(82);
        for factor in 0..200 {
            safety.apply_health_draw(HealthDraw {
                risk_factor: factor,
                positive: factor % 2 == 0,
            });
            assert!((SCORE_MIN..=SCORE_MAX).contains(&safety.score()));
        }
    }

    #[test]
    fn test_panic_toggle_is_two_state_flip() {
        let mut safety = SafetyState::new(82);
        assert!(!safety.panic_active());
        assert!(safety.toggle_panic());
        assert!(!safety.toggle_panic());
        assert!(!safety.panic_active());
    }

    #[test]
    fn test_swipe_threshold() {
        let mut nav = NavigationState::new();
        assert_eq!(nav.swipe(50.0), None);
        assert_eq!(nav.screen(), Screen::Dashboard);

        assert_eq!(nav.swipe(150.0), Some(Screen::Map));
        assert_eq!(nav.swipe(-150.0), Some(Screen::Dashboard));
    }

    #[test]
    fn test_navigate_reports_change() {
        let mut nav = NavigationState::new();
        assert!(nav.navigate(Screen::Alerts));
        assert!(!nav.navigate(Screen::Alerts));
    }
}
