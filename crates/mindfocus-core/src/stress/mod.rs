//! Stress signal integration.
//!
//! Readings arrive from a pluggable [`StressProbe`] (synthetic by default),
//! get clamped and classified, and feed a rolling window of the most recent
//! 20 readings. The window is never persisted. Recommendations are derived
//! from the average and trend of the last five readings.

mod breathing;
mod probe;

pub use breathing::{BreathPhase, BreathStep, BreathingExercise, BreathingPattern, PATTERNS};
pub use probe::{StressProbe, SyntheticProbe};

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rolling window capacity; reading #21 evicts reading #1.
pub const WINDOW_CAP: usize = 20;

/// How many recent readings feed the average/trend computation.
const RECENT: usize = 5;

/// Classification thresholds: low [0,30], medium (30,60], high (60,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub fn classify(score: f64) -> Self {
        if score > 60.0 {
            StressLevel::High
        } else if score > 30.0 {
            StressLevel::Medium
        } else {
            StressLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Medium => "medium",
            StressLevel::High => "high",
        }
    }
}

/// Snapshot of the timer at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionTag {
    Focus,
    Break,
    Idle,
}

impl SessionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionTag::Focus => "focus",
            SessionTag::Break => "break",
            SessionTag::Idle => "idle",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressReading {
    pub score: f64,
    pub timestamp: DateTime<Utc>,
    pub tag: SessionTag,
}

/// Result of observing one reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressAssessment {
    /// Clamped score of this reading.
    pub score: f64,
    /// Instantaneous classification of this reading.
    pub level: StressLevel,
    /// Average of the last five readings, once the window holds >= 3.
    pub average: Option<f64>,
    /// Last minus first of the last five readings.
    pub trend: Option<f64>,
    pub recommendations: Vec<String>,
    pub breathing_suggested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StressMonitor {
    window: VecDeque<StressReading>,
    breathing_suggested: bool,
}

impl StressMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> &VecDeque<StressReading> {
        &self.window
    }

    pub fn breathing_suggested(&self) -> bool {
        self.breathing_suggested
    }

    pub fn dismiss_breathing(&mut self) {
        self.breathing_suggested = false;
    }

    /// Average score across readings carrying the given tag.
    pub fn session_average(&self, tag: SessionTag) -> Option<f64> {
        let scores: Vec<f64> = self
            .window
            .iter()
            .filter(|r| r.tag == tag)
            .map(|r| r.score)
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Ingest one reading. Returns the assessment; whether the breathing
    /// suggestion flag was newly raised is reported via
    /// [`StressAssessment::breathing_suggested`] going true.
    pub fn observe(&mut self, score: f64, tag: SessionTag) -> StressAssessment {
        let score = score.clamp(0.0, 100.0);
        self.window.push_back(StressReading {
            score,
            timestamp: Utc::now(),
            tag,
        });
        while self.window.len() > WINDOW_CAP {
            self.window.pop_front();
        }

        let mut assessment = StressAssessment {
            score,
            level: StressLevel::classify(score),
            average: None,
            trend: None,
            recommendations: Vec::new(),
            breathing_suggested: self.breathing_suggested,
        };
        if self.window.len() < 3 {
            return assessment;
        }

        let recent: Vec<f64> = self
            .window
            .iter()
            .rev()
            .take(RECENT)
            .map(|r| r.score)
            .collect();
        let average = recent.iter().sum::<f64>() / recent.len() as f64;
        // `recent` is newest-first.
        let trend = recent[0] - recent[recent.len() - 1];

        let window_level = StressLevel::classify(average);
        match window_level {
            StressLevel::High => {
                assessment.recommendations.extend([
                    "Consider taking a longer break".to_string(),
                    "Try a breathing exercise".to_string(),
                    "Switch to an easier task".to_string(),
                ]);
                if tag == SessionTag::Focus {
                    self.breathing_suggested = true;
                }
            }
            StressLevel::Medium => {
                assessment.recommendations.extend([
                    "Take a short breathing break".to_string(),
                    "Check your posture".to_string(),
                    "Ensure good lighting".to_string(),
                ]);
            }
            StressLevel::Low => {
                assessment.recommendations.extend([
                    "Great focus level! Keep it up".to_string(),
                    "You're in the zone".to_string(),
                ]);
            }
        }
        if trend > 10.0 {
            assessment
                .recommendations
                .push("Stress levels are rising - take a break soon".to_string());
        } else if trend < -10.0 {
            assessment
                .recommendations
                .push("Stress levels improving - good job!".to_string());
        }

        assessment.average = Some(average);
        assessment.trend = Some(trend);
        assessment.breathing_suggested = self.breathing_suggested;
        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries() {
        assert_eq!(StressLevel::classify(0.0), StressLevel::Low);
        assert_eq!(StressLevel::classify(30.0), StressLevel::Low);
        assert_eq!(StressLevel::classify(45.0), StressLevel::Medium);
        assert_eq!(StressLevel::classify(60.0), StressLevel::Medium);
        assert_eq!(StressLevel::classify(72.0), StressLevel::High);
        assert_eq!(StressLevel::classify(100.0), StressLevel::High);
    }

    #[test]
    fn scores_are_clamped() {
        let mut m = StressMonitor::new();
        assert_eq!(m.observe(-5.0, SessionTag::Idle).score, 0.0);
        assert_eq!(m.observe(140.0, SessionTag::Idle).score, 100.0);
    }

    #[test]
    fn window_caps_at_twenty() {
        let mut m = StressMonitor::new();
        for i in 0..21 {
            m.observe(f64::from(i), SessionTag::Idle);
        }
        assert_eq!(m.readings().len(), WINDOW_CAP);
        // Reading #1 (score 0) was evicted.
        assert_eq!(m.readings().front().map(|r| r.score), Some(1.0));
    }

    #[test]
    fn no_recommendations_until_three_readings() {
        let mut m = StressMonitor::new();
        assert!(m.observe(80.0, SessionTag::Focus).recommendations.is_empty());
        assert!(m.observe(80.0, SessionTag::Focus).recommendations.is_empty());
        assert!(!m.observe(80.0, SessionTag::Focus).recommendations.is_empty());
    }

    #[test]
    fn high_average_suggests_breathing_only_in_focus() {
        let mut m = StressMonitor::new();
        for _ in 0..3 {
            m.observe(85.0, SessionTag::Break);
        }
        assert!(!m.breathing_suggested());

        let a = m.observe(85.0, SessionTag::Focus);
        assert!(m.breathing_suggested());
        assert!(a.breathing_suggested);
        assert!(a.recommendations.iter().any(|r| r.contains("breathing")));
    }

    #[test]
    fn rising_trend_adds_warning() {
        let mut m = StressMonitor::new();
        for score in [10.0, 15.0, 20.0, 25.0, 40.0] {
            m.observe(score, SessionTag::Focus);
        }
        let a = m.observe(50.0, SessionTag::Focus);
        // Last five: 15,20,25,40,50 -> trend +35.
        assert_eq!(a.trend, Some(35.0));
        assert!(a.recommendations.iter().any(|r| r.contains("rising")));
    }

    #[test]
    fn falling_trend_adds_praise() {
        let mut m = StressMonitor::new();
        for score in [80.0, 70.0, 55.0, 40.0] {
            m.observe(score, SessionTag::Break);
        }
        let a = m.observe(30.0, SessionTag::Break);
        // Last five: 80,70,55,40,30 -> trend -50.
        assert_eq!(a.trend, Some(-50.0));
        assert!(a.recommendations.iter().any(|r| r.contains("improving")));
    }

    #[test]
    fn low_average_reinforces() {
        let mut m = StressMonitor::new();
        for _ in 0..4 {
            m.observe(10.0, SessionTag::Focus);
        }
        let a = m.observe(12.0, SessionTag::Focus);
        assert!(a.recommendations.iter().any(|r| r.contains("Keep it up")));
        assert!(!m.breathing_suggested());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn observe_always_clamps_and_caps(
                scores in proptest::collection::vec(-50.0f64..150.0, 1..60),
            ) {
                let mut m = StressMonitor::new();
                for score in scores {
                    let a = m.observe(score, SessionTag::Focus);
                    prop_assert!((0.0..=100.0).contains(&a.score));
                    prop_assert_eq!(a.level, StressLevel::classify(a.score));
                    prop_assert!(m.readings().len() <= WINDOW_CAP);
                }
            }
        }
    }

    #[test]
    fn session_average_filters_by_tag() {
        let mut m = StressMonitor::new();
        m.observe(20.0, SessionTag::Focus);
        m.observe(40.0, SessionTag::Focus);
        m.observe(90.0, SessionTag::Break);
        assert_eq!(m.session_average(SessionTag::Focus), Some(30.0));
        assert_eq!(m.session_average(SessionTag::Break), Some(90.0));
        assert_eq!(m.session_average(SessionTag::Idle), None);
    }
}
