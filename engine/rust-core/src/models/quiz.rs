use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty tiers offered by the quiz catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizTier {
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl QuizTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizTier::Intermediate => "intermediate",
            QuizTier::Advanced => "advanced",
            QuizTier::Expert => "expert",
            QuizTier::Master => "master",
        }
    }
}

/// Balancing knobs for one tier. These are product decisions carried as
/// configuration data, not derived invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Countdown ceiling per question, in seconds.
    pub time_limit_seconds: u32,
    /// Points a correct answer earns before the streak bonus.
    pub base_points: i32,
    /// Bonus per consecutive correct answer already on the streak.
    pub streak_multiplier: i32,
    /// How long the explanation stays on screen before auto-advance.
    pub explanation_dwell_seconds: u32,
}

/// Per-tier configuration table. Harder tiers pay more per question but
/// leave less time on the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub intermediate: TierConfig,
    pub advanced: TierConfig,
    pub expert: TierConfig,
    pub master: TierConfig,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            intermediate: TierConfig {
                time_limit_seconds: 45,
                base_points: 15,
                streak_multiplier: 3,
                explanation_dwell_seconds: 6,
            },
            advanced: TierConfig {
                time_limit_seconds: 30,
                base_points: 25,
                streak_multiplier: 5,
                explanation_dwell_seconds: 5,
            },
            expert: TierConfig {
                time_limit_seconds: 25,
                base_points: 35,
                streak_multiplier: 7,
                explanation_dwell_seconds: 4,
            },
            master: TierConfig {
                time_limit_seconds: 20,
                base_points: 50,
                streak_multiplier: 10,
                explanation_dwell_seconds: 3,
            },
        }
    }
}

impl TierTable {
    pub fn config_for(&self, tier: QuizTier) -> TierConfig {
        match tier {
            QuizTier::Intermediate => self.intermediate,
            QuizTier::Advanced => self.advanced,
            QuizTier::Expert => self.expert,
            QuizTier::Master => self.master,
        }
    }
}

/// One timed multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    pub tier: QuizTier,
    pub base_points: i32,
}

/// Outcome recorded for one question, in question order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_id: String,
    /// `None` when the countdown expired with no selection.
    pub selected_option: Option<usize>,
    pub correct: bool,
    pub points_awarded: i32,
    pub time_taken_seconds: u32,
}

/// One step of the accuracy-to-label mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationBand {
    pub min_accuracy: u8,
    pub label: String,
}

/// Monotonic step function from integer accuracy to a qualitative label.
/// Thresholds are configuration, overridable per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTable {
    pub bands: Vec<ClassificationBand>,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        let bands = [
            (90, "Excelente"),
            (70, "Muito bom"),
            (50, "Bom"),
            (30, "Regular"),
            (0, "Precisa melhorar"),
        ];
        Self {
            bands: bands
                .into_iter()
                .map(|(min_accuracy, label)| ClassificationBand {
                    min_accuracy,
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}

impl ClassificationTable {
    /// Highest band whose threshold the accuracy clears. Bands are kept
    /// sorted by descending threshold; the last band must cover zero.
    pub fn label_for(&self, accuracy: u8) -> &str {
        self.bands
            .iter()
            .find(|band| accuracy >= band.min_accuracy)
            .map(|band| band.label.as_str())
            .unwrap_or("")
    }
}

/// Immutable summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct QuizResults {
    pub session_id: Uuid,
    pub tier: QuizTier,
    pub total_questions: u32,
    pub correct_count: u32,
    pub total_score: i32,
    /// Integer percentage, always in `0..=100`.
    pub accuracy: u8,
    pub best_streak: u32,
    pub time_spent_seconds: u32,
    pub classification: String,
    pub answers: Vec<RecordedAnswer>,
}

/// Body of `POST /gamification/users/{userId}/quiz-result`. The gamification
/// service speaks camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultPayload {
    pub quiz_type: String,
    pub score: i32,
    pub accuracy: u8,
    pub time_spent: u32,
    pub streak: u32,
    pub level: String,
}

/// Acknowledgement returned by the gamification service.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultAck {
    #[serde(default)]
    pub points_earned: i32,
    #[serde(default)]
    pub new_level: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}
