use std::sync::Arc;

use crate::error::Result;
use crate::models::quiz::{QuizResultAck, QuizResultPayload, QuizResults};
use crate::services::civic_api::GamificationBackend;

/// Submits finished quiz sessions to the gamification service.
///
/// The results handed in are already final: they were computed locally by
/// the engine, and a failed submission never invalidates them. Callers show
/// the local score either way and may retry the submission on user action.
pub struct QuizService {
    backend: Arc<dyn GamificationBackend>,
}

impl QuizService {
    pub fn new(backend: Arc<dyn GamificationBackend>) -> Self {
        Self { backend }
    }

    /// Submit a finished session once. `quiz_type` is the product category
    /// of the quiz (e.g. which subject area it belongs to).
    pub async fn submit_results(
        &self,
        user_id: &str,
        quiz_type: &str,
        results: &QuizResults,
    ) -> Result<QuizResultAck> {
        let payload = Self::build_payload(quiz_type, results);

        match self.backend.submit_quiz_result(user_id, &payload).await {
            Ok(ack) => {
                tracing::info!(
                    "Quiz result submitted: session={} user={} points_earned={}",
                    results.session_id,
                    user_id,
                    ack.points_earned
                );
                Ok(ack)
            }
            Err(e) => {
                // Local results stay valid; the caller decides whether to
                // retry or just show the local score.
                tracing::warn!(
                    "Quiz result submission failed: session={} user={}: {}",
                    results.session_id,
                    user_id,
                    e
                );
                Err(e)
            }
        }
    }

    fn build_payload(quiz_type: &str, results: &QuizResults) -> QuizResultPayload {
        QuizResultPayload {
            quiz_type: quiz_type.to_string(),
            score: results.total_score,
            accuracy: results.accuracy,
            time_spent: results.time_spent_seconds,
            streak: results.best_streak,
            level: results.tier.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::QuizTier;
    use uuid::Uuid;

    #[test]
    fn payload_carries_the_session_aggregates() {
        let results = QuizResults {
            session_id: Uuid::new_v4(),
            tier: QuizTier::Advanced,
            total_questions: 4,
            correct_count: 3,
            total_score: 48,
            accuracy: 75,
            best_streak: 2,
            time_spent_seconds: 93,
            classification: "Muito bom".to_string(),
            answers: Vec::new(),
        };

        let payload = QuizService::build_payload("politica", &results);
        assert_eq!(payload.quiz_type, "politica");
        assert_eq!(payload.score, 48);
        assert_eq!(payload.accuracy, 75);
        assert_eq!(payload.time_spent, 93);
        assert_eq!(payload.streak, 2);
        assert_eq!(payload.level, "advanced");
    }
}
