use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::quiz::{
    ClassificationTable, Question, QuizResults, QuizTier, RecordedAnswer, TierConfig, TierTable,
};

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// Question on screen, countdown running.
    Presented { time_remaining: u32 },
    /// Answer recorded; correct answer and explanation on screen until the
    /// dwell elapses and the driver calls [`QuizEngine::advance`].
    Explaining { last_correct: bool },
    /// Terminal. Results are frozen; no further mutation is accepted.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Remaining(u32),
    Expired,
}

/// One quiz session: a parameterized state machine over an ordered question
/// sequence.
///
/// All five difficulty levels of the product run through this same engine;
/// only the [`TierConfig`] tuple differs. Transitions are strictly
/// sequential: exactly one question is ever `Presented`, and exactly one
/// answer is recorded per question, in order.
#[derive(Debug)]
pub struct QuizEngine {
    session_id: Uuid,
    tier: QuizTier,
    tier_config: TierConfig,
    classification: ClassificationTable,
    questions: Vec<Question>,
    current_index: usize,
    phase: QuizPhase,
    score: i32,
    streak: u32,
    best_streak: u32,
    correct_count: u32,
    time_spent_seconds: u32,
    answers: Vec<RecordedAnswer>,
}

impl QuizEngine {
    /// Start a session. An empty question sequence is invalid input and is
    /// rejected here so the accuracy computation can never divide by zero.
    pub fn new(
        tier: QuizTier,
        questions: Vec<Question>,
        tiers: &TierTable,
        classification: ClassificationTable,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(EngineError::Validation(
                "quiz must contain at least one question".to_string(),
            ));
        }
        for question in &questions {
            if question.options.len() < 2 {
                return Err(EngineError::Validation(format!(
                    "question {} needs at least two options",
                    question.id
                )));
            }
            if question.correct_index >= question.options.len() {
                return Err(EngineError::Validation(format!(
                    "question {} has correct_index out of range",
                    question.id
                )));
            }
        }

        let tier_config = tiers.config_for(tier);
        if tier_config.time_limit_seconds == 0 {
            return Err(EngineError::Validation(
                "tier time limit must be positive".to_string(),
            ));
        }

        let session_id = Uuid::new_v4();
        tracing::info!(
            "Quiz session started: {} tier={} questions={}",
            session_id,
            tier.as_str(),
            questions.len()
        );

        Ok(Self {
            session_id,
            tier,
            tier_config,
            classification,
            questions,
            current_index: 0,
            phase: QuizPhase::Presented {
                time_remaining: tier_config.time_limit_seconds,
            },
            score: 0,
            streak: 0,
            best_streak: 0,
            correct_count: 0,
            time_spent_seconds: 0,
            answers: Vec::new(),
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    pub fn last_answer(&self) -> Option<&RecordedAnswer> {
        self.answers.last()
    }

    /// How long the explanation stays on screen before the driver advances.
    pub fn explanation_dwell(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tier_config.explanation_dwell_seconds as u64)
    }

    /// One countdown tick for the presented question. Reaching zero scores
    /// the question as a timeout (no selection, incorrect) immediately; a
    /// click arriving after that is rejected, never re-scored.
    ///
    /// Ticks outside `Presented` are a driver bug: the countdown must be
    /// cancelled whenever the question leaves that phase.
    pub fn tick(&mut self) -> Result<TickResult> {
        let remaining = match self.phase {
            QuizPhase::Presented { time_remaining } => time_remaining,
            _ => return Err(EngineError::InvalidTransition("tick outside presented question")),
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            tracing::debug!(
                "Question timed out: session={} index={}",
                self.session_id,
                self.current_index
            );
            self.record_answer(None, 0);
            return Ok(TickResult::Expired);
        }

        self.phase = QuizPhase::Presented {
            time_remaining: remaining,
        };
        Ok(TickResult::Remaining(remaining))
    }

    /// Record the user's selection for the presented question. Returns
    /// whether it was correct.
    pub fn answer(&mut self, selected: usize) -> Result<bool> {
        let remaining = match self.phase {
            QuizPhase::Presented { time_remaining } => time_remaining,
            QuizPhase::Explaining { .. } => {
                return Err(EngineError::InvalidTransition(
                    "question already answered",
                ))
            }
            QuizPhase::Finished => {
                return Err(EngineError::InvalidTransition("session already finished"))
            }
        };

        if selected >= self.current_question().options.len() {
            return Err(EngineError::Validation(format!(
                "selected option {} out of range",
                selected
            )));
        }

        self.record_answer(Some(selected), remaining);
        Ok(self.answers[self.answers.len() - 1].correct)
    }

    /// Leave the explanation screen: present the next question, or finish
    /// when the answered question was the last one.
    pub fn advance(&mut self) -> Result<&QuizPhase> {
        if !matches!(self.phase, QuizPhase::Explaining { .. }) {
            return Err(EngineError::InvalidTransition("nothing to advance from"));
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.phase = QuizPhase::Presented {
                time_remaining: self.tier_config.time_limit_seconds,
            };
        } else {
            self.phase = QuizPhase::Finished;
            tracing::info!(
                "Quiz session finished: {} score={} correct={}/{}",
                self.session_id,
                self.score,
                self.correct_count,
                self.questions.len()
            );
        }

        Ok(&self.phase)
    }

    /// Aggregate summary; only available once the session is `Finished`.
    pub fn results(&self) -> Result<QuizResults> {
        if self.phase != QuizPhase::Finished {
            return Err(EngineError::InvalidTransition("session not finished yet"));
        }

        let total_questions = self.questions.len() as u32;
        let accuracy =
            ((self.correct_count as f64 / total_questions as f64) * 100.0).round() as u8;

        Ok(QuizResults {
            session_id: self.session_id,
            tier: self.tier,
            total_questions,
            correct_count: self.correct_count,
            total_score: self.score,
            accuracy,
            best_streak: self.best_streak,
            time_spent_seconds: self.time_spent_seconds,
            classification: self.classification.label_for(accuracy).to_string(),
            answers: self.answers.clone(),
        })
    }

    fn record_answer(&mut self, selected: Option<usize>, time_remaining: u32) {
        let question = &self.questions[self.current_index];
        let correct = selected == Some(question.correct_index);

        // Streak bonus counts the streak as it stood BEFORE this answer.
        let points = if correct {
            question.base_points + self.streak as i32 * self.tier_config.streak_multiplier
        } else {
            0
        };

        if correct {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.correct_count += 1;
            self.score += points;
        } else {
            self.streak = 0;
        }

        let time_taken = self
            .tier_config
            .time_limit_seconds
            .saturating_sub(time_remaining);
        self.time_spent_seconds += time_taken;

        self.answers.push(RecordedAnswer {
            question_id: question.id.clone(),
            selected_option: selected,
            correct,
            points_awarded: points,
            time_taken_seconds: time_taken,
        });

        self.phase = QuizPhase::Explaining {
            last_correct: correct,
        };
    }
}
