use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimerEvent {
    TimerTick(TimerTick),
    TimeExpired(TimeExpired),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimerTick {
    pub session_id: Uuid,
    pub question_index: usize,
    pub remaining_seconds: u32,
    pub elapsed_seconds: u32,
    pub total_seconds: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeExpired {
    pub session_id: Uuid,
    pub question_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl TimerEvent {
    pub fn question_index(&self) -> usize {
        match self {
            TimerEvent::TimerTick(tick) => tick.question_index,
            TimerEvent::TimeExpired(expired) => expired.question_index,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, TimerEvent::TimeExpired(_))
    }
}
