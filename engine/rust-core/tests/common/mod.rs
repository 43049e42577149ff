use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use civico_engine::error::{EngineError, Result};
use civico_engine::models::quiz::{QuizResultAck, QuizResultPayload};
use civico_engine::models::rsvp::{
    AttendanceRecord, AttendanceStats, Participant, ParticipantPage, ParticipantQuery,
    SetAttendancePayload, SubjectType,
};
use civico_engine::services::civic_api::{GamificationBackend, RsvpBackend};
use civico_engine::services::rsvp_service::RsvpService;

/// The caller the backend doubles are scoped to, mirroring how the real API
/// resolves the user from the session.
pub const TEST_USER: &str = "test-user";

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

type RecordKey = (SubjectType, String, String);

/// In-memory stand-in for the backend API, with the same upsert discipline:
/// at most one record per `(user, subject, type)` triple.
#[derive(Default)]
pub struct InMemoryBackend {
    pub records: Mutex<HashMap<RecordKey, AttendanceRecord>>,
    pub submissions: Mutex<Vec<(String, QuizResultPayload)>>,
}

#[allow(dead_code)]
impl InMemoryBackend {
    /// Seed a record for another user, for aggregate views.
    pub fn seed_record(
        &self,
        user_id: &str,
        subject_type: SubjectType,
        subject_id: &str,
        payload: &SetAttendancePayload,
    ) {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        records.insert(
            (subject_type, subject_id.to_string(), user_id.to_string()),
            AttendanceRecord {
                user_id: user_id.to_string(),
                subject_id: subject_id.to_string(),
                subject_type,
                status: payload.status,
                notes: payload.notes.clone(),
                notification_enabled: payload.notification_enabled,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn subject_records(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Vec<AttendanceRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.subject_type == subject_type && r.subject_id == subject_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RsvpBackend for InMemoryBackend {
    async fn upsert_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        payload: &SetAttendancePayload,
    ) -> Result<AttendanceRecord> {
        let key = (subject_type, subject_id.to_string(), TEST_USER.to_string());
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();

        let record = records
            .entry(key)
            .and_modify(|r| {
                r.status = payload.status;
                r.notes = payload.notes.clone();
                r.notification_enabled = payload.notification_enabled;
                r.updated_at = now;
            })
            .or_insert_with(|| AttendanceRecord {
                user_id: TEST_USER.to_string(),
                subject_id: subject_id.to_string(),
                subject_type,
                status: payload.status,
                notes: payload.notes.clone(),
                notification_enabled: payload.notification_enabled,
                created_at: now,
                updated_at: now,
            });

        Ok(record.clone())
    }

    async fn fetch_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        let key = (subject_type, subject_id.to_string(), TEST_USER.to_string());
        Ok(self.records.lock().unwrap().get(&key).cloned())
    }

    async fn fetch_stats(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<AttendanceStats> {
        Ok(RsvpService::compute_stats(
            &self.subject_records(subject_type, subject_id),
        ))
    }

    async fn delete_rsvp(&self, subject_type: SubjectType, subject_id: &str) -> Result<()> {
        let key = (subject_type, subject_id.to_string(), TEST_USER.to_string());
        self.records.lock().unwrap().remove(&key);
        Ok(())
    }

    async fn fetch_participants(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage> {
        let mut matching: Vec<AttendanceRecord> = self
            .subject_records(subject_type, subject_id)
            .into_iter()
            .filter(|r| query.status.map_or(true, |status| r.status == status))
            .collect();
        matching.sort_by_key(|r| r.created_at);

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).max(1);
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .map(|r| Participant {
                user_id: r.user_id.clone(),
                display_name: r.user_id,
                avatar_url: None,
                status: r.status,
                responded_at: r.created_at,
            })
            .collect();

        Ok(ParticipantPage {
            items,
            page,
            limit,
            total,
        })
    }
}

#[async_trait]
impl GamificationBackend for InMemoryBackend {
    async fn submit_quiz_result(
        &self,
        user_id: &str,
        payload: &QuizResultPayload,
    ) -> Result<QuizResultAck> {
        self.submissions
            .lock()
            .unwrap()
            .push((user_id.to_string(), payload.clone()));

        Ok(QuizResultAck {
            points_earned: payload.score,
            new_level: None,
            achievements: Vec::new(),
        })
    }
}

/// Backend double whose every call fails the way an unreachable API does.
#[derive(Default)]
pub struct FailingBackend;

fn unavailable() -> EngineError {
    EngineError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl RsvpBackend for FailingBackend {
    async fn upsert_rsvp(
        &self,
        _subject_type: SubjectType,
        _subject_id: &str,
        _payload: &SetAttendancePayload,
    ) -> Result<AttendanceRecord> {
        Err(unavailable())
    }

    async fn fetch_rsvp(
        &self,
        _subject_type: SubjectType,
        _subject_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        Err(unavailable())
    }

    async fn fetch_stats(
        &self,
        _subject_type: SubjectType,
        _subject_id: &str,
    ) -> Result<AttendanceStats> {
        Err(unavailable())
    }

    async fn delete_rsvp(&self, _subject_type: SubjectType, _subject_id: &str) -> Result<()> {
        Err(unavailable())
    }

    async fn fetch_participants(
        &self,
        _subject_type: SubjectType,
        _subject_id: &str,
        _query: &ParticipantQuery,
    ) -> Result<ParticipantPage> {
        Err(unavailable())
    }
}

#[async_trait]
impl GamificationBackend for FailingBackend {
    async fn submit_quiz_result(
        &self,
        _user_id: &str,
        _payload: &QuizResultPayload,
    ) -> Result<QuizResultAck> {
        Err(unavailable())
    }
}
