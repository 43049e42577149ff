use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::{EngineError, Result};
use crate::models::quiz::{QuizResultAck, QuizResultPayload};
use crate::models::rsvp::{
    AttendanceRecord, AttendanceStats, ParticipantPage, ParticipantQuery, SetAttendancePayload,
    SubjectType,
};
use crate::models::ApiEnvelope;

/// RSVP side of the backend REST API.
///
/// Implemented by [`CivicApi`] for the real backend and by in-memory doubles
/// in tests. All durable state lives behind this seam; the engine itself
/// never persists anything.
#[async_trait]
pub trait RsvpBackend: Send + Sync {
    /// `POST /rsvp/{events|manifestations}/{subjectId}`. Upsert semantics,
    /// at most one record per caller and subject.
    async fn upsert_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        payload: &SetAttendancePayload,
    ) -> Result<AttendanceRecord>;

    /// `GET /rsvp/{events|manifestations}/{subjectId}`. `None` when the
    /// caller never responded.
    async fn fetch_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<Option<AttendanceRecord>>;

    /// `GET /rsvp/{events|manifestations}/{subjectId}/stats`.
    async fn fetch_stats(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<AttendanceStats>;

    /// `DELETE /rsvp/{events|manifestations}/{subjectId}`. Not an error
    /// when no record exists.
    async fn delete_rsvp(&self, subject_type: SubjectType, subject_id: &str) -> Result<()>;

    /// `GET /rsvp/{events|manifestations}/{subjectId}/participants`.
    async fn fetch_participants(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage>;
}

/// Gamification side of the backend REST API.
#[async_trait]
pub trait GamificationBackend: Send + Sync {
    /// `POST /gamification/users/{userId}/quiz-result`. Once per finished
    /// session.
    async fn submit_quiz_result(
        &self,
        user_id: &str,
        payload: &QuizResultPayload,
    ) -> Result<QuizResultAck>;
}

/// Typed HTTP client over the civic backend.
#[derive(Debug)]
pub struct CivicApi {
    http: reqwest::Client,
    base_url: Url,
}

impl CivicApi {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| EngineError::Validation(format!("invalid api base url: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    fn rsvp_url(&self, subject_type: SubjectType, subject_id: &str, suffix: &str) -> String {
        format!(
            "{}/rsvp/{}/{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            subject_type.path_segment(),
            subject_id,
            suffix
        )
    }

    fn gamification_url(&self, user_id: &str) -> String {
        format!(
            "{}/gamification/users/{}/quiz-result",
            self.base_url.as_str().trim_end_matches('/'),
            user_id
        )
    }

    /// Turn a non-success response into an [`EngineError::Api`], preferring
    /// the envelope `message` over the raw body when the backend sent one.
    async fn api_error(response: reqwest::Response) -> EngineError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or(body);
        EngineError::Api { status, message }
    }
}

#[async_trait]
impl RsvpBackend for CivicApi {
    async fn upsert_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        payload: &SetAttendancePayload,
    ) -> Result<AttendanceRecord> {
        let url = self.rsvp_url(subject_type, subject_id, "");
        tracing::debug!("Upserting RSVP: {} status={}", url, payload.status.as_str());

        let response = self.http.post(&url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let envelope: ApiEnvelope<AttendanceRecord> = response.json().await?;
        envelope.require_data("attendance record")
    }

    async fn fetch_rsvp(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        let url = self.rsvp_url(subject_type, subject_id, "");

        let response = self.http.get(&url).send().await?;
        // A subject the caller never responded to is "no data", not a failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope<AttendanceRecord> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    async fn fetch_stats(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<AttendanceStats> {
        let url = self.rsvp_url(subject_type, subject_id, "/stats");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let envelope: ApiEnvelope<AttendanceStats> = response.json().await?;
        Ok(envelope.into_data_or_default())
    }

    async fn delete_rsvp(&self, subject_type: SubjectType, subject_id: &str) -> Result<()> {
        let url = self.rsvp_url(subject_type, subject_id, "");

        let response = self.http.delete(&url).send().await?;
        // Deleting an absent record is a no-op by contract.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }

    async fn fetch_participants(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage> {
        let url = self.rsvp_url(subject_type, subject_id, "/participants");

        let response = self.http.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let envelope: ApiEnvelope<ParticipantPage> = response.json().await?;
        Ok(envelope.into_data_or_default())
    }
}

#[async_trait]
impl GamificationBackend for CivicApi {
    async fn submit_quiz_result(
        &self,
        user_id: &str,
        payload: &QuizResultPayload,
    ) -> Result<QuizResultAck> {
        let url = self.gamification_url(user_id);
        tracing::debug!(
            "Submitting quiz result: {} score={} accuracy={}",
            url,
            payload.score,
            payload.accuracy
        );

        let response = self.http.post(&url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let envelope: ApiEnvelope<QuizResultAck> = response.json().await?;
        Ok(envelope.into_data_or_default())
    }
}
