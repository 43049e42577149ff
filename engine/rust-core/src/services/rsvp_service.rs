use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::error::{EngineError, Result};
use crate::models::rsvp::{
    AttendanceRecord, AttendanceStats, AttendanceStatus, Participant, ParticipantOrder,
    ParticipantPage, ParticipantQuery, SetAttendanceRequest, SubjectType, UserProfile,
};
use crate::services::civic_api::RsvpBackend;

/// Attendance intent for one caller plus aggregate views over all callers.
///
/// The service holds no state of its own: the backend owns the records, and
/// every operation here is one validated request/response exchange. Failed
/// calls never leave partial local state behind because there is none.
pub struct RsvpService {
    backend: Arc<dyn RsvpBackend>,
}

impl RsvpService {
    pub fn new(backend: Arc<dyn RsvpBackend>) -> Self {
        Self { backend }
    }

    /// Create or update the caller's confirmation for a subject.
    ///
    /// Validation happens before anything reaches the network; the request
    /// is then resolved into its wire payload (which is where the
    /// "`nao_vai` disables notifications" policy is applied).
    pub async fn set_status(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        request: SetAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        request
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        let payload = request.into_payload();
        tracing::info!(
            "Setting RSVP: subject={}/{} status={}",
            subject_type.path_segment(),
            subject_id,
            payload.status.as_str()
        );

        let record = self
            .backend
            .upsert_rsvp(subject_type, subject_id, &payload)
            .await?;

        Ok(record)
    }

    /// The caller's current confirmation, or `None` if they never responded.
    /// "Never responded" is distinct from an explicit "not going".
    pub async fn get_status(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        self.backend.fetch_rsvp(subject_type, subject_id).await
    }

    /// Remove the caller's confirmation entirely. Calling without an
    /// existing record is a no-op, not an error.
    pub async fn remove_status(&self, subject_type: SubjectType, subject_id: &str) -> Result<()> {
        tracing::info!(
            "Removing RSVP: subject={}/{}",
            subject_type.path_segment(),
            subject_id
        );
        self.backend.delete_rsvp(subject_type, subject_id).await
    }

    /// Server-side pre-aggregated stats for a subject.
    pub async fn stats(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
    ) -> Result<AttendanceStats> {
        self.backend.fetch_stats(subject_type, subject_id).await
    }

    /// Server-side paginated participant listing.
    pub async fn participants(
        &self,
        subject_type: SubjectType,
        subject_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage> {
        self.backend
            .fetch_participants(subject_type, subject_id, query)
            .await
    }

    /// Tally a collection of records by status. Pure; an empty collection
    /// yields all-zero stats.
    pub fn compute_stats(records: &[AttendanceRecord]) -> AttendanceStats {
        let mut stats = AttendanceStats::default();
        for record in records {
            match record.status {
                AttendanceStatus::Vai => stats.vai += 1,
                AttendanceStatus::NaoVai => stats.nao_vai += 1,
                AttendanceStatus::Talvez => stats.talvez += 1,
            }
            stats.total += 1;
        }
        stats
    }

    /// Project records into display-ready participants, joined with the
    /// externally supplied user directory. Users missing from the directory
    /// fall back to their id as display name.
    pub fn list_participants(
        records: &[AttendanceRecord],
        profiles: &HashMap<String, UserProfile>,
        filter: Option<AttendanceStatus>,
        order: ParticipantOrder,
    ) -> Vec<Participant> {
        let mut participants: Vec<Participant> = records
            .iter()
            .filter(|record| filter.map_or(true, |status| record.status == status))
            .map(|record| {
                let profile = profiles.get(&record.user_id);
                Participant {
                    user_id: record.user_id.clone(),
                    display_name: profile
                        .map(|p| p.display_name.clone())
                        .unwrap_or_else(|| record.user_id.clone()),
                    avatar_url: profile.and_then(|p| p.avatar_url.clone()),
                    status: record.status,
                    responded_at: record.created_at,
                }
            })
            .collect();

        participants.sort_by_key(|p| p.responded_at);
        if order == ParticipantOrder::RespondedDesc {
            participants.reverse();
        }
        participants
    }
}
