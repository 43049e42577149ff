use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound for the free-text note attached to a confirmation. Must match
/// the `length(max = ...)` rule on [`SetAttendanceRequest::notes`].
pub const MAX_NOTES_CHARS: usize = 500;

/// Attendance intent for an event or manifestation.
///
/// Wire values are the Portuguese strings the backend stores
/// (`vai` / `nao_vai` / `talvez`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Vai,
    NaoVai,
    Talvez,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Vai => "vai",
            AttendanceStatus::NaoVai => "nao_vai",
            AttendanceStatus::Talvez => "talvez",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Event,
    Manifestation,
}

impl SubjectType {
    /// Path segment used by the RSVP endpoints (`/rsvp/{events|manifestations}/{id}`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            SubjectType::Event => "events",
            SubjectType::Manifestation => "manifestations",
        }
    }
}

/// One user's confirmation for one subject.
///
/// The backend keeps at most one record per `(user_id, subject_id,
/// subject_type)` triple; a second write for the same triple updates the
/// existing record in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub user_id: String,
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub notification_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound request for `set_status`, validated before anything reaches the
/// network.
#[derive(Debug, Clone, Validate)]
pub struct SetAttendanceRequest {
    pub status: AttendanceStatus,
    #[validate(length(max = 500, message = "notes must not exceed 500 characters"))]
    pub notes: Option<String>,
    /// Explicit override; `None` means "use the policy default".
    pub notification_enabled: Option<bool>,
}

impl SetAttendanceRequest {
    pub fn new(status: AttendanceStatus) -> Self {
        Self {
            status,
            notes: None,
            notification_enabled: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_notification(mut self, enabled: bool) -> Self {
        self.notification_enabled = Some(enabled);
        self
    }

    /// Resolve the request into the exact wire payload.
    ///
    /// Policy: `nao_vai` always disables notifications, even against an
    /// explicit override; `vai` and `talvez` default to enabled unless the
    /// caller opted out.
    pub fn into_payload(self) -> SetAttendancePayload {
        let notification_enabled = match self.status {
            AttendanceStatus::NaoVai => false,
            _ => self.notification_enabled.unwrap_or(true),
        };
        SetAttendancePayload {
            status: self.status,
            notes: self.notes,
            notification_enabled,
        }
    }
}

/// Body of `POST /rsvp/{events|manifestations}/{subjectId}`.
#[derive(Debug, Clone, Serialize)]
pub struct SetAttendancePayload {
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub notification_enabled: bool,
}

/// Per-subject participation tallies, derived, never cached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub vai: u32,
    pub nao_vai: u32,
    pub talvez: u32,
    pub total: u32,
}

/// Display name and avatar come from the user directory, not from the RSVP
/// records themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Display-ready projection of an [`AttendanceRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub status: AttendanceStatus,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticipantOrder {
    /// First responder first.
    #[default]
    RespondedAsc,
    RespondedDesc,
}

/// Query string for the server-side participant listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParticipantQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One page of the server-side participant listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ParticipantPage {
    #[serde(default)]
    pub items: Vec<Participant>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}
