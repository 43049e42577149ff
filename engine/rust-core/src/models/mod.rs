use serde::Deserialize;

use crate::error::{EngineError, Result};

pub mod quiz;
pub mod rsvp;
pub mod timer;

/// Response envelope used by every backend endpoint.
///
/// The API wraps payloads as `{ "data": ..., "message": ... }` and is allowed
/// to omit either field. Consumers get exactly one documented fallback:
/// `data` absent or `null` decodes to `None`, and collection endpoints fall
/// back to their `Default` (empty) value via [`ApiEnvelope::into_data_or_default`].
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of an endpoint where data is mandatory.
    pub fn require_data(self, what: &'static str) -> Result<T> {
        self.data.ok_or(EngineError::EmptyResponse(what))
    }
}

impl<T: Default> ApiEnvelope<T> {
    pub fn into_data_or_default(self) -> T {
        self.data.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_missing_data_as_none() {
        let envelope: ApiEnvelope<Vec<String>> =
            serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        let envelope: ApiEnvelope<Vec<String>> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(envelope.into_data_or_default().is_empty());
    }

    #[test]
    fn envelope_requires_data_when_mandatory() {
        let envelope: ApiEnvelope<u32> = serde_json::from_str(r#"{"data":7}"#).unwrap();
        assert_eq!(envelope.require_data("count").unwrap(), 7);

        let envelope: ApiEnvelope<u32> = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            envelope.require_data("count"),
            Err(EngineError::EmptyResponse("count"))
        ));
    }
}
