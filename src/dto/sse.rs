use serde::Serialize;
use utoipa::ToSchema;

/// Named event queued for the public SSE stream.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    /// SSE event name.
    pub event: &'static str,
    /// SSE data field.
    pub data: String,
}

impl ServerEvent {
    /// Event whose data field is plain text.
    pub fn text(event: &'static str, data: impl Into<String>) -> Self {
        Self {
            event,
            data: data.into(),
        }
    }

    /// Event whose data field is `payload` rendered as JSON.
    pub fn json<T: Serialize>(event: &'static str, payload: &T) -> serde_json::Result<Self> {
        Ok(Self::text(event, serde_json::to_string(payload)?))
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    /// True while the roster store is unreachable.
    pub degraded: bool,
}
