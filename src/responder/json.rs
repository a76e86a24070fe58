use crate::config::RecoveryConfig;
use crate::error::Result;
use crate::fault::Fault;
use crate::observer::IncidentId;
use crate::recovery::Responder;
use axum::{
    Json,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

const GENERIC_MESSAGE: &str = "Internal Server Error";

/// Answers a recovered panic with a JSON error document.
///
/// ```json
/// {"statusCode": 500, "message": "Internal Server Error", "incidentId": "...", "timestamp": "..."}
/// ```
///
/// `incidentId` is present only when an [`IncidentId`] was attached by an
/// observer.
#[derive(Clone, Debug)]
pub struct JsonResponder {
    status: StatusCode,
    expose_payload: bool,
}

impl Default for JsonResponder {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            expose_payload: false,
        }
    }
}

impl JsonResponder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RecoveryConfig) -> Result<Self> {
        Ok(Self {
            status: config.status_code()?,
            expose_payload: config.expose_payload,
        })
    }

    /// Report the panic message to the client instead of a generic one.
    pub fn expose_payload(mut self, expose: bool) -> Self {
        self.expose_payload = expose;
        self
    }
}

impl Responder for JsonResponder {
    fn respond(&self, fault: Fault, request: Request<()>) -> Response {
        let message = if self.expose_payload {
            fault.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        };

        let mut body = json!({
            "statusCode": self.status.as_u16(),
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let Some(incident) = request.extensions().get::<IncidentId>() {
            body["incidentId"] = json!(incident);
        }

        (self.status, Json(body)).into_response()
    }
}
