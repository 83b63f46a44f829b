//! Transport-neutral response built from an [`ImportResult`].

use serde::Serialize;

use super::{FailureKind, ImportResult};

/// Response class of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    BadRequest,
    Unavailable,
    InternalError,
}

impl ResponseStatus {
    /// Conventional HTTP status code.
    pub fn http_code(&self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::BadRequest => 400,
            ResponseStatus::Unavailable => 503,
            ResponseStatus::InternalError => 500,
        }
    }
}

impl From<FailureKind> for ResponseStatus {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::InputMissing
            | FailureKind::MalformedDocument
            | FailureKind::MissingRequiredField => ResponseStatus::BadRequest,
            FailureKind::CollaboratorUnavailable => ResponseStatus::Unavailable,
            FailureKind::ProcessingFailure => ResponseStatus::InternalError,
        }
    }
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_summary: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

/// Status plus payload, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResponse {
    pub status: ResponseStatus,
    pub payload: ResponsePayload,
}

impl From<&ImportResult> for ImportResponse {
    fn from(result: &ImportResult) -> Self {
        match result {
            ImportResult::Success(success) => ImportResponse {
                status: ResponseStatus::Ok,
                payload: ResponsePayload {
                    success: true,
                    message: format!("invoice {} imported", success.number),
                    number: Some(success.number.clone()),
                    alert_summary: Some(success.alert_summary()),
                    alerts_failed: Some(success.alerts_failed),
                    error: None,
                    elapsed_ms: Some(success.elapsed_ms),
                },
            },
            ImportResult::Failure(failure) => {
                let status = ResponseStatus::from(failure.kind);
                let payload = match status {
                    ResponseStatus::InternalError => ResponsePayload {
                        success: false,
                        message: format!("failed to process invoice {}", failure.number),
                        number: Some(failure.number.clone()),
                        alert_summary: None,
                        alerts_failed: None,
                        error: Some(failure.message.clone()),
                        elapsed_ms: Some(failure.elapsed_ms),
                    },
                    ResponseStatus::Unavailable => ResponsePayload {
                        success: false,
                        message: failure.message.clone(),
                        number: None,
                        alert_summary: None,
                        alerts_failed: None,
                        error: None,
                        elapsed_ms: None,
                    },
                    _ => ResponsePayload {
                        success: false,
                        message: failure.message.clone(),
                        number: None,
                        alert_summary: None,
                        alerts_failed: None,
                        error: None,
                        elapsed_ms: Some(failure.elapsed_ms),
                    },
                };
                ImportResponse { status, payload }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportFailure, ImportSuccess};
    use crate::models::alert::Alert;
    use crate::store::DocumentId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn failed(kind: FailureKind, number: &str) -> ImportResult {
        ImportResult::Failure(ImportFailure {
            kind,
            number: number.to_string(),
            message: "boom".to_string(),
            elapsed_ms: 4,
        })
    }

    #[test]
    fn test_success_payload() {
        let result = ImportResult::Success(ImportSuccess {
            number: "000123".to_string(),
            invoice_id: DocumentId::new("invoices-1"),
            alerts: vec![Alert {
                product_code: "no code".to_string(),
                product_name: "Sugar 1kg".to_string(),
                invoice_number: "000123".to_string(),
                message: "product not found in catalog".to_string(),
                origin: "xml_import".to_string(),
            }],
            alerts_failed: 0,
            elapsed_ms: 12,
        });

        let response = ImportResponse::from(&result);
        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(
            serde_json::to_value(&response.payload).unwrap(),
            json!({
                "success": true,
                "message": "invoice 000123 imported",
                "number": "000123",
                "alertSummary": ["Sugar 1kg"],
                "alertsFailed": 0,
                "elapsedMs": 12
            })
        );
    }

    #[test]
    fn test_failure_status_mapping() {
        let cases = [
            (FailureKind::InputMissing, ResponseStatus::BadRequest, 400),
            (FailureKind::MalformedDocument, ResponseStatus::BadRequest, 400),
            (FailureKind::MissingRequiredField, ResponseStatus::BadRequest, 400),
            (FailureKind::CollaboratorUnavailable, ResponseStatus::Unavailable, 503),
            (FailureKind::ProcessingFailure, ResponseStatus::InternalError, 500),
        ];

        for (kind, status, code) in cases {
            let response = ImportResponse::from(&failed(kind, "N/A"));
            assert_eq!(response.status, status);
            assert_eq!(response.status.http_code(), code);
            assert!(!response.payload.success);
        }
    }

    #[test]
    fn test_internal_error_carries_number() {
        let response = ImportResponse::from(&failed(FailureKind::ProcessingFailure, "77"));

        assert_eq!(
            serde_json::to_value(&response.payload).unwrap(),
            json!({
                "success": false,
                "message": "failed to process invoice 77",
                "number": "77",
                "error": "boom",
                "elapsedMs": 4
            })
        );
    }
}
