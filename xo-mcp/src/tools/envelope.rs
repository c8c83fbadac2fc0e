// Response envelope
//
// Every tool answers with a `ToolResponse`, whatever happened on the way.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ToolError;

/// Name of the internal hyperlink field Xen Orchestra adds to records
pub const HREF_FIELD: &str = "href";

/// Why a call failed; absent when the call worked but returned no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    HttpError,
    Exception,
    ValidationError,
    ConfigurationError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::HttpError => write!(f, "http-error"),
            FailureKind::Exception => write!(f, "exception"),
            FailureKind::ValidationError => write!(f, "validation-error"),
            FailureKind::ConfigurationError => write!(f, "configuration-error"),
        }
    }
}

/// Uniform result envelope returned by every tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResponse {
    Success {
        #[serde(flatten)]
        payload: Map<String, Value>,
    },
    Failure {
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<FailureKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        message: String,
    },
}

impl ToolResponse {
    /// Success envelope with the given payload fields
    pub fn success<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        ToolResponse::Success {
            payload: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Failure without a kind: the API answered but had nothing to return
    pub fn no_data(message: impl Into<String>) -> Self {
        ToolResponse::Failure {
            kind: None,
            status_code: None,
            message: message.into(),
        }
    }

    pub fn from_error(err: &ToolError) -> Self {
        let (kind, message) = match err {
            ToolError::Http { status, body } => {
                (FailureKind::HttpError, http_message(*status, body))
            }
            ToolError::Transport(msg) => (FailureKind::Exception, msg.clone()),
            ToolError::Validation(msg) | ToolError::NotFound(msg) => {
                (FailureKind::ValidationError, msg.clone())
            }
            ToolError::Configuration(msg) => (FailureKind::ConfigurationError, msg.clone()),
        };
        ToolResponse::Failure {
            kind: Some(kind),
            status_code: err.status_code(),
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success { .. })
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ToolResponse::Failure { kind, .. } => *kind,
            ToolResponse::Success { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ToolResponse::Failure { status_code, .. } => *status_code,
            ToolResponse::Success { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ToolResponse::Failure { message, .. } => Some(message),
            ToolResponse::Success { .. } => None,
        }
    }

    /// A payload field of a success envelope
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ToolResponse::Success { payload } => payload.get(key),
            ToolResponse::Failure { .. } => None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "status": "failure",
                "kind": "exception",
                "message": e.to_string()
            })
        })
    }
}

impl From<ToolError> for ToolResponse {
    fn from(err: ToolError) -> Self {
        ToolResponse::from_error(&err)
    }
}

/// Error body of an HTTP failure, or the status line when the body is blank
fn http_message(status: u16, body: &str) -> String {
    if !body.trim().is_empty() {
        return body.to_string();
    }
    match StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("{} {}", status, reason),
        None => format!("HTTP {}", status),
    }
}

/// Remove `href` from a record, or from each record of a list
pub fn strip_href(value: &mut Value) {
    match value {
        Value::Object(record) => {
            record.remove(HREF_FIELD);
        }
        Value::Array(records) => {
            for record in records.iter_mut() {
                if let Value::Object(record) = record {
                    record.remove(HREF_FIELD);
                }
            }
        }
        _ => {}
    }
}

/// Identifying fields of an entity the API just created
///
/// The create endpoints answer either with the new record or with a bare
/// id (possibly as an href such as `/rest/v0/vms/<uuid>`).
pub fn created_entity(body: Option<Value>, keys: &[&str]) -> Option<Value> {
    match body? {
        Value::Object(mut record) => {
            record.remove(HREF_FIELD);
            let picked: Map<String, Value> = keys
                .iter()
                .filter_map(|key| record.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect();
            if picked.is_empty() {
                None
            } else {
                Some(Value::Object(picked))
            }
        }
        Value::String(id) => {
            let id = id.trim().trim_end_matches('/').rsplit('/').next()?.to_string();
            if id.is_empty() {
                None
            } else {
                Some(serde_json::json!({ "id": id }))
            }
        }
        Value::Number(id) => Some(serde_json::json!({ "id": id })),
        _ => None,
    }
}
