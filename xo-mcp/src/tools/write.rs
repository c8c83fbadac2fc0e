// Shared write recipes
//
// Create and delete calls look the same for every resource family apart from
// the collection name and the fields reported back.

use serde_json::{json, Map, Value};

use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::envelope::created_entity;
use crate::tools::query::{normalize_id, parse_object};
use crate::tools::{ToolResponse, ToolResult};

/// POST a validated object to a collection and report the new entity
///
/// `entity_key` names the envelope field, `keys` the identifying fields kept
/// from the response.
pub async fn run_create(
    client: &XoClient,
    resource: &str,
    payload: Map<String, Value>,
    entity_key: &str,
    keys: &[&str],
) -> ToolResult {
    let reply = client.post(resource, &Value::Object(payload)).await?;
    match created_entity(reply.body, keys) {
        Some(entity) => Ok(ToolResponse::success([(entity_key, entity)])),
        None => Ok(ToolResponse::no_data(format!(
            "POST /{} returned no identifying fields",
            resource
        ))),
    }
}

/// DELETE a single record; any 2xx reply counts as success
pub async fn run_delete(client: &XoClient, resource: &str, raw_id: Option<&str>) -> ToolResult {
    let raw_id = raw_id.unwrap_or_default();
    let id = normalize_id(resource, raw_id)?;
    client.delete(&format!("{}/{}", resource, id)).await?;
    Ok(ToolResponse::success([("id", json!(id))]))
}

/// A required, non-empty object payload
pub fn require_payload(payload: Option<&Value>) -> Result<Map<String, Value>, ToolError> {
    let payload = match payload {
        None | Some(Value::Null) => {
            return Err(ToolError::validation("Missing required parameter: payload"))
        }
        Some(payload) => parse_object(payload, "payload")?,
    };
    if payload.is_empty() {
        return Err(ToolError::validation("'payload' must not be empty"));
    }
    Ok(payload)
}
