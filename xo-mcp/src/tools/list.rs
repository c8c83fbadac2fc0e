// Shared list recipe
//
// Every `list_*` tool goes through `run_list`, so defaults, query encoding,
// authentication and href stripping are the same for all resource families.

use serde_json::{json, Value};

use crate::client::{Auth, XoClient};
use crate::tools::query::{ListQuery, ListSpec};
use crate::tools::{strip_href, ToolParameter, ToolResponse, ToolResult};

/// Fetch a collection and wrap it as `{total, <records_key>: [...]}`
pub async fn run_list(
    client: &XoClient,
    spec: &ListSpec,
    params: &Value,
    records_key: &str,
) -> ToolResult {
    let query = ListQuery::from_params(spec, params)?;
    let reply = client.get(&query.path(spec), Auth::Required).await?;
    Ok(records_envelope(reply.body, records_key, spec.resource))
}

/// Build the list envelope from a response body
///
/// The collection endpoints answer with a JSON array; an object wrapping the
/// array in `data` is accepted as well.
pub fn records_envelope(body: Option<Value>, records_key: &str, resource: &str) -> ToolResponse {
    let records = match body {
        Some(Value::Array(records)) => records,
        Some(Value::Object(mut wrapper)) => match wrapper.remove("data") {
            Some(Value::Array(records)) => records,
            _ => {
                return ToolResponse::no_data(format!(
                    "/{} response did not contain a list of records",
                    resource
                ))
            }
        },
        _ => {
            return ToolResponse::no_data(format!("/{} returned no data", resource));
        }
    };

    let mut records = Value::Array(records);
    strip_href(&mut records);
    let total = records.as_array().map(Vec::len).unwrap_or(0);

    ToolResponse::success([("total", json!(total)), (records_key, records)])
}

/// The `fields`, `filter` and `limit` parameters shared by list tools
pub fn list_parameters(
    spec: &ListSpec,
    fields_help: &str,
    filter_help: &str,
) -> Vec<ToolParameter> {
    let default_filter: serde_json::Map<String, Value> = spec
        .default_filter
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    vec![
        ToolParameter::new(
            "fields",
            "array",
            &format!("The fields to include in the API response. {}", fields_help),
        )
        .with_default(json!(spec.default_fields)),
        ToolParameter::new(
            "filter",
            "object",
            &format!(
                "Key-value filters, sent as space-separated key:value pairs. \
                 Documented keys: {}. {}",
                spec.filter_keys.join(", "),
                filter_help
            ),
        )
        .with_default(Value::Object(default_filter)),
        ToolParameter::new(
            "limit",
            "integer",
            "Maximum number of results. Set to 999 to return all of them.",
        )
        .with_default(json!(crate::defaults::LIST_LIMIT)),
    ]
}
