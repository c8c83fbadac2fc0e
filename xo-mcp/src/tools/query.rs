// Request shaping
//
// Turns raw tool arguments into validated requests: the `fields`/`filter`/
// `limit` query grammar shared by every list tool, resource ids and JSON
// payloads.

use std::collections::BTreeMap;

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::REST_PREFIX;
use crate::errors::ToolError;

/// Characters left as-is in query values: unreserved characters and `/`
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Characters left as-is in a single path segment
const PATH_SEGMENT: &AsciiSet = &QUERY_VALUE.add(b'/');

/// Describes one listable resource family
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    /// Collection path below `/rest/v0`
    pub resource: &'static str,
    /// Fields returned when the caller asks for none
    pub default_fields: &'static [&'static str],
    /// Filter applied when the caller gives none
    pub default_filter: &'static [(&'static str, &'static str)],
    /// Filter keys documented for this resource; others pass through
    pub filter_keys: &'static [&'static str],
}

#[derive(Debug, Default, Deserialize)]
struct RawListParams {
    #[serde(default)]
    fields: Option<Vec<String>>,
    #[serde(default)]
    filter: Option<Map<String, Value>>,
    #[serde(default)]
    limit: Option<Value>,
}

/// Validated parameters of a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub fields: Vec<String>,
    pub filter: BTreeMap<String, String>,
    pub limit: u32,
}

impl ListQuery {
    /// Validate raw arguments and apply the resource defaults
    pub fn from_params(spec: &ListSpec, params: &Value) -> Result<Self, ToolError> {
        let raw: RawListParams = parse_params(params)?;

        let mut fields: Vec<String> = raw
            .fields
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            fields = spec.default_fields.iter().map(|f| f.to_string()).collect();
        }

        let mut filter = BTreeMap::new();
        for (key, value) in raw.filter.unwrap_or_default() {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(ToolError::validation("filter keys must not be empty"));
            }
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ToolError::validation(format!(
                        "filter value for '{}' must be a string",
                        key
                    )))
                }
            };
            if !spec.filter_keys.contains(&key.as_str()) {
                debug!(
                    "Passing undocumented filter key '{}' through to /{}",
                    key, spec.resource
                );
            }
            filter.insert(key, value);
        }
        if filter.is_empty() {
            filter = spec
                .default_filter
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
        }

        let limit = parse_limit(raw.limit.as_ref())?;

        Ok(Self {
            fields,
            filter,
            limit,
        })
    }

    /// Comma-joined field list
    pub fn fields_param(&self) -> String {
        self.fields.join(",")
    }

    /// Space-joined `key:value` pairs
    pub fn filter_param(&self) -> String {
        self.filter
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encoded query string; `filter` is left out when there is none
    pub fn to_query_string(&self) -> String {
        let mut query = format!("fields={}", encode_query_value(&self.fields_param()));
        if !self.filter.is_empty() {
            query.push_str("&filter=");
            query.push_str(&encode_query_value(&self.filter_param()));
        }
        query.push_str(&format!("&limit={}", self.limit));
        query
    }

    /// Collection path with query, relative to `/rest/v0`
    pub fn path(&self, spec: &ListSpec) -> String {
        format!("{}?{}", spec.resource, self.to_query_string())
    }
}

/// Percent-encode a query value the way the REST API expects
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Validate `limit`: a positive integer, given as a number or a decimal string
pub fn parse_limit(raw: Option<&Value>) -> Result<u32, ToolError> {
    let invalid = |shown: &dyn std::fmt::Display| {
        ToolError::validation(format!("limit must be a positive integer, got {}", shown))
    };

    let limit = match raw {
        None | Some(Value::Null) => return Ok(crate::defaults::LIST_LIMIT),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| invalid(n))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(&format!("'{}'", s)))?,
        Some(other) => return Err(invalid(other)),
    };

    match u32::try_from(limit) {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(invalid(&limit)),
    }
}

/// Reduce a bare or path-like id to an encoded path segment
///
/// `abc`, `/abc`, `vms/abc` and `/rest/v0/vms/abc` all give `abc` for the
/// `vms` resource.
pub fn normalize_id(resource: &str, raw: &str) -> Result<String, ToolError> {
    let id = raw.trim().trim_start_matches('/');
    let id = strip_segment(id, REST_PREFIX);
    let id = strip_segment(id, resource).trim_end_matches('/');

    if id.is_empty() {
        return Err(ToolError::validation("'id' parameter is required"));
    }
    if id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(ToolError::validation(format!(
            "'{}' is not a valid {} id",
            raw, resource
        )));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

fn strip_segment<'a>(path: &'a str, prefix: &str) -> &'a str {
    match path.strip_prefix(prefix) {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => path,
    }
}

/// Accept a JSON object, or a string holding one
pub fn parse_object(value: &Value, name: &str) -> Result<Map<String, Value>, ToolError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ToolError::validation(format!(
                "'{}' must be a JSON object",
                name
            ))),
            Err(e) => Err(ToolError::validation(format!(
                "'{}' is not valid JSON: {}",
                name, e
            ))),
        },
        _ => Err(ToolError::validation(format!(
            "'{}' must be a JSON object",
            name
        ))),
    }
}

/// Deserialize tool arguments into a typed parameter struct
///
/// Missing arguments (`null`) give the struct's defaults.
pub fn parse_params<T>(params: &Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Default,
{
    match params {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(params.clone())
            .map_err(|e| ToolError::validation(e.to_string())),
        _ => Err(ToolError::validation("Parameters must be an object")),
    }
}
