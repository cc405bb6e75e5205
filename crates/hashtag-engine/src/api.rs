//! Request parameter handling for the hashtag endpoints.
//!
//! Web handlers receive loosely typed JSON; this module checks its shape
//! before anything reaches the service. `slugs` and `order` must be arrays of
//! strings, anything else is rejected as invalid parameters.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use hashtag_core::config::HashtagSettings;
use hashtag_core::error::{Error, Result};
use hashtag_core::guardian::Guardian;
use hashtag_core::types::{HashtagItem, HashtagType};

use crate::{HashtagAutocompleteService, DEFAULT_COMPOSER_CONTEXT};

/// Fallbacks for parameters a request leaves out.
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub context: String,
    pub search_limit: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self { context: DEFAULT_COMPOSER_CONTEXT.to_string(), search_limit: 5 }
    }
}

impl From<&HashtagSettings> for RequestDefaults {
    fn from(settings: &HashtagSettings) -> Self {
        Self { context: settings.default_context.clone(), search_limit: settings.default_search_limit }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<HashtagItem>,
}

/// `{ "slugs": [...], "order": [...] }` or `{ "slugs": [...], "context": "..." }`.
pub fn lookup(
    service: &HashtagAutocompleteService,
    guardian: &Guardian,
    params: &Value,
    defaults: &RequestDefaults,
) -> Result<IndexMap<HashtagType, Vec<HashtagItem>>> {
    let slugs = string_list(params, "slugs")?
        .ok_or_else(|| Error::InvalidParameters("slugs must be an array of strings".to_string()))?;
    let order = types_in_priority_order(service, params, defaults)?;
    service.lookup(guardian, &slugs, &order)
}

/// `{ "term": "...", "order" | "context": ..., "limit": n }`; every key is optional.
pub fn search(
    service: &HashtagAutocompleteService,
    guardian: &Guardian,
    params: &Value,
    defaults: &RequestDefaults,
) -> Result<SearchResponse> {
    let term = match params.get("term") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(term)) => term.clone(),
        Some(_) => return Err(Error::InvalidParameters("term must be a string".to_string())),
    };
    let limit = match params.get("limit") {
        None | Some(Value::Null) => defaults.search_limit,
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::InvalidParameters("limit must be a non-negative integer".to_string()))?,
    };
    let order = types_in_priority_order(service, params, defaults)?;
    let results = service.search(guardian, &term, &order, limit)?;
    Ok(SearchResponse { results })
}

fn types_in_priority_order(
    service: &HashtagAutocompleteService,
    params: &Value,
    defaults: &RequestDefaults,
) -> Result<Vec<HashtagType>> {
    if let Some(order) = string_list(params, "order")? {
        return Ok(order.into_iter().map(HashtagType::from).collect());
    }
    let context = match params.get("context") {
        None | Some(Value::Null) => defaults.context.as_str(),
        Some(Value::String(context)) => context.as_str(),
        Some(_) => return Err(Error::InvalidParameters("context must be a string".to_string())),
    };
    Ok(service.ordered_types_for_context(context))
}

fn string_list(params: &Value, key: &str) -> Result<Option<Vec<String>>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::InvalidParameters(format!("{} must only contain strings", key)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(Error::InvalidParameters(format!("{} must be an array", key))),
    }
}
