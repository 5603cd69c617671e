use serde_json::Value;

use crate::param::ParamSource;
use crate::web::RequestAdapter;

use super::ParameterExtractor;

static SOURCES: [ParamSource; 1] = [ParamSource::Body];

/// Evaluates a JSON path expression against the buffered body (`JSON_PATH`).
///
/// Every match becomes one value: strings are returned as their raw text,
/// numbers and booleans in literal form, arrays and objects as compact JSON.
/// `null` matches are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathExtractor;

impl JsonPathExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ParameterExtractor for JsonPathExtractor {
    fn parse_method(&self) -> &str {
        "JSON_PATH"
    }

    fn supported_sources(&self) -> &[ParamSource] {
        &SOURCES
    }

    fn extract(
        &self,
        request: &RequestAdapter,
        param_name: &str,
        parse_config: Option<&str>,
        source: &ParamSource,
        body_buffered: bool,
    ) -> Vec<String> {
        if *source != ParamSource::Body || !body_buffered {
            tracing::trace!(param = param_name, "body not available to JSON path");
            return Vec::new();
        }

        let Some(expression) = parse_config.map(str::trim).filter(|e| !e.is_empty()) else {
            tracing::warn!(param = param_name, "JSON path expression is empty");
            return Vec::new();
        };

        let Some(body) = request.buffered_body().filter(|b| !b.is_empty()) else {
            tracing::trace!(param = param_name, "request body is empty");
            return Vec::new();
        };

        let document: Value = match serde_json::from_slice(body) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(param = param_name, error = %e, "request body is not valid JSON");
                return Vec::new();
            }
        };

        match jsonpath_lib::select(&document, expression) {
            Ok(matches) => {
                let values: Vec<String> = matches.into_iter().filter_map(render).collect();
                tracing::debug!(param = param_name, count = values.len(), "parameter extracted");
                values
            }
            Err(e) => {
                tracing::error!(
                    param = param_name,
                    expression,
                    error = ?e,
                    "JSON path evaluation failed"
                );
                Vec::new()
            }
        }
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
