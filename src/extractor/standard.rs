use crate::param::ParamSource;
use crate::web::RequestAdapter;

use super::ParameterExtractor;

static SOURCES: [ParamSource; 3] = [ParamSource::Query, ParamSource::Header, ParamSource::Cookie];

/// Reads query parameters, headers and cookies (`DEFAULT`).
///
/// - query: every value for the name, in request order
/// - header: the first value, if it is valid text
/// - cookie: the first cookie whose name matches exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl DefaultExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ParameterExtractor for DefaultExtractor {
    fn parse_method(&self) -> &str {
        "DEFAULT"
    }

    fn supported_sources(&self) -> &[ParamSource] {
        &SOURCES
    }

    fn extract(
        &self,
        request: &RequestAdapter,
        param_name: &str,
        _parse_config: Option<&str>,
        source: &ParamSource,
        _body_buffered: bool,
    ) -> Vec<String> {
        if param_name.trim().is_empty() {
            tracing::error!("cannot extract a parameter without a name");
            return Vec::new();
        }

        let values: Vec<String> = match source {
            ParamSource::Query => request
                .query_values(param_name)
                .into_iter()
                .map(str::to_string)
                .collect(),
            ParamSource::Header => request
                .header_value(param_name)
                .map(str::to_string)
                .into_iter()
                .collect(),
            ParamSource::Cookie => request
                .cookie_value(param_name)
                .map(str::to_string)
                .into_iter()
                .collect(),
            other => {
                tracing::warn!(param = param_name, source = %other, "unsupported source");
                return Vec::new();
            }
        };

        tracing::debug!(
            param = param_name,
            source = %source,
            count = values.len(),
            "parameter extracted"
        );
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use http::header::{HeaderName, HeaderValue, COOKIE};
    use http::Method;

    fn extract(request: &RequestAdapter, name: &str, source: ParamSource) -> Vec<String> {
        DefaultExtractor.extract(request, name, None, &source, false)
    }

    #[test]
    fn query_returns_all_values_in_order() {
        let request = RequestAdapter::new(Method::GET, "/x?userId=3&userId=1&other=9");
        assert_eq!(extract(&request, "userId", ParamSource::Query), vec!["3", "1"]);
        assert!(extract(&request, "missing", ParamSource::Query).is_empty());
    }

    #[test]
    fn header_returns_single_value() {
        let mut request = RequestAdapter::new(Method::GET, "/x");
        let name = HeaderName::from_static("staffid");
        request.add_header(name.clone(), HeaderValue::from_static("4"));
        request.add_header(name, HeaderValue::from_static("5"));

        assert_eq!(extract(&request, "staffId", ParamSource::Header), vec!["4"]);
    }

    #[test]
    fn cookie_returns_first_match() {
        let mut request = RequestAdapter::new(Method::GET, "/x");
        request.add_header(COOKIE, HeaderValue::from_static("a=1; staffId=8; staffId=9"));

        assert_eq!(extract(&request, "staffId", ParamSource::Cookie), vec!["8"]);
        assert!(extract(&request, "staffid", ParamSource::Cookie).is_empty());
    }

    #[test]
    fn blank_name_or_foreign_source_is_empty() {
        let request = RequestAdapter::new(Method::GET, "/x?a=1");
        assert!(extract(&request, " ", ParamSource::Query).is_empty());
        assert!(extract(&request, "a", ParamSource::Body).is_empty());
    }
}
