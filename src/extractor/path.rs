use crate::param::ParamSource;
use crate::web::RequestAdapter;

use super::ParameterExtractor;

static SOURCES: [ParamSource; 1] = [ParamSource::Path];

/// Reads router-resolved path template variables (`PATH_MATCH`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatchExtractor;

impl PathMatchExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ParameterExtractor for PathMatchExtractor {
    fn parse_method(&self) -> &str {
        "PATH_MATCH"
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
        if *source != ParamSource::Path {
            return Vec::new();
        }

        match request.path_param(param_name) {
            Some(value) => vec![value.to_string()],
            None => {
                tracing::debug!(param = param_name, "path variable not resolved");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use http::Method;

    #[test]
    fn reads_resolved_variable() {
        let mut request = RequestAdapter::new(Method::GET, "/api/staffs/1/schedules");
        request.add_path_param("staffId", "1");

        let values = PathMatchExtractor.extract(&request, "staffId", None, &ParamSource::Path, false);
        assert_eq!(values, vec!["1"]);
    }

    #[test]
    fn missing_map_or_name_is_empty() {
        let mut request = RequestAdapter::new(Method::GET, "/api/staffs/1");
        assert!(PathMatchExtractor
            .extract(&request, "staffId", None, &ParamSource::Path, false)
            .is_empty());

        request.add_path_param("other", "1");
        assert!(PathMatchExtractor
            .extract(&request, "staffId", None, &ParamSource::Path, false)
            .is_empty());
        assert!(PathMatchExtractor
            .extract(&request, "StaffId", None, &ParamSource::Path, false)
            .is_empty());
    }

    #[test]
    fn other_sources_are_ignored() {
        let mut request = RequestAdapter::new(Method::GET, "/x");
        request.add_path_param("id", "1");

        assert!(PathMatchExtractor
            .extract(&request, "id", None, &ParamSource::Query, false)
            .is_empty());
    }
}
