use crate::param::ParamSource;
use crate::web::RequestAdapter;

use super::ParameterExtractor;

static SOURCES: [ParamSource; 1] = [ParamSource::Body];

/// Evaluates an XPath 1.0 expression against the buffered body (`XML_PATH`).
///
/// The result is converted to its XPath string value and returned as a single
/// entry; for a node set that is the text of the first node in document
/// order. An empty string yields no value.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlPathExtractor;

impl XmlPathExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ParameterExtractor for XmlPathExtractor {
    fn parse_method(&self) -> &str {
        "XML_PATH"
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
            return Vec::new();
        }

        let Some(expression) = parse_config.map(str::trim).filter(|e| !e.is_empty()) else {
            tracing::warn!(param = param_name, "XPath expression is empty");
            return Vec::new();
        };

        let text = match request.buffered_body().map(|b| std::str::from_utf8(b)) {
            Some(Ok(text)) if !text.trim().is_empty() => text,
            Some(Err(e)) => {
                tracing::warn!(param = param_name, error = %e, "request body is not UTF-8");
                return Vec::new();
            }
            _ => return Vec::new(),
        };

        let package = match sxd_document::parser::parse(text) {
            Ok(package) => package,
            Err(e) => {
                tracing::warn!(param = param_name, error = ?e, "request body is not valid XML");
                return Vec::new();
            }
        };
        let document = package.as_document();

        match sxd_xpath::evaluate_xpath(&document, expression) {
            Ok(value) => {
                let text = value.string();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text]
                }
            }
            Err(e) => {
                tracing::error!(
                    param = param_name,
                    expression,
                    error = ?e,
                    "XPath evaluation failed"
                );
                Vec::new()
            }
        }
    }
}
