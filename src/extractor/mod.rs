//! Parameter extraction strategies and their registry.
//!
//! An extractor implements one parse method for one or more sources. The
//! engine looks extractors up by canonical parse-method identifier
//! (`DEFAULT`, `JSON_PATH`, `XML_PATH`, `PATH_MATCH`, or `CUSTOM#<name>`).
//!
//! Extraction never fails: a missing parameter, an unreadable body or a bad
//! expression all produce an empty list, and the engine decides what an
//! empty list means.

mod json;
mod path;
mod standard;
mod xml;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::param::{ParamSource, ParseMethod};
use crate::web::RequestAdapter;

pub use json::JsonPathExtractor;
pub use path::PathMatchExtractor;
pub use standard::DefaultExtractor;
pub use xml::XmlPathExtractor;

/// A strategy that reads a named parameter from a request.
///
/// Implementations must be stateless with respect to requests; one instance
/// serves every request concurrently.
///
/// # Examples
///
/// A custom extractor that reads a trailing path segment:
///
/// ```
/// use ownership_guard::extractor::{ExtractorRegistry, ParameterExtractor};
/// use ownership_guard::web::RequestAdapter;
/// use ownership_guard::ParamSource;
/// use std::sync::Arc;
///
/// struct LastSegment;
///
/// static SOURCES: [ParamSource; 1] = [ParamSource::Path];
///
/// impl ParameterExtractor for LastSegment {
///     fn parse_method(&self) -> &str {
///         "LAST_SEGMENT"
///     }
///
///     fn supported_sources(&self) -> &[ParamSource] {
///         &SOURCES
///     }
///
///     fn extract(
///         &self,
///         request: &RequestAdapter,
///         _param_name: &str,
///         _parse_config: Option<&str>,
///         _source: &ParamSource,
///         _body_buffered: bool,
///     ) -> Vec<String> {
///         request
///             .path()
///             .rsplit('/')
///             .next()
///             .filter(|s| !s.is_empty())
///             .map(|s| vec![s.to_string()])
///             .unwrap_or_default()
///     }
/// }
///
/// let custom: Vec<Arc<dyn ParameterExtractor>> = vec![Arc::new(LastSegment)];
/// let registry = ExtractorRegistry::with_builtins(custom);
/// assert!(registry.get("LAST_SEGMENT").is_ok());
/// assert!(registry
///     .registered_methods()
///     .contains(&"CUSTOM#LAST_SEGMENT".to_string()));
/// ```
pub trait ParameterExtractor: Send + Sync {
    /// The parse-method identifier this extractor serves.
    ///
    /// Identifiers outside the built-in set are registered as `CUSTOM#<id>`.
    fn parse_method(&self) -> &str;

    /// The sources this extractor can read from.
    fn supported_sources(&self) -> &[ParamSource];

    /// Extracts every value of `param_name` from `source`.
    fn extract(
        &self,
        request: &RequestAdapter,
        param_name: &str,
        parse_config: Option<&str>,
        source: &ParamSource,
        body_buffered: bool,
    ) -> Vec<String>;
}

/// Canonical parse method to extractor.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: BTreeMap<String, Arc<dyn ParameterExtractor>>,
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("methods", &self.registered_methods())
            .finish()
    }
}

impl ExtractorRegistry {
    /// Registers `extractors` in order.
    ///
    /// Extractors with no parse method, no sources, or an unrecognized
    /// source are skipped. A later extractor with the same canonical
    /// identifier replaces the earlier one.
    pub fn new(extractors: impl IntoIterator<Item = Arc<dyn ParameterExtractor>>) -> Self {
        let mut registry = Self::default();
        for extractor in extractors {
            registry.register(extractor);
        }
        tracing::info!(
            count = registry.extractors.len(),
            methods = ?registry.registered_methods(),
            "parameter extractors registered"
        );
        registry
    }

    /// Registers only the built-in extractors.
    pub fn builtin() -> Self {
        Self::new(builtin_extractors())
    }

    /// Registers the built-in extractors followed by `custom`.
    pub fn with_builtins(custom: impl IntoIterator<Item = Arc<dyn ParameterExtractor>>) -> Self {
        Self::new(builtin_extractors().into_iter().chain(custom))
    }

    fn register(&mut self, extractor: Arc<dyn ParameterExtractor>) {
        let raw = extractor.parse_method();
        let method = ParseMethod::parse(raw);
        if method == ParseMethod::None {
            tracing::warn!(parse_method = raw, "skipping extractor without a parse method");
            return;
        }

        let key = method.canonical();
        let sources = extractor.supported_sources();
        if sources.is_empty() {
            tracing::warn!(parse_method = %key, "skipping extractor without supported sources");
            return;
        }
        if let Some(bad) = sources.iter().find(|s| !s.is_known()) {
            tracing::warn!(
                parse_method = %key,
                source = %bad,
                "skipping extractor with unrecognized source"
            );
            return;
        }

        if self.extractors.insert(key.clone(), extractor).is_some() {
            tracing::warn!(parse_method = %key, "extractor overridden by later registration");
        } else {
            tracing::debug!(parse_method = %key, "extractor registered");
        }
    }

    /// Looks up the extractor for a parse-method identifier.
    ///
    /// The identifier is canonicalized first, so `json_path` finds
    /// `JSON_PATH` and `REGEX` finds `CUSTOM#REGEX`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedParseMethod`] listing every
    /// registered identifier when nothing is registered under it.
    pub fn get(&self, parse_method: &str) -> Result<&Arc<dyn ParameterExtractor>, ConfigError> {
        let key = ParseMethod::parse(parse_method).canonical();
        self.extractors
            .get(&key)
            .ok_or_else(|| ConfigError::UnsupportedParseMethod {
                requested: parse_method.to_string(),
                registered: self.registered_methods(),
            })
    }

    /// Returns the canonical identifiers of every registered extractor.
    pub fn registered_methods(&self) -> Vec<String> {
        self.extractors.keys().cloned().collect()
    }
}

/// The extractors shipped with this crate.
pub fn builtin_extractors() -> Vec<Arc<dyn ParameterExtractor>> {
    vec![
        Arc::new(PathMatchExtractor::new()),
        Arc::new(DefaultExtractor::new()),
        Arc::new(JsonPathExtractor::new()),
        Arc::new(XmlPathExtractor::new()),
    ]
}
