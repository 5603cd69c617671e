//! Shared vocabulary for rule parameters: where a value lives, how it is
//! parsed, and how target verdicts combine.
//!
//! All three enums parse case-insensitively from configuration text. Values
//! that are not recognized are kept (`Unrecognized` / `Custom`) instead of
//! failing deserialization, so configuration validation can report them with
//! the owning rule attached.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix used to namespace parse methods that are not built in.
pub const CUSTOM_PREFIX: &str = "CUSTOM#";

/// The request location a parameter is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamSource {
    /// Router-resolved path template variable
    Path,
    /// Buffered request body
    Body,
    /// Query string
    Query,
    /// Request header
    Header,
    /// Cookie
    Cookie,
    /// A value outside the known source domain
    Unrecognized(String),
}

impl ParamSource {
    /// Every source the engine knows how to read.
    pub const KNOWN: [ParamSource; 5] = [
        ParamSource::Path,
        ParamSource::Body,
        ParamSource::Query,
        ParamSource::Header,
        ParamSource::Cookie,
    ];

    /// Parses a source name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PATH" => Self::Path,
            "BODY" => Self::Body,
            "QUERY" => Self::Query,
            "HEADER" => Self::Header,
            "COOKIE" => Self::Cookie,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Returns `true` for every variant except `Unrecognized`.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path => "PATH",
            Self::Body => "BODY",
            Self::Query => "QUERY",
            Self::Header => "HEADER",
            Self::Cookie => "COOKIE",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ParamSource {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ParamSource> for String {
    fn from(source: ParamSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How verdicts across a rule's target parameters combine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchMode {
    /// Every target must pass; the first failure denies
    AllMatch,
    /// One passing target is enough; the first success allows
    AnyMatch,
    /// A value that is neither of the above
    Unrecognized(String),
}

impl MatchMode {
    /// Parses a mode name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ALL_MATCH" => Self::AllMatch,
            "ANY_MATCH" => Self::AnyMatch,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AllMatch => "ALL_MATCH",
            Self::AnyMatch => "ANY_MATCH",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for MatchMode {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<MatchMode> for String {
    fn from(mode: MatchMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The family a parse-method identifier belongs to.
///
/// Built-in identifiers are matched case-insensitively. Anything else that is
/// non-empty is a `Custom` method and is keyed as `CUSTOM#<raw>`, so a custom
/// extractor can never shadow a built-in one by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseMethod {
    /// Query, header and cookie lookup
    Default,
    /// JSON path expression over the buffered body
    JsonPath,
    /// XPath expression over the buffered body
    XmlPath,
    /// Router-resolved path template variable
    PathMatch,
    /// A user-supplied extractor
    Custom(String),
    /// Empty, `NONE`, or a bare `CUSTOM` with no name
    None,
}

impl ParseMethod {
    /// Classifies a raw parse-method identifier.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::None;
        }

        let upper = trimmed.to_ascii_uppercase();
        match upper.as_str() {
            "NONE" | "CUSTOM" => Self::None,
            "DEFAULT" => Self::Default,
            "JSON_PATH" => Self::JsonPath,
            "XML_PATH" => Self::XmlPath,
            "PATH_MATCH" => Self::PathMatch,
            _ if upper.starts_with(CUSTOM_PREFIX) => {
                let name = &trimmed[CUSTOM_PREFIX.len()..];
                if name.trim().is_empty() {
                    Self::None
                } else {
                    Self::Custom(name.to_string())
                }
            }
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// Returns the registry key for this method.
    pub fn canonical(&self) -> String {
        match self {
            Self::Default => "DEFAULT".to_string(),
            Self::JsonPath => "JSON_PATH".to_string(),
            Self::XmlPath => "XML_PATH".to_string(),
            Self::PathMatch => "PATH_MATCH".to_string(),
            Self::Custom(name) => format!("{CUSTOM_PREFIX}{name}"),
            Self::None => "NONE".to_string(),
        }
    }

    /// Structured-body methods cannot run without an expression.
    pub fn requires_expression(&self) -> bool {
        matches!(self, Self::JsonPath | Self::XmlPath)
    }

    /// Checks the source/parse-method compatibility table.
    ///
    /// Custom methods are accepted for any source; the extractor's own
    /// declared sources are checked again at request time.
    pub fn is_compatible_with(&self, source: &ParamSource) -> bool {
        match self {
            Self::Custom(_) => true,
            Self::None => false,
            Self::PathMatch => *source == ParamSource::Path,
            Self::JsonPath | Self::XmlPath => *source == ParamSource::Body,
            Self::Default => matches!(
                source,
                ParamSource::Query | ParamSource::Header | ParamSource::Cookie
            ),
        }
    }

    /// The parse method implied for a source when none is configured.
    ///
    /// Body is deliberately absent: JSON and XML are equally plausible.
    pub fn default_for(source: &ParamSource) -> Option<Self> {
        match source {
            ParamSource::Path => Some(Self::PathMatch),
            ParamSource::Query | ParamSource::Header | ParamSource::Cookie => Some(Self::Default),
            ParamSource::Body | ParamSource::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
