use std::fmt;

use thiserror::Error;

/// Errors produced while deciding whether a request may proceed.
///
/// The three variants are kept apart because the boundary maps them to
/// different responses: denials to 403, setup defects to 400, and anything
/// else to a generic 500.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The principal is not entitled to the targets, or no principal was found
    #[error("access denied: {0}")]
    AccessDenied(#[from] Violation),

    /// A rule references an extractor, source or validator that cannot serve it
    #[error("permission configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A validator or other collaborator failed unexpectedly
    #[error("unexpected failure while {context}")]
    Unexpected {
        /// What the engine was doing when the failure happened
        context: String,
        /// The underlying failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PermissionError {
    /// Returns the violation if this is a denial.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::AccessDenied(v) => Some(v),
            _ => None,
        }
    }
}

/// A denial with details about why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// The configured principal parameter produced no value
    PrincipalMissing {
        /// Name of the principal parameter
        param: String,
    },
    /// The rule produced no target parameters to check
    NoTargets,
    /// Validators rejected the targets under the rule's match mode
    OwnershipMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::PrincipalMissing { param } => {
                write!(f, "principal '{}' missing", param)
            }
            ViolationKind::NoTargets => write!(f, "no target parameters"),
            ViolationKind::OwnershipMismatch => write!(f, "ownership mismatch"),
        }
    }
}

/// A setup defect detected while evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No extractor is registered for the parse method
    #[error("unsupported parse method '{requested}', registered methods: {registered:?}")]
    UnsupportedParseMethod {
        /// The parse method the rule asked for
        requested: String,
        /// Every canonical parse method currently registered
        registered: Vec<String>,
    },

    /// The extractor exists but does not read from the configured source
    #[error("extractor '{parse_method}' does not support source {source_name} (parameter '{param}')")]
    UnsupportedSource {
        /// Canonical parse method of the extractor
        parse_method: String,
        /// The configured source
        source_name: String,
        /// The parameter being extracted
        param: String,
    },

    /// No validator is registered under the id
    #[error("unknown validator id '{id}', registered ids: {registered:?}")]
    UnknownValidator {
        /// The validator id the target referenced
        id: String,
        /// Every validator id currently registered
        registered: Vec<String>,
    },

    /// A parameter reached evaluation without a parse method or source
    #[error("parameter '{param}' has no {missing} configured")]
    IncompleteParam {
        /// The parameter being extracted
        param: String,
        /// Which setting is absent
        missing: &'static str,
    },

    /// A rule reached evaluation without a principal parameter
    #[error("rule '{uri_pattern}' has no principal parameter")]
    MissingPrincipal {
        /// Pattern of the offending rule
        uri_pattern: String,
    },
}

/// Errors from loading a rule set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The JSON document could not be deserialized
    #[error("invalid JSON permission config: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML document could not be deserialized
    #[error("invalid TOML permission config: {0}")]
    Toml(#[from] toml::de::Error),
}
