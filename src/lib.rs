//! Declarative horizontal-privilege checks for HTTP services.
//!
//! Each request is matched against an ordered list of URI-scoped rules. The
//! first matching rule names a *principal* parameter (who is asking) and one
//! or more *target* parameters (what they are asking about), where to read
//! them from, and which ownership validator decides whether each target
//! belongs to the principal.
//!
//! # Core Types
//!
//! - [`GlobalConfig`]: the rule set, validated once at startup
//! - [`ExtractorRegistry`](extractor::ExtractorRegistry): parse methods that
//!   read parameters from path, body, query, header or cookie
//! - [`ValidatorRegistry`](validator::ValidatorRegistry): ownership predicates
//!   by id
//! - [`BufferingGate`]: pre-routing step that opens the [`RequestContext`]
//! - [`PermissionEngine`]: post-routing decision
//! - [`web::PermissionFilter`]: both hooks plus a scoped `process` helper
//!
//! # Examples
//!
//! ```
//! use http::Method;
//! use ownership_guard::demo::demo_validators;
//! use ownership_guard::extractor::ExtractorRegistry;
//! use ownership_guard::validator::ValidatorRegistry;
//! use ownership_guard::web::{PermissionFilter, RequestAdapter};
//! use ownership_guard::{GlobalConfig, StartupPolicy};
//!
//! let config = GlobalConfig::from_toml_str(r#"
//!     enabled = true
//!
//!     [[rules]]
//!     uriPattern = "/api/classes/**"
//!     enabled = true
//!     matchMode = "ALL_MATCH"
//!     principalParam = { name = "x-staff-id", source = "HEADER" }
//!
//!     [[rules.targetParams]]
//!     name = "classId"
//!     source = "QUERY"
//!     validatorId = "staffId-classId"
//! "#).unwrap();
//!
//! let (filter, errors) = PermissionFilter::initialize(
//!     config,
//!     ExtractorRegistry::builtin(),
//!     ValidatorRegistry::new(demo_validators()),
//!     StartupPolicy::DisableRulesOnly,
//! );
//! assert!(errors.is_empty());
//!
//! let mut request = RequestAdapter::new(Method::GET, "/api/classes/roster?classId=7");
//! request.add_header(
//!     http::header::HeaderName::from_static("x-staff-id"),
//!     http::header::HeaderValue::from_static("1"),
//! );
//!
//! let roster = filter.process(request, |_| {}, |_, _| "roster");
//! assert_eq!(roster.unwrap(), "roster");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod engine;
mod error;
mod gate;
mod logging;
mod param;
mod pattern;

pub mod demo;
pub mod extractor;
pub mod validator;
pub mod web;

pub use config::{GlobalConfig, ParamSpec, Rule, StartupPolicy, TargetSpec};
pub use context::{PrincipalData, RequestContext, TargetParameter};
pub use engine::{Allow, PermissionEngine};
pub use error::{ConfigError, LoadError, PermissionError, Violation, ViolationKind};
pub use gate::BufferingGate;
pub use logging::ContextLog;
pub use param::{MatchMode, ParamSource, ParseMethod, CUSTOM_PREFIX};
pub use pattern::UriPattern;
