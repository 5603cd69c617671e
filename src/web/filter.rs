//! The two interception points around a framework's router.
//!
//! ```text
//! HTTP request
//!   ↓
//! before_routing()   gate: buffer body if allowed, open RequestContext
//!   ↓
//! router             resolves path variables into the RequestAdapter
//!   ↓
//! after_routing()    engine: extract, validate, allow or deny
//!   ↓
//! handler            runs only if allowed
//!   ↓
//! RequestContext dropped
//! ```
//!
//! Integrations that control the whole request can use
//! [`PermissionFilter::process`] or [`PermissionFilter::handle`], which keep
//! the context in their own frame so it is dropped on every exit path.

use std::sync::Arc;

use bytes::Bytes;

use crate::config::{GlobalConfig, StartupPolicy};
use crate::context::RequestContext;
use crate::engine::{Allow, PermissionEngine};
use crate::error::PermissionError;
use crate::extractor::ExtractorRegistry;
use crate::gate::BufferingGate;
use crate::validator::ValidatorRegistry;

use super::{ErrorResponse, RequestAdapter};

/// Runs the buffering gate and the engine for each request.
///
/// # Examples
///
/// ```
/// use http::{Method, StatusCode};
/// use ownership_guard::demo::demo_validators;
/// use ownership_guard::extractor::ExtractorRegistry;
/// use ownership_guard::validator::ValidatorRegistry;
/// use ownership_guard::web::{PermissionFilter, RequestAdapter};
/// use ownership_guard::{GlobalConfig, StartupPolicy};
///
/// let config = GlobalConfig::from_json_str(r#"{
///     "enabled": true,
///     "rules": [{
///         "uriPattern": "/api/staffs/{staffId}/schedules",
///         "enabled": true,
///         "principalParam": { "name": "staffId", "source": "PATH" },
///         "targetParams": [{
///             "name": "userId", "source": "BODY",
///             "parseMethod": "JSON_PATH", "parseConfig": "$.userId",
///             "validatorId": "staffId-userId"
///         }]
///     }]
/// }"#).unwrap();
///
/// let (filter, errors) = PermissionFilter::initialize(
///     config,
///     ExtractorRegistry::builtin(),
///     ValidatorRegistry::new(demo_validators()),
///     StartupPolicy::DisableRulesOnly,
/// );
/// assert!(errors.is_empty());
///
/// let mut request = RequestAdapter::new(Method::POST, "/api/staffs/1/schedules");
/// request.set_body(r#"{"userId":"2"}"#);
///
/// let result = filter.process(
///     request,
///     |req| req.add_path_param("staffId", "1"),
///     |_, _| "scheduled",
/// );
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PermissionFilter {
    gate: BufferingGate,
    engine: Arc<PermissionEngine>,
}

impl PermissionFilter {
    /// Creates a filter around an engine.
    pub fn new(engine: Arc<PermissionEngine>) -> Self {
        Self {
            gate: BufferingGate::new(),
            engine,
        }
    }

    /// Validates `config`, builds the engine and returns the filter together
    /// with every configuration error found.
    ///
    /// Rules with errors are disabled; `policy` decides whether enforcement
    /// as a whole is switched off as well.
    pub fn initialize(
        mut config: GlobalConfig,
        extractors: ExtractorRegistry,
        validators: ValidatorRegistry,
        policy: StartupPolicy,
    ) -> (Self, Vec<String>) {
        let errors = config.validate_and_report(policy);
        warn_unresolved(&config, &extractors, &validators);

        let engine = PermissionEngine::new(config, Arc::new(extractors), Arc::new(validators));
        (Self::new(Arc::new(engine)), errors)
    }

    /// Returns the engine.
    pub fn engine(&self) -> &PermissionEngine {
        &self.engine
    }

    /// Pre-routing hook: buffers the body when allowed and opens the context.
    pub fn before_routing(&self, request: &mut RequestAdapter) -> RequestContext {
        self.gate.open(request)
    }

    /// Post-routing hook: decides whether the handler may run.
    ///
    /// # Errors
    ///
    /// See [`PermissionEngine::evaluate`].
    pub fn after_routing(
        &self,
        request: &RequestAdapter,
        ctx: &mut RequestContext,
    ) -> Result<Allow, PermissionError> {
        let result = self.engine.evaluate(request, ctx);
        if let Err(PermissionError::Unexpected { context, .. }) = &result {
            ctx.log()
                .error(format_args!("permission check failed while {}", context));
        }
        result
    }

    /// Runs a request through both hooks and, if allowed, the handler.
    ///
    /// `route` stands in for the router and typically registers path
    /// variables. The context lives only for the duration of this call.
    ///
    /// # Errors
    ///
    /// Returns the engine's error without running the handler.
    pub fn process<T>(
        &self,
        mut request: RequestAdapter,
        route: impl FnOnce(&mut RequestAdapter),
        handler: impl FnOnce(&RequestAdapter, &RequestContext) -> T,
    ) -> Result<T, PermissionError> {
        let mut ctx = self.before_routing(&mut request);
        route(&mut request);
        self.after_routing(&request, &mut ctx)?;
        Ok(handler(&request, &ctx))
    }

    /// Like [`process`](Self::process), but maps errors to JSON responses.
    pub fn handle(
        &self,
        request: RequestAdapter,
        route: impl FnOnce(&mut RequestAdapter),
        handler: impl FnOnce(&RequestAdapter, &RequestContext) -> http::Response<Bytes>,
    ) -> http::Response<Bytes> {
        self.process(request, route, handler)
            .unwrap_or_else(|err| ErrorResponse::http_response(&err))
    }
}

/// Logs rule references that will fail at request time.
fn warn_unresolved(
    config: &GlobalConfig,
    extractors: &ExtractorRegistry,
    validators: &ValidatorRegistry,
) {
    for rule in config.rules.iter().filter(|r| r.enabled) {
        let params = rule
            .principal_param
            .iter()
            .chain(rule.target_params.iter().map(|t| &t.param));
        for param in params {
            if let Some(method) = param.parse_method.as_deref() {
                if extractors.get(method).is_err() {
                    tracing::warn!(
                        uri_pattern = %rule.uri_pattern,
                        param = %param.name,
                        parse_method = method,
                        "no extractor registered for parse method"
                    );
                }
            }
        }
        for target in &rule.target_params {
            if validators.get(&target.validator_id).is_err() {
                tracing::warn!(
                    uri_pattern = %rule.uri_pattern,
                    validator_id = %target.validator_id,
                    "no validator registered for id"
                );
            }
        }
    }
}
