//! The post-routing decision engine.
//!
//! Evaluation is fail-closed and runs through these states:
//!
//! ```text
//! Disabled ──(switch on)──▶ Match rule ──(enabled rule)──▶ Extract principal
//!    │                          │                                │
//!  Allow                  Allow (no rule)              Deny if no value
//!                                                                │
//!                              Validate ◀── Extract targets ◀────┘
//!                                 │                │
//!                          Allow / Deny      Deny if none configured
//! ```
//!
//! Setup defects discovered on the way (unknown parse method, unsupported
//! source, unknown validator id) are configuration errors; validator faults
//! are unexpected errors. Neither is turned into a verdict.

use std::sync::Arc;

use crate::config::{GlobalConfig, ParamSpec, Rule};
use crate::context::{PrincipalData, RequestContext, TargetParameter};
use crate::error::{ConfigError, PermissionError, Violation, ViolationKind};
use crate::extractor::ExtractorRegistry;
use crate::param::{MatchMode, ParseMethod};
use crate::pattern::UriPattern;
use crate::validator::ValidatorRegistry;
use crate::web::RequestAdapter;

/// Why a request was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allow {
    /// Enforcement is switched off
    Disabled,
    /// No enabled rule matches the request path
    NoMatchingRule,
    /// The rule matched and its validators accepted the targets
    Granted,
}

/// Evaluates requests against an immutable rule snapshot.
///
/// The engine is `Send + Sync` and holds no per-request state; share one
/// instance behind an `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use http::Method;
/// use ownership_guard::demo::demo_validators;
/// use ownership_guard::extractor::ExtractorRegistry;
/// use ownership_guard::validator::ValidatorRegistry;
/// use ownership_guard::web::RequestAdapter;
/// use ownership_guard::{Allow, BufferingGate, GlobalConfig, PermissionEngine};
///
/// let config = GlobalConfig::from_json_str(r#"{
///     "enabled": true,
///     "rules": [{
///         "uriPattern": "/api/staffs/{staffId}/users",
///         "enabled": true,
///         "principalParam": { "name": "staffId", "source": "PATH" },
///         "targetParams": [{ "name": "userId", "source": "QUERY", "validatorId": "staffId-userId" }]
///     }]
/// }"#).unwrap();
///
/// let engine = PermissionEngine::new(
///     config,
///     Arc::new(ExtractorRegistry::builtin()),
///     Arc::new(ValidatorRegistry::new(demo_validators())),
/// );
///
/// let mut request = RequestAdapter::new(Method::GET, "/api/staffs/3/users?userId=3");
/// let mut ctx = BufferingGate::new().open(&mut request);
/// request.add_path_param("staffId", "3");
///
/// assert_eq!(engine.evaluate(&request, &mut ctx).unwrap(), Allow::Granted);
/// ```
#[derive(Debug)]
pub struct PermissionEngine {
    config: Arc<GlobalConfig>,
    /// Compiled patterns, parallel to `config.rules`
    patterns: Vec<Option<UriPattern>>,
    extractors: Arc<ExtractorRegistry>,
    validators: Arc<ValidatorRegistry>,
}

impl PermissionEngine {
    /// Creates an engine over a validated configuration.
    ///
    /// Rules whose pattern does not compile never match.
    pub fn new(
        config: impl Into<Arc<GlobalConfig>>,
        extractors: Arc<ExtractorRegistry>,
        validators: Arc<ValidatorRegistry>,
    ) -> Self {
        let config = config.into();
        let patterns = config
            .rules
            .iter()
            .map(|rule| match UriPattern::new(rule.uri_pattern.trim()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(
                        uri_pattern = %rule.uri_pattern,
                        error = %e,
                        "rule pattern does not compile, rule never matches"
                    );
                    None
                }
            })
            .collect();

        Self {
            config,
            patterns,
            extractors,
            validators,
        }
    }

    /// Returns the configuration snapshot.
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Returns the extractor registry.
    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    /// Returns the validator registry.
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Returns the first rule, in declaration order, whose pattern matches
    /// `path`. The rule may be disabled.
    pub fn find_rule(&self, path: &str) -> Option<&Rule> {
        self.find_match(path).map(|(rule, _)| rule)
    }

    fn find_match(&self, path: &str) -> Option<(&Rule, &UriPattern)> {
        self.config
            .rules
            .iter()
            .zip(&self.patterns)
            .find_map(|(rule, pattern)| match pattern {
                Some(p) if p.matches(path) => Some((rule, p)),
                _ => None,
            })
    }

    /// Decides whether the routed request may reach its handler.
    ///
    /// Populates `ctx` with the matched mode, the principal and the targets
    /// as it goes.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::AccessDenied`] when the principal is missing, the
    ///   rule has no targets, or validators reject the targets
    /// - [`PermissionError::Configuration`] when the rule references an
    ///   extractor, source or validator that cannot serve it
    /// - [`PermissionError::Unexpected`] when a validator fails
    pub fn evaluate(
        &self,
        request: &RequestAdapter,
        ctx: &mut RequestContext,
    ) -> Result<Allow, PermissionError> {
        if !self.config.enabled {
            return Ok(Allow::Disabled);
        }

        let Some((rule, pattern)) = self.find_match(ctx.uri()) else {
            ctx.log().debug(format_args!("no rule matches"));
            return Ok(Allow::NoMatchingRule);
        };
        ctx.log()
            .info(format_args!("rule matched: {}", pattern.as_str()));
        if !rule.enabled {
            ctx.log()
                .debug(format_args!("rule {} matches but is disabled", rule.uri_pattern));
            return Ok(Allow::NoMatchingRule);
        }

        let mode = rule
            .match_mode
            .clone()
            .unwrap_or_else(|| MatchMode::Unrecognized(String::new()));
        ctx.activate(mode.clone());
        let body_buffered = ctx.body_buffered();

        let principal_spec =
            rule.principal_param
                .as_ref()
                .ok_or_else(|| ConfigError::MissingPrincipal {
                    uri_pattern: rule.uri_pattern.clone(),
                })?;
        let values = self.extract(request, principal_spec, body_buffered)?;
        if values.is_empty() {
            ctx.log().warn(format_args!(
                "principal '{}' missing for rule {}",
                principal_spec.name, rule.uri_pattern
            ));
            return Err(Violation::new(
                ViolationKind::PrincipalMissing {
                    param: principal_spec.name.clone(),
                },
                "no value could be extracted for the principal",
            )
            .into());
        }
        ctx.set_principal(PrincipalData {
            name: principal_spec.name.clone(),
            values,
        });

        if rule.target_params.is_empty() {
            return Err(Violation::new(
                ViolationKind::NoTargets,
                format!("rule {} declares no target parameters", rule.uri_pattern),
            )
            .into());
        }

        let mut targets = Vec::with_capacity(rule.target_params.len());
        for spec in &rule.target_params {
            let values = self.extract(request, &spec.param, body_buffered)?;
            targets.push(TargetParameter {
                name: spec.param.name.clone(),
                values,
                validator_id: spec.validator_id.clone(),
            });
        }
        ctx.set_targets(targets);

        let granted = match ctx.principal() {
            Some(principal) => self.decide(&mode, principal, ctx.targets())?,
            None => false,
        };

        if granted {
            ctx.log().debug(format_args!(
                "ownership verified for rule {} ({})",
                rule.uri_pattern, mode
            ));
            Ok(Allow::Granted)
        } else {
            ctx.log().warn(format_args!(
                "ownership check failed for rule {} ({})",
                rule.uri_pattern, mode
            ));
            Err(Violation::new(
                ViolationKind::OwnershipMismatch,
                "the requested resources do not belong to the caller",
            )
            .into())
        }
    }

    fn extract(
        &self,
        request: &RequestAdapter,
        spec: &ParamSpec,
        body_buffered: bool,
    ) -> Result<Vec<String>, ConfigError> {
        let source = spec
            .source
            .as_ref()
            .filter(|s| s.is_known())
            .ok_or_else(|| ConfigError::IncompleteParam {
                param: spec.name.clone(),
                missing: "source",
            })?;

        let method = match spec.parse_method() {
            ParseMethod::None => ParseMethod::default_for(source),
            method => Some(method),
        }
        .ok_or_else(|| ConfigError::IncompleteParam {
            param: spec.name.clone(),
            missing: "parse method",
        })?;
        let canonical = method.canonical();

        let extractor = self.extractors.get(&canonical)?;
        if !extractor.supported_sources().contains(source) {
            return Err(ConfigError::UnsupportedSource {
                parse_method: canonical,
                source_name: source.to_string(),
                param: spec.name.clone(),
            });
        }

        Ok(extractor.extract(
            request,
            &spec.name,
            spec.parse_config.as_deref(),
            source,
            body_buffered,
        ))
    }

    fn decide(
        &self,
        mode: &MatchMode,
        principal: &PrincipalData,
        targets: &[TargetParameter],
    ) -> Result<bool, PermissionError> {
        match mode {
            MatchMode::AllMatch => {
                for target in targets {
                    if !self.check(principal, target)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            MatchMode::AnyMatch => {
                for target in targets {
                    if self.check(principal, target)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            MatchMode::Unrecognized(_) => Ok(false),
        }
    }

    fn check(
        &self,
        principal: &PrincipalData,
        target: &TargetParameter,
    ) -> Result<bool, PermissionError> {
        let validator = self.validators.get(&target.validator_id)?;
        validator
            .validate(principal, target)
            .map_err(|source| PermissionError::Unexpected {
                context: format!("running validator '{}'", target.validator_id),
                source,
            })
    }
}
