//! Declarative rule set and its startup validation.
//!
//! A [`GlobalConfig`] is deserialized from whatever medium the deployment
//! uses (JSON and TOML loaders are provided), validated once, and then handed
//! to the engine as an immutable snapshot.
//!
//! Validation never aborts startup. Every problem is collected into one list
//! of messages, each prefixed with the owning rule and parameter, and every
//! rule that produced at least one message is disabled. Sibling rules are
//! left untouched.
//!
//! # Examples
//!
//! ```
//! use ownership_guard::GlobalConfig;
//!
//! let mut config = GlobalConfig::from_json_str(r#"{
//!     "enabled": true,
//!     "rules": [{
//!         "uriPattern": "/api/staffs/{staffId}/schedules",
//!         "enabled": true,
//!         "principalParam": { "name": "staffId", "source": "PATH" },
//!         "targetParams": [{
//!             "name": "userId",
//!             "source": "BODY",
//!             "parseMethod": "JSON_PATH",
//!             "parseConfig": "$.userId",
//!             "validatorId": "staffId-userId"
//!         }],
//!         "matchMode": "ANY_MATCH"
//!     }]
//! }"#).unwrap();
//!
//! assert!(config.validate().is_empty());
//! // PATH principals get the path-template parse method implicitly.
//! let principal = config.rules[0].principal_param.as_ref().unwrap();
//! assert_eq!(principal.parse_method.as_deref(), Some("PATH_MATCH"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::param::{MatchMode, ParamSource, ParseMethod};
use crate::pattern::UriPattern;

/// Label used for rules whose pattern is unset.
const UNSET_URI: &str = "<unset uri>";

/// The complete rule set plus the global enforcement switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Global switch; when `false` every request is allowed
    #[serde(default)]
    pub enabled: bool,
    /// Rules in declaration order; the first matching rule applies
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// What the startup hook does beyond disabling broken rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Disable only the rules that failed validation
    #[default]
    DisableRulesOnly,
    /// Also switch enforcement off entirely when any error was found
    DisableEnforcement,
}

impl GlobalConfig {
    /// Deserializes a rule set from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if the document is not valid JSON or does
    /// not have the expected shape. Unknown enum values are not load errors;
    /// they are reported by [`validate`](Self::validate).
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Deserializes a rule set from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Toml`] if the document is not valid TOML or does
    /// not have the expected shape.
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Validates every rule and disables the ones that have errors.
    ///
    /// Fills in implied parse methods as a side effect. Never panics; returns
    /// an empty list when the configuration is sound.
    pub fn validate(&mut self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut valid_rules = 0usize;

        for rule in &mut self.rules {
            let rule_errors = rule.validate();
            if rule_errors.is_empty() {
                valid_rules += 1;
                continue;
            }

            let label = rule.label().to_string();
            errors.extend(
                rule_errors
                    .into_iter()
                    .map(|error| format!("rule[{}]: {}", label, error)),
            );
            rule.enabled = false;
        }

        if self.enabled && valid_rules == 0 {
            errors.push("enforcement is enabled but no valid rule is configured".to_string());
        }

        errors
    }

    /// Startup hook: validates, logs every error, and applies `policy`.
    ///
    /// Returns the same messages as [`validate`](Self::validate).
    pub fn validate_and_report(&mut self, policy: StartupPolicy) -> Vec<String> {
        tracing::info!(rules = self.rules.len(), "validating permission config");
        let errors = self.validate();

        if errors.is_empty() {
            tracing::info!("permission config is valid");
            return errors;
        }

        tracing::error!(count = errors.len(), "permission config has errors");
        for error in &errors {
            tracing::error!("- {}", error);
        }

        if policy == StartupPolicy::DisableEnforcement && self.enabled {
            tracing::error!("disabling permission enforcement because of config errors");
            self.enabled = false;
        }

        errors
    }
}

/// A URI-scoped declaration of which principal and targets to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Glob pattern matched against the request path
    #[serde(default)]
    pub uri_pattern: String,
    /// Per-rule switch; validation turns it off when the rule is broken
    #[serde(default)]
    pub enabled: bool,
    /// The parameter naming the acting principal
    #[serde(default)]
    pub principal_param: Option<ParamSpec>,
    /// The parameters naming target resources, checked in order
    #[serde(default, alias = "paramRules")]
    pub target_params: Vec<TargetSpec>,
    /// How target verdicts combine; defaults to `ANY_MATCH` when absent
    #[serde(default = "default_match_mode", alias = "multiParamMode")]
    pub match_mode: Option<MatchMode>,
}

fn default_match_mode() -> Option<MatchMode> {
    Some(MatchMode::AnyMatch)
}

impl Rule {
    /// Returns the pattern, or a placeholder when it is unset.
    pub fn label(&self) -> &str {
        if self.uri_pattern.trim().is_empty() {
            UNSET_URI
        } else {
            &self.uri_pattern
        }
    }

    /// Validates this rule, returning errors without the rule prefix.
    pub fn validate(&mut self) -> Vec<String> {
        let mut errors = Vec::new();

        self.validate_pattern(&mut errors);
        self.validate_match_mode(&mut errors);

        match self.principal_param.as_mut() {
            None => errors.push("principalParam must be configured".to_string()),
            Some(principal) => errors.extend(
                principal
                    .validate()
                    .into_iter()
                    .map(|error| format!("principal param: {}", error)),
            ),
        }

        if self.target_params.is_empty() {
            errors.push("targetParams must contain at least one target".to_string());
            return errors;
        }

        for target in &mut self.target_params {
            let name = if target.param.name.trim().is_empty() {
                "<unnamed>".to_string()
            } else {
                target.param.name.clone()
            };
            errors.extend(
                target
                    .validate()
                    .into_iter()
                    .map(|error| format!("target param[{}]: {}", name, error)),
            );
        }

        let duplicates = self.duplicate_target_names();
        if !duplicates.is_empty() {
            errors.push(format!("duplicate target names: {:?}", duplicates));
        }

        errors
    }

    fn validate_pattern(&self, errors: &mut Vec<String>) {
        let pattern = self.uri_pattern.trim();
        if pattern.is_empty() {
            errors.push("uriPattern must not be empty (e.g. /api/users/**)".to_string());
        } else if !pattern.starts_with('/') {
            errors.push("uriPattern must start with /".to_string());
        } else if let Err(e) = UriPattern::new(pattern) {
            errors.push(format!("uriPattern is not a valid glob: {}", e));
        }
    }

    fn validate_match_mode(&self, errors: &mut Vec<String>) {
        match &self.match_mode {
            None => errors.push("matchMode must be ALL_MATCH or ANY_MATCH".to_string()),
            Some(MatchMode::Unrecognized(raw)) => errors.push(format!(
                "matchMode must be ALL_MATCH or ANY_MATCH, got: {}",
                raw
            )),
            Some(_) => {}
        }
    }

    fn duplicate_target_names(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for target in &self.target_params {
            let name = target.param.name.trim();
            if !name.is_empty() {
                *counts.entry(name).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Where and how to extract one parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    /// Parameter name as it appears in the request
    #[serde(default, alias = "paramName")]
    pub name: String,
    /// Request location
    #[serde(default)]
    pub source: Option<ParamSource>,
    /// Parse-method identifier; implied for PATH/QUERY/HEADER/COOKIE
    #[serde(default)]
    pub parse_method: Option<String>,
    /// Expression for structured-body methods
    #[serde(default)]
    pub parse_config: Option<String>,
}

impl ParamSpec {
    /// Creates a spec with an implied parse method.
    pub fn new(name: impl Into<String>, source: ParamSource) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
            parse_method: None,
            parse_config: None,
        }
    }

    /// Sets the parse method and its expression.
    pub fn parsed_with(
        mut self,
        parse_method: impl Into<String>,
        parse_config: impl Into<String>,
    ) -> Self {
        self.parse_method = Some(parse_method.into());
        self.parse_config = Some(parse_config.into());
        self
    }

    /// Classifies the configured parse method.
    pub fn parse_method(&self) -> ParseMethod {
        self.parse_method
            .as_deref()
            .map(ParseMethod::parse)
            .unwrap_or(ParseMethod::None)
    }

    /// Validates this spec, filling in an implied parse method when possible.
    pub fn validate(&mut self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        }

        let source = match &self.source {
            None => {
                errors.push("source must be one of PATH/BODY/QUERY/HEADER/COOKIE".to_string());
                None
            }
            Some(ParamSource::Unrecognized(raw)) => {
                errors.push(format!("source is invalid: {}", raw));
                None
            }
            Some(source) => Some(source.clone()),
        };

        let unset = self
            .parse_method
            .as_deref()
            .map_or(true, |m| m.trim().is_empty());
        if unset {
            if let Some(implied) = source.as_ref().and_then(ParseMethod::default_for) {
                self.parse_method = Some(implied.canonical());
            }
        }

        let method = self.parse_method();
        match (&self.parse_method, &method) {
            (None, _) => errors.push("parseMethod must be configured".to_string()),
            (Some(raw), ParseMethod::None) if raw.trim().is_empty() => {
                errors.push("parseMethod must be configured".to_string())
            }
            (Some(raw), ParseMethod::None) => {
                errors.push(format!("parseMethod is invalid: {}", raw))
            }
            _ => {}
        }

        if let Some(source) = &source {
            if method != ParseMethod::None && !method.is_compatible_with(source) {
                errors.push(format!(
                    "source {} does not support parseMethod {}",
                    source, method
                ));
            }
        }

        if method.requires_expression()
            && self
                .parse_config
                .as_deref()
                .map_or(true, |c| c.trim().is_empty())
        {
            errors.push(format!("parseMethod {} requires parseConfig", method));
        }

        errors
    }
}

/// A target parameter and the validator that checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    /// Extraction settings
    #[serde(flatten)]
    pub param: ParamSpec,
    /// Identifier of the ownership validator
    #[serde(default)]
    pub validator_id: String,
}

impl TargetSpec {
    /// Creates a target spec.
    pub fn new(param: ParamSpec, validator_id: impl Into<String>) -> Self {
        Self {
            param,
            validator_id: validator_id.into(),
        }
    }

    /// Validates the extraction settings and the validator id.
    pub fn validate(&mut self) -> Vec<String> {
        let mut errors = self.param.validate();
        if self.validator_id.trim().is_empty() {
            errors.push("validatorId must not be empty".to_string());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_principal() -> ParamSpec {
        ParamSpec::new("staffId", ParamSource::Path)
    }

    fn body_target(name: &str) -> TargetSpec {
        TargetSpec::new(
            ParamSpec::new(name, ParamSource::Body).parsed_with("JSON_PATH", "$.userId"),
            "staffId-userId",
        )
    }

    fn valid_rule(pattern: &str) -> Rule {
        Rule {
            uri_pattern: pattern.to_string(),
            enabled: true,
            principal_param: Some(path_principal()),
            target_params: vec![body_target("userId")],
            match_mode: Some(MatchMode::AnyMatch),
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        let mut config = GlobalConfig {
            enabled: true,
            rules: vec![valid_rule("/api/staffs/{staffId}/schedules")],
        };

        assert!(config.validate().is_empty());
        assert!(config.rules[0].enabled);
    }

    #[test]
    fn path_principal_gets_implied_parse_method() {
        let mut spec = path_principal();
        assert!(spec.validate().is_empty());
        assert_eq!(spec.parse_method.as_deref(), Some("PATH_MATCH"));
    }

    #[test]
    fn query_header_cookie_get_default_parse_method() {
        for source in [ParamSource::Query, ParamSource::Header, ParamSource::Cookie] {
            let mut spec = ParamSpec::new("userId", source);
            assert!(spec.validate().is_empty());
            assert_eq!(spec.parse_method.as_deref(), Some("DEFAULT"));
        }
    }

    #[test]
    fn body_without_parse_method_is_invalid() {
        let mut spec = ParamSpec::new("userId", ParamSource::Body);
        let errors = spec.validate();

        assert_eq!(spec.parse_method, None);
        assert!(errors.iter().any(|e| e.contains("parseMethod must be configured")));
    }

    #[test]
    fn structured_body_requires_expression() {
        let mut spec = ParamSpec::new("userId", ParamSource::Body);
        spec.parse_method = Some("XML_PATH".to_string());
        spec.parse_config = Some("  ".to_string());

        let errors = spec.validate();
        assert_eq!(errors, vec!["parseMethod XML_PATH requires parseConfig"]);
    }

    #[test]
    fn incompatible_source_and_method() {
        let mut spec = ParamSpec::new("userId", ParamSource::Query);
        spec.parse_method = Some("PATH_MATCH".to_string());

        let errors = spec.validate();
        assert_eq!(
            errors,
            vec!["source QUERY does not support parseMethod PATH_MATCH"]
        );
    }

    #[test]
    fn custom_method_is_compatible_with_any_source() {
        let mut spec = ParamSpec::new("userId", ParamSource::Path);
        spec.parse_method = Some("REGEX".to_string());
        assert!(spec.validate().is_empty());
    }

    #[test]
    fn none_parse_method_is_invalid() {
        let mut spec = ParamSpec::new("userId", ParamSource::Query);
        spec.parse_method = Some("NONE".to_string());
        let errors = spec.validate();
        assert_eq!(errors, vec!["parseMethod is invalid: NONE"]);
    }

    #[test]
    fn missing_and_unknown_source() {
        let mut spec = ParamSpec::default();
        spec.name = "userId".to_string();
        let errors = spec.validate();
        assert!(errors.iter().any(|e| e.starts_with("source must be")));

        let mut spec = ParamSpec::new("userId", ParamSource::parse("fragment"));
        let errors = spec.validate();
        assert!(errors.iter().any(|e| e == "source is invalid: fragment"));
    }

    #[test]
    fn target_requires_validator_id() {
        let mut target = body_target("userId");
        target.validator_id = " ".to_string();
        assert_eq!(target.validate(), vec!["validatorId must not be empty"]);
    }

    #[test]
    fn rule_pattern_checks() {
        let mut rule = valid_rule("");
        assert!(rule.validate()[0].starts_with("uriPattern must not be empty"));

        let mut rule = valid_rule("api/users");
        assert_eq!(rule.validate(), vec!["uriPattern must start with /"]);

        let mut rule = valid_rule("/api/a**");
        assert!(rule.validate()[0].starts_with("uriPattern is not a valid glob"));
    }

    #[test]
    fn rule_match_mode_checks() {
        let mut rule = valid_rule("/api/x");
        rule.match_mode = None;
        assert_eq!(rule.validate(), vec!["matchMode must be ALL_MATCH or ANY_MATCH"]);

        let mut rule = valid_rule("/api/x");
        rule.match_mode = Some(MatchMode::parse("SOME_MATCH"));
        assert_eq!(
            rule.validate(),
            vec!["matchMode must be ALL_MATCH or ANY_MATCH, got: SOME_MATCH"]
        );
    }

    #[test]
    fn rule_requires_principal_and_targets() {
        let mut rule = valid_rule("/api/x");
        rule.principal_param = None;
        rule.target_params.clear();

        let errors = rule.validate();
        assert_eq!(
            errors,
            vec![
                "principalParam must be configured",
                "targetParams must contain at least one target",
            ]
        );
    }

    #[test]
    fn duplicate_target_names_are_reported() {
        let mut rule = valid_rule("/api/x");
        rule.target_params.push(body_target("userId"));

        let errors = rule.validate();
        assert_eq!(errors, vec!["duplicate target names: [\"userId\"]"]);
    }

    #[test]
    fn errors_are_collected_in_one_pass_and_annotated() {
        let mut rule = valid_rule("/api/x");
        rule.match_mode = None;
        rule.principal_param = Some(ParamSpec::new("", ParamSource::Path));
        rule.target_params[0].validator_id.clear();

        let mut config = GlobalConfig {
            enabled: false,
            rules: vec![rule],
        };
        let errors = config.validate();

        assert_eq!(
            errors,
            vec![
                "rule[/api/x]: matchMode must be ALL_MATCH or ANY_MATCH",
                "rule[/api/x]: principal param: name must not be empty",
                "rule[/api/x]: target param[userId]: validatorId must not be empty",
            ]
        );
    }

    #[test]
    fn only_broken_rules_are_disabled() {
        let mut broken = valid_rule("/api/broken");
        broken.target_params.clear();

        let mut config = GlobalConfig {
            enabled: true,
            rules: vec![valid_rule("/api/ok"), broken, valid_rule("/api/also-ok")],
        };
        let errors = config.validate();

        assert_eq!(errors.len(), 1);
        assert!(config.rules[0].enabled);
        assert!(!config.rules[1].enabled);
        assert!(config.rules[2].enabled);
        assert!(config.enabled);
    }

    #[test]
    fn enabled_switch_without_valid_rules_is_a_global_error() {
        let mut config = GlobalConfig {
            enabled: true,
            rules: Vec::new(),
        };
        let errors = config.validate();

        assert_eq!(
            errors,
            vec!["enforcement is enabled but no valid rule is configured"]
        );
        assert!(config.enabled, "validate alone never flips the switch");
    }

    #[test]
    fn unset_uri_is_labelled() {
        let mut rule = valid_rule("");
        rule.uri_pattern = "   ".to_string();
        let mut config = GlobalConfig {
            enabled: false,
            rules: vec![rule],
        };
        let errors = config.validate();
        assert!(errors[0].starts_with("rule[<unset uri>]: "));
    }

    #[test]
    fn startup_policy_can_disable_enforcement() {
        let mut broken = valid_rule("/api/broken");
        broken.principal_param = None;

        let mut keep = GlobalConfig {
            enabled: true,
            rules: vec![valid_rule("/api/ok"), broken.clone()],
        };
        assert_eq!(keep.validate_and_report(StartupPolicy::DisableRulesOnly).len(), 1);
        assert!(keep.enabled);

        let mut strict = GlobalConfig {
            enabled: true,
            rules: vec![valid_rule("/api/ok"), broken],
        };
        assert_eq!(
            strict
                .validate_and_report(StartupPolicy::DisableEnforcement)
                .len(),
            1
        );
        assert!(!strict.enabled);
    }

    #[test]
    fn loads_json_with_original_field_names() {
        let config = GlobalConfig::from_json_str(
            r#"{
                "enabled": true,
                "rules": [{
                    "uriPattern": "/api/classes/**",
                    "enabled": true,
                    "principalParam": { "name": "staffId", "source": "header" },
                    "paramRules": [{
                        "paramName": "classId",
                        "source": "QUERY",
                        "validatorId": "staffId-classId"
                    }],
                    "multiParamMode": "ALL_MATCH"
                }]
            }"#,
        )
        .unwrap();

        let rule = &config.rules[0];
        assert_eq!(rule.match_mode, Some(MatchMode::AllMatch));
        assert_eq!(rule.target_params[0].param.name, "classId");
        assert_eq!(rule.target_params[0].validator_id, "staffId-classId");
        assert_eq!(
            rule.principal_param.as_ref().unwrap().source,
            Some(ParamSource::Header)
        );
    }

    #[test]
    fn loads_toml() {
        let config = GlobalConfig::from_toml_str(
            r#"
            enabled = true

            [[rules]]
            uriPattern = "/api/staffs/{staffId}/logs/*"
            enabled = true
            principalParam = { name = "staffId", source = "PATH" }

            [[rules.targetParams]]
            name = "classId"
            source = "QUERY"
            validatorId = "staffId-classId"
            "#,
        )
        .unwrap();

        assert!(config.enabled);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].match_mode, Some(MatchMode::AnyMatch));
        assert_eq!(config.rules[0].target_params.len(), 1);
    }

    #[test]
    fn explicit_null_match_mode_is_reported() {
        let mut config = GlobalConfig::from_json_str(
            r#"{"enabled": false, "rules": [{
                "uriPattern": "/x", "enabled": true,
                "principalParam": {"name": "a", "source": "PATH"},
                "targetParams": [{"name": "b", "source": "QUERY", "validatorId": "v"}],
                "matchMode": null
            }]}"#,
        )
        .unwrap();

        let errors = config.validate();
        assert_eq!(errors, vec!["rule[/x]: matchMode must be ALL_MATCH or ANY_MATCH"]);
        assert!(!config.rules[0].enabled);
    }

    #[test]
    fn unknown_enum_values_do_not_fail_loading() {
        let config = GlobalConfig::from_json_str(
            r#"{"rules": [{"uriPattern": "/x", "matchMode": "MOST",
                "principalParam": {"name": "a", "source": "FRAGMENT"}}]}"#,
        );
        assert!(config.is_ok());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(
            GlobalConfig::from_json_str("{ not json"),
            Err(LoadError::Json(_))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_source() -> impl Strategy<Value = Option<ParamSource>> {
            prop_oneof![
                Just(None),
                Just(Some(ParamSource::Path)),
                Just(Some(ParamSource::Body)),
                Just(Some(ParamSource::Query)),
                Just(Some(ParamSource::Header)),
                Just(Some(ParamSource::Cookie)),
                "[a-z]{1,6}".prop_map(|s| Some(ParamSource::Unrecognized(s))),
            ]
        }

        fn arb_spec() -> impl Strategy<Value = ParamSpec> {
            (
                "[a-zA-Z]{0,6}",
                arb_source(),
                prop::option::of(prop_oneof![
                    Just("".to_string()),
                    Just("JSON_PATH".to_string()),
                    Just("XML_PATH".to_string()),
                    Just("PATH_MATCH".to_string()),
                    Just("DEFAULT".to_string()),
                    Just("NONE".to_string()),
                    "[A-Z_#]{1,8}",
                ]),
                prop::option::of("[$.a-z]{0,6}"),
            )
                .prop_map(|(name, source, parse_method, parse_config)| ParamSpec {
                    name,
                    source,
                    parse_method,
                    parse_config,
                })
        }

        fn arb_rule() -> impl Strategy<Value = Rule> {
            (
                "(/[a-z*{}]{0,5}){0,3}|[a-z]{0,4}",
                any::<bool>(),
                prop::option::of(arb_spec()),
                prop::collection::vec((arb_spec(), "[a-z-]{0,4}"), 0..3),
                prop::option::of(prop_oneof![
                    Just(MatchMode::AllMatch),
                    Just(MatchMode::AnyMatch),
                    "[A-Z]{1,4}".prop_map(MatchMode::Unrecognized),
                ]),
            )
                .prop_map(|(uri_pattern, enabled, principal_param, targets, match_mode)| Rule {
                    uri_pattern,
                    enabled,
                    principal_param,
                    target_params: targets
                        .into_iter()
                        .map(|(param, id)| TargetSpec::new(param, id))
                        .collect(),
                    match_mode,
                })
        }

        proptest! {
            /// Property: validation disables exactly the rules that report errors
            #[test]
            fn proptest_validate_disables_exactly_broken_rules(
                rules in prop::collection::vec(arb_rule(), 0..5),
                enabled in any::<bool>(),
            ) {
                let expected: Vec<(bool, bool)> = rules
                    .iter()
                    .map(|rule| {
                        let mut probe = rule.clone();
                        (probe.validate().is_empty(), rule.enabled)
                    })
                    .collect();

                let mut config = GlobalConfig { enabled, rules };
                let _errors = config.validate();

                for (rule, (valid, was_enabled)) in config.rules.iter().zip(expected) {
                    if valid {
                        prop_assert_eq!(rule.enabled, was_enabled);
                    } else {
                        prop_assert!(!rule.enabled);
                    }
                }
                prop_assert_eq!(config.enabled, enabled);
            }

            /// Property: validating twice is stable
            #[test]
            fn proptest_validate_is_idempotent(rules in prop::collection::vec(arb_rule(), 0..4)) {
                let mut config = GlobalConfig { enabled: true, rules };
                let first = config.validate();
                let second = config.validate();
                prop_assert_eq!(first, second);
            }
        }
    }
}
