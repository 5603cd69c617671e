use crate::logging::ContextLog;
use crate::param::MatchMode;

/// The acting principal extracted from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalData {
    /// Configured parameter name (e.g. `staffId`)
    pub name: String,
    /// Extracted values in request order; never empty once extracted
    pub values: Vec<String>,
}

impl PrincipalData {
    /// Returns the first extracted value, which is what most validators compare.
    pub fn primary(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// A target identifier whose ownership must be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetParameter {
    /// Configured parameter name (e.g. `userId`)
    pub name: String,
    /// Extracted values in request order; may be empty
    pub values: Vec<String>,
    /// Identifier of the validator that decides ownership
    pub validator_id: String,
}

/// Request-scoped state threaded between the two interception points.
///
/// A `RequestContext` is created by the buffering gate before routing and
/// filled in by the engine after routing. It is an owned value: it lives in
/// the frame that handles the request and is dropped with it, whichever way
/// that frame exits. It deliberately does not implement `Clone`, so extracted
/// principal data cannot be carried past the request it belongs to.
///
/// Contexts cannot be constructed outside this crate; use
/// [`BufferingGate::open`](crate::BufferingGate::open) or
/// [`PermissionFilter::before_routing`](crate::web::PermissionFilter::before_routing).
#[derive(Debug)]
pub struct RequestContext {
    uri: String,
    enabled: bool,
    principal: Option<PrincipalData>,
    targets: Vec<TargetParameter>,
    match_mode: Option<MatchMode>,
    body_buffered: bool,
}

impl RequestContext {
    pub(crate) fn new(uri: impl Into<String>, body_buffered: bool) -> Self {
        Self {
            uri: uri.into(),
            enabled: false,
            principal: None,
            targets: Vec::new(),
            match_mode: None,
            body_buffered,
        }
    }

    /// Returns the request path this context was opened for.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns `true` once an enabled rule has matched this request.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the extracted principal, if extraction has run and succeeded.
    pub fn principal(&self) -> Option<&PrincipalData> {
        self.principal.as_ref()
    }

    /// Returns the extracted targets in declaration order.
    pub fn targets(&self) -> &[TargetParameter] {
        &self.targets
    }

    /// Returns the match mode of the rule that applied.
    pub fn match_mode(&self) -> Option<&MatchMode> {
        self.match_mode.as_ref()
    }

    /// Returns `true` if the gate made the body re-readable.
    pub fn body_buffered(&self) -> bool {
        self.body_buffered
    }

    /// Returns a logger that tags every message with this request's URI.
    pub fn log(&self) -> ContextLog<'_> {
        ContextLog::new(&self.uri)
    }

    pub(crate) fn activate(&mut self, match_mode: MatchMode) {
        self.enabled = true;
        self.match_mode = Some(match_mode);
    }

    pub(crate) fn set_principal(&mut self, principal: PrincipalData) {
        self.principal = Some(principal);
    }

    pub(crate) fn set_targets(&mut self, targets: Vec<TargetParameter>) {
        self.targets = targets;
    }
}
