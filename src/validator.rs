//! Ownership validators and their registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::{PrincipalData, TargetParameter};
use crate::error::ConfigError;

/// A failure inside a validator, such as an unreachable relation store.
pub type ValidationFault = Box<dyn std::error::Error + Send + Sync>;

/// Decides whether a target belongs to a principal.
///
/// The validator receives every extracted value of both parameters and
/// decides for itself what multiple values mean. A returned `Err` is a fault,
/// not a denial; the engine reports it as an unexpected failure.
///
/// # Examples
///
/// ```
/// use ownership_guard::validator::{OwnershipValidator, ValidationFault};
/// use ownership_guard::{PrincipalData, TargetParameter};
///
/// struct SameId;
///
/// impl OwnershipValidator for SameId {
///     fn validator_id(&self) -> &str {
///         "same-id"
///     }
///
///     fn validate(
///         &self,
///         principal: &PrincipalData,
///         target: &TargetParameter,
///     ) -> Result<bool, ValidationFault> {
///         Ok(!target.values.is_empty()
///             && target.values.iter().all(|v| Some(v.as_str()) == principal.primary()))
///     }
/// }
/// ```
pub trait OwnershipValidator: Send + Sync {
    /// The identifier rules use to reference this validator.
    fn validator_id(&self) -> &str;

    /// Returns `Ok(true)` if `target` belongs to `principal`.
    fn validate(
        &self,
        principal: &PrincipalData,
        target: &TargetParameter,
    ) -> Result<bool, ValidationFault>;
}

/// Validator id to validator.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<String, Arc<dyn OwnershipValidator>>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("ids", &self.validator_ids())
            .finish()
    }
}

impl ValidatorRegistry {
    /// Registers `validators` in order.
    ///
    /// Validators with a blank id are skipped. A later validator with the
    /// same id replaces the earlier one.
    pub fn new(validators: impl IntoIterator<Item = Arc<dyn OwnershipValidator>>) -> Self {
        let mut registry = Self::default();

        for validator in validators {
            let id = validator.validator_id().to_string();
            if id.trim().is_empty() {
                tracing::error!("skipping validator with an empty id");
                continue;
            }
            if registry.validators.insert(id.clone(), validator).is_some() {
                tracing::warn!(validator_id = %id, "validator overridden by later registration");
            } else {
                tracing::debug!(validator_id = %id, "validator registered");
            }
        }

        if registry.validators.is_empty() {
            tracing::warn!("no ownership validators registered");
        } else {
            tracing::info!(
                count = registry.validators.len(),
                ids = ?registry.validator_ids(),
                "ownership validators registered"
            );
        }
        registry
    }

    /// Looks up a validator by id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownValidator`] listing every registered id.
    pub fn get(&self, id: &str) -> Result<&Arc<dyn OwnershipValidator>, ConfigError> {
        self.validators
            .get(id)
            .ok_or_else(|| ConfigError::UnknownValidator {
                id: id.to_string(),
                registered: self.validator_ids(),
            })
    }

    /// Returns every registered id in sorted order.
    pub fn validator_ids(&self) -> Vec<String> {
        self.validators.keys().cloned().collect()
    }
}
