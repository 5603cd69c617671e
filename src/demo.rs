//! Demonstration ownership domain: staff members, the users they manage and
//! the classes they teach.
//!
//! The relation lookups sit behind [`UserRelations`] so a deployment can back
//! them with a real store; [`DemoRelations`] hard-codes two simple rules:
//! - a staff member owns the user with the same id
//! - staff member `1` owns every class
//!
//! Both validators require *every* target value to be owned and deny when the
//! target produced no values at all.
//!
//! # Example
//!
//! ```
//! use ownership_guard::demo::demo_validators;
//! use ownership_guard::validator::ValidatorRegistry;
//!
//! let registry = ValidatorRegistry::new(demo_validators());
//! assert_eq!(registry.validator_ids(), vec!["staffId-classId", "staffId-userId"]);
//! ```

use std::sync::Arc;

use crate::context::{PrincipalData, TargetParameter};
use crate::validator::{OwnershipValidator, ValidationFault};

/// Relationship lookups used by the demo validators.
pub trait UserRelations: Send + Sync {
    /// Returns `true` if `staff_id` manages `user_id`.
    fn staff_owns_user(&self, staff_id: &str, user_id: &str) -> Result<bool, ValidationFault>;

    /// Returns `true` if `staff_id` teaches `class_id`.
    fn staff_owns_class(&self, staff_id: &str, class_id: &str) -> Result<bool, ValidationFault>;
}

/// In-memory relations for demos and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoRelations;

impl UserRelations for DemoRelations {
    fn staff_owns_user(&self, staff_id: &str, user_id: &str) -> Result<bool, ValidationFault> {
        Ok(staff_id == user_id)
    }

    fn staff_owns_class(&self, staff_id: &str, _class_id: &str) -> Result<bool, ValidationFault> {
        Ok(staff_id == "1")
    }
}

/// `staffId-userId`: every user id must be managed by the staff member.
pub struct StaffUserValidator {
    relations: Arc<dyn UserRelations>,
}

impl StaffUserValidator {
    /// Creates the validator over `relations`.
    pub fn new(relations: Arc<dyn UserRelations>) -> Self {
        Self { relations }
    }
}

impl OwnershipValidator for StaffUserValidator {
    fn validator_id(&self) -> &str {
        "staffId-userId"
    }

    fn validate(
        &self,
        principal: &PrincipalData,
        target: &TargetParameter,
    ) -> Result<bool, ValidationFault> {
        all_owned(principal, target, |staff, user| {
            self.relations.staff_owns_user(staff, user)
        })
    }
}

/// `staffId-classId`: every class id must be taught by the staff member.
pub struct StaffClassValidator {
    relations: Arc<dyn UserRelations>,
}

impl StaffClassValidator {
    /// Creates the validator over `relations`.
    pub fn new(relations: Arc<dyn UserRelations>) -> Self {
        Self { relations }
    }
}

impl OwnershipValidator for StaffClassValidator {
    fn validator_id(&self) -> &str {
        "staffId-classId"
    }

    fn validate(
        &self,
        principal: &PrincipalData,
        target: &TargetParameter,
    ) -> Result<bool, ValidationFault> {
        all_owned(principal, target, |staff, class| {
            self.relations.staff_owns_class(staff, class)
        })
    }
}

fn all_owned(
    principal: &PrincipalData,
    target: &TargetParameter,
    owns: impl Fn(&str, &str) -> Result<bool, ValidationFault>,
) -> Result<bool, ValidationFault> {
    let Some(staff_id) = principal.primary() else {
        return Ok(false);
    };
    if target.values.is_empty() {
        return Ok(false);
    }

    for value in &target.values {
        if !owns(staff_id, value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Both demo validators backed by [`DemoRelations`].
pub fn demo_validators() -> Vec<Arc<dyn OwnershipValidator>> {
    let relations: Arc<dyn UserRelations> = Arc::new(DemoRelations);
    vec![
        Arc::new(StaffUserValidator::new(Arc::clone(&relations))),
        Arc::new(StaffClassValidator::new(relations)),
    ]
}
