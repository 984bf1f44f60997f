//! Institution user lifecycle transitions.
//!
//! Every mutation of a membership passes through [`LifecycleAction::check`]
//! and, where the root role is involved, [`RootRoleGuard::check`] before any
//! row is written.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::InstitutionUserStatus;

/// A mutation that can be applied to an institution user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Schedule or apply a deactivation date.
    Deactivate,
    /// Clear a deactivation date and assign roles.
    Activate,
    /// Archive the membership and drop all roles.
    Archive,
    /// Edit details or role assignments.
    Update,
    /// Soft delete the membership.
    Delete,
}

/// Reasons a lifecycle action is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Archived institution users cannot be modified")]
    Archived,

    #[error("Institution user is already deactivated")]
    AlreadyDeactivated,

    #[error("Institution user is active and has no scheduled deactivation")]
    NotDeactivated,

    #[error("Deactivation date {date} is before today ({today})")]
    DeactivationDateInPast { date: Date, today: Date },

    #[error("At least one role is required to activate an institution user")]
    RolesRequired,

    #[error("The only active holder of the root role cannot be affected by {action}")]
    SoleRootHolder { action: LifecycleAction },
}

impl LifecycleAction {
    /// Checks whether this action is allowed for a membership in `status`.
    ///
    /// `scheduled_deactivation` tells whether an `Active` membership carries a
    /// future deactivation date.
    pub fn check(
        self,
        status: InstitutionUserStatus,
        scheduled_deactivation: bool,
    ) -> Result<(), LifecycleError> {
        use InstitutionUserStatus::{Active, Deactivated};

        match (self, status) {
            (LifecycleAction::Delete, _) => Ok(()),
            (_, status) if status.is_read_only() => Err(LifecycleError::Archived),
            (LifecycleAction::Deactivate, Deactivated) => Err(LifecycleError::AlreadyDeactivated),
            (LifecycleAction::Activate, Active) if !scheduled_deactivation => {
                Err(LifecycleError::NotDeactivated)
            }
            _ => Ok(()),
        }
    }

    /// Returns whether the root-holder guard applies to this action.
    ///
    /// [`LifecycleAction::Update`] and [`LifecycleAction::Activate`] replace
    /// role assignments; the guard applies to them only when the root role is
    /// being removed, which the caller signals to [`RootRoleGuard`].
    #[inline]
    pub fn affects_root_holder(self) -> bool {
        matches!(
            self,
            LifecycleAction::Deactivate | LifecycleAction::Archive | LifecycleAction::Delete
        )
    }

    /// Returns whether this action may replace the role assignments.
    #[inline]
    pub fn replaces_roles(self) -> bool {
        matches!(self, LifecycleAction::Update | LifecycleAction::Activate)
    }
}

/// Returns whether replacing the roles takes the root role away.
///
/// `replacement_has_root` is `None` when the roles are left untouched.
#[inline]
pub fn loses_root_role(holds_root: bool, replacement_has_root: Option<bool>) -> bool {
    holds_root && replacement_has_root == Some(false)
}

/// Ensures an activation assigns at least one role.
pub fn check_activation_roles<T>(role_ids: &[T]) -> Result<(), LifecycleError> {
    if role_ids.is_empty() {
        return Err(LifecycleError::RolesRequired);
    }
    Ok(())
}

/// Ensures a deactivation date is today or later.
pub fn check_deactivation_date(date: Date, today: Date) -> Result<(), LifecycleError> {
    if date < today {
        return Err(LifecycleError::DeactivationDateInPast { date, today });
    }
    Ok(())
}

/// Protects the last lasting holder of an institution's root role.
///
/// A holder is lasting when the membership is neither archived nor deleted
/// and carries no deactivation date, past or scheduled. Holders with a
/// scheduled deactivation do not count, so two scheduled deactivations can
/// never leave the institution without a root holder once both take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootRoleGuard {
    /// Whether the target currently holds the root role.
    pub holds_root: bool,
    /// Whether the target is currently `Active`.
    pub target_active: bool,
    /// Lasting root holders other than the target.
    pub other_root_holders: i64,
}

impl RootRoleGuard {
    /// Creates a new guard from the target's current standing.
    pub fn new(holds_root: bool, target_active: bool, other_root_holders: i64) -> Self {
        Self {
            holds_root,
            target_active,
            other_root_holders,
        }
    }

    /// Returns whether no lasting root holder remains besides the target.
    #[inline]
    pub fn is_sole_holder(&self) -> bool {
        self.holds_root && self.target_active && self.other_root_holders <= 0
    }

    /// Checks `action`; `loses_root` marks a role replacement that drops the
    /// root role (see [`loses_root_role`]).
    pub fn check(&self, action: LifecycleAction, loses_root: bool) -> Result<(), LifecycleError> {
        let guarded = action.affects_root_holder() || (action.replaces_roles() && loses_root);

        if guarded && self.is_sole_holder() {
            return Err(LifecycleError::SoleRootHolder { action });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::types::InstitutionUserStatus::{Active, Archived, Deactivated};

    #[test]
    fn archived_is_read_only_except_delete() {
        for action in [
            LifecycleAction::Deactivate,
            LifecycleAction::Activate,
            LifecycleAction::Archive,
            LifecycleAction::Update,
        ] {
            assert_eq!(action.check(Archived, false), Err(LifecycleError::Archived));
        }
        assert!(LifecycleAction::Delete.check(Archived, false).is_ok());
    }

    #[test]
    fn deactivate_requires_active() {
        assert!(LifecycleAction::Deactivate.check(Active, false).is_ok());
        assert!(LifecycleAction::Deactivate.check(Active, true).is_ok());
        assert_eq!(
            LifecycleAction::Deactivate.check(Deactivated, false),
            Err(LifecycleError::AlreadyDeactivated)
        );
    }

    #[test]
    fn activate_requires_deactivation() {
        assert!(LifecycleAction::Activate.check(Deactivated, false).is_ok());
        assert!(LifecycleAction::Activate.check(Active, true).is_ok());
        assert_eq!(
            LifecycleAction::Activate.check(Active, false),
            Err(LifecycleError::NotDeactivated)
        );
    }

    #[test]
    fn archive_and_update_allowed_before_archival() {
        for status in [Active, Deactivated] {
            assert!(LifecycleAction::Archive.check(status, false).is_ok());
            assert!(LifecycleAction::Update.check(status, false).is_ok());
        }
    }

    #[test]
    fn deactivation_date_must_not_be_past() {
        let today = date(2024, 6, 10);
        assert!(check_deactivation_date(today, today).is_ok());
        assert!(check_deactivation_date(date(2024, 6, 11), today).is_ok());
        assert!(matches!(
            check_deactivation_date(date(2024, 6, 9), today),
            Err(LifecycleError::DeactivationDateInPast { .. })
        ));
    }

    #[test]
    fn sole_root_holder_is_protected() {
        let guard = RootRoleGuard::new(true, true, 0);
        for action in [
            LifecycleAction::Deactivate,
            LifecycleAction::Archive,
            LifecycleAction::Delete,
        ] {
            assert_eq!(
                guard.check(action, false),
                Err(LifecycleError::SoleRootHolder { action })
            );
        }
        assert!(guard.check(LifecycleAction::Update, false).is_ok());
        assert!(guard.check(LifecycleAction::Update, true).is_err());
        assert!(guard.check(LifecycleAction::Activate, false).is_ok());
    }

    #[test]
    fn activation_cannot_strip_the_last_root_holder() {
        // Active holder with a scheduled deactivation, reactivated without root.
        let guard = RootRoleGuard::new(true, true, 0);
        let loses_root = loses_root_role(true, Some(false));
        assert_eq!(
            guard.check(LifecycleAction::Activate, loses_root),
            Err(LifecycleError::SoleRootHolder {
                action: LifecycleAction::Activate
            })
        );
        assert!(guard.check(LifecycleAction::Activate, loses_root_role(true, Some(true))).is_ok());

        let shared = RootRoleGuard::new(true, true, 1);
        assert!(shared.check(LifecycleAction::Activate, loses_root).is_ok());
    }

    #[test]
    fn second_scheduled_deactivation_is_refused() {
        // A and B hold root. A is scheduled for tomorrow, so only A counts
        // as a lasting holder when B is deactivated.
        let first = RootRoleGuard::new(true, true, 1);
        assert!(first.check(LifecycleAction::Deactivate, false).is_ok());

        let second = RootRoleGuard::new(true, true, 0);
        assert_eq!(
            second.check(LifecycleAction::Deactivate, false),
            Err(LifecycleError::SoleRootHolder {
                action: LifecycleAction::Deactivate
            })
        );
    }

    #[test]
    fn root_is_lost_only_by_a_replacement_without_it() {
        assert!(loses_root_role(true, Some(false)));
        assert!(!loses_root_role(true, Some(true)));
        assert!(!loses_root_role(true, None));
        assert!(!loses_root_role(false, Some(false)));
        assert!(LifecycleAction::Update.replaces_roles());
        assert!(LifecycleAction::Activate.replaces_roles());
        assert!(!LifecycleAction::Archive.replaces_roles());
    }

    #[test]
    fn activation_needs_a_role() {
        assert_eq!(
            check_activation_roles::<u8>(&[]),
            Err(LifecycleError::RolesRequired)
        );
        assert!(check_activation_roles(&[1]).is_ok());
    }

    #[test]
    fn other_holders_release_the_guard() {
        let guard = RootRoleGuard::new(true, true, 1);
        assert!(guard.check(LifecycleAction::Archive, false).is_ok());

        let not_holder = RootRoleGuard::new(false, true, 0);
        assert!(not_holder.check(LifecycleAction::Delete, false).is_ok());

        let inactive = RootRoleGuard::new(true, false, 0);
        assert!(inactive.check(LifecycleAction::Delete, false).is_ok());
    }
}
