//! Database constraint violations organized by table.
//!
//! Constraint names reported by PostgreSQL are parsed into typed enums so the
//! HTTP layer can turn them into precise client errors.

mod departments;
mod institution_user_roles;
mod institution_users;
mod institutions;
mod privilege_roles;
mod roles;
mod users;
mod vacations;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::departments::DepartmentConstraints;
pub use self::institution_user_roles::InstitutionUserRoleConstraints;
pub use self::institution_users::InstitutionUserConstraints;
pub use self::institutions::InstitutionConstraints;
pub use self::privilege_roles::PrivilegeRoleConstraints;
pub use self::roles::RoleConstraints;
pub use self::users::UserConstraints;
pub use self::vacations::VacationConstraints;

/// Unified constraint violation enum that can represent any database constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Institution(InstitutionConstraints),
    User(UserConstraints),
    Department(DepartmentConstraints),
    InstitutionUser(InstitutionUserConstraints),
    InstitutionUserRole(InstitutionUserRoleConstraints),
    Role(RoleConstraints),
    PrivilegeRole(PrivilegeRoleConstraints),
    Vacation(VacationConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (domain rules and references).
    BusinessLogic,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use authz_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("departments_name_unique_idx");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        // Longer table prefixes first: `institution_user_roles` shares a
        // prefix with `institution_users`.
        if constraint.starts_with("institution_user_roles") {
            try_parse!(InstitutionUserRoleConstraints::new => InstitutionUserRole)
        } else if constraint.starts_with("institution_users") {
            try_parse!(InstitutionUserConstraints::new => InstitutionUser)
        } else if constraint.starts_with("institution_") {
            try_parse!(VacationConstraints::new => Vacation)
        } else if constraint.starts_with("institutions") {
            try_parse!(InstitutionConstraints::new => Institution)
        } else if constraint.starts_with("privilege_roles") {
            try_parse!(PrivilegeRoleConstraints::new => PrivilegeRole)
        } else {
            try_parse! {
                UserConstraints::new => User,
                DepartmentConstraints::new => Department,
                RoleConstraints::new => Role,
            }
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Institution(_) => "institutions",
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::Department(_) => "departments",
            ConstraintViolation::InstitutionUser(_) => "institution_users",
            ConstraintViolation::InstitutionUserRole(_) => "institution_user_roles",
            ConstraintViolation::Role(_) => "roles",
            ConstraintViolation::PrivilegeRole(_) => "privilege_roles",
            ConstraintViolation::Vacation(VacationConstraints::InstitutionDateRange) => {
                "institution_vacations"
            }
            ConstraintViolation::Vacation(VacationConstraints::UserDateRange) => {
                "institution_user_vacations"
            }
            ConstraintViolation::Vacation(VacationConstraints::ExclusionUnique) => {
                "institution_vacation_exclusions"
            }
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Institution(c) => c.categorize(),
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::Department(c) => c.categorize(),
            ConstraintViolation::InstitutionUser(c) => c.categorize(),
            ConstraintViolation::InstitutionUserRole(c) => c.categorize(),
            ConstraintViolation::Role(c) => c.categorize(),
            ConstraintViolation::PrivilegeRole(c) => c.categorize(),
            ConstraintViolation::Vacation(c) => c.categorize(),
        }
    }

    /// Returns the underlying constraint name as used in the database.
    #[inline]
    pub fn constraint_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Institution(c) => write!(f, "{}", c),
            ConstraintViolation::User(c) => write!(f, "{}", c),
            ConstraintViolation::Department(c) => write!(f, "{}", c),
            ConstraintViolation::InstitutionUser(c) => write!(f, "{}", c),
            ConstraintViolation::InstitutionUserRole(c) => write!(f, "{}", c),
            ConstraintViolation::Role(c) => write!(f, "{}", c),
            ConstraintViolation::PrivilegeRole(c) => write!(f, "{}", c),
            ConstraintViolation::Vacation(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_constraint_parses_back() {
        let names = InstitutionConstraints::iter()
            .map(|c| c.to_string())
            .chain(UserConstraints::iter().map(|c| c.to_string()))
            .chain(DepartmentConstraints::iter().map(|c| c.to_string()))
            .chain(InstitutionUserConstraints::iter().map(|c| c.to_string()))
            .chain(InstitutionUserRoleConstraints::iter().map(|c| c.to_string()))
            .chain(RoleConstraints::iter().map(|c| c.to_string()))
            .chain(PrivilegeRoleConstraints::iter().map(|c| c.to_string()))
            .chain(VacationConstraints::iter().map(|c| c.to_string()));

        for name in names {
            let violation = ConstraintViolation::new(&name);
            assert_eq!(violation.map(|v| v.constraint_name()), Some(name));
        }
    }

    #[test]
    fn dispatches_to_the_right_table() {
        let violation = ConstraintViolation::new("institution_user_roles_pkey").unwrap();
        assert_eq!(violation.table_name(), "institution_user_roles");

        let violation = ConstraintViolation::new("institution_users_membership_unique_idx").unwrap();
        assert_eq!(violation.table_name(), "institution_users");
        assert_eq!(violation.constraint_category(), ConstraintCategory::Uniqueness);

        let violation = ConstraintViolation::new("institution_user_vacations_date_range").unwrap();
        assert_eq!(violation.table_name(), "institution_user_vacations");
        assert_eq!(violation.constraint_category(), ConstraintCategory::Validation);
    }

    #[test]
    fn serde_uses_constraint_names() {
        let violation = ConstraintViolation::Department(DepartmentConstraints::NameUnique);
        let json = serde_json::to_string(&violation).unwrap();
        assert_eq!(json, "\"departments_name_unique_idx\"");
        let parsed: ConstraintViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, violation);
    }
}
