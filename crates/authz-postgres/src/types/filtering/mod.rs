//! Filtering options for database queries.

mod institution_users;

pub use institution_users::InstitutionUserFilter;
