//! Request types for HTTP handlers.

mod departments;
mod imports;
mod institution_users;
mod institutions;
mod paginations;
mod paths;
mod roles;
mod vacations;
mod validations;

pub use departments::*;
pub use imports::*;
pub use institution_users::*;
pub use institutions::*;
pub use paginations::*;
pub use paths::*;
pub use roles::*;
pub use vacations::*;
pub use validations::*;
