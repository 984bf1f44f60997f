//! [`Error`], [`ErrorKind`] and [`Result`].

mod domain_error;
mod http_error;
mod pg_error;
mod pg_institution;
mod pg_membership;

pub use http_error::{Error, ErrorKind, Result};
