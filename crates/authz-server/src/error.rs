//! Startup errors.
//!
//! Raised while the service is assembled: reading verification keys,
//! connecting to PostgreSQL and NATS, checking configuration. Failures during
//! a request use [`handler::Error`].
//!
//! [`handler::Error`]: crate::handler::Error

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{Display, IntoStaticStr};

/// Boxed error source.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result of startup operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Category of a startup [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A setting is missing, malformed or out of range.
    Config,
    /// PostgreSQL or NATS refused or dropped the connection.
    External,
    /// A token verification key could not be parsed.
    Auth,
    /// A file could not be read.
    FileSystem,
    /// The service failed to prepare one of its components.
    Internal,
}

/// Startup failure of one component of the service.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error{}: {message}", component_suffix(.component))]
pub struct Error {
    kind: ErrorKind,
    component: Option<&'static str>,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

fn component_suffix(component: &Option<&'static str>) -> String {
    component.map(|c| format!(" in {c}")).unwrap_or_default()
}

impl Error {
    fn new(
        kind: ErrorKind,
        component: Option<&'static str>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            component,
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, None, message)
    }

    /// Failure talking to `component`, e.g. `"postgres"` or `"nats"`.
    pub fn external(component: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::External, Some(component), message)
    }

    pub fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Auth, None, message)
    }

    pub fn file_system(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::FileSystem, None, message)
    }

    pub fn internal(component: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, Some(component), message)
    }

    /// Records the error that caused this one.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub const fn component(&self) -> Option<&'static str> {
        self.component
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<authz_nats::Error> for Error {
    fn from(error: authz_nats::Error) -> Self {
        Self::external("nats", error.to_string()).with_source(error)
    }
}

impl From<authz_postgres::PgError> for Error {
    fn from(error: authz_postgres::PgError) -> Self {
        Self::external("postgres", error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_component() {
        let error = Error::external("postgres", "connection refused");
        assert_eq!(error.kind(), ErrorKind::External);
        assert_eq!(error.component(), Some("postgres"));
        assert_eq!(
            error.to_string(),
            "external error in postgres: connection refused"
        );

        let error = Error::config("JWT secret must be at least 32 bytes long");
        assert_eq!(
            error.to_string(),
            "config error: JWT secret must be at least 32 bytes long"
        );
    }

    #[test]
    fn source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "realm.pem");
        let error = Error::file_system("failed to read realm public key file").with_source(io);

        assert_eq!(error.kind(), ErrorKind::FileSystem);
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn kinds_are_snake_case() {
        let name: &'static str = ErrorKind::FileSystem.into();
        assert_eq!(name, "file_system");
        assert_eq!(ErrorKind::Internal.to_string(), "internal");
    }
}
