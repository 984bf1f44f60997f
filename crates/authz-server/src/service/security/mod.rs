//! Access token verification keys.

mod auth_keys;

pub use auth_keys::{AuthKeys, AuthKeysConfig};
