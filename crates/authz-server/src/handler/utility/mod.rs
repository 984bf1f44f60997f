//! [`CustomRoutes`] for extending the API router.

mod custom_routes;

pub use custom_routes::{CustomRoutes, RouterMapFn};
