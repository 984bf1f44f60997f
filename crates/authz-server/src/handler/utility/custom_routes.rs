//! Extra routes merged into the API router by embedding binaries.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Function that transforms an [`ApiRouter`].
pub type RouterMapFn = fn(ApiRouter<ServiceState>) -> ApiRouter<ServiceState>;

/// Routes and router transforms supplied in addition to the built-in ones.
///
/// ```rust
/// use authz_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new();
/// assert!(custom.is_empty());
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    /// Routes whose handlers authenticate the caller.
    pub private_routes: Option<ApiRouter<ServiceState>>,
    /// Routes reachable without an access token.
    pub public_routes: Option<ApiRouter<ServiceState>>,
    /// Transform applied to all private routes.
    pub map_private: Option<RouterMapFn>,
}

impl CustomRoutes {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds private routes, merging with those already present.
    pub fn add_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = match self.private_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Adds public routes, merging with those already present.
    pub fn add_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = match self.public_routes {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Sets the transform applied to all private routes.
    pub fn with_map_private(mut self, f: RouterMapFn) -> Self {
        self.map_private = Some(f);
        self
    }

    /// Returns true if no routes were added.
    pub fn is_empty(&self) -> bool {
        self.private_routes.is_none() && self.public_routes.is_none()
    }

    pub(crate) fn map_private(&self, routes: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.map_private {
            Some(f) => f(routes),
            None => routes,
        }
    }
}
