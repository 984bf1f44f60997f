//! Generated OpenAPI document and the Scalar reference UI.
//!
//! [`aide`] collects the document from the `api_route` registrations and
//! their `*_docs` transforms when the router is finished.

use std::sync::Arc;

use aide::axum::ApiRouter;
use aide::openapi::{Info, OpenApi, Tag};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where the document and the UI are served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct OpenApiConfig {
    #[cfg_attr(
        feature = "config",
        arg(long = "openapi-json-path", env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    #[cfg_attr(
        feature = "config",
        arg(long = "openapi-scalar-path", env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

impl OpenApiConfig {
    pub fn validate(&self) -> Result<()> {
        let relative = [&self.open_api_json, &self.scalar_ui]
            .into_iter()
            .find(|path| !path.starts_with('/'));
        if let Some(path) = relative {
            return Err(Error::config(format!("OpenAPI path '{path}' must start with '/'")));
        }

        if self.open_api_json == self.scalar_ui {
            return Err(Error::config("OpenAPI document and Scalar UI need different paths"));
        }

        Ok(())
    }
}

const TAGS: [(&str, &str); 8] = [
    ("Monitors", "Service health"),
    ("Privileges", "The fixed privilege catalog"),
    ("Institutions", "Institutions and their settings"),
    ("Departments", "Departments of an institution"),
    ("Roles", "Roles and the privileges they grant"),
    ("Institution users", "Staff memberships and their lifecycle"),
    ("Staff import", "CSV import and export of staff"),
    ("Vacations", "Institution and personal vacations"),
];

fn document() -> OpenApi {
    OpenApi {
        info: Info {
            title: "Authorization API".to_owned(),
            summary: Some("Institutions, staff, roles and vacations".to_owned()),
            description: Some(
                "Manages institutions with their departments and roles, staff memberships \
                 through their lifecycle, and institution and personal vacations. \
                 Requests carry Keycloak access tokens."
                    .to_owned(),
            ),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Info::default()
        },
        tags: TAGS
            .iter()
            .map(|(name, description)| Tag {
                name: (*name).to_owned(),
                description: Some((*description).to_owned()),
                ..Tag::default()
            })
            .collect(),
        ..OpenApi::default()
    }
}

async fn openapi_json(Extension(api): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(OpenApi::clone(&api))
}

/// Finishes an [`ApiRouter`] into a [`Router`] that serves its own document.
pub trait RouterOpenApiExt<S> {
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        let mut api = document();
        let router = self
            .route(&config.open_api_json, get(openapi_json))
            .route(&config.scalar_ui, Scalar::new(&config.open_api_json).axum_route())
            .finish_api(&mut api);

        router.layer(Extension(Arc::new(api)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_validation() {
        assert!(OpenApiConfig::default().validate().is_ok());

        let relative = OpenApiConfig {
            open_api_json: "api.json".to_owned(),
            ..Default::default()
        };
        assert!(relative.validate().is_err());

        let shared = OpenApiConfig {
            scalar_ui: "/api/openapi.json".to_owned(),
            ..Default::default()
        };
        assert!(shared.validate().is_err());
    }

    #[test]
    fn document_lists_every_tag() {
        let api = document();
        assert_eq!(api.tags.len(), TAGS.len());
        assert_eq!(api.info.version, env!("CARGO_PKG_VERSION"));
    }
}
