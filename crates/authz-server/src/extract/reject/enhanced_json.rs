use axum::Json as AxumJson;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::clip;
use crate::handler::{Error, ErrorKind};

/// [`axum::Json`] with rejections that tell malformed, mistyped and
/// mislabelled bodies apart.
///
/// Also used for responses so handlers import a single `Json`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AxumJson(value) = AxumJson::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ErrorKind::BadRequest.with_message(format!(
                "The body does not match the expected shape: {}",
                clip(&e.body_text(), 3, 200)
            )),
            JsonRejection::JsonSyntaxError(e) => ErrorKind::BadRequest
                .with_message("The body is not valid JSON")
                .with_context(clip(&e.body_text(), 3, 200)),
            JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
                .with_message("Send the body with 'Content-Type: application/json'"),
            JsonRejection::BytesRejection(e) if e.status().as_u16() == 413 => {
                ErrorKind::PayloadTooLarge.into_error()
            }
            JsonRejection::BytesRejection(e) => ErrorKind::BadRequest
                .with_message("The body could not be read")
                .with_context(clip(&e.body_text(), 3, 200)),
            other => ErrorKind::BadRequest.with_context(other.body_text()),
        }
    }
}

forward_operation_input!(Json => AxumJson);

impl<T> aide::OperationOutput for Json<T>
where
    T: schemars::JsonSchema + Serialize,
{
    type Inner = T;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        AxumJson::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumJson::<T>::inferred_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use axum_test::TestServer;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct NewDepartment {
        name: String,
    }

    async fn echo(Json(body): Json<NewDepartment>) -> String {
        body.name
    }

    #[tokio::test]
    async fn rejections_are_json_errors() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", post(echo)))?;

        let response = server.post("/").text("{\"name\": \"Tõlge\"}").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"].as_str().is_some_and(|m| m.contains("Content-Type")));

        server
            .post("/")
            .json(&serde_json::json!({ "name": 7 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/")
            .json(&serde_json::json!({ "name": "Tõlge" }))
            .await;
        response.assert_status_ok();
        response.assert_text("Tõlge");
        Ok(())
    }
}
