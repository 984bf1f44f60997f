use axum::extract::multipart::MultipartRejection;
use axum::extract::{FromRequest, Multipart as AxumMultipart, Request};
use derive_more::{Deref, DerefMut, From};

use crate::handler::{Error, ErrorKind};

/// Multipart form carrying a CSV upload.
#[must_use]
#[derive(Debug, Deref, DerefMut, From)]
pub struct Multipart(pub AxumMultipart);

impl<S> FromRequest<S> for Multipart
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(AxumMultipart::from_request(req, state).await?))
    }
}

impl From<MultipartRejection> for Error<'static> {
    fn from(rejection: MultipartRejection) -> Self {
        let error = ErrorKind::BadRequest.with_context(rejection.body_text());
        match rejection {
            MultipartRejection::InvalidBoundary(_) => error
                .with_message("Send the file as multipart/form-data with a boundary"),
            _ => error.with_message("The multipart body could not be read"),
        }
    }
}

impl aide::OperationInput for Multipart {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumMultipart::operation_input(ctx, operation);
    }
}
