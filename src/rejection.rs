//! Failure → HTTP response translation.
//!
//! Every handler error passes through [`Rejection`], the one place that
//! decides status codes and error bodies.

use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::store::StoreError;

/// Why a request was not served.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The body could not be read as a JSON object of scalar values.
    #[error("{0}")]
    MalformedBody(String),

    /// The body is not declared as `application/json`.
    #[error("The request content type must be 'application/json'.")]
    UnsupportedMediaType,

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Rejection {
    pub fn status(&self) -> Status {
        match self {
            Self::Store(StoreError::NotFound(_)) => Status::NotFound,
            Self::Store(StoreError::MissingField(_)) => Status::BadRequest,
            Self::MalformedBody(_) => Status::BadRequest,
            Self::UnsupportedMediaType => Status::UnsupportedMediaType,
            Self::Serialize(_) => Status::InternalServerError,
        }
    }
}

/// `{"reason":"<message>"}`, interpolated verbatim.
///
/// The message is not JSON-escaped: an id containing `"` or `\` yields an
/// invalid document. Existing clients match on these exact bytes.
pub fn reason_body(message: &str) -> String {
    format!("{{\"reason\":\"{message}\"}}")
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Serialize(e) = &self {
            error!("failed to serialize response: {e}");
            return Response::status(status);
        }
        Response::builder()
            .status(status)
            .json(reason_body(&self.to_string()))
    }
}
