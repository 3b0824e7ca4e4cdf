use actix_web::{HttpResponse, ResponseError};
use failure::Fail;
use log::error;
use plinth_macros::From;
use serde::Serialize;
use std::borrow::Cow;

pub use actix_web::http::StatusCode;
pub use plinth_macros::ApiError;
pub use serde_json::{Value, to_value};

/// JSON object carried in an error's [`ApiError::data`].
pub type Map = serde_json::Map<String, Value>;

/// An error that occurred while handling an API request.
pub trait ApiError: Fail {
    /// HTTP response status code.
    fn status(&self) -> StatusCode;

    /// Internal code describing this error.
    ///
    /// This code is used to identify this error outside the system, and thus
    /// should only be present for errors which are intended to be reported
    /// to the user in detail.
    fn code(&self) -> Option<Cow<str>>;

    /// Additional machine-readable data describing this error.
    fn data(&self) -> Option<Value> {
        None
    }
}

/// This implementation is required to make `#[cause]` on a `Box<dyn ApiError>`
/// work.
impl Fail for Box<dyn ApiError> {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn cause(&self) -> Option<&dyn Fail> {
        (**self).cause()
    }

    fn backtrace(&self) -> Option<&failure::Backtrace> {
        (**self).backtrace()
    }
}

/// A wrapper around many types of errors, including user-facing [`ApiError`]s
/// as well as other errors that should not be reported to the user, such as
/// I/O failures.
#[derive(Debug, Fail, From)]
pub enum Error {
    #[fail(display = "{}", _0)]
    Api(#[cause] Box<dyn ApiError>),
    /// Generic system error.
    #[fail(display = "{}", _0)]
    System(#[cause] #[from] std::io::Error),
    /// Error serializing a response document.
    #[fail(display = "{}", _0)]
    Json(#[cause] #[from] serde_json::Error),
    /// Error reading message payload.
    #[fail(display = "{}", _0)]
    Payload(#[from] actix_web::error::PayloadError),
}

impl<T: ApiError> From<T> for Error {
    fn from(error: T) -> Error {
        Error::Api(Box::new(error))
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Api(err) => match err.code() {
                Some(code) => HttpResponse::build(err.status())
                    .json(ErrorResponse {
                        error: code,
                        raw: err.to_string(),
                        data: err.data(),
                    }),
                None => {
                    error!("{}", err);
                    HttpResponse::new(err.status())
                }
            },
            Error::Payload(e) => e.error_response(),
            _ => {
                error!("{}", self);
                HttpResponse::InternalServerError()
                    .finish()
            }
        }
    }

    fn render_response(&self) -> HttpResponse {
        self.error_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'s> {
    error: Cow<'s, str>,
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}
