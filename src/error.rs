use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::{serde_json, Json},
    Request,
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset behind a game is empty or too small to build a question.
    #[error("{0}")]
    DataUnavailable(String),
    /// The request is missing required fields or carries malformed ones.
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> Status {
        match self {
            Self::DataUnavailable(_) => Status::NotFound,
            Self::BadRequest(_) => Status::BadRequest,
            Self::Io(_) | Self::Json(_) => Status::InternalServerError,
        }
    }
}

/// Body sent alongside any error status.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        // Internal details stay in the log, not in the response.
        let error = if status == Status::InternalServerError {
            log::error!("{self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error })).respond_to(req)
    }
}
