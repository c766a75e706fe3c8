//! The single error type returned by every `/api` handler.
//!
//! Each variant maps to one HTTP status and is rendered as `{"error": "..."}`.
//! Datastore and spreadsheet failures are logged with their full detail but
//! reach the client only as a short, generic message.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use common::responses::{ErrorBody, SavedTable};
use log::{error, warn};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// A unique value is already taken or a name is still referenced.
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(rusqlite::Error),
    #[error("spreadsheet error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
    #[error("{0}")]
    Internal(String),
    /// A batch save failed after some tables were already written.
    #[error("{cause} ({} tables saved before the failure)", .saved.len())]
    PartialSave {
        saved: Vec<SavedTable>,
        cause: Box<ApiError>,
    },
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                ApiError::Conflict("a record with the same unique value already exists".to_string())
            }
            _ => ApiError::Database(err),
        }
    }
}

impl ApiError {
    /// Wraps `cause` so the response still reports the tables in `saved`.
    pub fn partial(saved: Vec<SavedTable>, cause: ApiError) -> Self {
        if saved.is_empty() {
            cause
        } else {
            ApiError::PartialSave {
                saved,
                cause: Box::new(cause),
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::PartialSave { cause, .. } => cause.public_message(),
            ApiError::Database(_) => "the datastore could not complete the request".to_string(),
            ApiError::Export(_) => "the spreadsheet could not be generated".to_string(),
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Export(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::PartialSave { cause, .. } => cause.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("request rejected ({}): {}", status.as_u16(), self);
        }
        let mut body = ErrorBody::new(self.public_message());
        if let ApiError::PartialSave { saved, .. } = self {
            body.saved = saved.clone();
        }
        HttpResponse::build(status).json(body)
    }
}

/// Turns unparseable JSON bodies into the usual `400 {"error"}` response.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("malformed request body: {}", err)).into()
}

/// Same for query strings such as `?id=abc`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("malformed query string: {}", err)).into()
}
