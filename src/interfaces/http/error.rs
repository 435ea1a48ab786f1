use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::error::{AppError, ErrorKind};

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<&'a str>>,
}

impl<'a> From<&'a AppError> for ErrorBody<'a> {
    fn from(err: &'a AppError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
            missing: err
                .missing_columns()
                .map(|cols| cols.iter().map(String::as_str).collect()),
        }
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        err if err.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, kind = ?self.kind(), "Request failed");
        } else {
            warn!(error = %self, kind = ?self.kind(), "Request rejected");
        }
        HttpResponse::build(status).json(ErrorBody::from(self))
    }
}
