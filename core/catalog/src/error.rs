use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use orgdir_model::ErrorMessage;

use crate::db::DbError;
use crate::tree::TreeError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Error::Db(e.into())
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Db(e.into())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Db(e.into())
    }
}

impl From<TreeError> for Error {
    fn from(e: TreeError) -> Self {
        match e {
            TreeError::ParentNotFound(_) => Error::NotFound("Parent activity not found".into()),
            TreeError::MaxDepthExceeded { .. } => Error::BadRequest(e.to_string()),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Db(e) => {
                log::error!("Catalog storage failure: {}", e);
                HttpResponse::InternalServerError().json(ErrorMessage::new("Internal server error"))
            }
            e => HttpResponse::build(e.status_code()).json(ErrorMessage::new(e)),
        }
    }
}
