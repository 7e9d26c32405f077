//! Extractor configs turning malformed requests into 422 responses with an
//! [`ErrorMessage`] body.

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};

use orgdir_model::ErrorMessage;

fn unprocessable<E>(err: E, req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    log::debug!("{} {} rejected: {}", req.method(), req.path(), err);
    let response = HttpResponse::UnprocessableEntity().json(ErrorMessage::new(&err));
    InternalError::from_response(err, response).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req| unprocessable(err, req))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req| unprocessable(err, req))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req| unprocessable(err, req))
}
