use actix_web::{http::StatusCode, HttpResponse};
use derive_more::Display;
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, Display)]
pub enum ServerError {
    #[display(fmt = "invalid identifier in field: {}", _0)]
    InvalidIdentifier(&'static str),
    #[display(fmt = "missing field: {}", _0)]
    MissingField(&'static str),
    #[display(fmt = "invalid field: {}", _0)]
    InvalidField(String),
    NotFound,
    Unauthorized,
    StorageFailure,
    BlockingError,
    EnvironmentError,
    JWTError,
    HashError,
}

impl ServerError {
    pub fn message(&self) -> String {
        match self {
            ServerError::InvalidIdentifier("tags") => {
                "The tags array contains an invalid id".to_string()
            }
            ServerError::InvalidIdentifier(field) => format!("The {} is not valid", field),
            ServerError::MissingField(field) => format!("Missing {} in request body", field),
            ServerError::InvalidField(msg) => msg.clone(),
            ServerError::NotFound => "Not Found".to_string(),
            ServerError::Unauthorized => "Unauthorized".to_string(),
            _ => "Internal Server Error".to_string(),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> ServerError {
        match err {
            StoreError::NotFound => ServerError::NotFound,
            StoreError::Conflict => {
                ServerError::InvalidField("The resource already exists".to_string())
            }
            StoreError::InvalidReference(field) => ServerError::InvalidIdentifier(field),
            StoreError::Backend(e) => {
                log::error!("storage failure: {}", e);
                ServerError::StorageFailure
            }
        }
    }
}

impl From<std::env::VarError> for ServerError {
    fn from(_: std::env::VarError) -> ServerError {
        ServerError::EnvironmentError
    }
}

impl From<actix_web::error::BlockingError> for ServerError {
    fn from(_: actix_web::error::BlockingError) -> ServerError {
        ServerError::BlockingError
    }
}

impl From<jsonwebtoken::errors::Error> for ServerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        log::error!("{e}");
        ServerError::JWTError
    }
}

impl From<argon2::password_hash::Error> for ServerError {
    fn from(e: argon2::password_hash::Error) -> ServerError {
        log::error!("password hashing failed: {e}");
        ServerError::HashError
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidIdentifier(_)
            | ServerError::MissingField(_)
            | ServerError::InvalidField(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::StorageFailure
            | ServerError::BlockingError
            | ServerError::EnvironmentError
            | ServerError::JWTError
            | ServerError::HashError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // clients only look at the status here
            ServerError::NotFound => HttpResponse::NotFound().finish(),
            _ => HttpResponse::build(self.status_code()).json(json!({
                "message": self.message(),
            })),
        }
    }
}
