use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("code does not exist")]
    CodeNotFound,

    #[error("this code has already been used")]
    CodeAlreadyUsed,

    #[error("this code has expired")]
    CodeExpired,

    #[error("you have already voted")]
    AlreadyVoted,

    #[error("you must vote in all categories ({valid} of {expected} valid selections)")]
    IncompleteBallot { expected: usize, valid: usize },

    #[error("there are no categories to vote in")]
    EmptyCatalog,

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("business error: {0}")]
    BusinessError(String),

    #[error("could not find a free code after {0} attempts")]
    CodeSpaceExhausted(u32),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("server error: {0}")]
    ServerError(String),
}

impl Error {
    fn kind(&self) -> &'static str {
        match self {
            Error::CodeNotFound => "NotFound",
            Error::CodeAlreadyUsed => "AlreadyUsed",
            Error::CodeExpired => "Expired",
            Error::AlreadyVoted => "AlreadyVoted",
            Error::IncompleteBallot { .. } => "IncompleteBallot",
            Error::EmptyCatalog => "EmptyCatalog",
            Error::Unauthenticated => "Unauthenticated",
            Error::InvalidCredentials => "InvalidCredentials",
            Error::NotFound(_) => "NotFound",
            Error::BusinessError(_) => "BadRequest",
            Error::CodeSpaceExhausted(_) => "CodeSpaceExhausted",
            _ => "Internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::CodeNotFound | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::CodeAlreadyUsed | Error::AlreadyVoted => StatusCode::CONFLICT,
            Error::CodeExpired => StatusCode::GONE,
            Error::IncompleteBallot { .. } | Error::EmptyCatalog => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Unauthenticated => StatusCode::SEE_OTHER,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::BusinessError(_) => StatusCode::BAD_REQUEST,
            Error::CodeSpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        let mut builder = HttpResponse::build(status);
        if let Error::Unauthenticated = self {
            builder.insert_header((header::LOCATION, LOGIN_PATH));
        }
        builder.json(ErrorBody { error: self.kind(), message })
    }
}
