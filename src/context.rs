use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::Error;

/// The authenticated administrator of the current request, set by the session middleware.
/// Extracting it from a request without a valid session fails with `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Self>().copied().ok_or(Error::Unauthenticated))
    }
}
