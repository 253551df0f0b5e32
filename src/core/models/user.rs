use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::tokener::Payload;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub username: String,
    pub password: String,
    pub salt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub sub: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.sub
    }
}
