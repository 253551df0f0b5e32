use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct VotingCode {
    pub id: i32,
    pub code: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
}

impl VotingCode {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }

    /// Used takes precedence over expired when both hold.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.is_valid(now) {
            true => Ok(()),
            false if self.used => Err(Error::CodeAlreadyUsed),
            false => Err(Error::CodeExpired),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Query {
    pub used_eq: Option<bool>,
    pub code_like: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generate {
    pub count: u32,
    pub expiry_hours: u32,
}

/// Width of the `voting_codes.code` column.
pub const MAX_LENGTH: usize = 16;

/// How codes are minted: token length and how many collisions to tolerate per code.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub length: usize,
    pub max_attempts: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self { length: 5, max_attempts: 16 }
    }
}
