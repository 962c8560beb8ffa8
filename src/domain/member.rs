//! Member domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::AppError;

/// Member authority (single-valued role)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Authority {
    #[default]
    #[serde(rename = "ROLE_USER")]
    RoleUser,
    #[serde(rename = "ROLE_ADMIN")]
    RoleAdmin,
}

impl Authority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::RoleUser => ROLE_USER,
            Authority::RoleAdmin => ROLE_ADMIN,
        }
    }
}

impl FromStr for Authority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Authority::RoleUser),
            ROLE_ADMIN => Ok(Authority::RoleAdmin),
            other => Err(AppError::validation(format!("Unknown authority: {}", other))),
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member domain entity.
///
/// The name is the identity: unique, case-sensitive and never changed
/// after signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub authority: Authority,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member with the default authority
    pub fn new(name: String, password_hash: String) -> Self {
        Self {
            name,
            password: password_hash,
            authority: Authority::default(),
            created_at: Utc::now(),
        }
    }
}
