//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod member;
pub mod refresh_token;
