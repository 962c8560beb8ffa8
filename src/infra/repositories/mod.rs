//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod member_repository;
mod refresh_token_repository;

pub use member_repository::{MemberRepository, MemberStore};
pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenStore};

#[cfg(test)]
pub use member_repository::MockMemberRepository;
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
