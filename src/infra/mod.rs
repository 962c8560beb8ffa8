//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Member and refresh token repositories
//! - In-memory backend
//! - Unit of Work for centralized repository access

pub mod db;
pub mod memory;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use memory::{InMemoryMemberStore, InMemoryPersistence, InMemoryRefreshTokenStore};
pub use repositories::{MemberRepository, MemberStore, RefreshTokenRepository, RefreshTokenStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(test)]
pub use repositories::{MockMemberRepository, MockRefreshTokenRepository};
