//! Unit of Work - centralized repository access.
//!
//! Every member flow writes at most once, after all checks and token
//! signing have succeeded, so a flow that fails leaves both stores as it
//! found them. Atomicity of that single write is the store's job: the
//! member insert is guarded by the primary key and rotation is a
//! conditional update.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{MemberRepository, MemberStore, RefreshTokenRepository, RefreshTokenStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get member repository
    fn members(&self) -> Arc<dyn MemberRepository>;

    /// Get refresh token repository
    fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository>;
}

/// Database backed UnitOfWork
pub struct Persistence {
    member_repo: Arc<MemberStore>,
    refresh_token_repo: Arc<RefreshTokenStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            member_repo: Arc::new(MemberStore::new(db.clone())),
            refresh_token_repo: Arc::new(RefreshTokenStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn members(&self) -> Arc<dyn MemberRepository> {
        self.member_repo.clone()
    }

    fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository> {
        self.refresh_token_repo.clone()
    }
}
