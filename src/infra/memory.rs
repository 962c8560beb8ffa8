//! In-memory storage backend.
//!
//! Used by `serve --in-memory` for local runs and by the test suites.
//! Each map sits behind its own lock; a write lock is held only for the
//! duration of a single check-and-write, so unrelated members never wait
//! on each other for longer than that.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repositories::{MemberRepository, RefreshTokenRepository};
use super::unit_of_work::UnitOfWork;
use crate::domain::{Member, RefreshToken};
use crate::errors::{AppError, AppResult};

/// Members keyed by name
#[derive(Default)]
pub struct InMemoryMemberStore {
    members: RwLock<HashMap<String, Member>>,
}

#[async_trait]
impl MemberRepository for InMemoryMemberStore {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.members.read().await.contains_key(name))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Member>> {
        Ok(self.members.read().await.get(name).cloned())
    }

    async fn save(&self, member: Member) -> AppResult<Member> {
        let mut members = self.members.write().await;
        if members.contains_key(&member.name) {
            return Err(AppError::duplicate(member.name));
        }

        members.insert(member.name.clone(), member.clone());
        Ok(member)
    }
}

/// Refresh token values keyed by member name
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenStore {
    async fn save(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        self.tokens
            .write()
            .await
            .insert(token.key().to_string(), token.value().to_string());
        Ok(token)
    }

    async fn find_by_key(&self, key: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self
            .tokens
            .read()
            .await
            .get(key)
            .map(|value| RefreshToken::new(key, value.clone())))
    }

    async fn update_value(&self, token: &mut RefreshToken, value: String) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token.key()) {
            Some(stored) if stored.as_str() == token.value() => {
                *stored = value.clone();
            }
            _ => return Err(AppError::TokenMismatch),
        }
        drop(tokens);

        token.update_value(value);
        Ok(())
    }
}

/// [`UnitOfWork`] over the in-memory stores
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    member_repo: Arc<InMemoryMemberStore>,
    refresh_token_repo: Arc<InMemoryRefreshTokenStore>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitOfWork for InMemoryPersistence {
    fn members(&self) -> Arc<dyn MemberRepository> {
        self.member_repo.clone()
    }

    fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository> {
        self.refresh_token_repo.clone()
    }
}
