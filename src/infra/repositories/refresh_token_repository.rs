//! Refresh token repository.
//!
//! Holds at most one refresh token per member name. Rotation is a
//! compare-and-swap on the previously loaded value, so of two requests
//! rotating the same token only one can win.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::entities::refresh_token::{self, ActiveModel, Entity as RefreshTokenEntity};
use crate::domain::RefreshToken;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Refresh token repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Upsert the token for its key; last write wins.
    async fn save(&self, token: RefreshToken) -> AppResult<RefreshToken>;

    /// Find the live token for a member name
    async fn find_by_key(&self, key: &str) -> AppResult<Option<RefreshToken>>;

    /// Rotate a loaded record to a new value.
    ///
    /// Fails with `TokenMismatch`, writing nothing, if the stored value is
    /// no longer the one `token` was loaded with.
    async fn update_value(&self, token: &mut RefreshToken, value: String) -> AppResult<()>;
}

/// SeaORM implementation of RefreshTokenRepository
pub struct RefreshTokenStore {
    db: DatabaseConnection,
}

impl RefreshTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenStore {
    async fn save(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        let active_model = ActiveModel {
            key: Set(token.key().to_string()),
            value: Set(token.value().to_string()),
        };

        RefreshTokenEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(refresh_token::Column::Key)
                    .update_column(refresh_token::Column::Value)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(token)
    }

    async fn find_by_key(&self, key: &str) -> AppResult<Option<RefreshToken>> {
        let result = RefreshTokenEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        Ok(result.map(RefreshToken::from))
    }

    async fn update_value(&self, token: &mut RefreshToken, value: String) -> AppResult<()> {
        let result = RefreshTokenEntity::update_many()
            .col_expr(refresh_token::Column::Value, Expr::value(value.clone()))
            .filter(refresh_token::Column::Key.eq(token.key()))
            .filter(refresh_token::Column::Value.eq(token.value()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            tracing::warn!("Refresh token for {} rotated concurrently", token.key());
            return Err(AppError::TokenMismatch);
        }

        token.update_value(value);
        Ok(())
    }
}
