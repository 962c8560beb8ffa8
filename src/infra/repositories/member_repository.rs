//! Member repository (credential store).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::entities::member::{self, ActiveModel, Entity as MemberEntity};
use crate::domain::Member;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Member repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Whether a member with this exact name exists
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// Find member by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Member>>;

    /// Insert a new member.
    ///
    /// Fails with `DuplicateIdentity` if the name is already taken.
    async fn save(&self, member: Member) -> AppResult<Member>;
}

/// SeaORM implementation of MemberRepository
pub struct MemberStore {
    db: DatabaseConnection,
}

impl MemberStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let count = MemberEntity::find()
            .filter(member::Column::Name.eq(name))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Member>> {
        MemberEntity::find_by_id(name.to_string())
            .one(&self.db)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    async fn save(&self, member: Member) -> AppResult<Member> {
        let name = member.name.clone();
        let active_model = ActiveModel {
            name: Set(member.name),
            password: Set(member.password),
            authority: Set(member.authority.to_string()),
            created_at: Set(member.created_at),
        };

        // The primary key settles races between concurrent signups
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, &name))?;

        Member::try_from(model)
    }
}
