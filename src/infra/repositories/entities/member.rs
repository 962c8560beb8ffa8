//! Member database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Authority, Member};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub password: String,
    pub authority: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Member {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let authority = model.authority.parse::<Authority>().map_err(|_| {
            AppError::internal(format!(
                "Member {} has unknown authority {}",
                model.name, model.authority
            ))
        })?;

        Ok(Member {
            name: model.name,
            password: model.password,
            authority,
            created_at: model.created_at,
        })
    }
}
