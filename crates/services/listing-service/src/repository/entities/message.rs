//! Message database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{ActingRole, Message, ThreadId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Message {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let sender_role = ActingRole::parse(&model.sender_role).ok_or_else(|| {
            AppError::internal(format!(
                "message {} has unknown sender role '{}'",
                model.id, model.sender_role
            ))
        })?;

        Ok(Message {
            id: model.id,
            thread: ThreadId::new(model.listing_id, model.vendor_id),
            sender_id: model.sender_id,
            sender_role,
            content: model.content,
            created_at: model.created_at,
        })
    }
}
