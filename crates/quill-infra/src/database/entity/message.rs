//! Contact message entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::Message;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub sent_at: DateTimeWithTimeZone,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            subject: model.subject,
            content: model.content,
            sent_at: model.sent_at.into(),
            read: model.is_read,
        }
    }
}

impl From<Message> for ActiveModel {
    fn from(message: Message) -> Self {
        Self {
            id: super::id_value(message.id),
            name: Set(message.name),
            email: Set(message.email),
            subject: Set(message.subject),
            content: Set(message.content),
            sent_at: Set(message.sent_at.into()),
            is_read: Set(message.read),
        }
    }
}
