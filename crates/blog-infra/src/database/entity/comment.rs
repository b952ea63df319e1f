//! Comment entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};

use blog_core::domain::CommentStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tbl_comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: i16,
    pub create_time: Option<i64>,
    #[sea_orm(column_type = "String(StringLen::N(128))")]
    pub author: String,
    #[sea_orm(column_type = "String(StringLen::N(128))")]
    pub email: String,
    #[sea_orm(column_type = "String(StringLen::N(128))", nullable)]
    pub url: Option<String>,
    pub post_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for blog_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            content: model.content,
            status: CommentStatus::try_from(model.status).unwrap_or(CommentStatus::Pending),
            create_time: model.create_time,
            author: model.author,
            email: model.email,
            url: model.url,
            post_id: Some(model.post_id),
        }
    }
}

/// Conversion from Domain Comment to SeaORM ActiveModel.
impl From<blog_core::domain::Comment> for ActiveModel {
    fn from(comment: blog_core::domain::Comment) -> Self {
        Self {
            id: comment.id.map_or(ActiveValue::NotSet, Set),
            content: Set(comment.content),
            status: Set(comment.status.as_i16()),
            create_time: Set(comment.create_time),
            author: Set(comment.author),
            email: Set(comment.email),
            url: Set(comment.url),
            post_id: comment.post_id.map_or(ActiveValue::NotSet, Set),
        }
    }
}
