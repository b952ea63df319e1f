//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tbl_post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(128))")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub status: i16,
    pub create_time: i64,
    pub update_time: i64,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blog_core::domain::Post {
    fn from(model: Model) -> Self {
        let mut post = Self::default();
        post.id = Some(model.id);
        post.title = model.title;
        post.content = model.content;
        post.tags = model.tags.unwrap_or_default();
        post.status = Some(model.status);
        post.create_time = Some(model.create_time);
        post.update_time = Some(model.update_time);
        post.author_id = Some(model.author_id);
        post
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
///
/// Unsaved posts leave `id` unset so the database assigns it on insert.
impl From<blog_core::domain::Post> for ActiveModel {
    fn from(post: blog_core::domain::Post) -> Self {
        Self {
            id: post.id.map_or(ActiveValue::NotSet, Set),
            title: Set(post.title),
            content: Set(post.content),
            tags: Set((!post.tags.is_empty()).then_some(post.tags)),
            status: post.status.map_or(ActiveValue::NotSet, Set),
            create_time: post.create_time.map_or(ActiveValue::NotSet, Set),
            update_time: post.update_time.map_or(ActiveValue::NotSet, Set),
            author_id: post.author_id.map_or(ActiveValue::NotSet, Set),
        }
    }
}
