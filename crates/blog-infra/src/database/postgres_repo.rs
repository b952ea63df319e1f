//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};

use blog_core::domain::{
    Comment, CommentStatus, Page, PageRequest, Post, PostCriteria, Tag, TagDelta,
};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentStore, PostRepository, TagFrequencyIndex, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment store.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag frequency index.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn search(
        &self,
        criteria: &PostCriteria,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        tracing::debug!(?criteria, page = page.page, "Searching posts");

        let paginator = search_query(criteria).paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(repo_err)?;
        let items = paginator.fetch_page(page.page).await.map_err(repo_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

/// Posts matching `criteria`, newest update first.
pub(crate) fn search_query(criteria: &PostCriteria) -> Select<PostEntity> {
    let mut query = PostEntity::find();
    if let Some(id) = criteria.id {
        query = query.filter(post::Column::Id.eq(id));
    }
    if let Some(title) = &criteria.title {
        query = query.filter(post::Column::Title.like(like_contains(title)));
    }
    if let Some(content) = &criteria.content {
        query = query.filter(post::Column::Content.like(like_contains(content)));
    }
    if let Some(tags) = &criteria.tags {
        query = query.filter(post::Column::Tags.like(like_contains(tags)));
    }
    if let Some(status) = criteria.status {
        query = query.filter(post::Column::Status.eq(status));
    }
    if let Some(create_time) = criteria.create_time {
        query = query.filter(post::Column::CreateTime.eq(create_time));
    }
    if let Some(update_time) = criteria.update_time {
        query = query.filter(post::Column::UpdateTime.eq(update_time));
    }
    if let Some(author_id) = criteria.author_id {
        query = query.filter(post::Column::AuthorId.eq(author_id));
    }

    query
        .order_by_desc(post::Column::UpdateTime)
        .order_by_desc(post::Column::Id)
}

/// `%value%` with the LIKE wildcards in `value` matched literally.
fn like_contains(value: &str) -> LikeExpr {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

#[async_trait]
impl CommentStore for PostgresCommentRepository {
    async fn delete_by_post(&self, post_id: i32) -> Result<u64, RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }

    async fn find_approved(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Status.eq(CommentStatus::Approved.as_i16()))
            .order_by_desc(comment::Column::CreateTime)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_approved(&self, post_id: i32) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Status.eq(CommentStatus::Approved.as_i16()))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        <Self as BaseRepository<Comment, i32>>::save(self, comment).await
    }
}

#[async_trait]
impl TagFrequencyIndex for PostgresTagRepository {
    async fn update_frequency(&self, old_tags: &str, new_tags: &str) -> Result<(), RepoError> {
        let delta = TagDelta::between(old_tags, new_tags);
        if delta.is_empty() {
            return Ok(());
        }
        tracing::debug!(added = ?delta.added, removed = ?delta.removed, "Updating tag frequency");

        // Counts move with `frequency = frequency ± 1` so concurrent saves do not lose updates.
        let txn = self.db.begin().await.map_err(repo_err)?;

        for name in &delta.added {
            let result = TagEntity::update_many()
                .col_expr(
                    tag::Column::Frequency,
                    Expr::col(tag::Column::Frequency).add(1),
                )
                .filter(tag::Column::Name.eq(name.as_str()))
                .exec(&txn)
                .await
                .map_err(repo_err)?;

            if result.rows_affected == 0 {
                tag::ActiveModel {
                    name: Set(name.clone()),
                    frequency: Set(1),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(repo_err)?;
            }
        }

        if !delta.removed.is_empty() {
            TagEntity::update_many()
                .col_expr(
                    tag::Column::Frequency,
                    Expr::col(tag::Column::Frequency).sub(1),
                )
                .filter(tag::Column::Name.is_in(delta.removed.iter().map(String::as_str)))
                .exec(&txn)
                .await
                .map_err(repo_err)?;

            TagEntity::delete_many()
                .filter(tag::Column::Frequency.lte(0))
                .exec(&txn)
                .await
                .map_err(repo_err)?;
        }

        txn.commit().await.map_err(repo_err)
    }

    async fn frequency(&self, name: &str) -> Result<Option<i32>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(|t| t.frequency))
    }

    async fn popular(&self, limit: u64) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_desc(tag::Column::Frequency)
            .order_by_asc(tag::Column::Name)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
