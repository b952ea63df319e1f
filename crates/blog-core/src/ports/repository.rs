use async_trait::async_trait;

use crate::domain::{Comment, Page, PageRequest, Post, PostCriteria, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update). Returns the stored state, including
    /// any key assigned on insert.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository - read side only, used to resolve post authors.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Posts matching `criteria`, most recently updated first.
    async fn search(
        &self,
        criteria: &PostCriteria,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;
}

/// Comment storage as seen from a post.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Delete every comment of a post, whatever its status. Returns the number removed.
    async fn delete_by_post(&self, post_id: i32) -> Result<u64, RepoError>;

    /// Approved comments of a post, newest first.
    async fn find_approved(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    /// Number of approved comments of a post.
    async fn count_approved(&self, post_id: i32) -> Result<u64, RepoError>;

    /// Insert or update a comment.
    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;
}

/// Per-tag usage counts, kept up to date incrementally as posts change.
///
/// Implementations tokenize both strings with
/// [`TagDelta::between`](crate::domain::TagDelta::between) so they agree with
/// the post model on what a tag is. Tags whose count drops to zero are removed.
#[async_trait]
pub trait TagFrequencyIndex: Send + Sync {
    /// Decrement tags only in `old_tags`, increment tags only in `new_tags`.
    /// Unchanged tags are left alone.
    async fn update_frequency(&self, old_tags: &str, new_tags: &str) -> Result<(), RepoError>;

    /// Current count for one tag, `None` if it is not indexed.
    async fn frequency(&self, name: &str) -> Result<Option<i32>, RepoError>;

    /// The most used tags, highest frequency first.
    async fn popular(&self, limit: u64) -> Result<Vec<Tag>, RepoError>;
}
