//! The post lifecycle: load, save and delete, plus the post's relations.

use std::sync::Arc;

use crate::domain::{Comment, CommentStatus, Page, PageRequest, Post, Scenario, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    BaseRepository, Clock, CommentStore, PostRepository, TagFrequencyIndex, UserRepository,
};

/// Runs every storage-facing operation on a [`Post`].
///
/// Each operation is an explicit sequence of steps. A save validates, stamps,
/// writes and then reconciles the tag index; the caller's record is only
/// updated once all of that succeeded.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentStore>,
    tags: Arc<dyn TagFrequencyIndex>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentStore>,
        tags: Arc<dyn TagFrequencyIndex>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            users,
            clock,
        }
    }

    /// Load a post by id. A missing post is `Ok(None)`.
    pub async fn load(&self, id: i32) -> Result<Option<Post>, DomainError> {
        tracing::debug!(post_id = id, "Loading post");

        let mut post = self.posts.find_by_id(id).await?;
        if let Some(post) = post.as_mut() {
            post.snapshot_tags();
        }
        Ok(post)
    }

    /// Validate and persist `post` on behalf of `acting_user_id`.
    ///
    /// New posts get both timestamps and their author. Existing posts only
    /// get a fresh `update_time`; their `create_time` and `author_id` are
    /// taken from the stored row, whatever the caller left on `post`.
    ///
    /// The write and the tag index update succeed or fail together: if the
    /// index cannot be updated the write is undone. On any error `post` keeps
    /// its field values (apart from tag normalization done by validation).
    pub async fn save(&self, post: &mut Post, acting_user_id: i32) -> Result<(), DomainError> {
        if let Err(errors) = post.validate(Scenario::Save) {
            tracing::warn!(post_id = ?post.id, %errors, "Post failed validation");
            return Err(errors.into());
        }

        let now = self.clock.timestamp();
        let mut stamped = post.clone();
        let previous = match post.id {
            None => {
                stamped.create_time = Some(now);
                stamped.update_time = Some(now);
                stamped.author_id = Some(acting_user_id);
                None
            }
            Some(id) => {
                let stored = self.posts.find_by_id(id).await?.ok_or(RepoError::NotFound)?;
                stamped.create_time = stored.create_time;
                stamped.author_id = stored.author_id;
                stamped.update_time = Some(now);
                Some(stored)
            }
        };

        let old_tags = post.old_tags().to_owned();
        let mut saved = self.posts.save(stamped).await?;

        if let Err(e) = self.tags.update_frequency(&old_tags, &saved.tags).await {
            tracing::error!(post_id = ?saved.id, error = %e, "Tag index update failed, undoing write");
            self.undo_write(&saved, previous).await;
            return Err(e.into());
        }

        saved.snapshot_tags();
        tracing::debug!(post_id = ?saved.id, "Post saved");
        *post = saved;
        Ok(())
    }

    /// Put the post table back the way it was before a write: drop an
    /// inserted row, or restore the stored row an update replaced.
    async fn undo_write(&self, saved: &Post, previous: Option<Post>) {
        let result = match (previous, saved.id) {
            (Some(previous), _) => self.posts.save(previous).await.map(|_| ()),
            (None, Some(id)) => self.posts.delete(id).await,
            (None, None) => Ok(()),
        };

        if let Err(e) = result {
            tracing::error!(post_id = ?saved.id, error = %e, "Could not undo post write");
        }
    }

    /// Delete a saved post together with its comments and its tag counts.
    pub async fn delete(&self, post: &Post) -> Result<(), DomainError> {
        let id = post.id.ok_or(DomainError::NewRecord("post"))?;

        self.posts.delete(id).await?;
        let removed = self.comments.delete_by_post(id).await?;
        self.tags.update_frequency(&post.tags, "").await?;

        tracing::debug!(post_id = id, comments_removed = removed, "Post deleted");
        Ok(())
    }

    /// The user who wrote the post.
    pub async fn find_author(&self, post: &Post) -> Result<Option<User>, DomainError> {
        match post.author_id {
            Some(author_id) => Ok(self.users.find_by_id(author_id).await?),
            None => Ok(None),
        }
    }

    /// Approved comments, newest first.
    pub async fn find_approved_comments(&self, post: &Post) -> Result<Vec<Comment>, DomainError> {
        match post.id {
            Some(id) => Ok(self.comments.find_approved(id).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn count_approved_comments(&self, post: &Post) -> Result<u64, DomainError> {
        match post.id {
            Some(id) => Ok(self.comments.count_approved(id).await?),
            None => Ok(0),
        }
    }

    /// Attach `comment` to `post` and store it.
    ///
    /// With `require_approval` the comment waits in moderation as pending,
    /// otherwise it is approved straight away.
    pub async fn add_comment(
        &self,
        post: &Post,
        mut comment: Comment,
        require_approval: bool,
    ) -> Result<Comment, DomainError> {
        let post_id = post.id.ok_or(DomainError::NewRecord("post"))?;

        comment.status = if require_approval {
            CommentStatus::Pending
        } else {
            CommentStatus::Approved
        };
        comment.post_id = Some(post_id);
        if comment.create_time.is_none() {
            comment.create_time = Some(self.clock.timestamp());
        }

        let saved = self.comments.save(comment).await?;
        tracing::debug!(post_id, comment_id = ?saved.id, status = ?saved.status, "Comment added");
        Ok(saved)
    }

    /// Posts matching the attributes set on `filter`.
    pub async fn search(&self, filter: &Post, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let mut filter = filter.clone();
        filter.validate(Scenario::Search)?;

        let result = self.posts.search(&filter.search_criteria(), page).await?;
        Ok(result.map(|mut post| {
            post.snapshot_tags();
            post
        }))
    }
}
