use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::Comment;
use blog_core::error::RepoError;
use blog_core::ports::CommentStore;

#[derive(Default)]
struct CommentTable {
    rows: Vec<Comment>,
    last_id: i32,
}

/// In-memory comment table.
#[derive(Default)]
pub struct InMemoryCommentStore {
    table: RwLock<CommentTable>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every comment of a post regardless of status, in insertion order.
    pub async fn all_for_post(&self, post_id: i32) -> Vec<Comment> {
        self.table
            .read()
            .await
            .rows
            .iter()
            .filter(|c| c.post_id == Some(post_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn delete_by_post(&self, post_id: i32) -> Result<u64, RepoError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|c| c.post_id != Some(post_id));
        Ok((before - table.rows.len()) as u64)
    }

    async fn find_approved(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let mut approved: Vec<Comment> = self
            .all_for_post(post_id)
            .await
            .into_iter()
            .filter(Comment::is_approved)
            .collect();
        approved.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(approved)
    }

    async fn count_approved(&self, post_id: i32) -> Result<u64, RepoError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|c| c.post_id == Some(post_id) && c.is_approved())
            .count() as u64)
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut table = self.table.write().await;

        match comment.id {
            Some(id) => {
                let row = table
                    .rows
                    .iter_mut()
                    .find(|c| c.id == Some(id))
                    .ok_or(RepoError::NotFound)?;
                *row = comment.clone();
            }
            None => {
                table.last_id += 1;
                comment.id = Some(table.last_id);
                table.rows.push(comment.clone());
            }
        }

        Ok(comment)
    }
}
