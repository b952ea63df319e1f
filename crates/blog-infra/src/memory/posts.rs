use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{Page, PageRequest, Post, PostCriteria};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct PostTable {
    rows: BTreeMap<i32, Post>,
    last_id: i32,
}

/// In-memory post table with auto-incrementing ids.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn matches(post: &Post, criteria: &PostCriteria) -> bool {
        fn exact<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            wanted.is_none() || wanted == actual
        }
        fn partial(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().is_none_or(|w| actual.contains(w))
        }

        exact(criteria.id, post.id)
            && partial(&criteria.title, &post.title)
            && partial(&criteria.content, &post.content)
            && partial(&criteria.tags, &post.tags)
            && exact(criteria.status, post.status)
            && exact(criteria.create_time, post.create_time)
            && exact(criteria.update_time, post.update_time)
            && exact(criteria.author_id, post.author_id)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;

        let id = match post.id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(_) => return Err(RepoError::NotFound),
            None => {
                table.last_id += 1;
                table.last_id
            }
        };
        post.id = Some(id);
        table.rows.insert(id, post.clone());

        Ok(post)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn search(
        &self,
        criteria: &PostCriteria,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let table = self.table.read().await;

        let mut matching: Vec<&Post> = table
            .rows
            .values()
            .filter(|post| Self::matches(post, criteria))
            .collect();
        matching.sort_by(|a, b| b.update_time.cmp(&a.update_time).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use blog_core::domain::PostStatus;

    use super::*;

    fn post(title: &str, updated: i64) -> Post {
        let mut post = Post::new(
            title.to_string(),
            "body".to_string(),
            String::new(),
            PostStatus::Published,
        );
        post.update_time = Some(updated);
        post
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let repo = InMemoryPostRepository::new();
        let first = repo.save(post("one", 1)).await.unwrap();
        let second = repo.save(post("two", 2)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_of_missing_row_fails() {
        let repo = InMemoryPostRepository::new();
        let mut ghost = post("ghost", 1);
        ghost.id = Some(99);

        assert!(matches!(repo.save(ghost).await, Err(RepoError::NotFound)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_search_partial_match_and_order() {
        let repo = InMemoryPostRepository::new();
        repo.save(post("Learning Rust", 10)).await.unwrap();
        repo.save(post("Rusty tools", 30)).await.unwrap();
        repo.save(post("Go notes", 20)).await.unwrap();

        let criteria = PostCriteria {
            title: Some("Rust".to_string()),
            ..PostCriteria::default()
        };
        let page = repo.search(&criteria, PageRequest::default()).await.unwrap();

        assert_eq!(page.total, 2);
        let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Rusty tools", "Learning Rust"]);
    }

    #[tokio::test]
    async fn test_search_paginates() {
        let repo = InMemoryPostRepository::new();
        for i in 0..5 {
            repo.save(post(&format!("post {i}"), i)).await.unwrap();
        }

        let page = repo
            .search(&PostCriteria::default(), PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["post 2", "post 1"]);
    }
}
