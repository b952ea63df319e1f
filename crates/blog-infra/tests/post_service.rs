//! Post lifecycle against the in-memory backends.

use std::sync::Arc;

use async_trait::async_trait;

use blog_core::domain::{Comment, CommentStatus, PageRequest, Post, PostStatus, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentStore, PostRepository, TagFrequencyIndex};
use blog_core::{DomainError, PostService};
use blog_infra::{
    BlogConfig, BlogContext, InMemoryCommentStore, InMemoryPostRepository, InMemoryTagIndex,
    InMemoryUserRepository, ManualClock,
};

const START: i64 = 1_700_000_000;
const AUTHOR: i32 = 7;

struct Harness {
    service: PostService,
    posts: Arc<InMemoryPostRepository>,
    comments: Arc<InMemoryCommentStore>,
    tags: Arc<InMemoryTagIndex>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let posts = Arc::new(InMemoryPostRepository::new());
    let comments = Arc::new(InMemoryCommentStore::new());
    let tags = Arc::new(InMemoryTagIndex::new());
    let users = Arc::new(InMemoryUserRepository::with_users([User {
        id: AUTHOR,
        username: "demo".to_string(),
        email: "demo@example.com".to_string(),
    }]));
    let clock = Arc::new(ManualClock::at(START));

    let service = PostService::new(
        posts.clone(),
        comments.clone(),
        tags.clone(),
        users,
        clock.clone(),
    );

    Harness {
        service,
        posts,
        comments,
        tags,
        clock,
    }
}

fn draft(tags: &str) -> Post {
    Post::new(
        "Hello".to_string(),
        "First post".to_string(),
        tags.to_string(),
        PostStatus::Published,
    )
}

fn comment(text: &str) -> Comment {
    Comment::new(
        "reader".to_string(),
        "reader@example.com".to_string(),
        text.to_string(),
    )
}

async fn frequency(index: &InMemoryTagIndex, tag: &str) -> Option<i32> {
    index.frequency(tag).await.unwrap()
}

#[tokio::test]
async fn test_new_post_is_stamped() {
    let h = harness();
    let mut post = draft("rust");

    h.service.save(&mut post, AUTHOR).await.unwrap();

    assert_eq!(post.id, Some(1));
    assert_eq!(post.create_time, Some(START));
    assert_eq!(post.update_time, Some(START));
    assert_eq!(post.author_id, Some(AUTHOR));
    assert_eq!(post.old_tags(), "rust");
}

#[tokio::test]
async fn test_update_keeps_create_time_and_author() {
    let h = harness();
    let mut post = draft("rust");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    h.clock.advance(90);
    post.title = "Hello again".to_string();
    h.service.save(&mut post, 99).await.unwrap();

    assert_eq!(post.create_time, Some(START));
    assert_eq!(post.update_time, Some(START + 90));
    assert_eq!(post.author_id, Some(AUTHOR));

    let stored = h.service.load(1).await.unwrap().unwrap();
    assert_eq!(stored.title, "Hello again");
    assert_eq!(stored.update_time, Some(START + 90));
}

#[tokio::test]
async fn test_update_ignores_author_and_create_time_set_by_caller() {
    let h = harness();
    let mut post = draft("rust");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    h.clock.advance(30);
    let mut loaded = h.service.load(1).await.unwrap().unwrap();
    loaded.author_id = Some(99);
    loaded.create_time = Some(START + 5_000);
    h.service.save(&mut loaded, 99).await.unwrap();

    assert_eq!(loaded.author_id, Some(AUTHOR));
    assert_eq!(loaded.create_time, Some(START));
    assert_eq!(loaded.update_time, Some(START + 30));

    let stored = h.posts.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.author_id, Some(AUTHOR));
    assert_eq!(stored.create_time, Some(START));
    assert!(stored.create_time <= stored.update_time);
}

#[tokio::test]
async fn test_update_of_deleted_post_is_not_found() {
    let h = harness();
    let mut post = draft("rust");
    h.service.save(&mut post, AUTHOR).await.unwrap();
    h.posts.delete(1).await.unwrap();

    let err = h.service.save(&mut post, AUTHOR).await.unwrap_err();

    assert!(matches!(err, DomainError::Repository(RepoError::NotFound)));
    assert!(h.posts.is_empty().await);
    assert_eq!(frequency(&h.tags, "rust").await, Some(1));
}

#[tokio::test]
async fn test_invalid_status_is_not_written() {
    let h = harness();
    let mut post = draft("rust");
    post.status = Some(4);

    let err = h.service.save(&mut post, AUTHOR).await.unwrap_err();

    match err {
        DomainError::Validation(errors) => {
            assert_eq!(
                errors.for_field("status").collect::<Vec<_>>(),
                vec!["Status is not in the list."]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(h.posts.is_empty().await);
    assert_eq!(frequency(&h.tags, "rust").await, None);
    assert!(post.is_new_record());
    assert!(post.create_time.is_none());
}

#[tokio::test]
async fn test_save_normalizes_tags_and_indexes_them() {
    let h = harness();
    let mut post = draft("a, b ,a,c");

    h.service.save(&mut post, AUTHOR).await.unwrap();

    assert_eq!(post.tag_list(), vec!["a", "b", "c"]);
    for tag in ["a", "b", "c"] {
        assert_eq!(frequency(&h.tags, tag).await, Some(1));
    }
}

#[tokio::test]
async fn test_tag_change_applies_only_the_delta() {
    let h = harness();
    // Another post already uses "a" and "b".
    h.tags.update_frequency("", "a, b").await.unwrap();

    let mut post = draft("a,b");
    h.service.save(&mut post, AUTHOR).await.unwrap();
    assert_eq!(frequency(&h.tags, "a").await, Some(2));
    assert_eq!(frequency(&h.tags, "b").await, Some(2));

    let mut loaded = h.service.load(post.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(loaded.old_tags(), "a, b");
    loaded.tags = "b,c".to_string();
    h.service.save(&mut loaded, AUTHOR).await.unwrap();

    assert_eq!(frequency(&h.tags, "a").await, Some(1));
    assert_eq!(frequency(&h.tags, "b").await, Some(2));
    assert_eq!(frequency(&h.tags, "c").await, Some(1));
}

#[tokio::test]
async fn test_saving_twice_does_not_double_count() {
    let h = harness();
    let mut post = draft("rust");

    h.service.save(&mut post, AUTHOR).await.unwrap();
    h.service.save(&mut post, AUTHOR).await.unwrap();

    assert_eq!(frequency(&h.tags, "rust").await, Some(1));
}

#[tokio::test]
async fn test_delete_removes_comments_and_tag_counts() {
    let h = harness();
    h.tags.update_frequency("", "x").await.unwrap();

    let mut post = draft("x,y");
    h.service.save(&mut post, AUTHOR).await.unwrap();
    h.service.add_comment(&post, comment("one"), false).await.unwrap();
    h.service.add_comment(&post, comment("two"), true).await.unwrap();
    let post_id = post.id.unwrap();
    assert_eq!(h.comments.all_for_post(post_id).await.len(), 2);

    h.service.delete(&post).await.unwrap();

    assert!(h.service.load(post_id).await.unwrap().is_none());
    assert!(h.comments.all_for_post(post_id).await.is_empty());
    assert_eq!(frequency(&h.tags, "x").await, Some(1));
    assert_eq!(frequency(&h.tags, "y").await, None);
}

#[tokio::test]
async fn test_delete_new_post_is_refused() {
    let h = harness();
    let err = h.service.delete(&draft("x")).await.unwrap_err();
    assert!(matches!(err, DomainError::NewRecord("post")));
}

#[tokio::test]
async fn test_add_comment_respects_approval_flag() {
    let h = harness();
    let mut post = draft("");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    let pending = h.service.add_comment(&post, comment("hold"), true).await.unwrap();
    let approved = h.service.add_comment(&post, comment("go"), false).await.unwrap();

    assert_eq!(pending.status, CommentStatus::Pending);
    assert_eq!(approved.status, CommentStatus::Approved);
    assert_eq!(pending.post_id, post.id);
    assert_eq!(approved.post_id, post.id);
    assert_eq!(approved.create_time, Some(START));
}

#[tokio::test]
async fn test_comments_relation_only_shows_approved_newest_first() {
    let h = harness();
    let mut post = draft("");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    h.service.add_comment(&post, comment("old"), false).await.unwrap();
    h.clock.advance(10);
    h.service.add_comment(&post, comment("hidden"), true).await.unwrap();
    h.clock.advance(10);
    h.service.add_comment(&post, comment("new"), false).await.unwrap();

    let comments = h.service.find_approved_comments(&post).await.unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();

    assert_eq!(texts, vec!["new", "old"]);
    assert!(comments.iter().all(Comment::is_approved));
    assert_eq!(h.service.count_approved_comments(&post).await.unwrap(), 2);
}

#[tokio::test]
async fn test_relations_of_new_post_are_empty() {
    let h = harness();
    let post = draft("");

    assert!(h.service.find_author(&post).await.unwrap().is_none());
    assert!(h.service.find_approved_comments(&post).await.unwrap().is_empty());
    assert_eq!(h.service.count_approved_comments(&post).await.unwrap(), 0);
    assert!(h.service.add_comment(&post, comment("x"), false).await.is_err());
}

#[tokio::test]
async fn test_find_author() {
    let h = harness();
    let mut post = draft("");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    let author = h.service.find_author(&post).await.unwrap().unwrap();
    assert_eq!(author.username, "demo");
}

#[tokio::test]
async fn test_search_by_partial_title_and_exact_status() {
    let h = harness();
    for (title, status) in [
        ("Rust ownership", PostStatus::Published),
        ("Rust drafts", PostStatus::Draft),
        ("Go channels", PostStatus::Published),
    ] {
        let mut post = Post::new(title.to_string(), "body".to_string(), String::new(), status);
        h.service.save(&mut post, AUTHOR).await.unwrap();
    }

    let mut filter = Post::default();
    filter.title = "Rust".to_string();
    filter.status = Some(PostStatus::Published.as_i16());

    let page = h.service.search(&filter, PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Rust ownership");
    assert_eq!(page.items[0].old_tags(), "");
}

#[tokio::test]
async fn test_search_rejects_out_of_range_status() {
    let h = harness();
    let mut filter = Post::default();
    filter.status = Some(12);

    let err = h.service.search(&filter, PageRequest::default()).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

/// Post repository whose writes always fail.
struct BrokenPosts;

#[async_trait]
impl BaseRepository<Post, i32> for BrokenPosts {
    async fn find_by_id(&self, _id: i32) -> Result<Option<Post>, RepoError> {
        Ok(None)
    }

    async fn save(&self, _post: Post) -> Result<Post, RepoError> {
        Err(RepoError::Connection("database is down".to_string()))
    }

    async fn delete(&self, _id: i32) -> Result<(), RepoError> {
        Err(RepoError::Connection("database is down".to_string()))
    }
}

#[async_trait]
impl PostRepository for BrokenPosts {
    async fn search(
        &self,
        _criteria: &blog_core::domain::PostCriteria,
        _page: PageRequest,
    ) -> Result<blog_core::domain::Page<Post>, RepoError> {
        Err(RepoError::Connection("database is down".to_string()))
    }
}

#[tokio::test]
async fn test_failed_write_leaves_record_and_index_untouched() {
    let tags = Arc::new(InMemoryTagIndex::new());
    let comments = Arc::new(InMemoryCommentStore::new());
    let service = PostService::new(
        Arc::new(BrokenPosts),
        comments.clone(),
        tags.clone(),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(ManualClock::at(START)),
    );

    let mut post = draft("rust");
    let err = service.save(&mut post, AUTHOR).await.unwrap_err();

    assert!(matches!(err, DomainError::Repository(RepoError::Connection(_))));
    assert!(post.is_new_record());
    assert!(post.create_time.is_none());
    assert!(post.author_id.is_none());
    assert_eq!(tags.frequency("rust").await.unwrap(), None);

    let mut saved = draft("rust");
    saved.id = Some(3);
    let mut kept = comment("kept");
    kept.post_id = Some(3);
    comments.save(kept).await.unwrap();

    assert!(service.delete(&saved).await.is_err());
    assert_eq!(comments.all_for_post(3).await.len(), 1);
}

#[tokio::test]
async fn test_in_memory_context_wires_a_working_service() {
    let ctx = BlogContext::in_memory(BlogConfig::default());
    let mut post = draft("rust, web");

    ctx.posts.save(&mut post, AUTHOR).await.unwrap();
    let stored = ctx.posts.load(post.id.unwrap()).await.unwrap().unwrap();

    assert_eq!(stored.tags, "rust, web");
    assert_eq!(ctx.tags.popular(10).await.unwrap().len(), 2);
    assert!(ctx.config.comment_need_approval);
    assert!(
        stored
            .url()
            .unwrap()
            .to_url(&ctx.config.site_base_url)
            .starts_with("/post/view?id=1")
    );
}

/// Tag index that rejects every update.
struct BrokenTags;

#[async_trait]
impl TagFrequencyIndex for BrokenTags {
    async fn update_frequency(&self, _old: &str, _new: &str) -> Result<(), RepoError> {
        Err(RepoError::Query("tag table is locked".to_string()))
    }

    async fn frequency(&self, _name: &str) -> Result<Option<i32>, RepoError> {
        Ok(None)
    }

    async fn popular(&self, _limit: u64) -> Result<Vec<blog_core::domain::Tag>, RepoError> {
        Ok(Vec::new())
    }
}

fn service_with_broken_tags(
    posts: Arc<InMemoryPostRepository>,
    clock: Arc<ManualClock>,
) -> PostService {
    PostService::new(
        posts,
        Arc::new(InMemoryCommentStore::new()),
        Arc::new(BrokenTags),
        Arc::new(InMemoryUserRepository::new()),
        clock,
    )
}

#[tokio::test]
async fn test_failed_tag_update_undoes_insert() {
    let posts = Arc::new(InMemoryPostRepository::new());
    let service = service_with_broken_tags(posts.clone(), Arc::new(ManualClock::at(START)));

    let mut post = draft("rust");
    let err = service.save(&mut post, AUTHOR).await.unwrap_err();

    assert!(matches!(err, DomainError::Repository(RepoError::Query(_))));
    assert!(posts.is_empty().await);
    assert!(post.is_new_record());
    assert!(post.create_time.is_none());
}

#[tokio::test]
async fn test_failed_tag_update_restores_previous_row() {
    let h = harness();
    let mut post = draft("rust");
    h.service.save(&mut post, AUTHOR).await.unwrap();

    h.clock.advance(60);
    let service = service_with_broken_tags(h.posts.clone(), h.clock.clone());
    let mut edited = post.clone();
    edited.title = "Rewritten".to_string();
    edited.tags = "go".to_string();

    assert!(service.save(&mut edited, AUTHOR).await.is_err());

    let stored = h.posts.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.title, "Hello");
    assert_eq!(stored.tags, "rust");
    assert_eq!(stored.update_time, Some(START));
    assert_eq!(edited.update_time, Some(START));
    assert_eq!(edited.old_tags(), "rust");
    assert_eq!(h.posts.len().await, 1);
}
