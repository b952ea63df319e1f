//! Wiring - builds a [`PostService`] on top of the configured backends.

use std::sync::Arc;

use blog_core::PostService;
use blog_core::ports::{CommentStore, PostRepository, TagFrequencyIndex, UserRepository};

use crate::clock::SystemClock;
use crate::config::BlogConfig;
use crate::database::DatabaseConnections;
use crate::memory::{
    InMemoryCommentStore, InMemoryPostRepository, InMemoryTagIndex, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use crate::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

/// The post service plus the configuration its callers need.
#[derive(Clone)]
pub struct BlogContext {
    pub posts: PostService,
    pub tags: Arc<dyn TagFrequencyIndex>,
    pub config: Arc<BlogConfig>,
    pub db: Option<Arc<DatabaseConnections>>,
}

struct Backends {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentStore>,
    tags: Arc<dyn TagFrequencyIndex>,
    users: Arc<dyn UserRepository>,
}

impl Backends {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentStore::new()),
            tags: Arc::new(InMemoryTagIndex::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(conn: &DatabaseConnections) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.main.clone())),
            tags: Arc::new(PostgresTagRepository::new(conn.main.clone())),
            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
        }
    }
}

impl BlogContext {
    /// Build the context with appropriate implementations.
    ///
    /// Falls back to in-memory storage when no database is configured or it
    /// cannot be reached.
    pub async fn new(config: BlogConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, backends) = match config.database.as_ref() {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let backends = Backends::postgres(&connections);
                    (Some(Arc::new(connections)), backends)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Backends::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Backends::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, backends) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (None, Backends::in_memory())
        };

        tracing::info!("Blog context initialized");
        Self::from_parts(config, db, backends)
    }

    /// Context backed only by in-memory storage.
    pub fn in_memory(config: BlogConfig) -> Self {
        Self::from_parts(config, None, Backends::in_memory())
    }

    fn from_parts(
        config: BlogConfig,
        db: Option<Arc<DatabaseConnections>>,
        backends: Backends,
    ) -> Self {
        let posts = PostService::new(
            backends.posts,
            backends.comments,
            backends.tags.clone(),
            backends.users,
            Arc::new(SystemClock),
        );

        Self {
            posts,
            tags: backends.tags,
            config: Arc::new(config),
            db,
        }
    }
}
