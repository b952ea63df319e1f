//! In-memory implementations of the blog ports.
//!
//! Used when no database is configured and as the collaborators in tests.
//! Data is lost on process restart.

mod comments;
mod posts;
mod tags;
mod users;

pub use comments::InMemoryCommentStore;
pub use posts::InMemoryPostRepository;
pub use tags::InMemoryTagIndex;
pub use users::InMemoryUserRepository;
