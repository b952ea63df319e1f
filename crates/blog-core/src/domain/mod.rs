//! Domain entities - the core business objects.

mod comment;
mod post;
mod route;
mod search;
pub mod tag;
mod user;

pub use comment::{Comment, CommentStatus};
pub use post::{Post, PostStatus, Scenario, TITLE_MAX_LENGTH};
pub use route::{Route, TagLink};
pub use search::{DEFAULT_PAGE_SIZE, Page, PageRequest, PostCriteria};
pub use tag::{Tag, TagDelta};
pub use user::User;
