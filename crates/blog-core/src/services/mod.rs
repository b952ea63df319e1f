//! Services - orchestrate domain objects and ports.

mod post;

pub use post::PostService;
