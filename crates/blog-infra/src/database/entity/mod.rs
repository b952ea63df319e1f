//! SeaORM entities for the blog tables.

pub mod comment;
pub mod post;
pub mod tag;
pub mod user;
