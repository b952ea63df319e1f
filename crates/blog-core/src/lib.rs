//! # Blog Core
//!
//! The domain layer of the blog: posts, their comments and the tag index.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldError, RepoError, ValidationErrors};
pub use services::PostService;
