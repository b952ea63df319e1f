//! Post entity - the blog's central record.
//!
//! Validation, tag normalization and the derived read helpers live here.
//! Anything that touches storage (stamping, writing, the tag index) is driven
//! by [`PostService`](crate::services::PostService).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::route::{Route, TagLink};
use super::search::PostCriteria;
use super::tag;
use crate::error::ValidationErrors;

/// Maximum title length, in characters.
pub const TITLE_MAX_LENGTH: usize = 128;

/// ASCII word characters, whitespace and commas.
static TAGS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^[\w\s,]+$").expect("tags pattern is valid"));

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum PostStatus {
    Draft = 1,
    Published = 2,
    Archived = 3,
}

impl PostStatus {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
            PostStatus::Archived => "Archived",
        }
    }
}

impl TryFrom<i16> for PostStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PostStatus::Draft),
            2 => Ok(PostStatus::Published),
            3 => Ok(PostStatus::Archived),
            other => Err(other),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which rule set [`Post::validate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Full rules, run before every insert or update.
    #[default]
    Save,
    /// Only `title` and `status`, for a post used as a search filter.
    Search,
}

/// Post entity - represents a blog post.
///
/// `status` holds the raw submitted value so an out-of-range status can be
/// reported as a validation error instead of being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<i32>,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub status: Option<i16>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
    pub author_id: Option<i32>,
    /// Tags as last read from (or written to) storage.
    #[serde(skip)]
    old_tags: String,
}

impl Post {
    /// Create a new, unsaved post.
    pub fn new(title: String, content: String, tags: String, status: PostStatus) -> Self {
        Self {
            title,
            content,
            tags,
            status: Some(status.as_i16()),
            ..Self::default()
        }
    }

    /// Human readable name of an attribute, used in validation messages.
    pub fn attribute_label(field: &str) -> &str {
        match field {
            "id" => "ID",
            "title" => "Title",
            "content" => "Content",
            "tags" => "Tags",
            "status" => "Status",
            "create_time" => "Create Time",
            "update_time" => "Update Time",
            "author_id" => "Author",
            other => other,
        }
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    pub fn post_status(&self) -> Option<PostStatus> {
        self.status.and_then(|s| PostStatus::try_from(s).ok())
    }

    /// The tag string this post had when it was loaded or last saved.
    pub fn old_tags(&self) -> &str {
        &self.old_tags
    }

    /// Remember the current tags as the stored ones.
    ///
    /// Must be called right after the post is populated from storage so the
    /// next save can apply only the tag delta to the frequency index.
    pub fn snapshot_tags(&mut self) {
        self.old_tags = self.tags.clone();
    }

    /// Rewrite `tags` in canonical form with duplicates removed.
    pub fn normalize_tags(&mut self) {
        self.tags = tag::normalize_tags(&self.tags);
    }

    /// The individual tags of this post.
    pub fn tag_list(&self) -> Vec<String> {
        tag::string_to_tags(&self.tags)
    }

    /// Run the rules for `scenario`, collecting every failure.
    ///
    /// In the [`Scenario::Save`] scenario a tag string that passes its pattern
    /// check is normalized in place.
    pub fn validate(&mut self, scenario: Scenario) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if scenario == Scenario::Save {
            self.check_required(&mut errors);
        }
        self.check_title_length(&mut errors);
        self.check_status(&mut errors);

        if scenario == Scenario::Save && !self.tags.is_empty() {
            if TAGS_PATTERN.is_match(&self.tags) {
                self.normalize_tags();
            } else {
                errors.add("tags", "Tags can only contain word characters.");
            }
        }

        errors.into_result()
    }

    fn check_required(&self, errors: &mut ValidationErrors) {
        for (field, blank) in [
            ("title", self.title.trim().is_empty()),
            ("content", self.content.trim().is_empty()),
            ("status", self.status.is_none()),
        ] {
            if blank {
                errors.add(
                    field,
                    format!("{} cannot be blank.", Self::attribute_label(field)),
                );
            }
        }
    }

    fn check_title_length(&self, errors: &mut ValidationErrors) {
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!("Title is too long (maximum is {TITLE_MAX_LENGTH} characters)."),
            );
        }
    }

    fn check_status(&self, errors: &mut ValidationErrors) {
        if self.status.is_some() && self.post_status().is_none() {
            errors.add("status", "Status is not in the list.");
        }
    }

    /// Links to the post listing filtered by each of this post's tags.
    pub fn tag_links(&self) -> Vec<TagLink> {
        self.tag_list()
            .into_iter()
            .map(|tag| TagLink {
                route: Route::PostIndex { tag: tag.clone() },
                label: tag,
            })
            .collect()
    }

    /// Canonical page of this post; `None` until it has been saved.
    pub fn url(&self) -> Option<Route> {
        self.id.map(|id| Route::PostView {
            id,
            title: self.title.clone(),
        })
    }

    /// Filter matching posts like this one, skipping attributes that are not set.
    pub fn search_criteria(&self) -> PostCriteria {
        fn text(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_owned())
        }

        PostCriteria {
            id: self.id,
            title: text(&self.title),
            content: text(&self.content),
            tags: text(&self.tags),
            status: self.status,
            create_time: self.create_time,
            update_time: self.update_time,
            author_id: self.author_id,
        }
    }
}
