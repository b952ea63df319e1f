//! Tags and the free-text tag string stored on a post.
//!
//! A post keeps its tags as one delimited string (`"rust, web, orm"`). The
//! helpers here are the only place that string is tokenized, so the post
//! model and every [`TagFrequencyIndex`](crate::ports::TagFrequencyIndex)
//! implementation agree on what a tag is.

use std::collections::HashSet;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("tag separator pattern is valid"));

/// Separator used when writing a tag list back into its string form.
pub const TAG_DELIMITER: &str = ", ";

/// Tag entity - one row of the tag frequency index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub frequency: i32,
}

/// Split a tag string on commas and/or whitespace, dropping empty tokens.
pub fn string_to_tags(tags: &str) -> Vec<String> {
    TAG_SEPARATOR
        .split(tags.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join tags into the canonical delimited form.
pub fn tags_to_string<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(TAG_DELIMITER)
}

/// Canonical form of a tag string: each distinct token once, first occurrence wins.
pub fn normalize_tags(tags: &str) -> String {
    let unique: Vec<String> = string_to_tags(tags).into_iter().unique().collect();
    tags_to_string(&unique)
}

/// Tags added and removed between two tag strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl TagDelta {
    pub fn between(old: &str, new: &str) -> Self {
        let old: Vec<String> = string_to_tags(old).into_iter().unique().collect();
        let new: Vec<String> = string_to_tags(new).into_iter().unique().collect();

        let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
        let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

        Self {
            added: new
                .iter()
                .filter(|t| !old_set.contains(t.as_str()))
                .cloned()
                .collect(),
            removed: old
                .iter()
                .filter(|t| !new_set.contains(t.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
