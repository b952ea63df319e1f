//! Links from domain objects to the pages that display them.
//!
//! Rendering (and HTML-escaping the label) is the caller's job; this module
//! only knows which page a link points at and how to spell its URL.

use serde::Serialize;
use url::form_urlencoded;

/// A page of the blog, addressed by its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// Post listing filtered by one tag.
    PostIndex { tag: String },
    /// A single post.
    PostView { id: i32, title: String },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::PostIndex { .. } => "post/index",
            Route::PostView { .. } => "post/view",
        }
    }

    /// Render the route as a URL below `base` (may be empty for site-relative URLs).
    pub fn to_url(&self, base: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self {
            Route::PostIndex { tag } => {
                query.append_pair("tag", tag);
            }
            Route::PostView { id, title } => {
                query.append_pair("id", &id.to_string());
                query.append_pair("title", title);
            }
        }

        format!(
            "{}/{}?{}",
            base.trim_end_matches('/'),
            self.path(),
            query.finish()
        )
    }
}

/// One tag of a post, pointing at the listing of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagLink {
    /// Raw tag text. Escape before rendering.
    pub label: String,
    pub route: Route,
}
