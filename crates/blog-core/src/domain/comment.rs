use serde::{Deserialize, Serialize};

/// Moderation state of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum CommentStatus {
    Pending = 1,
    Approved = 2,
}

impl CommentStatus {
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for CommentStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommentStatus::Pending),
            2 => Ok(CommentStatus::Approved),
            other => Err(other),
        }
    }
}

/// Comment entity - a reader's reply to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i32>,
    pub content: String,
    pub status: CommentStatus,
    pub create_time: Option<i64>,
    pub author: String,
    pub email: String,
    pub url: Option<String>,
    pub post_id: Option<i32>,
}

impl Comment {
    /// Create an unsaved, pending comment not yet attached to a post.
    pub fn new(author: String, email: String, content: String) -> Self {
        Self {
            id: None,
            content,
            status: CommentStatus::Pending,
            create_time: None,
            author,
            email,
            url: None,
            post_id: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == CommentStatus::Approved
    }
}
