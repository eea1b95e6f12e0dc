mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Post as saved on database. The author is set at creation and never
/// reassigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Owner reference carried by feed entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: String,
    pub name: String,
}

/// Post as returned to callers, with its author resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author: PostAuthor,
}
