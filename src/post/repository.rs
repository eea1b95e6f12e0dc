//! Handle database requests for posts.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::post::{FeedPost, Post, PostAuthor};

#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    author_id: String,
    author_name: String,
}

impl From<FeedRow> for FeedPost {
    fn from(row: FeedRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            created_at: row.created_at,
            author: PostAuthor {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

impl PostRepository {
    /// Create a new [`PostRepository`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert [`Post`] into database.
    pub async fn insert(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO posts (id, author_id, content, created_at)
                VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a post using the `id` field.
    pub async fn find_by_id(&self, post_id: &str) -> Result<Option<Post>> {
        let post =
            sqlx::query_as::<_, Post>(r#"SELECT * FROM posts WHERE id = $1"#)
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(post)
    }

    /// Delete a post. Ownership must be checked by the caller beforehand.
    pub async fn delete(&self, post_id: &str) -> Result<()> {
        sqlx::query(r#"DELETE FROM posts WHERE id = $1"#)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All posts, newest first, with author names resolved. The rowid
    /// tiebreaker keeps the order stable for equal timestamps.
    pub async fn feed(&self) -> Result<Vec<FeedPost>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"SELECT
                p.id,
                p.content,
                p.created_at,
                u.id AS author_id,
                u.name AS author_name
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC, p.rowid DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedPost::from).collect())
    }

    /// Posts authored by one user, newest first.
    pub async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"SELECT * FROM posts WHERE author_id = $1
                ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
