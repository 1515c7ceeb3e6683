//! Post data access layer

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::post::{decode_thumbnail, encode_thumbnail};
use crate::models::{Post, Tag};
use crate::utils::error::{AppError, AppResult};

use super::classify_write_error;
use super::connection::Database;
use super::tag_dao::tag_exists_in;

/// Tag whose newest thumbnail is featured by [`Database::fetch_thumbnail`]
pub const PHOTOS_TAG: &str = "photos";

/// Column list read by [`row_to_post`], in order
const POST_COLUMNS: &str =
    "post.id, post.title, post.file_name, post.description, post.pub_date, post.update_date, post.thumbnail";

/// Map a [`POST_COLUMNS`] row to the post id, the post and its raw thumbnail blob.
///
/// Tags and the decoded thumbnail are filled in by the caller when needed.
fn row_to_post(row: &Row<'_>) -> rusqlite::Result<(i64, Post, Option<String>)> {
    let post = Post {
        title: row.get(1)?,
        file_name: row.get(2)?,
        description: row.get(3)?,
        pub_date: row.get(4)?,
        update_date: row.get(5)?,
        tags: Vec::new(),
        thumbnail: None,
    };
    Ok((row.get(0)?, post, row.get(6)?))
}

fn post_exists_in(conn: &Connection, file_name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM post WHERE file_name = ?1",
        params![file_name],
        |row| row.get(0),
    )
}

fn check_post(post: &Post) -> AppResult<()> {
    let missing = post.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "post {:?} is missing {}",
            post.file_name,
            missing.join(", ")
        )))
    }
}

impl Database {
    // ==================== Post CRUD ====================

    /// Insert a post and link it to its tags.
    ///
    /// Every tag must already exist. The post row and all link rows are
    /// written in one transaction, so a failure leaves nothing behind.
    pub fn add_post(&self, post: &Post) -> AppResult<()> {
        check_post(post)?;
        let thumbnail = encode_thumbnail(post.thumbnail.as_ref())?;

        let mut seen = HashSet::new();
        let tag_names: Vec<&str> = post
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect();

        self.transaction(|conn| {
            for name in &tag_names {
                if !tag_exists_in(conn, name)? {
                    return Err(AppError::Reference(name.to_string()));
                }
            }

            conn.execute(
                r#"
                INSERT INTO post (title, file_name, description, pub_date, update_date, thumbnail)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    post.title,
                    post.file_name,
                    post.description,
                    post.pub_date,
                    post.update_date,
                    thumbnail,
                ],
            )
            .map_err(|e| classify_write_error(e, &format!("post {}", post.file_name)))?;

            let mut stmt = conn.prepare(
                r#"
                INSERT INTO post_tag (post_id, tag_id)
                VALUES (
                    (SELECT id FROM post WHERE file_name = ?1),
                    (SELECT id FROM tag WHERE name = ?2)
                )
                "#,
            )?;
            for name in &tag_names {
                stmt.execute(params![post.file_name, name]).map_err(|e| {
                    classify_write_error(e, &format!("link {} -> {}", post.file_name, name))
                })?;
            }

            Ok(())
        })?;

        tracing::info!("added post {} with {} tag(s)", post.file_name, tag_names.len());
        Ok(())
    }

    /// Whether a post exists.
    ///
    /// Storage failures are logged and reported as `false`; use
    /// [`Database::try_post_exists`] to tell the two apart.
    pub fn post_exists(&self, file_name: &str) -> bool {
        self.try_post_exists(file_name).unwrap_or_else(|e| {
            tracing::warn!("post existence check for {} failed: {}", file_name, e);
            false
        })
    }

    /// Whether a post exists, propagating storage failures
    pub fn try_post_exists(&self, file_name: &str) -> AppResult<bool> {
        let conn = self.connection()?;
        Ok(post_exists_in(&conn, file_name)?)
    }

    /// Load a post with its tags (sorted by name) and thumbnail
    pub fn fetch_post(&self, file_name: &str) -> AppResult<Post> {
        let conn = self.connection()?;

        let sql = format!("SELECT {} FROM post WHERE file_name = ?1", POST_COLUMNS);
        let (post_id, mut post, blob) = conn
            .query_row(&sql, params![file_name], row_to_post)
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("post {}", file_name)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT tag.name FROM tag
            INNER JOIN post_tag ON tag.id = post_tag.tag_id
            WHERE post_tag.post_id = ?1
            ORDER BY tag.name
            "#,
        )?;
        post.tags = stmt
            .query_map(params![post_id], |row| row.get::<_, String>(0).map(Tag::reference))?
            .collect::<Result<Vec<_>, _>>()?;

        post.thumbnail = decode_thumbnail(blob.as_deref())?;

        Ok(post)
    }

    /// Newest post tagged `photos` that has a thumbnail
    pub fn fetch_thumbnail(&self) -> AppResult<Post> {
        self.fetch_thumbnail_tagged(PHOTOS_TAG)
    }

    /// Newest post carrying `tag_name` that has a thumbnail.
    ///
    /// The returned post has its thumbnail decoded but no tags.
    pub fn fetch_thumbnail_tagged(&self, tag_name: &str) -> AppResult<Post> {
        let conn = self.connection()?;

        let sql = format!(
            r#"
            SELECT {} FROM post
            INNER JOIN post_tag ON post.id = post_tag.post_id
            INNER JOIN tag ON post_tag.tag_id = tag.id
            WHERE tag.name = ?1
              AND post.thumbnail IS NOT NULL
              AND post.thumbnail <> ''
            ORDER BY post.pub_date DESC, post.id DESC
            LIMIT 1
            "#,
            POST_COLUMNS
        );

        let (_, mut post, blob) = conn
            .query_row(&sql, params![tag_name], row_to_post)
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("no post tagged {} has a thumbnail", tag_name)))?;

        post.thumbnail = decode_thumbnail(blob.as_deref())?;
        Ok(post)
    }

    /// List posts newest first.
    ///
    /// `quantity < 0` returns nothing, `0` returns every match and a positive
    /// value caps the result. An empty `tag_filter` matches every post.
    /// Tags and thumbnails are not loaded.
    pub fn aggregate_posts(&self, quantity: i64, tag_filter: &str) -> AppResult<Vec<Post>> {
        if quantity < 0 {
            return Ok(Vec::new());
        }

        let mut sql = format!("SELECT {} FROM post", POST_COLUMNS);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !tag_filter.is_empty() {
            sql.push_str(
                r#"
                INNER JOIN post_tag ON post.id = post_tag.post_id
                INNER JOIN tag ON post_tag.tag_id = tag.id
                WHERE tag.name = ?"#,
            );
            params_vec.push(Box::new(tag_filter.to_string()));
        }

        sql.push_str(" ORDER BY post.pub_date DESC, post.id DESC");

        if quantity > 0 {
            sql.push_str(" LIMIT ?");
            params_vec.push(Box::new(quantity));
        }

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let posts = stmt
            .query_map(params_refs.as_slice(), |row| row_to_post(row).map(|(_, post, _)| post))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Delete a post; its tag links go with it
    pub fn delete_post(&self, file_name: &str) -> AppResult<()> {
        let conn = self.connection()?;
        let rows = conn.execute("DELETE FROM post WHERE file_name = ?1", params![file_name])?;
        if rows == 0 {
            return Err(AppError::NotFound(format!("post {}", file_name)));
        }

        tracing::info!("deleted post {}", file_name);
        Ok(())
    }
}
