//! Tag data access layer

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::Tag;
use crate::utils::error::{AppError, AppResult};

use super::classify_write_error;
use super::connection::Database;

/// Map a `name, category, description` row to a Tag
fn row_to_tag(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        name: row.get("name")?,
        category: row.get("category")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
    })
}

pub(crate) fn tag_exists_in(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM tag WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
}

impl Database {
    // ==================== Tag CRUD ====================

    /// Create a tag. Name, category and description are all required.
    pub fn add_tag(&self, tag: &Tag) -> AppResult<()> {
        let missing = tag.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "tag {:?} is missing {}",
                tag.name,
                missing.join(", ")
            )));
        }

        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO tag (name, category, description) VALUES (?1, ?2, ?3)",
            params![tag.name, tag.category, tag.description],
        )
        .map_err(|e| classify_write_error(e, &format!("tag {}", tag.name)))?;

        tracing::info!("added tag {}", tag.name);
        Ok(())
    }

    /// Whether a tag exists.
    ///
    /// Storage failures are logged and reported as `false`; use
    /// [`Database::try_tag_exists`] to tell the two apart.
    pub fn tag_exists(&self, name: &str) -> bool {
        self.try_tag_exists(name).unwrap_or_else(|e| {
            tracing::warn!("tag existence check for {} failed: {}", name, e);
            false
        })
    }

    /// Whether a tag exists, propagating storage failures
    pub fn try_tag_exists(&self, name: &str) -> AppResult<bool> {
        let conn = self.connection()?;
        Ok(tag_exists_in(&conn, name)?)
    }

    /// Look a tag up by name
    pub fn fetch_tag(&self, name: &str) -> AppResult<Tag> {
        let conn = self.connection()?;

        conn.query_row(
            "SELECT name, category, description FROM tag WHERE name = ?1",
            params![name],
            row_to_tag,
        )
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("tag {}", name)))
    }

    /// Every tag, ordered by name
    pub fn fetch_all_tags(&self) -> AppResult<Vec<Tag>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare("SELECT name, category, description FROM tag ORDER BY name")?;
        let tags = stmt
            .query_map([], row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Delete a tag; its post links go with it
    pub fn delete_tag(&self, name: &str) -> AppResult<()> {
        let conn = self.connection()?;
        let rows = conn.execute("DELETE FROM tag WHERE name = ?1", params![name])?;
        if rows == 0 {
            return Err(AppError::NotFound(format!("tag {}", name)));
        }

        tracing::info!("deleted tag {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        db
    }

    #[test]
    fn test_add_and_fetch_tag() {
        let db = test_db();

        let tag = Tag::with_category("go", "lang", "Go posts");
        db.add_tag(&tag).unwrap();

        assert!(db.tag_exists("go"));
        assert_eq!(db.fetch_tag("go").unwrap(), tag);
    }

    #[test]
    fn test_add_tag_requires_every_field() {
        let db = test_db();

        for tag in [
            Tag::with_category("", "lang", "d"),
            Tag::with_category("go", "", "d"),
            Tag::with_category("go", "lang", ""),
        ] {
            let err = db.add_tag(&tag).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
        }
        assert!(!db.tag_exists("go"));
    }

    #[test]
    fn test_duplicate_tag_conflicts() {
        let db = test_db();

        db.add_tag(&Tag::new("photos", "Photo posts")).unwrap();
        let err = db.add_tag(&Tag::new("photos", "again")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[test]
    fn test_fetch_missing_tag() {
        let db = test_db();
        let err = db.fetch_tag("nope").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_null_description_reads_as_empty() {
        let db = test_db();
        {
            let conn = db.connection().unwrap();
            conn.execute("INSERT INTO tag (name) VALUES ('legacy')", []).unwrap();
        }

        let tag = db.fetch_tag("legacy").unwrap();
        assert_eq!(tag.category, "content");
        assert_eq!(tag.description, "");
    }

    #[test]
    fn test_fetch_all_tags_sorted() {
        let db = test_db();
        db.add_tag(&Tag::new("rust", "Rust posts")).unwrap();
        db.add_tag(&Tag::with_category("film", "medium", "Film photos")).unwrap();

        let names: Vec<String> = db.fetch_all_tags().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["film", "rust"]);
    }

    #[test]
    fn test_delete_tag() {
        let db = test_db();
        db.add_tag(&Tag::new("go", "Go posts")).unwrap();

        db.delete_tag("go").unwrap();
        assert!(!db.tag_exists("go"));

        let err = db.delete_tag("go").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_exists_soft_fails_without_schema() {
        let db = Database::open_in_memory().unwrap();

        assert!(!db.tag_exists("go"));
        assert!(matches!(db.try_tag_exists("go"), Err(AppError::Storage(_))));
    }
}
