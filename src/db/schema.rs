//! Database schema
//!
//! Every statement is `IF NOT EXISTS`, so the batch can run on every startup.

/// Schema SQL
pub const INIT_SCHEMA: &str = r#"
-- posts
CREATE TABLE IF NOT EXISTS post (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL UNIQUE,
    file_name       TEXT NOT NULL UNIQUE,
    description     TEXT NOT NULL,
    pub_date        TEXT NOT NULL CHECK(pub_date LIKE '____-__-__'),
    update_date     TEXT NOT NULL CHECK(update_date LIKE '____-__-__'),
    thumbnail       TEXT
);

-- tags (category: medium, content, lang)
CREATE TABLE IF NOT EXISTS tag (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    category        TEXT NOT NULL DEFAULT 'content',
    description     TEXT
);

-- post <-> tag
CREATE TABLE IF NOT EXISTS post_tag (
    post_id         INTEGER NOT NULL REFERENCES post(id) ON DELETE CASCADE,
    tag_id          INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    PRIMARY KEY (post_id, tag_id)
);

CREATE INDEX IF NOT EXISTS idx_post_pub_date ON post(pub_date);
CREATE INDEX IF NOT EXISTS idx_post_tag_tag_id ON post_tag(tag_id);
"#;

/// Tables created by [`INIT_SCHEMA`]
pub const TABLES: &[&str] = &["post", "tag", "post_tag"];
