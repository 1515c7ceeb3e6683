//! Post data model

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

use super::tag::Tag;

/// Thumbnail image descriptor
///
/// Stored as one JSON object in the `post.thumbnail` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(alias = "Src")]
    pub src: String,
    #[serde(alias = "Alt")]
    pub alt: String,
    #[serde(alias = "Title")]
    pub title: String,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            title: title.into(),
        }
    }

    /// An image without a source is treated as no image at all
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }
}

/// Blog post metadata
///
/// Field names in metadata files match the struct case-for-case
/// (`Title`, `FileName`, `PubDate`, ...); lowercase keys are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Post {
    #[serde(alias = "title")]
    pub title: String,
    /// External identifier, doubles as the post's directory name
    #[serde(alias = "filename", alias = "file_name")]
    pub file_name: String,
    #[serde(alias = "description")]
    pub description: String,
    /// `YYYY-MM-DD`
    #[serde(alias = "pubdate", alias = "pub_date")]
    pub pub_date: String,
    /// `YYYY-MM-DD`
    #[serde(alias = "updatedate", alias = "update_date")]
    pub update_date: String,
    #[serde(alias = "tags")]
    pub tags: Vec<Tag>,
    #[serde(alias = "thumbnail", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Image>,
}

impl Post {
    /// Names of every field that is required but empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.file_name.is_empty() {
            missing.push("file_name");
        }
        if self.description.is_empty() {
            missing.push("description");
        }
        if self.pub_date.is_empty() {
            missing.push("pub_date");
        }
        if self.update_date.is_empty() {
            missing.push("update_date");
        }
        if self.tags.is_empty() {
            missing.push("tags");
        }
        missing
    }
}

/// Encode a thumbnail for the `post.thumbnail` column.
///
/// Absent images and images without a `src` are stored as NULL.
pub fn encode_thumbnail(thumbnail: Option<&Image>) -> AppResult<Option<String>> {
    match thumbnail {
        Some(image) if !image.is_empty() => serde_json::to_string(image)
            .map(Some)
            .map_err(|e| AppError::CorruptData(format!("cannot encode thumbnail: {}", e))),
        _ => Ok(None),
    }
}

/// Decode a `post.thumbnail` column value. NULL and empty text both mean no thumbnail.
pub fn decode_thumbnail(blob: Option<&str>) -> AppResult<Option<Image>> {
    match blob {
        Some(text) if !text.is_empty() => serde_json::from_str(text)
            .map(Some)
            .map_err(|e| AppError::CorruptData(format!("cannot decode thumbnail {:?}: {}", text, e))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let post = Post {
            title: "Hi".to_string(),
            ..Default::default()
        };
        assert_eq!(
            post.missing_fields(),
            vec!["file_name", "description", "pub_date", "update_date", "tags"]
        );
    }

    #[test]
    fn test_thumbnail_blob_format() {
        let image = Image::new("pic.jpeg", "cool pic", "hover text");
        let blob = encode_thumbnail(Some(&image)).unwrap().unwrap();
        assert_eq!(blob, r#"{"src":"pic.jpeg","alt":"cool pic","title":"hover text"}"#);
        assert_eq!(decode_thumbnail(Some(&blob)).unwrap(), Some(image));
    }

    #[test]
    fn test_empty_thumbnail_is_absent() {
        let no_src = Image::new("", "alt only", "");
        assert_eq!(encode_thumbnail(Some(&no_src)).unwrap(), None);
        assert_eq!(encode_thumbnail(None).unwrap(), None);
        assert_eq!(decode_thumbnail(None).unwrap(), None);
        assert_eq!(decode_thumbnail(Some("")).unwrap(), None);
    }

    #[test]
    fn test_corrupt_thumbnail() {
        let err = decode_thumbnail(Some("{not json")).unwrap_err();
        assert!(matches!(err, AppError::CorruptData(_)));
    }

    #[test]
    fn test_post_from_yaml_keys() {
        let yaml = r#"
Title: Hi
FileName: hi-post
Description: d
PubDate: "2024-01-01"
UpdateDate: "2024-01-02"
Tags:
  - Name: go
Thumbnail:
  src: pic.jpeg
  alt: a pic
"#;
        let post: Post = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(post.file_name, "hi-post");
        assert_eq!(post.update_date, "2024-01-02");
        assert_eq!(post.tags, vec![Tag::reference("go")]);
        assert_eq!(post.thumbnail, Some(Image::new("pic.jpeg", "a pic", "")));
    }

    #[test]
    fn test_post_from_lowercase_yaml_keys() {
        let yaml = r#"
title: Hi
filename: hi-post
description: d
pubdate: "2024-01-01"
updatedate: "2024-01-01"
tags:
  - name: go
"#;
        let post: Post = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.file_name, "hi-post");
        assert_eq!(post.tags[0].name, "go");
        assert!(post.thumbnail.is_none());
    }
}
