// src/post.rs
//! Front matter parsing and payload assembly
//!
//! Pure data merges — no network or file access. Explicit overrides
//! always beat values parsed from a file.

use serde::Serialize;

use crate::error::{QuillError, Result};

/// Payload for creating a post. Slug, title, and author are required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostPayload {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Payload for updating a post. Every field is optional; absent fields
/// are left untouched by the service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UpdatePayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.featured_image.is_none()
            && self.tags.is_none()
    }
}

/// Structured header values parsed from a post file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A post file split into front matter and body
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub front: FrontMatter,
    pub content: String,
}

/// Explicit command-line overrides; these take precedence over
/// front-matter values
#[derive(Debug, Clone, Default)]
pub struct PostOverrides {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Split `input` into front matter and content.
///
/// Front matter is a leading `---` delimited block of `key: value`
/// lines; `tags` is comma-separated. A delimiter block containing no
/// key-value lines is treated as absent: the entire input becomes
/// content with no front matter.
pub fn parse_document(input: &str) -> Document {
    let whole = || Document {
        front: FrontMatter::default(),
        content: input.to_string(),
    };

    let Some(after_open) = input
        .strip_prefix("---\n")
        .or_else(|| input.strip_prefix("---\r\n"))
    else {
        return whole();
    };
    let Some(close) = after_open.find("\n---") else {
        return whole();
    };

    let header = &after_open[..close];
    let mut content = &after_open[close + "\n---".len()..];
    content = content
        .strip_prefix("\r\n")
        .or_else(|| content.strip_prefix('\n'))
        .unwrap_or(content);

    let mut front = FrontMatter::default();
    let mut parsed_any = false;
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        parsed_any = true;
        match key.trim() {
            "title" => front.title = Some(value.to_string()),
            "slug" => front.slug = Some(value.to_string()),
            "author" => front.author = Some(value.to_string()),
            "excerpt" => front.excerpt = Some(value.to_string()),
            "featured_image" => front.featured_image = Some(value.to_string()),
            "tags" => {
                front.tags = Some(
                    value
                        .split(',')
                        .map(|tag| tag.trim().to_string())
                        .filter(|tag| !tag.is_empty())
                        .collect(),
                )
            }
            // Unknown keys still count as front matter, just unused
            _ => {}
        }
    }

    if !parsed_any {
        return whole();
    }

    Document {
        front,
        content: content.to_string(),
    }
}

/// Merge front matter and overrides into a create payload.
///
/// Every missing required field is reported together, not just the
/// first one found.
pub fn assemble_create(doc: &Document, overrides: &PostOverrides) -> Result<PostPayload> {
    let slug = overrides.slug.clone().or_else(|| doc.front.slug.clone());
    let title = overrides.title.clone().or_else(|| doc.front.title.clone());
    let author = overrides
        .author
        .clone()
        .or_else(|| doc.front.author.clone());

    let mut missing = Vec::new();
    if slug.as_deref().unwrap_or("").is_empty() {
        missing.push("slug".to_string());
    }
    if title.as_deref().unwrap_or("").is_empty() {
        missing.push("title".to_string());
    }
    if author.as_deref().unwrap_or("").is_empty() {
        missing.push("author".to_string());
    }
    if !missing.is_empty() {
        return Err(QuillError::Validation(missing));
    }

    Ok(PostPayload {
        slug: slug.unwrap_or_default(),
        title: title.unwrap_or_default(),
        author: author.unwrap_or_default(),
        content: doc.content.clone(),
        excerpt: overrides
            .excerpt
            .clone()
            .or_else(|| doc.front.excerpt.clone()),
        featured_image: overrides
            .featured_image
            .clone()
            .or_else(|| doc.front.featured_image.clone()),
        tags: overrides
            .tags
            .clone()
            .or_else(|| doc.front.tags.clone())
            .unwrap_or_default(),
    })
}

/// Merge an optional input file and overrides into an update payload.
///
/// Fails with `NoUpdatesProvided` when the merge produces no field and
/// no content change.
pub fn assemble_update(doc: Option<&Document>, overrides: &PostOverrides) -> Result<UpdatePayload> {
    let front = doc.map(|d| d.front.clone()).unwrap_or_default();
    let payload = UpdatePayload {
        title: overrides.title.clone().or(front.title),
        author: overrides.author.clone().or(front.author),
        content: doc.map(|d| d.content.clone()),
        excerpt: overrides.excerpt.clone().or(front.excerpt),
        featured_image: overrides.featured_image.clone().or(front.featured_image),
        tags: overrides.tags.clone().or(front.tags),
    };
    if payload.is_empty() {
        return Err(QuillError::NoUpdatesProvided);
    }
    Ok(payload)
}
