// src/images.rs
//! Content-embedded asset uploads
//!
//! Scans post content for local image references, uploads each unique
//! path exactly once, and rewrites the content to point at the
//! returned remote locations. Uploads run strictly one at a time in
//! discovery order; the first validation or upload failure aborts the
//! whole operation so a post never goes out half-rewritten.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::ApiClient;
use crate::config::ImagesConfig;
use crate::consts::DEFAULT_IMAGE_TYPES;
use crate::error::{QuillError, Result};
use crate::post::UpdatePayload;

// Inline markdown image: ![alt](path "optional title")
static MARKDOWN_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"!\[[^\]]*\]\(\s*([^)\s]+)[^)]*\)"#).unwrap());

// Embedded markup image tag: <img src="path">
static HTML_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]*\bsrc\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap());

/// A located local-asset mention inside content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The literal matched span, reproduced verbatim on rewrite
    pub span: String,
    /// The referenced path as written
    pub path: String,
    /// Byte offset of the path within the span, so rewriting touches
    /// only the path and never e.g. an alt text that happens to match
    pub path_offset: usize,
}

impl ImageReference {
    /// The span with its path swapped for `url`
    fn rewritten_span(&self, url: &str) -> String {
        let mut span = String::with_capacity(self.span.len() + url.len());
        span.push_str(&self.span[..self.path_offset]);
        span.push_str(url);
        span.push_str(&self.span[self.path_offset + self.path.len()..]);
        span
    }
}

/// True for references that already live on the network
pub fn is_remote(path: &str) -> bool {
    path.contains("://") || path.starts_with("data:")
}

/// Find every local image reference in `content`, in discovery order.
/// Remote references are ignored.
pub fn scan_image_references(content: &str) -> Vec<ImageReference> {
    let mut refs = Vec::new();
    for caps in MARKDOWN_IMAGE.captures_iter(content) {
        push_local(&mut refs, &caps);
    }
    for caps in HTML_IMAGE.captures_iter(content) {
        push_local(&mut refs, &caps);
    }
    refs
}

fn push_local(refs: &mut Vec<ImageReference>, caps: &regex::Captures<'_>) {
    let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
        return;
    };
    if is_remote(path.as_str()) {
        return;
    }
    refs.push(ImageReference {
        span: whole.as_str().to_string(),
        path: path.as_str().to_string(),
        path_offset: path.start() - whole.start(),
    });
}

/// Size and type limits applied before any asset leaves the machine
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    pub max_bytes: u64,
    pub extensions: Vec<String>,
}

impl ImagePolicy {
    pub fn from_config(config: &ImagesConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
            extensions: config.allowed_types.clone(),
        }
    }

    /// Declared MIME type for `path`, if its extension is allowed.
    ///
    /// An allow-listed extension outside the built-in table still
    /// uploads, as a generic octet stream — the allow-list is the
    /// user's call.
    pub fn mime_for(&self, path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if !self.extensions.iter().any(|allowed| allowed == &ext) {
            return None;
        }
        Some(
            DEFAULT_IMAGE_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
                .unwrap_or("application/octet-stream"),
        )
    }
}

/// Result of a successful upload-and-rewrite pass
#[derive(Debug, Clone)]
pub struct ProcessedContent {
    pub content: String,
    pub featured_image_url: Option<String>,
}

struct ValidatedAsset {
    path: String,
    bytes: Vec<u8>,
    mime: &'static str,
}

/// Upload every unique local asset referenced by `content` (plus a
/// local `featured_image`, which joins the same dedup set) and rewrite
/// the content to the returned URLs.
///
/// All validation completes before the first network call. Any failure
/// is terminal: no partially rewritten content is ever returned.
pub async fn process_images(
    content: &str,
    featured_image: Option<&str>,
    base_path: &Path,
    client: &ApiClient<'_>,
    policy: &ImagePolicy,
) -> Result<ProcessedContent> {
    let refs = scan_image_references(content);

    // Dedup by path, preserving discovery order
    let mut unique: Vec<String> = Vec::new();
    for reference in &refs {
        if !unique.contains(&reference.path) {
            unique.push(reference.path.clone());
        }
    }
    if let Some(featured) = featured_image {
        if !is_remote(featured) && !unique.iter().any(|p| p == featured) {
            unique.push(featured.to_string());
        }
    }

    let mut pending = Vec::with_capacity(unique.len());
    for path in &unique {
        pending.push(validate_asset(path, base_path, policy).await?);
    }

    // Serial uploads, one fresh proof each; the map is written at most
    // once per path
    let mut uploaded: HashMap<String, String> = HashMap::new();
    for asset in pending {
        let url = client.upload_image(asset.bytes, asset.mime).await?;
        tracing::debug!(path = %asset.path, url = %url, "image uploaded");
        uploaded.insert(asset.path, url);
    }

    let mut rewritten = content.to_string();
    for reference in &refs {
        // Tolerate a missing map entry by leaving the span untouched
        if let Some(url) = uploaded.get(&reference.path) {
            rewritten = rewritten.replace(&reference.span, &reference.rewritten_span(url));
        }
    }

    let featured_image_url = match featured_image {
        Some(featured) if !is_remote(featured) => uploaded.get(featured).cloned(),
        Some(featured) => Some(featured.to_string()),
        None => None,
    };

    Ok(ProcessedContent {
        content: rewritten,
        featured_image_url,
    })
}

/// Upload the assets an update payload references and fold the
/// resulting URLs back in.
///
/// Runs whenever the payload carries new content or a local featured
/// image — a featured image alone is still an asset that must be
/// uploaded, never sent to the service as a filesystem path.
pub async fn process_update_assets(
    payload: &mut UpdatePayload,
    base_path: &Path,
    client: &ApiClient<'_>,
    policy: &ImagePolicy,
) -> Result<()> {
    let local_featured = payload
        .featured_image
        .as_deref()
        .is_some_and(|featured| !is_remote(featured));
    if payload.content.is_none() && !local_featured {
        return Ok(());
    }

    let content = payload.content.clone().unwrap_or_default();
    let processed = process_images(
        &content,
        payload.featured_image.as_deref(),
        base_path,
        client,
        policy,
    )
    .await?;
    if payload.content.is_some() {
        payload.content = Some(processed.content);
    }
    if let Some(url) = processed.featured_image_url {
        payload.featured_image = Some(url);
    }
    Ok(())
}

async fn validate_asset(
    path: &str,
    base_path: &Path,
    policy: &ImagePolicy,
) -> Result<ValidatedAsset> {
    let resolved = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base_path.join(path)
    };

    let metadata = tokio::fs::metadata(&resolved)
        .await
        .map_err(|_| QuillError::ImageValidation(format!("{path}: file not found")))?;
    if !metadata.is_file() {
        return Err(QuillError::ImageValidation(format!("{path}: not a file")));
    }
    if metadata.len() > policy.max_bytes {
        return Err(QuillError::ImageValidation(format!(
            "{path}: {} bytes exceeds the {} byte limit",
            metadata.len(),
            policy.max_bytes
        )));
    }
    let mime = policy
        .mime_for(&resolved)
        .ok_or_else(|| QuillError::ImageValidation(format!("{path}: unsupported image type")))?;

    let bytes = tokio::fs::read(&resolved).await?;
    Ok(ValidatedAsset {
        path: path.to_string(),
        bytes,
        mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_markdown_and_html_references() {
        let content = r#"![a](./one.png) text <img src="two.jpg" alt="x"> more"#;
        let refs = scan_image_references(content);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].path, "./one.png");
        assert_eq!(refs[0].span, "![a](./one.png)");
        assert_eq!(refs[1].path, "two.jpg");
    }

    #[test]
    fn scan_skips_remote_and_data_uris() {
        let content =
            "![r](https://cdn.example/pic.png) ![l](./pic.png) ![d](data:image/png;base64,AAAA)";
        let refs = scan_image_references(content);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "./pic.png");
    }

    #[test]
    fn scan_keeps_markdown_title_out_of_path() {
        let refs = scan_image_references(r#"![a](./x.png "caption")"#);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "./x.png");
    }

    #[test]
    fn mime_lookup_respects_allow_list() {
        let policy = ImagePolicy {
            max_bytes: 1024,
            extensions: vec!["png".to_string()],
        };
        assert_eq!(policy.mime_for(Path::new("a.png")), Some("image/png"));
        assert_eq!(policy.mime_for(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(policy.mime_for(Path::new("a.jpg")), None);
        assert_eq!(policy.mime_for(Path::new("noext")), None);
    }

    #[test]
    fn allow_listed_extension_outside_the_table_still_uploads() {
        let policy = ImagePolicy {
            max_bytes: 1024,
            extensions: vec!["bmp".to_string()],
        };
        assert_eq!(
            policy.mime_for(Path::new("a.bmp")),
            Some("application/octet-stream")
        );
        // Not allow-listed stays rejected
        assert_eq!(policy.mime_for(Path::new("a.tiff")), None);
    }

    #[test]
    fn rewrite_targets_only_the_path_within_the_span() {
        let refs = scan_image_references("![x.png](x.png)");
        assert_eq!(refs.len(), 1);
        assert_eq!(
            refs[0].rewritten_span("https://cdn/x.png"),
            "![x.png](https://cdn/x.png)"
        );
    }
}
