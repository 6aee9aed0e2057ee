//! Video id extraction and background media URL validation

use crate::{Error, Result};

/// Media categories accepted as display backgrounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm"];
const VIDEO_ID_LEN: usize = 11;

/// Extract a video id from a platform URL or a bare id.
///
/// Accepts `watch?v=`, `youtu.be/` and `/embed/` URL forms as well as the
/// bare 11-character id.
pub fn parse_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    for marker in ["watch?v=", "youtu.be/", "/embed/"] {
        if let Some(pos) = trimmed.find(marker) {
            return take_video_id(&trimmed[pos + marker.len()..]);
        }
    }
    if trimmed.len() == VIDEO_ID_LEN {
        return take_video_id(trimmed);
    }
    None
}

fn take_video_id(text: &str) -> Option<String> {
    let id: String = text
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    (id.len() == VIDEO_ID_LEN).then_some(id)
}

/// Validate a background media URL: https only, known file extension.
///
/// Rejected URLs are surfaced to the operator and never broadcast.
pub fn validate_media_url(url: &str, kind: MediaKind) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidMediaUrl("empty URL".into()));
    }
    if !trimmed.starts_with("https://") {
        return Err(Error::InvalidMediaUrl(format!(
            "only https URLs are allowed: {trimmed}"
        )));
    }
    let lower = trimmed.to_ascii_lowercase();
    let extensions = match kind {
        MediaKind::Image => IMAGE_EXTENSIONS,
        MediaKind::Video => VIDEO_EXTENSIONS,
    };
    if !extensions.iter().any(|ext| lower.contains(ext)) {
        return Err(Error::InvalidMediaUrl(format!(
            "unsupported file format: {trimmed}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_all_url_forms() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ] {
            assert_eq!(parse_video_id(input).as_deref(), Some("dQw4w9WgXcQ"), "{input}");
        }
    }

    #[test]
    fn rejects_non_video_input() {
        assert!(parse_video_id("not a video").is_none());
        assert!(parse_video_id("https://example.com/clip").is_none());
        assert!(parse_video_id("shortid").is_none());
    }

    #[test]
    fn media_urls_must_be_https_with_known_extension() {
        assert!(validate_media_url("https://example.com/bg.jpg", MediaKind::Image).is_ok());
        assert!(validate_media_url("https://example.com/bg.webm", MediaKind::Video).is_ok());
        assert!(validate_media_url("http://example.com/bg.jpg", MediaKind::Image).is_err());
        assert!(validate_media_url("https://example.com/bg.mp4", MediaKind::Image).is_err());
        assert!(validate_media_url("https://example.com/bg.gif", MediaKind::Video).is_err());
        assert!(validate_media_url("", MediaKind::Image).is_err());
    }
}
