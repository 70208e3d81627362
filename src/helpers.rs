//! Shared utility helpers for presentation-facing formatting and media
//! classification.

use crate::models::FileEntry;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Timestamp format used when rendering modification times.
pub const MODIFIED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Serializes a UTC datetime into the repository-standard display format.
pub fn format_modified(time: &DateTime<Utc>) -> String {
    time.format(MODIFIED_TIME_FORMAT).to_string()
}

/// Human readable size rendering shared across the core and commands.
pub fn format_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut idx = 0usize;
    while value >= 1024.0 && idx < SUFFIXES.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    if idx == 0 {
        format!("{:.0} {}", value, SUFFIXES[idx])
    } else {
        format!("{:.2} {}", value, SUFFIXES[idx])
    }
}

/// Sums the sizes of a slice of entries.
pub fn total_size(entries: &[FileEntry]) -> u64 {
    entries.iter().map(|entry| entry.size).sum()
}

/// Coarse media bucket derived from a file's media type and extension.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MediaKind {
    Image,
    Document,
    Archive,
    Executable,
    Video,
    Audio,
    Other,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Executable => "executable",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Other => "file",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Guesses a MIME-ish media type from a file name. Storage providers use
/// this to populate `FileEntry::media_type`; unknown extensions map to
/// `application/octet-stream`.
pub fn guess_media_type(name: &str) -> &'static str {
    match extension_of(name).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        "doc" | "docx" => "application/msword",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Buckets a file into a coarse media kind for display and preview gating.
pub fn media_kind(media_type: &str, name: &str) -> MediaKind {
    if media_type.starts_with("image/") {
        return MediaKind::Image;
    }
    if media_type.starts_with("video/") {
        return MediaKind::Video;
    }
    if media_type.starts_with("audio/") {
        return MediaKind::Audio;
    }

    match extension_of(name).as_str() {
        "pdf" | "doc" | "docx" | "txt" | "rtf" => MediaKind::Document,
        "zip" | "rar" | "7z" | "tar" | "gz" => MediaKind::Archive,
        "exe" | "dmg" | "app" | "msi" => MediaKind::Executable,
        _ => MediaKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_zero_is_special_cased() {
        assert_eq!(format_size(0), "0 B");
    }

    #[test]
    fn format_size_steps_through_suffixes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn guess_media_type_covers_common_extensions() {
        assert_eq!(guess_media_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("notes.txt"), "text/plain");
        assert_eq!(guess_media_type("mystery.bin"), "application/octet-stream");
        assert_eq!(guess_media_type("no_extension"), "application/octet-stream");
    }

    #[test]
    fn media_kind_prefers_media_type_then_extension() {
        assert_eq!(media_kind("image/png", "a.png"), MediaKind::Image);
        assert_eq!(media_kind("application/pdf", "a.pdf"), MediaKind::Document);
        assert_eq!(media_kind("application/octet-stream", "a.zip"), MediaKind::Archive);
        assert_eq!(media_kind("application/octet-stream", "setup.exe"), MediaKind::Executable);
        assert_eq!(media_kind("application/octet-stream", "a.xyz"), MediaKind::Other);
    }
}
