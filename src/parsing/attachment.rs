//! Attachment markers and MIME guessing.
//!
//! Exports replace media with a textual reference. Depending on platform and
//! export options that reference looks like one of:
//!
//! - `<attached: IMG-20230102-WA0001.jpg>` (iOS)
//! - `report.pdf (file attached)` (Android)
//! - `IMG-20230102-WA0001.jpg` on its own (internal naming convention)
//! - any bare filename with a known media or document extension

use std::sync::LazyLock;

use regex::Regex;

/// Fallback MIME type for unmapped extensions.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

const MEDIA_EXTENSIONS: &str =
    "jpg|jpeg|png|gif|webp|mp4|mov|avi|mkv|3gp|webm|mp3|ogg|opus|wav|m4a|aac|pdf|doc|docx|xls|xlsx|ppt|pptx|vcf|apk";

/// Attachment patterns in priority order. Group 1 is the filename.
static ATTACHMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)<attached:\s*(.+?)>".to_string(),
        r"(?i)^(.+?)\s*\(file attached\)\s*$".to_string(),
        r"(?i)^((?:IMG|VID|AUD|STK|DOC|PTT)-[0-9]{8}-WA[0-9]+\.\w+)\s*$".to_string(),
        format!(r"(?i)^(\S+\.(?:{MEDIA_EXTENSIONS}))\s*$"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("attachment pattern is valid"))
    .collect()
});

/// Finds the first attachment reference in an already-trimmed body.
///
/// Returns the referenced filename, trimmed. Patterns that capture only
/// whitespace are skipped.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::attachment::detect_attachment;
///
/// assert_eq!(
///     detect_attachment("<attached: IMG-20230102-WA0001.jpg>"),
///     Some("IMG-20230102-WA0001.jpg")
/// );
/// assert_eq!(detect_attachment("report.pdf (file attached)"), Some("report.pdf"));
/// assert_eq!(detect_attachment("see you at 5"), None);
/// ```
pub fn detect_attachment(body: &str) -> Option<&str> {
    ATTACHMENT_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
    })
}

/// Removes every attachment reference from `body`, leaving the caption.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::attachment::strip_attachments;
///
/// assert_eq!(strip_attachments("<attached: a.jpg> look at this"), "look at this");
/// assert_eq!(strip_attachments("<attached: a.jpg>"), "");
/// ```
pub fn strip_attachments(body: &str) -> String {
    ATTACHMENT_PATTERNS
        .iter()
        .fold(body.trim().to_string(), |caption, pattern| {
            pattern.replace_all(&caption, "").trim().to_string()
        })
}

/// Guesses a MIME type from a filename's extension.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::attachment::guess_mime;
///
/// assert_eq!(guess_mime("IMG-20230102-WA0001.jpg"), "image/jpeg");
/// assert_eq!(guess_mime("notes.PDF"), "application/pdf");
/// assert_eq!(guess_mime("archive.xyz"), "application/octet-stream");
/// ```
pub fn guess_mime(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return UNKNOWN_MIME;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "3gp" => "video/3gpp",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "vcf" => "text/vcard",
        "apk" => "application/vnd.android.package-archive",
        _ => UNKNOWN_MIME,
    }
}

/// Normalizes a filename into the key a media index files it under:
/// directories stripped, lowercased.
pub fn media_key(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attached_marker_anywhere() {
        assert_eq!(
            detect_attachment("\u{200e}<attached: 00000012-PHOTO-2023-01-02.jpg>"),
            Some("00000012-PHOTO-2023-01-02.jpg")
        );
        assert_eq!(detect_attachment("<ATTACHED:  voice.opus>"), Some("voice.opus"));
    }

    #[test]
    fn test_file_attached_suffix() {
        assert_eq!(
            detect_attachment("Quarterly Report.pdf (file attached)"),
            Some("Quarterly Report.pdf")
        );
    }

    #[test]
    fn test_internal_naming_convention() {
        assert_eq!(
            detect_attachment("PTT-20230102-WA0003.opus"),
            Some("PTT-20230102-WA0003.opus")
        );
        assert_eq!(
            detect_attachment("stk-20230102-wa0010.webp"),
            Some("stk-20230102-wa0010.webp")
        );
    }

    #[test]
    fn test_bare_media_filename() {
        assert_eq!(detect_attachment("holiday.MP4"), Some("holiday.MP4"));
        assert_eq!(detect_attachment("contact.vcf"), Some("contact.vcf"));
    }

    #[test]
    fn test_plain_text_is_not_attachment() {
        assert_eq!(detect_attachment("I sent you the pdf yesterday"), None);
        assert_eq!(detect_attachment("check holiday.mp4 later"), None);
        assert_eq!(detect_attachment("notes.txt"), None);
    }

    #[test]
    fn test_empty_marker_is_skipped() {
        assert_eq!(detect_attachment("<attached: >"), None);
    }

    #[test]
    fn test_priority_marker_before_file_attached() {
        assert_eq!(
            detect_attachment("<attached: a.jpg> (file attached)"),
            Some("a.jpg")
        );
    }

    #[test]
    fn test_strip_leaves_caption() {
        assert_eq!(
            strip_attachments("  <attached: a.jpg>   sunset over the bay "),
            "sunset over the bay"
        );
        assert_eq!(strip_attachments("report.pdf (file attached)"), "");
        assert_eq!(strip_attachments("IMG-20230102-WA0001.jpg"), "");
    }

    #[test]
    fn test_strip_removes_every_marker() {
        assert_eq!(strip_attachments("<attached: a.jpg> and <attached: b.jpg>"), "and");
    }

    #[test]
    fn test_guess_mime_table() {
        assert_eq!(guess_mime("a.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("a.opus"), "audio/opus");
        assert_eq!(guess_mime("a.3gp"), "video/3gpp");
        assert_eq!(guess_mime("a.vcf"), "text/vcard");
        assert_eq!(guess_mime("no_extension"), UNKNOWN_MIME);
        assert_eq!(guess_mime("weird.tar.zz"), UNKNOWN_MIME);
    }

    #[test]
    fn test_media_key() {
        assert_eq!(media_key("IMG-1.JPG"), "img-1.jpg");
        assert_eq!(media_key("Media/Sub/IMG-1.jpg"), "img-1.jpg");
        assert_eq!(media_key("C:\\export\\VID-2.MP4"), "vid-2.mp4");
    }
}
