//! Locating and loading the chat transcript inside an export.
//!
//! A WhatsApp export is a folder (or an unpacked archive) holding one text
//! transcript and any number of media files. These helpers pick the
//! transcript and read it; they are the only place where "no chat file" or
//! "empty chat file" are errors.
//!
//! # Example
//!
//! ```rust
//! use chatlog::detect::{FileEntry, detect_chat_file};
//!
//! let files = vec![
//!     FileEntry::new("export/IMG-20230102-WA0001.jpg"),
//!     FileEntry::new("export/notes.txt"),
//!     FileEntry::new("export/_chat.txt"),
//! ];
//!
//! let chosen = detect_chat_file(&files).unwrap();
//! assert_eq!(chosen.name, "_chat.txt");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ChatlogError, Result};
use crate::parsing::timestamp::looks_like_timestamp;

const UTF8_BOM: char = '\u{feff}';

/// A candidate file from an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Location of the file.
    pub path: PathBuf,
    /// Base name, used for name-based priority.
    pub name: String,
}

impl FileEntry {
    /// Creates an entry, taking the name from the path's last component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    fn is_text(&self) -> bool {
        self.name.to_lowercase().ends_with(".txt")
    }
}

/// Name-based likelihood that `name` is the exported transcript.
///
/// `_chat.txt` (iOS) beats `chat.txt`, which beats Android's
/// `WhatsApp Chat with …` naming; anything else scores 0.
pub fn name_priority(name: &str) -> u8 {
    let name = name.to_lowercase();
    match name.as_str() {
        "_chat.txt" => 100,
        "chat.txt" => 90,
        _ if name.starts_with("whatsapp chat") => 80,
        _ => 0,
    }
}

/// Fraction of the first `max_lines` lines that start with a timestamp.
///
/// # Example
///
/// ```rust
/// use chatlog::detect::score_transcript;
///
/// let text = "1/2/23, 9:41 AM - Alice: hi\nwrapped line\n1/2/23, 9:42 AM - Bob: yo\nbye";
/// assert_eq!(score_transcript(text, 50), 0.5);
/// assert_eq!(score_transcript("shopping list", 50), 0.0);
/// ```
pub fn score_transcript(text: &str, max_lines: usize) -> f64 {
    let lines: Vec<&str> = text.split('\n').take(max_lines).collect();
    let matches = lines.iter().filter(|line| looks_like_timestamp(line.trim())).count();
    matches as f64 / lines.len().max(1) as f64
}

/// Picks the most likely transcript by name alone.
///
/// Non-`.txt` files are ignored. Returns `None` if there are no text files.
pub fn detect_chat_file(files: &[FileEntry]) -> Option<&FileEntry> {
    let mut candidates: Vec<&FileEntry> = files.iter().filter(|f| f.is_text()).collect();
    // Stable sort keeps listing order among equal priorities.
    candidates.sort_by_key(|f| std::cmp::Reverse(name_priority(&f.name)));
    candidates.first().copied()
}

/// Picks the transcript, reading candidates to break name-priority ties.
///
/// When no text file has a known name, each one is scored with
/// [`score_transcript`] over `sample_lines` lines and the best score wins.
/// Unreadable candidates score 0.
pub fn select_chat_file(files: &[FileEntry], sample_lines: usize) -> Result<&FileEntry> {
    if let Some(file) = detect_chat_file(files).filter(|f| name_priority(&f.name) > 0) {
        debug!(file = %file.path.display(), "chat file chosen by name");
        return Ok(file);
    }

    let mut best: Option<(&FileEntry, f64)> = None;
    for file in files.iter().filter(|f| f.is_text()) {
        let score = read_transcript(&file.path)
            .map(|text| score_transcript(&text, sample_lines))
            .unwrap_or(0.0);
        debug!(file = %file.path.display(), score, "scored chat file candidate");
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((file, score));
        }
    }

    best.map(|(file, _)| file).ok_or(ChatlogError::NoChatFile {
        candidates: files.len(),
    })
}

/// Lists every regular file under `dir`, recursively.
pub fn scan_directory(dir: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ChatlogError::Io(e.into()))?;
        if entry.file_type().is_file() {
            entries.push(FileEntry::new(entry.into_path()));
        }
    }
    Ok(entries)
}

/// Reads a transcript as UTF-8, dropping a leading byte-order mark.
pub fn read_transcript(path: impl AsRef<Path>) -> Result<String> {
    let bytes = fs::read(path.as_ref())?;
    let text = String::from_utf8(bytes).map_err(|e| ChatlogError::utf8("transcript", e))?;
    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Reads a transcript, rejecting files with nothing but whitespace.
pub fn load_transcript(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = read_transcript(path)?;
    if text.trim().is_empty() {
        return Err(ChatlogError::empty_transcript(Some(path.to_path_buf())));
    }
    Ok(text)
}

/// Finds the transcript inside an export folder and loads it.
///
/// Returns the chosen file alongside its text.
pub fn load_export(dir: impl AsRef<Path>, sample_lines: usize) -> Result<(FileEntry, String)> {
    let files = scan_directory(dir)?;
    let chosen = select_chat_file(&files, sample_lines)?.clone();
    let text = load_transcript(&chosen.path)?;
    Ok((chosen, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_name_priority() {
        assert_eq!(name_priority("_chat.txt"), 100);
        assert_eq!(name_priority("_CHAT.TXT"), 100);
        assert_eq!(name_priority("chat.txt"), 90);
        assert_eq!(name_priority("WhatsApp Chat with Bob.txt"), 80);
        assert_eq!(name_priority("notes.txt"), 0);
    }

    #[test]
    fn test_detect_ignores_non_text() {
        let files = vec![FileEntry::new("a.jpg"), FileEntry::new("b.opus")];
        assert!(detect_chat_file(&files).is_none());
    }

    #[test]
    fn test_detect_prefers_known_names() {
        let files = vec![
            FileEntry::new("notes.txt"),
            FileEntry::new("WhatsApp Chat with Bob.txt"),
            FileEntry::new("chat.txt"),
        ];
        assert_eq!(detect_chat_file(&files).unwrap().name, "chat.txt");
    }

    #[test]
    fn test_detect_keeps_first_on_tie() {
        let files = vec![FileEntry::new("one.txt"), FileEntry::new("two.TXT")];
        assert_eq!(detect_chat_file(&files).unwrap().name, "one.txt");
    }

    #[test]
    fn test_score_counts_trimmed_lines() {
        assert_eq!(score_transcript("  [1/2/23, 9:41:00] Alice: hi", 50), 1.0);
        assert_eq!(score_transcript("", 50), 0.0);
        let many = "1/2/23, 9:41 AM - A: x\n".repeat(100);
        assert_eq!(score_transcript(&many, 50), 1.0);
    }

    #[test]
    fn test_select_by_content() {
        let dir = TempDir::new().unwrap();
        let notes = write(&dir, "notes.txt", "buy milk\ncall mum\n");
        let chat = write(&dir, "export.txt", "1/2/23, 9:41 AM - Alice: hi\n1/2/23, 9:42 AM - Bob: yo\n");
        let files = vec![FileEntry::new(notes), FileEntry::new(chat)];
        assert_eq!(select_chat_file(&files, 50).unwrap().name, "export.txt");
    }

    #[test]
    fn test_select_none() {
        let files = vec![FileEntry::new("photo.jpg")];
        let err = select_chat_file(&files, 50).unwrap_err();
        assert!(err.is_no_chat_file());
    }

    #[test]
    fn test_load_transcript_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "_chat.txt", "\u{feff}1/2/23, 9:41 AM - Alice: hi");
        assert_eq!(load_transcript(&path).unwrap(), "1/2/23, 9:41 AM - Alice: hi");
    }

    #[test]
    fn test_load_transcript_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "_chat.txt", " \n\n");
        let err = load_transcript(&path).unwrap_err();
        assert!(err.is_empty_transcript());
    }

    #[test]
    fn test_read_transcript_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = read_transcript(&path).unwrap_err();
        assert!(err.to_string().contains("transcript"));
    }

    #[test]
    fn test_load_export_nested() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("media")).unwrap();
        write(&dir, "media/IMG-20230102-WA0001.jpg", "jpeg");
        write(&dir, "WhatsApp Chat with Bob.txt", "1/2/23, 9:41 AM - Bob: hi");

        let (entry, text) = load_export(dir.path(), 50).unwrap();
        assert_eq!(entry.name, "WhatsApp Chat with Bob.txt");
        assert!(text.starts_with("1/2/23"));
        assert_eq!(scan_directory(dir.path()).unwrap().len(), 2);
    }
}
