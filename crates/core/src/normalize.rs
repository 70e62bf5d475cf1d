//! Text and file-name normalization.
//!
//! Content strings arrive from generated content and may carry any Unicode,
//! mixed line endings and control characters that XML 1.0 cannot represent.
//! Export file names are derived from free-form titles.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Everything outside the file-name safe set.
static UNSAFE_FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// Maximum length of a sanitized file name stem, in characters.
pub const MAX_FILENAME_LEN: usize = 100;

/// Stem used when a title sanitizes to nothing.
pub const DEFAULT_FILENAME: &str = "presentation";

/// Derive a file-system safe stem from a presentation title.
///
/// Every character outside letters, digits, '.', '_' and '-' becomes '_',
/// and the result is truncated to [`MAX_FILENAME_LEN`] characters.
pub fn sanitize_filename(title: &str) -> String {
    let replaced = UNSAFE_FILENAME_REGEX.replace_all(title, "_");
    let truncated: String = replaced.chars().take(MAX_FILENAME_LEN).collect();
    if truncated.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        truncated
    }
}

/// Whether `c` may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Normalizer for text that ends up in slide markup. Whitespace is kept
/// as authored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one text value.
    ///
    /// - Composes to Unicode NFC
    /// - Converts `\r\n` and `\r` to `\n`
    /// - Drops characters XML cannot carry (other control characters)
    pub fn normalize(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        unified.nfc().filter(|&c| is_xml_char(c)).collect()
    }
}
