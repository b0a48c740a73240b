//! Text decoding with legacy fallbacks
//!
//! Tables written by this crate are UTF-8. Older exports from the shared
//! spreadsheet were saved as Big5 or GB18030, so a failed UTF-8 decode is
//! retried against the configured encodings before giving up.

use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// UTF-8 first, then each fallback in order
#[derive(Debug, Clone)]
pub struct TextDecoder {
    fallbacks: Vec<&'static Encoding>,
}

impl TextDecoder {
    /// Build from encoding labels (`big5`, `gb18030`, `shift_jis`, ...)
    ///
    /// Labels encoding_rs does not recognise are skipped with a warning.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let fallbacks = labels
            .iter()
            .filter_map(|label| {
                let label = label.as_ref();
                let encoding = Encoding::for_label(label.trim().as_bytes());
                if encoding.is_none() {
                    tracing::warn!(label, "Unknown fallback encoding label, skipped");
                }
                encoding
            })
            .filter(|encoding| *encoding != UTF_8)
            .collect();
        Self { fallbacks }
    }

    pub fn utf8_only() -> Self {
        Self {
            fallbacks: Vec::new(),
        }
    }

    /// Decode without replacement characters.
    ///
    /// Returns the text and the encoding that succeeded, or `None` if every
    /// candidate hit a malformed sequence.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<(Cow<'a, str>, &'static Encoding)> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
            return Some((text, UTF_8));
        }

        self.fallbacks.iter().find_map(|&encoding| {
            encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| (text, encoding))
        })
    }

    pub fn fallback_names(&self) -> Vec<&'static str> {
        self.fallbacks.iter().map(|e| e.name()).collect()
    }
}
