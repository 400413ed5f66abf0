//! Rich-text to plain-text conversion.
//!
//! The segmenter only ever sees markup-free lines; this module is the
//! boundary that produces them. It knows how to decode the legacy
//! single-byte sources and strip RTF control structure, and nothing about
//! chapters or verses. The trait seam lets tests substitute a converter that
//! passes text through untouched.

use anyhow::{Result, anyhow};
use encoding_rs::Encoding;
use rtf_parser::lexer::Lexer;
use rtf_parser::parser::Parser;
use tracing::{debug, warn};

/// Turns raw source bytes into plain text, line breaks preserved.
pub trait MarkupConverter {
    fn to_plain_text(&self, raw: &[u8]) -> Result<String>;
}

/// Decodes a legacy single-byte encoding and strips RTF markup.
pub struct RtfConverter {
    encoding: &'static Encoding,
}

impl RtfConverter {
    /// Build a converter for sources stored in the encoding named by
    /// `label` (a WHATWG encoding label such as "latin1"). Unknown labels
    /// fall back to windows-1252 with a warning.
    pub fn new(label: &str) -> Self {
        let encoding = Encoding::for_label(label.trim().as_bytes()).unwrap_or_else(|| {
            warn!(label, "Unknown source encoding label; using windows-1252");
            encoding_rs::WINDOWS_1252
        });
        Self { encoding }
    }
}

impl MarkupConverter for RtfConverter {
    fn to_plain_text(&self, raw: &[u8]) -> Result<String> {
        let (decoded, _, had_errors) = self.encoding.decode(raw);
        if had_errors {
            warn!(
                encoding = self.encoding.name(),
                "Source contained byte sequences invalid for the configured encoding"
            );
        }
        let text = strip_rtf(&decoded)?;
        debug!(
            raw_bytes = raw.len(),
            text_chars = text.len(),
            "Converted document to plain text"
        );
        Ok(text)
    }
}

fn strip_rtf(content: &str) -> Result<String> {
    let tokens = Lexer::scan(content).map_err(|err| anyhow!("failed to tokenize RTF: {err}"))?;
    let document = Parser::new(tokens)
        .parse()
        .map_err(|err| anyhow!("failed to parse RTF: {err}"))?;
    Ok(document.get_text())
}
