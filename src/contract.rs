//! Output contract: parse and validate the model's raw text.
//!
//! A conforming response is exactly four `// FILE: <name>` markers, each
//! immediately followed by a fenced code block tagged `c` or `cpp`, with
//! nothing else around them. A non-conforming response fails in one of
//! three precise ways:
//!
//! - [`GenError::OutputConflict`] — the whole text is a single C comment
//!   block, the model's explicit "no common root" sentinel;
//! - [`GenError::OutputStructure`] — wrong block count, or stray text left
//!   over once the matched blocks are removed;
//! - [`GenError::OutputContent`] — four well-formed blocks, but the four
//!   required filenames are not all present.
//!
//! Cardinality and naming are independent gates so callers can tell
//! "wrong count" apart from "right count, wrong names".

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GenError, Result};
use crate::types::GeneratedFile;

/// Number of files a conforming response must contain.
pub const EXPECTED_FILE_COUNT: usize = 4;

/// One `// FILE:` marker plus its fenced block. The body match is
/// non-greedy so consecutive blocks are captured discretely, never merged.
static FILE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)// FILE: ([^\n]+)\n```(c|cpp)\n(.*?)\n```").expect("file block pattern")
});

/// The error sentinel: a single block comment and nothing else (surrounding
/// whitespace allowed). The greedy inner group spans to the last `*/`.
static SENTINEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*/\*(.*)\*/\s*$").expect("sentinel pattern")
});

/// Parse raw model text into exactly four [`GeneratedFile`] records.
///
/// Names are trimmed; language tags and bodies are preserved verbatim.
pub fn parse(text: &str) -> Result<Vec<GeneratedFile>> {
    // Sentinel first: a comment-only response can never satisfy the block
    // pattern and must not be misreported as a structural failure.
    if let Some(caps) = SENTINEL_RE.captures(text) {
        let inner = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        return Err(GenError::OutputConflict(inner));
    }

    let text = text.trim();
    let mut files = Vec::with_capacity(EXPECTED_FILE_COUNT);
    for caps in FILE_BLOCK_RE.captures_iter(text) {
        files.push(GeneratedFile {
            name: caps[1].trim().to_string(),
            language: caps[2].to_string(),
            content: caps[3].to_string(),
        });
    }

    let leftover = FILE_BLOCK_RE.replace_all(text, "");
    if files.len() != EXPECTED_FILE_COUNT || !leftover.trim().is_empty() {
        return Err(GenError::OutputStructure("expected four file blocks".into()));
    }

    let mut has_versioned = false;
    let mut has_conv_h = false;
    let mut has_conv_cpp = false;
    let mut has_converters = false;
    for file in &files {
        let name = file.name.as_str();
        if name.ends_with("_versioned.h") {
            has_versioned = true;
        } else if name.starts_with("Converter_") && name.ends_with(".h") {
            has_conv_h = true;
        } else if name.starts_with("Converter_") && name.ends_with(".cpp") {
            has_conv_cpp = true;
        } else if name == "converters.cpp" {
            has_converters = true;
        }
    }
    if !(has_versioned && has_conv_h && has_conv_cpp && has_converters) {
        return Err(GenError::OutputContent("missing expected files".into()));
    }

    Ok(files)
}

/// Render files back into the marker-plus-fence form [`parse`] accepts.
///
/// `parse(&render(&files))` yields the same records, which is also how the
/// CLI prints a result for inspection.
pub fn render(files: &[GeneratedFile]) -> String {
    files
        .iter()
        .map(|f| format!("// FILE: {}\n```{}\n{}\n```", f.name, f.language, f.content))
        .collect::<Vec<_>>()
        .join("\n")
}
