//! Deterministic zip packing of a generation result.
//!
//! Entries are written in the order the files were parsed, deflate
//! compressed, with a fixed timestamp, so identical inputs always produce
//! identical archive bytes.

use std::io::{Cursor, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::types::GeneratedFile;

/// Pack the files into a zip archive and return it base64-encoded.
pub fn zip_base64(files: &[GeneratedFile]) -> Result<String> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer
            .write_all(file.content.as_bytes())
            .map_err(ZipError::Io)?;
    }

    let cursor = writer.finish()?;
    Ok(STANDARD.encode(cursor.into_inner()))
}
