//! Low-level reading helpers shared by the file loader.
//!
//! - **Format detection**: the upload's file extension picks the decoder.
//! - **Encoding**: delimited text is decoded via `encoding_rs`, defaulting to
//!   UTF-8.
//! - **Reader construction**: strict CSV readers over in-memory bytes.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

pub fn detect_format(file_name: &str) -> Option<SourceFormat> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("csv") {
        Some(SourceFormat::Csv)
    } else if ext.eq_ignore_ascii_case("xlsx") {
        Some(SourceFormat::Xlsx)
    } else {
        None
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn read_upload(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Input path {path:?} has no file name"))?;
    Ok((bytes, name))
}

pub fn open_csv_reader(bytes: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(bytes)
}

/// Decodes bytes, returning `None` when the input is not valid in `encoding`.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    (!had_errors).then(|| text.into_owned())
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}
