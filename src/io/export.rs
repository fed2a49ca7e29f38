//! Flat one-row-per-item export of a run's metadata

use crate::io::error::{GenerationError, Result};
use crate::io::metadata::NftMetadata;
use std::borrow::Cow;
use std::path::Path;

const BASE_COLUMNS: [&str; 4] = ["name", "description", "image", "attributes"];
const EXTERNAL_URL_COLUMN: &str = "external_url";

// RFC 4180 quoting: wrap when a delimiter, quote, or line break is present
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    let row: Vec<Cow<'a, str>> = fields.into_iter().collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Render records as CSV text
///
/// The `attributes` column holds each record's full attribute list as JSON. The
/// `external_url` column is present only when some record carries a link.
///
/// # Errors
///
/// Returns the serializer's error if an attribute list cannot be encoded
pub fn render_summary_csv(records: &[NftMetadata]) -> std::result::Result<String, serde_json::Error> {
    let with_external = records.iter().any(|r| r.external_url.is_some());

    let mut out = String::new();
    let header = BASE_COLUMNS
        .iter()
        .copied()
        .chain(with_external.then_some(EXTERNAL_URL_COLUMN))
        .map(Cow::Borrowed);
    push_row(&mut out, header);

    for record in records {
        let attributes = serde_json::to_string(&record.attributes)?;
        let mut fields = vec![
            escape_field(&record.name),
            escape_field(&record.description),
            escape_field(&record.image),
            escape_field(&attributes),
        ];
        if with_external {
            fields.push(escape_field(
                record.external_url.as_deref().unwrap_or_default(),
            ));
        }
        push_row(&mut out, fields);
    }

    Ok(out)
}

/// Write records as a CSV file
///
/// # Errors
///
/// Returns `Serialization` if encoding fails or `AssetWrite` if the file cannot be written
pub fn write_summary_csv(path: &Path, records: &[NftMetadata]) -> Result<()> {
    let text = render_summary_csv(records).map_err(|e| GenerationError::Serialization {
        path: path.to_path_buf(),
        operation: "encode summary",
        source: e,
    })?;
    std::fs::write(path, text).map_err(|e| GenerationError::AssetWrite {
        path: path.to_path_buf(),
        item_id: None,
        source: e,
    })
}
