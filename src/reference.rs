//! Decoding of `{{file://...}}` attachment placeholders.
//!
//! The placeholder wraps a percent-encoded JSON object whose `source` field
//! looks like `attachment:<id>:<filename>`. Anything that does not decode
//! cleanly is treated as "no attachment" rather than an error.

use colored::*;
use serde::Deserialize;
use serde_json::Value;

const PREFIX: &str = "{{file://";
/// Length of the `}}` tail, dropped without looking at it.
const SUFFIX_CHARS: usize = 2;
const ATTACHMENT_MARKER: &str = "attachment:";
const FALLBACK_FILENAME: &str = "image.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub attachment_id: String,
    pub filename: String,
    pub permission: Option<PermissionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub space_id: String,
}

struct FilePayload {
    source: String,
    permission_record: Option<PermissionRecord>,
}

/// Decode a reference string into its attachment description.
pub fn parse_reference(raw: &str) -> Option<AttachmentRef> {
    let payload = match decode_payload(raw) {
        Ok(payload) => payload,
        Err(reason) => {
            println!("{}", format!("Error extracting filename: {}", reason).yellow());
            return None;
        }
    };

    if !payload.source.starts_with(ATTACHMENT_MARKER) {
        return None;
    }

    let parts: Vec<&str> = payload.source.split(':').collect();
    let attachment_id = parts.get(1).copied().unwrap_or_default().to_string();
    let filename = parts.get(2).copied().unwrap_or(FALLBACK_FILENAME).to_string();

    Some(AttachmentRef {
        attachment_id,
        filename,
        permission: payload.permission_record,
    })
}

/// Extract only the attachment filename from a reference string.
pub fn extract_filename(raw: &str) -> Option<String> {
    parse_reference(raw).map(|reference| reference.filename)
}

fn decode_payload(raw: &str) -> Result<FilePayload, String> {
    let rest = raw
        .strip_prefix(PREFIX)
        .ok_or_else(|| "not a file placeholder".to_string())?;
    let mut chars = rest.chars();
    for _ in 0..SUFFIX_CHARS {
        chars.next_back();
    }
    let decoded = urlencoding::decode(chars.as_str()).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&decoded).map_err(|e| e.to_string())?;

    let object = value
        .as_object()
        .ok_or_else(|| "payload is not a JSON object".to_string())?;
    let source = match object.get("source") {
        None => String::new(),
        Some(Value::String(source)) => source.clone(),
        Some(other) => return Err(format!("source is not a string: {}", other)),
    };
    // Permission metadata is informational; a malformed record is dropped.
    let permission_record = object
        .get("permissionRecord")
        .and_then(|record| PermissionRecord::deserialize(record).ok());

    Ok(FilePayload {
        source,
        permission_record,
    })
}
