//! Attachment installation: chunked-base64 decode plus row insertion.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value;
use tracing::debug;

use super::accumulator::invalid_payload;
use super::dump::AttachmentData;
use super::resolver::Resolver;
use super::ImportContext;
use crate::common::ContentKind;
use crate::database::entities::attachments;
use crate::storage::FileStore;

/// Decode one self-contained chunk, restoring trailing `=` the encoder may
/// have stripped.
fn decode_chunk(chunk: &str) -> Result<Vec<u8>, String> {
    let missing = (4 - chunk.len() % 4) % 4;
    if missing == 0 {
        return STANDARD.decode(chunk).map_err(|e| e.to_string());
    }
    let mut padded = String::with_capacity(chunk.len() + missing);
    padded.push_str(chunk);
    for _ in 0..missing {
        padded.push('=');
    }
    STANDARD.decode(padded).map_err(|e| e.to_string())
}

/// Decode a payload produced by a chunked base64 encoder: each chunk was
/// encoded and padded independently, so the stream is decoded in padded
/// 4-byte groups rather than as one document.
pub fn decode_chunked_base64(data: &str) -> Result<Vec<u8>, String> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = Vec::with_capacity(compact.len() / 4 * 3);

    // Padding characters terminate a chunk; split on them so every piece is
    // a self-contained base64 document.
    let mut start = 0;
    let bytes = compact.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' {
            // Consume the full padding run.
            let mut end = i + 1;
            while end < bytes.len() && bytes[end] == b'=' {
                end += 1;
            }
            out.extend(decode_chunk(&compact[start..end])?);
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    if start < compact.len() {
        out.extend(decode_chunk(&compact[start..])?);
    }
    Ok(out)
}

/// Install one attachment from the dump. Returns `None` (with the error
/// accumulated by the caller) when the payload is invalid.
pub async fn store_attachment<C: ConnectionTrait>(
    db: &C,
    files: &FileStore,
    resolver: &mut Resolver,
    ctx: &ImportContext,
    kind: ContentKind,
    object_id: i32,
    raw: &Value,
) -> Result<std::result::Result<attachments::Model, super::accumulator::FieldErrors>> {
    let data: AttachmentData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };

    let bytes = match decode_chunked_base64(&data.attached_file.data) {
        Ok(b) => b,
        Err(e) => {
            let mut errors = super::accumulator::FieldErrors::new();
            errors.insert(
                "attached_file".to_string(),
                vec![format!("invalid base64 payload: {e}")],
            );
            return Ok(Err(errors));
        }
    };

    let owner_id = match &data.owner {
        Some(email) => resolver.user_by_email(db, email).await?.map(|u| u.id),
        None => None,
    }
    .or(Some(ctx.owner.id));

    let relative = files.save(&data.attached_file.name, &bytes)?;
    debug!(
        "Attached {} ({} bytes) to {}:{}",
        data.attached_file.name,
        bytes.len(),
        kind,
        object_id
    );

    let now = Utc::now();
    let model = attachments::ActiveModel {
        project_id: Set(ctx.project_id),
        content_kind: Set(kind.natural_key().to_string()),
        object_id: Set(object_id),
        owner_id: Set(owner_id),
        name: Set(data.attached_file.name.clone()),
        size: Set(bytes.len() as i64),
        attached_file: Set(relative),
        description: Set(data.description),
        is_deprecated: Set(data.is_deprecated),
        order: Set(data.order),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Ok(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_chunked_base64("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_chunked_base64("aGVsbG8gd29ybGQ=").unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_chunked_with_interior_padding() {
        // Two independently padded chunks: "hello" + " world".
        let chunked = format!("{}{}", STANDARD.encode("hello"), STANDARD.encode(" world"));
        assert!(chunked[..chunked.len() - 1].contains('='));
        assert_eq!(decode_chunked_base64(&chunked).unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_stripped_padding() {
        assert_eq!(decode_chunked_base64("aGVsbG8").unwrap(), b"hello");
        // Interior chunk keeps its padding, the final one lost it.
        let chunked = format!("{}IHdvcmxkIQ", STANDARD.encode("hello"));
        assert_eq!(decode_chunked_base64(&chunked).unwrap(), b"hello world!");
    }

    #[test]
    fn test_decode_ignores_newlines() {
        assert_eq!(decode_chunked_base64("aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_empty_is_empty() {
        assert_eq!(decode_chunked_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_chunked_base64("!!!not base64!!!").is_err());
    }
}
