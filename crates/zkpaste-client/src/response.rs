//! Server reply interpretation
//!
//! The body is JSON: `{"status":0,"id":..,"deletetoken":..}` on success,
//! `{"status":1,"message":..}` on an application-level refusal.

use serde::Deserialize;

use zkpaste_core::{PasteError, PasteResult};

/// A successfully created paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteResponse {
    pub id: String,
    pub delete_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    status: i64,
    id: Option<String>,
    deletetoken: Option<String>,
    message: Option<String>,
}

/// Map a reply body onto a created paste or the matching error.
pub fn parse_response(body: &[u8]) -> PasteResult<PasteResponse> {
    let reply: RawReply = serde_json::from_slice(body).map_err(|e| {
        PasteError::Protocol(format!("{e} (body: {:?})", preview(body)))
    })?;

    match reply.status {
        0 => {
            let id = reply
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| PasteError::Protocol("status 0 without a paste id".into()))?;
            Ok(PasteResponse {
                id,
                delete_token: reply.deletetoken.filter(|t| !t.is_empty()),
            })
        }
        1 => Err(PasteError::Rejected(
            reply.message.unwrap_or_else(|| "unknown error".into()),
        )),
        other => Err(PasteError::UnknownServerStatus(other)),
    }
}

/// First bytes of a body, for diagnostics.
fn preview(body: &[u8]) -> String {
    let head = &body[..body.len().min(80)];
    String::from_utf8_lossy(head).into_owned()
}
