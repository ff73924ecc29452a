use std::sync::atomic::{AtomicU32, Ordering};

use actix_web::{http::header, HttpRequest};

/// Length of a storage identifier: 12 bytes rendered as hex.
pub const ID_LEN: usize = 24;

static ID_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == ID_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validates an identifier and returns it in the lowercase form ids are
/// stored in. Hex case does not distinguish ids.
pub fn parse_id(candidate: &str) -> Option<String> {
    if is_valid_id(candidate) {
        Some(candidate.to_ascii_lowercase())
    } else {
        None
    }
}

/// Generates a new identifier: 4 bytes of unix seconds, 5 random bytes and a
/// 3 byte counter, so ids created by one process sort by creation time.
pub fn new_id() -> String {
    let secs = chrono::Utc::now().timestamp() as u32;
    let random: [u8; 5] = rand::random();
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(&random);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Treats a blank optional string (`?folderId=`) the same as an absent one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Escapes LIKE wildcards so a search term always matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn get_token(req: &HttpRequest) -> Option<&str> {
    let auth = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
