use serde_json::Value;
use std::net::SocketAddr;

// Picks the bucket a request is counted under.
//
// A JSON body with a non-null `token` field keys by that token; anything
// else (no body, bad JSON, no token) keys by the caller's IP.
pub fn rate_limit_key(body: &[u8], addr: SocketAddr) -> String {
    token_from_body(body).unwrap_or_else(|| addr.ip().to_string())
}

fn token_from_body(body: &[u8]) -> Option<String> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    match parsed.get("token")? {
        Value::Null => None,
        Value::String(token) => Some(token.clone()),
        other => Some(other.to_string()),
    }
}
