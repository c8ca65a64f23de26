//! Header canonicalization

use crate::types::HeaderMap;
use serde_json::Value;

/// Header `typ` value, always forced onto the final header
pub const TOKEN_TYPE: &str = "JWT";

/// Build the final header: every caller field copied in order, then `typ`
/// set to `"JWT"`, replacing any caller value in place.
#[must_use]
pub fn canonicalize(header: &HeaderMap) -> HeaderMap {
    let mut final_header = header.clone();
    final_header.insert("typ".to_string(), Value::String(TOKEN_TYPE.to_string()));
    final_header
}
