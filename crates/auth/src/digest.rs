//! Body serialization and the `Content-MD5` digest.

use crate::error::AuthError;
use md5::{Digest, Md5};
use serde::Serialize;

/// Hex MD5 of the empty input, sent for bodyless requests.
pub const EMPTY_CONTENT_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Serialize a request body to the JSON bytes that go on the wire.
///
/// The same bytes must be both hashed and transmitted.
pub fn encode_json_body<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>, AuthError> {
    Ok(serde_json::to_vec(body)?)
}

/// Hex MD5 of the body bytes, or of nothing when there is no body.
pub fn content_md5(body: Option<&[u8]>) -> String {
    hex::encode(Md5::digest(body.unwrap_or_default()))
}
