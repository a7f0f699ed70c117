//! Assembly of the authenticated header set.

use crate::date::http_date;
use crate::digest::content_md5;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SigningInput};
use crate::trace::TraceEvent;
use chrono::{DateTime, Utc};

/// Default request content type.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub(crate) const AUTHORIZATION: &str = "Authorization";
pub(crate) const DATE: &str = "Date";
pub(crate) const HOST: &str = "Host";
pub(crate) const CONTENT_MD5: &str = "Content-MD5";
pub(crate) const CONTENT_TYPE: &str = "Content-Type";

/// The five headers every NFON API request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    authorization: String,
    date: String,
    host: String,
    content_md5: String,
    content_type: String,
}

impl SignedHeaders {
    /// `NFON-API key:signature`.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// RFC 1123 date in GMT.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Base URL without scheme.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Hex MD5 of the body.
    pub fn content_md5(&self) -> &str {
        &self.content_md5
    }

    /// Content type that was signed.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Header name/value pairs in wire order.
    pub fn as_pairs(&self) -> [(&'static str, &str); 5] {
        [
            (AUTHORIZATION, self.authorization.as_str()),
            (DATE, self.date.as_str()),
            (HOST, self.host.as_str()),
            (CONTENT_MD5, self.content_md5.as_str()),
            (CONTENT_TYPE, self.content_type.as_str()),
        ]
    }
}

/// Derive the `Host` header value from a base URL.
///
/// Strips the `https://` scheme (or `http://`) and any trailing slash.
pub fn host_from_base_url(base_url: &str) -> &str {
    let host = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"))
        .unwrap_or(base_url);
    host.trim_end_matches('/')
}

impl RequestSigner<'_> {
    /// Build the signed header set dated now.
    ///
    /// `body` must be the exact bytes that will be transmitted, see
    /// [`encode_json_body`](crate::encode_json_body).
    pub fn build_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<&[u8]>,
        content_type: &str,
        host: &str,
    ) -> Result<SignedHeaders, AuthError> {
        self.build_headers_at(method, path, body, content_type, host, Utc::now())
    }

    /// Build the signed header set for a fixed instant.
    pub fn build_headers_at(
        &self,
        method: &str,
        path: &str,
        body: Option<&[u8]>,
        content_type: &str,
        host: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, AuthError> {
        let date = http_date(now);
        self.emit(TraceEvent::Date(&date));

        let content_md5 = content_md5(body);
        self.emit(TraceEvent::ContentMd5(&content_md5));

        let signature = self.sign(&SigningInput {
            method,
            content_md5: &content_md5,
            content_type,
            date: &date,
            path,
        })?;

        let authorization = self.authorization(&signature);
        self.emit(TraceEvent::Authorization(&authorization));
        self.emit(TraceEvent::Host(host));

        let headers = SignedHeaders {
            authorization,
            date,
            host: host.to_string(),
            content_md5,
            content_type: content_type.to_string(),
        };

        for (name, value) in headers.as_pairs() {
            if !is_valid_header_value(value) {
                return Err(AuthError::InvalidHeaderValue { name });
            }
        }

        Ok(headers)
    }
}

fn is_valid_header_value(value: &str) -> bool {
    value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}
