//! `Date` header formatting.

use chrono::{DateTime, Utc};

/// RFC 1123 style layout used in the `Date` header and the canonical string.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a UTC instant as e.g. `Wed, 21 Oct 2015 07:28:00 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}
