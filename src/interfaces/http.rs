use crate::domain::feedback::{CallbackRequest, HttpMethod};
use url::form_urlencoded;

/// Decodes an `application/x-www-form-urlencoded` string into ordered pairs.
///
/// A leading `?` is tolerated so a raw query string can be passed as is.
pub fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    let encoded = encoded.strip_prefix('?').unwrap_or(encoded);
    form_urlencoded::parse(encoded.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Builds a `CallbackRequest` from the raw parts of an HTTP request.
pub fn request_from_raw(method: &str, query: &str, body: &str) -> CallbackRequest {
    CallbackRequest {
        method: HttpMethod::parse(method),
        query: decode_pairs(query),
        body: decode_pairs(body),
    }
}

/// Encodes pairs the way a processor would post them.
pub fn encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
