use serde::{Deserialize, Serialize};
use std::fmt;

/// Correlates a callback with the payment record created before the redirect.
pub const PAYMENT_ID: &str = "PAYMENT_ID";
/// The processor's transaction identifier.
pub const PAYID: &str = "PAYID";
/// The processor's status code.
pub const STATUS: &str = "STATUS";
/// The processor's numeric error code.
pub const NCERROR: &str = "NCERROR";
/// The signature over all other fields.
pub const SHASIGN: &str = "SHASIGN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Other,
}

impl HttpMethod {
    pub fn parse(method: &str) -> Self {
        if method.eq_ignore_ascii_case("POST") {
            HttpMethod::Post
        } else if method.eq_ignore_ascii_case("GET") {
            HttpMethod::Get
        } else {
            HttpMethod::Other
        }
    }
}

/// The channel a callback arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Browser redirect back to the merchant. Best effort, untrusted for state.
    Return,
    /// Server-to-server notification. Drives the local state machine.
    Notify,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Return => f.write_str("return"),
            Channel::Notify => f.write_str("notify"),
        }
    }
}

/// Transport-level description of an inbound callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Vec<(String, String)>,
}

impl CallbackRequest {
    pub fn get(query: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Get,
            query,
            body: Vec::new(),
        }
    }

    pub fn post(body: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            query: Vec::new(),
            body,
        }
    }
}

/// The fields of one callback, verbatim and in arrival order.
///
/// Nothing is assumed present. Lookups return `None` for absent fields and
/// repeated names resolve to their last occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feedback {
    fields: Vec<(String, String)>,
}

impl Feedback {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like `get`, but treats an empty value as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.non_empty(PAYMENT_ID)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Feedback {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
