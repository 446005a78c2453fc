use super::feedback::{Feedback, SHASIGN};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// The SHA-OUT passphrase shared with the processor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    #[default]
    Sha512,
}

impl HashAlgorithm {
    /// Lowercase hex digest of `input`.
    pub fn hex_digest(self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha1 => hex::encode(Sha1::digest(input)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(input)),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(format!("unsupported hash algorithm: {other}")),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha1 => f.write_str("sha1"),
            HashAlgorithm::Sha256 => f.write_str("sha256"),
            HashAlgorithm::Sha512 => f.write_str("sha512"),
        }
    }
}

/// A feedback mapping paired with its recomputed signature.
///
/// The signing string embeds the passphrase and is left out of `Debug`.
#[derive(Clone)]
pub struct SignedResponse {
    signing_string: String,
    supplied: Option<String>,
    computed: String,
}

impl SignedResponse {
    pub fn signing_string(&self) -> &str {
        &self.signing_string
    }

    pub fn supplied(&self) -> Option<&str> {
        self.supplied.as_deref()
    }

    pub fn computed(&self) -> &str {
        &self.computed
    }

    /// Case-insensitive, constant-time comparison. A missing signature never verifies.
    pub fn is_valid(&self) -> bool {
        match &self.supplied {
            Some(supplied) => {
                let supplied = supplied.to_ascii_lowercase();
                self.computed.as_bytes().ct_eq(supplied.as_bytes()).into()
            }
            None => false,
        }
    }
}

impl fmt::Debug for SignedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedResponse")
            .field("supplied", &self.supplied)
            .field("computed", &self.computed)
            .finish_non_exhaustive()
    }
}

/// Capability of proving a callback came from the processor untampered.
pub trait CallbackVerifiable: Send + Sync {
    fn compose(&self, feedback: &Feedback) -> SignedResponse;

    fn verify(&self, feedback: &Feedback) -> bool {
        self.compose(feedback).is_valid()
    }
}

/// The processor's "all parameters" SHA-OUT composition.
///
/// Every field except the signature takes part: names are upper-cased and a
/// repeated name keeps its last value. Empty values are skipped, pairs are
/// sorted byte-wise by name and each `NAME=VALUE` is followed by the passphrase.
#[derive(Debug, Clone)]
pub struct AllParametersComposer {
    passphrase: Passphrase,
    algorithm: HashAlgorithm,
}

impl AllParametersComposer {
    pub fn new(passphrase: Passphrase, algorithm: HashAlgorithm) -> Self {
        Self {
            passphrase,
            algorithm,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn signing_string(&self, feedback: &Feedback) -> String {
        // Repeated names keep their last value, matching `Feedback::get`.
        let mut fields: BTreeMap<String, &str> = BTreeMap::new();
        for (name, value) in feedback.iter() {
            if !name.eq_ignore_ascii_case(SHASIGN) {
                fields.insert(name.to_ascii_uppercase(), value);
            }
        }

        let passphrase = self.passphrase.expose();
        let mut out = String::new();
        for (name, value) in fields.iter().filter(|(_, value)| !value.is_empty()) {
            out.push_str(name);
            out.push('=');
            out.push_str(value);
            out.push_str(passphrase);
        }
        out
    }

    /// Signature a processor would attach to `feedback`.
    pub fn sign(&self, feedback: &Feedback) -> String {
        self.algorithm
            .hex_digest(self.signing_string(feedback).as_bytes())
    }
}

impl CallbackVerifiable for AllParametersComposer {
    fn compose(&self, feedback: &Feedback) -> SignedResponse {
        let signing_string = self.signing_string(feedback);
        let computed = self.algorithm.hex_digest(signing_string.as_bytes());
        let supplied = feedback
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(SHASIGN))
            .map(|(_, value)| value.to_string())
            .last();
        SignedResponse {
            signing_string,
            supplied,
            computed,
        }
    }
}
