//! Request Fingerprint Module
//!
//! Derives the cache key for a chat request. The key is a SHA-256 digest over
//! the prompt and the request parameters sorted by name, so permuting the
//! parameters never changes the key while any change to the prompt or a
//! parameter value does.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Auxiliary request parameters, ordered by name.
pub type Params = BTreeMap<String, Value>;

// == Fingerprint ==
/// Fixed-length digest identifying a cacheable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 16 hex characters, enough to tell requests apart in logs.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// == Fingerprint Function ==
/// Computes the fingerprint of `prompt` plus `params`.
///
/// Parameters may arrive in any order; duplicates resolve last-wins. Values
/// are hashed as compact JSON. Every field is length-prefixed, so a separator
/// inside the prompt cannot be confused with a parameter boundary.
pub fn fingerprint<I, K, V>(prompt: &str, params: I) -> Fingerprint
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let canonical: Params = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let mut hasher = Sha256::new();
    write_field(&mut hasher, prompt.as_bytes());
    hasher.update((canonical.len() as u64).to_le_bytes());
    for (name, value) in &canonical {
        write_field(&mut hasher, name.as_bytes());
        write_field(&mut hasher, value.to_string().as_bytes());
    }

    Fingerprint(hasher.finalize().into())
}

/// Computes the fingerprint of a prompt with an already-ordered parameter map.
pub fn fingerprint_params(prompt: &str, params: &Params) -> Fingerprint {
    fingerprint(prompt, params.iter().map(|(k, v)| (k.as_str(), v.clone())))
}

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
