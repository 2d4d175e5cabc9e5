//! Webhook payload signatures.
//!
//! GitHub signs the raw request body with the shared secret and sends the
//! digest as `X-Hub-Signature-256: sha256=<hex>` and, for older hooks,
//! `X-Hub-Signature: sha1=<hex>`.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;

pub const SHA256_HEADER: &str = "X-Hub-Signature-256";
pub const SHA1_HEADER: &str = "X-Hub-Signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("No X-Hub-Signature found on request")]
    Missing,

    #[error("unsupported signature algorithm `{0}`")]
    Algorithm(String),

    #[error("signature is not valid hex")]
    Encoding,

    #[error("X-Hub-Signature does not match blob signature")]
    Mismatch,
}

/// A decoded signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Sha1(Vec<u8>),
    Sha256(Vec<u8>),
}

impl Signature {
    /// Parse `sha1=<hex>` or `sha256=<hex>`.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let (algorithm, digest) = header
            .trim()
            .split_once('=')
            .ok_or_else(|| SignatureError::Algorithm(header.trim().to_string()))?;
        let digest = hex::decode(digest).map_err(|_| SignatureError::Encoding)?;

        match algorithm.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256(digest)),
            "sha1" => Ok(Self::Sha1(digest)),
            other => Err(SignatureError::Algorithm(other.to_string())),
        }
    }

    /// Pick the strongest signature a request carries.
    ///
    /// `lookup` returns the value of a header by name.
    pub fn from_headers<'a>(
        lookup: impl Fn(&str) -> Option<&'a str>,
    ) -> Result<Self, SignatureError> {
        lookup(SHA256_HEADER)
            .or_else(|| lookup(SHA1_HEADER))
            .ok_or(SignatureError::Missing)
            .and_then(Self::parse)
    }

    /// Check `body` against this signature in constant time.
    pub fn verify(&self, secret: &[u8], body: &[u8]) -> Result<(), SignatureError> {
        let verified = match self {
            Self::Sha256(digest) => verify_with::<Hmac<Sha256>>(secret, body, digest),
            Self::Sha1(digest) => verify_with::<Hmac<Sha1>>(secret, body, digest),
        };
        if verified {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

fn verify_with<M: Mac + hmac::digest::KeyInit>(secret: &[u8], body: &[u8], digest: &[u8]) -> bool {
    let Ok(mut mac) = <M as Mac>::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(digest).is_ok()
}

#[cfg(test)]
pub(crate) fn sign_sha256(secret: &[u8], body: &[u8]) -> String {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
pub(crate) fn sign_sha1(secret: &[u8], body: &[u8]) -> String {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(secret).unwrap();
    mac.update(body);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}
