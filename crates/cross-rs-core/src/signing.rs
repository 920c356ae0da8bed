//! Signing and reversible encoding of link parameters.
//!
//! ## Overview
//!
//! - [`Signer`]: Signs and verifies strings using HMAC-SHA256.
//! - [`ParamEncryptor`]: The seam link builders use to secure parameter strings.
//! - [`SignedParamEncryptor`]: A [`ParamEncryptor`] that base64-encodes the
//!   parameters and appends a signature, so secured links can be decoded
//!   again but not forged. The parameters stay readable to anyone.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CrossError;

type HmacSha256 = Hmac<Sha256>;

/// The separator used between value and signature.
const DEFAULT_SEP: &str = ":";

/// Separator between payload and signature in secured parameters.
///
/// Never produced by URL-safe base64.
const PARAM_SEP: &str = ".";

// ============================================================
// Signer
// ============================================================

/// Signs and verifies strings using HMAC-SHA256.
///
/// # Examples
///
/// ```
/// use cross_rs_core::signing::Signer;
///
/// let signer = Signer::new("my-secret-key");
/// let signed = signer.sign("hello");
/// assert_eq!(signer.unsign(&signed).unwrap(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    key: String,
    fallback_keys: Vec<String>,
    sep: String,
    salt: String,
}

impl Signer {
    /// Creates a new `Signer` with the given secret key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fallback_keys: Vec::new(),
            sep: DEFAULT_SEP.to_string(),
            salt: "cross.signing.Signer".to_string(),
        }
    }

    /// Sets fallback keys for key rotation.
    #[must_use]
    pub fn with_fallback_keys(mut self, keys: Vec<String>) -> Self {
        self.fallback_keys = keys;
        self
    }

    /// Sets the separator between value and signature.
    #[must_use]
    pub fn with_sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Sets the salt for the HMAC.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    fn make_signature(&self, value: &str, key: &str) -> String {
        let salted_key = format!("{}:{}", self.salt, key);
        let mut mac =
            HmacSha256::new_from_slice(salted_key.as_bytes()).expect("HMAC accepts any key size");
        mac.update(value.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Signs a value, returning `"value<sep>signature"`.
    pub fn sign(&self, value: &str) -> String {
        let sig = self.make_signature(value, &self.key);
        format!("{}{}{}", value, self.sep, sig)
    }

    /// Verifies and returns the original value from a signed string.
    ///
    /// Tries the primary key first, then each fallback key.
    pub fn unsign(&self, signed_value: &str) -> Result<String, CrossError> {
        let (value, sig) = signed_value
            .rsplit_once(&self.sep)
            .ok_or_else(|| CrossError::BadRequest("No separator found in signed value".to_string()))?;

        let verified = std::iter::once(&self.key)
            .chain(&self.fallback_keys)
            .any(|key| constant_time_eq(sig, &self.make_signature(value, key)));

        if verified {
            Ok(value.to_string())
        } else {
            Err(CrossError::BadRequest("Signature verification failed".to_string()))
        }
    }
}

// ============================================================
// Parameter encryption
// ============================================================

/// Reversible transformation applied to the parameter part of secured links.
pub trait ParamEncryptor: Send + Sync {
    /// Transforms a plaintext parameter string into its URL-safe secured form.
    fn encrypt(&self, plaintext: &str) -> String;

    /// Recovers the plaintext from a secured parameter string.
    fn decrypt(&self, secured: &str) -> Result<String, CrossError>;
}

/// Encodes parameters as URL-safe base64 followed by an HMAC signature.
///
/// This protects integrity only. The payload is plain base64, so anyone
/// holding a link can read its parameters; it just cannot change them
/// without the signature failing. Do not put secrets in secured links.
///
/// # Examples
///
/// ```
/// use cross_rs_core::signing::{ParamEncryptor, SignedParamEncryptor};
///
/// let encryptor = SignedParamEncryptor::new("secret");
/// let secured = encryptor.encrypt("id=5");
/// assert_ne!(secured, "id=5");
/// assert_eq!(encryptor.decrypt(&secured).unwrap(), "id=5");
/// ```
#[derive(Debug, Clone)]
pub struct SignedParamEncryptor {
    signer: Signer,
}

impl SignedParamEncryptor {
    /// Creates an encryptor keyed by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            signer: Signer::new(key)
                .with_sep(PARAM_SEP)
                .with_salt("cross.signing.params"),
        }
    }

    /// Accepts parameters secured with any of `keys` as well.
    #[must_use]
    pub fn with_fallback_keys(mut self, keys: Vec<String>) -> Self {
        self.signer = self.signer.with_fallback_keys(keys);
        self
    }
}

impl ParamEncryptor for SignedParamEncryptor {
    fn encrypt(&self, plaintext: &str) -> String {
        self.signer.sign(&URL_SAFE_NO_PAD.encode(plaintext))
    }

    fn decrypt(&self, secured: &str) -> Result<String, CrossError> {
        let encoded = self.signer.unsign(secured)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| CrossError::BadRequest(format!("Base64 decode failed: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| CrossError::BadRequest(format!("Secured parameters are not UTF-8: {e}")))
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
