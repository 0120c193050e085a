//! RSA request signing for the Kalshi API.
//!
//! Signature format: `RSA-PKCS1v15(SHA256, timestamp + method + path)` → base64.
//! The `path` must NOT include query parameters.

use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;

use common::{Error, Result};

pub const HEADER_ACCESS_KEY: &str = "KALSHI-ACCESS-KEY";
pub const HEADER_ACCESS_SIGNATURE: &str = "KALSHI-ACCESS-SIGNATURE";
pub const HEADER_ACCESS_TIMESTAMP: &str = "KALSHI-ACCESS-TIMESTAMP";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The four headers attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub access_key: String,
    /// Base64 of the raw signature bytes.
    pub signature: String,
    /// Milliseconds since the epoch, decimal.
    pub timestamp: String,
    pub content_type: &'static str,
}

impl SignedHeaders {
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            (HEADER_ACCESS_KEY, self.access_key.clone()),
            (HEADER_ACCESS_SIGNATURE, self.signature.clone()),
            (HEADER_ACCESS_TIMESTAMP, self.timestamp.clone()),
            (HEADER_CONTENT_TYPE, self.content_type.to_string()),
        ]
    }
}

/// Holds the API key id and the parsed RSA private key. Either may be absent,
/// in which case only public endpoints are usable.
#[derive(Clone, Default)]
pub struct KalshiAuth {
    api_key: Option<String>,
    signing_key: Option<SigningKey<Sha256>>,
}

impl std::fmt::Debug for KalshiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiAuth")
            .field("api_key", &self.api_key)
            .field(
                "signing_key",
                &self.signing_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Parse a PEM private key in PKCS#1 or PKCS#8 form.
///
/// The PEM string may contain literal `\n` (two chars) instead of real
/// newlines; both forms are accepted.
pub fn parse_private_key(pem_string: &str) -> Result<RsaPrivateKey> {
    let pem = pem_string.replace("\\n", "\n");
    let pem = pem.trim();

    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| Error::Crypto(format!("Failed to parse RSA private key: {e}")))
}

impl KalshiAuth {
    /// Build a signer from optional credentials. The key, when present, is
    /// parsed here so a malformed key fails at construction.
    pub fn new(api_key: Option<String>, private_key_pem: Option<&str>) -> Result<Self> {
        let signing_key = private_key_pem
            .map(parse_private_key)
            .transpose()?
            .map(SigningKey::<Sha256>::new);

        Ok(Self {
            api_key,
            signing_key,
        })
    }

    /// A signer with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Whether both the key id and the private key are loaded.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.signing_key.is_some()
    }

    /// Sign a request at the current wall-clock time.
    pub fn sign(&self, method: &str, path: &str) -> Result<SignedHeaders> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.sign_at(method, path, timestamp)
    }

    /// Sign a request at a fixed timestamp (milliseconds since epoch).
    ///
    /// The message to sign is: `{timestamp}{METHOD}{path_without_query}`.
    pub fn sign_at(&self, method: &str, path: &str, timestamp_ms: i64) -> Result<SignedHeaders> {
        let (api_key, signing_key) = match (&self.api_key, &self.signing_key) {
            (Some(k), Some(s)) => (k, s),
            (None, _) => {
                return Err(Error::AuthConfig(
                    "API key id is required for authenticated requests".into(),
                ))
            }
            (_, None) => {
                return Err(Error::AuthConfig(
                    "private key is required for authenticated requests".into(),
                ))
            }
        };

        let timestamp = timestamp_ms.to_string();
        let path_clean = path.split('?').next().unwrap_or(path);
        let message = signing_message(&timestamp, method, path_clean);

        let signature = signing_key
            .try_sign(message.as_bytes())
            .map_err(|e| Error::Crypto(format!("Failed to sign request: {e}")))?;

        let sig_b64 = base64::engine::general_purpose::STANDARD.encode(signature.to_bytes());

        Ok(SignedHeaders {
            access_key: api_key.clone(),
            signature: sig_b64,
            timestamp,
            content_type: CONTENT_TYPE_JSON,
        })
    }
}

/// Canonical message: timestamp, method and path concatenated without separators.
pub fn signing_message(timestamp: &str, method: &str, path: &str) -> String {
    format!("{}{}{}", timestamp, method, path)
}
