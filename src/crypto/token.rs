use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Random bytes per secret; 30 bytes encode to exactly 40 base64 characters.
const SECRET_SIZE: usize = 30;

/// A freshly generated secret and the digest that gets persisted.
pub struct GeneratedSecret {
    pub plaintext: String,
    pub digest: String,
}

/// Generates a new random URL-safe secret.
pub fn generate_secret() -> GeneratedSecret {
    let mut bytes = [0u8; SECRET_SIZE];
    OsRng.fill_bytes(&mut bytes);

    let plaintext = general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    let digest = digest(&plaintext);
    GeneratedSecret { plaintext, digest }
}

/// Hex SHA-256 of a secret.
pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Compares two digests without leaking the position of the first mismatch.
pub fn digests_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

/// Renders the bearer string handed to the client: `<token id>|<secret>`.
pub fn format_bearer(token_id: i64, secret: &str) -> String {
    format!("{}|{}", token_id, secret)
}

/// Splits a bearer string into its token id and secret.
pub fn parse_bearer(bearer: &str) -> Option<(i64, &str)> {
    let (id, secret) = bearer.split_once('|')?;
    let id = id.parse().ok()?;
    if secret.is_empty() {
        return None;
    }
    Some((id, secret))
}
