//! GitHub webhook signatures (`X-Hub-Signature-256`).

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, body: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac
}

/// Returns the header value GitHub would send: `sha256=<hex digest>`.
pub fn sign(body: &[u8], secret: &str) -> String {
    format!(
        "sha256={}",
        hex::encode(mac_for(secret, body).finalize().into_bytes())
    )
}

/// Checks `header` against the HMAC-SHA256 of `body` in constant time.
///
/// Anything other than a well-formed `sha256=<hex>` value fails.
pub fn verify_signature(body: &[u8], secret: &str, header: &str) -> bool {
    let Some(("sha256", provided)) = header.split_once('=') else {
        return false;
    };
    let Ok(provided) = hex::decode(provided) else {
        return false;
    };
    mac_for(secret, body).verify_slice(&provided).is_ok()
}
