//! Razorpay payment signature: hex(HMAC-SHA256(key_secret, "<order_id>|<payment_id>")).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, order_id: &str, payment_id: &str) -> HmacSha256 {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac
}

/// Hex digest the gateway is expected to send for this payment.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    hex::encode(mac(secret, order_id, payment_id).finalize().into_bytes())
}

/// Checks a client-supplied signature against the expected digest.
///
/// The supplied hex must decode to exactly the digest bytes; the byte
/// comparison runs in constant time.
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(supplied) = hex::decode(signature) else { return false };
    mac(secret, order_id, payment_id).verify_slice(&supplied).is_ok()
}
