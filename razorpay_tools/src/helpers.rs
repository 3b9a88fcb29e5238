//! Payment signature calculation.
//!
//! After a successful checkout, Razorpay hands the storefront a signature over
//! `"{gateway_order_id}|{payment_id}"`, keyed with the merchant's key secret. A backend must
//! recompute that HMAC-SHA256 and compare before trusting the payment claim.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 payment signature for the given gateway order and payment.
pub fn payment_signature(gateway_order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    to_hex(&mac.finalize().into_bytes())
}

/// Checks a signature supplied by a client against the expected value. The comparison is
/// constant-time so that a forger learns nothing from response latency.
pub fn verify_payment_signature(gateway_order_id: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
    let expected = payment_signature(gateway_order_id, payment_id, secret);
    constant_time_eq(expected.as_bytes(), signature.trim().to_lowercase().as_bytes())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{b:02x}");
        s
    })
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
