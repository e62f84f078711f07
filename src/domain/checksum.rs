use crate::domain::notification::{FAILED_STATUS, Notification, SecretCode};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Computes the digest the gateway attaches to a callback.
///
/// Field values are concatenated in byte-wise order of their parameter names,
/// `failure_reason` joins the set for failed payments, and the secret is
/// prepended. The SHA-256 digest is returned as uppercase hex.
pub fn compute(notification: &Notification, secret: &SecretCode) -> String {
    let merchant_id = notification.merchant_id().to_string();
    let mut fields: Vec<(&str, &str)> = vec![
        ("amount", notification.amount()),
        ("currency", notification.currency()),
        ("invoice_id", notification.invoice_id()),
        ("merchant_id", merchant_id.as_str()),
        ("trans_time", notification.trans_time()),
        ("trans_date", notification.trans_date()),
        ("status", notification.status()),
        ("ref_no", notification.ref_no()),
        ("order_no", notification.order_no()),
    ];
    if notification.status() == FAILED_STATUS {
        fields.push(("failure_reason", notification.failure_reason().unwrap_or_default()));
    }
    fields.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut hasher = Sha256::new();
    hasher.update(secret.expose().as_bytes());
    for (_, value) in &fields {
        hasher.update(value.as_bytes());
    }
    hex::encode_upper(hasher.finalize())
}

/// Exact, case-sensitive comparison of a supplied digest against the expected one.
pub fn matches(expected: &str, supplied: &str) -> bool {
    expected.len() == supplied.len() && bool::from(expected.as_bytes().ct_eq(supplied.as_bytes()))
}
