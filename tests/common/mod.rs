#![allow(dead_code)]

use paynotify::application::validator::NotificationValidator;
use paynotify::domain::notification::MerchantCredentials;
use paynotify::infrastructure::in_memory::InMemoryLogger;

pub const SECRET: &str = "S3CR3T";
pub const MERCHANT_ID: u64 = 123;

/// SHA-256 of "S3CR3T1000USDINV1123ORD1REF10120240101120000".
pub const SCENARIO_A_DIGEST: &str =
    "241CF756F034EE972BD2B3CEC9009BBD1B5140CC07CDA4223997C58D0BC901D4";

/// SHA-256 of "S3CR3T1000USDinsufficient_fundsINV1123ORD1REF10220240101120000".
pub const SCENARIO_B_DIGEST: &str =
    "C8F8265A2838B6D7EA10E87C9E36D1C3BBDF6898B6ADFE18C218CB1E566B31CD";

pub fn scenario_a(hash: &str) -> Vec<(&'static str, String)> {
    vec![
        ("status", "01".to_string()),
        ("order_no", "ORD1".to_string()),
        ("ref_no", "REF1".to_string()),
        ("hash", hash.to_string()),
        ("amount", "1000".to_string()),
        ("currency", "USD".to_string()),
        ("invoice_id", "INV1".to_string()),
        ("trans_time", "120000".to_string()),
        ("trans_date", "20240101".to_string()),
    ]
}

pub fn scenario_b(hash: &str) -> Vec<(&'static str, String)> {
    let mut pairs = scenario_a(hash);
    pairs[0].1 = "02".to_string();
    pairs.push(("failure_reason", "insufficient_funds".to_string()));
    pairs
}

pub fn to_query(pairs: &[(&str, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

pub fn validator() -> (NotificationValidator, InMemoryLogger) {
    let logger = InMemoryLogger::new();
    let validator = NotificationValidator::new(
        MerchantCredentials::new(MERCHANT_ID, SECRET),
        Box::new(logger.clone()),
    );
    (validator, logger)
}
