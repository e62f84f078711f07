use crate::domain::status::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw status token the gateway sends for a failed payment. Only this status
/// carries a `failure_reason`.
pub const FAILED_STATUS: &str = "02";

/// Shared secret agreed with the gateway.
///
/// Never printed, never serialized: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretCode(String);

impl SecretCode {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretCode(***)")
    }
}

/// Merchant account details used to authenticate callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MerchantCredentials {
    pub merchant_id: u64,
    pub secret_code: SecretCode,
}

impl MerchantCredentials {
    pub fn new(merchant_id: u64, secret_code: impl Into<String>) -> Self {
        Self {
            merchant_id,
            secret_code: SecretCode::new(secret_code),
        }
    }
}

/// Query parameters of an inbound callback, exactly as received.
///
/// Keys are case-sensitive. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawParams(BTreeMap<String, String>);

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL-encoded query string, with or without the leading `?`.
    ///
    /// Values are decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Absent parameters read as the empty string.
    pub fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON rendering used in log records.
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RawParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// HTTP method the callback arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Other(String),
}

impl RequestMethod {
    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Other(method) => method,
        }
    }
}

impl FromStr for RequestMethod {
    type Err = std::convert::Infallible;

    /// Method tokens are case-sensitive: `get` is not `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => RequestMethod::Get,
            "POST" => RequestMethod::Post,
            _ => RequestMethod::Other(s.to_string()),
        })
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed gateway callback.
///
/// Built once from the raw parameters and never mutated afterwards. Every field
/// is present; missing parameters become empty strings so that a forged request
/// fails on its digest rather than on parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    amount: String,
    currency: String,
    invoice_id: String,
    trans_time: String,
    trans_date: String,
    status: String,
    ref_no: String,
    order_no: String,
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    merchant_id: u64,
}

impl Notification {
    /// Reads the callback fields from `params`. The merchant id always comes from
    /// the merchant's own configuration, never from the request.
    pub fn from_params(params: &RawParams, merchant_id: u64) -> Self {
        let status = params.get_or_empty("status");
        let failure_reason =
            (status == FAILED_STATUS).then(|| params.get_or_empty("failure_reason"));

        Self {
            amount: params.get_or_empty("amount"),
            currency: params.get_or_empty("currency"),
            invoice_id: params.get_or_empty("invoice_id"),
            trans_time: params.get_or_empty("trans_time"),
            trans_date: params.get_or_empty("trans_date"),
            status,
            ref_no: params.get_or_empty("ref_no"),
            order_no: params.get_or_empty("order_no"),
            hash: params.get_or_empty("hash"),
            failure_reason,
            merchant_id,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice_id
    }

    pub fn trans_time(&self) -> &str {
        &self.trans_time
    }

    pub fn trans_date(&self) -> &str {
        &self.trans_date
    }

    /// Raw status token as sent by the gateway.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn ref_no(&self) -> &str {
        &self.ref_no
    }

    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    /// Digest supplied with the callback.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Present only for failed payments.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn merchant_id(&self) -> u64 {
        self.merchant_id
    }

    /// Canonical status, `None` for tokens the gateway does not define.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::resolve(&self.status)
    }

    /// The paid amount as a decimal, for reconciliation against the order total.
    pub fn amount_value(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }

    pub fn transaction_summary(&self) -> String {
        format!(
            "OrderID: {} | Status: {} | StatusCode: {} | RefNo: {} | InvoiceID: {} | Amount: {} {}",
            self.order_no,
            self.status,
            self.status_code().map(|s| s.as_str()).unwrap_or(""),
            self.ref_no,
            self.invoice_id,
            self.amount,
            self.currency,
        )
    }
}
