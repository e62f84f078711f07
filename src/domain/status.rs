use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical payment status of an order, as understood by the gateway.
///
/// The string form follows the gateway's own labels (`OK`, `ERR`, `CBACK`, ...),
/// which is what order-management integrations persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "AUTHORIZED")]
    Authorized,
    #[serde(rename = "OK")]
    Success,
    #[serde(rename = "ERR")]
    Error,
    #[serde(rename = "REFUND")]
    Refund,
    #[serde(rename = "CBACK")]
    Chargeback,
}

impl StatusCode {
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Open,
        StatusCode::Authorized,
        StatusCode::Success,
        StatusCode::Error,
        StatusCode::Refund,
        StatusCode::Chargeback,
    ];

    /// Maps a raw gateway status token onto a canonical status.
    ///
    /// Only `"00"`, `"01"` and `"02"` are known; anything else is `None` and must
    /// never be applied to an order.
    pub fn resolve(raw: &str) -> Option<StatusCode> {
        match raw {
            "00" => Some(StatusCode::Open),
            "01" => Some(StatusCode::Success),
            "02" => Some(StatusCode::Error),
            _ => None,
        }
    }

    /// Whether an order currently in `current` may move to `self`.
    pub fn can_replace(self, current: StatusCode) -> bool {
        use StatusCode::*;

        match self {
            Success => matches!(current, Error | Authorized | Open),
            Open => current == Open,
            Authorized => current == Open,
            Error => matches!(current, Open | Authorized),
            Chargeback => current == Success,
            Refund => current == Success,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Open => "OPEN",
            StatusCode::Authorized => "AUTHORIZED",
            StatusCode::Success => "OK",
            StatusCode::Error => "ERR",
            StatusCode::Refund => "REFUND",
            StatusCode::Chargeback => "CBACK",
        }
    }
}

/// Transition guard for callers holding a possibly unresolved status.
///
/// An unresolved new status never transitions.
pub fn can_transition(new_status: Option<StatusCode>, current: StatusCode) -> bool {
    new_status.is_some_and(|status| status.can_replace(current))
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    /// Accepts the gateway label (`OK`) as well as the canonical name (`SUCCESS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(StatusCode::Open),
            "AUTHORIZED" => Ok(StatusCode::Authorized),
            "OK" | "SUCCESS" => Ok(StatusCode::Success),
            "ERR" | "ERROR" => Ok(StatusCode::Error),
            "REFUND" => Ok(StatusCode::Refund),
            "CBACK" | "CHARGEBACK" => Ok(StatusCode::Chargeback),
            other => Err(format!("unknown status code: {other}")),
        }
    }
}
