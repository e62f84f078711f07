use crate::application::validator::VerifiedNotification;
use crate::domain::notification::RawParams;
use crate::domain::status::StatusCode;
use crate::error::{RejectReason, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    ChecksumMismatch,
    InvalidMethod,
    UnresolvedStatus,
}

impl From<&RejectReason> for Outcome {
    fn from(reason: &RejectReason) -> Self {
        match reason {
            RejectReason::ChecksumMismatch => Outcome::ChecksumMismatch,
            RejectReason::InvalidMethod { .. } => Outcome::InvalidMethod,
            RejectReason::UnresolvedStatus { .. } => Outcome::UnresolvedStatus,
        }
    }
}

/// One output row of a replay run.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Verdict {
    pub order_no: String,
    pub raw_status: String,
    pub status: Option<StatusCode>,
    pub amount: Option<Decimal>,
    pub verdict: Outcome,
    /// Transition guard result against the order's current status.
    pub applicable: Option<bool>,
}

impl Verdict {
    /// An authentic callback. Its status token may still be one the gateway
    /// does not define, which is reported as `unresolved_status`.
    pub fn verified(verified: &VerifiedNotification, applicable: Option<bool>) -> Self {
        let notification = verified.notification();
        let verdict = match verified.status_code() {
            Ok(_) => Outcome::Accepted,
            Err(reason) => Outcome::from(&reason),
        };
        Self {
            order_no: notification.order_no().to_string(),
            raw_status: notification.status().to_string(),
            status: verified.status(),
            amount: notification.amount_value(),
            verdict,
            applicable,
        }
    }

    /// Rejected rows echo the unauthenticated order number for correlation only.
    pub fn rejected(params: &RawParams, reason: &RejectReason) -> Self {
        Self {
            order_no: params.get_or_empty("order_no"),
            raw_status: params.get_or_empty("status"),
            status: None,
            amount: None,
            verdict: Outcome::from(reason),
            applicable: None,
        }
    }
}

pub struct VerdictWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> VerdictWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_verdict(&mut self, verdict: &Verdict) -> Result<()> {
        self.writer.serialize(verdict)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
