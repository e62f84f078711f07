use super::verdict_writer::Verdict;
use crate::application::validator::NotificationValidator;
use crate::domain::notification::{RawParams, RequestMethod};
use crate::domain::status::StatusCode;
use crate::error::{NotifyError, Result};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CallbackMode {
    Postback,
    Result,
}

/// One captured gateway callback, as stored for audit or replay.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CapturedCallback {
    pub mode: CallbackMode,
    /// Taken verbatim. A missing method never satisfies the `GET` check.
    #[serde(default)]
    pub method: Option<String>,
    pub query: String,
    /// Status the order had when the callback arrived, if known.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub current_status: Option<StatusCode>,
}

fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<Option<StatusCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl CapturedCallback {
    pub fn method(&self) -> RequestMethod {
        let Ok(method) = self.method.as_deref().unwrap_or_default().parse::<RequestMethod>();
        method
    }

    /// Runs the callback through `validator` and reports the outcome.
    pub fn replay(&self, validator: &NotificationValidator) -> Verdict {
        let params = RawParams::from_query(&self.query);
        let outcome = match self.mode {
            CallbackMode::Postback => validator.validate_postback(&params),
            CallbackMode::Result => validator.validate_result_page(&params, &self.method()),
        };

        match outcome {
            Ok(verified) => {
                let applicable = self
                    .current_status
                    .map(|current| validator.can_update_status(&verified, current));
                Verdict::verified(&verified, applicable)
            }
            Err(reason) => Verdict::rejected(&params, &reason),
        }
    }
}

pub struct CallbackReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallbackReader<R> {
    /// Creates a new `CallbackReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes captured callbacks.
    pub fn callbacks(self) -> impl Iterator<Item = Result<CapturedCallback>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(NotifyError::from))
    }
}
