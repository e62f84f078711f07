use crate::domain::checksum;
use crate::domain::notification::{MerchantCredentials, Notification, RawParams, RequestMethod};
use crate::domain::ports::{CredentialsProvider, LogLevel, NotificationLoggerBox};
use crate::domain::status::{StatusCode, can_transition};
use crate::error::RejectReason;

/// A callback whose digest matched the merchant's secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedNotification {
    notification: Notification,
    status: Option<StatusCode>,
}

impl VerifiedNotification {
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Resolved status, `None` when the gateway sent an unknown token.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn status_code(&self) -> Result<StatusCode, RejectReason> {
        self.status.ok_or_else(|| RejectReason::UnresolvedStatus {
            raw: self.notification.status().to_string(),
        })
    }
}

/// Authenticates inbound gateway callbacks.
///
/// Holds the merchant credentials and the logger for its whole lifetime and no
/// other state, so a single validator can serve concurrent requests.
pub struct NotificationValidator {
    credentials: MerchantCredentials,
    logger: NotificationLoggerBox,
}

impl NotificationValidator {
    /// Creates a new `NotificationValidator`.
    ///
    /// # Arguments
    ///
    /// * `credentials` - The merchant id and shared secret.
    /// * `logger` - Receives one record per validation step.
    pub fn new(credentials: MerchantCredentials, logger: NotificationLoggerBox) -> Self {
        Self {
            credentials,
            logger,
        }
    }

    pub fn from_provider(
        provider: &impl CredentialsProvider,
        logger: NotificationLoggerBox,
    ) -> Self {
        Self::new(provider.credentials(), logger)
    }

    /// Validates a server-to-server postback. Any HTTP method is accepted.
    pub fn validate_postback(
        &self,
        params: &RawParams,
    ) -> Result<VerifiedNotification, RejectReason> {
        self.logger.log(
            LogLevel::Transaction,
            &format!("Postback: {}", params.to_log_string()),
        );
        self.verify(params)
    }

    /// Validates the browser redirect to the success or error page.
    ///
    /// Only `GET` is allowed; other methods are rejected before any hashing.
    pub fn validate_result_page(
        &self,
        params: &RawParams,
        method: &RequestMethod,
    ) -> Result<VerifiedNotification, RejectReason> {
        self.logger.log(
            LogLevel::Notice,
            &format!("Page data: {}", params.to_log_string()),
        );

        if *method != RequestMethod::Get {
            self.logger
                .log(LogLevel::Error, &format!("Invalid request method: {method}"));
            return Err(RejectReason::InvalidMethod {
                method: method.to_string(),
            });
        }

        self.verify(params)
    }

    /// Whether the verified status may be applied to an order currently in
    /// `current`. The caller still owns the atomic write of the new status.
    pub fn can_update_status(&self, verified: &VerifiedNotification, current: StatusCode) -> bool {
        if verified.status.is_none() {
            self.logger.log(LogLevel::Error, "Status not set");
            return false;
        }
        can_transition(verified.status, current)
    }

    fn verify(&self, params: &RawParams) -> Result<VerifiedNotification, RejectReason> {
        let notification = Notification::from_params(params, self.credentials.merchant_id);
        let expected = checksum::compute(&notification, &self.credentials.secret_code);

        if !checksum::matches(&expected, notification.hash()) {
            self.logger.log(
                LogLevel::Error,
                &format!("Checksum mismatch for order {:?}", notification.order_no()),
            );
            return Err(RejectReason::ChecksumMismatch);
        }

        self.logger.log(LogLevel::Transaction, &notification.transaction_summary());

        let status = notification.status_code();
        Ok(VerifiedNotification {
            notification,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::LogRecord;
    use crate::infrastructure::in_memory::InMemoryLogger;

    const SECRET: &str = "S3CR3T";
    const DIGEST_A: &str = "241CF756F034EE972BD2B3CEC9009BBD1B5140CC07CDA4223997C58D0BC901D4";

    fn params(hash: &str) -> RawParams {
        RawParams::from_query(&format!(
            "status=01&order_no=ORD1&ref_no=REF1&hash={hash}&amount=1000&currency=USD\
             &invoice_id=INV1&trans_time=120000&trans_date=20240101"
        ))
    }

    fn validator() -> (NotificationValidator, InMemoryLogger) {
        let logger = InMemoryLogger::new();
        let validator = NotificationValidator::new(
            MerchantCredentials::new(123, SECRET),
            Box::new(logger.clone()),
        );
        (validator, logger)
    }

    #[test]
    fn test_postback_accepts_matching_digest() {
        let (validator, logger) = validator();
        let verified = validator.validate_postback(&params(DIGEST_A)).unwrap();

        assert_eq!(verified.notification().order_no(), "ORD1");
        assert_eq!(verified.status(), Some(StatusCode::Success));
        assert_eq!(verified.status_code(), Ok(StatusCode::Success));

        let records = logger.records();
        assert_eq!(records[0].level, LogLevel::Transaction);
        assert!(records[0].message.starts_with("Postback: "));
        assert!(records.iter().all(|r| r.level != LogLevel::Error));
    }

    #[test]
    fn test_postback_rejects_mismatch() {
        let (validator, logger) = validator();
        let result = validator.validate_postback(&params("0000"));

        assert_eq!(result, Err(RejectReason::ChecksumMismatch));
        let errors: Vec<LogRecord> = logger
            .records()
            .into_iter()
            .filter(|r| r.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Checksum mismatch"));
    }

    #[test]
    fn test_postback_rejects_lowercase_digest() {
        let (validator, _) = validator();
        let result = validator.validate_postback(&params(&DIGEST_A.to_lowercase()));
        assert_eq!(result, Err(RejectReason::ChecksumMismatch));
    }

    #[test]
    fn test_postback_rejects_missing_hash() {
        let (validator, _) = validator();
        let params = RawParams::from_query("status=01&order_no=ORD1");
        let result = validator.validate_postback(&params);
        assert_eq!(result, Err(RejectReason::ChecksumMismatch));
    }

    #[test]
    fn test_result_page_requires_get() {
        let (validator, logger) = validator();
        let result = validator.validate_result_page(&params(DIGEST_A), &RequestMethod::Post);

        assert_eq!(
            result,
            Err(RejectReason::InvalidMethod {
                method: "POST".to_string()
            })
        );
        let records = logger.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, LogLevel::Notice);
        assert_eq!(records[1].level, LogLevel::Error);
        assert!(records[1].message.contains("Invalid request method"));
    }

    #[test]
    fn test_result_page_rejects_lowercase_get() {
        let (validator, _) = validator();
        for raw in ["get", " Get ", "gEt"] {
            let method: RequestMethod = raw.parse().unwrap();
            assert_eq!(
                validator.validate_result_page(&params(DIGEST_A), &method),
                Err(RejectReason::InvalidMethod {
                    method: raw.to_string()
                })
            );
        }
    }

    #[test]
    fn test_result_page_accepts_get() {
        let (validator, logger) = validator();
        let verified = validator
            .validate_result_page(&params(DIGEST_A), &RequestMethod::Get)
            .unwrap();

        assert_eq!(verified.status(), Some(StatusCode::Success));
        assert!(logger.records()[0].message.starts_with("Page data: "));
    }

    #[test]
    fn test_secret_never_logged() {
        let (validator, logger) = validator();
        let _ = validator.validate_postback(&params(DIGEST_A));
        let _ = validator.validate_postback(&params("bad"));
        assert!(logger.records().iter().all(|r| !r.message.contains(SECRET)));
    }

    #[test]
    fn test_can_update_status() {
        let (validator, logger) = validator();
        let verified = validator.validate_postback(&params(DIGEST_A)).unwrap();

        assert!(validator.can_update_status(&verified, StatusCode::Open));
        assert!(validator.can_update_status(&verified, StatusCode::Error));
        assert!(!validator.can_update_status(&verified, StatusCode::Success));
        assert!(!validator.can_update_status(&verified, StatusCode::Refund));
        assert!(logger.records().iter().all(|r| r.message != "Status not set"));
    }

    #[test]
    fn test_unresolved_status_is_verified_but_not_applicable() {
        let logger = InMemoryLogger::new();
        let credentials = MerchantCredentials::new(123, SECRET);
        let validator = NotificationValidator::new(credentials.clone(), Box::new(logger.clone()));

        let mut raw = params("");
        raw.insert("status", "99");
        let notification = Notification::from_params(&raw, 123);
        raw.insert("hash", checksum::compute(&notification, &credentials.secret_code));

        let verified = validator.validate_postback(&raw).unwrap();
        assert_eq!(verified.status(), None);
        assert_eq!(
            verified.status_code(),
            Err(RejectReason::UnresolvedStatus {
                raw: "99".to_string()
            })
        );
        assert!(!validator.can_update_status(&verified, StatusCode::Success));
        assert!(logger.records().iter().any(|r| r.message == "Status not set"));
    }
}
