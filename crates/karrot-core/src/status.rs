//! Request status tracking for one class of asynchronous operation.

use karrot_types::ApiError;
use serde::Serialize;

/// Where an operation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Waiting,
    Success,
    Error,
}

/// `Idle -> Waiting -> {Success, Error}`; a new request starts over at `Waiting`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestStatus {
    is_waiting: bool,
    error: Option<ApiError>,
    success: Option<bool>,
}

impl RequestStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.is_waiting = true;
        self.error = None;
        self.success = None;
    }

    pub fn succeed(&mut self) {
        self.is_waiting = false;
        self.error = None;
        self.success = Some(true);
    }

    pub fn fail(&mut self, error: ApiError) {
        self.is_waiting = false;
        self.error = Some(error);
        self.success = Some(false);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// `None` until a request has completed.
    pub fn success(&self) -> Option<bool> {
        self.success
    }

    pub fn phase(&self) -> Phase {
        if self.is_waiting {
            Phase::Waiting
        } else if self.error.is_some() {
            Phase::Error
        } else if self.success == Some(true) {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    pub fn first_field_error(&self, field: &str) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.first_field_error(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karrot_types::FieldErrors;

    #[test]
    fn lifecycle() {
        let mut status = RequestStatus::new();
        assert_eq!(status.phase(), Phase::Idle);
        assert_eq!(status.success(), None);

        status.begin();
        assert_eq!(status.phase(), Phase::Waiting);
        assert!(status.is_waiting());

        status.succeed();
        assert_eq!(status.phase(), Phase::Success);
        assert_eq!(status.success(), Some(true));
        assert!(status.error().is_none());
    }

    #[test]
    fn failure_clears_success_and_retry_clears_error() {
        let mut status = RequestStatus::new();
        status.begin();
        status.succeed();
        status.begin();
        status.fail(ApiError::transport("connection reset"));

        assert_eq!(status.phase(), Phase::Error);
        assert_eq!(status.success(), Some(false));
        assert!(!status.is_waiting());

        status.begin();
        assert!(status.error().is_none());
        assert_eq!(status.phase(), Phase::Waiting);
    }

    #[test]
    fn field_error_lookup() {
        let mut status = RequestStatus::new();
        status.fail(ApiError::Validation(FieldErrors::single(
            "email",
            "Enter a valid email address.",
        )));

        assert_eq!(
            status.first_field_error("email"),
            Some("Enter a valid email address.")
        );
        assert_eq!(status.first_field_error("group"), None);

        status.reset();
        assert_eq!(status.phase(), Phase::Idle);
    }
}
