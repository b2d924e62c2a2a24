//! Forgot-password wizard: email → OTP → new password → done.
use std::future::Future;

use api_types::auth::ResetPasswordRequest;

use crate::{
    api::ApiClient,
    error::{ClientError, Result, ValidationError},
    forms::{validate_email, validate_new_password},
};

pub const OTP_LEN: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    Email,
    Otp,
    NewPassword,
    Done,
}

/// Backend calls of the reset flow.
pub trait ResetBackend {
    fn request_otp(&self, email: &str) -> impl Future<Output = Result<()>> + Send;
    fn verify_otp(&self, email: &str, otp: &str) -> impl Future<Output = Result<String>> + Send;
    fn reset_password(
        &self,
        payload: &ResetPasswordRequest,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl ResetBackend for ApiClient {
    async fn request_otp(&self, email: &str) -> Result<()> {
        ApiClient::request_otp(self, email).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<String> {
        ApiClient::verify_otp(self, email, otp).await
    }

    async fn reset_password(&self, payload: &ResetPasswordRequest) -> Result<()> {
        ApiClient::reset_password(self, payload).await
    }
}

/// One validated backend call for the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetCall {
    RequestOtp { email: String },
    VerifyOtp { email: String, otp: String },
    Reset(ResetPasswordRequest),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetReply {
    OtpSent,
    Verified { reset_token: String },
    PasswordChanged,
}

impl ResetCall {
    pub async fn run<B: ResetBackend>(&self, backend: &B) -> Result<ResetReply> {
        match self {
            Self::RequestOtp { email } => {
                backend.request_otp(email).await?;
                Ok(ResetReply::OtpSent)
            }
            Self::VerifyOtp { email, otp } => {
                let reset_token = backend.verify_otp(email, otp).await?;
                Ok(ResetReply::Verified { reset_token })
            }
            Self::Reset(payload) => {
                backend.reset_password(payload).await?;
                Ok(ResetReply::PasswordChanged)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ResetWizard {
    step: ResetStep,
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirmation: String,
    reset_token: Option<String>,
    busy: bool,
    error: Option<String>,
}

impl ResetWizard {
    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Previous step; typed values are kept.
    pub fn back(&mut self) {
        if self.busy {
            return;
        }
        self.error = None;
        self.step = match self.step {
            ResetStep::Email | ResetStep::Otp => ResetStep::Email,
            ResetStep::NewPassword => ResetStep::Otp,
            ResetStep::Done => ResetStep::Done,
        };
    }

    fn local_checks(&self) -> std::result::Result<ResetCall, ValidationError> {
        let email = validate_email(&self.email)?;
        match self.step {
            ResetStep::Email => Ok(ResetCall::RequestOtp { email }),
            ResetStep::Otp => {
                let otp = self.otp.trim();
                if otp.len() != OTP_LEN || !otp.chars().all(|ch| ch.is_ascii_digit()) {
                    return Err(ValidationError::InvalidOtp);
                }
                Ok(ResetCall::VerifyOtp {
                    email,
                    otp: otp.to_string(),
                })
            }
            ResetStep::NewPassword | ResetStep::Done => {
                validate_new_password(&self.password, &self.confirmation)?;
                let reset_token = self.reset_token.clone().ok_or(ValidationError::InvalidOtp)?;
                Ok(ResetCall::Reset(ResetPasswordRequest {
                    email,
                    reset_token,
                    password: self.password.clone(),
                }))
            }
        }
    }

    /// Validates the current step. `None` means there is nothing to send.
    pub fn begin(&mut self) -> Option<ResetCall> {
        if self.busy || self.step == ResetStep::Done {
            return None;
        }
        match self.local_checks() {
            Ok(call) => {
                self.busy = true;
                self.error = None;
                Some(call)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn finish(&mut self, result: std::result::Result<ResetReply, ClientError>) {
        self.busy = false;
        match result {
            Ok(ResetReply::OtpSent) => self.step = ResetStep::Otp,
            Ok(ResetReply::Verified { reset_token }) => {
                self.reset_token = Some(reset_token);
                self.step = ResetStep::NewPassword;
            }
            Ok(ResetReply::PasswordChanged) => {
                tracing::info!("password reset completed");
                self.password.clear();
                self.confirmation.clear();
                self.reset_token = None;
                self.step = ResetStep::Done;
            }
            Err(err) => {
                tracing::debug!(step = ?self.step, "reset step failed: {err}");
                self.error = Some(err.user_message());
            }
        }
    }

    pub async fn advance<B: ResetBackend>(&mut self, backend: &B) -> ResetStep {
        if let Some(call) = self.begin() {
            let result = call.run(backend).await;
            self.finish(result);
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
        reject_otp: bool,
    }

    impl ResetBackend for FakeBackend {
        async fn request_otp(&self, email: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("otp:{email}"));
            Ok(())
        }

        async fn verify_otp(&self, _email: &str, otp: &str) -> Result<String> {
            self.calls.lock().unwrap().push(format!("verify:{otp}"));
            if self.reject_otp {
                return Err(ClientError::Validation("Kode OTP salah".to_string()));
            }
            Ok("reset-abc".to_string())
        }

        async fn reset_password(&self, payload: &ResetPasswordRequest) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("reset:{}", payload.reset_token));
            Ok(())
        }
    }

    #[tokio::test]
    async fn walks_through_every_step() {
        let backend = FakeBackend::default();
        let mut wizard = ResetWizard {
            email: "rina@contoh.id".to_string(),
            ..ResetWizard::default()
        };

        assert_eq!(wizard.advance(&backend).await, ResetStep::Otp);
        wizard.otp = "123456".to_string();
        assert_eq!(wizard.advance(&backend).await, ResetStep::NewPassword);
        wizard.password = "rahasia123".to_string();
        wizard.confirmation = "rahasia123".to_string();
        assert_eq!(wizard.advance(&backend).await, ResetStep::Done);

        assert_eq!(
            *backend.calls.lock().unwrap(),
            vec!["otp:rina@contoh.id", "verify:123456", "reset:reset-abc"]
        );
        assert!(wizard.password.is_empty());
    }

    #[tokio::test]
    async fn malformed_otp_is_rejected_locally() {
        let backend = FakeBackend::default();
        let mut wizard = ResetWizard {
            email: "rina@contoh.id".to_string(),
            ..ResetWizard::default()
        };
        wizard.advance(&backend).await;

        wizard.otp = "12a456".to_string();
        assert_eq!(wizard.advance(&backend).await, ResetStep::Otp);
        assert_eq!(wizard.error(), Some(ValidationError::InvalidOtp.to_string().as_str()));
        assert_eq!(backend.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_call_keeps_the_step() {
        let backend = FakeBackend {
            reject_otp: true,
            ..FakeBackend::default()
        };
        let mut wizard = ResetWizard {
            email: "rina@contoh.id".to_string(),
            otp: "654321".to_string(),
            ..ResetWizard::default()
        };
        wizard.advance(&backend).await;

        assert_eq!(wizard.advance(&backend).await, ResetStep::Otp);
        assert_eq!(wizard.error(), Some("Kode OTP salah"));
        assert!(!wizard.is_busy());
    }

    #[test]
    fn back_returns_to_previous_step() {
        let mut wizard = ResetWizard::default();
        wizard.finish(Ok(ResetReply::OtpSent));
        wizard.finish(Ok(ResetReply::Verified {
            reset_token: "t".to_string(),
        }));
        assert_eq!(wizard.step(), ResetStep::NewPassword);
        wizard.back();
        assert_eq!(wizard.step(), ResetStep::Otp);
        wizard.back();
        wizard.back();
        assert_eq!(wizard.step(), ResetStep::Email);
    }

    #[test]
    fn invalid_email_never_starts_a_call() {
        let mut wizard = ResetWizard {
            email: "bukan-email".to_string(),
            ..ResetWizard::default()
        };
        assert!(wizard.begin().is_none());
        assert!(!wizard.is_busy());
        assert!(wizard.error().is_some());
    }
}
