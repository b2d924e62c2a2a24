//! Errors surfaced by the client core.
//!
//! - [`ClientError`] for anything that went over the wire.
//! - [`ValidationError`] for local form checks; these never reach the network.
//! - [`StoreError`] for the durable session store.
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

const GENERIC_FAILURE: &str = "Terjadi kesalahan. Silakan coba lagi.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("no active session")]
    NoSession,
}

impl ClientError {
    /// Message shown to the user in a toast or inline.
    ///
    /// Backend messages are passed through verbatim; everything else maps to
    /// a fixed Indonesian string.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized | Self::NoSession => {
                "Sesi berakhir. Silakan masuk kembali.".to_string()
            }
            Self::NotFound(message) | Self::Validation(message) => non_empty_or_generic(message),
            Self::Server { message, .. } => non_empty_or_generic(message),
            Self::Timeout => "Permintaan melebihi batas waktu.".to_string(),
            Self::Transport(_) => "Server tidak dapat dihubungi.".to_string(),
            Self::Decode(_) | Self::BaseUrl(_) => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NoSession)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

fn non_empty_or_generic(message: &str) -> String {
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message.to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Local form validation failure. Messages are user-facing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} wajib diisi.")]
    Required(&'static str),
    #[error("{0} harus berupa angka.")]
    NotNumeric(&'static str),
    #[error("{0} harus lebih dari 0.")]
    NotPositive(&'static str),
    #[error("Tanggal mulai tidak boleh setelah tanggal selesai.")]
    DateRange,
    #[error("Format tanggal {0} tidak valid (YYYY-MM-DD).")]
    InvalidDate(&'static str),
    #[error("Format email tidak valid.")]
    InvalidEmail,
    #[error("Kata sandi minimal {0} karakter.")]
    PasswordTooShort(usize),
    #[error("Konfirmasi kata sandi tidak cocok.")]
    PasswordMismatch,
    #[error("Kode OTP harus 6 digit angka.")]
    InvalidOtp,
    #[error("Sesi tidak ditemukan. Silakan masuk kembali.")]
    MissingUser,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_passed_through() {
        let err = ClientError::Validation("Saldo dompet tidak cukup".to_string());
        assert_eq!(err.user_message(), "Saldo dompet tidak cukup");
    }

    #[test]
    fn empty_backend_message_falls_back_to_generic() {
        let err = ClientError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn validation_messages_are_indonesian() {
        assert_eq!(
            ValidationError::Required("Jumlah").to_string(),
            "Jumlah wajib diisi."
        );
        assert_eq!(
            ValidationError::DateRange.to_string(),
            "Tanggal mulai tidak boleh setelah tanggal selesai."
        );
    }
}
