//! Session model: where the bearer token lives and who it belongs to.
//!
//! The token is kept in exactly one of two stores, picked at sign-in time by
//! the "remember me" flag:
//!
//! - [`DurableStore`]: a small JSON file in the client state directory that
//!   survives restarts.
//! - [`EphemeralStore`]: process memory, gone when the client exits.
//!
//! Readers only ever go through [`Session`]. The token signature is never
//! verified here; that is the backend's job.
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use api_types::Id;
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;

pub use api_types::auth::Claims as Identity;

/// base64url, accepting payload segments with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub trait SessionStore: fmt::Debug + Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct EphemeralStore {
    token: Mutex<Option<String>>,
}

impl SessionStore for EphemeralStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside `state_dir`.
    pub fn in_dir(state_dir: impl AsRef<Path>) -> Self {
        Self::new(state_dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredSession, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSession::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, stored: &StoredSession) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(stored)?)?;
        Ok(())
    }
}

impl SessionStore for DurableStore {
    fn load(&self) -> Option<String> {
        match self.read() {
            Ok(stored) => stored.token.filter(|token| !token.is_empty()),
            Err(err) => {
                tracing::debug!("durable session store unreadable: {err}");
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.write(&StoredSession {
            token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    durable: Box<dyn SessionStore>,
    ephemeral: Box<dyn SessionStore>,
}

impl Session {
    pub fn new(durable: impl SessionStore + 'static, ephemeral: impl SessionStore + 'static) -> Self {
        Self {
            durable: Box::new(durable),
            ephemeral: Box::new(ephemeral),
        }
    }

    /// Durable store in `state_dir`, ephemeral store in memory.
    pub fn with_state_dir(state_dir: impl AsRef<Path>) -> Self {
        Self::new(DurableStore::in_dir(state_dir), EphemeralStore::default())
    }

    /// Both stores in memory.
    pub fn in_memory() -> Self {
        Self::new(EphemeralStore::default(), EphemeralStore::default())
    }

    /// Durable store first, then the ephemeral one.
    pub fn token(&self) -> Option<String> {
        self.durable.load().or_else(|| self.ephemeral.load())
    }

    /// Presence of a token is all the gate looks at.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn current_user(&self) -> Option<Identity> {
        match self.token() {
            Some(token) => decode_identity(&token),
            None => {
                tracing::debug!("no session token in either store");
                None
            }
        }
    }

    pub fn user_id(&self) -> Option<Id> {
        self.current_user().map(|identity| identity.user_id)
    }

    /// Stores the token in the store picked by `remember` and clears the other.
    pub fn sign_in(&self, token: &str, remember: bool) -> Result<(), StoreError> {
        if remember {
            self.durable.save(token)?;
            self.ephemeral.clear()?;
        } else {
            self.ephemeral.save(token)?;
            self.durable.clear()?;
        }
        tracing::info!(remember, "session stored");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        // Clear both even if the first one fails.
        let durable = self.durable.clear();
        let ephemeral = self.ephemeral.clear();
        tracing::info!("session cleared");
        durable.and(ephemeral)
    }
}

#[derive(Debug, Error)]
enum DecodeFailure {
    #[error("expected three dot-separated segments")]
    Segments,
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not the expected json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has an empty user_id")]
    EmptyUserId,
}

fn try_decode(token: &str) -> Result<Identity, DecodeFailure> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeFailure::Segments);
    };
    if payload.is_empty() {
        return Err(DecodeFailure::Segments);
    }

    let bytes = URL_SAFE_LENIENT.decode(payload)?;
    let json = String::from_utf8(bytes)?;
    let claims: Identity = serde_json::from_str(&json)?;
    if claims.user_id.is_empty() {
        return Err(DecodeFailure::EmptyUserId);
    }
    Ok(claims)
}

/// Reads the identity out of a token's payload segment.
///
/// Returns `None` for any malformed token; the reason is only logged.
pub fn decode_identity(token: &str) -> Option<Identity> {
    match try_decode(token) {
        Ok(identity) => Some(identity),
        Err(reason) => {
            tracing::debug!("session token rejected: {reason}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
    use uuid::Uuid;

    use super::*;

    pub(crate) fn token_for(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    fn temp_store() -> DurableStore {
        DurableStore::new(std::env::temp_dir().join(format!("dompet_session_{}.json", Uuid::new_v4())))
    }

    #[test]
    fn decodes_string_and_numeric_user_ids() {
        let identity = decode_identity(&token_for(r#"{"user_id":"u-17","exp":1}"#)).unwrap();
        assert_eq!(identity.user_id.as_str(), "u-17");

        let identity = decode_identity(&token_for(r#"{"user_id":42}"#)).unwrap();
        assert_eq!(identity.user_id.as_str(), "42");
    }

    #[test]
    fn decodes_multibyte_utf8_payload() {
        let identity =
            decode_identity(&token_for(r#"{"user_id":"9","name":"Siti Nurhaliza ✓"}"#)).unwrap();
        assert_eq!(identity.name.as_deref(), Some("Siti Nurhaliza ✓"));
    }

    #[test]
    fn accepts_padded_payload_segment() {
        let body = URL_SAFE.encode(r#"{"user_id":"55"}"#);
        assert!(body.ends_with('='));
        let identity = decode_identity(&format!("h.{body}.s")).unwrap();
        assert_eq!(identity.user_id.as_str(), "55");
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        let valid_body = URL_SAFE_NO_PAD.encode(r#"{"user_id":"1"}"#);
        let cases = [
            String::new(),
            "abc".to_string(),
            format!("header.{valid_body}"),
            format!("a.{valid_body}.c.d"),
            "a..c".to_string(),
            "a.!!!not-base64!!!.c".to_string(),
            format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json")),
            format!("a.{}.c", URL_SAFE_NO_PAD.encode(r#"{"email":"x@y.z"}"#)),
            format!("a.{}.c", URL_SAFE_NO_PAD.encode(r#"{"user_id":null}"#)),
            format!("a.{}.c", URL_SAFE_NO_PAD.encode(r#"{"user_id":""}"#)),
            format!("a.{}.c", URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd])),
        ];
        for token in cases {
            assert!(decode_identity(&token).is_none(), "accepted {token:?}");
        }
    }

    #[test]
    fn durable_store_wins_over_ephemeral() {
        let durable = EphemeralStore::default();
        durable.save("durable").unwrap();
        let ephemeral = EphemeralStore::default();
        ephemeral.save("ephemeral").unwrap();
        let session = Session::new(durable, ephemeral);
        assert_eq!(session.token().as_deref(), Some("durable"));
    }

    #[test]
    fn sign_in_clears_the_other_store() {
        let store = temp_store();
        let path = store.path().to_path_buf();
        let session = Session::new(store, EphemeralStore::default());

        session.sign_in("first", true).unwrap();
        assert!(path.exists());
        session.sign_in("second", false).unwrap();
        assert!(!path.exists());
        assert_eq!(session.token().as_deref(), Some("second"));
    }

    #[test]
    fn sign_out_clears_both_and_current_user_is_none() {
        let store = temp_store();
        let session = Session::new(store.clone(), EphemeralStore::default());
        let token = token_for(r#"{"user_id":"3"}"#);

        session.sign_in(&token, true).unwrap();
        assert_eq!(session.user_id().unwrap().as_str(), "3");
        // Simulate a stale ephemeral copy as well.
        session.ephemeral.save(&token).unwrap();

        session.sign_out().unwrap();
        assert!(store.load().is_none());
        assert!(session.ephemeral.load().is_none());
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn corrupt_durable_file_reads_as_absent() {
        let store = temp_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
