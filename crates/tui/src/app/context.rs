use std::{fs, sync::Arc};

use dompet_client::{ApiClient, Session};

use crate::{config::AppConfig, error::Result, ui::Theme};

/// Long-lived handles built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub session: Arc<Session>,
    pub api: ApiClient,
    pub theme: Theme,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        fs::create_dir_all(&config.state_dir)?;
        let session = Arc::new(Session::with_state_dir(&config.state_dir));
        let api = ApiClient::new(&config.base_url, config.timeouts(), session.clone())?;
        Ok(Self {
            session,
            api,
            theme: Theme::named(config.theme),
        })
    }
}
