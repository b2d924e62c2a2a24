mod app;
mod config;
mod error;
mod ui;

use std::{fs::File, sync::Mutex};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // stdout belongs to the TUI, so logs go to a file in the state dir.
    std::fs::create_dir_all(&config.state_dir)?;
    let log_file = File::create(config.state_dir.join("dompet.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dompet_tui={level},dompet_client={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let ctx = app::AppContext::new(&config)?;
    tracing::info!(base_url = %config.base_url, "starting dompet");
    let mut app = app::App::new(config, ctx)?;
    app.run().await?;
    Ok(())
}
