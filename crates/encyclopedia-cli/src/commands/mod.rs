//! Subcommand handlers.
//!
//! `main.rs` parses arguments and dispatches here; each module owns one
//! subcommand.

pub mod export;
pub mod item;
pub mod search;
pub mod settings;

use anyhow::{Context, Result};
use tracing::debug;

use encyclopedia_lib::{DatasetSource, Session, Settings};

use crate::GlobalOptions;

/// Load persisted settings, with the global `--lang` applied on top.
pub fn effective_settings(global: &GlobalOptions) -> Result<Settings> {
    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(lang) = &global.lang {
        settings.language = lang.clone();
    }
    Ok(settings)
}

/// Open a session over the resolved data source.
pub fn open_session(global: &GlobalOptions) -> Result<Session> {
    let source = DatasetSource::resolve(global.data_dir.as_deref(), global.data_url.as_deref())
        .context("failed to locate the item datasets")?;
    debug!(%source, "resolved dataset source");
    let settings = effective_settings(global)?;
    let session = Session::open(source.clone(), &settings)
        .with_context(|| format!("failed to load reference tables from {source}"))?;
    if session.data().strings.is_none() {
        tracing::warn!(
            language = %settings.language,
            "no strings for language; names will show localization keys"
        );
    }
    Ok(session)
}

/// Open a session and fetch the item table, failing if it cannot be loaded.
pub fn open_session_with_items(global: &GlobalOptions) -> Result<Session> {
    let mut session = open_session(global)?;
    if !session.fetch_items() {
        anyhow::bail!("failed to load items from {}", session.source());
    }
    Ok(session)
}
