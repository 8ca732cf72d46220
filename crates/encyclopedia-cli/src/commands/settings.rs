//! Settings command handler.

use std::io;

use anyhow::{Context, Result};

use encyclopedia_lib::settings::{config_dir, SETTINGS_FILE};
use encyclopedia_lib::stats::TRAINING_RATE_PRESETS;
use encyclopedia_lib::{Settings, TrainingRate};

use encyclopedia_cli::output::{render_settings, write_json, OutputFormat};
use encyclopedia_cli::terminal::ColorPalette;

use crate::GlobalOptions;

/// Changes requested by `settings set`.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub training_rate: Option<f64>,
}

/// Show the current settings.
pub fn handle_settings_show(global: &GlobalOptions) -> Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    print_settings(global, &settings)
}

/// Apply and persist a settings update.
pub fn handle_settings_set(global: &GlobalOptions, update: &SettingsUpdate) -> Result<()> {
    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(language) = &update.language {
        settings.language = language.clone();
    }
    if let Some(rate) = update.training_rate {
        TrainingRate::new(rate)?;
        if !TRAINING_RATE_PRESETS.contains(&rate) {
            tracing::debug!(rate, "training rate is not one of the presets");
        }
        settings.training_rate = rate;
    }
    settings.save().context("failed to save settings")?;
    print_settings(global, &settings)
}

fn print_settings(global: &GlobalOptions, settings: &Settings) -> Result<()> {
    let path = config_dir()?.join(SETTINGS_FILE);
    let stdout = io::stdout().lock();
    match global.format {
        OutputFormat::Text => render_settings(stdout, settings, &path, &ColorPalette::detect())?,
        OutputFormat::Json => write_json(stdout, settings)?,
    }
    Ok(())
}
