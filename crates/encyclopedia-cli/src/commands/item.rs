//! Item command handler for showing an item card.

use std::io;

use anyhow::{Context, Result};

use encyclopedia_cli::output::{render_card, write_json, OutputFormat};
use encyclopedia_cli::terminal::ColorPalette;

use crate::commands::open_session_with_items;
use crate::GlobalOptions;

/// Arguments for the item command.
#[derive(Debug, Clone)]
pub struct ItemCommandArgs {
    /// Item id or exact localized name.
    pub query: String,
    /// Training rate override for this card, skill points per minute.
    pub training_rate: Option<f64>,
    /// Fail on attributes without metadata.
    pub strict: Option<bool>,
}

/// Handle the item subcommand.
pub fn handle_item_command(global: &GlobalOptions, args: &ItemCommandArgs) -> Result<()> {
    let mut session = open_session_with_items(global)?;
    // Industry data only feeds the blueprint and "built by" parts of the card.
    session.fetch_industry();
    if let Some(rate) = args.training_rate {
        session.set_training_rate(rate)?;
    }
    if let Some(strict) = args.strict {
        session.set_strict(strict);
    }

    let id = session.data().find_item(&args.query)?;
    let card = session
        .card(id)
        .with_context(|| format!("failed to build card for item {id}"))?;

    let stdout = io::stdout().lock();
    match global.format {
        OutputFormat::Text => render_card(stdout, &card, &ColorPalette::detect())?,
        OutputFormat::Json => write_json(stdout, &card)?,
    }
    Ok(())
}
