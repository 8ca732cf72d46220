//! Search command handler.

use std::io;

use anyhow::Result;

use encyclopedia_lib::search::MIN_QUERY_LEN;
use encyclopedia_lib::SearchOptions;

use encyclopedia_cli::output::{render_search, write_json, OutputFormat};
use encyclopedia_cli::terminal::ColorPalette;

use crate::commands::open_session;
use crate::GlobalOptions;

/// Handle the search subcommand. Words of the query are joined with spaces.
pub fn handle_search_command(
    global: &GlobalOptions,
    words: &[String],
    options: SearchOptions,
) -> Result<()> {
    let query = words.join(" ");
    if query.chars().count() < MIN_QUERY_LEN {
        tracing::warn!("queries shorter than {MIN_QUERY_LEN} characters match nothing");
    }

    let session = open_session(global)?;
    let hits = session.search(&query, options);

    let stdout = io::stdout().lock();
    match global.format {
        OutputFormat::Text => render_search(stdout, &hits, &ColorPalette::detect())?,
        OutputFormat::Json => write_json(stdout, &hits)?,
    }
    Ok(())
}
