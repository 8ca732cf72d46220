//! Export command handler for blueprint cost sheets.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use encyclopedia_lib::{save_sheet, write_sheet, SheetFormat};

use crate::commands::open_session_with_items;
use crate::GlobalOptions;

/// Arguments for the export command.
#[derive(Debug, Clone)]
pub struct ExportCommandArgs {
    /// Blueprint ids or names, in row order.
    pub blueprints: Vec<String>,
    /// Sheet format.
    pub sheet_format: SheetFormat,
    /// Directory to write the timestamped sheet into; stdout when absent.
    pub output_dir: Option<PathBuf>,
}

/// Handle the export subcommand.
pub fn handle_export_command(global: &GlobalOptions, args: &ExportCommandArgs) -> Result<()> {
    let mut session = open_session_with_items(global)?;
    if !session.fetch_industry() {
        anyhow::bail!("failed to load industry data from {}", session.source());
    }

    for query in &args.blueprints {
        let id = session.data().find_item(query)?;
        if !session.add_blueprint_export(id)? {
            tracing::info!(%id, "blueprint listed more than once; exporting it once");
        }
    }

    let sheet = session.cost_sheet()?;
    match &args.output_dir {
        Some(dir) => {
            let path = save_sheet(&sheet, args.sheet_format, dir)
                .with_context(|| format!("failed to write sheet into {}", dir.display()))?;
            println!("{}", path.display());
        }
        None => write_sheet(&sheet, args.sheet_format, io::stdout().lock())?,
    }
    Ok(())
}
